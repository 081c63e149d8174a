//! use candidtest_certs::error::CertGenError;

use thiserror::Error;

/// Represents errors that can occur while generating or checking test certificates.
///
/// Generation only ever fails with [`CertGenError::KeyGenerationError`] or
/// [`CertGenError::CertificateEncodingError`]; both are fatal for a run.
#[derive(Debug, Error, Clone)]
pub enum CertGenError {
    /// Error during key generation, usually a failing randomness source.
    #[error("Key generation error: {0}")]
    KeyGenerationError(String),

    /// Error while building, signing or encoding a certificate or key.
    #[error("Certificate encoding error: {0}")]
    CertificateEncodingError(String),

    /// Error during data decoding.
    #[error("Failed to decode data: {0}")]
    DecodingError(String),

    /// A signature or issuer check did not hold.
    #[error("Verification failed: {0}")]
    VerificationError(String),
}

pub type Result<T> = std::result::Result<T, CertGenError>;

impl From<der::Error> for CertGenError {
    fn from(err: der::Error) -> Self {
        CertGenError::CertificateEncodingError(err.to_string())
    }
}

impl From<rsa::Error> for CertGenError {
    fn from(err: rsa::Error) -> Self {
        CertGenError::KeyGenerationError(err.to_string())
    }
}

impl From<rsa::pkcs1::Error> for CertGenError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        CertGenError::CertificateEncodingError(err.to_string())
    }
}

impl From<pkcs8::spki::Error> for CertGenError {
    fn from(err: pkcs8::spki::Error) -> Self {
        CertGenError::CertificateEncodingError(err.to_string())
    }
}

impl From<pem::PemError> for CertGenError {
    /// Converts a `pem::PemError` into a `CertGenError`.
    fn from(err: pem::PemError) -> Self {
        CertGenError::DecodingError(err.to_string())
    }
}
