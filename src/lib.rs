//! # candidtest-certs - Throwaway TLS Certificates for Tests
//!
//! Generates a self-signed RSA certificate authority and a leaf certificate signed
//! by it, so a test harness can serve TLS without externally provisioned
//! certificates. Built on the RustCrypto crates (`rsa`, `x509-cert`, `der`).
//!
//! This is not a general PKI library. It covers one scenario: one CA, one leaf,
//! a validity window from the Unix epoch lasting 1,000,000 hours, and a leaf valid
//! for the names a local listener is usually reached under.
//!
//! ## Output
//!
//! [`generator::CertificateGenerator::generate`] returns three PEM blocks, in order:
//!
//! 1. the CA certificate (`CERTIFICATE`), to be trusted as a root;
//! 2. the leaf private key (`RSA PRIVATE KEY`, PKCS#1);
//! 3. the leaf certificate (`CERTIFICATE`), valid for `localhost`, `example.com`,
//!    `*.example.com`, `127.0.0.1` and `::1`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use candidtest_certs::generator::CertificateGenerator;
//!
//! # fn main() -> Result<(), candidtest_certs::error::CertGenError> {
//! let certs = CertificateGenerator::default().generate()?;
//! println!("{}{}{}", certs.ca_cert, certs.key, certs.cert);
//! # Ok(())
//! # }
//! ```
//!
//! ### Step by Step
//!
//! ```rust,no_run
//! use candidtest_certs::generator::CertificateGenerator;
//!
//! # fn main() -> Result<(), candidtest_certs::error::CertGenError> {
//! let generator = CertificateGenerator::default();
//! let ca = generator.generate_certificate_authority()?;
//! let leaf = generator.generate_leaf_certificate(&ca)?;
//!
//! ca.cert.verify_self_signed()?;
//! leaf.cert.verify_signed_by(&ca.cert)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`generator`]: the CA/leaf pipeline and the [`generator::TestCerts`] bundle
//! - [`policy`]: the fixed generation parameters
//! - [`key`]: RSA key generation, PKCS#1 export and signing
//! - [`cert`]: certificate encoding, decoding, inspection and verification
//! - [`issuer`]: certificate issuing
//! - [`armor`]: PEM armor
//! - [`error`]: error types
//! - [`tbs_certificate`]: low-level certificate structure assembly

pub mod armor;
pub mod cert;
pub mod error;
pub mod generator;
pub mod issuer;
pub mod key;
pub mod policy;
pub mod tbs_certificate;
