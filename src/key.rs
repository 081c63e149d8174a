use der::Encode;
use pkcs8::DecodePublicKey;
use rand_chacha::ChaCha20Rng;
use rand_core::{OsRng, RngCore, SeedableRng};
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs1v15::{Signature, SigningKey as RsaSigningKey, VerifyingKey as RsaVerifyingKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::{Digest, Sha1};
use sha2::Sha256;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::armor::{self, RSA_PRIVATE_KEY_LABEL};
use crate::error::{CertGenError, Result};

/// An RSA key pair used to sign certificates or to be certified by a CA.
#[derive(Clone)]
pub struct KeyPair {
    private: Box<RsaPrivateKey>,
    public: RsaPublicKey,
}

impl KeyPair {
    /// Generate an RSA key pair with the specified number of bits.
    ///
    /// The generator is seeded from the operating system; a failing source
    /// surfaces as [`CertGenError::KeyGenerationError`].
    pub fn generate_rsa(bits: usize) -> Result<Self> {
        tracing::debug!(bits, "generating RSA key pair");
        let mut rng = seeded_rng(OsRng)?;
        let private = RsaPrivateKey::new(&mut rng, bits)?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair {
            private: Box::new(private),
            public,
        })
    }

    /// Import a key pair from a PKCS#1 `RSAPrivateKey` DER structure.
    pub fn import_from_pkcs1_der(der: &[u8]) -> Result<Self> {
        let private = RsaPrivateKey::from_pkcs1_der(der)
            .map_err(|e| CertGenError::DecodingError(e.to_string()))?;
        let public = RsaPublicKey::from(&private);
        Ok(KeyPair {
            private: Box::new(private),
            public,
        })
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.public.size() * 8
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public
    }

    /// Encodes the private key as PKCS#1 DER, the body of an `RSA PRIVATE KEY` block.
    pub fn to_pkcs1_der(&self) -> Result<Vec<u8>> {
        Ok(self.private.to_pkcs1_der()?.as_bytes().to_vec())
    }

    pub fn to_pkcs1_pem(&self) -> Result<String> {
        Ok(armor::armor(RSA_PRIVATE_KEY_LABEL, &self.to_pkcs1_der()?))
    }

    pub fn as_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        PublicKey::from_key_pair(self).to_spki()
    }

    /// Signs `data` with RSASSA-PKCS1-v1_5 over SHA-256.
    pub fn sign_data(&self, data: &[u8]) -> Result<Vec<u8>> {
        let signing_key: RsaSigningKey<Sha256> = RsaSigningKey::new(*(self.private.clone()));
        let signature = signing_key
            .try_sign(data)
            .map_err(|e| CertGenError::CertificateEncodingError(e.to_string()))?;
        Ok(signature.to_vec())
    }
}

/// Seeds a ChaCha20 generator from `source` without panicking on failure.
fn seeded_rng<R: RngCore>(source: R) -> Result<ChaCha20Rng> {
    ChaCha20Rng::from_rng(source).map_err(|e| CertGenError::KeyGenerationError(e.to_string()))
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .finish_non_exhaustive()
    }
}

/// The public half of a [`KeyPair`], as embedded in a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicKey(pub RsaPublicKey);

impl PublicKey {
    pub fn from_key_pair(key_pair: &KeyPair) -> Self {
        PublicKey(key_pair.public.clone())
    }

    /// Converts the key into a `SubjectPublicKeyInfo` with the `rsaEncryption` algorithm.
    pub fn to_spki(&self) -> Result<SubjectPublicKeyInfoOwned> {
        Ok(SubjectPublicKeyInfoOwned::from_key(self.0.clone())?)
    }

    /// Reads an RSA key back out of a `SubjectPublicKeyInfo`.
    pub fn from_x509spki(spki: &SubjectPublicKeyInfoOwned) -> Result<Self> {
        let der = spki.to_der()?;
        let public = RsaPublicKey::from_public_key_der(&der)
            .map_err(|e| CertGenError::DecodingError(e.to_string()))?;
        Ok(PublicKey(public))
    }

    /// SHA-1 over the subject public key bits (RFC 5280, section 4.2.1.2, method 1).
    pub fn key_identifier(&self) -> Result<Vec<u8>> {
        let spki = self.to_spki()?;
        Ok(Sha1::digest(spki.subject_public_key.raw_bytes()).to_vec())
    }

    /// Checks an RSASSA-PKCS1-v1_5 SHA-256 signature made by the matching private key.
    pub fn verify(&self, data: &[u8], signature: &[u8]) -> Result<()> {
        let verifying_key: RsaVerifyingKey<Sha256> = RsaVerifyingKey::new(self.0.clone());
        let signature = Signature::try_from(signature)
            .map_err(|e| CertGenError::VerificationError(e.to_string()))?;
        verifying_key
            .verify(data, &signature)
            .map_err(|e| CertGenError::VerificationError(e.to_string()))
    }
}
