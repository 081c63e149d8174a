pub mod extensions;
pub mod params;

use der::{Decode, Encode};
use extensions::{BasicConstraints, SubjectAltName, SubjectKeyIdentifier, ToAndFromX509Extension};
use params::{CertificationRequestInfo, DistinguishedName, Validity};
use x509_cert::certificate::CertificateInner;

use crate::armor::{self, CERTIFICATE_LABEL};
use crate::error::{CertGenError, Result};
use crate::issuer::Issuer;
use crate::key::{KeyPair, PublicKey};

/// Represents the supported signature algorithms for certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// SHA-256 with RSA encryption (PKCS#1 v1.5).
    Sha256WithRSA,
}

impl From<SignatureAlgorithm> for x509_cert::spki::AlgorithmIdentifierOwned {
    /// Converts a `SignatureAlgorithm` into an `AlgorithmIdentifierOwned`.
    ///
    /// The RSA PKCS#1 v1.5 identifiers carry an explicit NULL parameter (RFC 4055).
    fn from(value: SignatureAlgorithm) -> Self {
        match value {
            SignatureAlgorithm::Sha256WithRSA => x509_cert::spki::AlgorithmIdentifierOwned {
                oid: const_oid::db::rfc5912::SHA_256_WITH_RSA_ENCRYPTION,
                parameters: Some(der::asn1::Any::null()),
            },
        }
    }
}

/// Represents an X.509 certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    /// The inner representation of the certificate.
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        Ok(self.inner.to_der()?)
    }

    /// Encodes the certificate into a `CERTIFICATE` PEM block.
    pub fn to_pem(&self) -> Result<String> {
        Ok(armor::armor(CERTIFICATE_LABEL, &self.to_der()?))
    }

    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| CertGenError::DecodingError(e.to_string()))?;
        Ok(Self { inner })
    }

    pub fn from_pem(pem: &str) -> Result<Self> {
        Self::from_der(&armor::dearmor_expecting(pem, CERTIFICATE_LABEL)?)
    }

    /// Big-endian two's-complement bytes of the serial number.
    pub fn serial_number(&self) -> &[u8] {
        self.inner.tbs_certificate.serial_number.as_bytes()
    }

    pub fn subject(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.subject)
    }

    pub fn issuer(&self) -> DistinguishedName {
        DistinguishedName::from_x509_name(&self.inner.tbs_certificate.issuer)
    }

    pub fn validity(&self) -> Result<Validity> {
        Validity::from_x509_validity(&self.inner.tbs_certificate.validity)
    }

    /// The RSA public key the certificate binds to its subject.
    pub fn public_key(&self) -> Result<PublicKey> {
        PublicKey::from_x509spki(&self.inner.tbs_certificate.subject_public_key_info)
    }

    /// Finds and decodes the extension of type `E`, if present.
    pub fn extension<E: ToAndFromX509Extension>(&self) -> Result<Option<E>> {
        let Some(extensions) = &self.inner.tbs_certificate.extensions else {
            return Ok(None);
        };
        extensions
            .iter()
            .find(|ext| ext.extn_id == E::OID)
            .map(|ext| E::from_x509_extension_value(ext.extn_value.as_bytes()))
            .transpose()
    }

    /// Whether the BasicConstraints extension marks this certificate as a CA.
    pub fn is_ca(&self) -> Result<bool> {
        Ok(self
            .extension::<BasicConstraints>()?
            .is_some_and(|bc| bc.is_ca))
    }

    /// The SubjectAltName entries; empty when the extension is absent.
    pub fn subject_alt_name(&self) -> Result<SubjectAltName> {
        Ok(self.extension::<SubjectAltName>()?.unwrap_or_default())
    }

    pub fn subject_key_identifier(&self) -> Result<Option<Vec<u8>>> {
        Ok(self.extension::<SubjectKeyIdentifier>()?.map(|ski| ski.0))
    }

    /// Verifies that `issuer` signed this certificate.
    ///
    /// Checks that the issuer name matches the issuer's subject and that the
    /// signature over the TBS bytes validates with the issuer's public key.
    pub fn verify_signed_by(&self, issuer: &Certificate) -> Result<()> {
        let tbs = &self.inner.tbs_certificate;
        if tbs.issuer != issuer.inner.tbs_certificate.subject {
            return Err(CertGenError::VerificationError(format!(
                "issuer {} does not match {}",
                tbs.issuer, issuer.inner.tbs_certificate.subject
            )));
        }

        let expected: x509_cert::spki::AlgorithmIdentifierOwned =
            SignatureAlgorithm::Sha256WithRSA.into();
        if self.inner.signature_algorithm.oid != expected.oid {
            return Err(CertGenError::VerificationError(format!(
                "unsupported signature algorithm {}",
                self.inner.signature_algorithm.oid
            )));
        }

        let signature = self.inner.signature.as_bytes().ok_or_else(|| {
            CertGenError::VerificationError("signature has unused bits".to_string())
        })?;
        issuer.public_key()?.verify(&tbs.to_der()?, signature)
    }

    /// Verifies a self-signed certificate against its own public key.
    pub fn verify_self_signed(&self) -> Result<()> {
        self.verify_signed_by(self)
    }

    /// Creates a new self-signed certificate.
    ///
    /// The subject doubles as the issuer and `key` signs the certificate, so `key`
    /// must be the private half of `cert_info.subject_public_key`.
    pub fn new_self_signed(
        cert_info: &CertificationRequestInfo,
        key: &KeyPair,
        serial_number: u64,
        validity: Validity,
    ) -> Result<Self> {
        let self_issuer = SelfIssuer {
            name: cert_info.subject.clone(),
            key,
        };
        self_issuer.issue(cert_info, serial_number, validity)
    }
}

// Helper struct for self-signed certificates
struct SelfIssuer<'a> {
    name: DistinguishedName,
    key: &'a KeyPair,
}

impl Issuer for SelfIssuer<'_> {
    fn issuer_name(&self) -> DistinguishedName {
        self.name.clone()
    }

    fn signing_key(&self) -> &KeyPair {
        self.key
    }
}

/// A certificate together with the private key it certifies.
///
/// When the certificate is a CA this acts as an [`Issuer`].
#[derive(Debug, Clone)]
pub struct CertificateWithPrivateKey {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl CertificateWithPrivateKey {
    /// Pairs a certificate with a key, checking that the key matches the certificate.
    pub fn new(cert: Certificate, key: KeyPair) -> Result<Self> {
        if cert.public_key()? != PublicKey::from_key_pair(&key) {
            return Err(CertGenError::VerificationError(
                "private key does not match the certificate".to_string(),
            ));
        }
        Ok(Self { cert, key })
    }
}

impl Issuer for CertificateWithPrivateKey {
    fn issuer_name(&self) -> DistinguishedName {
        // The name of the issuer is the subject of the certificate
        self.cert.subject()
    }

    fn signing_key(&self) -> &KeyPair {
        &self.key
    }

    fn authority_key_identifier(&self) -> Result<Vec<u8>> {
        match self.cert.subject_key_identifier()? {
            Some(key_id) => Ok(key_id),
            None => PublicKey::from_key_pair(&self.key).key_identifier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cert::extensions::{AltName, ExtendedKeyUsageOption};

    fn make_ca() -> CertificateWithPrivateKey {
        let key = KeyPair::generate_rsa(2048).unwrap();
        let info = CertificationRequestInfo::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name("unit CA".to_string())
                    .build(),
            )
            .subject_public_key(PublicKey::from_key_pair(&key))
            .is_ca(true)
            .build();
        let cert = Certificate::new_self_signed(&info, &key, 7, Validity::for_days(1)).unwrap();
        CertificateWithPrivateKey::new(cert, key).unwrap()
    }

    #[test]
    fn test_self_signed_certificate_fields() {
        let ca = make_ca();
        assert_eq!(ca.cert.serial_number(), &[7]);
        assert_eq!(ca.cert.subject().common_name, "unit CA");
        assert_eq!(ca.cert.issuer(), ca.cert.subject());
        assert!(ca.cert.is_ca().unwrap());
        assert!(ca.cert.subject_alt_name().unwrap().names.is_empty());
        ca.cert.verify_self_signed().unwrap();
    }

    #[test]
    fn test_pem_round_trip_preserves_certificate() {
        let ca = make_ca();
        let pem = ca.cert.to_pem().unwrap();
        assert_eq!(Certificate::from_pem(&pem).unwrap(), ca.cert);
    }

    #[test]
    fn test_issued_certificate_verifies_only_against_issuer() {
        let ca = make_ca();
        let other = make_ca();
        let key = KeyPair::generate_rsa(2048).unwrap();
        let info = CertificationRequestInfo::builder()
            .subject(DistinguishedName::builder().common_name("leaf".to_string()).build())
            .subject_public_key(PublicKey::from_key_pair(&key))
            .usages(vec![ExtendedKeyUsageOption::ServerAuth])
            .alt_names(vec![AltName::DnsName("localhost".to_string())])
            .build();
        let leaf = ca.issue(&info, 2, Validity::for_days(1)).unwrap();

        assert!(!leaf.is_ca().unwrap());
        assert_eq!(leaf.issuer().common_name, "unit CA");
        leaf.verify_signed_by(&ca.cert).unwrap();
        assert!(matches!(
            leaf.verify_signed_by(&other.cert),
            Err(CertGenError::VerificationError(_))
        ));
    }

    #[test]
    fn test_mismatched_key_is_rejected() {
        let ca = make_ca();
        let stranger = KeyPair::generate_rsa(2048).unwrap();
        assert!(matches!(
            CertificateWithPrivateKey::new(ca.cert, stranger),
            Err(CertGenError::VerificationError(_))
        ));
    }

    #[test]
    fn test_tampered_certificate_fails_verification() {
        let mut ca = make_ca();
        ca.cert.inner.tbs_certificate.serial_number =
            x509_cert::serial_number::SerialNumber::new(&[8]).unwrap();
        assert!(ca.cert.verify_self_signed().is_err());
    }
}
