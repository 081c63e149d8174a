use der::Encode;
use der::flagset::FlagSet;
use x509_cert::certificate::CertificateInner;

use crate::cert::Certificate;
use crate::cert::SignatureAlgorithm;
use crate::cert::extensions::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, ExtendedKeyUsageOption, KeyUsage,
    KeyUsages, SubjectAltName, SubjectKeyIdentifier,
};
use crate::cert::params::{CertificationRequestInfo, DistinguishedName, ExtensionParam, Validity};
use crate::error::Result;
use crate::key::{KeyPair, PublicKey};
use crate::tbs_certificate::TbsCertificate;

/// Represents an entity capable of issuing certificates.
pub trait Issuer {
    /// Returns the distinguished name of the issuer.
    fn issuer_name(&self) -> DistinguishedName;

    /// Returns the signing key of the issuer.
    fn signing_key(&self) -> &KeyPair;

    /// Key identifier placed in the AuthorityKeyIdentifier of issued certificates.
    fn authority_key_identifier(&self) -> Result<Vec<u8>> {
        PublicKey::from_key_pair(self.signing_key()).key_identifier()
    }

    /// Issues a certificate based on the provided certification request information.
    ///
    /// The issued certificate carries:
    /// BasicConstraints (critical, CA only), KeyUsage (critical, derived from
    /// `is_ca` and `usages`), ExtendedKeyUsage, SubjectKeyIdentifier,
    /// AuthorityKeyIdentifier and, when `alt_names` is non-empty, SubjectAltName.
    fn issue(
        &self,
        cert_request: &CertificationRequestInfo,
        serial_number: u64,
        validity: Validity,
    ) -> Result<Certificate> {
        let signature_algo = SignatureAlgorithm::Sha256WithRSA;
        let issuer_dn = self.issuer_name();

        let mut extensions: Vec<ExtensionParam> = Vec::new();

        if cert_request.is_ca {
            let basic_constraints = BasicConstraints {
                is_ca: true,
                max_path_length: None,
            };
            extensions.push(ExtensionParam::from_extension(basic_constraints, true)?);
        }

        let mut key_usage_flags: FlagSet<KeyUsages> = FlagSet::empty();

        if cert_request.is_ca {
            key_usage_flags |= KeyUsages::KeyCertSign;
            key_usage_flags |= KeyUsages::CRLSign;
            key_usage_flags |= KeyUsages::DigitalSignature;
        }

        for usage in &cert_request.usages {
            match usage {
                ExtendedKeyUsageOption::ServerAuth | ExtendedKeyUsageOption::ClientAuth => {
                    key_usage_flags |= KeyUsages::DigitalSignature;
                    key_usage_flags |= KeyUsages::KeyEncipherment;
                }
            }
        }

        if !key_usage_flags.is_empty() {
            extensions.push(ExtensionParam::from_extension(
                KeyUsage(key_usage_flags),
                true,
            )?);
        }

        if !cert_request.usages.is_empty() {
            let extended_key_usage = ExtendedKeyUsage {
                usage: cert_request.usages.clone(),
            };
            extensions.push(ExtensionParam::from_extension(extended_key_usage, false)?);
        }

        let subject_key_id = cert_request.subject_public_key.key_identifier()?;
        extensions.push(ExtensionParam::from_extension(
            SubjectKeyIdentifier(subject_key_id),
            false,
        )?);

        let authority_key_id = AuthorityKeyIdentifier {
            key_identifier: self.authority_key_identifier()?,
        };
        extensions.push(ExtensionParam::from_extension(authority_key_id, false)?);

        if !cert_request.alt_names.is_empty() {
            let san = SubjectAltName {
                names: cert_request.alt_names.clone(),
            };
            extensions.push(ExtensionParam::from_extension(san, false)?);
        }

        let tbs_cert = TbsCertificate {
            serial_number,
            signature_algorithm: signature_algo,
            issuer: issuer_dn.clone(),
            validity,
            subject: cert_request.subject.clone(),
            subject_public_key: cert_request.subject_public_key.clone(),
            extensions,
        };

        let tbs_cert_inner = tbs_cert.to_tbs_certificate_inner()?;
        let signature = self.signing_key().sign_data(&tbs_cert_inner.to_der()?)?;

        let cert_inner = CertificateInner {
            tbs_certificate: tbs_cert_inner,
            signature_algorithm: signature_algo.into(),
            signature: der::asn1::BitString::from_bytes(&signature)?,
        };

        tracing::info!(
            serial_number,
            subject = %cert_request.subject.common_name,
            issuer = %issuer_dn.common_name,
            is_ca = cert_request.is_ca,
            "issued certificate"
        );

        Ok(Certificate { inner: cert_inner })
    }
}
