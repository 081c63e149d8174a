//! Generation of the candidtest CA, leaf certificate and leaf key.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::cert::extensions::ExtendedKeyUsageOption;
use crate::cert::params::{CertificationRequestInfo, DistinguishedName};
use crate::cert::{Certificate, CertificateWithPrivateKey};
use crate::error::{CertGenError, Result};
use crate::issuer::Issuer;
use crate::key::{KeyPair, PublicKey};
use crate::policy::CertPolicy;

/// Produces a self-signed CA and a leaf certificate signed by it.
///
/// Every call generates fresh keys; nothing is cached between runs.
#[derive(Clone, Debug, Default)]
pub struct CertificateGenerator {
    policy: CertPolicy,
}

impl CertificateGenerator {
    pub fn new(policy: CertPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CertPolicy {
        &self.policy
    }

    /// Generates the RSA key and self-signed certificate of the test CA.
    pub fn generate_certificate_authority(&self) -> Result<CertificateWithPrivateKey> {
        let ca_key = KeyPair::generate_rsa(self.policy.key_bits)?;

        let ca_cert_info = CertificationRequestInfo::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name(self.policy.ca_common_name.clone())
                    .build(),
            )
            .subject_public_key(PublicKey::from_key_pair(&ca_key))
            .is_ca(true)
            .build();

        let cert = Certificate::new_self_signed(
            &ca_cert_info,
            &ca_key,
            self.policy.ca_serial_number,
            self.policy.validity.clone(),
        )?;

        Ok(CertificateWithPrivateKey { cert, key: ca_key })
    }

    /// Generates a fresh leaf key and a certificate for it signed by `ca`.
    ///
    /// The leaf shares the CA's validity window and carries the policy's DNS and IP
    /// subject alternative names.
    pub fn generate_leaf_certificate(
        &self,
        ca: &CertificateWithPrivateKey,
    ) -> Result<CertificateWithPrivateKey> {
        if !ca.cert.is_ca()? {
            return Err(CertGenError::CertificateEncodingError(format!(
                "issuer {} is not a CA certificate",
                ca.cert.subject().common_name
            )));
        }

        let leaf_key = KeyPair::generate_rsa(self.policy.key_bits)?;

        let leaf_cert_info = CertificationRequestInfo::builder()
            .subject(
                DistinguishedName::builder()
                    .common_name(self.policy.leaf_common_name.clone())
                    .build(),
            )
            .subject_public_key(PublicKey::from_key_pair(&leaf_key))
            .usages(vec![
                ExtendedKeyUsageOption::ServerAuth,
                ExtendedKeyUsageOption::ClientAuth,
            ])
            .alt_names(self.policy.leaf_alt_names.clone())
            .build();

        let cert = ca.issue(
            &leaf_cert_info,
            self.policy.leaf_serial_number,
            self.policy.validity.clone(),
        )?;

        Ok(CertificateWithPrivateKey {
            cert,
            key: leaf_key,
        })
    }

    /// Runs the whole pipeline and armors the results.
    ///
    /// Either all three artifacts are returned or none are.
    pub fn generate(&self) -> Result<TestCerts> {
        let ca = self.generate_certificate_authority()?;
        let leaf = self.generate_leaf_certificate(&ca)?;

        Ok(TestCerts {
            ca_cert: ca.cert.to_pem()?,
            key: leaf.key.to_pkcs1_pem()?,
            cert: leaf.cert.to_pem()?,
        })
    }
}

/// The three armored artifacts a test TLS listener needs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCerts {
    /// CA certificate, to be trusted as a root.
    pub ca_cert: String,
    /// Leaf private key, PKCS#1.
    pub key: String,
    /// Leaf certificate, signed by the CA.
    pub cert: String,
}

impl TestCerts {
    pub const CA_CERT_FILE: &'static str = "ca.pem";
    pub const KEY_FILE: &'static str = "key.pem";
    pub const CERT_FILE: &'static str = "cert.pem";

    /// File name and contents of each artifact, in output order.
    pub fn artifacts(&self) -> [(&'static str, &str); 3] {
        [
            (Self::CA_CERT_FILE, self.ca_cert.as_str()),
            (Self::KEY_FILE, self.key.as_str()),
            (Self::CERT_FILE, self.cert.as_str()),
        ]
    }

    /// Writes the artifacts into `dir`, creating it if needed.
    ///
    /// Every artifact is staged in a temporary file inside `dir` before any of them
    /// is moved into place. If a move fails, the artifacts already moved are
    /// removed again, so `dir` never ends up with only some of the files.
    pub fn write_to_dir(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)?;

        let mut staged = Vec::with_capacity(3);
        for (file_name, contents) in self.artifacts() {
            let mut file = NamedTempFile::new_in(dir)?;
            file.write_all(contents.as_bytes())?;
            staged.push((dir.join(file_name), file));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (path, file) in staged {
            if let Err(err) = file.persist(&path) {
                for done in &written {
                    let _ = fs::remove_file(done);
                }
                return Err(err.error);
            }
            tracing::debug!(path = %path.display(), "wrote artifact");
            written.push(path);
        }
        Ok(())
    }
}
