#![allow(dead_code)]

use std::sync::OnceLock;

use candidtest_certs::cert::CertificateWithPrivateKey;
use candidtest_certs::generator::{CertificateGenerator, TestCerts};
use candidtest_certs::policy::CertPolicy;

/// Armored artifacts shared by every test in a binary; RSA key generation is slow.
pub fn test_certs() -> &'static TestCerts {
    static CERTS: OnceLock<TestCerts> = OnceLock::new();
    CERTS.get_or_init(|| {
        CertificateGenerator::default()
            .generate()
            .expect("Failed to generate test certificates")
    })
}

/// A CA and leaf kept in their decoded form.
pub fn ca_and_leaf() -> &'static (CertificateWithPrivateKey, CertificateWithPrivateKey) {
    static PAIR: OnceLock<(CertificateWithPrivateKey, CertificateWithPrivateKey)> =
        OnceLock::new();
    PAIR.get_or_init(|| {
        let generator = CertificateGenerator::default();
        let ca = generator
            .generate_certificate_authority()
            .expect("Failed to generate CA");
        let leaf = generator
            .generate_leaf_certificate(&ca)
            .expect("Failed to generate leaf");
        (ca, leaf)
    })
}

/// A second CA in PEM form, with its own key and its own subject name.
pub fn unrelated_ca_pem() -> &'static str {
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        let policy = CertPolicy::builder()
            .ca_common_name("unrelated CA".to_string())
            .build();
        CertificateGenerator::new(policy)
            .generate_certificate_authority()
            .and_then(|ca| ca.cert.to_pem())
            .expect("Failed to generate unrelated CA")
    })
}

/// A second CA in PEM form that reuses the default CA subject but not its key.
pub fn same_name_ca_pem() -> &'static str {
    static PEM: OnceLock<String> = OnceLock::new();
    PEM.get_or_init(|| {
        CertificateGenerator::default()
            .generate_certificate_authority()
            .and_then(|ca| ca.cert.to_pem())
            .expect("Failed to generate same-name CA")
    })
}
