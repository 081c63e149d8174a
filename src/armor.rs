//! PEM armor for certificates and keys.

use crate::error::{CertGenError, Result};

/// Label of an X.509 certificate block.
pub const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Label of a PKCS#1 RSA private key block.
pub const RSA_PRIVATE_KEY_LABEL: &str = "RSA PRIVATE KEY";

/// A decoded armor block: its label and binary contents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Armored {
    pub label: String,
    pub contents: Vec<u8>,
}

/// Wraps DER-encoded data in a PEM block with the provided label.
///
/// Lines are 64 columns and end with `\n`.
pub fn armor(label: &str, der: &[u8]) -> String {
    let pem = pem::Pem::new(label, der);
    pem::encode_config(
        &pem,
        pem::EncodeConfig::new().set_line_ending(pem::LineEnding::LF),
    )
}

/// Parses the first PEM block in `text`.
pub fn dearmor(text: &str) -> Result<Armored> {
    let pem = pem::parse(text)?;
    Ok(Armored {
        label: pem.tag().to_string(),
        contents: pem.contents().to_vec(),
    })
}

/// Parses a PEM block and checks it carries `label`.
pub fn dearmor_expecting(text: &str, label: &str) -> Result<Vec<u8>> {
    let armored = dearmor(text)?;
    if armored.label != label {
        return Err(CertGenError::DecodingError(format!(
            "expected a {label} block, found {}",
            armored.label
        )));
    }
    Ok(armored.contents)
}
