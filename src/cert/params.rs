use bon::Builder;
use const_oid::ObjectIdentifier;
use const_oid::db::rfc4519;
use der::asn1::{Any, GeneralizedTime, SetOfVec, UtcTime};
use der::{Tag, Tagged};
use time::{Duration, OffsetDateTime, UtcOffset};
use x509_cert::attr::AttributeTypeAndValue;
use x509_cert::name::{RdnSequence, RelativeDistinguishedName};
use x509_cert::time::Time;

use super::extensions::ToAndFromX509Extension;
pub use crate::cert::extensions::AltName;
pub use crate::cert::extensions::ExtendedKeyUsageOption;
use crate::error::{CertGenError, Result};
use crate::key::PublicKey;

/// Parameters for building an X.509 certificate.
///
/// # Fields
/// * `subject` - The distinguished name of the certificate subject.
/// * `subject_public_key` - The public key of the certificate subject.
/// * `usages` - A list of extended key usage options.
/// * `is_ca` - Indicates if the certificate is a CA.
/// * `alt_names` - DNS names and IP addresses for the SubjectAltName extension.
#[derive(Clone, Debug, Builder)]
pub struct CertificationRequestInfo {
    pub subject: DistinguishedName,
    pub subject_public_key: PublicKey,
    #[builder(default)]
    pub usages: Vec<ExtendedKeyUsageOption>,
    #[builder(default)]
    pub is_ca: bool,
    #[builder(default)]
    pub alt_names: Vec<AltName>,
}

/// Distinguished name of a certificate subject or issuer.
///
/// Only the attributes that are set end up in the encoded name.
#[derive(Clone, Debug, Builder, Default, PartialEq, Eq)]
pub struct DistinguishedName {
    pub common_name: String,
    pub country: Option<String>,
    pub state: Option<String>,
    pub locality: Option<String>,
    pub organization: Option<String>,
    pub organization_unit: Option<String>,
}

impl DistinguishedName {
    /// Converts the distinguished name to an X.509 `Name`.
    ///
    /// RDNs are emitted most significant first (C, ST, L, O, OU, CN). Country is a
    /// PrintableString, everything else UTF8String.
    pub fn as_x509_name(&self) -> Result<x509_cert::name::DistinguishedName> {
        let attributes = [
            (rfc4519::C, self.country.as_deref(), Tag::PrintableString),
            (rfc4519::ST, self.state.as_deref(), Tag::Utf8String),
            (rfc4519::L, self.locality.as_deref(), Tag::Utf8String),
            (rfc4519::O, self.organization.as_deref(), Tag::Utf8String),
            (rfc4519::OU, self.organization_unit.as_deref(), Tag::Utf8String),
            (rfc4519::CN, Some(self.common_name.as_str()), Tag::Utf8String),
        ];

        let mut rdns = Vec::new();
        for (oid, value, tag) in attributes {
            let Some(value) = value else { continue };
            let atv = AttributeTypeAndValue {
                oid,
                value: Any::new(tag, value.as_bytes())?,
            };
            rdns.push(RelativeDistinguishedName(SetOfVec::try_from(vec![atv])?));
        }
        Ok(RdnSequence(rdns))
    }

    /// Creates a `DistinguishedName` from an X.509 `Name`.
    ///
    /// Attributes other than the six known ones, or with non-string values, are skipped.
    pub fn from_x509_name(x509dn: &x509_cert::name::DistinguishedName) -> Self {
        let mut name = DistinguishedName::default();
        for rdn in x509dn.0.iter() {
            for attr in rdn.0.iter() {
                let Some(value) = attribute_string(&attr.value) else {
                    continue;
                };
                match attr.oid {
                    rfc4519::CN => name.common_name = value,
                    rfc4519::C => name.country = Some(value),
                    rfc4519::ST => name.state = Some(value),
                    rfc4519::L => name.locality = Some(value),
                    rfc4519::O => name.organization = Some(value),
                    rfc4519::OU => name.organization_unit = Some(value),
                    _ => {}
                }
            }
        }
        name
    }
}

fn attribute_string(value: &Any) -> Option<String> {
    match value.tag() {
        Tag::Utf8String | Tag::PrintableString | Tag::Ia5String => {
            std::str::from_utf8(value.value()).ok().map(str::to_owned)
        }
        _ => None,
    }
}

/// Certificate validity period.
///
/// This struct represents the `notBefore` and `notAfter` fields in a certificate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Validity {
    pub not_before: OffsetDateTime,
    pub not_after: OffsetDateTime,
}

impl Validity {
    /// Creates a validity period starting now for the given number of days.
    pub fn for_days(days: i64) -> Self {
        Self::starting_at(OffsetDateTime::now_utc(), Duration::days(days))
    }

    /// Creates a validity period of `lifetime` beginning at `not_before`.
    pub fn starting_at(not_before: OffsetDateTime, lifetime: Duration) -> Self {
        Self {
            not_before,
            not_after: not_before + lifetime,
        }
    }

    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.not_before <= instant && instant <= self.not_after
    }

    /// Converts to the `x509_cert` representation.
    ///
    /// Dates before 2050 are encoded as UTCTime and later ones as GeneralizedTime,
    /// as RFC 5280 section 4.1.2.5 requires.
    pub fn to_x509_validity(&self) -> Result<x509_cert::time::Validity> {
        Ok(x509_cert::time::Validity {
            not_before: to_x509_time(self.not_before)?,
            not_after: to_x509_time(self.not_after)?,
        })
    }

    pub fn from_x509_validity(validity: &x509_cert::time::Validity) -> Result<Self> {
        Ok(Self {
            not_before: from_x509_time(&validity.not_before)?,
            not_after: from_x509_time(&validity.not_after)?,
        })
    }
}

fn to_x509_time(instant: OffsetDateTime) -> Result<Time> {
    let secs = u64::try_from(instant.unix_timestamp()).map_err(|_| {
        CertGenError::CertificateEncodingError(format!(
            "validity date {instant} is before the Unix epoch"
        ))
    })?;
    let since_epoch = std::time::Duration::from_secs(secs);
    if instant.to_offset(UtcOffset::UTC).year() < 2050 {
        Ok(Time::UtcTime(UtcTime::from_unix_duration(since_epoch)?))
    } else {
        Ok(Time::GeneralTime(GeneralizedTime::from_unix_duration(
            since_epoch,
        )?))
    }
}

fn from_x509_time(time: &Time) -> Result<OffsetDateTime> {
    let since_epoch = match time {
        Time::UtcTime(ut) => ut.to_unix_duration(),
        Time::GeneralTime(gt) => gt.to_unix_duration(),
    };
    let secs = i64::try_from(since_epoch.as_secs())
        .map_err(|e| CertGenError::DecodingError(e.to_string()))?;
    OffsetDateTime::from_unix_timestamp(secs)
        .map_err(|e| CertGenError::DecodingError(e.to_string()))
}

/// Represents an X.509 extension.
///
/// # Fields
/// * `oid` - The object identifier of the extension.
/// * `critical` - Indicates if the extension is critical.
/// * `value` - The DER-encoded value of the extension.
#[derive(Clone, Debug)]
pub struct ExtensionParam {
    pub oid: ObjectIdentifier,
    pub critical: bool,
    /// DER-encoded extension value
    pub value: Vec<u8>,
}

impl ExtensionParam {
    /// Creates an `ExtensionParam` from a specific extension.
    pub fn from_extension<E: ToAndFromX509Extension>(extension: E, critical: bool) -> Result<Self> {
        Ok(Self {
            oid: E::OID,
            critical,
            value: extension.to_x509_extension_value()?,
        })
    }
}
