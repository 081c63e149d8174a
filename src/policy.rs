//! The fixed parameters the generator works from.
//!
//! [`CertPolicy::default`] is the candidtest scenario: one CA, one leaf, names
//! and addresses a local TLS listener is typically reached under, and a
//! validity window that starts at the Unix epoch and never runs out in practice.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use bon::Builder;
use time::{Duration, OffsetDateTime};

use crate::cert::extensions::AltName;
use crate::cert::params::Validity;

pub const CA_COMMON_NAME: &str = "candidtest CA";
pub const LEAF_COMMON_NAME: &str = "candidtest";
pub const CA_SERIAL_NUMBER: u64 = 0;
pub const LEAF_SERIAL_NUMBER: u64 = 1;

/// Lifetime of both certificates, counted from the Unix epoch.
pub const VALIDITY_HOURS: i64 = 1_000_000;

/// RSA modulus size. rustls rejects anything below 2048 bits.
pub const DEFAULT_KEY_BITS: usize = 2048;

pub const LEAF_DNS_NAMES: [&str; 3] = ["localhost", "example.com", "*.example.com"];
pub const LEAF_IP_ADDRESSES: [IpAddr; 2] = [
    IpAddr::V4(Ipv4Addr::LOCALHOST),
    IpAddr::V6(Ipv6Addr::LOCALHOST),
];

/// Generation parameters shared by the CA and the leaf certificate.
#[derive(Clone, Debug, Builder, PartialEq, Eq)]
pub struct CertPolicy {
    #[builder(default = DEFAULT_KEY_BITS)]
    pub key_bits: usize,
    #[builder(default = CA_COMMON_NAME.to_string())]
    pub ca_common_name: String,
    #[builder(default = LEAF_COMMON_NAME.to_string())]
    pub leaf_common_name: String,
    #[builder(default = CA_SERIAL_NUMBER)]
    pub ca_serial_number: u64,
    #[builder(default = LEAF_SERIAL_NUMBER)]
    pub leaf_serial_number: u64,
    /// Used verbatim for both certificates.
    #[builder(default = default_validity())]
    pub validity: Validity,
    #[builder(default = default_leaf_alt_names())]
    pub leaf_alt_names: Vec<AltName>,
}

impl Default for CertPolicy {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_validity() -> Validity {
    Validity::starting_at(OffsetDateTime::UNIX_EPOCH, Duration::hours(VALIDITY_HOURS))
}

fn default_leaf_alt_names() -> Vec<AltName> {
    LEAF_DNS_NAMES
        .iter()
        .map(|name| AltName::DnsName(name.to_string()))
        .chain(LEAF_IP_ADDRESSES.into_iter().map(AltName::from))
        .collect()
}
