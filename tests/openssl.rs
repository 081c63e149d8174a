mod util;

use openssl::nid::Nid;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::stack::Stack;
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::verify::X509VerifyParam;
use openssl::x509::{X509, X509StoreContext};

fn common_name(name: &openssl::x509::X509NameRef) -> String {
    name.entries_by_nid(Nid::COMMONNAME)
        .next()
        .unwrap()
        .data()
        .as_utf8()
        .unwrap()
        .to_string()
}

fn load() -> (X509, X509) {
    let certs = util::test_certs();
    let ca = X509::from_pem(certs.ca_cert.as_bytes()).expect("Failed to parse CA PEM");
    let leaf = X509::from_pem(certs.cert.as_bytes()).expect("Failed to parse leaf PEM");
    (ca, leaf)
}

/// Runs OpenSSL chain verification of the leaf against the CA, optionally pinning a host name.
fn verify_chain(ca: &X509, leaf: &X509, host: Option<&str>) -> bool {
    let mut builder = X509StoreBuilder::new().unwrap();
    builder.add_cert(ca.clone()).unwrap();
    if let Some(host) = host {
        let mut param = X509VerifyParam::new().unwrap();
        param.set_host(host).unwrap();
        builder.set_param(&param).unwrap();
    }
    let store = builder.build();

    let chain = Stack::new().unwrap();
    let mut context = X509StoreContext::new().unwrap();
    context
        .init(&store, leaf, &chain, |c| c.verify_cert())
        .unwrap()
}

#[test]
fn test_openssl_crate_parses_ca() {
    let (ca, _) = load();

    assert_eq!(common_name(ca.subject_name()), "candidtest CA");
    assert_eq!(common_name(ca.issuer_name()), "candidtest CA");
    assert_eq!(ca.version(), 2, "X509 version should be 3 (0-based index)");

    let serial = ca.serial_number().to_bn().unwrap().to_dec_str().unwrap();
    assert_eq!(serial.to_string(), "0");

    assert_eq!(
        ca.signature_algorithm().object().nid(),
        Nid::SHA256WITHRSAENCRYPTION
    );
    assert!(ca.not_before().to_string().ends_with("1970 GMT"));
    assert!(ca.not_after().to_string().ends_with("2084 GMT"));

    let public_key = ca.public_key().unwrap();
    assert!(ca.verify(&public_key).unwrap(), "CA should be self-signed");
}

#[test]
fn test_openssl_crate_parses_leaf() {
    let (ca, leaf) = load();

    assert_eq!(common_name(leaf.subject_name()), "candidtest");
    assert_eq!(common_name(leaf.issuer_name()), "candidtest CA");

    let serial = leaf.serial_number().to_bn().unwrap().to_dec_str().unwrap();
    assert_eq!(serial.to_string(), "1");

    assert!(leaf.verify(&ca.public_key().unwrap()).unwrap());
    assert!(!leaf.verify(&leaf.public_key().unwrap()).unwrap());

    let alt_names = leaf.subject_alt_names().expect("leaf should carry SANs");
    let mut dns: Vec<String> = alt_names
        .iter()
        .filter_map(|name| name.dnsname().map(str::to_string))
        .collect();
    dns.sort();
    assert_eq!(dns, vec!["*.example.com", "example.com", "localhost"]);

    let mut ips: Vec<Vec<u8>> = alt_names
        .iter()
        .filter_map(|name| name.ipaddress().map(<[u8]>::to_vec))
        .collect();
    ips.sort_by_key(Vec::len);
    let mut loopback_v6 = vec![0u8; 16];
    loopback_v6[15] = 1;
    assert_eq!(ips, vec![vec![127, 0, 0, 1], loopback_v6]);
}

#[test]
fn test_openssl_accepts_pkcs1_key() {
    let (_, leaf) = load();
    let certs = util::test_certs();

    let rsa = Rsa::private_key_from_pem(certs.key.as_bytes()).expect("Failed to parse key PEM");
    assert!(rsa.check_key().unwrap());
    assert_eq!(rsa.size() * 8, 2048);

    let key = PKey::from_rsa(rsa).unwrap();
    assert!(leaf.public_key().unwrap().public_eq(&key));
}

#[test]
fn test_openssl_verifies_chain() {
    let (ca, leaf) = load();
    assert!(verify_chain(&ca, &leaf, None));
    assert!(verify_chain(&ca, &leaf, Some("localhost")));
    assert!(verify_chain(&ca, &leaf, Some("sub.example.com")));
    assert!(!verify_chain(&ca, &leaf, Some("other.example.org")));
}

#[test]
fn test_openssl_rejects_unrelated_ca() {
    let (_, leaf) = load();
    let unrelated = X509::from_pem(util::unrelated_ca_pem().as_bytes()).unwrap();
    assert!(!verify_chain(&unrelated, &leaf, None));
}
