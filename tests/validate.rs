// Copyright 2026 The webid Authors.
//
// Permission to use, copy, modify, and/or distribute this software for any
// purpose with or without fee is hereby granted, provided that the above
// copyright notice and this permission notice appear in all copies.
//
// THE SOFTWARE IS PROVIDED "AS IS" AND THE AUTHORS DISCLAIM ALL WARRANTIES
// WITH REGARD TO THIS SOFTWARE INCLUDING ALL IMPLIED WARRANTIES OF
// MERCHANTABILITY AND FITNESS. IN NO EVENT SHALL THE AUTHORS BE LIABLE FOR
// ANY SPECIAL, DIRECT, INDIRECT, OR CONSEQUENTIAL DAMAGES OR ANY DAMAGES
// WHATSOEVER RESULTING FROM LOSS OF USE, DATA OR PROFITS, WHETHER IN AN
// ACTION OF CONTRACT, NEGLIGENCE OR OTHER TORTIOUS ACTION, ARISING OUT OF
// OR IN CONNECTION WITH THE USE OR PERFORMANCE OF THIS SOFTWARE.

use std::cell::Cell;
use std::io;
use std::thread;
use std::time::Duration;
use webid::{
    Cancellation, DecodeError, ResolveError, Timeout, Triple, ValidationError, CERT_EXPONENT,
    CERT_KEY, CERT_MODULUS,
};

const ALICE: &str = "https://alice.example/profile#me";

const RSA_EE: &[u8] = include_bytes!("webid/rsa_ee.der");

fn modulus_hex() -> &'static str {
    include_str!("webid/rsa_ee.modulus").trim()
}

fn profile(modulus: &str, exponent: &str) -> Vec<Triple> {
    vec![
        Triple::new(ALICE, CERT_KEY, "_:k1"),
        Triple::new("_:k1", CERT_MODULUS, format!("\"{}\"^^xsd:hexBinary", modulus)),
        Triple::new("_:k1", CERT_EXPONENT, format!("\"{}\"^^xsd:integer", exponent)),
    ]
}

fn validate_rsa_ee(triples: Vec<Triple>) -> Result<webid::ValidationResult, ValidationError> {
    let cert = webid::decode(RSA_EE).unwrap();
    webid::validate(&cert, |_| Ok::<_, ResolveError>(triples))
}

#[test]
fn profile_asserts_the_key() {
    let result = validate_rsa_ee(profile(modulus_hex(), "65537")).unwrap();
    assert_eq!(result.name, ALICE);
    assert!(result.valid);
}

#[test]
fn modulus_case_does_not_matter() {
    let lower = modulus_hex().to_ascii_lowercase();
    assert!(validate_rsa_ee(profile(&lower, "65537")).unwrap().valid);
}

#[test]
fn modulus_differs_in_one_digit() {
    let mut modulus = modulus_hex().to_owned();
    let last = modulus.pop().unwrap();
    modulus.push(if last == '0' { '1' } else { '0' });

    let result = validate_rsa_ee(profile(&modulus, "65537")).unwrap();
    assert_eq!(result.name, ALICE);
    assert!(!result.valid);
}

#[test]
fn exponent_differs() {
    let result = validate_rsa_ee(profile(modulus_hex(), "65539")).unwrap();
    assert_eq!(result.name, ALICE);
    assert!(!result.valid);
}

#[test]
fn empty_profile() {
    let result = validate_rsa_ee(Vec::new()).unwrap();
    assert_eq!(result.name, ALICE);
    assert!(!result.valid);
}

#[test]
fn resolver_sees_the_identity_once() {
    let cert = webid::decode(RSA_EE).unwrap();
    let calls = Cell::new(0);
    let result = webid::validate(&cert, |uri| {
        calls.set(calls.get() + 1);
        assert_eq!(uri, ALICE);
        Ok::<_, ResolveError>(profile(modulus_hex(), "65537"))
    })
    .unwrap();
    assert!(result.valid);
    assert_eq!(calls.get(), 1);
}

#[test]
fn resolver_failure() {
    let cert = webid::decode(RSA_EE).unwrap();
    let result = webid::validate(&cert, |_| -> Result<Vec<Triple>, ResolveError> {
        Err(ResolveError::fetch(io::Error::new(
            io::ErrorKind::TimedOut,
            "timed out",
        )))
    });
    assert!(matches!(
        result,
        Err(ValidationError::ResolveFailed(ResolveError::Fetch(_)))
    ));
}

#[test]
fn resolver_timeout() {
    let slow = Timeout::new(
        |_: &str, _: &Cancellation| {
            thread::sleep(Duration::from_secs(2));
            Ok::<_, ResolveError>(Vec::<Triple>::new())
        },
        Duration::from_millis(20),
    );
    let cert = webid::decode(RSA_EE).unwrap();
    let result = webid::validate(&cert, |uri| slow.resolve(uri));
    assert!(matches!(
        result,
        Err(ValidationError::ResolveFailed(ResolveError::TimedOut(_)))
    ));
}

#[test]
fn dns_name_first_has_no_identity() {
    let cert = webid::decode(include_bytes!("webid/rsa_dns_first.der")).unwrap();
    let result = webid::validate(&cert, |_| -> Result<Vec<Triple>, ResolveError> {
        unreachable!("the profile must not be fetched")
    });
    assert!(matches!(result, Err(ValidationError::NoIdentity)));
}

#[test]
fn dsa_is_not_validated() {
    let cert = webid::decode(include_bytes!("webid/dsa_ee.der")).unwrap();
    let result = webid::validate(&cert, |_| -> Result<Vec<Triple>, ResolveError> {
        unreachable!("the profile must not be fetched")
    });
    assert!(matches!(result, Err(ValidationError::UnsupportedKeyAlgorithm)));
}

fn alice_profile_resolver(
) -> Timeout<impl Fn(&str, &Cancellation) -> Result<Vec<Triple>, ResolveError>> {
    Timeout::with_default_limit(|uri: &str, _: &Cancellation| {
        assert_eq!(uri, ALICE);
        Ok::<_, ResolveError>(profile(modulus_hex(), "65537"))
    })
}

#[test]
fn peer_chain() {
    let intermediate: &[u8] = include_bytes!("webid/rsa_no_san.der");
    let chain = [RSA_EE, intermediate];
    let result = webid::validate_peer_chain(&chain, &alice_profile_resolver()).unwrap();
    assert_eq!(result.name, ALICE);
    assert!(result.valid);
}

#[test]
fn peer_chain_errors() {
    let resolver = alice_profile_resolver();

    let empty: [Vec<u8>; 0] = [];
    assert!(matches!(
        webid::validate_peer_chain(&empty, &resolver),
        Err(ValidationError::NoCertificate)
    ));

    let ecdsa = [include_bytes!("webid/ec_ee.der").to_vec()];
    assert!(matches!(
        webid::validate_peer_chain(&ecdsa, &resolver),
        Err(ValidationError::Decode(DecodeError::UnsupportedKeyAlgorithm))
    ));

    let garbage = [vec![0x30, 0x03, 0x02, 0x01]];
    assert!(matches!(
        webid::validate_peer_chain(&garbage, &resolver),
        Err(ValidationError::Decode(DecodeError::Malformed))
    ));
}

#[test]
fn peer_chain_with_stalled_profile_host() {
    let stalled = Timeout::new(
        |_: &str, cancel: &Cancellation| {
            while !cancel.is_cancelled() {
                thread::sleep(Duration::from_millis(1));
            }
            Err::<Vec<Triple>, _>(ResolveError::fetch(io::Error::new(
                io::ErrorKind::Interrupted,
                "cancelled",
            )))
        },
        Duration::from_millis(10),
    );

    for _ in 0..20 {
        assert!(matches!(
            webid::validate_peer_chain(&[RSA_EE], &stalled),
            Err(ValidationError::ResolveFailed(ResolveError::TimedOut(_)))
        ));
    }
    for _ in 0..500 {
        if stalled.in_flight() == 0 {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(stalled.in_flight(), 0);
}
