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

use serde::Deserialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use webid::{Cancellation, ResolveError, Timeout, Triple, ValidationError};

#[test]
pub fn scenarios() {
    // RUST_LOG=webid=debug shows each step of a failing case.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let raw_json = include_bytes!("webid/scenarios.json");
    let table: ScenarioTable = serde_json::from_slice(raw_json).expect("invalid test JSON");
    println!("Testing scenario table revision {:?}", table.revision);

    let modulus = include_str!("webid/rsa_ee.modulus").trim();

    for scenario in &table.scenarios {
        println!("Testing scenario {:?}", scenario.id);

        let cert_der = scenario.certificate_der();
        let triples = scenario
            .triples
            .iter()
            .map(|[s, p, o]| Triple::new(s.as_str(), p.as_str(), o.replace("{modulus}", modulus)))
            .collect::<Vec<_>>();

        let resolver = Timeout::with_default_limit(move |_: &str, _: &Cancellation| {
            Ok::<_, ResolveError>(triples.clone())
        });
        let result = webid::validate_peer_chain(&[cert_der], &resolver);

        match scenario.expected {
            Expected::Valid => assert!(
                matches!(result, Ok(ref r) if r.valid),
                "{}: expected a valid result, got {:?}",
                scenario.id,
                result
            ),
            Expected::Invalid => assert!(
                matches!(result, Ok(ref r) if !r.valid),
                "{}: expected an invalid result, got {:?}",
                scenario.id,
                result
            ),
            Expected::NoIdentity => assert!(
                matches!(result, Err(ValidationError::NoIdentity)),
                "{}: got {:?}",
                scenario.id,
                result
            ),
            Expected::UnsupportedKeyAlgorithm => assert!(
                matches!(result, Err(ValidationError::UnsupportedKeyAlgorithm)),
                "{}: got {:?}",
                scenario.id,
                result
            ),
            Expected::InvalidAssertedKey => assert!(
                matches!(result, Err(ValidationError::InvalidAssertedKey)),
                "{}: got {:?}",
                scenario.id,
                result
            ),
            Expected::DecodeError => assert!(
                matches!(result, Err(ValidationError::Decode(_))),
                "{}: got {:?}",
                scenario.id,
                result
            ),
        }
    }
}

#[derive(Deserialize, Debug)]
struct ScenarioTable {
    revision: String,
    scenarios: Vec<Scenario>,
}

#[derive(Deserialize, Debug)]
struct Scenario {
    id: String,
    certificate: String,
    triples: Vec<[String; 3]>,
    expected: Expected,
}

impl Scenario {
    fn certificate_der(&self) -> Vec<u8> {
        let dir = env!("CARGO_MANIFEST_DIR");
        let path: PathBuf = [dir, "tests", "webid", self.certificate.as_str()]
            .iter()
            .collect();
        std::fs::read(&path).unwrap_or_else(|e| panic!("reading {}: {}", path.display(), e))
    }
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum Expected {
    Valid,
    Invalid,
    NoIdentity,
    UnsupportedKeyAlgorithm,
    InvalidAssertedKey,
    DecodeError,
}
