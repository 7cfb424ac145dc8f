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

use crate::public_key::{PublicKeyMaterial, RsaPublicKey, UnsignedInteger};
use crate::triple::{lexical_form, Triple, CERT_EXPONENT, CERT_KEY, CERT_MODULUS};
use crate::{decode, Cancellation, DecodedCertificate, ResolveError, Timeout, ValidationError};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// The outcome of a WebID-TLS check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationResult {
    /// The certificate's identity URI, whatever the outcome.
    pub name: String,
    /// Whether the profile asserts the certificate's key.
    pub valid: bool,
}

/// Checks that the WebID profile of `decoded` asserts the certificate's key.
///
/// `resolve_identity` fetches and parses the profile at a URI; it is called
/// exactly once, and the triples it returns are consumed in a single pass.
/// The first `cert:key` of the identity selects the key node whose
/// `cert:modulus` and `cert:exponent` must equal the certificate's RSA key.
///
/// A profile that asserts nothing, or asserts a different key, yields
/// `valid: false` rather than an error. Only RSA keys can be validated; DSA
/// keys are decoded but rejected here.
///
/// There is no timeout on `resolve_identity` itself. On the handshake path
/// use [`validate_peer_chain`], which only accepts a [`Timeout`].
pub fn validate<F, I>(
    decoded: &DecodedCertificate,
    resolve_identity: F,
) -> Result<ValidationResult, ValidationError>
where
    F: FnOnce(&str) -> Result<I, ResolveError>,
    I: IntoIterator<Item = Triple>,
{
    let identity = decoded.identity_uri();
    if identity.is_empty() {
        return Err(ValidationError::NoIdentity);
    }
    let key = match decoded.public_key() {
        PublicKeyMaterial::Rsa(key) => key,
        PublicKeyMaterial::Dsa(_) | PublicKeyMaterial::Unknown => {
            return Err(ValidationError::UnsupportedKeyAlgorithm);
        }
    };

    debug!(identity, "resolving WebID profile");
    let triples = resolve_identity(identity).map_err(|e| {
        warn!(identity, error = %e, "WebID profile resolution failed");
        ValidationError::ResolveFailed(e)
    })?;

    let valid = match asserted_key(identity, triples) {
        Some(asserted) => asserted.matches(key)?,
        None => false,
    };
    info!(identity, valid, "checked WebID key assertion");

    Ok(ValidationResult {
        name: identity.to_owned(),
        valid,
    })
}

/// Validates the end-entity certificate of a peer's certificate chain.
///
/// Only `chain[0]` is looked at. This is the entry point for a TLS
/// handshake callback, so the profile is always fetched through `resolver`
/// and its time and concurrency limits.
pub fn validate_peer_chain<C, F, I>(
    chain: &[C],
    resolver: &Timeout<F>,
) -> Result<ValidationResult, ValidationError>
where
    C: AsRef<[u8]>,
    F: Fn(&str, &Cancellation) -> Result<I, ResolveError> + Send + Sync + 'static,
    I: IntoIterator<Item = Triple>,
{
    let end_entity = chain.first().ok_or(ValidationError::NoCertificate)?;
    let decoded = decode(end_entity.as_ref())?;
    validate(&decoded, |identity| resolver.resolve(identity))
}

#[derive(Default)]
struct KeyAssertion {
    modulus: Option<String>,
    exponent: Option<String>,
}

impl KeyAssertion {
    fn matches(&self, key: &RsaPublicKey) -> Result<bool, ValidationError> {
        let (modulus, exponent) = match (&self.modulus, &self.exponent) {
            (Some(modulus), Some(exponent)) => (modulus, exponent),
            _ => return Ok(false),
        };
        let modulus = UnsignedInteger::from_hex(lexical_form(modulus))
            .ok_or(ValidationError::InvalidAssertedKey)?;
        let exponent_matches = decimal_equals(lexical_form(exponent), key.exponent)?;

        Ok(modulus == key.modulus && exponent_matches)
    }
}

// Compares a signed decimal integer of any size with `value`.
fn decimal_equals(decimal: &str, value: u64) -> Result<bool, ValidationError> {
    let (negative, digits) = match decimal.as_bytes().first() {
        Some(b'-') => (true, &decimal[1..]),
        Some(b'+') => (false, &decimal[1..]),
        _ => (false, decimal),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAssertedKey);
    }
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(value == 0);
    }
    Ok(!negative && digits == value.to_string())
}

enum Slot {
    Modulus,
    Exponent,
}

// The key node may be named before or after its modulus and exponent, so
// values are kept per subject until the scan is over. Once the key node is
// known, values for other subjects are dropped.
fn asserted_key(
    identity: &str,
    triples: impl IntoIterator<Item = Triple>,
) -> Option<KeyAssertion> {
    let mut key_node: Option<String> = None;
    let mut assertions: HashMap<String, KeyAssertion> = HashMap::new();

    for Triple {
        subject,
        predicate,
        object,
    } in triples
    {
        let slot = match predicate.as_str() {
            CERT_KEY => {
                if key_node.is_none() && subject == identity {
                    debug!(identity, key_node = %object, "found WebID key node");
                    key_node = Some(object);
                }
                continue;
            }
            CERT_MODULUS => Slot::Modulus,
            CERT_EXPONENT => Slot::Exponent,
            _ => continue,
        };
        if matches!(&key_node, Some(node) if *node != subject) {
            continue;
        }
        let assertion = assertions.entry(subject).or_default();
        let value = match slot {
            Slot::Modulus => &mut assertion.modulus,
            Slot::Exponent => &mut assertion.exponent,
        };
        // First assertion wins.
        if value.is_none() {
            *value = Some(object);
        }
    }

    assertions.remove(&key_node?)
}
