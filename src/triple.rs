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

/// `cert:key`, linking a WebID to one of its keys.
pub const CERT_KEY: &str = "http://www.w3.org/ns/auth/cert#key";

/// `cert:modulus`, the hexadecimal RSA modulus of a key.
pub const CERT_MODULUS: &str = "http://www.w3.org/ns/auth/cert#modulus";

/// `cert:exponent`, the decimal RSA public exponent of a key.
pub const CERT_EXPONENT: &str = "http://www.w3.org/ns/auth/cert#exponent";

/// An RDF statement from a WebID profile.
///
/// All three terms are opaque strings compared for exact equality; no IRI
/// normalization is done.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Triple {
    /// The subject.
    pub subject: String,
    /// The predicate.
    pub predicate: String,
    /// The object, which may be a literal.
    pub object: String,
}

impl Triple {
    /// Constructs a triple.
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Returns the lexical form of an RDF literal object.
///
/// Quoted literals lose their quotes along with any datatype (`^^<iri>` or
/// `^^prefix:name`) or language tag that follows them, whatever its
/// spelling. Anything else is returned as-is. Surrounding whitespace is
/// trimmed in both cases.
pub fn lexical_form(object: &str) -> &str {
    let object = object.trim();
    let quote = match object.chars().next() {
        Some(quote @ ('"' | '\'')) => quote,
        _ => return object,
    };
    // Datatype IRIs and language tags never contain quotes, so the lexical
    // form ends at the last one.
    match object.rfind(quote) {
        Some(end) if end > 0 => object[..end]
            .trim_start_matches(quote)
            .trim_end_matches(quote)
            .trim(),
        _ => object,
    }
}
