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

use std::time::Duration;
use thiserror::Error;

/// An error that occurs while decoding a certificate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The certificate is not valid DER, or it does not have the structure of
    /// an X.509 certificate, at some nesting level.
    #[error("malformed certificate encoding")]
    Malformed,

    /// The subject public key algorithm is neither RSA nor DSA.
    #[error("unsupported public key algorithm")]
    UnsupportedKeyAlgorithm,

    /// A key parameter or public value is zero or negative.
    #[error("zero or negative public key parameter")]
    InvalidKeyParameters,
}

impl From<untrusted::EndOfInput> for DecodeError {
    fn from(_: untrusted::EndOfInput) -> Self {
        DecodeError::Malformed
    }
}

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// An error reported by an identity resolver.
///
/// Fetch and parse failures are kept apart from each other, and both are
/// distinct from a profile that resolves to no triples at all.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The profile document could not be retrieved.
    #[error("fetching the WebID profile failed: {0}")]
    Fetch(#[source] BoxError),

    /// The profile document was retrieved but is not valid RDF.
    #[error("parsing the WebID profile failed: {0}")]
    Parse(#[source] BoxError),

    /// The resolver did not answer within the time limit.
    #[error("resolving the WebID profile timed out after {0:?}")]
    TimedOut(Duration),

    /// Too many resolutions are already running; nothing was started.
    #[error("{0} WebID profile resolutions are already in flight")]
    TooManyInFlight(usize),

    /// The resolver stopped without producing an answer.
    #[error("the WebID profile resolver stopped without answering")]
    Aborted,
}

impl ResolveError {
    /// Wraps a retrieval failure.
    pub fn fetch(cause: impl Into<BoxError>) -> Self {
        Self::Fetch(cause.into())
    }

    /// Wraps an RDF parse failure.
    pub fn parse(cause: impl Into<BoxError>) -> Self {
        Self::Parse(cause.into())
    }
}

/// An error that prevents a WebID-TLS verdict from being reached.
///
/// Every variant means the peer is not authenticated.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// The peer presented no certificate.
    #[error("no peer certificate was presented")]
    NoCertificate,

    /// The peer certificate could not be decoded.
    #[error("decoding the peer certificate failed: {0}")]
    Decode(#[from] DecodeError),

    /// The certificate carries no URI Subject Alternative Name.
    #[error("the certificate does not name a WebID")]
    NoIdentity,

    /// Key assertions cannot be compared against the certificate's key type.
    #[error("unsupported public key algorithm for WebID validation")]
    UnsupportedKeyAlgorithm,

    /// The profile asserts a modulus or exponent that is not a number.
    #[error("the WebID profile asserts an unparseable key")]
    InvalidAssertedKey,

    /// The identity resolver failed.
    #[error("resolving the WebID profile failed: {0}")]
    ResolveFailed(#[source] ResolveError),
}
