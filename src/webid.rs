// Copyright 2015 Brian Smith.
// Portions Copyright 2026 The webid Authors.
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

//! WebID-TLS peer authentication.
//!
//! A WebID-TLS client presents a self-signed certificate whose first Subject
//! Alternative Name is a URI, its WebID. The peer is authenticated as that
//! WebID when the RDF profile published at the URI asserts the same public
//! key the certificate carries.
//!
//! This crate does the two parts of that check that need care:
//!
//! * [`decode`] parses the DER certificate from scratch to get the WebID and
//!   the full RSA or DSA key parameters;
//! * [`validate`] compares the key against the `cert:key` assertions in the
//!   profile's triples.
//!
//! Fetching and parsing the profile is left to the caller, who passes it in
//! as a function from URI to triples. That function may block on the
//! network, so [`validate_peer_chain`], the handshake entry point, only
//! takes it wrapped in a [`Timeout`].
//!
//! Every error means "not authenticated"; so does `valid: false`.
//!
//! ```
//! use webid::{DecodedCertificate, PublicKeyMaterial, ResolveError, RsaPublicKey, Triple,
//!             UnsignedInteger, CERT_EXPONENT, CERT_KEY, CERT_MODULUS};
//!
//! let me = "https://alice.example/profile#me";
//! let cert = DecodedCertificate::new(me, PublicKeyMaterial::Rsa(RsaPublicKey {
//!     modulus: UnsignedInteger::from_hex("AB12").unwrap(),
//!     exponent: 65537,
//! }));
//! let profile = vec![
//!     Triple::new(me, CERT_KEY, "_:k1"),
//!     Triple::new("_:k1", CERT_MODULUS, "\"AB12\"^^xsd:hexBinary"),
//!     Triple::new("_:k1", CERT_EXPONENT, "\"65537\"^^xsd:integer"),
//! ];
//!
//! let result = webid::validate(&cert, |_uri| Ok::<_, ResolveError>(profile)).unwrap();
//! assert_eq!(result.name, me);
//! assert!(result.valid);
//! ```

#![deny(missing_docs, trivial_casts, trivial_numeric_casts, unreachable_pub)]
#![forbid(unsafe_code)]

#[macro_use]
mod der;

mod cert;
mod error;
mod public_key;
mod resolve;
mod san;
mod triple;
mod validate;

pub use cert::{decode, DecodedCertificate};
pub use error::{DecodeError, ResolveError, ValidationError};
pub use public_key::{DsaPublicKey, PublicKeyMaterial, RsaPublicKey, UnsignedInteger};
pub use resolve::{Cancellation, Timeout, DEFAULT_MAX_IN_FLIGHT, DEFAULT_RESOLVE_TIMEOUT};
pub use triple::{lexical_form, Triple, CERT_EXPONENT, CERT_KEY, CERT_MODULUS};
pub use validate::{validate, validate_peer_chain, ValidationResult};
