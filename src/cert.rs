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

use crate::der::{self, Sign, Tag, CONTEXT_SPECIFIC};
use crate::public_key::{self, PublicKeyMaterial};
use crate::{san, DecodeError};

/// The parts of a peer certificate that WebID-TLS needs: the claimed identity
/// and the public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedCertificate {
    identity_uri: String,
    public_key: PublicKeyMaterial,
}

impl DecodedCertificate {
    /// Constructs a `DecodedCertificate` from parts obtained elsewhere.
    pub fn new(identity_uri: impl Into<String>, public_key: PublicKeyMaterial) -> Self {
        Self {
            identity_uri: identity_uri.into(),
            public_key,
        }
    }

    /// The first Subject Alternative Name if it is a URI; otherwise empty.
    pub fn identity_uri(&self) -> &str {
        &self.identity_uri
    }

    /// The subject public key.
    pub fn public_key(&self) -> &PublicKeyMaterial {
        &self.public_key
    }
}

/// Decodes a DER-encoded X.509 certificate into its WebID and public key.
///
/// The certificate structure is parsed from scratch. Nothing about the
/// certificate is validated beyond its encoding: signatures, validity
/// periods, and extension criticality are all ignored. A certificate without
/// a subjectAltName extension decodes with an empty identity.
pub fn decode(cert_der: &[u8]) -> Result<DecodedCertificate, DecodeError> {
    // Certificate  ::=  SEQUENCE  {
    //      tbsCertificate       TBSCertificate,
    //      signatureAlgorithm   AlgorithmIdentifier,
    //      signatureValue       BIT STRING  }
    let tbs = untrusted::Input::from(cert_der).read_all(DecodeError::Malformed, |cert_der| {
        der::nested(cert_der, Tag::Sequence, |certificate| {
            let tbs = der::expect_tag_and_get_value(certificate, Tag::Sequence)?;
            let _signature_algorithm = der::expect_tag_and_get_value(certificate, Tag::Sequence)?;
            let _signature_value = der::bit_string_right_aligned(certificate)?;
            Ok(tbs)
        })
    })?;

    let (spki, subject_alt_name) = tbs.read_all(DecodeError::Malformed, |tbs| {
        version(tbs)?;
        // Any serial number is accepted, including zero and negative ones
        // that real-world certificates carry.
        let _serial_number = der::integer(tbs)?;

        let _signature = der::expect_tag_and_get_value(tbs, Tag::Sequence)?;
        let _issuer = der::expect_tag_and_get_value(tbs, Tag::Sequence)?;
        let _validity = der::expect_tag_and_get_value(tbs, Tag::Sequence)?;
        let _subject = der::expect_tag_and_get_value(tbs, Tag::Sequence)?;
        let spki = der::expect_tag_and_get_value(tbs, Tag::Sequence)?;

        let _issuer_unique_id = der::optional_tag_and_get_value(tbs, CONTEXT_SPECIFIC | 1)?;
        let _subject_unique_id = der::optional_tag_and_get_value(tbs, CONTEXT_SPECIFIC | 2)?;

        let mut subject_alt_name = None;
        if tbs.peek(Tag::ContextSpecificConstructed3.into()) {
            der::nested(tbs, Tag::ContextSpecificConstructed3, |tagged| {
                der::nested_of_mut(tagged, Tag::Sequence, Tag::Sequence, |extension| {
                    let extn_id = der::expect_tag_and_get_value(extension, Tag::OID)?;
                    let _critical = der::optional_boolean(extension)?;
                    let extn_value = der::expect_tag_and_get_value(extension, Tag::OctetString)?;
                    remember_extension(&mut subject_alt_name, extn_id, extn_value)
                })
            })?;
        }

        Ok((spki, subject_alt_name))
    })?;

    let identity_uri = match subject_alt_name {
        Some(extn_value) => san::identity_uri(extn_value)?,
        None => String::new(),
    };
    let public_key = public_key::parse_spki(spki)?;

    Ok(DecodedCertificate {
        identity_uri,
        public_key,
    })
}

// Version  ::=  INTEGER  {  v1(0), v2(1), v3(2)  }
//
// The field is `[0] EXPLICIT Version DEFAULT v1`. Like mozilla::pkix we also
// accept the incorrect explicit encoding of v1.
fn version(input: &mut untrusted::Reader) -> Result<(), DecodeError> {
    if !input.peek(Tag::ContextSpecificConstructed0.into()) {
        return Ok(());
    }
    der::nested(input, Tag::ContextSpecificConstructed0, |input| {
        match der::integer(input)? {
            (Sign::Zero, _) | (Sign::Positive, [1]) | (Sign::Positive, [2]) => Ok(()),
            _ => Err(DecodeError::Malformed),
        }
    })
}

fn remember_extension<'a>(
    subject_alt_name: &mut Option<untrusted::Input<'a>>,
    extn_id: untrusted::Input<'a>,
    value: untrusted::Input<'a>,
) -> Result<(), DecodeError> {
    const ID_CE_SUBJECT_ALT_NAME: &[u8] = &oid![2, 5, 29, 17];

    // Every other extension is ignored, critical or not.
    if extn_id.as_slice_less_safe() != ID_CE_SUBJECT_ALT_NAME {
        return Ok(());
    }
    // The certificate contains more than one instance of this extension.
    if subject_alt_name.replace(value).is_some() {
        return Err(DecodeError::Malformed);
    }
    Ok(())
}
