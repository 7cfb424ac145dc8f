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

use crate::der::{self, DottedOid, Sign, Tag};
use crate::DecodeError;
use std::fmt;
use tracing::debug;

/// An arbitrary-precision unsigned integer.
///
/// The value is held as its minimal big-endian magnitude, so two values are
/// equal exactly when the integers they represent are equal.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct UnsignedInteger(Box<[u8]>);

impl UnsignedInteger {
    /// Constructs the integer whose big-endian encoding is `bytes`. Leading
    /// zero bytes are ignored.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let first_nonzero = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
        Self(bytes[first_nonzero..].into())
    }

    /// Parses a base-16 string. Both letter cases are accepted; signs,
    /// prefixes and whitespace are not.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.as_bytes();
        if digits.is_empty() {
            return None;
        }
        let mut bytes = Vec::with_capacity((digits.len() + 1) / 2);
        // An odd number of digits has an implied leading zero.
        let (head, tail) = digits.split_at(digits.len() % 2);
        if let [digit] = head {
            bytes.push(hex_value(*digit)?);
        }
        for pair in tail.chunks_exact(2) {
            bytes.push((hex_value(pair[0])? << 4) | hex_value(pair[1])?);
        }
        Some(Self::from_be_bytes(&bytes))
    }

    /// The big-endian magnitude without leading zeros; empty for zero.
    pub fn as_be_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether this is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

fn hex_value(digit: u8) -> Option<u8> {
    match digit {
        b'0'..=b'9' => Some(digit - b'0'),
        b'a'..=b'f' => Some(digit - b'a' + 10),
        b'A'..=b'F' => Some(digit - b'A' + 10),
        _ => None,
    }
}

impl From<u64> for UnsignedInteger {
    fn from(value: u64) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl fmt::UpperHex for UnsignedInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_first() {
            None => f.write_str("0"),
            Some((first, rest)) => {
                write!(f, "{:X}", first)?;
                rest.iter().try_for_each(|b| write!(f, "{:02X}", b))
            }
        }
    }
}

impl fmt::LowerHex for UnsignedInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.split_first() {
            None => f.write_str("0"),
            Some((first, rest)) => {
                write!(f, "{:x}", first)?;
                rest.iter().try_for_each(|b| write!(f, "{:02x}", b))
            }
        }
    }
}

impl fmt::Debug for UnsignedInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UnsignedInteger(0x{:X})", self)
    }
}

/// An RSA public key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RsaPublicKey {
    /// The modulus `n`.
    pub modulus: UnsignedInteger,
    /// The public exponent `e`.
    pub exponent: u64,
}

/// A DSA public key together with its domain parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DsaPublicKey {
    /// The prime modulus.
    pub p: UnsignedInteger,
    /// The prime divisor of `p - 1`.
    pub q: UnsignedInteger,
    /// The generator.
    pub g: UnsignedInteger,
    /// The public value.
    pub y: UnsignedInteger,
}

/// The public key a certificate carries.
///
/// `Unknown` never compares successfully against anything a profile asserts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PublicKeyMaterial {
    /// An RSA key (rsaEncryption, 1.2.840.113549.1.1.1).
    Rsa(RsaPublicKey),
    /// A DSA key (id-dsa, 1.2.840.10040.4.1).
    Dsa(DsaPublicKey),
    /// A key of any other shape.
    Unknown,
}

const RSA_ENCRYPTION: &[u8] = &oid_1_2_840_113549![1, 1, 1];
const ID_DSA: &[u8] = &oid_1_2_840_10040![4, 1];

// SubjectPublicKeyInfo  ::=  SEQUENCE  {
//      algorithm            AlgorithmIdentifier,
//      subjectPublicKey     BIT STRING  }
//
// `spki` is the contents of the outer SEQUENCE.
pub(crate) fn parse_spki(spki: untrusted::Input) -> Result<PublicKeyMaterial, DecodeError> {
    spki.read_all(DecodeError::Malformed, |spki| {
        let (algorithm_id, parameters) = der::nested(spki, Tag::Sequence, |algorithm| {
            let algorithm_id = der::expect_tag_and_get_value(algorithm, Tag::OID)?;
            Ok((algorithm_id, algorithm.read_bytes_to_end()))
        })?;
        // The algorithm is rejected before its key is looked at.
        let algorithm = match algorithm_id.as_slice_less_safe() {
            RSA_ENCRYPTION => KeyAlgorithm::Rsa,
            ID_DSA => KeyAlgorithm::Dsa,
            other => {
                debug!(algorithm = %DottedOid(other), "unsupported public key algorithm");
                return Err(DecodeError::UnsupportedKeyAlgorithm);
            }
        };
        let key = der::bit_string_right_aligned(spki)?;

        match algorithm {
            KeyAlgorithm::Rsa => parse_rsa(&key).map(PublicKeyMaterial::Rsa),
            KeyAlgorithm::Dsa => parse_dsa(parameters, &key).map(PublicKeyMaterial::Dsa),
        }
    })
}

enum KeyAlgorithm {
    Rsa,
    Dsa,
}

// RSAPublicKey ::= SEQUENCE {
//     modulus           INTEGER,  -- n
//     publicExponent    INTEGER   -- e
// }
fn parse_rsa(key: &[u8]) -> Result<RsaPublicKey, DecodeError> {
    untrusted::Input::from(key).read_all(DecodeError::Malformed, |input| {
        der::nested(input, Tag::Sequence, |input| {
            let modulus = der::integer(input)?;
            let exponent = der::integer(input)?;
            let modulus = positive(modulus)?;
            let exponent = positive(exponent)?;
            if exponent.as_be_bytes().len() > 8 {
                return Err(DecodeError::Malformed);
            }
            let exponent = exponent
                .as_be_bytes()
                .iter()
                .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
            Ok(RsaPublicKey { modulus, exponent })
        })
    })
}

// The public value is a bare INTEGER; the domain parameters come from the
// algorithm identifier:
//
// Dss-Parms  ::=  SEQUENCE  {
//     p             INTEGER,
//     q             INTEGER,
//     g             INTEGER  }
fn parse_dsa(parameters: untrusted::Input, key: &[u8]) -> Result<DsaPublicKey, DecodeError> {
    let y = untrusted::Input::from(key).read_all(DecodeError::Malformed, der::integer)?;
    let (p, q, g) = parameters.read_all(DecodeError::Malformed, |input| {
        der::nested(input, Tag::Sequence, |input| {
            let p = der::integer(input)?;
            let q = der::integer(input)?;
            let g = der::integer(input)?;
            Ok((p, q, g))
        })
    })?;
    Ok(DsaPublicKey {
        p: positive(p)?,
        q: positive(q)?,
        g: positive(g)?,
        y: positive(y)?,
    })
}

fn positive((sign, magnitude): (Sign, &[u8])) -> Result<UnsignedInteger, DecodeError> {
    match sign {
        Sign::Positive => Ok(UnsignedInteger::from_be_bytes(magnitude)),
        Sign::Zero | Sign::Negative => Err(DecodeError::InvalidKeyParameters),
    }
}
