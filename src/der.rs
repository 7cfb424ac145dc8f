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

use crate::DecodeError;
use std::borrow::Cow;
use std::fmt;

pub(crate) const CONSTRUCTED: u8 = 1 << 5;
pub(crate) const CONTEXT_SPECIFIC: u8 = 2 << 6;

#[derive(Clone, Copy, PartialEq)]
#[repr(u8)]
pub(crate) enum Tag {
    Boolean = 0x01,
    Integer = 0x02,
    BitString = 0x03,
    OctetString = 0x04,
    OID = 0x06,
    Sequence = CONSTRUCTED | 0x10, // 0x30

    ContextSpecificConstructed0 = CONTEXT_SPECIFIC | CONSTRUCTED,
    ContextSpecificConstructed3 = CONTEXT_SPECIFIC | CONSTRUCTED | 3,
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> Self {
        tag as Self
    }
}

pub(crate) fn expect_tag_and_get_value<'a>(
    input: &mut untrusted::Reader<'a>,
    tag: Tag,
) -> Result<untrusted::Input<'a>, DecodeError> {
    let (actual_tag, inner) = read_tag_and_get_value(input)?;
    if u8::from(tag) != actual_tag {
        return Err(DecodeError::Malformed);
    }
    Ok(inner)
}

/// Reads the value tagged `tag` if it is the next thing in `input`.
pub(crate) fn optional_tag_and_get_value<'a>(
    input: &mut untrusted::Reader<'a>,
    tag: u8,
) -> Result<Option<untrusted::Input<'a>>, DecodeError> {
    if !input.peek(tag) {
        return Ok(None);
    }
    let (_, inner) = read_tag_and_get_value(input)?;
    Ok(Some(inner))
}

pub(crate) fn read_tag_and_get_value<'a>(
    input: &mut untrusted::Reader<'a>,
) -> Result<(u8, untrusted::Input<'a>), DecodeError> {
    let tag = input.read_byte()?;
    if (tag & 0x1F) == 0x1F {
        return Err(DecodeError::Malformed); // High tag number form is not allowed.
    }

    // If the high order bit of the first byte is set to zero then the length
    // is encoded in the seven remaining bits of that byte. Otherwise, those
    // seven bits represent the number of bytes used to encode the length.
    let length = match input.read_byte()? {
        n if (n & 0x80) == 0 => usize::from(n),
        0x81 => {
            let second_byte = input.read_byte()?;
            if second_byte < 128 {
                return Err(DecodeError::Malformed); // Not the canonical encoding.
            }
            usize::from(second_byte)
        }
        0x82 => {
            let second_byte = usize::from(input.read_byte()?);
            let third_byte = usize::from(input.read_byte()?);
            let combined = (second_byte << 8) | third_byte;
            if combined < 256 {
                return Err(DecodeError::Malformed); // Not the canonical encoding.
            }
            combined
        }
        0x83 => {
            let second_byte = usize::from(input.read_byte()?);
            let third_byte = usize::from(input.read_byte()?);
            let fourth_byte = usize::from(input.read_byte()?);
            let combined = (second_byte << 16) | (third_byte << 8) | fourth_byte;
            if combined < 0x1_00_00 {
                return Err(DecodeError::Malformed); // Not the canonical encoding.
            }
            combined
        }
        _ => {
            // Indefinite lengths and lengths of 16MB or more are rejected.
            return Err(DecodeError::Malformed);
        }
    };

    // `read_bytes` bounds-checks `length` against what is left of the input.
    let inner = input.read_bytes(length)?;
    Ok((tag, inner))
}

pub(crate) fn nested<'a, F, R>(
    input: &mut untrusted::Reader<'a>,
    tag: Tag,
    decoder: F,
) -> Result<R, DecodeError>
where
    F: FnOnce(&mut untrusted::Reader<'a>) -> Result<R, DecodeError>,
{
    let inner = expect_tag_and_get_value(input, tag)?;
    inner.read_all(DecodeError::Malformed, decoder)
}

pub(crate) fn nested_of_mut<'a, F>(
    input: &mut untrusted::Reader<'a>,
    outer_tag: Tag,
    inner_tag: Tag,
    mut decoder: F,
) -> Result<(), DecodeError>
where
    F: FnMut(&mut untrusted::Reader<'a>) -> Result<(), DecodeError>,
{
    nested(input, outer_tag, |outer| loop {
        nested(outer, inner_tag, |inner| decoder(inner))?;
        if outer.at_end() {
            break Ok(());
        }
    })
}

// Like mozilla::pkix, we accept the non-conformant explicit encoding of
// the default value (false) for compatibility with real-world certificates.
pub(crate) fn optional_boolean(input: &mut untrusted::Reader) -> Result<bool, DecodeError> {
    if !input.peek(Tag::Boolean.into()) {
        return Ok(false);
    }
    nested(input, Tag::Boolean, |input| match input.read_byte() {
        Ok(0xff) => Ok(true),
        Ok(0x00) => Ok(false),
        _ => Err(DecodeError::Malformed),
    })
}

/// Reads a BIT STRING and returns its bits right-aligned to a byte boundary.
///
/// A key carried in a BIT STRING has to be right-aligned before it can be
/// reinterpreted as DER. When there are no unused bits the contents are
/// borrowed as-is.
pub(crate) fn bit_string_right_aligned<'a>(
    input: &mut untrusted::Reader<'a>,
) -> Result<Cow<'a, [u8]>, DecodeError> {
    nested(input, Tag::BitString, |value| {
        let unused_bits = value.read_byte()?;
        let bits = value.read_bytes_to_end().as_slice_less_safe();
        right_align(unused_bits, bits)
    })
}

fn right_align(unused_bits: u8, bits: &[u8]) -> Result<Cow<'_, [u8]>, DecodeError> {
    if unused_bits == 0 {
        return Ok(Cow::Borrowed(bits));
    }
    if unused_bits > 7 {
        return Err(DecodeError::Malformed);
    }
    let last = match bits.last() {
        Some(last) => *last,
        None => return Err(DecodeError::Malformed), // Unused bits in an empty string.
    };
    // DER requires the padding bits to be zero.
    if last & ((1u8 << unused_bits) - 1) != 0 {
        return Err(DecodeError::Malformed);
    }

    let mut aligned = Vec::with_capacity(bits.len());
    let mut carry = 0u8;
    for &byte in bits {
        aligned.push(carry | (byte >> unused_bits));
        carry = byte << (8 - unused_bits);
    }
    Ok(Cow::Owned(aligned))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Sign {
    Negative,
    Zero,
    Positive,
}

/// Reads an INTEGER, returning its sign and its big-endian magnitude without
/// leading zero bytes. The magnitude is meaningless for negative values.
pub(crate) fn integer<'a>(
    input: &mut untrusted::Reader<'a>,
) -> Result<(Sign, &'a [u8]), DecodeError> {
    let value = expect_tag_and_get_value(input, Tag::Integer)?.as_slice_less_safe();
    match value {
        [] => Err(DecodeError::Malformed),
        // Reject non-minimal encodings.
        [0x00, next, ..] if next & 0x80 == 0 => Err(DecodeError::Malformed),
        [0xff, next, ..] if next & 0x80 != 0 => Err(DecodeError::Malformed),
        [first, ..] if first & 0x80 != 0 => Ok((Sign::Negative, value)),
        [0x00] => Ok((Sign::Zero, &value[1..])),
        [0x00, rest @ ..] => Ok((Sign::Positive, rest)),
        _ => Ok((Sign::Positive, value)),
    }
}

/// Formats DER-encoded OID contents in dotted-decimal form.
pub(crate) struct DottedOid<'a>(pub(crate) &'a [u8]);

impl fmt::Display for DottedOid<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        let mut arc: u64 = 0;
        for &byte in self.0 {
            arc = match arc.checked_mul(128) {
                Some(shifted) => shifted | u64::from(byte & 0x7f),
                None => return f.write_str("<oversized arc>"),
            };
            if byte & 0x80 != 0 {
                continue;
            }
            if first {
                let (x, y) = match arc {
                    0..=39 => (0, arc),
                    40..=79 => (1, arc - 40),
                    _ => (2, arc - 80),
                };
                write!(f, "{}.{}", x, y)?;
                first = false;
            } else {
                write!(f, ".{}", arc)?;
            }
            arc = 0;
        }
        Ok(())
    }
}

macro_rules! oid {
    ( $first:expr, $second:expr, $( $tail:expr ),* ) =>
    (
        [(40 * $first) + $second, $( $tail ),*]
    )
}

macro_rules! oid_1_2_840_113549 {
    ( $( $tail:expr ),* ) =>
    (
        oid![1, 2,
             0x86, 0x48, // 840
             0x86, 0xf7, 0x0d, // 113549
             $( $tail ),* ]
    )
}

macro_rules! oid_1_2_840_10040 {
    ( $( $tail:expr ),* ) =>
    (
        oid![1, 2,
             0x86, 0x48, // 840
             0xce, 0x38, // 10040
             $( $tail ),* ]
    )
}
