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

use crate::der::{self, Tag, CONTEXT_SPECIFIC};
use crate::DecodeError;

// GeneralName ::= CHOICE {
//      ...
//      uniformResourceIdentifier       [6]     IA5String,
//      ... }
const URI_TAG: u8 = CONTEXT_SPECIFIC | 6;

/// Extracts the WebID from the value of a subjectAltName extension.
///
/// Only the first GeneralName is considered. When it is not a URI the result
/// is the empty string, which is not a decoding error.
pub(crate) fn identity_uri(extn_value: untrusted::Input) -> Result<String, DecodeError> {
    extn_value.read_all(DecodeError::Malformed, |value| {
        der::nested(value, Tag::Sequence, |names| {
            // `read_tag_and_get_value` fails on an empty SEQUENCE, so there
            // is always at least one name.
            let (tag, first) = der::read_tag_and_get_value(names)?;
            while !names.at_end() {
                let _ = der::read_tag_and_get_value(names)?;
            }

            if tag != URI_TAG {
                return Ok(String::new());
            }
            let uri = first.as_slice_less_safe();
            if !uri.is_ascii() {
                return Err(DecodeError::Malformed); // Not an IA5String.
            }
            Ok(uri.iter().map(|b| char::from(*b)).collect())
        })
    })
}
