// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Strict Number Parsing
//!
//! Whitespace-separated real numbers, as they appear in parameter fields
//! (`<translation>1 2 3</translation>`) and in OBJ vertex records
//! (`v 1.0 2.0 3.0`). Every token must be a complete number; partial
//! prefixes such as `3abc` are rejected.

/// Parse one complete token as `f64`
#[inline]
pub fn parse_real(token: &[u8]) -> Option<f64> {
    match fast_float::parse_partial::<f64, _>(token) {
        Ok((value, consumed)) if consumed == token.len() && consumed > 0 => Some(value),
        _ => None,
    }
}

/// Iterate over whitespace-separated tokens
#[inline]
pub fn tokens(bytes: &[u8]) -> impl Iterator<Item = &[u8]> {
    bytes
        .split(|b| b.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
}

/// Parse exactly `N` reals from a whitespace-separated field
///
/// Returns `None` when the field holds fewer or more than `N` tokens, or
/// when any token is not a number.
pub fn parse_exact_reals<const N: usize>(text: &str) -> Option<[f64; N]> {
    let mut values = [0.0; N];
    let mut count = 0;

    for token in tokens(text.as_bytes()) {
        if count == N {
            return None;
        }
        values[count] = parse_real(token)?;
        count += 1;
    }

    (count == N).then_some(values)
}

/// Parse the first `N` reals from a token stream, ignoring what follows
pub fn parse_leading_reals<'a, const N: usize>(
    mut tokens: impl Iterator<Item = &'a [u8]>,
) -> Option<[f64; N]> {
    let mut values = [0.0; N];
    for value in values.iter_mut() {
        *value = parse_real(tokens.next()?)?;
    }
    Some(values)
}
