//! Parser for the unit text mini-language.
//!
//! Grammar: an optional leading delta marker (the word `delta`, any case, or
//! the `Δ` glyph) followed by a numerator segment and at most one `/`
//! denominator segment. Each segment is a sequence of `symbol[^exponent]`
//! factors separated by optional whitespace; `symbol` is one or more
//! alphabetic characters and `exponent` a signed integer defaulting to 1.
//! Repeated symbols sum, which also lets `m/m` cancel to dimensionless.

use crate::error::{Error, Result};
use crate::units::Units;
use num_rational::Rational32;
use num_traits::Zero;
use std::collections::BTreeMap;

pub fn parse(text: &str) -> Result<Units> {
    let chars: Vec<char> = text.chars().collect();
    let mut pos = 0;
    skip_whitespace(&chars, &mut pos);

    let absolute = !take_delta_marker(&chars, &mut pos);

    // At most one '/' splits numerator from denominator.
    let slash = chars[pos..].iter().position(|c| *c == '/').map(|i| pos + i);
    if let Some(first) = slash {
        if let Some(extra) = chars[first + 1..].iter().position(|c| *c == '/') {
            return Err(Error::Syntax {
                pos: first + 1 + extra,
                message: "more than one '/'",
            });
        }
    }

    let mut dims: BTreeMap<String, Rational32> = BTreeMap::new();
    let numerator_end = slash.unwrap_or(chars.len());
    parse_segment(&chars, pos, numerator_end, 1, &mut dims)?;
    if let Some(slash) = slash {
        parse_segment(&chars, slash + 1, chars.len(), -1, &mut dims)?;
    }

    Ok(Units::new(dims, absolute))
}

/// Consumes a leading `delta`/`Δ` marker, returning true if one was present.
fn take_delta_marker(chars: &[char], pos: &mut usize) -> bool {
    if chars.get(*pos) == Some(&'Δ') {
        *pos += 1;
        return true;
    }
    let mut end = *pos;
    while end < chars.len() && chars[end].is_alphabetic() {
        end += 1;
    }
    let word: String = chars[*pos..end].iter().collect();
    if word.eq_ignore_ascii_case("delta") {
        *pos = end;
        return true;
    }
    false
}

fn parse_segment(
    chars: &[char],
    mut pos: usize,
    end: usize,
    sign: i32,
    dims: &mut BTreeMap<String, Rational32>,
) -> Result<()> {
    loop {
        skip_whitespace_until(chars, &mut pos, end);
        if pos >= end {
            return Ok(());
        }
        if !chars[pos].is_alphabetic() {
            return Err(Error::Syntax {
                pos,
                message: "expected unit symbol",
            });
        }
        let start = pos;
        while pos < end && chars[pos].is_alphabetic() {
            pos += 1;
        }
        let symbol: String = chars[start..pos].iter().collect();

        let mut exponent = 1i32;
        if pos < end && chars[pos] == '^' {
            pos += 1;
            exponent = parse_exponent(chars, &mut pos, end)?;
        }

        let entry = dims.entry(symbol.clone()).or_insert_with(Rational32::zero);
        *entry += Rational32::from_integer(sign * exponent);
        if entry.is_zero() {
            dims.remove(&symbol);
        }
    }
}

fn parse_exponent(chars: &[char], pos: &mut usize, end: usize) -> Result<i32> {
    let start = *pos;
    if *pos < end && chars[*pos] == '-' {
        *pos += 1;
    }
    let digits_start = *pos;
    while *pos < end && chars[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == digits_start {
        return Err(Error::Syntax {
            pos: start,
            message: "expected integer exponent after '^'",
        });
    }
    let text: String = chars[start..*pos].iter().collect();
    text.parse::<i32>().map_err(|_| Error::Syntax {
        pos: start,
        message: "exponent out of range",
    })
}

fn skip_whitespace(chars: &[char], pos: &mut usize) {
    skip_whitespace_until(chars, pos, chars.len());
}

fn skip_whitespace_until(chars: &[char], pos: &mut usize, end: usize) {
    while *pos < end && chars[*pos].is_whitespace() {
        *pos += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_errors_carry_positions() {
        let err = parse("m?s").unwrap_err();
        assert_eq!(
            err,
            Error::Syntax {
                pos: 1,
                message: "expected unit symbol"
            }
        );

        let err = parse("m^x").unwrap_err();
        assert_eq!(
            err,
            Error::Syntax {
                pos: 2,
                message: "expected integer exponent after '^'"
            }
        );

        let err = parse("m/s/s").unwrap_err();
        assert!(matches!(err, Error::Syntax { pos: 3, .. }));
    }

    #[test]
    fn empty_text_is_dimensionless() {
        assert_eq!(parse("").unwrap(), Units::dimensionless());
        assert_eq!(parse("   ").unwrap(), Units::dimensionless());
    }

    #[test]
    fn repeated_symbols_sum() {
        assert_eq!(parse("m m^2").unwrap(), Units::from_dims([("m", 3)], true));
        assert_eq!(parse("m/m").unwrap(), Units::dimensionless());
    }
}
