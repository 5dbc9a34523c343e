use crate::error::{Error, Result};
use num_rational::Rational32;
use num_traits::{CheckedMul, Signed, Zero};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Div, Mul};

/// A physical unit: a canonical dimension-exponent mapping plus an
/// absolute/delta flag.
///
/// Canonical form never stores a zero exponent, so two units are equal iff
/// their mappings and flags are equal. Values are immutable; every algebraic
/// operation returns a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Units {
    dims: BTreeMap<String, Rational32>,
    absolute: bool,
}

impl Units {
    /// Build a unit from a dimension-exponent mapping, dropping zero entries.
    pub fn new(dims: BTreeMap<String, Rational32>, absolute: bool) -> Self {
        let dims = dims.into_iter().filter(|(_, exp)| !exp.is_zero()).collect();
        Self { dims, absolute }
    }

    /// Convenience constructor from integer exponents, mostly for tests and
    /// registry setup.
    pub fn from_dims<'a, I>(dims: I, absolute: bool) -> Self
    where
        I: IntoIterator<Item = (&'a str, i32)>,
    {
        let dims = dims
            .into_iter()
            .filter(|(_, exp)| *exp != 0)
            .map(|(sym, exp)| (sym.to_string(), Rational32::from_integer(exp)))
            .collect();
        Self { dims, absolute }
    }

    /// The absolute dimensionless unit (plain numbers).
    pub fn dimensionless() -> Self {
        Self {
            dims: BTreeMap::new(),
            absolute: true,
        }
    }

    /// A single base dimension with exponent 1, absolute.
    pub fn base(symbol: &str) -> Self {
        Self::from_dims([(symbol, 1)], true)
    }

    /// Parse a unit string such as `"mm"`, `"m/s"`, `"m^2kg/s^2"` or
    /// `"delta mm"`. See the crate-level grammar notes.
    pub fn parsed_from(text: &str) -> Result<Self> {
        crate::parser::parse(text)
    }

    pub fn is_absolute(&self) -> bool {
        self.absolute
    }

    pub fn is_dimensionless(&self) -> bool {
        self.dims.is_empty()
    }

    /// The exponent recorded for `symbol`, zero if absent.
    pub fn exponent(&self, symbol: &str) -> Rational32 {
        self.dims.get(symbol).copied().unwrap_or_else(Rational32::zero)
    }

    pub fn dims(&self) -> impl Iterator<Item = (&str, Rational32)> {
        self.dims.iter().map(|(sym, exp)| (sym.as_str(), *exp))
    }

    /// The same unit with the delta flag set.
    pub fn into_delta(mut self) -> Self {
        self.absolute = false;
        self
    }

    /// Addition of quantities. Requires identical dimension mappings.
    /// The result is absolute if either operand is.
    pub fn checked_add(&self, other: &Units) -> Result<Units> {
        self.require_same_dimensions(other)?;
        Ok(Units {
            dims: self.dims.clone(),
            absolute: self.absolute || other.absolute,
        })
    }

    /// Subtraction of quantities. Requires identical dimension mappings.
    /// The flag is the XOR of the operand flags, which reproduces the whole
    /// point/vector table: absolute-absolute gives delta, mixed operands give
    /// absolute, delta-delta gives delta.
    pub fn checked_sub(&self, other: &Units) -> Result<Units> {
        self.require_same_dimensions(other)?;
        Ok(Units {
            dims: self.dims.clone(),
            absolute: self.absolute != other.absolute,
        })
    }

    /// Raise to a rational power: every exponent is scaled. The flag is
    /// unchanged. Fails if a scaled exponent overflows the representation.
    pub fn pow(&self, exponent: Rational32) -> Result<Units> {
        let mut dims = BTreeMap::new();
        for (symbol, exp) in &self.dims {
            let scaled = exp.checked_mul(&exponent).ok_or(Error::InvalidExponent)?;
            if !scaled.is_zero() {
                dims.insert(symbol.clone(), scaled);
            }
        }
        Ok(Units {
            dims,
            absolute: self.absolute,
        })
    }

    fn require_same_dimensions(&self, other: &Units) -> Result<()> {
        if self.dims != other.dims {
            return Err(Error::Incompatible {
                left: self.to_string(),
                right: other.to_string(),
            });
        }
        Ok(())
    }

    fn combined(&self, other: &Units, sign: i32) -> Units {
        let mut dims = self.dims.clone();
        let sign = Rational32::from_integer(sign);
        for (symbol, exp) in &other.dims {
            let entry = dims.entry(symbol.clone()).or_insert_with(Rational32::zero);
            *entry += *exp * sign;
            if entry.is_zero() {
                dims.remove(symbol);
            }
        }
        Units {
            dims,
            absolute: self.absolute && other.absolute,
        }
    }
}

impl<'a> Mul<&'a Units> for &Units {
    type Output = Units;

    fn mul(self, rhs: &'a Units) -> Units {
        self.combined(rhs, 1)
    }
}

impl Mul for Units {
    type Output = Units;

    fn mul(self, rhs: Units) -> Units {
        &self * &rhs
    }
}

impl<'a> Div<&'a Units> for &Units {
    type Output = Units;

    fn div(self, rhs: &'a Units) -> Units {
        self.combined(rhs, -1)
    }
}

impl Div for Units {
    type Output = Units;

    fn div(self, rhs: Units) -> Units {
        &self / &rhs
    }
}

impl fmt::Display for Units {
    /// Renders the canonical unit text: optional `delta` prefix, numerator
    /// factors, then a `/` denominator for negative exponents. Parsing the
    /// rendered text yields an equal value for integer exponents only: a
    /// fractional exponent produced by [`Units::pow`] renders as
    /// `numer/denom` (e.g. `m^1/2`), which the unit grammar cannot read
    /// back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        if !self.absolute {
            out.push_str("delta");
        }
        for (symbol, exp) in &self.dims {
            if exp.is_positive() {
                if !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(symbol);
                if *exp != Rational32::from_integer(1) {
                    out.push('^');
                    out.push_str(&exp.to_string());
                }
            }
        }
        let mut slash = false;
        for (symbol, exp) in &self.dims {
            if exp.is_negative() {
                if !slash {
                    out.push('/');
                    slash = true;
                } else {
                    out.push(' ');
                }
                out.push_str(symbol);
                let positive = -*exp;
                if positive != Rational32::from_integer(1) {
                    out.push('^');
                    out.push_str(&positive.to_string());
                }
            }
        }
        f.write_str(&out)
    }
}

/// Exact conversion of a decimal (e.g. a `**` exponent literal) to a
/// rational. Fails when the reduced fraction does not fit the exponent
/// representation.
pub fn rational_from_decimal(value: &Decimal) -> Result<Rational32> {
    let mut numer = value.mantissa();
    let mut denom = 10i128
        .checked_pow(value.scale())
        .ok_or(Error::InvalidExponent)?;
    let divisor = gcd(numer, denom);
    if divisor != 0 {
        numer /= divisor;
        denom /= divisor;
    }
    let numer = i32::try_from(numer).map_err(|_| Error::InvalidExponent)?;
    let denom = i32::try_from(denom).map_err(|_| Error::InvalidExponent)?;
    Ok(Rational32::new(numer, denom))
}

fn gcd(a: i128, b: i128) -> i128 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}
