#![forbid(unsafe_code)]

//! Dimensional units algebra for climate-statistic queries.
//!
//! A [`Units`] value is a canonical dimension-exponent mapping (no zero
//! exponents) plus an absolute/delta flag: a rainfall total is an *absolute*
//! quantity, the difference of two rainfall totals is a *delta*. The two
//! compose like points and vectors in an affine space.

mod error;
mod parser;
mod units;

pub use error::{Error, Result};
pub use units::{rational_from_decimal, Units};

// Exponents are exact rationals so that square roots of even powers round-trip.
pub use num_rational::Rational32;
