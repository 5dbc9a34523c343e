use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid unit syntax at byte {pos}: {message}")]
    Syntax { pos: usize, message: &'static str },

    #[error("incompatible dimensions: '{left}' vs '{right}'")]
    Incompatible { left: String, right: String },

    #[error("exponent is not representable")]
    InvalidExponent,
}
