use crate::disc::msf::Msf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DiscError {
    #[error("Invalid MSF format: {0}")]
    InvalidMsfFormat(String),

    #[error("Negative length between {from} and {to}")]
    NegativeLength { from: Msf, to: Msf },
}

pub type DiscResult<T> = Result<T, DiscError>;
