//! Error kinds surfaced by the workflow operations.
//!
//! A transition that matches no role, or whose status guard fails, is not an
//! error: the operation succeeds and the record is written back unchanged.

/// Draft validation failures raised before a contract record is built.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is missing a user id")]
    MissingPartyId(&'static str),
    #[error("contract has no trade lines")]
    NoTradeLines,
    #[error("trade line `{0}` has a non-positive total amount")]
    NonPositiveAmount(String),
    #[error("delivery details are missing")]
    MissingDeliveryDetails,
    #[error("payment duration must be within {min}..={max} days, got {got}")]
    PaymentDurationOutOfRange { min: u32, max: u32, got: u32 },
    #[error("transport duration must be within {min}..={max} days, got {got}")]
    TransportDurationOutOfRange { min: u32, max: u32, got: u32 },
    #[error("delivery date must fall {min}..={max} days after creation, got {got}")]
    DeliveryDateOutOfRange { min: i64, max: i64, got: i64 },
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("incorrect number of arguments for {operation}: need {expected}, got {got}")]
    InvalidArgumentCount {
        operation: String,
        expected: usize,
        got: usize,
    },
    #[error("record not found: {0}")]
    NotFound(String),
    #[error("ledger storage failure: {0}")]
    Storage(String),
    #[error("malformed record: {0}")]
    Malformed(String),
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("invalid contract draft: {0}")]
    Validation(#[from] ValidationError),
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        Error::Storage(err.to_string())
    }
}

impl From<minicbor::decode::Error> for Error {
    fn from(err: minicbor::decode::Error) -> Self {
        Error::Malformed(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Malformed(err.to_string())
    }
}
