use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid hex in field {field}")]
    InvalidHex { field: String },

    #[error("block hash must be 32 bytes, got {got}")]
    InvalidHashLength { got: usize },

    #[error("block hash for height {height} already recorded")]
    HashAlreadyRecorded { height: u64 },

    #[error("height {height} is not below the current block {current}")]
    HeightNotPast { height: u64, current: u64 },
}
