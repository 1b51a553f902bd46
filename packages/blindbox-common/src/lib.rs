pub mod interfaces;
pub mod token_id;

pub use interfaces::{
    BlockhashOracleQueryMsg, CollectibleExecuteMsg, CollectibleQueryMsg, StoredBlockHash,
    TokenTypeInfo,
};
pub use token_id::{collectible_token_id, serial_of, token_type_of};
