use cosmwasm_std::{StdError, Uint128};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("prize table length mismatch: {types} types vs {weights} weights")]
    PrizeLengthMismatch { types: usize, weights: usize },

    #[error("an activated game needs a nonempty prize table")]
    EmptyPrizeTable,

    #[error("an activated game needs positive total prize weight")]
    ZeroPrizeWeight,

    #[error("token type {token_type} does not exist on the collectible contract")]
    NoSuchTokenType { token_type: u64 },

    #[error("draw flow denominator must be nonzero")]
    ZeroDenominator,

    #[error("supply period duration must be nonzero")]
    ZeroDuration,

    #[error("{field} too large for fixed-point supply math")]
    PrecisionLoss { field: String },

    #[error("game {game_id} does not exist")]
    NoSuchGame { game_id: u64 },

    #[error("game {game_id} is already activated")]
    GameAlreadyActivated { game_id: u64 },

    #[error("game {game_id} is not activated")]
    GameNotActive { game_id: u64 },

    #[error("no default game is set")]
    NoDefaultGame,

    #[error("draw count must be nonzero")]
    ZeroDrawCount,

    #[error("insufficient supply: requested {requested}, available {available}")]
    InsufficientSupply {
        requested: u64,
        available: Uint128,
    },

    #[error("total price {total} exceeds maximum {max}")]
    TooExpensive { total: Uint128, max: Uint128 },

    #[error("draw {draw_id} does not exist")]
    NoSuchDraw { draw_id: u64 },

    #[error("draw {draw_id} does not belong to the given owner")]
    DrawOwnershipMismatch { draw_id: u64 },

    #[error("draw {draw_id} is not revealable until block {revealable_block}")]
    NotRevealable {
        draw_id: u64,
        revealable_block: u64,
    },

    #[error("draw {draw_id} is already revealed")]
    AlreadyRevealed { draw_id: u64 },

    #[error("forced awarding is disabled")]
    AwardingDisabled,

    #[error("no block hash recorded for height {height}")]
    BlockHashUnavailable { height: u64 },

    #[error("operation does not match game {game_id}'s supply policy")]
    WrongSupplyPolicy { game_id: u64 },

    #[error("game {game_id} is not open until {opens_at}")]
    GameNotOpen { game_id: u64, opens_at: u64 },

    #[error("game {game_id} closed at {closed_at}")]
    GameClosed { game_id: u64, closed_at: u64 },

    #[error("invalid sale window: open {open_time}, close {close_time}")]
    InvalidTimeWindow { open_time: u64, close_time: u64 },

    #[error("nothing to claim")]
    NothingToClaim,

    #[error("insufficient proceeds: requested {requested}, available {available}")]
    InsufficientProceeds {
        requested: Uint128,
        available: Uint128,
    },
}
