use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

pub const CONFIG: Item<Config> = Item::new("config");
pub const SALE_STATE: Item<SaleState> = Item::new("sale_state");
pub const GAMES: Map<u64, Game> = Map::new("games");
pub const PRIZES: Map<(u64, u32), Prize> = Map::new("prizes");
/// Sparse per-user game override; absence resolves to the default game.
pub const ASSIGNED_GAME: Map<&Addr, u64> = Map::new("assigned_game");
/// The draw arena. Draws are created at purchase, mutated exactly once at
/// reveal, and never deleted.
pub const DRAWS: Map<u64, Draw> = Map::new("draws");
pub const USER_DRAW_COUNT: Map<&Addr, u64> = Map::new("user_draw_count");
/// (owner, purchase sequence) -> draw id, for per-user enumeration.
pub const USER_DRAWS: Map<(&Addr, u64), u64> = Map::new("user_draws");
/// Next mint serial per collectible token type. The engine is the minting
/// authority for draw prizes, so this mirror is authoritative.
pub const MINT_SERIAL: Map<u64, u64> = Map::new("mint_serial");
/// Queue position the round-robin awarder resumes from
pub const AWARD_CURSOR: Item<u64> = Item::new("award_cursor");

/// The game `user` draws from: their override if one exists, else the
/// default game.
pub fn current_game_id(storage: &dyn Storage, user: &Addr) -> StdResult<Option<u64>> {
    if let Some(game_id) = ASSIGNED_GAME.may_load(storage, user)? {
        return Ok(Some(game_id));
    }
    Ok(SALE_STATE.load(storage)?.default_game_id)
}

#[cw_serde]
pub struct Config {
    pub manager: Addr,
    /// cw20 token draws are paid in
    pub purchase_token: Addr,
    /// Collectible contract prizes are minted on
    pub collectible_token: Addr,
    pub blockhash_oracle: Addr,
}

#[cw_serde]
pub struct SaleState {
    pub default_game_id: Option<u64>,
    pub game_count: u64,
    pub total_draws: u64,
    /// Gates the forced-award entry points
    pub allow_awarding: bool,
    pub recipient: Addr,
    pub unclaimed_proceeds: Uint128,
}

#[cw_serde]
pub struct Game {
    pub draw_price: Uint128,
    pub blocks_to_reveal: u64,
    pub activated: bool,
    pub prize_count: u32,
    pub total_weight: Uint128,
    /// Draws consumed from this game's supply ceiling
    pub drawn_count: u64,
    pub resupply: ResupplyPolicy,
}

#[cw_serde]
pub struct Prize {
    pub token_type: u64,
    /// Zero is allowed (slot held for a later top-up)
    pub weight: Uint128,
}

/// How a game's purchasable supply replenishes. One availability
/// computation dispatches on the tag; purchase consumption only ever
/// increments `Game::drawn_count`, never the baselines here.
#[cw_serde]
pub enum ResupplyPolicy {
    Flow {
        numerator: Uint128,
        denominator: Uint128,
        update_block: u64,
        /// Cumulative-allowed-draws baseline at `update_block`
        update_draws: Uint128,
    },
    Period {
        /// Per-period quota
        supply: Uint128,
        duration: u64,
        anchor_time: u64,
        /// 0/0 = unrestricted sale window
        open_time: u64,
        close_time: u64,
        /// Start of the last period the quota was granted for
        current_period_start: u64,
        /// Cumulative issued quota, additive across rollovers and top-ups
        total_supply: Uint128,
    },
}

#[cw_serde]
pub struct Draw {
    pub id: u64,
    pub owner: Addr,
    pub game_id: u64,
    pub purchase_block: u64,
    pub revealable_block: u64,
    pub revealed: bool,
    pub token_id: Option<Uint128>,
    pub token_type: Option<u64>,
}
