use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::Uint128;

use crate::state::{Config, Draw, ResupplyPolicy};

#[cw_serde]
pub struct InstantiateMsg {
    pub purchase_token: String,
    pub collectible_token: String,
    pub blockhash_oracle: String,
    /// Proceeds recipient; defaults to the instantiator when omitted
    pub recipient: Option<String>,
}

/// Resupply parameters for game creation. The engine fills in the
/// bookkeeping fields (baselines, current period) itself.
#[cw_serde]
pub enum SupplyParams {
    Flow {
        numerator: Uint128,
        denominator: Uint128,
    },
    Period {
        supply: Uint128,
        duration: u64,
        anchor_time: u64,
        open_time: u64,
        close_time: u64,
    },
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Create a game with its full prize table and activate it. Manager only.
    CreateActivatedGame {
        draw_price: Uint128,
        blocks_to_reveal: u64,
        supply: SupplyParams,
        token_types: Vec<u64>,
        weights: Vec<Uint128>,
        make_default: bool,
    },
    /// Create a dormant game; prizes may still be appended. Manager only.
    CreateUnactivatedGame {
        draw_price: Uint128,
        blocks_to_reveal: u64,
        supply: SupplyParams,
        token_types: Vec<u64>,
        weights: Vec<Uint128>,
    },
    /// Append prizes to a not-yet-activated game. Manager only.
    CreatePrizes {
        game_id: u64,
        token_types: Vec<u64>,
        weights: Vec<Uint128>,
    },
    /// Flip a dormant game live. Manager only.
    ActivateGame { game_id: u64, make_default: bool },
    /// Point users at a specific game, overriding the default. Manager only.
    AssignGame { game_id: u64, users: Vec<String> },
    /// Drop per-user overrides, falling back to the default game. Manager only.
    ClearAssignedGame { users: Vec<String> },
    /// Change which game unassigned users draw from. Manager only.
    SetDefaultGame { game_id: u64 },
    /// Buy `count` draws from the caller's current game. The caller pays;
    /// `buyer` (default caller) owns the draws.
    PurchaseDraws {
        buyer: Option<String>,
        count: u32,
        max_total_price: Uint128,
    },
    /// Resolve draws owned by `owner`. Caller must be the owner or an
    /// operator approved on the collectible contract. All-or-nothing.
    RevealDraws { owner: String, draw_ids: Vec<u64> },
    /// Force-resolve specific mature draws for their owners. Anyone, while
    /// awarding is enabled. All-or-nothing.
    AwardDraws { draw_ids: Vec<u64> },
    /// Walk the pending queue from a persistent cursor, awarding mature
    /// draws. Examines at most `max_count` queue slots.
    AwardQueuedDraws { max_count: u32 },
    /// Scan the whole pending queue, awarding draws that have been mature
    /// for at least `min_blocks_stale` blocks. Awards at most `max_count`.
    AwardStaleDraws {
        min_blocks_stale: u64,
        max_count: u32,
    },
    /// Gate the three forced-award entry points. Manager only.
    SetAllowAwarding { allow: bool },
    /// Change a flow game's rate. Accrual under the old rate up to
    /// `effective_block` (default: now) is preserved. Manager only.
    SetGameDrawFlow {
        game_id: u64,
        numerator: Uint128,
        denominator: Uint128,
        effective_block: Option<u64>,
    },
    /// Change a flow game's rate and re-pin its cumulative baseline in one
    /// step. Manager only.
    SetGameDrawFlowAndSupply {
        game_id: u64,
        numerator: Uint128,
        denominator: Uint128,
        supply: Uint128,
        effective_block: Option<u64>,
    },
    /// Set a game's cumulative supply baseline to an absolute value.
    /// Manager only.
    SetGameSupply { game_id: u64, supply: Uint128 },
    /// Add to a game's cumulative supply baseline. Manager only.
    AddGameSupply { game_id: u64, additional: Uint128 },
    /// Rewrite a period game's quota, duration and anchor. Manager only.
    SetGameSupplyPeriod {
        game_id: u64,
        supply: Uint128,
        duration: u64,
        anchor_time: u64,
        /// When set, also grant the new quota for the current period
        reset_now: bool,
    },
    /// Rewrite a period game's sale window. Manager only.
    SetGameTime {
        game_id: u64,
        open_time: u64,
        close_time: u64,
    },
    /// Change the proceeds recipient. Manager only.
    SetRecipient { recipient: String },
    /// Pay out part of the accrued proceeds. Recipient only.
    ClaimProceeds { amount: Uint128 },
    /// Pay out all accrued proceeds. Recipient only.
    ClaimAllProceeds {},
    /// Rotate manager or oracle address. Manager only.
    UpdateConfig {
        manager: Option<String>,
        blockhash_oracle: Option<String>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Config)]
    Config {},
    #[returns(SaleStateResponse)]
    SaleState {},
    /// Price of one draw in the given game, or the default game.
    #[returns(Uint128)]
    DrawPrice { game_id: Option<u64> },
    /// Purchasable draws remaining in the default game right now.
    #[returns(Uint128)]
    AvailableSupply {},
    #[returns(Uint128)]
    AvailableSupplyForGame { game_id: u64 },
    /// Purchasable draws in the game `user` would buy from.
    #[returns(Uint128)]
    AvailableSupplyForUser { user: String },
    /// The default game id, if any.
    #[returns(Option<u64>)]
    CurrentGame {},
    /// The game `user` would buy from: their override, else the default.
    #[returns(Option<u64>)]
    CurrentGameFor { user: String },
    #[returns(u64)]
    GameCount {},
    #[returns(GameInfoResponse)]
    GameInfo { game_id: u64 },
    /// Flow games only: (numerator, denominator).
    #[returns(GameDrawFlowResponse)]
    GameDrawFlow { game_id: u64 },
    /// Period games only.
    #[returns(GameSupplyInfoResponse)]
    GameSupplyInfo { game_id: u64 },
    #[returns(u32)]
    PrizeCount { game_id: u64 },
    #[returns(Uint128)]
    PrizeWeight { game_id: u64, index: u32 },
    #[returns(Uint128)]
    TotalPrizeWeight { game_id: u64 },
    /// Draws ever purchased, across all games.
    #[returns(u64)]
    TotalDraws {},
    /// Draws ever purchased in one game.
    #[returns(u64)]
    GameDrawCount { game_id: u64 },
    #[returns(u64)]
    DrawCountBy { owner: String },
    #[returns(u64)]
    DrawIdBy { owner: String, index: u64 },
    #[returns(Draw)]
    DrawInfo { draw_id: u64 },
    #[returns(u64)]
    DrawGameId { draw_id: u64 },
    #[returns(bool)]
    DrawRevealed { draw_id: u64 },
    /// Whether the draw could be revealed in the next block.
    #[returns(bool)]
    DrawRevealable { draw_id: u64 },
    #[returns(u64)]
    DrawRevealableBlock { draw_id: u64 },
    #[returns(Option<Uint128>)]
    DrawTokenId { draw_id: u64 },
    #[returns(Option<u64>)]
    DrawTokenType { draw_id: u64 },
    #[returns(u64)]
    QueuedDrawsCount {},
    #[returns(u64)]
    QueuedDrawId { index: u64 },
    /// Blocks the queued draw has been mature, as of the next block.
    #[returns(u64)]
    QueuedDrawBlocksStale { index: u64 },
    /// Pure period arithmetic, exposed for off-chain schedulers.
    #[returns(u64)]
    PeriodStartTime {
        time: u64,
        duration: u64,
        anchor_time: u64,
    },
    /// Dry-run reveal: the prizes the given draws would resolve to if
    /// revealed now. Fails like the real reveal would.
    #[returns(PeekDrawPrizesResponse)]
    PeekDrawPrizes { draw_ids: Vec<u64> },
    #[returns(Uint128)]
    Proceeds {},
}

#[cw_serde]
pub struct SaleStateResponse {
    pub default_game_id: Option<u64>,
    pub game_count: u64,
    pub total_draws: u64,
    pub allow_awarding: bool,
    pub recipient: String,
    pub unclaimed_proceeds: Uint128,
}

#[cw_serde]
pub struct GameInfoResponse {
    pub game_id: u64,
    pub draw_price: Uint128,
    pub blocks_to_reveal: u64,
    pub activated: bool,
    pub prize_count: u32,
    pub total_weight: Uint128,
    pub drawn_count: u64,
    pub resupply: ResupplyPolicy,
}

#[cw_serde]
pub struct GameDrawFlowResponse {
    pub numerator: Uint128,
    pub denominator: Uint128,
}

#[cw_serde]
pub struct GameSupplyInfoResponse {
    pub supply: Uint128,
    pub duration: u64,
    pub anchor_time: u64,
    pub open_time: u64,
    pub close_time: u64,
    pub current_period_start: u64,
    pub total_supply: Uint128,
}

#[cw_serde]
pub struct PeekedPrize {
    pub draw_id: u64,
    pub prize_index: u32,
    pub token_type: u64,
}

#[cw_serde]
pub struct PeekDrawPrizesResponse {
    pub prizes: Vec<PeekedPrize>,
}
