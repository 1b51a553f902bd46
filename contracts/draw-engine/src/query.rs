use cosmwasm_std::{to_json_binary, Binary, Deps, Env, StdError, StdResult, Uint128};

use crate::msg::{
    GameDrawFlowResponse, GameSupplyInfoResponse, PeekDrawPrizesResponse, PeekedPrize,
    SaleStateResponse,
};
use crate::queue;
use crate::resupply::period_start_time;
use crate::reveal;
use crate::state::{
    current_game_id, Game, ResupplyPolicy, CONFIG, DRAWS, GAMES, PRIZES, SALE_STATE, USER_DRAWS,
    USER_DRAW_COUNT,
};

fn load_game(deps: Deps, game_id: u64) -> StdResult<Game> {
    GAMES
        .may_load(deps.storage, game_id)?
        .ok_or_else(|| StdError::generic_err(format!("game {game_id} does not exist")))
}

fn default_game_id(deps: Deps) -> StdResult<u64> {
    SALE_STATE
        .load(deps.storage)?
        .default_game_id
        .ok_or_else(|| StdError::generic_err("no default game is set"))
}

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_sale_state(deps: Deps) -> StdResult<Binary> {
    let state = SALE_STATE.load(deps.storage)?;
    to_json_binary(&SaleStateResponse {
        default_game_id: state.default_game_id,
        game_count: state.game_count,
        total_draws: state.total_draws,
        allow_awarding: state.allow_awarding,
        recipient: state.recipient.to_string(),
        unclaimed_proceeds: state.unclaimed_proceeds,
    })
}

pub fn query_draw_price(deps: Deps, game_id: Option<u64>) -> StdResult<Binary> {
    let game_id = match game_id {
        Some(id) => id,
        None => default_game_id(deps)?,
    };
    let game = load_game(deps, game_id)?;
    to_json_binary(&game.draw_price)
}

fn available_for(deps: Deps, env: &Env, game_id: u64) -> StdResult<Uint128> {
    let game = load_game(deps, game_id)?;
    Ok(game.resupply.available(
        game.drawn_count,
        env.block.height,
        env.block.time.seconds(),
    ))
}

pub fn query_available_supply(deps: Deps, env: Env) -> StdResult<Binary> {
    let game_id = default_game_id(deps)?;
    to_json_binary(&available_for(deps, &env, game_id)?)
}

pub fn query_available_supply_for_game(deps: Deps, env: Env, game_id: u64) -> StdResult<Binary> {
    to_json_binary(&available_for(deps, &env, game_id)?)
}

pub fn query_available_supply_for_user(deps: Deps, env: Env, user: String) -> StdResult<Binary> {
    let user = deps.api.addr_validate(&user)?;
    let game_id = current_game_id(deps.storage, &user)?
        .ok_or_else(|| StdError::generic_err("no default game is set"))?;
    to_json_binary(&available_for(deps, &env, game_id)?)
}

pub fn query_current_game(deps: Deps) -> StdResult<Binary> {
    let state = SALE_STATE.load(deps.storage)?;
    to_json_binary(&state.default_game_id)
}

pub fn query_current_game_for(deps: Deps, user: String) -> StdResult<Binary> {
    let user = deps.api.addr_validate(&user)?;
    to_json_binary(&current_game_id(deps.storage, &user)?)
}

pub fn query_game_count(deps: Deps) -> StdResult<Binary> {
    let state = SALE_STATE.load(deps.storage)?;
    to_json_binary(&state.game_count)
}

pub fn query_game_info(deps: Deps, game_id: u64) -> StdResult<Binary> {
    let game = load_game(deps, game_id)?;
    to_json_binary(&crate::msg::GameInfoResponse {
        game_id,
        draw_price: game.draw_price,
        blocks_to_reveal: game.blocks_to_reveal,
        activated: game.activated,
        prize_count: game.prize_count,
        total_weight: game.total_weight,
        drawn_count: game.drawn_count,
        resupply: game.resupply,
    })
}

pub fn query_game_draw_flow(deps: Deps, game_id: u64) -> StdResult<Binary> {
    let game = load_game(deps, game_id)?;
    match game.resupply {
        ResupplyPolicy::Flow {
            numerator,
            denominator,
            ..
        } => to_json_binary(&GameDrawFlowResponse {
            numerator,
            denominator,
        }),
        ResupplyPolicy::Period { .. } => Err(StdError::generic_err(format!(
            "game {game_id} does not resupply by flow"
        ))),
    }
}

pub fn query_game_supply_info(deps: Deps, game_id: u64) -> StdResult<Binary> {
    let game = load_game(deps, game_id)?;
    match game.resupply {
        ResupplyPolicy::Period {
            supply,
            duration,
            anchor_time,
            open_time,
            close_time,
            current_period_start,
            total_supply,
        } => to_json_binary(&GameSupplyInfoResponse {
            supply,
            duration,
            anchor_time,
            open_time,
            close_time,
            current_period_start,
            total_supply,
        }),
        ResupplyPolicy::Flow { .. } => Err(StdError::generic_err(format!(
            "game {game_id} does not resupply by period"
        ))),
    }
}

pub fn query_prize_count(deps: Deps, game_id: u64) -> StdResult<Binary> {
    let game = load_game(deps, game_id)?;
    to_json_binary(&game.prize_count)
}

pub fn query_prize_weight(deps: Deps, game_id: u64, index: u32) -> StdResult<Binary> {
    let prize = PRIZES.load(deps.storage, (game_id, index))?;
    to_json_binary(&prize.weight)
}

pub fn query_total_prize_weight(deps: Deps, game_id: u64) -> StdResult<Binary> {
    let game = load_game(deps, game_id)?;
    to_json_binary(&game.total_weight)
}

pub fn query_total_draws(deps: Deps) -> StdResult<Binary> {
    let state = SALE_STATE.load(deps.storage)?;
    to_json_binary(&state.total_draws)
}

pub fn query_game_draw_count(deps: Deps, game_id: u64) -> StdResult<Binary> {
    let game = load_game(deps, game_id)?;
    to_json_binary(&game.drawn_count)
}

pub fn query_draw_count_by(deps: Deps, owner: String) -> StdResult<Binary> {
    let owner = deps.api.addr_validate(&owner)?;
    let count = USER_DRAW_COUNT
        .may_load(deps.storage, &owner)?
        .unwrap_or(0);
    to_json_binary(&count)
}

pub fn query_draw_id_by(deps: Deps, owner: String, index: u64) -> StdResult<Binary> {
    let owner = deps.api.addr_validate(&owner)?;
    let draw_id = USER_DRAWS.load(deps.storage, (&owner, index))?;
    to_json_binary(&draw_id)
}

fn load_draw(deps: Deps, draw_id: u64) -> StdResult<crate::state::Draw> {
    DRAWS
        .may_load(deps.storage, draw_id)?
        .ok_or_else(|| StdError::generic_err(format!("draw {draw_id} does not exist")))
}

pub fn query_draw_info(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    to_json_binary(&load_draw(deps, draw_id)?)
}

pub fn query_draw_game_id(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    to_json_binary(&load_draw(deps, draw_id)?.game_id)
}

pub fn query_draw_revealed(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    to_json_binary(&load_draw(deps, draw_id)?.revealed)
}

/// Whether a reveal transaction landing in the next block would pass the
/// maturity check.
pub fn query_draw_revealable(deps: Deps, env: Env, draw_id: u64) -> StdResult<Binary> {
    let draw = load_draw(deps, draw_id)?;
    let revealable = !draw.revealed && env.block.height + 1 >= draw.revealable_block;
    to_json_binary(&revealable)
}

pub fn query_draw_revealable_block(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    to_json_binary(&load_draw(deps, draw_id)?.revealable_block)
}

pub fn query_draw_token_id(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    to_json_binary(&load_draw(deps, draw_id)?.token_id)
}

pub fn query_draw_token_type(deps: Deps, draw_id: u64) -> StdResult<Binary> {
    to_json_binary(&load_draw(deps, draw_id)?.token_type)
}

pub fn query_queued_draws_count(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&queue::len(deps.storage)?)
}

pub fn query_queued_draw_id(deps: Deps, index: u64) -> StdResult<Binary> {
    let draw_id = queue::get(deps.storage, index)?
        .ok_or_else(|| StdError::generic_err(format!("queue index {index} out of range")))?;
    to_json_binary(&draw_id)
}

pub fn query_queued_draw_blocks_stale(deps: Deps, env: Env, index: u64) -> StdResult<Binary> {
    let draw_id = queue::get(deps.storage, index)?
        .ok_or_else(|| StdError::generic_err(format!("queue index {index} out of range")))?;
    let draw = load_draw(deps, draw_id)?;
    let stale = (env.block.height + 1).saturating_sub(draw.revealable_block);
    to_json_binary(&stale)
}

pub fn query_period_start_time(
    time: u64,
    duration: u64,
    anchor_time: u64,
) -> StdResult<Binary> {
    to_json_binary(&period_start_time(time, duration, anchor_time))
}

/// Dry-run reveal for a set of draws, failing exactly where a real reveal
/// would. Already-revealed draws report their recorded outcome instead of
/// erroring, so a peek never disagrees with a reveal that happened.
pub fn query_peek_draw_prizes(deps: Deps, env: Env, draw_ids: Vec<u64>) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let mut prizes = Vec::with_capacity(draw_ids.len());
    for draw_id in draw_ids {
        let draw = load_draw(deps, draw_id)?;
        let resolved = if draw.revealed {
            reveal::replay_prize(deps, &config.blockhash_oracle, &draw)
        } else {
            reveal::resolve_prize(deps, &env, &config.blockhash_oracle, &draw)
        }
        .map_err(|err| StdError::generic_err(err.to_string()))?;
        prizes.push(PeekedPrize {
            draw_id,
            prize_index: resolved.prize_index,
            token_type: draw.token_type.unwrap_or(resolved.token_type),
        });
    }
    to_json_binary(&PeekDrawPrizesResponse { prizes })
}

pub fn query_proceeds(deps: Deps) -> StdResult<Binary> {
    let state = SALE_STATE.load(deps.storage)?;
    to_json_binary(&state.unclaimed_proceeds)
}
