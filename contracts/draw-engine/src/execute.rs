use blindbox_common::{collectible_token_id, CollectibleExecuteMsg, CollectibleQueryMsg, TokenTypeInfo};
use cosmwasm_std::{
    to_json_binary, DepsMut, Env, Event, MessageInfo, Response, Uint128, WasmMsg,
};
use cw20::Cw20ExecuteMsg;

use crate::error::ContractError;
use crate::msg::SupplyParams;
use crate::queue;
use crate::resupply::{flow_cumulative, period_start_time};
use crate::reveal;
use crate::state::{
    current_game_id, Config, Draw, Game, Prize, ResupplyPolicy, ASSIGNED_GAME, AWARD_CURSOR,
    CONFIG, DRAWS, GAMES, MINT_SERIAL, PRIZES, SALE_STATE, USER_DRAWS, USER_DRAW_COUNT,
};

fn ensure_manager(deps: &DepsMut, info: &MessageInfo) -> Result<Config, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    if info.sender != config.manager {
        return Err(ContractError::Unauthorized {
            reason: "only the manager can call this".to_string(),
        });
    }
    Ok(config)
}

/// Check the prize inputs line up and every token type exists on the
/// collectible contract, then zip them into prize rows.
fn build_prizes(
    deps: &DepsMut,
    config: &Config,
    token_types: &[u64],
    weights: &[Uint128],
) -> Result<Vec<Prize>, ContractError> {
    if token_types.len() != weights.len() {
        return Err(ContractError::PrizeLengthMismatch {
            types: token_types.len(),
            weights: weights.len(),
        });
    }
    let mut prizes = Vec::with_capacity(token_types.len());
    for (token_type, weight) in token_types.iter().zip(weights) {
        let info: Option<TokenTypeInfo> = deps.querier.query_wasm_smart(
            config.collectible_token.to_string(),
            &CollectibleQueryMsg::TokenTypeInfo {
                token_type: *token_type,
            },
        )?;
        if info.is_none() {
            return Err(ContractError::NoSuchTokenType {
                token_type: *token_type,
            });
        }
        prizes.push(Prize {
            token_type: *token_type,
            weight: *weight,
        });
    }
    Ok(prizes)
}

fn build_resupply(env: &Env, supply: SupplyParams) -> Result<ResupplyPolicy, ContractError> {
    match supply {
        SupplyParams::Flow {
            numerator,
            denominator,
        } => {
            if denominator.is_zero() {
                return Err(ContractError::ZeroDenominator);
            }
            if numerator.u128() > u64::MAX as u128 {
                return Err(ContractError::PrecisionLoss {
                    field: "numerator".to_string(),
                });
            }
            Ok(ResupplyPolicy::Flow {
                numerator,
                denominator,
                update_block: env.block.height,
                update_draws: Uint128::zero(),
            })
        }
        SupplyParams::Period {
            supply,
            duration,
            anchor_time,
            open_time,
            close_time,
        } => {
            if duration == 0 {
                return Err(ContractError::ZeroDuration);
            }
            if close_time != 0 && close_time <= open_time {
                return Err(ContractError::InvalidTimeWindow {
                    open_time,
                    close_time,
                });
            }
            let now = env.block.time.seconds();
            Ok(ResupplyPolicy::Period {
                supply,
                duration,
                anchor_time,
                open_time,
                close_time,
                current_period_start: period_start_time(now, duration, anchor_time),
                total_supply: supply,
            })
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn create_game(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    draw_price: Uint128,
    blocks_to_reveal: u64,
    supply: SupplyParams,
    token_types: Vec<u64>,
    weights: Vec<Uint128>,
    activate: bool,
    make_default: bool,
) -> Result<Response, ContractError> {
    let config = ensure_manager(&deps, &info)?;

    if draw_price.u128() > u64::MAX as u128 {
        return Err(ContractError::PrecisionLoss {
            field: "draw_price".to_string(),
        });
    }
    // keeps purchase_block + blocks_to_reveal well clear of u64 overflow
    if blocks_to_reveal > u32::MAX as u64 {
        return Err(ContractError::PrecisionLoss {
            field: "blocks_to_reveal".to_string(),
        });
    }
    let prizes = build_prizes(&deps, &config, &token_types, &weights)?;
    let total_weight: Uint128 = prizes.iter().map(|p| p.weight).sum();
    if activate {
        if prizes.is_empty() {
            return Err(ContractError::EmptyPrizeTable);
        }
        if total_weight.is_zero() {
            return Err(ContractError::ZeroPrizeWeight);
        }
    }

    let resupply = build_resupply(&env, supply)?;

    let mut state = SALE_STATE.load(deps.storage)?;
    let game_id = state.game_count;
    state.game_count += 1;
    if make_default && activate {
        state.default_game_id = Some(game_id);
    }
    SALE_STATE.save(deps.storage, &state)?;

    for (index, prize) in prizes.iter().enumerate() {
        PRIZES.save(deps.storage, (game_id, index as u32), prize)?;
    }
    let game = Game {
        draw_price,
        blocks_to_reveal,
        activated: activate,
        prize_count: prizes.len() as u32,
        total_weight,
        drawn_count: 0,
        resupply,
    };
    GAMES.save(deps.storage, game_id, &game)?;

    Ok(Response::new()
        .add_attribute("action", "create_game")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_game_created")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("draw_price", draw_price.to_string())
                .add_attribute("blocks_to_reveal", blocks_to_reveal.to_string())
                .add_attribute("prize_count", game.prize_count.to_string())
                .add_attribute("activated", activate.to_string()),
        ))
}

pub fn create_prizes(
    deps: DepsMut,
    info: MessageInfo,
    game_id: u64,
    token_types: Vec<u64>,
    weights: Vec<Uint128>,
) -> Result<Response, ContractError> {
    let config = ensure_manager(&deps, &info)?;
    let mut game = GAMES
        .may_load(deps.storage, game_id)?
        .ok_or(ContractError::NoSuchGame { game_id })?;
    if game.activated {
        return Err(ContractError::GameAlreadyActivated { game_id });
    }
    let prizes = build_prizes(&deps, &config, &token_types, &weights)?;
    for prize in &prizes {
        PRIZES.save(deps.storage, (game_id, game.prize_count), prize)?;
        game.prize_count += 1;
        game.total_weight += prize.weight;
    }
    GAMES.save(deps.storage, game_id, &game)?;

    Ok(Response::new()
        .add_attribute("action", "create_prizes")
        .add_attribute("game_id", game_id.to_string())
        .add_attribute("added", prizes.len().to_string())
        .add_event(
            Event::new("blindbox_prizes_added")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("prize_count", game.prize_count.to_string())
                .add_attribute("total_weight", game.total_weight.to_string()),
        ))
}

pub fn activate_game(
    deps: DepsMut,
    info: MessageInfo,
    game_id: u64,
    make_default: bool,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let mut game = GAMES
        .may_load(deps.storage, game_id)?
        .ok_or(ContractError::NoSuchGame { game_id })?;
    if game.activated {
        return Err(ContractError::GameAlreadyActivated { game_id });
    }
    if game.prize_count == 0 {
        return Err(ContractError::EmptyPrizeTable);
    }
    if game.total_weight.is_zero() {
        return Err(ContractError::ZeroPrizeWeight);
    }
    game.activated = true;
    GAMES.save(deps.storage, game_id, &game)?;
    if make_default {
        let mut state = SALE_STATE.load(deps.storage)?;
        state.default_game_id = Some(game_id);
        SALE_STATE.save(deps.storage, &state)?;
    }

    Ok(Response::new()
        .add_attribute("action", "activate_game")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_game_activated")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("made_default", make_default.to_string()),
        ))
}

fn load_activated(deps: &DepsMut, game_id: u64) -> Result<Game, ContractError> {
    let game = GAMES
        .may_load(deps.storage, game_id)?
        .ok_or(ContractError::NoSuchGame { game_id })?;
    if !game.activated {
        return Err(ContractError::GameNotActive { game_id });
    }
    Ok(game)
}

pub fn assign_game(
    deps: DepsMut,
    info: MessageInfo,
    game_id: u64,
    users: Vec<String>,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    load_activated(&deps, game_id)?;
    for user in &users {
        let addr = deps.api.addr_validate(user)?;
        ASSIGNED_GAME.save(deps.storage, &addr, &game_id)?;
    }

    Ok(Response::new()
        .add_attribute("action", "assign_game")
        .add_attribute("game_id", game_id.to_string())
        .add_attribute("users", users.len().to_string())
        .add_event(
            Event::new("blindbox_game_assigned")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("users", users.len().to_string()),
        ))
}

pub fn clear_assigned_game(
    deps: DepsMut,
    info: MessageInfo,
    users: Vec<String>,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    for user in &users {
        let addr = deps.api.addr_validate(user)?;
        // absent entries are fine, clearing is idempotent
        ASSIGNED_GAME.remove(deps.storage, &addr);
    }

    Ok(Response::new()
        .add_attribute("action", "clear_assigned_game")
        .add_attribute("users", users.len().to_string()))
}

pub fn set_default_game(
    deps: DepsMut,
    info: MessageInfo,
    game_id: u64,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    load_activated(&deps, game_id)?;
    let mut state = SALE_STATE.load(deps.storage)?;
    state.default_game_id = Some(game_id);
    SALE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "set_default_game")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_default_game_set").add_attribute("game_id", game_id.to_string()),
        ))
}

pub fn purchase_draws(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    buyer: Option<String>,
    count: u32,
    max_total_price: Uint128,
) -> Result<Response, ContractError> {
    if count == 0 {
        return Err(ContractError::ZeroDrawCount);
    }
    let config = CONFIG.load(deps.storage)?;
    let buyer = match buyer {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender.clone(),
    };

    let game_id =
        current_game_id(deps.storage, &buyer)?.ok_or(ContractError::NoDefaultGame)?;
    let mut game = load_activated(&deps, game_id)?;

    let now = env.block.time.seconds();
    if let ResupplyPolicy::Period {
        open_time,
        close_time,
        ..
    } = &game.resupply
    {
        if now < *open_time {
            return Err(ContractError::GameNotOpen {
                game_id,
                opens_at: *open_time,
            });
        }
        if *close_time != 0 && now >= *close_time {
            return Err(ContractError::GameClosed {
                game_id,
                closed_at: *close_time,
            });
        }
    }

    // persist any period rollover along with the rest of the purchase
    game.resupply.roll_forward(now);
    let available = game
        .resupply
        .available(game.drawn_count, env.block.height, now);
    if Uint128::from(count) > available {
        return Err(ContractError::InsufficientSupply {
            requested: count as u64,
            available,
        });
    }

    let total = game.draw_price * Uint128::from(count);
    if total > max_total_price {
        return Err(ContractError::TooExpensive {
            total,
            max: max_total_price,
        });
    }

    game.drawn_count += count as u64;
    GAMES.save(deps.storage, game_id, &game)?;

    let mut state = SALE_STATE.load(deps.storage)?;
    let first_draw_id = state.total_draws;
    let mut user_count = USER_DRAW_COUNT
        .may_load(deps.storage, &buyer)?
        .unwrap_or(0);
    for _ in 0..count {
        let draw_id = state.total_draws;
        state.total_draws += 1;
        let draw = Draw {
            id: draw_id,
            owner: buyer.clone(),
            game_id,
            purchase_block: env.block.height,
            revealable_block: env.block.height + game.blocks_to_reveal,
            revealed: false,
            token_id: None,
            token_type: None,
        };
        DRAWS.save(deps.storage, draw_id, &draw)?;
        queue::push(deps.storage, draw_id)?;
        USER_DRAWS.save(deps.storage, (&buyer, user_count), &draw_id)?;
        user_count += 1;
    }
    USER_DRAW_COUNT.save(deps.storage, &buyer, &user_count)?;
    state.unclaimed_proceeds += total;
    SALE_STATE.save(deps.storage, &state)?;

    let mut response = Response::new()
        .add_attribute("action", "purchase_draws")
        .add_attribute("buyer", buyer.to_string())
        .add_attribute("game_id", game_id.to_string())
        .add_attribute("count", count.to_string())
        .add_attribute("total_price", total.to_string())
        .add_event(
            Event::new("blindbox_draws_purchased")
                .add_attribute("buyer", buyer.to_string())
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("first_draw_id", first_draw_id.to_string())
                .add_attribute("count", count.to_string())
                .add_attribute("total_price", total.to_string())
                .add_attribute(
                    "revealable_block",
                    (env.block.height + game.blocks_to_reveal).to_string(),
                ),
        );
    if !total.is_zero() {
        // the caller pays even when buying for someone else
        response = response.add_message(WasmMsg::Execute {
            contract_addr: config.purchase_token.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::TransferFrom {
                owner: info.sender.to_string(),
                recipient: env.contract.address.to_string(),
                amount: total,
            })?,
            funds: vec![],
        });
    }
    Ok(response)
}

/// Resolve one draw and record the outcome. Returns the mint message and
/// the settlement event. Nothing is written if resolution fails.
fn settle_draw(
    deps: &mut DepsMut,
    env: &Env,
    config: &Config,
    draw: &mut Draw,
) -> Result<(WasmMsg, Event), ContractError> {
    let resolved = reveal::resolve_prize(deps.as_ref(), env, &config.blockhash_oracle, draw)?;

    let serial = MINT_SERIAL
        .may_load(deps.storage, resolved.token_type)?
        .unwrap_or(0)
        + 1;
    MINT_SERIAL.save(deps.storage, resolved.token_type, &serial)?;
    let token_id = collectible_token_id(resolved.token_type, serial);

    draw.revealed = true;
    draw.token_id = Some(token_id);
    draw.token_type = Some(resolved.token_type);
    DRAWS.save(deps.storage, draw.id, draw)?;
    queue::remove(deps.storage, draw.id)?;

    let mint = WasmMsg::Execute {
        contract_addr: config.collectible_token.to_string(),
        msg: to_json_binary(&CollectibleExecuteMsg::Mint {
            to: draw.owner.to_string(),
            token_id,
            token_type: resolved.token_type,
            amount: Uint128::one(),
        })?,
        funds: vec![],
    };
    let event = Event::new("blindbox_draw_revealed")
        .add_attribute("draw_id", draw.id.to_string())
        .add_attribute("owner", draw.owner.to_string())
        .add_attribute("game_id", draw.game_id.to_string())
        .add_attribute("prize_index", resolved.prize_index.to_string())
        .add_attribute("token_type", resolved.token_type.to_string())
        .add_attribute("token_id", token_id.to_string());
    Ok((mint, event))
}

pub fn reveal_draws(
    mut deps: DepsMut,
    env: Env,
    info: MessageInfo,
    owner: String,
    draw_ids: Vec<u64>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let owner = deps.api.addr_validate(&owner)?;
    if info.sender != owner {
        let approved: bool = deps.querier.query_wasm_smart(
            config.collectible_token.to_string(),
            &CollectibleQueryMsg::IsApprovedForAll {
                owner: owner.to_string(),
                operator: info.sender.to_string(),
            },
        )?;
        if !approved {
            return Err(ContractError::Unauthorized {
                reason: "caller is neither the owner nor an approved operator".to_string(),
            });
        }
    }

    let mut response = Response::new()
        .add_attribute("action", "reveal_draws")
        .add_attribute("owner", owner.to_string())
        .add_attribute("count", draw_ids.len().to_string());
    for draw_id in draw_ids {
        let mut draw = DRAWS
            .may_load(deps.storage, draw_id)?
            .ok_or(ContractError::NoSuchDraw { draw_id })?;
        if draw.owner != owner {
            return Err(ContractError::DrawOwnershipMismatch { draw_id });
        }
        let (mint, event) = settle_draw(&mut deps, &env, &config, &mut draw)?;
        response = response.add_message(mint).add_event(event);
    }
    Ok(response)
}

fn ensure_awarding_enabled(deps: &DepsMut) -> Result<Config, ContractError> {
    let state = SALE_STATE.load(deps.storage)?;
    if !state.allow_awarding {
        return Err(ContractError::AwardingDisabled);
    }
    Ok(CONFIG.load(deps.storage)?)
}

pub fn award_draws(
    mut deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    draw_ids: Vec<u64>,
) -> Result<Response, ContractError> {
    let config = ensure_awarding_enabled(&deps)?;

    let mut response = Response::new()
        .add_attribute("action", "award_draws")
        .add_attribute("count", draw_ids.len().to_string());
    for draw_id in draw_ids {
        let mut draw = DRAWS
            .may_load(deps.storage, draw_id)?
            .ok_or(ContractError::NoSuchDraw { draw_id })?;
        let (mint, event) = settle_draw(&mut deps, &env, &config, &mut draw)?;
        response = response.add_message(mint).add_event(event);
    }
    Ok(response)
}

/// Whether a settlement failure means "come back later" rather than a
/// broken draw. The scanners skip these instead of aborting.
fn is_skippable(err: &ContractError) -> bool {
    matches!(
        err,
        ContractError::NotRevealable { .. }
            | ContractError::AlreadyRevealed { .. }
            | ContractError::BlockHashUnavailable { .. }
    )
}

pub fn award_queued_draws(
    mut deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    max_count: u32,
) -> Result<Response, ContractError> {
    let config = ensure_awarding_enabled(&deps)?;

    let mut cursor = AWARD_CURSOR.load(deps.storage)?;
    let mut response = Response::new().add_attribute("action", "award_queued_draws");
    let mut awarded: u32 = 0;
    let mut examined: u32 = 0;
    while examined < max_count {
        let length = queue::len(deps.storage)?;
        if length == 0 {
            break;
        }
        if cursor >= length {
            cursor = 0;
        }
        examined += 1;
        let draw_id = match queue::get(deps.storage, cursor)? {
            Some(id) => id,
            None => break,
        };
        let mut draw = DRAWS.load(deps.storage, draw_id)?;
        match settle_draw(&mut deps, &env, &config, &mut draw) {
            Ok((mint, event)) => {
                // the swap-remove pulled a new draw into this slot, so the
                // cursor stays put
                awarded += 1;
                response = response.add_message(mint).add_event(event);
            }
            Err(err) if is_skippable(&err) => {
                cursor += 1;
            }
            Err(err) => return Err(err),
        }
    }
    AWARD_CURSOR.save(deps.storage, &cursor)?;

    Ok(response
        .add_attribute("examined", examined.to_string())
        .add_attribute("awarded", awarded.to_string()))
}

pub fn award_stale_draws(
    mut deps: DepsMut,
    env: Env,
    _info: MessageInfo,
    min_blocks_stale: u64,
    max_count: u32,
) -> Result<Response, ContractError> {
    let config = ensure_awarding_enabled(&deps)?;

    let mut response = Response::new().add_attribute("action", "award_stale_draws");
    let mut awarded: u32 = 0;
    let mut index: u64 = 0;
    while awarded < max_count && index < queue::len(deps.storage)? {
        let draw_id = match queue::get(deps.storage, index)? {
            Some(id) => id,
            None => break,
        };
        let draw = DRAWS.load(deps.storage, draw_id)?;
        // staleness counts from the first block the draw could have been
        // revealed in, as of the next block
        let stale_blocks = (env.block.height + 1).saturating_sub(draw.revealable_block);
        if env.block.height < draw.revealable_block || stale_blocks < min_blocks_stale {
            index += 1;
            continue;
        }
        let mut draw = draw;
        match settle_draw(&mut deps, &env, &config, &mut draw) {
            Ok((mint, event)) => {
                // a swapped-in draw now occupies this index
                awarded += 1;
                response = response.add_message(mint).add_event(event);
            }
            Err(err) if is_skippable(&err) => {
                index += 1;
            }
            Err(err) => return Err(err),
        }
    }

    Ok(response.add_attribute("awarded", awarded.to_string()))
}

pub fn set_allow_awarding(
    deps: DepsMut,
    info: MessageInfo,
    allow: bool,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let mut state = SALE_STATE.load(deps.storage)?;
    state.allow_awarding = allow;
    SALE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "set_allow_awarding")
        .add_attribute("allow", allow.to_string())
        .add_event(
            Event::new("blindbox_awarding_toggled").add_attribute("allow", allow.to_string()),
        ))
}

fn load_game(deps: &DepsMut, game_id: u64) -> Result<Game, ContractError> {
    GAMES
        .may_load(deps.storage, game_id)?
        .ok_or(ContractError::NoSuchGame { game_id })
}

fn update_flow(
    game: &mut Game,
    game_id: u64,
    numerator: Uint128,
    denominator: Uint128,
    effective_block: u64,
    baseline: Option<Uint128>,
) -> Result<(), ContractError> {
    let ResupplyPolicy::Flow {
        numerator: old_numerator,
        denominator: old_denominator,
        update_block,
        update_draws,
    } = &game.resupply
    else {
        return Err(ContractError::WrongSupplyPolicy { game_id });
    };
    if denominator.is_zero() {
        return Err(ContractError::ZeroDenominator);
    }
    if numerator.u128() > u64::MAX as u128 {
        return Err(ContractError::PrecisionLoss {
            field: "numerator".to_string(),
        });
    }
    // either an explicit baseline, or everything the old rate had accrued
    // by the effective block
    let update_draws = baseline.unwrap_or(flow_cumulative(
        *old_numerator,
        *old_denominator,
        *update_block,
        *update_draws,
        effective_block,
    ));
    game.resupply = ResupplyPolicy::Flow {
        numerator,
        denominator,
        update_block: effective_block,
        update_draws,
    };
    Ok(())
}

pub fn set_game_draw_flow(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    game_id: u64,
    numerator: Uint128,
    denominator: Uint128,
    effective_block: Option<u64>,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let mut game = load_game(&deps, game_id)?;
    let effective = effective_block.unwrap_or(env.block.height);
    update_flow(&mut game, game_id, numerator, denominator, effective, None)?;
    GAMES.save(deps.storage, game_id, &game)?;

    Ok(Response::new()
        .add_attribute("action", "set_game_draw_flow")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_flow_updated")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("numerator", numerator.to_string())
                .add_attribute("denominator", denominator.to_string())
                .add_attribute("effective_block", effective.to_string()),
        ))
}

#[allow(clippy::too_many_arguments)]
pub fn set_game_draw_flow_and_supply(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    game_id: u64,
    numerator: Uint128,
    denominator: Uint128,
    supply: Uint128,
    effective_block: Option<u64>,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let mut game = load_game(&deps, game_id)?;
    let effective = effective_block.unwrap_or(env.block.height);
    update_flow(
        &mut game,
        game_id,
        numerator,
        denominator,
        effective,
        Some(supply),
    )?;
    GAMES.save(deps.storage, game_id, &game)?;

    Ok(Response::new()
        .add_attribute("action", "set_game_draw_flow_and_supply")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_flow_updated")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("numerator", numerator.to_string())
                .add_attribute("denominator", denominator.to_string())
                .add_attribute("supply", supply.to_string())
                .add_attribute("effective_block", effective.to_string()),
        ))
}

/// Set the cumulative supply baseline to an absolute value. For a flow
/// game the baseline is re-pinned to the current block; accrual resumes
/// from there.
pub fn set_game_supply(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    game_id: u64,
    supply: Uint128,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let mut game = load_game(&deps, game_id)?;
    match &mut game.resupply {
        ResupplyPolicy::Flow {
            update_block,
            update_draws,
            ..
        } => {
            *update_block = env.block.height;
            *update_draws = supply;
        }
        ResupplyPolicy::Period { total_supply, .. } => {
            *total_supply = supply;
        }
    }
    GAMES.save(deps.storage, game_id, &game)?;

    Ok(Response::new()
        .add_attribute("action", "set_game_supply")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_supply_updated")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("supply", supply.to_string()),
        ))
}

pub fn add_game_supply(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    game_id: u64,
    additional: Uint128,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let mut game = load_game(&deps, game_id)?;
    match &mut game.resupply {
        ResupplyPolicy::Flow {
            numerator,
            denominator,
            update_block,
            update_draws,
        } => {
            // fold accrual to date into the baseline before topping up
            let accrued = flow_cumulative(
                *numerator,
                *denominator,
                *update_block,
                *update_draws,
                env.block.height,
            );
            *update_block = env.block.height;
            *update_draws = accrued + additional;
        }
        ResupplyPolicy::Period { total_supply, .. } => {
            *total_supply += additional;
        }
    }
    GAMES.save(deps.storage, game_id, &game)?;

    Ok(Response::new()
        .add_attribute("action", "add_game_supply")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_supply_updated")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("additional", additional.to_string()),
        ))
}

pub fn set_game_supply_period(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    game_id: u64,
    supply: Uint128,
    duration: u64,
    anchor_time: u64,
    reset_now: bool,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let mut game = load_game(&deps, game_id)?;
    if duration == 0 {
        return Err(ContractError::ZeroDuration);
    }
    let now = env.block.time.seconds();
    let drawn = game.drawn_count;
    match &mut game.resupply {
        ResupplyPolicy::Period {
            supply: quota,
            duration: dur,
            anchor_time: anchor,
            current_period_start,
            total_supply,
            ..
        } => {
            *quota = supply;
            *dur = duration;
            *anchor = anchor_time;
            *current_period_start = period_start_time(now, duration, anchor_time);
            if reset_now {
                // a fresh quota from this moment, leftovers discarded
                *total_supply = Uint128::from(drawn) + supply;
            }
        }
        ResupplyPolicy::Flow { .. } => {
            return Err(ContractError::WrongSupplyPolicy { game_id });
        }
    }
    GAMES.save(deps.storage, game_id, &game)?;

    Ok(Response::new()
        .add_attribute("action", "set_game_supply_period")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_period_updated")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("supply", supply.to_string())
                .add_attribute("duration", duration.to_string())
                .add_attribute("anchor_time", anchor_time.to_string())
                .add_attribute("reset_now", reset_now.to_string()),
        ))
}

pub fn set_game_time(
    deps: DepsMut,
    info: MessageInfo,
    game_id: u64,
    open_time: u64,
    close_time: u64,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let mut game = load_game(&deps, game_id)?;
    if close_time != 0 && close_time <= open_time {
        return Err(ContractError::InvalidTimeWindow {
            open_time,
            close_time,
        });
    }
    match &mut game.resupply {
        ResupplyPolicy::Period {
            open_time: open,
            close_time: close,
            ..
        } => {
            *open = open_time;
            *close = close_time;
        }
        ResupplyPolicy::Flow { .. } => {
            return Err(ContractError::WrongSupplyPolicy { game_id });
        }
    }
    GAMES.save(deps.storage, game_id, &game)?;

    Ok(Response::new()
        .add_attribute("action", "set_game_time")
        .add_attribute("game_id", game_id.to_string())
        .add_event(
            Event::new("blindbox_window_updated")
                .add_attribute("game_id", game_id.to_string())
                .add_attribute("open_time", open_time.to_string())
                .add_attribute("close_time", close_time.to_string()),
        ))
}

pub fn set_recipient(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
) -> Result<Response, ContractError> {
    ensure_manager(&deps, &info)?;
    let recipient = deps.api.addr_validate(&recipient)?;
    let mut state = SALE_STATE.load(deps.storage)?;
    state.recipient = recipient.clone();
    SALE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "set_recipient")
        .add_attribute("recipient", recipient.to_string())
        .add_event(
            Event::new("blindbox_recipient_set").add_attribute("recipient", recipient.to_string()),
        ))
}

fn pay_out_proceeds(
    deps: DepsMut,
    info: MessageInfo,
    amount: Option<Uint128>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    let mut state = SALE_STATE.load(deps.storage)?;
    if info.sender != state.recipient {
        return Err(ContractError::Unauthorized {
            reason: "only the proceeds recipient can claim".to_string(),
        });
    }
    if state.unclaimed_proceeds.is_zero() {
        return Err(ContractError::NothingToClaim);
    }
    let amount = amount.unwrap_or(state.unclaimed_proceeds);
    if amount.is_zero() {
        return Err(ContractError::NothingToClaim);
    }
    if amount > state.unclaimed_proceeds {
        return Err(ContractError::InsufficientProceeds {
            requested: amount,
            available: state.unclaimed_proceeds,
        });
    }
    state.unclaimed_proceeds -= amount;
    SALE_STATE.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "claim_proceeds")
        .add_attribute("amount", amount.to_string())
        .add_message(WasmMsg::Execute {
            contract_addr: config.purchase_token.to_string(),
            msg: to_json_binary(&Cw20ExecuteMsg::Transfer {
                recipient: state.recipient.to_string(),
                amount,
            })?,
            funds: vec![],
        })
        .add_event(
            Event::new("blindbox_proceeds_claimed")
                .add_attribute("recipient", state.recipient.to_string())
                .add_attribute("amount", amount.to_string())
                .add_attribute("remaining", state.unclaimed_proceeds.to_string()),
        ))
}

pub fn claim_proceeds(
    deps: DepsMut,
    info: MessageInfo,
    amount: Uint128,
) -> Result<Response, ContractError> {
    pay_out_proceeds(deps, info, Some(amount))
}

pub fn claim_all_proceeds(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    pay_out_proceeds(deps, info, None)
}

pub fn update_config(
    deps: DepsMut,
    info: MessageInfo,
    manager: Option<String>,
    blockhash_oracle: Option<String>,
) -> Result<Response, ContractError> {
    let mut config = ensure_manager(&deps, &info)?;
    if let Some(manager) = manager {
        config.manager = deps.api.addr_validate(&manager)?;
    }
    if let Some(oracle) = blockhash_oracle {
        config.blockhash_oracle = deps.api.addr_validate(&oracle)?;
    }
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("blindbox_config_updated")
                .add_attribute("manager", config.manager.to_string())
                .add_attribute("blockhash_oracle", config.blockhash_oracle.to_string()),
        ))
}
