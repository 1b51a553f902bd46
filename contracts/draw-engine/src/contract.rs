use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdError, StdResult, Uint128,
};
use cw2::{get_contract_version, set_contract_version};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::queue;
use crate::state::{Config, SaleState, AWARD_CURSOR, CONFIG, SALE_STATE};

const CONTRACT_NAME: &str = "crates.io:blindbox-draw-engine";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let recipient = match msg.recipient {
        Some(addr) => deps.api.addr_validate(&addr)?,
        None => info.sender.clone(),
    };
    let config = Config {
        manager: info.sender.clone(),
        purchase_token: deps.api.addr_validate(&msg.purchase_token)?,
        collectible_token: deps.api.addr_validate(&msg.collectible_token)?,
        blockhash_oracle: deps.api.addr_validate(&msg.blockhash_oracle)?,
    };
    CONFIG.save(deps.storage, &config)?;

    let state = SaleState {
        default_game_id: None,
        game_count: 0,
        total_draws: 0,
        allow_awarding: true,
        recipient,
        unclaimed_proceeds: Uint128::zero(),
    };
    SALE_STATE.save(deps.storage, &state)?;
    queue::init(deps.storage)?;
    AWARD_CURSOR.save(deps.storage, &0)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "draw-engine")
        .add_attribute("manager", info.sender.to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::CreateActivatedGame {
            draw_price,
            blocks_to_reveal,
            supply,
            token_types,
            weights,
            make_default,
        } => execute::create_game(
            deps,
            env,
            info,
            draw_price,
            blocks_to_reveal,
            supply,
            token_types,
            weights,
            true,
            make_default,
        ),
        ExecuteMsg::CreateUnactivatedGame {
            draw_price,
            blocks_to_reveal,
            supply,
            token_types,
            weights,
        } => execute::create_game(
            deps,
            env,
            info,
            draw_price,
            blocks_to_reveal,
            supply,
            token_types,
            weights,
            false,
            false,
        ),
        ExecuteMsg::CreatePrizes {
            game_id,
            token_types,
            weights,
        } => execute::create_prizes(deps, info, game_id, token_types, weights),
        ExecuteMsg::ActivateGame {
            game_id,
            make_default,
        } => execute::activate_game(deps, info, game_id, make_default),
        ExecuteMsg::AssignGame { game_id, users } => {
            execute::assign_game(deps, info, game_id, users)
        }
        ExecuteMsg::ClearAssignedGame { users } => {
            execute::clear_assigned_game(deps, info, users)
        }
        ExecuteMsg::SetDefaultGame { game_id } => execute::set_default_game(deps, info, game_id),
        ExecuteMsg::PurchaseDraws {
            buyer,
            count,
            max_total_price,
        } => execute::purchase_draws(deps, env, info, buyer, count, max_total_price),
        ExecuteMsg::RevealDraws { owner, draw_ids } => {
            execute::reveal_draws(deps, env, info, owner, draw_ids)
        }
        ExecuteMsg::AwardDraws { draw_ids } => execute::award_draws(deps, env, info, draw_ids),
        ExecuteMsg::AwardQueuedDraws { max_count } => {
            execute::award_queued_draws(deps, env, info, max_count)
        }
        ExecuteMsg::AwardStaleDraws {
            min_blocks_stale,
            max_count,
        } => execute::award_stale_draws(deps, env, info, min_blocks_stale, max_count),
        ExecuteMsg::SetAllowAwarding { allow } => execute::set_allow_awarding(deps, info, allow),
        ExecuteMsg::SetGameDrawFlow {
            game_id,
            numerator,
            denominator,
            effective_block,
        } => execute::set_game_draw_flow(
            deps,
            env,
            info,
            game_id,
            numerator,
            denominator,
            effective_block,
        ),
        ExecuteMsg::SetGameDrawFlowAndSupply {
            game_id,
            numerator,
            denominator,
            supply,
            effective_block,
        } => execute::set_game_draw_flow_and_supply(
            deps,
            env,
            info,
            game_id,
            numerator,
            denominator,
            supply,
            effective_block,
        ),
        ExecuteMsg::SetGameSupply { game_id, supply } => {
            execute::set_game_supply(deps, env, info, game_id, supply)
        }
        ExecuteMsg::AddGameSupply {
            game_id,
            additional,
        } => execute::add_game_supply(deps, env, info, game_id, additional),
        ExecuteMsg::SetGameSupplyPeriod {
            game_id,
            supply,
            duration,
            anchor_time,
            reset_now,
        } => execute::set_game_supply_period(
            deps,
            env,
            info,
            game_id,
            supply,
            duration,
            anchor_time,
            reset_now,
        ),
        ExecuteMsg::SetGameTime {
            game_id,
            open_time,
            close_time,
        } => execute::set_game_time(deps, info, game_id, open_time, close_time),
        ExecuteMsg::SetRecipient { recipient } => execute::set_recipient(deps, info, recipient),
        ExecuteMsg::ClaimProceeds { amount } => execute::claim_proceeds(deps, info, amount),
        ExecuteMsg::ClaimAllProceeds {} => execute::claim_all_proceeds(deps, info),
        ExecuteMsg::UpdateConfig {
            manager,
            blockhash_oracle,
        } => execute::update_config(deps, info, manager, blockhash_oracle),
    }
}

#[entry_point]
pub fn query(deps: Deps, env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::SaleState {} => query::query_sale_state(deps),
        QueryMsg::DrawPrice { game_id } => query::query_draw_price(deps, game_id),
        QueryMsg::AvailableSupply {} => query::query_available_supply(deps, env),
        QueryMsg::AvailableSupplyForGame { game_id } => {
            query::query_available_supply_for_game(deps, env, game_id)
        }
        QueryMsg::AvailableSupplyForUser { user } => {
            query::query_available_supply_for_user(deps, env, user)
        }
        QueryMsg::CurrentGame {} => query::query_current_game(deps),
        QueryMsg::CurrentGameFor { user } => query::query_current_game_for(deps, user),
        QueryMsg::GameCount {} => query::query_game_count(deps),
        QueryMsg::GameInfo { game_id } => query::query_game_info(deps, game_id),
        QueryMsg::GameDrawFlow { game_id } => query::query_game_draw_flow(deps, game_id),
        QueryMsg::GameSupplyInfo { game_id } => query::query_game_supply_info(deps, game_id),
        QueryMsg::PrizeCount { game_id } => query::query_prize_count(deps, game_id),
        QueryMsg::PrizeWeight { game_id, index } => {
            query::query_prize_weight(deps, game_id, index)
        }
        QueryMsg::TotalPrizeWeight { game_id } => query::query_total_prize_weight(deps, game_id),
        QueryMsg::TotalDraws {} => query::query_total_draws(deps),
        QueryMsg::GameDrawCount { game_id } => query::query_game_draw_count(deps, game_id),
        QueryMsg::DrawCountBy { owner } => query::query_draw_count_by(deps, owner),
        QueryMsg::DrawIdBy { owner, index } => query::query_draw_id_by(deps, owner, index),
        QueryMsg::DrawInfo { draw_id } => query::query_draw_info(deps, draw_id),
        QueryMsg::DrawGameId { draw_id } => query::query_draw_game_id(deps, draw_id),
        QueryMsg::DrawRevealed { draw_id } => query::query_draw_revealed(deps, draw_id),
        QueryMsg::DrawRevealable { draw_id } => query::query_draw_revealable(deps, env, draw_id),
        QueryMsg::DrawRevealableBlock { draw_id } => {
            query::query_draw_revealable_block(deps, draw_id)
        }
        QueryMsg::DrawTokenId { draw_id } => query::query_draw_token_id(deps, draw_id),
        QueryMsg::DrawTokenType { draw_id } => query::query_draw_token_type(deps, draw_id),
        QueryMsg::QueuedDrawsCount {} => query::query_queued_draws_count(deps),
        QueryMsg::QueuedDrawId { index } => query::query_queued_draw_id(deps, index),
        QueryMsg::QueuedDrawBlocksStale { index } => {
            query::query_queued_draw_blocks_stale(deps, env, index)
        }
        QueryMsg::PeriodStartTime {
            time,
            duration,
            anchor_time,
        } => query::query_period_start_time(time, duration, anchor_time),
        QueryMsg::PeekDrawPrizes { draw_ids } => {
            query::query_peek_draw_prizes(deps, env, draw_ids)
        }
        QueryMsg::Proceeds {} => query::query_proceeds(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let version = get_contract_version(deps.storage)?;
    if version.contract != CONTRACT_NAME {
        return Err(ContractError::Std(StdError::generic_err(
            "can only migrate from the same contract type",
        )));
    }
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;
    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
