//! Draw resolution: blockhash-seeded randomness and the weighted prize
//! walk. Shared by the execute reveal paths and the dry-run query so a
//! peek always agrees with the reveal it predicts.

use blindbox_common::{BlockhashOracleQueryMsg, StoredBlockHash};
use cosmwasm_std::{Addr, Deps, Env, QuerierWrapper, Storage, Uint128};
use sha2::{Digest, Sha256};

use crate::error::ContractError;
use crate::state::{Draw, Game, GAMES, PRIZES};

#[derive(Debug)]
pub struct ResolvedPrize {
    pub prize_index: u32,
    pub token_type: u64,
}

/// Hash of the draw's target block, from the oracle. The oracle only
/// stores past heights, so a draw revealed in its exact target block
/// fails here and must wait one block.
pub fn fetch_block_hash(
    querier: &QuerierWrapper,
    oracle: &Addr,
    height: u64,
) -> Result<Vec<u8>, ContractError> {
    let stored: Option<StoredBlockHash> = querier.query_wasm_smart(
        oracle.to_string(),
        &BlockhashOracleQueryMsg::BlockHash { height },
    )?;
    let stored = stored.ok_or(ContractError::BlockHashUnavailable { height })?;
    hex::decode(&stored.hash)
        .map_err(|_| ContractError::BlockHashUnavailable { height })
}

/// Per-draw seed: sha256(blockhash || draw id), folded to a u128. Mixing
/// the draw id in means draws maturing at the same block roll
/// independently.
pub fn draw_randomness(block_hash: &[u8], draw_id: u64) -> u128 {
    let mut hasher = Sha256::new();
    hasher.update(block_hash);
    hasher.update(draw_id.to_be_bytes());
    let digest = hasher.finalize();
    let mut seed = [0u8; 16];
    seed.copy_from_slice(&digest[..16]);
    u128::from_be_bytes(seed)
}

/// Inverse-CDF walk over the prize table. Zero-weight prizes never win.
pub fn select_prize(
    storage: &dyn Storage,
    game_id: u64,
    game: &Game,
    roll: u128,
) -> Result<ResolvedPrize, ContractError> {
    if game.total_weight.is_zero() {
        return Err(ContractError::ZeroPrizeWeight);
    }
    let target = Uint128::new(roll % game.total_weight.u128());
    let mut cumulative = Uint128::zero();
    for index in 0..game.prize_count {
        let prize = PRIZES.load(storage, (game_id, index))?;
        cumulative += prize.weight;
        if target < cumulative {
            return Ok(ResolvedPrize {
                prize_index: index,
                token_type: prize.token_type,
            });
        }
    }
    // unreachable while total_weight equals the table sum
    Err(ContractError::ZeroPrizeWeight)
}

/// Deterministic resolution with no maturity checks. For an already
/// revealed draw this replays the recorded outcome, since the seed and
/// prize table are fixed once the target hash exists.
pub fn replay_prize(deps: Deps, oracle: &Addr, draw: &Draw) -> Result<ResolvedPrize, ContractError> {
    let game = GAMES.load(deps.storage, draw.game_id)?;
    let hash = fetch_block_hash(&deps.querier, oracle, draw.revealable_block)?;
    let roll = draw_randomness(&hash, draw.id);
    select_prize(deps.storage, draw.game_id, &game, roll)
}

/// Full resolution for one draw: maturity checks, seed, prize. Does not
/// touch state.
pub fn resolve_prize(
    deps: Deps,
    env: &Env,
    oracle: &Addr,
    draw: &Draw,
) -> Result<ResolvedPrize, ContractError> {
    if draw.revealed {
        return Err(ContractError::AlreadyRevealed { draw_id: draw.id });
    }
    if env.block.height < draw.revealable_block {
        return Err(ContractError::NotRevealable {
            draw_id: draw.id,
            revealable_block: draw.revealable_block,
        });
    }
    replay_prize(deps, oracle, draw)
}
