//! Pending-draw queue: a storage-backed vector with O(1) removal by
//! swapping the last element into the vacated slot. Order is therefore
//! arbitrary, which the award scanners tolerate.

use cosmwasm_std::{StdResult, Storage};
use cw_storage_plus::{Item, Map};

/// position -> draw id
const QUEUE: Map<u64, u64> = Map::new("queue");
const QUEUE_LEN: Item<u64> = Item::new("queue_len");
/// draw id -> position, the inverse index that makes removal O(1)
const QUEUE_POSITION: Map<u64, u64> = Map::new("queue_pos");

pub fn init(storage: &mut dyn Storage) -> StdResult<()> {
    QUEUE_LEN.save(storage, &0)
}

pub fn len(storage: &dyn Storage) -> StdResult<u64> {
    QUEUE_LEN.load(storage)
}

pub fn get(storage: &dyn Storage, index: u64) -> StdResult<Option<u64>> {
    if index >= QUEUE_LEN.load(storage)? {
        return Ok(None);
    }
    QUEUE.may_load(storage, index)
}

pub fn push(storage: &mut dyn Storage, draw_id: u64) -> StdResult<()> {
    let length = QUEUE_LEN.load(storage)?;
    QUEUE.save(storage, length, &draw_id)?;
    QUEUE_POSITION.save(storage, draw_id, &length)?;
    QUEUE_LEN.save(storage, &(length + 1))
}

/// Remove a draw wherever it sits, backfilling with the last element.
/// Returns false when the draw is not queued.
pub fn remove(storage: &mut dyn Storage, draw_id: u64) -> StdResult<bool> {
    let Some(position) = QUEUE_POSITION.may_load(storage, draw_id)? else {
        return Ok(false);
    };
    let last = QUEUE_LEN.load(storage)? - 1;
    if position != last {
        let moved = QUEUE.load(storage, last)?;
        QUEUE.save(storage, position, &moved)?;
        QUEUE_POSITION.save(storage, moved, &position)?;
    }
    QUEUE.remove(storage, last);
    QUEUE_POSITION.remove(storage, draw_id);
    QUEUE_LEN.save(storage, &last)?;
    Ok(true)
}
