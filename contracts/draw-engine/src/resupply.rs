use cosmwasm_std::Uint128;

use crate::state::ResupplyPolicy;

/// Start of the period containing `time` on the grid anchored at
/// `anchor_time` with the given `duration`. The anchor may lie in the
/// future; the grid extends in both directions but never below 0.
pub fn period_start_time(time: u64, duration: u64, anchor_time: u64) -> u64 {
    if duration == 0 {
        return time;
    }
    let offset = (time as i128 - anchor_time as i128).rem_euclid(duration as i128);
    let start = time as i128 - offset;
    if start < 0 {
        0
    } else {
        start as u64
    }
}

/// Cumulative draws allowed by a flow policy at `height`. The per-block
/// fraction accrues from the pinned baseline; blocks before the baseline
/// contribute nothing.
pub fn flow_cumulative(
    numerator: Uint128,
    denominator: Uint128,
    update_block: u64,
    update_draws: Uint128,
    height: u64,
) -> Uint128 {
    if denominator.is_zero() {
        return update_draws;
    }
    let elapsed = height.saturating_sub(update_block) as u128;
    // numerator is capped at u64::MAX when set, so this product fits u128
    let accrued = elapsed * numerator.u128() / denominator.u128();
    update_draws + Uint128::new(accrued)
}

impl ResupplyPolicy {
    /// Whether the sale window admits purchases at `time`. Flow games and
    /// unrestricted period games (0/0 window) are always open.
    pub fn window_open(&self, time: u64) -> bool {
        match self {
            ResupplyPolicy::Flow { .. } => true,
            ResupplyPolicy::Period {
                open_time,
                close_time,
                ..
            } => {
                if *open_time == 0 && *close_time == 0 {
                    return true;
                }
                time >= *open_time && (*close_time == 0 || time < *close_time)
            }
        }
    }

    /// Period rollover, applied in place: when the clock has crossed into a
    /// later period than the one last granted, grant the quota once and
    /// advance the marker. Crossing several periods at once still grants a
    /// single quota. Returns whether anything changed.
    pub fn roll_forward(&mut self, time: u64) -> bool {
        match self {
            ResupplyPolicy::Flow { .. } => false,
            ResupplyPolicy::Period {
                supply,
                duration,
                anchor_time,
                current_period_start,
                total_supply,
                ..
            } => {
                let start = period_start_time(time, *duration, *anchor_time);
                if start > *current_period_start {
                    *total_supply += *supply;
                    *current_period_start = start;
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Draws purchasable right now, with any pending rollover projected but
    /// not persisted. Zero outside a period game's sale window.
    pub fn available(&self, drawn_count: u64, height: u64, time: u64) -> Uint128 {
        let ceiling = match self {
            ResupplyPolicy::Flow {
                numerator,
                denominator,
                update_block,
                update_draws,
            } => flow_cumulative(*numerator, *denominator, *update_block, *update_draws, height),
            ResupplyPolicy::Period { .. } => {
                if !self.window_open(time) {
                    return Uint128::zero();
                }
                let mut projected = self.clone();
                projected.roll_forward(time);
                match projected {
                    ResupplyPolicy::Period { total_supply, .. } => total_supply,
                    ResupplyPolicy::Flow { .. } => unreachable!(),
                }
            }
        };
        ceiling.saturating_sub(Uint128::from(drawn_count))
    }
}
