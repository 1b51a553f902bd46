//! Collectible token id layout.
//!
//! A minted collectible id packs the prize's token type into the high 64
//! bits and a per-type serial number into the low 64 bits. The draw engine
//! is the minting authority for draw prizes, so it assigns serials from its
//! own counters and the id is known before the mint message executes.

use cosmwasm_std::Uint128;

/// Build a collectible token id from a type and a per-type serial.
pub fn collectible_token_id(token_type: u64, serial: u64) -> Uint128 {
    Uint128::new(((token_type as u128) << 64) | serial as u128)
}

/// The token type a collectible id belongs to.
pub fn token_type_of(token_id: Uint128) -> u64 {
    (token_id.u128() >> 64) as u64
}

/// The per-type serial of a collectible id.
pub fn serial_of(token_id: Uint128) -> u64 {
    token_id.u128() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_type_and_serial() {
        let id = collectible_token_id(7, 42);
        assert_eq!(token_type_of(id), 7);
        assert_eq!(serial_of(id), 42);
    }

    #[test]
    fn zero_type_ids_are_plain_serials() {
        let id = collectible_token_id(0, 9);
        assert_eq!(id, Uint128::new(9));
        assert_eq!(token_type_of(id), 0);
        assert_eq!(serial_of(id), 9);
    }

    #[test]
    fn extremes_round_trip() {
        let id = collectible_token_id(u64::MAX, u64::MAX);
        assert_eq!(token_type_of(id), u64::MAX);
        assert_eq!(serial_of(id), u64::MAX);
    }
}
