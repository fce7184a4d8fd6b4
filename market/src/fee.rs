use std::collections::HashMap;

use crate::*;

pub const PROTOCOL_FEE: u16 = 300; // 10_000 is 100%, so 300 is 3%
pub const MAX_PROTOCOL_FEE: u16 = 1_000;
pub const MAX_LEN_PAYOUT: u32 = 10;

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct Payout {
    pub payout: HashMap<AccountId, U128>,
}

/// Share of `price` taken by the market, rounded down. Splits the price so that
/// the multiplication can't overflow.
pub fn calculate_protocol_fee(price: Balance, protocol_fee: u16) -> Balance {
    let fee = u128::from(protocol_fee);
    price / 10_000 * fee + price % 10_000 * fee / 10_000
}

/// Returns the payout if the NFT contract answered with something the market can pay out:
/// not empty, at most `max_len_payout` receivers, and adding up to `price`.
pub fn validate_payout(payout: Payout, price: Balance, max_len_payout: u32) -> Option<Payout> {
    if payout.payout.is_empty() || payout.payout.len() > max_len_payout as usize {
        log!(
            "Payout must have from 1 to {} receivers, got {}",
            max_len_payout,
            payout.payout.len()
        );
        return None;
    }
    let mut remainder = price;
    for value in payout.payout.values() {
        remainder = remainder.checked_sub(value.0)?;
    }
    if remainder <= 1 {
        Some(payout)
    } else {
        None
    }
}
