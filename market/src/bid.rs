use crate::*;

#[derive(BorshDeserialize, BorshSerialize, Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct Bid {
    pub owner_id: AccountId,
    pub price: U128,
    pub placed_at: U64,
}

impl Market {
    // Outbid and unsettled bids go back in full
    pub(crate) fn refund_bid(&self, bid: &Bid) -> Promise {
        Promise::new(bid.owner_id.clone()).transfer(bid.price.0)
    }
}
