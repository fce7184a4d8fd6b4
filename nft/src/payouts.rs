use std::collections::HashMap;

use crate::*;

pub const MAXIMUM_ROYALTY: u32 = 5_000;
const ONE_HUNDRED_PERCENT: u128 = 10_000;

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct Payout {
    pub payout: HashMap<AccountId, U128>,
}

pub trait Payouts {
    /// Given a `token_id` and NEAR-denominated balance, return the `Payout`.
    /// struct for the given token. Panic if the length of the payout exceeds
    /// `max_len_payout.`
    fn nft_payout(&self, token_id: TokenId, balance: U128, max_len_payout: u32) -> Payout;
    /// Given a `token_id` and NEAR-denominated balance, transfer the token
    /// and return the `Payout` struct for the given token. Panic if the
    /// length of the payout exceeds `max_len_payout.`
    fn nft_transfer_payout(
        &mut self,
        receiver_id: AccountId,
        token_id: TokenId,
        approval_id: u64,
        memo: Option<String>,
        balance: U128,
        max_len_payout: u32,
    ) -> Payout;
}

fn royalty_to_payout(royalty: u32, balance: Balance) -> U128 {
    let royalty = u128::from(royalty);
    U128(
        balance / ONE_HUNDRED_PERCENT * royalty
            + balance % ONE_HUNDRED_PERCENT * royalty / ONE_HUNDRED_PERCENT,
    )
}

#[near_bindgen]
impl Payouts for Nft {
    fn nft_payout(&self, token_id: TokenId, balance: U128, max_len_payout: u32) -> Payout {
        let owner_id = self
            .tokens
            .owner_by_id
            .get(&token_id)
            .unwrap_or_else(|| env::panic_str("Token not found"));
        let receivers = self
            .royalty
            .keys()
            .filter(|account_id| **account_id != owner_id)
            .count()
            + 1;
        require!(
            receivers <= max_len_payout as usize,
            "Market cannot payout to that many receivers"
        );

        let mut payout = HashMap::with_capacity(receivers);
        let mut total_royalties = 0;
        for (account_id, royalty) in self.royalty.iter() {
            if *account_id == owner_id {
                continue;
            }
            let amount = royalty_to_payout(*royalty, balance.0);
            total_royalties += amount.0;
            payout.insert(account_id.clone(), amount);
        }
        // royalties are capped at 50%, the owner keeps the rest
        payout.insert(owner_id, U128(balance.0 - total_royalties));
        Payout { payout }
    }

    #[payable]
    fn nft_transfer_payout(
        &mut self,
        receiver_id: AccountId,
        token_id: TokenId,
        approval_id: u64,
        memo: Option<String>,
        balance: U128,
        max_len_payout: u32,
    ) -> Payout {
        assert_one_yocto();
        let payout = self.nft_payout(token_id.clone(), balance, max_len_payout);
        let sender_id = env::predecessor_account_id();
        self.tokens
            .internal_transfer(&sender_id, &receiver_id, &token_id, Some(approval_id), memo);
        payout
    }
}
