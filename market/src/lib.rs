mod auction;
mod auction_views;
mod bid;
mod common;
mod events;
mod fee;
mod inner;
mod market_core;


use common::*;

pub use crate::auction::{AuctionArgs, AuctionId, AuctionJson, EXTENSION_DURATION, MAX_DURATION};
use crate::auction::MarketAuctions;
pub use crate::bid::Bid;
use crate::fee::{MAX_PROTOCOL_FEE, PROTOCOL_FEE};
pub use crate::fee::Payout;

pub const STORAGE_PER_AUCTION: u128 = 1000 * STORAGE_PRICE_PER_BYTE;

/// Helper structure for keys of the persistent collections.
#[derive(BorshStorageKey, BorshSerialize)]
pub enum StorageKey {
    NftContractIds,
    Auctions,
    ByOwnerId,
    ByOwnerIdInner { account_id_hash: CryptoHash },
    ByContractAndTokenId,
    StorageDeposits,
}

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Market {
    non_fungible_token_account_ids: UnorderedSet<AccountId>,
    market: MarketAuctions,
}

#[near_bindgen]
impl Market {
    #[init]
    pub fn new(
        nft_ids: Vec<AccountId>,
        owner_id: AccountId,
        protocol_fee: Option<u16>,
        extension_duration: Option<U64>,
    ) -> Self {
        require!(!env::state_exists(), "Already initialized");
        let protocol_fee = protocol_fee.unwrap_or(PROTOCOL_FEE);
        require!(protocol_fee <= MAX_PROTOCOL_FEE, "Protocol fee is too high");
        let extension_duration = extension_duration
            .map(u64::from)
            .unwrap_or(EXTENSION_DURATION);
        require!(
            extension_duration <= MAX_DURATION,
            "Extension duration is too long"
        );
        let mut non_fungible_token_account_ids = UnorderedSet::new(StorageKey::NftContractIds);
        non_fungible_token_account_ids.extend(nft_ids);
        let market = MarketAuctions {
            owner_id,
            auctions: UnorderedMap::new(StorageKey::Auctions),
            by_owner_id: LookupMap::new(StorageKey::ByOwnerId),
            by_contract_and_token_id: LookupMap::new(StorageKey::ByContractAndTokenId),
            storage_deposits: LookupMap::new(StorageKey::StorageDeposits),
            next_auction_id: 0,
            protocol_fee,
            extension_duration,
            collected_fees: 0,
        };
        Self {
            non_fungible_token_account_ids,
            market,
        }
    }

    #[payable]
    pub fn storage_withdraw(&mut self) {
        assert_one_yocto();
        let owner_id = env::predecessor_account_id();
        let amount = self.market.storage_deposits.remove(&owner_id).unwrap_or(0);
        let locked = self.storage_locked(&owner_id);
        let refund = amount.saturating_sub(locked);
        if refund > 0 {
            Promise::new(owner_id.clone()).transfer(refund);
        }
        let remaining = amount - refund;
        if remaining > 0 {
            self.market.storage_deposits.insert(&owner_id, &remaining);
        }
    }

    #[payable]
    pub fn storage_deposit(&mut self, account_id: Option<AccountId>) {
        let storage_account_id = account_id.unwrap_or_else(env::predecessor_account_id);
        let deposit = env::attached_deposit();
        require!(
            deposit >= STORAGE_PER_AUCTION,
            format!("Requires minimum deposit of {}", STORAGE_PER_AUCTION)
        );
        let balance: u128 = self
            .market
            .storage_deposits
            .get(&storage_account_id)
            .unwrap_or(0);
        self.market
            .storage_deposits
            .insert(&storage_account_id, &(balance + deposit));
    }

    pub fn storage_amount(&self) -> U128 {
        U128(STORAGE_PER_AUCTION)
    }

    pub fn storage_balance_of(&self, account_id: AccountId) -> U128 {
        U128(self.market.storage_deposits.get(&account_id).unwrap_or(0))
    }

    #[payable]
    pub fn withdraw_fees(&mut self, amount: Option<U128>) -> Promise {
        assert_one_yocto();
        require!(
            env::predecessor_account_id() == self.market.owner_id,
            "Only the market owner can withdraw fees"
        );
        let amount = amount.map(|a| a.0).unwrap_or(self.market.collected_fees);
        require!(
            amount <= self.market.collected_fees,
            "Not enough collected fees"
        );
        self.market.collected_fees -= amount;
        Promise::new(self.market.owner_id.clone()).transfer(amount)
    }
}

impl Market {
    pub(crate) fn storage_locked(&self, account_id: &AccountId) -> Balance {
        let len = self
            .market
            .by_owner_id
            .get(account_id)
            .map(|auctions| auctions.len())
            .unwrap_or_default();
        u128::from(len) * STORAGE_PER_AUCTION
    }

    pub(crate) fn storage_available(&self, account_id: &AccountId) -> Balance {
        self.market
            .storage_deposits
            .get(account_id)
            .unwrap_or(0)
            .saturating_sub(self.storage_locked(account_id))
    }
}
