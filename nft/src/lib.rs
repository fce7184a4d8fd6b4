mod common;
mod mint;
mod payouts;

use std::collections::HashMap;

use near_contract_standards::non_fungible_token::metadata::{
    NonFungibleTokenMetadataProvider, NFT_METADATA_SPEC,
};
use near_contract_standards::non_fungible_token::NonFungibleToken;

use common::*;
pub use payouts::{Payout, Payouts, MAXIMUM_ROYALTY};

/// Price of a single token, 0.5 NEAR.
pub const MINT_PRICE: Balance = 500_000_000_000_000_000_000_000;

#[near_bindgen]
#[derive(BorshDeserialize, BorshSerialize, PanicOnDefault)]
pub struct Nft {
    tokens: NonFungibleToken,
    metadata: LazyOption<NFTContractMetadata>,

    mint_price: Balance,
    next_token_id: u64,
    // basis points, 10_000 is 100%
    royalty: HashMap<AccountId, u32>,
}

#[derive(BorshSerialize, BorshStorageKey)]
enum StorageKey {
    NonFungibleToken,
    Metadata,
    TokenMetadata,
    Enumeration,
    Approval,
}

#[near_bindgen]
impl Nft {
    #[init]
    pub fn new_default_meta(owner_id: AccountId) -> Self {
        Self::new(
            owner_id,
            NFTContractMetadata {
                spec: NFT_METADATA_SPEC.to_string(),
                name: "Locale NFT".to_string(),
                symbol: "LOCALE".to_string(),
                icon: None,
                base_uri: None,
                reference: None,
                reference_hash: None,
            },
            None,
            None,
        )
    }

    #[init]
    pub fn new(
        owner_id: AccountId,
        metadata: NFTContractMetadata,
        mint_price: Option<U128>,
        royalty: Option<HashMap<AccountId, u32>>,
    ) -> Self {
        require!(!env::state_exists(), "Already initialized");
        metadata.assert_valid();
        let royalty = royalty.unwrap_or_default();
        let total_royalty = royalty
            .values()
            .try_fold(0u32, |total, share| total.checked_add(*share));
        require!(
            total_royalty.map_or(false, |total| total <= MAXIMUM_ROYALTY),
            "maximum royalty cap exceeded"
        );
        Self {
            tokens: NonFungibleToken::new(
                StorageKey::NonFungibleToken,
                owner_id,
                Some(StorageKey::TokenMetadata),
                Some(StorageKey::Enumeration),
                Some(StorageKey::Approval),
            ),
            metadata: LazyOption::new(StorageKey::Metadata, Some(&metadata)),
            mint_price: mint_price.map(u128::from).unwrap_or(MINT_PRICE),
            next_token_id: 1,
            royalty,
        }
    }
}

near_contract_standards::impl_non_fungible_token_core!(Nft, tokens);
near_contract_standards::impl_non_fungible_token_approval!(Nft, tokens);
near_contract_standards::impl_non_fungible_token_enumeration!(Nft, tokens);

#[near_bindgen]
impl NonFungibleTokenMetadataProvider for Nft {
    fn nft_metadata(&self) -> NFTContractMetadata {
        self.metadata
            .get()
            .unwrap_or_else(|| env::panic_str("Metadata is not set"))
    }
}

#[cfg(test)]
mod tests;
