pub use near_sdk::{
    assert_one_yocto,
    borsh::{self, BorshDeserialize, BorshSerialize},
    collections::{LookupMap, UnorderedMap, UnorderedSet},
    env::{self, STORAGE_PRICE_PER_BYTE},
    json_types::{U128, U64},
    log, near_bindgen, require,
    serde::{Deserialize, Serialize},
    AccountId, Balance, BorshStorageKey, CryptoHash, Gas, PanicOnDefault, Promise, PromiseOrValue,
};

pub use near_contract_standards::non_fungible_token::{Token, TokenId};

pub const NANOS_PER_SEC: u64 = 1_000_000_000;

pub(crate) fn hash_account_id(account_id: &AccountId) -> CryptoHash {
    let mut hash = CryptoHash::default();
    hash.copy_from_slice(&env::sha256(account_id.as_bytes()));
    hash
}
