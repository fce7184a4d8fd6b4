use std::collections::HashMap;

use near_contract_standards::non_fungible_token::approval::NonFungibleTokenApproval;
use near_contract_standards::non_fungible_token::core::NonFungibleTokenCore;
use near_contract_standards::non_fungible_token::enumeration::NonFungibleTokenEnumeration;
use near_sdk::test_utils::{accounts, get_logs, VMContextBuilder};
use near_sdk::testing_env;

use crate::*;

const APPROVAL_DEPOSIT: Balance = 10_000_000_000_000_000_000_000;

fn nft_id() -> AccountId {
    "nft.near".parse().unwrap()
}

fn market_id() -> AccountId {
    "market.near".parse().unwrap()
}

fn context(predecessor: AccountId) -> VMContextBuilder {
    let mut builder = VMContextBuilder::new();
    builder
        .current_account_id(nft_id())
        .signer_account_id(predecessor.clone())
        .predecessor_account_id(predecessor);
    builder
}

fn setup() -> Nft {
    testing_env!(context(accounts(0)).build());
    Nft::new_default_meta(accounts(0))
}

fn setup_with_royalty(royalty: HashMap<AccountId, u32>) -> Nft {
    testing_env!(context(accounts(0)).build());
    Nft::new(
        accounts(0),
        NFTContractMetadata {
            spec: "nft-1.0.0".to_string(),
            name: "Royalty NFT".to_string(),
            symbol: "ROYAL".to_string(),
            icon: None,
            base_uri: None,
            reference: None,
            reference_hash: None,
        },
        None,
        Some(royalty),
    )
}

fn mint(contract: &mut Nft, minter: AccountId) -> Token {
    testing_env!(context(minter).attached_deposit(MINT_PRICE).build());
    contract.nft_mint(None, None)
}

#[test]
fn mint_for_the_price() {
    let mut contract = setup();
    assert_eq!(contract.get_mint_price(), U128(MINT_PRICE));

    let token = mint(&mut contract, accounts(1));
    assert_eq!(token.token_id, "1");
    assert_eq!(token.owner_id, accounts(1));
    assert_eq!(
        token.metadata.and_then(|metadata| metadata.title),
        Some("Locale NFT #1".to_string())
    );
    assert!(get_logs()
        .iter()
        .any(|log| log.starts_with("EVENT_JSON:") && log.contains("\"event\":\"nft_mint\"")));
}

#[test]
fn token_ids_are_sequential() {
    let mut contract = setup();
    mint(&mut contract, accounts(1));
    let token = mint(&mut contract, accounts(2));
    assert_eq!(token.token_id, "2");

    testing_env!(context(accounts(1))
        .attached_deposit(MINT_PRICE)
        .build());
    let token = contract.nft_mint(Some(accounts(3)), None);
    assert_eq!(token.token_id, "3");
    assert_eq!(token.owner_id, accounts(3));
    assert_eq!(contract.nft_total_supply(), U128(3));
    assert_eq!(contract.nft_supply_for_owner(accounts(3)), U128(1));
}

#[test]
#[should_panic(expected = "Attached deposit must cover the mint price of 500000000000000000000000")]
fn mint_below_price() {
    let mut contract = setup();
    testing_env!(context(accounts(1))
        .attached_deposit(MINT_PRICE - 1)
        .build());
    contract.nft_mint(None, None);
}

#[test]
#[should_panic(expected = "maximum royalty cap exceeded")]
fn royalty_over_cap() {
    setup_with_royalty(HashMap::from([(accounts(0), 3_000), (accounts(1), 2_001)]));
}

#[test]
fn payout_splits_royalty() {
    let mut contract = setup_with_royalty(HashMap::from([(accounts(0), 1_000)]));
    mint(&mut contract, accounts(1));
    let payout = contract.nft_payout("1".to_string(), U128(10_000), 10);
    assert_eq!(
        payout.payout,
        HashMap::from([(accounts(0), U128(1_000)), (accounts(1), U128(9_000))])
    );
}

#[test]
fn payout_to_royalty_holder_who_owns_the_token() {
    let mut contract = setup_with_royalty(HashMap::from([(accounts(0), 1_000)]));
    mint(&mut contract, accounts(0));
    let payout = contract.nft_payout("1".to_string(), U128(10_000), 1);
    assert_eq!(payout.payout, HashMap::from([(accounts(0), U128(10_000))]));
}

#[test]
#[should_panic(expected = "Market cannot payout to that many receivers")]
fn payout_too_many_receivers() {
    let mut contract = setup_with_royalty(HashMap::from([(accounts(0), 1_000)]));
    mint(&mut contract, accounts(1));
    contract.nft_payout("1".to_string(), U128(10_000), 1);
}

#[test]
fn transfer_payout_by_approved_market() {
    let mut contract = setup();
    mint(&mut contract, accounts(1));

    testing_env!(context(accounts(1))
        .attached_deposit(APPROVAL_DEPOSIT)
        .build());
    contract.nft_approve("1".to_string(), market_id(), None);
    assert!(contract.nft_is_approved("1".to_string(), market_id(), Some(1)));

    testing_env!(context(market_id()).attached_deposit(1).build());
    let payout = contract.nft_transfer_payout(
        accounts(2),
        "1".to_string(),
        1,
        Some("auction 0".to_string()),
        U128(10_000),
        10,
    );
    assert_eq!(payout.payout, HashMap::from([(accounts(1), U128(10_000))]));

    let token = contract.nft_token("1".to_string()).expect("token");
    assert_eq!(token.owner_id, accounts(2));
    assert!(!contract.nft_is_approved("1".to_string(), market_id(), None));
}

#[test]
#[should_panic(expected = "Requires attached deposit of exactly 1 yoctoNEAR")]
fn transfer_payout_requires_one_yocto() {
    let mut contract = setup();
    mint(&mut contract, accounts(1));
    testing_env!(context(market_id()).build());
    contract.nft_transfer_payout(accounts(2), "1".to_string(), 1, None, U128(10_000), 10);
}

#[test]
#[should_panic(expected = "Only the owner can withdraw")]
fn withdraw_by_stranger() {
    let mut contract = setup();
    testing_env!(context(accounts(1)).attached_deposit(1).build());
    contract.withdraw(None);
}

#[test]
#[should_panic(expected = "Not enough balance to withdraw")]
fn withdraw_more_than_available() {
    let mut contract = setup();
    testing_env!(context(accounts(0)).attached_deposit(1).build());
    contract.withdraw(Some(U128(u128::MAX)));
}
