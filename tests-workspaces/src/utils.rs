use std::time::Duration;

use near_sdk::json_types::U64;
use near_units::{parse_gas, parse_near};
use nft_auction_market::AuctionArgs;
use serde_json::json;
use workspaces::prelude::*;
use workspaces::result::CallExecutionDetails;
use workspaces::{Account, AccountId, Contract, DevNetwork, Worker};

use crate::transaction_status::StatusCheck;

const NFT_WASM_FILEPATH: &str = "../res/nft_contract.wasm";
const MARKET_WASM_FILEPATH: &str = "../res/nft_auction_market.wasm";

pub const MINT_PRICE: u128 = parse_near!("0.5 N");
pub const NANOS_PER_SEC: u64 = 1_000_000_000;

pub async fn init_nft(
    worker: &Worker<impl DevNetwork>,
    root_id: &AccountId,
) -> anyhow::Result<Contract> {
    let wasm = std::fs::read(NFT_WASM_FILEPATH)?;
    let contract = worker.dev_deploy(&wasm).await?;
    contract
        .call(worker, "new_default_meta")
        .args_json(json!({
            "owner_id": root_id,
        }))?
        .gas(parse_gas!("150 Tgas") as u64)
        .transact()
        .await
        .assert_success()?;
    Ok(contract)
}

/// Deploys the market with the bid extension switched off, so auctions end exactly at `end`.
pub async fn init_market(
    worker: &Worker<impl DevNetwork>,
    root_id: &AccountId,
    nft_ids: Vec<&AccountId>,
) -> anyhow::Result<Contract> {
    let wasm = std::fs::read(MARKET_WASM_FILEPATH)?;
    let contract = worker.dev_deploy(&wasm).await?;
    contract
        .call(worker, "new")
        .args_json(json!({
            "nft_ids": nft_ids,
            "owner_id": root_id,
            "extension_duration": "0",
        }))?
        .gas(parse_gas!("150 Tgas") as u64)
        .transact()
        .await
        .assert_success()?;
    Ok(contract)
}

pub async fn create_subaccount(
    worker: &Worker<impl DevNetwork>,
    owner: &Account,
    user_id: &str,
) -> anyhow::Result<Account> {
    let user = owner
        .create_subaccount(worker, user_id)
        .initial_balance(parse_near!("10 N"))
        .transact()
        .await?
        .into_result()?;
    Ok(user)
}

/// Buys the next token of the collection for `minter` and returns its id.
pub async fn mint_token(
    worker: &Worker<impl DevNetwork>,
    nft_id: &AccountId,
    minter: &Account,
) -> anyhow::Result<String> {
    let token: serde_json::Value = minter
        .call(worker, nft_id, "nft_mint")
        .args_json(json!({}))?
        .deposit(MINT_PRICE)
        .gas(parse_gas!("100 Tgas") as u64)
        .transact()
        .await
        .successful()?;
    token["token_id"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("nft_mint returned no token_id"))
}

pub async fn deposit(
    worker: &Worker<impl DevNetwork>,
    market_id: &AccountId,
    account: &Account,
) -> anyhow::Result<()> {
    account
        .call(worker, market_id, "storage_deposit")
        .args_json(json!({}))?
        .deposit(parse_near!("0.01 N"))
        .transact()
        .await
        .assert_success()
}

/// Approves the market for `token_id` without opening an auction.
pub async fn approve_market(
    worker: &Worker<impl DevNetwork>,
    nft_id: &AccountId,
    market_id: &AccountId,
    owner: &Account,
    token_id: &str,
) -> anyhow::Result<()> {
    owner
        .call(worker, nft_id, "nft_approve")
        .args_json(json!({
            "token_id": token_id,
            "account_id": market_id,
        }))?
        .deposit(parse_near!("0.01 N"))
        .gas(parse_gas!("100 Tgas") as u64)
        .transact()
        .await
        .assert_success()
}

/// Opens an auction through `nft_approve`, the market reacts in `nft_on_approve`.
pub async fn approve_auction(
    worker: &Worker<impl DevNetwork>,
    nft_id: &AccountId,
    market_id: &AccountId,
    owner: &Account,
    token_id: &str,
    args: &AuctionArgs,
) -> anyhow::Result<CallExecutionDetails> {
    owner
        .call(worker, nft_id, "nft_approve")
        .args_json(json!({
            "token_id": token_id,
            "account_id": market_id,
            "msg": serde_json::to_string(args)?,
        }))?
        .deposit(parse_near!("0.01 N"))
        .gas(parse_gas!("200 Tgas") as u64)
        .transact()
        .await
}

pub async fn block_timestamp(
    worker: &Worker<impl DevNetwork>,
    market: &Contract,
) -> anyhow::Result<u64> {
    let timestamp: U64 = market
        .view(worker, "get_timestamp", json!({}).to_string().into_bytes())
        .await?
        .json()?;
    Ok(timestamp.0)
}

/// Sleeps until the chain's clock passes `end`.
pub async fn wait_until(
    worker: &Worker<impl DevNetwork>,
    market: &Contract,
    end: u64,
) -> anyhow::Result<()> {
    while block_timestamp(worker, market).await? <= end {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    Ok(())
}
