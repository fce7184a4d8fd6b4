use near_sdk::json_types::{U128, U64};
use near_units::{parse_gas, parse_near};
use nft_auction_market::AuctionArgs;
use serde_json::json;

use crate::transaction_status::StatusCheck;
use crate::utils::{
    approve_auction, block_timestamp, create_subaccount, deposit, init_market, init_nft,
    mint_token, NANOS_PER_SEC,
};

#[tokio::test]
async fn storage_deposit_and_withdraw() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let owner = worker.root_account();
    let nft = init_nft(&worker, owner.id()).await?;
    let market = init_market(&worker, owner.id(), vec![nft.id()]).await?;
    let user1 = create_subaccount(&worker, &owner, "user1").await?;

    user1
        .call(&worker, market.id(), "storage_deposit")
        .args_json(json!({}))?
        .deposit(parse_near!("0.001 N"))
        .transact()
        .await
        .assert_err("Requires minimum deposit of")?;

    deposit(&worker, market.id(), &user1).await?;
    deposit(&worker, market.id(), &user1).await?;
    let balance: U128 = market
        .view(
            &worker,
            "storage_balance_of",
            json!({ "account_id": user1.id() }).to_string().into_bytes(),
        )
        .await?
        .json()?;
    assert_eq!(balance, U128(parse_near!("0.02 N")));

    // one auction keeps 0.01 N locked
    let token_id = mint_token(&worker, nft.id(), &user1).await?;
    let now = block_timestamp(&worker, &market).await?;
    let args = AuctionArgs {
        reserve_price: U128(parse_near!("1 N")),
        end: U64(now + 6000 * NANOS_PER_SEC),
        minimal_step: None,
    };
    approve_auction(&worker, nft.id(), market.id(), &user1, &token_id, &args)
        .await
        .assert_success()?;

    user1
        .call(&worker, market.id(), "storage_withdraw")
        .deposit(1)
        .transact()
        .await
        .assert_success()?;
    let balance: U128 = market
        .view(
            &worker,
            "storage_balance_of",
            json!({ "account_id": user1.id() }).to_string().into_bytes(),
        )
        .await?
        .json()?;
    assert_eq!(balance, U128(parse_near!("0.01 N")));
    Ok(())
}

#[tokio::test]
async fn nft_on_approve_only_from_supported_contract() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let owner = worker.root_account();
    let nft = init_nft(&worker, owner.id()).await?;
    let other_nft = init_nft(&worker, owner.id()).await?;
    let market = init_market(&worker, owner.id(), vec![nft.id()]).await?;
    let user1 = create_subaccount(&worker, &owner, "user1").await?;
    deposit(&worker, market.id(), &user1).await?;

    let now = block_timestamp(&worker, &market).await?;
    let args = AuctionArgs {
        reserve_price: U128(parse_near!("1 N")),
        end: U64(now + 6000 * NANOS_PER_SEC),
        minimal_step: None,
    };

    // direct call, not through the NFT contract
    user1
        .call(&worker, market.id(), "nft_on_approve")
        .args_json(json!({
            "token_id": "1",
            "owner_id": user1.id(),
            "approval_id": 1,
            "msg": serde_json::to_string(&args)?,
        }))?
        .gas(parse_gas!("100 Tgas") as u64)
        .transact()
        .await
        .assert_err("NFT contract is not supported")?;

    let token_id = mint_token(&worker, other_nft.id(), &user1).await?;
    approve_auction(&worker, other_nft.id(), market.id(), &user1, &token_id, &args)
        .await
        .assert_err("NFT contract is not supported")?;

    let supply: U64 = market
        .view(&worker, "get_supply_auctions", json!({}).to_string().into_bytes())
        .await?
        .json()?;
    assert_eq!(supply, U64(0));
    Ok(())
}

#[tokio::test]
async fn withdraw_fees_only_by_owner() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let owner = worker.root_account();
    let nft = init_nft(&worker, owner.id()).await?;
    let market = init_market(&worker, owner.id(), vec![nft.id()]).await?;
    let user1 = create_subaccount(&worker, &owner, "user1").await?;

    user1
        .call(&worker, market.id(), "withdraw_fees")
        .args_json(json!({}))?
        .deposit(1)
        .transact()
        .await
        .assert_err("Only the market owner can withdraw fees")?;
    owner
        .call(&worker, market.id(), "withdraw_fees")
        .args_json(json!({ "amount": "1" }))?
        .deposit(1)
        .transact()
        .await
        .assert_err("Not enough collected fees")?;
    Ok(())
}
