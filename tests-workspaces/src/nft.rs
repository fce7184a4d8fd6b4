use near_sdk::json_types::U128;
use near_units::{parse_gas, parse_near};
use serde_json::json;

use crate::transaction_status::StatusCheck;
use crate::utils::{create_subaccount, init_nft, mint_token, MINT_PRICE};

#[tokio::test]
async fn mint_requires_price() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let owner = worker.root_account();
    let nft = init_nft(&worker, owner.id()).await?;
    let user1 = create_subaccount(&worker, &owner, "user1").await?;

    let price: U128 = nft
        .view(&worker, "get_mint_price", json!({}).to_string().into_bytes())
        .await?
        .json()?;
    assert_eq!(price, U128(MINT_PRICE));

    user1
        .call(&worker, nft.id(), "nft_mint")
        .args_json(json!({}))?
        .deposit(parse_near!("0.1 N"))
        .gas(parse_gas!("100 Tgas") as u64)
        .transact()
        .await
        .assert_err("Attached deposit must cover the mint price")?;

    let token_id = mint_token(&worker, nft.id(), &user1).await?;
    assert_eq!(token_id, "1");
    let token_id = mint_token(&worker, nft.id(), &user1).await?;
    assert_eq!(token_id, "2");

    let supply: U128 = nft
        .view(
            &worker,
            "nft_supply_for_owner",
            json!({ "account_id": user1.id() }).to_string().into_bytes(),
        )
        .await?
        .json()?;
    assert_eq!(supply, U128(2));
    Ok(())
}

#[tokio::test]
async fn mint_refunds_excess_deposit() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let owner = worker.root_account();
    let nft = init_nft(&worker, owner.id()).await?;
    let user1 = create_subaccount(&worker, &owner, "user1").await?;

    let balance_before = user1.view_account(&worker).await?.balance;
    user1
        .call(&worker, nft.id(), "nft_mint")
        .args_json(json!({}))?
        .deposit(parse_near!("2 N"))
        .gas(parse_gas!("100 Tgas") as u64)
        .transact()
        .await
        .assert_success()?;
    let balance_after = user1.view_account(&worker).await?.balance;

    // gas is paid on top of the price
    let spent = balance_before - balance_after;
    assert!(spent >= MINT_PRICE);
    assert!(spent < MINT_PRICE + parse_near!("0.05 N"));
    Ok(())
}

#[tokio::test]
async fn mint_proceeds_go_to_owner() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let owner = worker.root_account();
    let nft = init_nft(&worker, owner.id()).await?;
    let user1 = create_subaccount(&worker, &owner, "user1").await?;
    mint_token(&worker, nft.id(), &user1).await?;

    user1
        .call(&worker, nft.id(), "withdraw")
        .args_json(json!({}))?
        .deposit(1)
        .transact()
        .await
        .assert_err("Only the owner can withdraw")?;

    let balance_before = owner.view_account(&worker).await?.balance;
    owner
        .call(&worker, nft.id(), "withdraw")
        .args_json(json!({ "amount": U128(MINT_PRICE) }))?
        .deposit(1)
        .transact()
        .await
        .assert_success()?;
    let balance_after = owner.view_account(&worker).await?.balance;
    assert!(balance_after + parse_near!("0.01 N") > balance_before + MINT_PRICE);
    Ok(())
}
