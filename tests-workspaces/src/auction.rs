use near_sdk::json_types::{U128, U64};
use near_units::{parse_gas, parse_near};
use nft_auction_market::{AuctionArgs, AuctionJson};
use serde_json::json;

use crate::transaction_status::StatusCheck;
use crate::utils::{
    approve_auction, approve_market, block_timestamp, create_subaccount, deposit, init_market,
    init_nft, mint_token, wait_until, NANOS_PER_SEC,
};

const RESERVE_PRICE: u128 = parse_near!("1 N");
const NEXT_BID: u128 = parse_near!("2 N");

#[tokio::test]
async fn create_auction_reverts_if_not_owner() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let deployer = worker.root_account();
    let nft = init_nft(&worker, deployer.id()).await?;
    let market = init_market(&worker, deployer.id(), vec![nft.id()]).await?;
    let creator = create_subaccount(&worker, &deployer, "creator").await?;

    let token_id = mint_token(&worker, nft.id(), &creator).await?;
    approve_market(&worker, nft.id(), market.id(), &creator, &token_id).await?;

    let now = block_timestamp(&worker, &market).await?;
    let outcome = deployer
        .call(&worker, market.id(), "create_auction")
        .args_json(json!({
            "nft_contract_id": nft.id(),
            "token_id": token_id,
            "reserve_price": U128(RESERVE_PRICE),
            "end": U64(now + 400 * NANOS_PER_SEC),
        }))?
        .gas(parse_gas!("100 Tgas") as u64)
        .transact()
        .await;
    outcome.assert_err("Not owner")?;

    let auctions: Vec<AuctionJson> = market
        .view(&worker, "get_auctions", json!({}).to_string().into_bytes())
        .await?
        .json()?;
    assert!(auctions.is_empty());
    Ok(())
}

#[tokio::test]
async fn create_auction_emits_event() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let deployer = worker.root_account();
    let nft = init_nft(&worker, deployer.id()).await?;
    let market = init_market(&worker, deployer.id(), vec![nft.id()]).await?;
    let creator = create_subaccount(&worker, &deployer, "creator").await?;

    let token_id = mint_token(&worker, nft.id(), &creator).await?;
    approve_market(&worker, nft.id(), market.id(), &creator, &token_id).await?;
    deposit(&worker, market.id(), &creator).await?;

    let now = block_timestamp(&worker, &market).await?;
    let outcome = creator
        .call(&worker, market.id(), "create_auction")
        .args_json(json!({
            "nft_contract_id": nft.id(),
            "token_id": token_id,
            "reserve_price": U128(RESERVE_PRICE),
            "end": U64(now + 400 * NANOS_PER_SEC),
        }))?
        .gas(parse_gas!("100 Tgas") as u64)
        .transact()
        .await;
    outcome.assert_event("auction_created")?;
    let auction_id: U128 = outcome.successful()?;

    let auction: AuctionJson = market
        .view(
            &worker,
            "get_auction",
            json!({ "auction_id": auction_id }).to_string().into_bytes(),
        )
        .await?
        .json()?;
    assert_eq!(auction.owner_id.as_str(), creator.id().as_str());
    assert_eq!(auction.token_id, token_id);
    assert!(auction.bid.is_none());
    Ok(())
}

#[tokio::test]
async fn place_bid_emits_event() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let deployer = worker.root_account();
    let nft = init_nft(&worker, deployer.id()).await?;
    let market = init_market(&worker, deployer.id(), vec![nft.id()]).await?;
    let creator = create_subaccount(&worker, &deployer, "creator").await?;
    let alice = create_subaccount(&worker, &deployer, "alice").await?;

    let token_id = mint_token(&worker, nft.id(), &creator).await?;
    deposit(&worker, market.id(), &creator).await?;
    let now = block_timestamp(&worker, &market).await?;
    let args = AuctionArgs {
        reserve_price: U128(RESERVE_PRICE),
        end: U64(now + 6000 * NANOS_PER_SEC),
        minimal_step: None,
    };
    approve_auction(&worker, nft.id(), market.id(), &creator, &token_id, &args)
        .await
        .assert_event("auction_created")?;

    let outcome = alice
        .call(&worker, market.id(), "place_bid")
        .args_json(json!({ "auction_id": "0" }))?
        .deposit(NEXT_BID + 1)
        .transact()
        .await;
    outcome.assert_event("bid_placed")?;

    let buyer: Option<String> = market
        .view(
            &worker,
            "get_current_buyer",
            json!({ "auction_id": "0" }).to_string().into_bytes(),
        )
        .await?
        .json()?;
    assert_eq!(buyer.as_deref(), Some(alice.id().as_str()));
    Ok(())
}

#[tokio::test]
async fn place_bid_reverts_after_end() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let deployer = worker.root_account();
    let nft = init_nft(&worker, deployer.id()).await?;
    let market = init_market(&worker, deployer.id(), vec![nft.id()]).await?;
    let creator = create_subaccount(&worker, &deployer, "creator").await?;
    let alice = create_subaccount(&worker, &deployer, "alice").await?;

    let token_id = mint_token(&worker, nft.id(), &creator).await?;
    deposit(&worker, market.id(), &creator).await?;
    let now = block_timestamp(&worker, &market).await?;
    let end = now + 10 * NANOS_PER_SEC;
    let args = AuctionArgs {
        reserve_price: U128(RESERVE_PRICE),
        end: U64(end),
        minimal_step: None,
    };
    approve_auction(&worker, nft.id(), market.id(), &creator, &token_id, &args)
        .await
        .assert_success()?;

    wait_until(&worker, &market, end).await?;
    let outcome = alice
        .call(&worker, market.id(), "place_bid")
        .args_json(json!({ "auction_id": "0" }))?
        .deposit(NEXT_BID)
        .transact()
        .await;
    outcome.assert_err("Auction Ended")?;
    Ok(())
}

#[tokio::test]
async fn outbid_bidder_gets_refund() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let deployer = worker.root_account();
    let nft = init_nft(&worker, deployer.id()).await?;
    let market = init_market(&worker, deployer.id(), vec![nft.id()]).await?;
    let creator = create_subaccount(&worker, &deployer, "creator").await?;
    let alice = create_subaccount(&worker, &deployer, "alice").await?;
    let bob = create_subaccount(&worker, &deployer, "bob").await?;

    let token_id = mint_token(&worker, nft.id(), &creator).await?;
    deposit(&worker, market.id(), &creator).await?;
    let now = block_timestamp(&worker, &market).await?;
    let args = AuctionArgs {
        reserve_price: U128(RESERVE_PRICE),
        end: U64(now + 6000 * NANOS_PER_SEC),
        minimal_step: Some(U128(parse_near!("0.1 N"))),
    };
    approve_auction(&worker, nft.id(), market.id(), &creator, &token_id, &args)
        .await
        .assert_success()?;

    alice
        .call(&worker, market.id(), "place_bid")
        .args_json(json!({ "auction_id": "0" }))?
        .deposit(RESERVE_PRICE)
        .transact()
        .await
        .assert_success()?;
    let balance_before = alice.view_account(&worker).await?.balance;

    // the step is 0.1 N, so 1.05 N is not enough
    bob.call(&worker, market.id(), "place_bid")
        .args_json(json!({ "auction_id": "0" }))?
        .deposit(parse_near!("1.05 N"))
        .transact()
        .await
        .assert_err("Should bid at least")?;
    bob.call(&worker, market.id(), "place_bid")
        .args_json(json!({ "auction_id": "0" }))?
        .deposit(NEXT_BID)
        .transact()
        .await
        .assert_success()?;

    let balance_after = alice.view_account(&worker).await?.balance;
    assert_eq!(balance_after - balance_before, RESERVE_PRICE);

    let bid: Option<U128> = market
        .view(
            &worker,
            "get_current_bid",
            json!({ "auction_id": "0" }).to_string().into_bytes(),
        )
        .await?
        .json()?;
    assert_eq!(bid, Some(U128(NEXT_BID)));
    Ok(())
}

#[tokio::test]
async fn cancel_auction_before_bids() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let deployer = worker.root_account();
    let nft = init_nft(&worker, deployer.id()).await?;
    let market = init_market(&worker, deployer.id(), vec![nft.id()]).await?;
    let creator = create_subaccount(&worker, &deployer, "creator").await?;
    let alice = create_subaccount(&worker, &deployer, "alice").await?;

    let token_id = mint_token(&worker, nft.id(), &creator).await?;
    deposit(&worker, market.id(), &creator).await?;
    let now = block_timestamp(&worker, &market).await?;
    let args = AuctionArgs {
        reserve_price: U128(RESERVE_PRICE),
        end: U64(now + 6000 * NANOS_PER_SEC),
        minimal_step: None,
    };
    approve_auction(&worker, nft.id(), market.id(), &creator, &token_id, &args)
        .await
        .assert_success()?;

    alice
        .call(&worker, market.id(), "cancel_auction")
        .args_json(json!({ "auction_id": "0" }))?
        .deposit(1)
        .transact()
        .await
        .assert_err("Only the auction owner can cancel the auction")?;
    creator
        .call(&worker, market.id(), "cancel_auction")
        .args_json(json!({ "auction_id": "0" }))?
        .deposit(1)
        .transact()
        .await
        .assert_event("auction_cancelled")?;

    let supply: U64 = market
        .view(&worker, "get_supply_auctions", json!({}).to_string().into_bytes())
        .await?
        .json()?;
    assert_eq!(supply, U64(0));
    Ok(())
}

#[tokio::test]
async fn finish_auction_transfers_token_and_pays_seller() -> anyhow::Result<()> {
    let worker = workspaces::sandbox().await?;
    let deployer = worker.root_account();
    let nft = init_nft(&worker, deployer.id()).await?;
    let market = init_market(&worker, deployer.id(), vec![nft.id()]).await?;
    let creator = create_subaccount(&worker, &deployer, "creator").await?;
    let alice = create_subaccount(&worker, &deployer, "alice").await?;

    let token_id = mint_token(&worker, nft.id(), &creator).await?;
    deposit(&worker, market.id(), &creator).await?;
    let now = block_timestamp(&worker, &market).await?;
    let end = now + 15 * NANOS_PER_SEC;
    let args = AuctionArgs {
        reserve_price: U128(RESERVE_PRICE),
        end: U64(end),
        minimal_step: None,
    };
    approve_auction(&worker, nft.id(), market.id(), &creator, &token_id, &args)
        .await
        .assert_success()?;
    alice
        .call(&worker, market.id(), "place_bid")
        .args_json(json!({ "auction_id": "0" }))?
        .deposit(NEXT_BID)
        .transact()
        .await
        .assert_success()?;

    deployer
        .call(&worker, market.id(), "finish_auction")
        .args_json(json!({ "auction_id": "0" }))?
        .gas(parse_gas!("300 Tgas") as u64)
        .transact()
        .await
        .assert_err("Auction can be finalized only after the end time")?;

    wait_until(&worker, &market, end).await?;
    let seller_before = creator.view_account(&worker).await?.balance;
    let outcome = deployer
        .call(&worker, market.id(), "finish_auction")
        .args_json(json!({ "auction_id": "0" }))?
        .gas(parse_gas!("300 Tgas") as u64)
        .transact()
        .await;
    outcome.assert_event("auction_finished")?;
    assert!(outcome.successful::<bool>()?);

    let token: serde_json::Value = nft
        .view(
            &worker,
            "nft_token",
            json!({ "token_id": token_id }).to_string().into_bytes(),
        )
        .await?
        .json()?;
    assert_eq!(token["owner_id"], alice.id().as_str());

    // 3% of the price stays with the market
    let fee = NEXT_BID * 300 / 10_000;
    let seller_after = creator.view_account(&worker).await?.balance;
    assert_eq!(seller_after - seller_before, NEXT_BID - fee);
    let collected: U128 = market
        .view(&worker, "get_collected_fees", json!({}).to_string().into_bytes())
        .await?
        .json()?;
    assert_eq!(collected, U128(fee));
    Ok(())
}
