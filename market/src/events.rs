//! NEP-297 events emitted by the market.
//!
//! Every event is logged as `EVENT_JSON:{"standard":"nft_auction_market","version":"1.0.0",...}`
//! so indexers can follow auctions without reading contract state.
use crate::*;
use near_sdk::serde_json;

pub const EVENT_STANDARD: &str = "nft_auction_market";
pub const EVENT_STANDARD_VERSION: &str = "1.0.0";

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
#[serde(tag = "event", content = "data")]
#[serde(rename_all = "snake_case")]
enum MarketEvent<'a> {
    AuctionCreated(&'a [AuctionCreated<'a>]),
    BidPlaced(&'a [BidPlaced<'a>]),
    AuctionCancelled(&'a [AuctionCancelled<'a>]),
    AuctionFinished(&'a [AuctionFinished<'a>]),
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
struct EventLog<'a> {
    standard: &'static str,
    version: &'static str,
    #[serde(flatten)]
    event: &'a MarketEvent<'a>,
}

impl MarketEvent<'_> {
    fn emit(&self) {
        let log = EventLog {
            standard: EVENT_STANDARD,
            version: EVENT_STANDARD_VERSION,
            event: self,
        };
        let json = serde_json::to_string(&log)
            .unwrap_or_else(|_| env::panic_str("Failed to serialize event"));
        env::log_str(&format!("EVENT_JSON:{}", json));
    }
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct AuctionCreated<'a> {
    pub auction_id: U128,
    pub owner_id: &'a AccountId,
    pub nft_contract_id: &'a AccountId,
    pub token_id: &'a str,
    pub reserve_price: U128,
    pub end: U64,
}

impl AuctionCreated<'_> {
    pub fn emit(self) {
        MarketEvent::AuctionCreated(&[self]).emit()
    }
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct BidPlaced<'a> {
    pub auction_id: U128,
    pub bidder_id: &'a AccountId,
    pub amount: U128,
    pub end: U64,
}

impl BidPlaced<'_> {
    pub fn emit(self) {
        MarketEvent::BidPlaced(&[self]).emit()
    }
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct AuctionCancelled<'a> {
    pub auction_id: U128,
    pub owner_id: &'a AccountId,
}

impl AuctionCancelled<'_> {
    pub fn emit(self) {
        MarketEvent::AuctionCancelled(&[self]).emit()
    }
}

#[derive(Serialize)]
#[serde(crate = "near_sdk::serde")]
pub struct AuctionFinished<'a> {
    pub auction_id: U128,
    pub owner_id: &'a AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<&'a AccountId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<U128>,
}

impl AuctionFinished<'_> {
    pub fn emit(self) {
        MarketEvent::AuctionFinished(&[self]).emit()
    }
}
