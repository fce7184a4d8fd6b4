use crate::auction::{contract_and_token_id, Auction, AuctionId, AuctionJson};
use crate::common::*;
use crate::*;

#[near_bindgen]
impl Market {
    pub fn get_timestamp(&self) -> U64 {
        env::block_timestamp().into()
    }

    pub fn get_supported_nft_contracts(&self) -> Vec<AccountId> {
        self.non_fungible_token_account_ids.to_vec()
    }

    pub fn get_protocol_fee(&self) -> u16 {
        self.market.protocol_fee
    }

    pub fn get_extension_duration(&self) -> U64 {
        self.market.extension_duration.into()
    }

    pub fn get_collected_fees(&self) -> U128 {
        self.market.collected_fees.into()
    }

    pub fn get_supply_auctions(&self) -> U64 {
        U64(self.market.auctions.len())
    }

    pub fn get_auction(&self, auction_id: U128) -> AuctionJson {
        let auction = self.internal_get_auction(auction_id);
        self.json_from_auction(auction_id.into(), auction)
    }

    pub fn get_auctions(&self, from_index: Option<U128>, limit: Option<u64>) -> Vec<AuctionJson> {
        let start_index: u128 = from_index.map(From::from).unwrap_or_default();
        let limit = limit.map(|v| v as usize).unwrap_or(usize::MAX);
        self.market
            .auctions
            .iter()
            .skip(start_index as usize)
            .take(limit)
            .map(|(auction_id, auction)| self.json_from_auction(auction_id, auction))
            .collect()
    }

    pub fn get_supply_by_owner_id(&self, account_id: AccountId) -> U64 {
        let by_owner_id = self.market.by_owner_id.get(&account_id);
        if let Some(by_owner_id) = by_owner_id {
            U64(by_owner_id.len())
        } else {
            U64(0)
        }
    }

    pub fn get_auctions_by_owner_id(
        &self,
        account_id: AccountId,
        from_index: Option<U128>,
        limit: Option<u64>,
    ) -> Vec<AuctionJson> {
        let by_owner_id = match self.market.by_owner_id.get(&account_id) {
            Some(by_owner_id) => by_owner_id,
            None => return vec![],
        };
        let start_index: u128 = from_index.map(From::from).unwrap_or_default();
        let limit = limit.map(|v| v as usize).unwrap_or(usize::MAX);
        by_owner_id
            .iter()
            .skip(start_index as usize)
            .take(limit)
            .filter_map(|auction_id| {
                self.market
                    .auctions
                    .get(&auction_id)
                    .map(|auction| self.json_from_auction(auction_id, auction))
            })
            .collect()
    }

    pub fn get_auction_for_token(
        &self,
        nft_contract_id: AccountId,
        token_id: TokenId,
    ) -> Option<AuctionJson> {
        let auction_id = self
            .market
            .by_contract_and_token_id
            .get(&contract_and_token_id(&nft_contract_id, &token_id))?;
        self.market
            .auctions
            .get(&auction_id)
            .map(|auction| self.json_from_auction(auction_id, auction))
    }

    pub fn get_current_buyer(&self, auction_id: U128) -> Option<AccountId> {
        self.internal_get_auction(auction_id)
            .bid
            .map(|bid| bid.owner_id)
    }

    pub fn get_current_bid(&self, auction_id: U128) -> Option<U128> {
        self.internal_get_auction(auction_id).bid.map(|bid| bid.price)
    }

    // Returns the minimum amount of the next auction bid
    pub fn get_minimal_next_bid(&self, auction_id: U128) -> U128 {
        U128(self.internal_get_auction(auction_id).minimal_next_bid())
    }

    pub fn check_auction_in_progress(&self, auction_id: U128) -> bool {
        self.internal_get_auction(auction_id).in_progress()
    }
}

impl Market {
    fn internal_get_auction(&self, auction_id: U128) -> Auction {
        self.market
            .auctions
            .get(&auction_id.into())
            .unwrap_or_else(|| env::panic_str("Auction does not exist"))
    }

    pub(crate) fn json_from_auction(&self, auction_id: AuctionId, auction: Auction) -> AuctionJson {
        AuctionJson {
            auction_id: auction_id.into(),
            owner_id: auction.owner_id,
            nft_contract_id: auction.nft_contract_id,
            token_id: auction.token_id,
            approval_id: auction.approval_id,
            bid: auction.bid,
            created_at: auction.created_at.into(),
            reserve_price: auction.reserve_price.into(),
            minimal_step: auction.minimal_step.into(),
            end: auction.end.into(),
        }
    }
}
