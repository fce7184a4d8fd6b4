use crate::auction::{contract_and_token_id, Auction, AuctionId};
use crate::common::*;
use crate::{Market, StorageKey};

impl Market {
    pub(crate) fn internal_add_auction(&mut self, auction_id: AuctionId, auction: &Auction) {
        self.market.auctions.insert(&auction_id, auction);

        let mut by_owner_id = self
            .market
            .by_owner_id
            .get(&auction.owner_id)
            .unwrap_or_else(|| {
                UnorderedSet::new(StorageKey::ByOwnerIdInner {
                    account_id_hash: hash_account_id(&auction.owner_id),
                })
            });
        by_owner_id.insert(&auction_id);
        self.market
            .by_owner_id
            .insert(&auction.owner_id, &by_owner_id);

        self.market.by_contract_and_token_id.insert(
            &contract_and_token_id(&auction.nft_contract_id, &auction.token_id),
            &auction_id,
        );
    }

    pub(crate) fn internal_remove_auction(&mut self, auction_id: AuctionId) -> Auction {
        let auction = self
            .market
            .auctions
            .remove(&auction_id)
            .unwrap_or_else(|| env::panic_str("Auction does not exist"));

        let mut by_owner_id = self
            .market
            .by_owner_id
            .get(&auction.owner_id)
            .unwrap_or_else(|| env::panic_str("No auction by_owner_id"));
        by_owner_id.remove(&auction_id);
        if by_owner_id.is_empty() {
            self.market.by_owner_id.remove(&auction.owner_id);
        } else {
            self.market
                .by_owner_id
                .insert(&auction.owner_id, &by_owner_id);
        }

        self.market
            .by_contract_and_token_id
            .remove(&contract_and_token_id(&auction.nft_contract_id, &auction.token_id));

        auction
    }
}
