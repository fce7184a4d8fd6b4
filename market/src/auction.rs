use crate::bid::Bid;
use crate::events::{AuctionCancelled, AuctionCreated, AuctionFinished, BidPlaced};
use crate::fee::{calculate_protocol_fee, validate_payout, Payout, MAX_LEN_PAYOUT};
use crate::*;
use near_sdk::{ext_contract, promise_result_as_success};

pub const EXTENSION_DURATION: u64 = 15 * 60 * NANOS_PER_SEC; // 15 minutes
pub const MAX_DURATION: u64 = 1000 * 60 * 60 * 24 * NANOS_PER_SEC; // 1000 days

const GAS_FOR_NFT_TOKEN: Gas = Gas(10_000_000_000_000);
const GAS_FOR_RESOLVE_CREATE: Gas = Gas(20_000_000_000_000);
const GAS_FOR_NFT_TRANSFER: Gas = Gas(20_000_000_000_000);
const GAS_FOR_ROYALTIES: Gas = Gas(60_000_000_000_000);
const DEFAULT_MINIMAL_STEP: Balance = 1;
pub static DELIMITER: &str = "||";

pub type AuctionId = u128;
pub type ContractAndTokenId = String;

#[derive(BorshDeserialize, BorshSerialize)]
pub struct Auction {
    pub owner_id: AccountId,
    pub approval_id: u64,
    pub nft_contract_id: AccountId,
    pub token_id: TokenId,
    pub bid: Option<Bid>,
    pub created_at: u64,
    pub reserve_price: Balance,
    pub minimal_step: Balance,
    pub end: u64,
}

impl Auction {
    pub fn in_progress(&self) -> bool {
        env::block_timestamp() < self.end
    }

    // The first bid has to reach the reserve price, every next one has to beat
    // the current price by at least `minimal_step`
    pub fn minimal_next_bid(&self) -> Balance {
        if let Some(ref bid) = self.bid {
            bid.price.0.saturating_add(self.minimal_step)
        } else {
            self.reserve_price
        }
    }
}

/// Arguments of `create_auction`, also accepted as the `msg` of `nft_approve`.
#[derive(Serialize, Deserialize, Clone)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct AuctionArgs {
    pub reserve_price: U128,
    pub end: U64,
    pub minimal_step: Option<U128>,
}

#[derive(Serialize, Deserialize)]
#[cfg_attr(not(target_arch = "wasm32"), derive(Debug, PartialEq))]
#[serde(crate = "near_sdk::serde")]
pub struct AuctionJson {
    pub auction_id: U128,
    pub owner_id: AccountId,
    pub nft_contract_id: AccountId,
    pub token_id: TokenId,
    pub approval_id: u64,
    pub bid: Option<Bid>,
    pub created_at: U64,
    pub reserve_price: U128,
    pub minimal_step: U128,
    pub end: U64,
}

#[derive(BorshDeserialize, BorshSerialize)]
pub struct MarketAuctions {
    pub owner_id: AccountId,
    pub auctions: UnorderedMap<AuctionId, Auction>,
    pub by_owner_id: LookupMap<AccountId, UnorderedSet<AuctionId>>,
    pub by_contract_and_token_id: LookupMap<ContractAndTokenId, AuctionId>,
    pub storage_deposits: LookupMap<AccountId, Balance>,
    pub next_auction_id: AuctionId,
    pub protocol_fee: u16,
    pub extension_duration: u64,
    pub collected_fees: Balance,
}

pub(crate) fn contract_and_token_id(nft_contract_id: &AccountId, token_id: &str) -> ContractAndTokenId {
    format!("{}{}{}", nft_contract_id, DELIMITER, token_id)
}

#[near_bindgen]
impl Market {
    /// Puts `token_id` up for auction on behalf of the caller. The NFT contract is asked
    /// for the token first: the caller has to own it and the market has to be approved.
    pub fn create_auction(
        &mut self,
        nft_contract_id: AccountId,
        token_id: TokenId,
        reserve_price: U128,
        end: U64,
        minimal_step: Option<U128>,
    ) -> Promise {
        let owner_id = env::predecessor_account_id();
        let args = AuctionArgs {
            reserve_price,
            end,
            minimal_step,
        };
        // storage is checked in the callback, after the ownership check
        self.assert_auction_can_start(&args, &nft_contract_id, &token_id);
        ext_nft::ext(nft_contract_id.clone())
            .with_static_gas(GAS_FOR_NFT_TOKEN)
            .nft_token(token_id.clone())
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_RESOLVE_CREATE)
                    .resolve_create_auction(nft_contract_id, token_id, owner_id, args),
            )
    }

    #[private]
    pub fn resolve_create_auction(
        &mut self,
        nft_contract_id: AccountId,
        token_id: TokenId,
        owner_id: AccountId,
        args: AuctionArgs,
    ) -> U128 {
        let token = promise_result_as_success().and_then(|value| {
            near_sdk::serde_json::from_slice::<Option<Token>>(&value)
                .ok()
                .flatten()
        });
        self.internal_resolve_create_auction(token, nft_contract_id, token_id, owner_id, args)
            .into()
    }

    #[payable]
    pub fn place_bid(&mut self, auction_id: U128) {
        let mut auction = self
            .market
            .auctions
            .get(&auction_id.into())
            .unwrap_or_else(|| env::panic_str("Auction does not exist"));
        let now = env::block_timestamp();
        require!(now < auction.end, "Auction Ended");
        let bidder_id = env::predecessor_account_id();
        require!(
            bidder_id != auction.owner_id,
            "Cannot bid on your own auction"
        );
        let deposit = env::attached_deposit();
        let min_deposit = auction.minimal_next_bid();
        require!(
            deposit >= min_deposit,
            format!("Should bid at least {}", min_deposit)
        );
        let previous_bid = auction.bid.replace(Bid {
            owner_id: bidder_id.clone(),
            price: deposit.into(),
            placed_at: now.into(),
        });
        // Extend the auction if the bid is added less than `extension_duration` before the end
        let extension_duration = self.market.extension_duration;
        if auction.end - now < extension_duration {
            auction.end = now.saturating_add(extension_duration);
        }
        self.market.auctions.insert(&auction_id.into(), &auction);

        BidPlaced {
            auction_id,
            bidder_id: &bidder_id,
            amount: U128(deposit),
            end: U64(auction.end),
        }
        .emit();

        if let Some(previous_bid) = previous_bid {
            self.refund_bid(&previous_bid);
        }
    }

    #[payable]
    pub fn cancel_auction(&mut self, auction_id: U128) {
        assert_one_yocto();
        let auction = self
            .market
            .auctions
            .get(&auction_id.into())
            .unwrap_or_else(|| env::panic_str("Auction does not exist"));
        require!(
            auction.owner_id == env::predecessor_account_id(),
            "Only the auction owner can cancel the auction"
        );
        require!(
            auction.bid.is_none(),
            "Can't cancel the auction after the first bid is made"
        );
        let auction = self.internal_remove_auction(auction_id.into());
        AuctionCancelled {
            auction_id,
            owner_id: &auction.owner_id,
        }
        .emit();
    }

    /// Settles an auction after its end time. Without bids the auction is just closed,
    /// otherwise the token goes to the highest bidder and the price is paid out.
    pub fn finish_auction(&mut self, auction_id: U128) -> PromiseOrValue<bool> {
        let auction = self
            .market
            .auctions
            .get(&auction_id.into())
            .unwrap_or_else(|| env::panic_str("Auction does not exist"));
        require!(
            env::block_timestamp() >= auction.end,
            "Auction can be finalized only after the end time"
        );
        let auction = self.internal_remove_auction(auction_id.into());
        let final_bid = match auction.bid {
            Some(bid) => bid,
            None => {
                AuctionFinished {
                    auction_id,
                    owner_id: &auction.owner_id,
                    winner_id: None,
                    price: None,
                }
                .emit();
                return PromiseOrValue::Value(false);
            }
        };
        ext_nft::ext(auction.nft_contract_id.clone())
            .with_attached_deposit(1)
            .with_static_gas(GAS_FOR_NFT_TRANSFER)
            .nft_transfer_payout(
                final_bid.owner_id.clone(),
                auction.token_id.clone(),
                auction.approval_id,
                Some(format!("auction {}", auction_id.0)),
                final_bid.price,
                MAX_LEN_PAYOUT,
            )
            .then(
                Self::ext(env::current_account_id())
                    .with_static_gas(GAS_FOR_ROYALTIES)
                    .resolve_finish_auction(
                        auction_id,
                        auction.owner_id,
                        final_bid.owner_id,
                        final_bid.price,
                    ),
            )
            .into()
    }

    #[private]
    pub fn resolve_finish_auction(
        &mut self,
        auction_id: U128,
        owner_id: AccountId,
        buyer_id: AccountId,
        price: U128,
    ) -> bool {
        let payout = promise_result_as_success().and_then(|value| {
            near_sdk::serde_json::from_slice::<Payout>(&value).ok()
        });
        self.internal_resolve_payout(auction_id, owner_id, buyer_id, price, payout)
    }
}

impl Market {
    pub(crate) fn assert_auction_can_start(
        &self,
        args: &AuctionArgs,
        nft_contract_id: &AccountId,
        token_id: &str,
    ) {
        require!(
            self.non_fungible_token_account_ids.contains(nft_contract_id),
            "NFT contract is not supported"
        );
        require!(
            self.market
                .by_contract_and_token_id
                .get(&contract_and_token_id(nft_contract_id, token_id))
                .is_none(),
            "Token is already on auction"
        );
        let now = env::block_timestamp();
        require!(args.end.0 > now, "End time must be in the future");
        require!(args.end.0 - now <= MAX_DURATION, "Incorrect duration");
        require!(args.reserve_price.0 > 0, "Reserve price must be positive");
        require!(
            args.minimal_step.map_or(true, |step| step.0 > 0),
            "Minimal step must be positive"
        );
    }

    pub(crate) fn assert_storage_paid(&self, owner_id: &AccountId) {
        require!(
            self.storage_available(owner_id) >= STORAGE_PER_AUCTION,
            "Insufficient storage paid"
        );
    }

    pub(crate) fn start_auction(
        &mut self,
        args: AuctionArgs,
        token_id: TokenId,
        owner_id: AccountId,
        approval_id: u64,
        nft_contract_id: AccountId,
    ) -> AuctionId {
        self.assert_auction_can_start(&args, &nft_contract_id, &token_id);
        self.assert_storage_paid(&owner_id);
        let auction = Auction {
            owner_id,
            approval_id,
            nft_contract_id,
            token_id,
            bid: None,
            created_at: env::block_timestamp(),
            reserve_price: args.reserve_price.into(),
            minimal_step: args
                .minimal_step
                .map(u128::from)
                .unwrap_or(DEFAULT_MINIMAL_STEP),
            end: args.end.into(),
        };
        let auction_id = self.market.next_auction_id;
        self.market.next_auction_id += 1;
        self.internal_add_auction(auction_id, &auction);

        AuctionCreated {
            auction_id: auction_id.into(),
            owner_id: &auction.owner_id,
            nft_contract_id: &auction.nft_contract_id,
            token_id: &auction.token_id,
            reserve_price: auction.reserve_price.into(),
            end: auction.end.into(),
        }
        .emit();
        auction_id
    }

    /// Checks the token returned by the NFT contract and opens the auction.
    pub(crate) fn internal_resolve_create_auction(
        &mut self,
        token: Option<Token>,
        nft_contract_id: AccountId,
        token_id: TokenId,
        owner_id: AccountId,
        args: AuctionArgs,
    ) -> AuctionId {
        let token = token.unwrap_or_else(|| env::panic_str("Token does not exist"));
        require!(token.owner_id == owner_id, "Not owner");
        let approval_id = token
            .approved_account_ids
            .and_then(|approvals| approvals.get(&env::current_account_id()).copied())
            .unwrap_or_else(|| env::panic_str("Market is not approved to transfer the token"));
        self.start_auction(args, token_id, owner_id, approval_id, nft_contract_id)
    }

    /// Pays everyone out of the winning bid, or refunds it if the NFT contract
    /// didn't transfer the token or answered with an unusable payout.
    pub(crate) fn internal_resolve_payout(
        &mut self,
        auction_id: U128,
        owner_id: AccountId,
        buyer_id: AccountId,
        price: U128,
        payout: Option<Payout>,
    ) -> bool {
        let mut payout = match payout.and_then(|p| validate_payout(p, price.0, MAX_LEN_PAYOUT)) {
            Some(payout) => payout,
            None => {
                log!(
                    "Settlement of auction {} failed, refunding {} to {}",
                    auction_id.0,
                    price.0,
                    buyer_id
                );
                Promise::new(buyer_id).transfer(price.0);
                return false;
            }
        };

        // Protocol fee comes out of the seller's share
        let owner_share = payout
            .payout
            .remove(&owner_id)
            .map(u128::from)
            .unwrap_or_default();
        let protocol_fee = calculate_protocol_fee(price.0, self.market.protocol_fee).min(owner_share);
        let mut paid = owner_share;
        for (receiver_id, amount) in payout.payout {
            if amount.0 > 0 {
                Promise::new(receiver_id).transfer(amount.0);
            }
            paid += amount.0;
        }
        let owner_proceeds = owner_share - protocol_fee;
        if owner_proceeds > 0 {
            Promise::new(owner_id.clone()).transfer(owner_proceeds);
        }
        self.market.collected_fees += protocol_fee + (price.0 - paid);

        AuctionFinished {
            auction_id,
            owner_id: &owner_id,
            winner_id: Some(&buyer_id),
            price: Some(price),
        }
        .emit();
        true
    }
}

/// external contract calls

#[ext_contract(ext_nft)]
trait ExtNft {
    fn nft_token(&self, token_id: TokenId) -> Option<Token>;
    fn nft_transfer_payout(
        &mut self,
        receiver_id: AccountId,
        token_id: TokenId,
        approval_id: u64,
        memo: Option<String>,
        balance: U128,
        max_len_payout: u32,
    ) -> Payout;
}
