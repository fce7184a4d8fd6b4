use near_contract_standards::non_fungible_token::approval::NonFungibleTokenApprovalReceiver;

use crate::auction::AuctionArgs;
use crate::*;

#[near_bindgen]
impl NonFungibleTokenApprovalReceiver for Market {
    /// Opens an auction when the owner approves the market with `AuctionArgs` as `msg`.
    fn nft_on_approve(
        &mut self,
        token_id: TokenId,
        owner_id: AccountId,
        approval_id: u64,
        msg: String,
    ) -> PromiseOrValue<String> {
        let nft_contract_id = env::predecessor_account_id();
        require!(
            self.non_fungible_token_account_ids.contains(&nft_contract_id),
            "NFT contract is not supported"
        );
        let signer_id = env::signer_account_id();
        require!(
            nft_contract_id != signer_id,
            "nft_on_approve should only be called via cross-contract call"
        );
        require!(owner_id == signer_id, "owner_id should be signer_id");

        let args: AuctionArgs = near_sdk::serde_json::from_str(&msg)
            .unwrap_or_else(|_| env::panic_str("Invalid auction arguments"));
        let auction_id = self.start_auction(args, token_id, owner_id, approval_id, nft_contract_id);
        PromiseOrValue::Value(auction_id.to_string())
    }
}
