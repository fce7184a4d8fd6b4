use near_contract_standards::non_fungible_token::events::NftMint;

use crate::*;

#[near_bindgen]
impl Nft {
    /// Mints the next token of the collection. The caller pays `mint_price`, or the
    /// storage cost of the token if that is higher, and gets the rest of the deposit back.
    #[payable]
    pub fn nft_mint(
        &mut self,
        receiver_id: Option<AccountId>,
        token_metadata: Option<TokenMetadata>,
    ) -> Token {
        let initial_storage_usage = env::storage_usage();
        let receiver_id = receiver_id.unwrap_or_else(env::predecessor_account_id);
        let token_id = self.next_token_id.to_string();
        self.next_token_id += 1;
        let token_metadata =
            token_metadata.unwrap_or_else(|| self.default_token_metadata(&token_id));

        let token = self.tokens.internal_mint_with_refund(
            token_id,
            receiver_id,
            Some(token_metadata),
            None,
        );

        let storage_cost = Balance::from(env::storage_usage() - initial_storage_usage)
            * env::storage_byte_cost();
        let required = self.mint_price.max(storage_cost);
        let deposit = env::attached_deposit();
        require!(
            deposit >= required,
            format!("Attached deposit must cover the mint price of {}", required)
        );
        let refund = deposit - required;
        if refund > 0 {
            Promise::new(env::predecessor_account_id()).transfer(refund);
        }

        NftMint {
            owner_id: &token.owner_id,
            token_ids: &[token.token_id.as_str()],
            memo: None,
        }
        .emit();
        token
    }

    /// Sends mint proceeds to the collection owner. Storage staked by the contract
    /// can't be withdrawn.
    #[payable]
    pub fn withdraw(&mut self, amount: Option<U128>) -> Promise {
        assert_one_yocto();
        let owner_id = self.tokens.owner_id.clone();
        require!(
            env::predecessor_account_id() == owner_id,
            "Only the owner can withdraw"
        );
        let locked = Balance::from(env::storage_usage()) * env::storage_byte_cost();
        let available = env::account_balance().saturating_sub(locked);
        let amount = amount.map(|a| a.0).unwrap_or(available);
        require!(amount <= available, "Not enough balance to withdraw");
        Promise::new(owner_id).transfer(amount)
    }

    pub fn get_mint_price(&self) -> U128 {
        self.mint_price.into()
    }
}

impl Nft {
    fn default_token_metadata(&self, token_id: &str) -> TokenMetadata {
        let collection = self
            .metadata
            .get()
            .map(|metadata| metadata.name)
            .unwrap_or_default();
        TokenMetadata {
            title: Some(format!("{} #{}", collection, token_id)),
            description: None,
            media: None,
            media_hash: None,
            copies: None,
            issued_at: None,
            expires_at: None,
            starts_at: None,
            updated_at: None,
            extra: None,
            reference: None,
            reference_hash: None,
        }
    }
}
