#![cfg(test)]

mod auction;
mod market;
mod nft;
mod transaction_status;
mod utils;
