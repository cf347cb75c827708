#![allow(dead_code)]

pub mod gateway;
pub mod net;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use liquid_swap::swap::{AssetId, Payload, ProposalInfo};

pub const ASSET_USDT: &str = "ce091c998b83c78bb71a632313ba3760f1763d9cfcffae02258ffa9865a37bd2";
pub const ASSET_LCAD: &str = "0e99c1a6da379d1f4151fb9df90449d40d0608f6cb33a5bcbfc8c265f42bab0a";
pub const ADDRESS: &str = "lq1qqv8ymngmdp5yj2jukdd78ujm92m0wjvk7yxplra2haf5dnuzsutz96dvvqscm0raftaljf9p30wg4sd2alht5epuyn2fe7vn6";

pub fn sample_proposal() -> ProposalInfo {
    ProposalInfo {
        proposer_asset: AssetId::from(ASSET_USDT),
        proposer_amount: 1000.0 / 100_000_000.0,
        receiver_asset: AssetId::from(ASSET_LCAD),
        receiver_amount: 1400.0 / 100_000_000.0,
    }
}

pub fn base64_json(json: &str) -> String {
    STANDARD.encode(json.as_bytes())
}

pub fn sample_payload() -> Payload {
    Payload::new(base64_json(r#"{"psbt":"cHNldP8BAgQCAAAAAQMEAAAAAAEEAQEBBQEBAfsEAgAAAAA="}"#))
}
