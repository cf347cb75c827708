use serde::{Deserialize, Serialize};

use super::{AMOUNT_PRECISION, Amount, AssetId, FEE_RATE_PRECISION, MAX_AMOUNT};

/// Terms of a swap: what the proposer gives and what it expects back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProposalInfo {
    #[serde(default)]
    pub proposer_asset: AssetId,
    #[serde(default)]
    pub proposer_amount: Amount,
    #[serde(default)]
    pub receiver_asset: AssetId,
    #[serde(default)]
    pub receiver_amount: Amount,
}

impl ProposalInfo {
    /// Both asset ids are 64 chars long and both amounts are strictly positive and within
    /// [`MAX_AMOUNT`].
    pub fn is_valid(&self) -> bool {
        self.proposer_asset.has_valid_length()
            && self.receiver_asset.has_valid_length()
            && is_positive_amount(self.proposer_amount)
            && is_positive_amount(self.receiver_amount)
    }

    /// Positional arguments for the wallet tool, in the order
    /// `[proposer_asset, proposer_amount, receiver_asset, receiver_amount]`.
    pub fn args(&self) -> [String; 4] {
        [
            self.proposer_asset.to_string(),
            format_amount(self.proposer_amount),
            self.receiver_asset.to_string(),
            format_amount(self.receiver_amount),
        ]
    }
}

fn is_positive_amount(amount: Amount) -> bool {
    amount.is_finite() && amount > 0.0 && amount <= MAX_AMOUNT
}

/// Rounds half away from zero to `precision` decimal digits.
pub fn to_fixed(value: f64, precision: i32) -> f64 {
    let scale = 10f64.powi(precision);
    (value * scale).round() / scale
}

pub fn format_amount(amount: Amount) -> String {
    let precision = AMOUNT_PRECISION as usize;
    format!("{:.precision$}", to_fixed(amount, AMOUNT_PRECISION))
}

/// Rates below `minimum` (or not finite) are raised to `minimum`, then rounded to 9 digits.
pub fn clamp_fee_rate(rate: f64, minimum: f64) -> f64 {
    let rate = if !rate.is_finite() || rate < minimum {
        minimum
    } else {
        rate
    };
    to_fixed(rate, FEE_RATE_PRECISION)
}

pub fn format_fee_rate(rate: f64) -> String {
    let precision = FEE_RATE_PRECISION as usize;
    format!("{:.precision$}", to_fixed(rate, FEE_RATE_PRECISION))
}
