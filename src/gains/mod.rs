pub mod assessor;
pub mod reports;
mod calculation;

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

// one SIP contribution: a discrete purchase of fund units
#[derive(Copy, Clone, Debug)]
pub struct Lot {
    pub purchase_date: NaiveDate,
    pub units: f64,
    pub purchase_nav: f64,
    pub grandfathered_nav: Option<f64>,
    pub cost_basis_nav: f64,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub enum GainType {
    #[serde(rename = "Short-term")]
    ShortTerm,
    #[serde(rename = "Long-term")]
    LongTerm,
}

// a lot valued against a reference date and current NAV
#[derive(Copy, Clone, Debug, Serialize)]
pub struct ClassifiedLot {
    pub purchase_date: NaiveDate,
    pub units: f64,
    pub purchase_nav: f64,
    pub grandfathered_nav: Option<f64>,
    pub cost_basis_nav: f64,
    pub current_nav: f64,
    pub current_value: f64,
    pub cost_price: f64,
    pub profit: f64,
    pub holding_period_days: i64,
    pub gain_type: GainType,
}

#[derive(Copy, Clone, Debug)]
pub struct TaxTotals {
    pub long_term_gains: f64,
    pub short_term_gains: f64,
    pub taxable_long_term: f64,
    pub long_term_tax: f64,
    pub short_term_tax: f64,
    pub total_tax: f64,
}

#[derive(Debug, Serialize)]
pub struct TaxSummary {
    pub total_units: f64,
    pub total_holding_value: f64,
    pub redeemed_amount: Option<f64>,
    pub redeemed_units: Option<f64>,
    pub long_term_gains: f64,
    pub short_term_gains: f64,
    pub taxable_long_term: f64,
    pub long_term_tax: f64,
    pub short_term_tax: f64,
    pub total_tax: f64,
}

// a contribution skipped because no quote exists at or after its date
#[derive(Copy, Clone, Debug)]
pub struct QuoteGap {
    pub date: NaiveDate,
}

#[derive(Debug)]
pub struct Redemption {
    pub lots: Vec<Lot>,
    pub unfilled: f64,
}

#[derive(Debug, Error)]
pub enum GainsError {
    #[error("no purchase lots could be built from the contribution schedule")]
    EmptyLedger,
    #[error("redemption amount {requested:.2} exceeds total holding value {available:.2}")]
    OverRedemption { requested: f64, available: f64 },
}
