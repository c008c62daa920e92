pub mod redemption;

use chrono::NaiveDate;

use crate::gains::{ClassifiedLot, GainType, Lot, QuoteGap, TaxTotals};
use crate::nav::NavSeries;

// flat 30-day months, kept from the original tax rules instead of
// calendar-exact month arithmetic
pub fn threshold_days(holding_period_months: u32) -> i64 {
    i64::from(holding_period_months) * 30
}

pub fn build_lots(
    dates: &[NaiveDate],
    amount: f64,
    navs: &NavSeries,
    cutoff: NaiveDate,
) -> (Vec<Lot>, Vec<QuoteGap>) {
    let mut lots = Vec::new();
    let mut gaps = Vec::new();

    for &date in dates {
        // quote on the contribution date itself, else forward-fill to the
        // earliest later quote; no quote at all skips the contribution
        let point = match navs.on_or_after(date) {
            Some(point) => point,
            None => {
                gaps.push(QuoteGap { date });
                continue;
            }
        };
        let purchase_nav = point.nav;
        let units = amount / purchase_nav;

        // grandfathering substitutes the cost basis only when a quote
        // exists exactly on the cutoff date
        let grandfathered_nav = if date <= cutoff {
            navs.exact(cutoff)
        } else {
            None
        };
        let cost_basis_nav = grandfathered_nav.unwrap_or(purchase_nav);

        lots.push(Lot {
            purchase_date: date,
            units,
            purchase_nav,
            grandfathered_nav,
            cost_basis_nav,
        });
    }

    (lots, gaps)
}

pub fn classify(
    lot: &Lot,
    as_of: NaiveDate,
    current_nav: f64,
    threshold_days: i64,
) -> ClassifiedLot {
    let current_value = lot.units * current_nav;
    let cost_price = lot.units * lot.cost_basis_nav;
    let holding_period_days = as_of.signed_duration_since(lot.purchase_date).num_days();
    let gain_type = if holding_period_days < threshold_days {
        GainType::ShortTerm
    } else {
        GainType::LongTerm
    };

    ClassifiedLot {
        purchase_date: lot.purchase_date,
        units: lot.units,
        purchase_nav: lot.purchase_nav,
        grandfathered_nav: lot.grandfathered_nav,
        cost_basis_nav: lot.cost_basis_nav,
        current_nav,
        current_value,
        cost_price,
        profit: current_value - cost_price,
        holding_period_days,
        gain_type,
    }
}

pub fn tax_totals(
    lots: &[ClassifiedLot],
    short_rate: f64,
    long_rate: f64,
    exemption: f64,
) -> TaxTotals {
    let mut long_term_gains = 0f64;
    let mut short_term_gains = 0f64;
    for lot in lots {
        match lot.gain_type {
            GainType::LongTerm => long_term_gains += lot.profit,
            GainType::ShortTerm => short_term_gains += lot.profit,
        }
    }

    // the exemption comes off the aggregate long-term gain once, never
    // per lot; a negative aggregate owes no long-term tax
    let taxable_long_term = (long_term_gains - exemption).max(0f64);
    let long_term_tax = taxable_long_term * long_rate / 100f64;
    let short_term_tax = short_term_gains * short_rate / 100f64;

    TaxTotals {
        long_term_gains,
        short_term_gains,
        taxable_long_term,
        long_term_tax,
        short_term_tax,
        total_tax: long_term_tax + short_term_tax,
    }
}
