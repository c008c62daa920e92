use chrono::NaiveDate;

use crate::config::Config;
use crate::gains::calculation;
use crate::gains::calculation::redemption::RedemptionLedger;
use crate::gains::reports::GainsReport;
use crate::gains::{ClassifiedLot, GainsError, Lot, TaxSummary};
use crate::nav::NavSeries;

pub struct Assessor<'a> {
    navs: &'a NavSeries,
    as_of: NaiveDate,
    currency_precision: f64,
}

impl<'a> Assessor<'a> {
    pub fn new(navs: &'a NavSeries, as_of: NaiveDate) -> Assessor<'a> {
        Assessor {
            navs,
            as_of,
            currency_precision: 0.00000001f64,
        }
    }

    pub fn precision(mut self, precision: f64) -> Assessor<'a> {
        self.currency_precision = precision;
        self
    }

    pub fn assess(&self, config: &Config, current_nav: f64) -> Result<GainsReport, GainsError> {
        let dates = config.sip.contribution_dates();
        let (lots, gaps) = calculation::build_lots(
            &dates,
            config.sip.amount,
            self.navs,
            config.grandfather_cutoff_date,
        );
        if lots.is_empty() {
            return Err(GainsError::EmptyLedger);
        }

        let total_units: f64 = lots.iter().map(|lot| lot.units).sum();
        let total_holding_value = total_units * current_nav;
        let threshold_days = calculation::threshold_days(config.holding_period_months);

        let classify_all = |lots: &[Lot]| -> Vec<ClassifiedLot> {
            lots.iter()
                .map(|lot| calculation::classify(lot, self.as_of, current_nav, threshold_days))
                .collect()
        };

        // partial redemptions run the ledger through the FIFO engine and
        // tax only the redeemed subset; full redemptions tax everything
        let (classified, redeemed_amount) = match config.redemption.partial_amount() {
            Some(amount) => {
                if amount > total_holding_value {
                    return Err(GainsError::OverRedemption {
                        requested: amount,
                        available: total_holding_value,
                    });
                }

                let mut ledger = RedemptionLedger::new(&lots, self.currency_precision);
                let redemption = ledger.redeem(amount, current_nav);
                if redemption.unfilled > 0f64 {
                    return Err(GainsError::OverRedemption {
                        requested: amount,
                        available: total_holding_value,
                    });
                }

                (classify_all(&redemption.lots), Some(amount))
            }
            None => (classify_all(&lots), None),
        };

        let totals = calculation::tax_totals(
            &classified,
            config.short_term_rate,
            config.long_term_rate,
            config.long_term_exemption_threshold,
        );

        let summary = TaxSummary {
            total_units,
            total_holding_value,
            redeemed_amount,
            redeemed_units: redeemed_amount.map(|amount| amount / current_nav),
            long_term_gains: totals.long_term_gains,
            short_term_gains: totals.short_term_gains,
            taxable_long_term: totals.taxable_long_term,
            long_term_tax: totals.long_term_tax,
            short_term_tax: totals.short_term_tax,
            total_tax: totals.total_tax,
        };

        Ok(GainsReport::new(
            self.navs.scheme_name.clone(),
            current_nav,
            classified,
            summary,
            gaps,
        ))
    }
}
