use std::collections::VecDeque;

use crate::gains::{Lot, Redemption};

pub struct RedemptionLedger {
    layers: VecDeque<Lot>,
    currency_precision: f64,
}

impl RedemptionLedger {
    // works on sorted copies: caller ordering is never trusted and the
    // caller's lots are never touched
    pub fn new(lots: &[Lot], currency_precision: f64) -> RedemptionLedger {
        let mut layers: Vec<Lot> = lots.to_vec();
        layers.sort_by(|a, b| a.purchase_date.cmp(&b.purchase_date));

        RedemptionLedger {
            layers: layers.into(),
            currency_precision,
        }
    }

    pub fn redeem(&mut self, amount: f64, current_nav: f64) -> Redemption {
        let mut redeemed: Vec<Lot> = Vec::new();
        let mut remaining = amount;

        // consume layers oldest-first
        while let Some(layer) = self.layers.front_mut() {
            let layer_value = layer.units * current_nav;

            if layer_value <= remaining {
                // consume the whole layer
                redeemed.push(*layer);
                remaining -= layer_value;
                self.layers.pop_front();
            } else {
                // split the layer; the per-unit cost basis keeps the
                // split's cost price proportional to the units taken
                let units_to_redeem = remaining / current_nav;
                let mut split = *layer;
                split.units = units_to_redeem;
                redeemed.push(split);

                // subtract the redeemed units, drop the layer if empty
                layer.units -= units_to_redeem;
                if layer.units < self.currency_precision {
                    self.layers.pop_front();
                }
                remaining = 0f64;
            }

            // exit once nothing is left to fill
            if remaining <= self.currency_precision {
                break;
            }
        }

        Redemption {
            lots: redeemed,
            unfilled: if remaining > self.currency_precision {
                remaining
            } else {
                0f64
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const PRECISION: f64 = 0.00000001f64;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn lot(purchase: NaiveDate, units: f64, nav: f64) -> Lot {
        Lot {
            purchase_date: purchase,
            units,
            purchase_nav: nav,
            grandfathered_nav: None,
            cost_basis_nav: nav,
        }
    }

    fn assert_close(left: f64, right: f64) {
        assert!(
            (left - right).abs() < 1e-6,
            "expected {} to equal {}",
            left,
            right
        );
    }

    fn three_lots() -> Vec<Lot> {
        vec![
            lot(date(2020, 1, 1), 100f64, 8f64),
            lot(date(2020, 2, 1), 50f64, 9f64),
            lot(date(2020, 3, 1), 25f64, 10f64),
        ]
    }

    #[test]
    fn exact_amount_consumes_whole_lots_in_order() {
        let lots = three_lots();
        let current_nav = 10f64;

        // exactly the value of the first two lots
        let mut ledger = RedemptionLedger::new(&lots, PRECISION);
        let redemption = ledger.redeem(1500f64, current_nav);

        assert_close(redemption.unfilled, 0f64);
        assert_eq!(redemption.lots.len(), 2);
        assert_eq!(redemption.lots[0].purchase_date, date(2020, 1, 1));
        assert_close(redemption.lots[0].units, 100f64);
        assert_eq!(redemption.lots[1].purchase_date, date(2020, 2, 1));
        assert_close(redemption.lots[1].units, 50f64);

        // the third lot stays in the ledger, untouched
        let leftovers = ledger.redeem(250f64, current_nav);
        assert_eq!(leftovers.lots.len(), 1);
        assert_close(leftovers.lots[0].units, 25f64);
    }

    #[test]
    fn mid_lot_amount_splits_the_last_lot_touched() {
        let lots = three_lots();
        let mut ledger = RedemptionLedger::new(&lots, PRECISION);

        // between lot 1's value (1000) and lots 1+2 (1500)
        let redemption = ledger.redeem(1250f64, 10f64);

        assert_eq!(redemption.lots.len(), 2);
        assert_close(redemption.lots[0].units, 100f64);

        // lot 2 is split in half, and its cost price scales with it
        let split = &redemption.lots[1];
        assert_close(split.units, 25f64);
        assert_close(split.units * split.cost_basis_nav, 225f64);
        assert_close(0.5f64 * lots[1].units * lots[1].cost_basis_nav, 225f64);

        // only one lot in the result was reduced
        let reduced = redemption
            .lots
            .iter()
            .zip(lots.iter())
            .filter(|(taken, original)| taken.units < original.units)
            .count();
        assert_eq!(reduced, 1);
    }

    #[test]
    fn redeemed_value_matches_the_requested_amount() {
        let lots = three_lots();
        let current_nav = 12.34f64;

        for &amount in &[1f64, 999.99f64, 1234.56f64, 2000f64] {
            let mut ledger = RedemptionLedger::new(&lots, PRECISION);
            let redemption = ledger.redeem(amount, current_nav);
            let redeemed_value: f64 = redemption
                .lots
                .iter()
                .map(|l| l.units * current_nav)
                .sum();
            assert_close(redeemed_value, amount);
        }
    }

    #[test]
    fn caller_ordering_is_not_trusted() {
        let mut lots = three_lots();
        lots.reverse();

        let mut ledger = RedemptionLedger::new(&lots, PRECISION);
        let redemption = ledger.redeem(1000f64, 10f64);

        // the oldest lot is consumed first despite the reversed input
        assert_eq!(redemption.lots.len(), 1);
        assert_eq!(redemption.lots[0].purchase_date, date(2020, 1, 1));
    }

    #[test]
    fn original_lots_are_never_mutated() {
        let lots = three_lots();
        let before: Vec<f64> = lots.iter().map(|l| l.units).collect();

        let mut ledger = RedemptionLedger::new(&lots, PRECISION);
        ledger.redeem(1250f64, 10f64);

        let after: Vec<f64> = lots.iter().map(|l| l.units).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn empty_ledger_returns_an_explicit_empty_result() {
        let mut ledger = RedemptionLedger::new(&[], PRECISION);
        let redemption = ledger.redeem(500f64, 10f64);

        assert!(redemption.lots.is_empty());
        assert_close(redemption.unfilled, 500f64);
    }

    #[test]
    fn over_redemption_leaves_an_unfilled_residual() {
        let lots = three_lots();
        let mut ledger = RedemptionLedger::new(&lots, PRECISION);

        // total holding value is 1750
        let redemption = ledger.redeem(2000f64, 10f64);

        assert_eq!(redemption.lots.len(), 3);
        assert_close(redemption.unfilled, 250f64);
    }
}
