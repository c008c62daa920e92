use std::error;

use csv::Writer;

use crate::gains::{ClassifiedLot, QuoteGap, TaxSummary};

pub struct GainsReport {
    scheme_name: String,
    current_nav: f64,
    lots: Vec<ClassifiedLot>,
    summary: TaxSummary,
    warnings: Vec<QuoteGap>,
}

impl GainsReport {
    pub fn new(
        scheme_name: String,
        current_nav: f64,
        lots: Vec<ClassifiedLot>,
        summary: TaxSummary,
        warnings: Vec<QuoteGap>,
    ) -> GainsReport {
        GainsReport {
            scheme_name,
            current_nav,
            lots,
            summary,
            warnings,
        }
    }

    pub fn lots(&self) -> &[ClassifiedLot] {
        &self.lots
    }

    pub fn summary(&self) -> &TaxSummary {
        &self.summary
    }

    pub fn write_to_file(&self, path: &str) -> Result<(), Box<dyn error::Error>> {
        let mut writer = Writer::from_path(path)?;
        for entry in self.lots.iter() {
            writer.serialize(entry)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn print_summary(&self) {
        for gap in self.warnings.iter() {
            println!(
                "warning: no NAV quote at or after {}, contribution skipped",
                gap.date
            );
        }

        println!("Scheme Name:         {}", self.scheme_name);
        println!("Total Units:         {:.2}", self.summary.total_units);
        println!("Latest NAV:          {:.2}", self.current_nav);
        println!(
            "Total Holding Value: {:.2}",
            self.summary.total_holding_value
        );
        if let (Some(amount), Some(units)) =
            (self.summary.redeemed_amount, self.summary.redeemed_units)
        {
            println!("Redemption Amount:   {:.2}", amount);
            println!("Redemption Units:    {:.2}", units);
        }
        println!("Long Term Gains:     {:.2}", self.summary.long_term_gains);
        println!("Taxable LTCG:        {:.2}", self.summary.taxable_long_term);
        println!("Short Term Gains:    {:.2}", self.summary.short_term_gains);
        println!("LTCG Tax:            {:.2}", self.summary.long_term_tax);
        println!("STCG Tax:            {:.2}", self.summary.short_term_tax);
        println!("Total Tax:           {:.2}", self.summary.total_tax);
    }
}
