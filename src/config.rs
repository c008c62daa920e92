use std::error;
use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("short_term_rate and long_term_rate must be >= 0")]
    NegativeRate,
    #[error("holding_period_months must be >= 1")]
    ZeroHoldingPeriod,
    #[error("long_term_exemption_threshold must be >= 0")]
    NegativeThreshold,
    #[error("currency_precision must be > 0")]
    NonPositivePrecision,
    #[error("sip.start_month and sip.end_month must be between 1 and 12")]
    InvalidSipMonth,
    #[error("sip.day_of_month must be between 1 and 28")]
    InvalidSipDay,
    #[error("sip.amount must be > 0")]
    NonPositiveAmount,
    #[error("redemption.amount must be present and > 0 for partial redemptions")]
    MissingRedemptionAmount,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    pub(crate) historical_nav_url: String,
    pub(crate) latest_nav_url: String,
    pub(crate) short_term_rate: f64,
    pub(crate) long_term_rate: f64,
    pub(crate) holding_period_months: u32,
    pub(crate) long_term_exemption_threshold: f64,
    pub(crate) grandfather_cutoff_date: NaiveDate,
    #[serde(default = "default_precision")]
    pub(crate) currency_precision: f64,
    #[serde(default)]
    pub(crate) as_of_date: Option<NaiveDate>,
    pub(crate) sip: SipPlan,
    pub(crate) redemption: RedemptionConfig,
}

fn default_precision() -> f64 {
    0.00000001f64
}

impl Config {
    pub fn new(config_path: &str) -> Result<Config, Box<dyn error::Error>> {
        let file = std::fs::File::open(config_path)?;
        let config: Config = ::serde_yaml::from_reader(file)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.short_term_rate < 0f64 || self.long_term_rate < 0f64 {
            return Err(ConfigError::NegativeRate);
        }
        if self.holding_period_months < 1 {
            return Err(ConfigError::ZeroHoldingPeriod);
        }
        if self.long_term_exemption_threshold < 0f64 {
            return Err(ConfigError::NegativeThreshold);
        }
        if self.currency_precision <= 0f64 {
            return Err(ConfigError::NonPositivePrecision);
        }
        self.sip.validate()?;
        self.redemption.validate()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SipPlan {
    pub(crate) start_month: u32,
    pub(crate) start_year: i32,
    pub(crate) end_month: u32,
    pub(crate) end_year: i32,
    pub(crate) day_of_month: u32,
    pub(crate) amount: f64,
}

impl SipPlan {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=12).contains(&self.start_month) || !(1..=12).contains(&self.end_month) {
            return Err(ConfigError::InvalidSipMonth);
        }
        if !(1..=28).contains(&self.day_of_month) {
            return Err(ConfigError::InvalidSipDay);
        }
        if self.amount <= 0f64 {
            return Err(ConfigError::NonPositiveAmount);
        }
        Ok(())
    }

    // one contribution per calendar month, both endpoints inclusive;
    // day_of_month is capped at 28, so the date exists in every month
    pub fn contribution_dates(&self) -> Vec<NaiveDate> {
        let mut dates = Vec::new();
        let mut year = self.start_year;
        let mut month = self.start_month;

        while (year, month) <= (self.end_year, self.end_month) {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, self.day_of_month) {
                dates.push(date);
            }
            month += 1;
            if month > 12 {
                month = 1;
                year += 1;
            }
        }

        dates
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedemptionMode {
    Full,
    Partial,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RedemptionConfig {
    pub(crate) mode: RedemptionMode,
    #[serde(default)]
    pub(crate) amount: Option<f64>,
}

impl RedemptionConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.mode == RedemptionMode::Partial {
            match self.amount {
                Some(amount) if amount > 0f64 => {}
                _ => return Err(ConfigError::MissingRedemptionAmount),
            }
        }
        Ok(())
    }

    pub fn partial_amount(&self) -> Option<f64> {
        match self.mode {
            RedemptionMode::Partial => self.amount,
            RedemptionMode::Full => None,
        }
    }
}
