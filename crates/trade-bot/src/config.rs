//! Configuration for the trading bot

use crate::dialog::DEFAULT_MAX_PROMPT_RETRIES;
use crate::error::{Result, TradeError};
use crate::pricing::PricingConfig;
use crate::recognizer::Locale;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use trade_utils::env_parse;

/// Largest number of decimal places accepted for money amounts
pub const MAX_DECIMALS: u32 = 10;

const DEFAULT_WELCOME: &str = "Welcome to TradeBot. This bot will try to show you how a \
                               dialog and an entity recognizer work together. Please type \
                               anything to get started.";

/// Configuration for the trading bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Greeting sent when a user joins
    pub welcome_message: String,

    /// REPL prompt prefix
    pub prompt: String,

    /// Culture used to read numbers and dates
    pub locale: Locale,

    /// Commission and tax rates
    pub pricing: PricingConfig,

    /// Directory of the JSON portfolio files
    pub data_dir: PathBuf,

    /// A suspended dialog idle for longer than this is discarded
    pub idle_timeout: Duration,

    /// Failed replies in a row before a dialog gives up
    pub max_prompt_retries: u32,

    /// Transcript entries kept per conversation
    pub max_history: usize,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            welcome_message: DEFAULT_WELCOME.to_string(),
            prompt: ">>> ".to_string(),
            locale: Locale::English,
            pricing: PricingConfig::default(),
            data_dir: PathBuf::from("data"),
            idle_timeout: Duration::from_secs(15 * 60),
            max_prompt_retries: DEFAULT_MAX_PROMPT_RETRIES,
            max_history: 50,
        }
    }
}

impl BotConfig {
    /// Create a builder
    pub fn builder() -> BotConfigBuilder {
        BotConfigBuilder::default()
    }

    /// Defaults overridden by `TRADEBOT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::builder().from_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.pricing.commission_rate.is_sign_negative() && !self.pricing.commission_rate.is_zero()
        {
            return Err(TradeError::ConfigError(
                "Commission rate must not be negative".to_string(),
            ));
        }

        if self.pricing.tax_rate.is_sign_negative() && !self.pricing.tax_rate.is_zero() {
            return Err(TradeError::ConfigError(
                "Tax rate must not be negative".to_string(),
            ));
        }

        if self.pricing.decimals > MAX_DECIMALS {
            return Err(TradeError::ConfigError(format!(
                "At most {MAX_DECIMALS} decimals are supported, got {}",
                self.pricing.decimals
            )));
        }

        if self.max_prompt_retries == 0 {
            return Err(TradeError::ConfigError(
                "max_prompt_retries must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`BotConfig`]
#[derive(Debug, Default)]
pub struct BotConfigBuilder {
    welcome_message: Option<String>,
    prompt: Option<String>,
    locale: Option<Locale>,
    commission_rate: Option<Decimal>,
    tax_rate: Option<Decimal>,
    decimals: Option<u32>,
    data_dir: Option<PathBuf>,
    idle_timeout: Option<Duration>,
    max_prompt_retries: Option<u32>,
    max_history: Option<usize>,
}

impl BotConfigBuilder {
    pub fn welcome_message(mut self, msg: impl Into<String>) -> Self {
        self.welcome_message = Some(msg.into());
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn commission_rate(mut self, rate: Decimal) -> Self {
        self.commission_rate = Some(rate);
        self
    }

    pub fn tax_rate(mut self, rate: Decimal) -> Self {
        self.tax_rate = Some(rate);
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.decimals = Some(decimals);
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = Some(timeout);
        self
    }

    pub fn max_prompt_retries(mut self, retries: u32) -> Self {
        self.max_prompt_retries = Some(retries);
        self
    }

    pub fn max_history(mut self, max: usize) -> Self {
        self.max_history = Some(max);
        self
    }

    /// Fill unset fields from `TRADEBOT_*` environment variables
    pub fn from_env(mut self) -> Result<Self> {
        if self.locale.is_none() {
            self.locale = env_parse::<String>("TRADEBOT_LOCALE")?.map(|code| Locale::from_code(&code));
        }
        if self.commission_rate.is_none() {
            self.commission_rate = env_parse("TRADEBOT_COMMISSION_RATE")?;
        }
        if self.tax_rate.is_none() {
            self.tax_rate = env_parse("TRADEBOT_TAX_RATE")?;
        }
        if self.decimals.is_none() {
            self.decimals = env_parse("TRADEBOT_DECIMALS")?;
        }
        if self.data_dir.is_none() {
            self.data_dir = env_parse::<PathBuf>("TRADEBOT_DATA_DIR")?;
        }
        if self.idle_timeout.is_none() {
            self.idle_timeout =
                env_parse::<u64>("TRADEBOT_IDLE_TIMEOUT_SECS")?.map(Duration::from_secs);
        }
        Ok(self)
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<BotConfig> {
        let defaults = BotConfig::default();

        let config = BotConfig {
            welcome_message: self.welcome_message.unwrap_or(defaults.welcome_message),
            prompt: self.prompt.unwrap_or(defaults.prompt),
            locale: self.locale.unwrap_or(defaults.locale),
            pricing: PricingConfig {
                commission_rate: self
                    .commission_rate
                    .unwrap_or(defaults.pricing.commission_rate),
                tax_rate: self.tax_rate.unwrap_or(defaults.pricing.tax_rate),
                decimals: self.decimals.unwrap_or(defaults.pricing.decimals),
            },
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
            idle_timeout: self.idle_timeout.unwrap_or(defaults.idle_timeout),
            max_prompt_retries: self
                .max_prompt_retries
                .unwrap_or(defaults.max_prompt_retries),
            max_history: self.max_history.unwrap_or(defaults.max_history),
        };

        config.validate()?;
        Ok(config)
    }
}
