use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::common::tsa_error::{TsaError, TsaResult};

/// Key/value view over user configuration that remembers which keys were
/// consumed, so that leftovers can be reported as unknown.
#[derive(Debug, Default)]
pub struct ConfigWithCheck {
    conf: HashMap<String, serde_json::Value>,
}

impl ConfigWithCheck {
    pub fn new(conf: HashMap<String, serde_json::Value>) -> Self {
        Self { conf }
    }

    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> TsaResult<Option<T>> {
        match self.conf.remove(key) {
            None => Ok(None),
            Some(v) => serde_json::from_value(v.clone())
                .map(Some)
                .map_err(|e| TsaError::Config(format!("{} = {}: {}", key, v, e))),
        }
    }

    pub fn check(&self) -> TsaResult<()> {
        if self.conf.is_empty() {
            return Ok(());
        }
        let mut keys: Vec<&str> = self.conf.keys().map(String::as_str).collect();
        keys.sort_unstable();
        Err(TsaError::Config(format!("unknown para = {}", keys.join(", "))))
    }
}

/// Analysis parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    /// Rolling window in rows
    pub window: usize,
    /// Band half-width in standard deviations
    pub band_k: f64,
    /// Seasonal period in rows
    pub period: usize,
    pub max_tickers: usize,
    pub bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            window: 30,
            band_k: 2.0,
            period: 365,
            max_tickers: 6,
            bins: 50,
        }
    }
}

impl AnalysisConfig {
    pub fn new(conf: Option<HashMap<String, serde_json::Value>>) -> TsaResult<Self> {
        let mut conf = ConfigWithCheck::new(conf.unwrap_or_default());
        let default = Self::default();

        let config = Self {
            window: conf.get("window")?.unwrap_or(default.window),
            band_k: conf.get("band_k")?.unwrap_or(default.band_k),
            period: conf.get("period")?.unwrap_or(default.period),
            max_tickers: conf.get("max_tickers")?.unwrap_or(default.max_tickers),
            bins: conf.get("bins")?.unwrap_or(default.bins),
        };
        conf.check()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TsaResult<()> {
        if self.window < 1 {
            return Err(TsaError::Config("window must be at least 1".to_string()));
        }
        if self.period < 2 {
            return Err(TsaError::Config("period must be at least 2".to_string()));
        }
        if self.max_tickers < 1 {
            return Err(TsaError::Config("max_tickers must be at least 1".to_string()));
        }
        if self.bins < 1 {
            return Err(TsaError::Config("bins must be at least 1".to_string()));
        }
        if !self.band_k.is_finite() || self.band_k < 0.0 {
            return Err(TsaError::Config(format!("invalid band_k = {}", self.band_k)));
        }
        Ok(())
    }
}
