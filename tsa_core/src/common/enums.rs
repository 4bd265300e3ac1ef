use serde::Serialize;
use strum_macros::{Display, EnumString};

/// Field name of the closing price in a two-level (field, ticker) table
pub const FIELD_CLOSE: &str = "Close";

/// Derived metrics; the serialized name is the suffix in `{ticker}_{metric}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum Metric {
    #[strum(serialize = "daily_return")]
    DailyReturn,
    #[strum(serialize = "rolling_mean")]
    RollingMean,
    #[strum(serialize = "rolling_std")]
    RollingStd,
    #[strum(serialize = "upper_band")]
    UpperBand,
    #[strum(serialize = "lower_band")]
    LowerBand,
    #[strum(serialize = "volatility")]
    Volatility,
    #[strum(serialize = "trend")]
    Trend,
    #[strum(serialize = "seasonal")]
    Seasonal,
    #[strum(serialize = "residual")]
    Residual,
}

impl Metric {
    pub fn column_name(&self, ticker: &str) -> String {
        format!("{}_{}", ticker, self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[strum(serialize = "solid")]
    Solid,
    #[strum(serialize = "dash")]
    Dash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[strum(serialize = "line")]
    Line,
    #[strum(serialize = "histogram")]
    Histogram,
}

/// Column storage type, as reported by the table summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum DType {
    #[strum(serialize = "float64")]
    Float64,
    #[strum(serialize = "object")]
    Object,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_metric_column_name() {
        assert_eq!(Metric::RollingMean.column_name("AAPL"), "AAPL_rolling_mean");
        assert_eq!(Metric::UpperBand.column_name("NVDA"), "NVDA_upper_band");
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!(Metric::from_str("volatility").unwrap(), Metric::Volatility);
        assert!(Metric::from_str("ema").is_err());
    }
}
