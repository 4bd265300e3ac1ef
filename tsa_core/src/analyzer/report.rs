use serde::Serialize;
use strum_macros::Display;

use crate::chart::ChartSpec;
use crate::table::DerivedFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    #[strum(serialize = "info")]
    Info,
    #[strum(serialize = "warning")]
    Warning,
}

/// Message for the user, scoped to one ticker when `ticker` is set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            ticker: None,
            message: message.into(),
        }
    }

    pub fn warning(ticker: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            ticker: ticker.map(str::to_string),
            message: message.into(),
        }
    }
}

/// Result of one analysis view
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    /// Close prices followed by the derived `{ticker}_{metric}` columns
    pub frame: DerivedFrame,
    pub charts: Vec<ChartSpec>,
    pub notices: Vec<Notice>,
    /// Requested tickers with no column in the table
    pub skipped: Vec<String>,
    /// Requested tickers past the per-view limit
    pub dropped: Vec<String>,
}

impl AnalysisReport {
    pub fn new(frame: DerivedFrame) -> Self {
        Self {
            frame,
            charts: Vec::new(),
            notices: Vec::new(),
            skipped: Vec::new(),
            dropped: Vec::new(),
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Notice> {
        self.notices
            .iter()
            .filter(|n| n.level == NoticeLevel::Warning)
    }
}
