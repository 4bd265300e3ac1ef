use chrono::NaiveDate;

use crate::common::tsa_error::{TsaError, TsaResult};
use crate::table::PriceTable;
use crate::ticker::TickerList;

/// Tickers plus a date range, start inclusive and end exclusive
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub tickers: TickerList,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchRequest {
    pub fn new(tickers: TickerList, start: NaiveDate, end: NaiveDate) -> Self {
        Self { tickers, start, end }
    }

    pub fn validate(&self) -> TsaResult<()> {
        if self.end <= self.start {
            return Err(TsaError::InvalidRequest(
                "end date must be after start date".to_string(),
            ));
        }
        if self.tickers.is_empty() {
            return Err(TsaError::InvalidRequest(
                "provide at least one valid ticker symbol".to_string(),
            ));
        }
        Ok(())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Market-data collaborator. An empty table means "no data", not failure.
pub trait PriceSource {
    fn fetch(&self, request: &FetchRequest) -> TsaResult<PriceTable>;
}
