use tracing::{info, warn};

use crate::analyzer::{AnalysisReport, AnalysisView, Analyzer};
use crate::common::tsa_error::{TsaError, TsaResult};
use crate::config::AnalysisConfig;
use crate::session::source::{FetchRequest, PriceSource};
use crate::table::{describe, ColumnKey, PriceTable, TableSummary};
use crate::ticker::TickerList;

/// Per-user analysis context.
///
/// Owns the fetched table, its column-filtered copy and the ticker list.
/// Each is only ever replaced wholesale: a fetch replaces both tables, a
/// filter replaces the filtered copy. Analyses read the filtered copy.
#[derive(Debug, Default)]
pub struct Session {
    table: PriceTable,
    filtered: PriceTable,
    tickers: TickerList,
    analyzer: Analyzer,
}

impl Session {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            analyzer: Analyzer::new(config),
            ..Self::default()
        }
    }

    pub fn table(&self) -> &PriceTable {
        &self.table
    }

    pub fn filtered(&self) -> &PriceTable {
        &self.filtered
    }

    pub fn tickers(&self) -> &TickerList {
        &self.tickers
    }

    pub fn has_data(&self) -> bool {
        !self.table.is_empty()
    }

    pub fn set_tickers(&mut self, tickers: TickerList) {
        self.tickers = tickers;
    }

    /// Fetch a new table for `request`. A failing source leaves the session
    /// empty and returns the error.
    pub fn fetch(&mut self, source: &dyn PriceSource, request: &FetchRequest) -> TsaResult<&PriceTable> {
        request.validate()?;
        self.tickers = request.tickers.clone();

        let table = match source.fetch(request) {
            Ok(table) => table,
            Err(e) => {
                warn!(error = %e, "error downloading data");
                self.replace(PriceTable::empty());
                return Err(e);
            }
        };
        if table.is_empty() {
            info!(tickers = ?request.tickers, "no data available for request");
        } else {
            info!(rows = table.rows(), columns = table.n_columns(), "data downloaded");
        }
        self.replace(table);
        Ok(&self.table)
    }

    fn replace(&mut self, table: PriceTable) {
        self.filtered = table.clone();
        self.table = table;
    }

    /// Replace the filtered copy with the requested columns of the table
    pub fn filter_columns(&mut self, keys: &[ColumnKey]) -> &PriceTable {
        self.filtered = self.table.filter_columns(keys);
        if self.filtered.is_empty() {
            warn!("filtered data is empty, select valid columns");
        } else {
            info!(columns = self.filtered.n_columns(), "columns filtered");
        }
        &self.filtered
    }

    pub fn describe(&self) -> TableSummary {
        describe(&self.filtered)
    }

    /// Run one view over the filtered table. "No data" is logged and
    /// returned as `EmptyInput`.
    pub fn analyze(&self, view: AnalysisView) -> TsaResult<AnalysisReport> {
        match self.analyzer.run(view, &self.filtered, &self.tickers) {
            Err(e @ TsaError::EmptyInput { .. }) => {
                info!(%view, reason = %e, "no data for analysis");
                Err(e)
            }
            other => other,
        }
    }

    /// Tear down: drop both tables and the ticker list
    pub fn clear(&mut self) {
        self.table = PriceTable::empty();
        self.filtered = PriceTable::empty();
        self.tickers = TickerList::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::price_table::tests::multi_table;
    use chrono::NaiveDate;

    struct FixedSource(TsaResult<PriceTable>);

    impl PriceSource for FixedSource {
        fn fetch(&self, _request: &FetchRequest) -> TsaResult<PriceTable> {
            match &self.0 {
                Ok(t) => Ok(t.clone()),
                Err(e) => Err(TsaError::Source(e.to_string())),
            }
        }
    }

    fn request(tickers: &str) -> FetchRequest {
        FetchRequest::new(
            TickerList::parse(tickers),
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
        )
    }

    #[test]
    fn test_fetch_replaces_tables() {
        let mut session = Session::default();
        let source = FixedSource(Ok(multi_table(&["AAPL", "NVDA"], 40)));
        session.fetch(&source, &request("AAPL,NVDA")).unwrap();
        assert!(session.has_data());
        assert_eq!(session.filtered(), session.table());
        assert_eq!(session.tickers().len(), 2);
    }

    #[test]
    fn test_fetch_failure_empties_session() {
        let mut session = Session::default();
        session
            .fetch(&FixedSource(Ok(multi_table(&["AAPL"], 5))), &request("AAPL"))
            .unwrap();
        let failing = FixedSource(Err(TsaError::Source("timeout".into())));
        assert!(session.fetch(&failing, &request("AAPL")).is_err());
        assert!(!session.has_data());
        assert!(session.filtered().is_empty());
    }

    #[test]
    fn test_invalid_request_keeps_state() {
        let mut session = Session::default();
        session
            .fetch(&FixedSource(Ok(multi_table(&["AAPL"], 5))), &request("AAPL"))
            .unwrap();
        let err = session
            .fetch(&FixedSource(Ok(PriceTable::empty())), &request(""))
            .unwrap_err();
        assert!(matches!(err, TsaError::InvalidRequest(_)));
        assert!(session.has_data());
    }

    #[test]
    fn test_empty_fetch_is_no_data() {
        let mut session = Session::default();
        session
            .fetch(&FixedSource(Ok(PriceTable::empty())), &request("AAPL"))
            .unwrap();
        assert!(!session.has_data());
        let err = session.analyze(AnalysisView::MovingAverage).unwrap_err();
        assert!(matches!(err, TsaError::EmptyInput { .. }));
    }

    #[test]
    fn test_filter_then_analyze() {
        let mut session = Session::default();
        session
            .fetch(&FixedSource(Ok(multi_table(&["AAPL", "NVDA"], 40))), &request("AAPL,NVDA"))
            .unwrap();
        session.filter_columns(&[ColumnKey::keyed("Close", "AAPL")]);
        assert_eq!(session.table().n_columns(), 4);

        let report = session.analyze(AnalysisView::MovingAverage).unwrap();
        assert_eq!(report.skipped, vec!["NVDA"]);
        assert!(report.frame.contains("AAPL_rolling_mean"));
        assert_eq!(session.describe().columns, 1);
    }

    #[test]
    fn test_clear() {
        let mut session = Session::default();
        session
            .fetch(&FixedSource(Ok(multi_table(&["AAPL"], 5))), &request("AAPL"))
            .unwrap();
        session.clear();
        assert!(!session.has_data());
        assert!(session.tickers().is_empty());
    }
}
