use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::analyzer::report::{AnalysisReport, Notice};
use crate::chart::{ChartSpec, GridLayout, Panel, SeriesSpec};
use crate::common::{
    enums::{ChartKind, Metric},
    tsa_error::{TsaError, TsaResult},
};
use crate::config::AnalysisConfig;
use crate::math::{
    boll::bollinger_bands,
    decompose::seasonal_decompose,
    histogram::density_histogram,
    returns::daily_return,
    rolling::{rolling_mean_std, volatility},
};
use crate::table::{ClosePriceTable, PriceTable};
use crate::ticker::TickerList;

/// The dashboard's analysis views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
pub enum AnalysisView {
    #[strum(serialize = "close")]
    ClosePrices,
    #[strum(serialize = "distribution")]
    PriceDistribution,
    #[strum(serialize = "return-distribution")]
    ReturnDistribution,
    #[strum(serialize = "moving-average")]
    MovingAverage,
    #[strum(serialize = "bollinger")]
    Bollinger,
    #[strum(serialize = "seasonal")]
    Seasonal,
}

/// Which requested tickers a view will process
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickerPlan {
    pub active: Vec<String>,
    pub skipped: Vec<String>,
    pub dropped: Vec<String>,
}

/// Derived-series engine: every view extracts the close prices, fans out
/// over the requested tickers and appends `{ticker}_{metric}` columns.
///
/// Nothing is cached; each call recomputes from the table it is given.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

fn ticker_grid(n: usize) -> GridLayout {
    let grid = GridLayout::TICKER_GRID;
    if n <= grid.capacity() {
        grid
    } else {
        GridLayout {
            rows: n.div_ceil(grid.cols),
            cols: grid.cols,
        }
    }
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(
        &self,
        view: AnalysisView,
        table: &PriceTable,
        tickers: &TickerList,
    ) -> TsaResult<AnalysisReport> {
        match view {
            AnalysisView::ClosePrices => self.close_prices(table),
            AnalysisView::PriceDistribution => self.price_distribution(table),
            AnalysisView::ReturnDistribution => self.return_distribution(table, tickers),
            AnalysisView::MovingAverage => self.moving_average(table, tickers),
            AnalysisView::Bollinger => self.bollinger(table, tickers),
            AnalysisView::Seasonal => self.seasonal(table, tickers),
        }
    }

    /// Split the ticker list into processed, absent and over-limit symbols.
    pub fn plan(&self, close: &ClosePriceTable, tickers: &TickerList) -> TickerPlan {
        let limit = self.config.max_tickers;
        let mut plan = TickerPlan {
            dropped: tickers.dropped(limit).to_vec(),
            ..TickerPlan::default()
        };
        for t in tickers.active(limit) {
            if close.contains(t) {
                plan.active.push(t.clone());
            } else {
                debug!(ticker = %t, "ticker not in table, skipping");
                plan.skipped.push(t.clone());
            }
        }
        plan
    }

    fn prepare(
        &self,
        table: &PriceTable,
        tickers: &TickerList,
    ) -> TsaResult<(AnalysisReport, Vec<String>)> {
        if table.is_empty() {
            return Err(TsaError::empty("price table is empty"));
        }
        let close = table.extract_close_prices()?;
        let plan = self.plan(&close, tickers);

        let mut report = AnalysisReport::new(close);
        if !plan.dropped.is_empty() {
            warn!(
                dropped = ?plan.dropped,
                limit = self.config.max_tickers,
                "too many tickers, ignoring the rest"
            );
            report.notices.push(Notice::warning(
                None,
                format!(
                    "only the first {} tickers are analysed, ignored: {}",
                    self.config.max_tickers,
                    plan.dropped.join(", ")
                ),
            ));
        }
        report.skipped = plan.skipped;
        report.dropped = plan.dropped;
        Ok((report, plan.active))
    }

    fn prices(report: &AnalysisReport, ticker: &str) -> TsaResult<Vec<f64>> {
        report
            .frame
            .get(ticker)
            .map(<[f64]>::to_vec)
            .ok_or_else(|| TsaError::MissingTicker {
                ticker: ticker.to_string(),
            })
    }

    /// Line chart of every close-price column
    pub fn close_prices(&self, table: &PriceTable) -> TsaResult<AnalysisReport> {
        if table.is_empty() {
            return Err(TsaError::empty("price table is empty"));
        }
        let close = table.extract_close_prices()?;
        let mut chart = ChartSpec::new("Close Prices", ChartKind::Line, GridLayout::single());
        let mut panel = Panel::new((1, 1), "Close", "Date", "Price");
        for name in close.names() {
            panel = panel.with_series(SeriesSpec::solid(name, name, ""));
        }
        chart.push_panel(panel);

        let mut report = AnalysisReport::new(close);
        report.charts.push(chart);
        Ok(report)
    }

    /// Density histogram of each close-price column, one grid cell per column
    pub fn price_distribution(&self, table: &PriceTable) -> TsaResult<AnalysisReport> {
        if table.is_empty() {
            return Err(TsaError::empty("price table is empty"));
        }
        let close = table.extract_close_prices()?;
        let names: Vec<String> = close.names().into_iter().map(str::to_string).collect();
        let limit = self.config.max_tickers;
        let shown = &names[..names.len().min(limit)];
        let grid = ticker_grid(shown.len());

        let mut chart = ChartSpec::new("Stock Price Distributions", ChartKind::Histogram, grid);
        for (i, name) in shown.iter().enumerate() {
            let Some(pos) = grid.position(i) else { break };
            let Some(hist) = close.get(name).and_then(|v| density_histogram(v, self.config.bins))
            else {
                continue;
            };
            chart.push_panel(
                Panel::new(pos, format!("{} Distribution", name), "Stock Price", "Frequency")
                    .with_series(SeriesSpec::solid(name.as_str(), name.as_str(), ""))
                    .with_histogram(hist),
            );
        }

        let mut report = AnalysisReport::new(close);
        report.dropped = names[shown.len()..].to_vec();
        if !report.dropped.is_empty() {
            warn!(dropped = ?report.dropped, "too many columns for the distribution grid");
            report.notices.push(Notice::warning(
                None,
                format!("distribution grid is full, not shown: {}", report.dropped.join(", ")),
            ));
        }
        report.charts.push(chart);
        Ok(report)
    }

    /// `{t}_daily_return` and its density histogram per ticker
    pub fn return_distribution(
        &self,
        table: &PriceTable,
        tickers: &TickerList,
    ) -> TsaResult<AnalysisReport> {
        let (mut report, active) = self.prepare(table, tickers)?;
        if active.is_empty() {
            report
                .notices
                .push(Notice::info("no valid ticker columns found for daily returns analysis"));
            return Ok(report);
        }

        let grid = ticker_grid(active.len());
        let mut chart = ChartSpec::new("Daily Returns Distributions", ChartKind::Histogram, grid);
        for (i, t) in active.iter().enumerate() {
            let returns = daily_return(&Self::prices(&report, t)?);
            let column = Metric::DailyReturn.column_name(t);
            let hist = density_histogram(&returns, self.config.bins);
            report.frame.push(column.as_str(), returns)?;

            let (Some(pos), Some(hist)) = (grid.position(i), hist) else {
                continue;
            };
            chart.push_panel(
                Panel::new(
                    pos,
                    format!("{} Daily Return Distribution", t),
                    "Daily Return",
                    "Frequency",
                )
                .with_series(SeriesSpec::solid(column.as_str(), column.as_str(), ""))
                .with_histogram(hist),
            );
        }
        report.charts.push(chart);
        Ok(report)
    }

    /// `{t}_rolling_mean` and `{t}_rolling_std` per ticker
    pub fn moving_average(
        &self,
        table: &PriceTable,
        tickers: &TickerList,
    ) -> TsaResult<AnalysisReport> {
        let (mut report, active) = self.prepare(table, tickers)?;
        let grid = ticker_grid(active.len());
        let mut chart = ChartSpec::new("Stock Price with Rolling Statistics", ChartKind::Line, grid);

        for (i, t) in active.iter().enumerate() {
            debug!(ticker = %t, window = self.config.window, "rolling statistics");
            let (mean, std) = rolling_mean_std(&Self::prices(&report, t)?, self.config.window);
            let mean_col = Metric::RollingMean.column_name(t);
            let std_col = Metric::RollingStd.column_name(t);
            report.frame.push(mean_col.as_str(), mean)?;
            report.frame.push(std_col.as_str(), std)?;

            let Some(pos) = grid.position(i) else { continue };
            chart.push_panel(
                Panel::new(
                    pos,
                    format!("{} Stock Price with Rolling Statistics", t),
                    "Date",
                    "Price",
                )
                .with_series(SeriesSpec::solid(format!("{} Price", t), t.as_str(), "white"))
                .with_series(SeriesSpec::solid("Rolling Mean", mean_col, "red"))
                .with_series(SeriesSpec::solid("Rolling Std", std_col, "green")),
            );
        }
        report.charts.push(chart);
        Ok(report)
    }

    /// Bands, daily return and volatility per ticker; one chart each
    pub fn bollinger(&self, table: &PriceTable, tickers: &TickerList) -> TsaResult<AnalysisReport> {
        let (mut report, active) = self.prepare(table, tickers)?;
        let window = self.config.window;

        for t in &active {
            debug!(ticker = %t, window, k = self.config.band_k, "bollinger bands");
            let prices = Self::prices(&report, t)?;
            let bands = bollinger_bands(&prices, window, self.config.band_k);
            let columns = [
                (Metric::RollingMean, bands.mean),
                (Metric::RollingStd, bands.std),
                (Metric::UpperBand, bands.upper),
                (Metric::LowerBand, bands.lower),
                (Metric::DailyReturn, daily_return(&prices)),
                (Metric::Volatility, volatility(&prices, window)),
            ];
            for (metric, values) in columns {
                report.frame.push(metric.column_name(t), values)?;
            }

            let mut chart = ChartSpec::new(
                format!("Bollinger Bands for {}", t),
                ChartKind::Line,
                GridLayout::single(),
            );
            chart.push_panel(
                Panel::new((1, 1), format!("Bollinger Bands for {}", t), "Date", "Price")
                    .with_series(SeriesSpec::solid("Price", t.as_str(), "blue"))
                    .with_series(SeriesSpec::solid(
                        "Rolling Mean",
                        Metric::RollingMean.column_name(t),
                        "orange",
                    ))
                    .with_series(SeriesSpec::dashed(
                        "Upper Band",
                        Metric::UpperBand.column_name(t),
                        "green",
                    ))
                    .with_series(SeriesSpec::dashed(
                        "Lower Band",
                        Metric::LowerBand.column_name(t),
                        "red",
                    )),
            );
            report.charts.push(chart);
        }
        Ok(report)
    }

    /// Trend, seasonal and residual per ticker. A ticker whose series cannot
    /// be decomposed gets a warning; the others are unaffected.
    pub fn seasonal(&self, table: &PriceTable, tickers: &TickerList) -> TsaResult<AnalysisReport> {
        let (mut report, active) = self.prepare(table, tickers)?;
        for t in &report.skipped {
            report
                .notices
                .push(Notice::warning(Some(t.as_str()), format!("Ticker {} not found in data.", t)));
        }

        let period = self.config.period;
        for t in &active {
            let prices = Self::prices(&report, t)?;
            let decomposition = match seasonal_decompose(&prices, period) {
                Ok(d) => d,
                Err(e) => {
                    let err = TsaError::computation(t.as_str(), e.to_string());
                    warn!(ticker = %t, period, error = %e, "seasonal decomposition failed");
                    report.notices.push(Notice::warning(Some(t.as_str()), err.to_string()));
                    continue;
                }
            };
            report.frame.push(Metric::Trend.column_name(t), decomposition.trend)?;
            report.frame.push(Metric::Seasonal.column_name(t), decomposition.seasonal)?;
            report.frame.push(Metric::Residual.column_name(t), decomposition.residual)?;

            let mut chart = ChartSpec::new(
                format!("Seasonal Decomposition of {} Stock Prices", t),
                ChartKind::Line,
                GridLayout::stacked(4),
            );
            let rows = [
                (format!("{} Stock Price", t), "Original", t.clone(), "blue"),
                (format!("{} Trend Component", t), "Trend", Metric::Trend.column_name(t), "green"),
                (
                    format!("{} Seasonal Component", t),
                    "Seasonality",
                    Metric::Seasonal.column_name(t),
                    "orange",
                ),
                (
                    format!("{} Residual Component", t),
                    "Residuals",
                    Metric::Residual.column_name(t),
                    "red",
                ),
            ];
            for (row, (title, name, column, color)) in rows.into_iter().enumerate() {
                chart.push_panel(
                    Panel::new((row + 1, 1), title, "Date", "Price")
                        .with_series(SeriesSpec::solid(name, column, color)),
                );
            }
            report.charts.push(chart);
        }
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::enums::LineStyle;
    use crate::table::price_table::tests::multi_table;
    use strum::IntoEnumIterator;

    fn analyzer() -> Analyzer {
        Analyzer::new(AnalysisConfig::default())
    }

    #[test]
    fn test_plan_skips_and_drops() {
        let table = multi_table(&["A", "B"], 3);
        let close = table.extract_close_prices().unwrap();
        let plan = analyzer().plan(&close, &TickerList::parse("A,X,B,C,D,E,F,G"));
        assert_eq!(plan.active, vec!["A", "B"]);
        assert_eq!(plan.skipped, vec!["X", "C", "D", "E"]);
        assert_eq!(plan.dropped, vec!["F", "G"]);
    }

    #[test]
    fn test_empty_table_is_no_data() {
        let err = analyzer()
            .moving_average(&PriceTable::empty(), &TickerList::parse("AAPL"))
            .unwrap_err();
        assert!(matches!(err, TsaError::EmptyInput { .. }));
    }

    #[test]
    fn test_moving_average_columns_and_grid() {
        let table = multi_table(&["AAPL", "NVDA"], 40);
        let report = analyzer()
            .moving_average(&table, &TickerList::parse("NVDA, MSFT, AAPL"))
            .unwrap();
        assert_eq!(
            report.frame.names(),
            vec![
                "AAPL",
                "NVDA",
                "NVDA_rolling_mean",
                "NVDA_rolling_std",
                "AAPL_rolling_mean",
                "AAPL_rolling_std"
            ]
        );
        assert_eq!(report.skipped, vec!["MSFT"]);
        let chart = &report.charts[0];
        assert_eq!(chart.panels.len(), 2);
        assert_eq!((chart.panels[1].row, chart.panels[1].col), (1, 2));
        // prices 110..149 for NVDA, mean of the first window is 124.5
        assert_eq!(report.frame.get("NVDA_rolling_mean").unwrap()[29], 124.5);
    }

    #[test]
    fn test_bollinger_columns_and_styles() {
        let table = multi_table(&["AAPL"], 35);
        let report = analyzer().bollinger(&table, &TickerList::parse("AAPL")).unwrap();
        for metric in ["rolling_mean", "rolling_std", "upper_band", "lower_band", "daily_return", "volatility"] {
            assert!(report.frame.contains(&format!("AAPL_{}", metric)), "{}", metric);
        }
        let series = &report.charts[0].panels[0].series;
        assert_eq!(series.len(), 4);
        assert_eq!(series[2].style, LineStyle::Dash);
        assert_eq!(series[3].style, LineStyle::Dash);
        assert_eq!(series[0].style, LineStyle::Solid);
    }

    #[test]
    fn test_return_distribution_without_valid_tickers() {
        let table = multi_table(&["AAPL"], 5);
        let report = analyzer()
            .return_distribution(&table, &TickerList::parse("MSFT"))
            .unwrap();
        assert!(report.charts.is_empty());
        assert_eq!(report.notices.len(), 1);
    }

    #[test]
    fn test_price_distribution_limits_to_grid() {
        let table = multi_table(&["A", "B", "C", "D", "E", "F", "G"], 10);
        let report = analyzer().price_distribution(&table).unwrap();
        assert_eq!(report.charts[0].panels.len(), 6);
        assert_eq!(report.dropped, vec!["G"]);
        assert_eq!(report.warnings().count(), 1);
    }

    #[test]
    fn test_seasonal_failure_is_scoped_to_ticker() {
        let table = multi_table(&["AAPL", "NVDA"], 50);
        let config = AnalysisConfig {
            period: 20,
            ..AnalysisConfig::default()
        };
        let report = Analyzer::new(config.clone())
            .seasonal(&table, &TickerList::parse("AAPL,NVDA"))
            .unwrap();
        assert_eq!(report.charts.len(), 2);
        assert!(report.warnings().next().is_none());

        let long = Analyzer::new(AnalysisConfig {
            period: 365,
            ..config
        });
        let report = long.seasonal(&table, &TickerList::parse("AAPL,NVDA")).unwrap();
        assert!(report.charts.is_empty());
        assert_eq!(report.warnings().count(), 2);
        assert_eq!(report.notices[0].ticker.as_deref(), Some("AAPL"));
    }

    #[test]
    fn test_run_is_idempotent() {
        let table = multi_table(&["AAPL", "NVDA"], 60);
        let tickers = TickerList::parse("AAPL,NVDA");
        for view in AnalysisView::iter() {
            let a = analyzer().run(view, &table, &tickers).unwrap();
            let b = analyzer().run(view, &table, &tickers).unwrap();
            assert_eq!(a.frame.names(), b.frame.names());
            for (x, y) in a.frame.columns().iter().zip(b.frame.columns()) {
                let xb: Vec<u64> = x.values.iter().map(|v| v.to_bits()).collect();
                let yb: Vec<u64> = y.values.iter().map(|v| v.to_bits()).collect();
                assert_eq!(xb, yb, "{} differs for {}", x.name, view);
            }
        }
    }

    #[test]
    fn test_view_names() {
        assert_eq!("moving-average".parse::<AnalysisView>().unwrap(), AnalysisView::MovingAverage);
        assert_eq!(AnalysisView::Bollinger.to_string(), "bollinger");
    }

    #[test]
    fn test_close_prices_chart() {
        let table = multi_table(&["AAPL", "NVDA"], 3);
        let report = analyzer().close_prices(&table).unwrap();
        assert_eq!(report.charts[0].panels[0].series.len(), 2);
    }
}
