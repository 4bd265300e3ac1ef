use chrono::{Datelike, Duration, NaiveDate};
use tsa_core::math::{boll::bollinger_bands, returns::daily_return, rolling::rolling_mean_std};
use tsa_core::table::{KeyedColumn, MultiTickerTable};
use tsa_core::{AnalysisConfig, AnalysisView, Analyzer, PriceTable, TickerList, TsaError};

fn trading_days(n: usize) -> Vec<NaiveDate> {
    // weekdays only, so the index has weekend gaps
    let mut out = Vec::with_capacity(n);
    let mut d = NaiveDate::from_ymd_opt(2019, 1, 2).unwrap();
    while out.len() < n {
        if d.weekday().number_from_monday() <= 5 {
            out.push(d);
        }
        d += Duration::days(1);
    }
    out
}

fn close_table(series: &[(&str, Vec<f64>)]) -> PriceTable {
    let rows = series[0].1.len();
    let columns = series
        .iter()
        .map(|(t, v)| KeyedColumn {
            field: "Close".to_string(),
            ticker: t.to_string(),
            values: v.clone(),
        })
        .collect();
    PriceTable::Multi(MultiTickerTable::new(trading_days(rows), columns).unwrap())
}

fn wavy(n: usize, base: f64) -> Vec<f64> {
    (0..n)
        .map(|i| base + (i as f64 * 0.3).sin() * 4.0 + i as f64 * 0.1)
        .collect()
}

#[test]
fn constant_price_scenario() {
    let table = close_table(&[("AAPL", vec![100.0; 35])]);
    let report = Analyzer::default()
        .bollinger(&table, &TickerList::parse("AAPL"))
        .unwrap();
    let frame = &report.frame;
    let std = frame.get("AAPL_rolling_std").unwrap();
    let upper = frame.get("AAPL_upper_band").unwrap();
    let lower = frame.get("AAPL_lower_band").unwrap();
    let ret = frame.get("AAPL_daily_return").unwrap();

    for i in 29..35 {
        assert_eq!(std[i], 0.0);
        assert_eq!(upper[i], 100.0);
        assert_eq!(lower[i], 100.0);
    }
    assert!(std[..29].iter().all(|v| v.is_nan()));
    assert!(ret[0].is_nan());
    assert!(ret[1..].iter().all(|&v| v == 0.0));
}

#[test]
fn rolling_mean_matches_window_average() {
    let prices = wavy(80, 50.0);
    let w = 30;
    let (mean, _) = rolling_mean_std(&prices, w);
    for i in 0..prices.len() {
        if i < w - 1 {
            assert!(mean[i].is_nan());
        } else {
            let expected = prices[i + 1 - w..=i].iter().sum::<f64>() / w as f64;
            assert!((mean[i] - expected).abs() < 1e-9);
        }
    }
}

#[test]
fn band_width_is_four_rolling_std() {
    let bands = bollinger_bands(&wavy(90, 20.0), 30, 2.0);
    for i in 0..90 {
        if bands.std[i].is_nan() {
            assert!(bands.upper[i].is_nan() && bands.lower[i].is_nan());
            continue;
        }
        let width = bands.upper[i] - bands.lower[i];
        assert!((width - 4.0 * bands.std[i]).abs() < 1e-9);
    }
}

#[test]
fn daily_return_definition() {
    let prices = wavy(40, 10.0);
    let ret = daily_return(&prices);
    assert!(ret[0].is_nan());
    for i in 1..prices.len() {
        assert!((ret[i] - (prices[i] / prices[i - 1] - 1.0)).abs() < 1e-12);
    }
}

#[test]
fn absent_ticker_is_skipped() {
    let table = close_table(&[("AAPL", wavy(40, 10.0)), ("NVDA", wavy(40, 30.0))]);
    let report = Analyzer::default()
        .moving_average(&table, &TickerList::parse("AAPL,ZZZZ,NVDA"))
        .unwrap();
    assert_eq!(report.skipped, vec!["ZZZZ"]);
    assert!(report.frame.contains("AAPL_rolling_mean"));
    assert!(report.frame.contains("NVDA_rolling_mean"));
    assert!(!report.frame.names().iter().any(|n| n.starts_with("ZZZZ")));
}

#[test]
fn repeated_runs_are_bit_identical() {
    let table = close_table(&[("AAPL", wavy(60, 10.0)), ("NVDA", wavy(60, 30.0))]);
    let tickers = TickerList::parse("AAPL,NVDA");
    let analyzer = Analyzer::default();
    let a = analyzer.run(AnalysisView::Bollinger, &table, &tickers).unwrap();
    let b = analyzer.run(AnalysisView::Bollinger, &table, &tickers).unwrap();
    for (x, y) in a.frame.columns().iter().zip(b.frame.columns()) {
        assert_eq!(x.name, y.name);
        assert!(x
            .values
            .iter()
            .zip(&y.values)
            .all(|(p, q)| p.to_bits() == q.to_bits()));
    }
}

#[test]
fn short_series_fails_decomposition_only_for_that_ticker() {
    // AAPL has 50 usable rows; NVDA is long enough for a 20-row period
    let mut aapl = vec![f64::NAN; 30];
    aapl.extend(wavy(50, 10.0));
    let table = close_table(&[("AAPL", aapl), ("NVDA", wavy(80, 30.0))]);
    let analyzer = Analyzer::new(AnalysisConfig {
        period: 20,
        ..AnalysisConfig::default()
    });
    let report = analyzer
        .seasonal(&table, &TickerList::parse("AAPL,NVDA"))
        .unwrap();

    let warnings: Vec<_> = report.warnings().collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].ticker.as_deref(), Some("AAPL"));
    assert!(report.frame.contains("NVDA_trend"));
    assert!(!report.frame.contains("AAPL_trend"));
    assert_eq!(report.charts.len(), 1);
}

#[test]
fn default_period_rejects_fifty_rows() {
    let table = close_table(&[("AAPL", wavy(50, 10.0)), ("NVDA", wavy(50, 30.0))]);
    let report = Analyzer::default()
        .seasonal(&table, &TickerList::parse("AAPL,NVDA"))
        .unwrap();
    assert_eq!(report.warnings().count(), 2);
    assert!(report.warnings().all(|n| n.message.contains("computation failed")));
}

#[test]
fn empty_table_reports_no_data() {
    let err = Analyzer::default()
        .run(AnalysisView::Seasonal, &PriceTable::empty(), &TickerList::parse("AAPL"))
        .unwrap_err();
    assert!(matches!(err, TsaError::EmptyInput { .. }));
}

#[test]
fn tickers_past_six_are_reported() {
    let names = ["A", "B", "C", "D", "E", "F", "G"];
    let series: Vec<(&str, Vec<f64>)> = names.iter().map(|n| (*n, wavy(35, 10.0))).collect();
    let table = close_table(&series);
    let report = Analyzer::default()
        .moving_average(&table, &TickerList::parse("A,B,C,D,E,F,G"))
        .unwrap();
    assert_eq!(report.dropped, vec!["G"]);
    assert!(!report.frame.contains("G_rolling_mean"));
    assert_eq!(report.charts[0].panels.len(), 6);
}
