use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::common::{
    enums::{DType, FIELD_CLOSE},
    time::is_strictly_increasing,
    tsa_error::{TsaError, TsaResult},
};
use crate::table::series_frame::ClosePriceTable;

/// Column address: a flat name, or (field, ticker) in a multi-ticker table
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ColumnKey {
    Flat(String),
    Keyed { field: String, ticker: String },
}

impl ColumnKey {
    pub fn keyed(field: impl Into<String>, ticker: impl Into<String>) -> Self {
        Self::Keyed {
            field: field.into(),
            ticker: ticker.into(),
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flat(name) => write!(f, "{}", name),
            Self::Keyed { field, ticker } => write!(f, "{}:{}", field, ticker),
        }
    }
}

/// "Close:AAPL" addresses a two-level column, "Close" a flat one
impl FromStr for ColumnKey {
    type Err = TsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || TsaError::Parse {
            what: "column key",
            input: s.to_string(),
        };
        match s.split_once(':') {
            Some((field, ticker)) => {
                let (field, ticker) = (field.trim(), ticker.trim());
                if field.is_empty() || ticker.is_empty() {
                    return Err(err());
                }
                Ok(Self::keyed(field, ticker))
            }
            None if !s.is_empty() => Ok(Self::Flat(s.to_string())),
            None => Err(err()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    /// NaN marks an undefined cell
    Numeric(Vec<f64>),
    Text(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn dtype(&self) -> DType {
        match self {
            Self::Numeric(_) => DType::Float64,
            Self::Text(_) => DType::Object,
        }
    }

    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric(v) => Some(v),
            Self::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatColumn {
    pub name: String,
    pub data: ColumnData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyedColumn {
    pub field: String,
    pub ticker: String,
    pub values: Vec<f64>,
}

/// Table returned for a single requested ticker: one column per field
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SingleTickerTable {
    dates: Vec<NaiveDate>,
    columns: Vec<FlatColumn>,
}

/// Table returned for several tickers: columns keyed by (field, ticker)
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiTickerTable {
    dates: Vec<NaiveDate>,
    columns: Vec<KeyedColumn>,
}

fn check_index(dates: &[NaiveDate]) -> TsaResult<()> {
    if is_strictly_increasing(dates) {
        Ok(())
    } else {
        Err(TsaError::Shape("date index is not strictly increasing".to_string()))
    }
}

fn check_len(rows: usize, column: &str, len: usize) -> TsaResult<()> {
    if len == rows {
        Ok(())
    } else {
        Err(TsaError::Shape(format!(
            "column {} has {} values, index has {} rows",
            column, len, rows
        )))
    }
}

impl SingleTickerTable {
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<FlatColumn>) -> TsaResult<Self> {
        check_index(&dates)?;
        for col in &columns {
            check_len(dates.len(), &col.name, col.data.len())?;
        }
        Ok(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[FlatColumn] {
        &self.columns
    }
}

impl MultiTickerTable {
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<KeyedColumn>) -> TsaResult<Self> {
        check_index(&dates)?;
        for col in &columns {
            check_len(
                dates.len(),
                &format!("{}:{}", col.field, col.ticker),
                col.values.len(),
            )?;
        }
        Ok(Self { dates, columns })
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn columns(&self) -> &[KeyedColumn] {
        &self.columns
    }

    /// Distinct tickers in column order
    pub fn tickers(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for col in &self.columns {
            if !out.contains(&col.ticker.as_str()) {
                out.push(&col.ticker);
            }
        }
        out
    }
}

/// A fetched price table. The key scheme is fixed at ingestion.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceTable {
    Single(SingleTickerTable),
    Multi(MultiTickerTable),
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::empty()
    }
}

impl PriceTable {
    pub fn empty() -> Self {
        Self::Single(SingleTickerTable::default())
    }

    pub fn dates(&self) -> &[NaiveDate] {
        match self {
            Self::Single(t) => t.dates(),
            Self::Multi(t) => t.dates(),
        }
    }

    pub fn rows(&self) -> usize {
        self.dates().len()
    }

    pub fn n_columns(&self) -> usize {
        match self {
            Self::Single(t) => t.columns.len(),
            Self::Multi(t) => t.columns.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows() == 0 || self.n_columns() == 0
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    pub fn keys(&self) -> Vec<ColumnKey> {
        match self {
            Self::Single(t) => t
                .columns
                .iter()
                .map(|c| ColumnKey::Flat(c.name.clone()))
                .collect(),
            Self::Multi(t) => t
                .columns
                .iter()
                .map(|c| ColumnKey::keyed(c.field.as_str(), c.ticker.as_str()))
                .collect(),
        }
    }

    /// Column data by key; a key of the other scheme never matches
    pub fn column(&self, key: &ColumnKey) -> Option<ColumnData> {
        match (self, key) {
            (Self::Single(t), ColumnKey::Flat(name)) => t
                .columns
                .iter()
                .find(|c| &c.name == name)
                .map(|c| c.data.clone()),
            (Self::Multi(t), ColumnKey::Keyed { field, ticker }) => t
                .columns
                .iter()
                .find(|c| &c.field == field && &c.ticker == ticker)
                .map(|c| ColumnData::Numeric(c.values.clone())),
            _ => None,
        }
    }

    /// Rows with `start <= date < end`
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> PriceTable {
        let keep: Vec<bool> = self
            .dates()
            .iter()
            .map(|d| start <= *d && *d < end)
            .collect();
        let pick = |v: &[f64]| -> Vec<f64> {
            v.iter().zip(&keep).filter(|(_, k)| **k).map(|(x, _)| *x).collect()
        };
        let dates: Vec<NaiveDate> = self
            .dates()
            .iter()
            .zip(&keep)
            .filter(|(_, k)| **k)
            .map(|(d, _)| *d)
            .collect();

        match self {
            Self::Single(t) => Self::Single(SingleTickerTable {
                dates,
                columns: t
                    .columns
                    .iter()
                    .map(|c| FlatColumn {
                        name: c.name.clone(),
                        data: match &c.data {
                            ColumnData::Numeric(v) => ColumnData::Numeric(pick(v)),
                            ColumnData::Text(v) => ColumnData::Text(
                                v.iter()
                                    .zip(&keep)
                                    .filter(|(_, k)| **k)
                                    .map(|(s, _)| s.clone())
                                    .collect(),
                            ),
                        },
                    })
                    .collect(),
            }),
            Self::Multi(t) => Self::Multi(MultiTickerTable {
                dates,
                columns: t
                    .columns
                    .iter()
                    .map(|c| KeyedColumn {
                        field: c.field.clone(),
                        ticker: c.ticker.clone(),
                        values: pick(&c.values),
                    })
                    .collect(),
            }),
        }
    }

    /// Keep only the requested columns that exist, in request order.
    pub fn filter_columns(&self, keys: &[ColumnKey]) -> PriceTable {
        match self {
            Self::Single(t) => {
                let mut columns = Vec::new();
                for key in keys {
                    if let ColumnKey::Flat(name) = key {
                        if let Some(c) = t.columns.iter().find(|c| &c.name == name) {
                            if !columns.iter().any(|k: &FlatColumn| &k.name == name) {
                                columns.push(c.clone());
                            }
                        }
                    }
                }
                Self::Single(SingleTickerTable {
                    dates: t.dates.clone(),
                    columns,
                })
            }
            Self::Multi(t) => {
                let mut columns: Vec<KeyedColumn> = Vec::new();
                for key in keys {
                    if let ColumnKey::Keyed { field, ticker } = key {
                        let found = t
                            .columns
                            .iter()
                            .find(|c| &c.field == field && &c.ticker == ticker);
                        if let Some(c) = found {
                            let dup = columns
                                .iter()
                                .any(|k| &k.field == field && &k.ticker == ticker);
                            if !dup {
                                columns.push(c.clone());
                            }
                        }
                    }
                }
                Self::Multi(MultiTickerTable {
                    dates: t.dates.clone(),
                    columns,
                })
            }
        }
    }

    /// Select the Close field of a multi-ticker table, or every numeric
    /// column of a single-ticker table.
    pub fn extract_close_prices(&self) -> TsaResult<ClosePriceTable> {
        if self.rows() == 0 {
            return Err(TsaError::empty("price table has no rows"));
        }
        let columns: Vec<(String, Vec<f64>)> = match self {
            Self::Multi(t) => t
                .columns
                .iter()
                .filter(|c| c.field == FIELD_CLOSE)
                .map(|c| (c.ticker.clone(), c.values.clone()))
                .collect(),
            Self::Single(t) => t
                .columns
                .iter()
                .filter_map(|c| c.data.as_numeric().map(|v| (c.name.clone(), v.to_vec())))
                .collect(),
        };
        if columns.is_empty() {
            let what = if self.is_multi() {
                "no 'Close' price columns"
            } else {
                "no numeric columns"
            };
            return Err(TsaError::empty(what));
        }
        ClosePriceTable::new(self.dates().to_vec(), columns)
    }
}
