use chrono::NaiveDate;
use serde::Serialize;

use crate::common::{
    time::is_strictly_increasing,
    tsa_error::{TsaError, TsaResult},
    utils::count_missing,
};

/// Named numeric columns sharing one date index.
///
/// Holds the extracted close prices (one column per ticker) and, during an
/// analysis, the derived `{ticker}_{metric}` columns appended after them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesFrame {
    dates: Vec<NaiveDate>,
    columns: Vec<NamedSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NamedSeries {
    pub name: String,
    pub values: Vec<f64>,
}

pub type ClosePriceTable = SeriesFrame;
pub type DerivedFrame = SeriesFrame;

impl SeriesFrame {
    pub fn new(dates: Vec<NaiveDate>, columns: Vec<(String, Vec<f64>)>) -> TsaResult<Self> {
        if !is_strictly_increasing(&dates) {
            return Err(TsaError::Shape("date index is not strictly increasing".to_string()));
        }
        let mut frame = Self {
            dates,
            columns: Vec::with_capacity(columns.len()),
        };
        for (name, values) in columns {
            frame.push(name, values)?;
        }
        Ok(frame)
    }

    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn rows(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty() || self.columns.is_empty()
    }

    pub fn columns(&self) -> &[NamedSeries] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Append a column, replacing any column of the same name.
    pub fn push(&mut self, name: impl Into<String>, values: Vec<f64>) -> TsaResult<()> {
        let name = name.into();
        if values.len() != self.dates.len() {
            return Err(TsaError::Shape(format!(
                "column {} has {} values, index has {} rows",
                name,
                values.len(),
                self.dates.len()
            )));
        }
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(col) => col.values = values,
            None => self.columns.push(NamedSeries { name, values }),
        }
        Ok(())
    }

    /// Undefined-value count per column, in column order
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), count_missing(&c.values)))
            .collect()
    }
}
