use serde::Serialize;

use crate::common::{
    enums::DType,
    utils::{count_missing, defined_values, mean, quantile, sample_std},
};
use crate::table::price_table::{ColumnData, PriceTable};

#[derive(Debug, Clone, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

/// Shape, types, missing values and summary statistics of a table
#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub rows: usize,
    pub columns: usize,
    pub dtypes: Vec<(String, DType)>,
    pub missing: Vec<(String, usize)>,
    pub stats: Vec<ColumnStats>,
}

fn column_stats(column: String, values: &[f64]) -> ColumnStats {
    let mut sorted = defined_values(values);
    sorted.sort_by(f64::total_cmp);
    let q = |p| quantile(&sorted, p).unwrap_or(f64::NAN);

    ColumnStats {
        column,
        count: sorted.len(),
        mean: mean(&sorted).unwrap_or(f64::NAN),
        std: sample_std(&sorted).unwrap_or(f64::NAN),
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: q(0.25),
        q50: q(0.5),
        q75: q(0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

pub fn describe(table: &PriceTable) -> TableSummary {
    let keys = table.keys();
    let mut dtypes = Vec::with_capacity(keys.len());
    let mut missing = Vec::with_capacity(keys.len());
    let mut stats = Vec::new();

    for key in keys {
        let Some(data) = table.column(&key) else {
            continue;
        };
        let name = key.to_string();
        dtypes.push((name.clone(), data.dtype()));
        match &data {
            ColumnData::Numeric(values) => {
                missing.push((name.clone(), count_missing(values)));
                stats.push(column_stats(name, values));
            }
            ColumnData::Text(values) => {
                let n = values.iter().filter(|v| v.trim().is_empty()).count();
                missing.push((name, n));
            }
        }
    }

    TableSummary {
        rows: table.rows(),
        columns: table.n_columns(),
        dtypes,
        missing,
        stats,
    }
}
