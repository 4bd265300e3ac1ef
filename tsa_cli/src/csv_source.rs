use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};
use tsa_core::common::time::parse_date;
use tsa_core::table::{ColumnData, FlatColumn, KeyedColumn, MultiTickerTable, SingleTickerTable};
use tsa_core::{ColumnKey, FetchRequest, PriceSource, PriceTable, TsaError, TsaResult};

/// Market data read from a delimited file.
///
/// Accepts the flat layout (`Date,Open,High,Low,Close,Volume`) and the
/// two-level layout with three header rows (`Price,...`, `Ticker,...`,
/// `Date,...`).
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    path: PathBuf,
}

impl CsvPriceSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn read_table<R: Read>(reader: R) -> TsaResult<PriceTable> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| TsaError::Parse {
                what: "csv record",
                input: e.to_string(),
            })?;
            records.push(record);
        }

        if records.is_empty() {
            return Ok(PriceTable::empty());
        }
        let is_multi = records.len() >= 2 && is_two_level_header(&records[0], &records[1]);
        if is_multi {
            parse_multi(&records)
        } else {
            parse_flat(&records)
        }
    }
}

/// `Price,...` / `Ticker,...`, or both header cells left blank
fn is_two_level_header(fields: &StringRecord, tickers: &StringRecord) -> bool {
    let blank = |r: &StringRecord| r.get(0).map_or(true, str::is_empty);
    tickers.get(0) == Some("Ticker") || (blank(fields) && blank(tickers))
}

fn parse_cell(cell: Option<&str>) -> TsaResult<f64> {
    match cell.map(str::trim) {
        None | Some("") => Ok(f64::NAN),
        Some(s) => s.parse::<f64>().map_err(|_| TsaError::Parse {
            what: "price",
            input: s.to_string(),
        }),
    }
}

fn parse_multi(records: &[StringRecord]) -> TsaResult<PriceTable> {
    let fields = &records[0];
    let tickers = &records[1];
    let width = fields.len();

    let mut dates = Vec::new();
    let mut values: Vec<Vec<f64>> = vec![Vec::new(); width.saturating_sub(1)];
    for record in &records[2..] {
        let first = record.get(0).unwrap_or("");
        if first == "Date" || first.is_empty() {
            continue;
        }
        dates.push(parse_date(first)?);
        for (i, col) in values.iter_mut().enumerate() {
            col.push(parse_cell(record.get(i + 1))?);
        }
    }

    let columns = values
        .into_iter()
        .enumerate()
        .map(|(i, values)| KeyedColumn {
            field: fields.get(i + 1).unwrap_or("").to_string(),
            ticker: tickers.get(i + 1).unwrap_or("").to_string(),
            values,
        })
        .collect();
    Ok(PriceTable::Multi(MultiTickerTable::new(dates, columns)?))
}

fn parse_flat(records: &[StringRecord]) -> TsaResult<PriceTable> {
    let header = &records[0];
    let names: Vec<String> = header.iter().skip(1).map(str::to_string).collect();

    let mut dates = Vec::new();
    let mut cells: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for record in &records[1..] {
        let first = record.get(0).unwrap_or("");
        if first.is_empty() {
            continue;
        }
        dates.push(parse_date(first)?);
        for (i, col) in cells.iter_mut().enumerate() {
            col.push(record.get(i + 1).unwrap_or("").to_string());
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| {
            let numeric: Result<Vec<f64>, _> = raw.iter().map(|s| parse_cell(Some(s.as_str()))).collect();
            let data = match numeric {
                Ok(v) => ColumnData::Numeric(v),
                Err(_) => ColumnData::Text(raw),
            };
            FlatColumn { name, data }
        })
        .collect();
    Ok(PriceTable::Single(SingleTickerTable::new(dates, columns)?))
}

impl PriceSource for CsvPriceSource {
    fn fetch(&self, request: &FetchRequest) -> TsaResult<PriceTable> {
        debug!(path = %self.path.display(), "reading price file");
        let file = File::open(&self.path).map_err(|e| {
            TsaError::Source(format!("{}: {}", self.path.display(), e))
        })?;
        let table = Self::read_table(file)?.between(request.start, request.end);

        let table = if table.is_multi() {
            let wanted: HashSet<&str> = request.tickers.iter().collect();
            let keys: Vec<ColumnKey> = table
                .keys()
                .into_iter()
                .filter(|k| match k {
                    ColumnKey::Keyed { ticker, .. } => wanted.contains(ticker.as_str()),
                    ColumnKey::Flat(_) => false,
                })
                .collect();
            table.filter_columns(&keys)
        } else {
            table
        };
        info!(
            path = %self.path.display(),
            rows = table.rows(),
            columns = table.n_columns(),
            "loaded price table"
        );
        Ok(table)
    }
}
