pub mod describe;
pub mod price_table;
pub mod series_frame;

pub use describe::{describe, TableSummary};
pub use price_table::{
    ColumnData, ColumnKey, FlatColumn, KeyedColumn, MultiTickerTable, PriceTable,
    SingleTickerTable,
};
pub use series_frame::{ClosePriceTable, DerivedFrame, NamedSeries, SeriesFrame};
