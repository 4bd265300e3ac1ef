pub mod analyzer;
pub mod chart;
pub mod common;
pub mod config;
pub mod math;
pub mod session;
pub mod table;
pub mod ticker;

pub use analyzer::{AnalysisReport, AnalysisView, Analyzer};
pub use common::tsa_error::{TsaError, TsaResult};
pub use config::AnalysisConfig;
pub use session::{FetchRequest, PriceSource, Session};
pub use table::{ColumnKey, PriceTable};
pub use ticker::TickerList;
