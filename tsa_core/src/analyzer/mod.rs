pub mod analyzer;
pub mod report;

pub use analyzer::{AnalysisView, Analyzer, TickerPlan};
pub use report::{AnalysisReport, Notice, NoticeLevel};
