use strum_macros::{Display, EnumString};
use thiserror::Error;

/// Error codes for the analysis engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[repr(i32)]
pub enum ErrCode {
    // Data errors (0-99)
    #[strum(serialize = "_DATA_ERR_BEGIN")]
    DataErrBegin = 0,
    #[strum(serialize = "NO_DATA")]
    NoData = 1,
    #[strum(serialize = "TICKER_NOT_FOUND")]
    TickerNotFound = 2,
    #[strum(serialize = "TABLE_SHAPE_ERR")]
    TableShapeErr = 3,
    #[strum(serialize = "SRC_DATA_FORMAT_ERROR")]
    SrcDataFormatError = 4,
    #[strum(serialize = "SRC_DATA_NOT_FOUND")]
    SrcDataNotFound = 5,
    #[strum(serialize = "_DATA_ERR_END")]
    DataErrEnd = 99,

    // Analysis errors (100-199)
    #[strum(serialize = "_ANALYSIS_ERR_BEGIN")]
    AnalysisErrBegin = 100,
    #[strum(serialize = "COMPUTATION_FAILURE")]
    ComputationFailure = 101,
    #[strum(serialize = "CONFIG_ERROR")]
    ConfigError = 102,
    #[strum(serialize = "PARA_ERROR")]
    ParaError = 103,
    #[strum(serialize = "_ANALYSIS_ERR_END")]
    AnalysisErrEnd = 199,
}

impl ErrCode {
    pub fn is_data_err(&self) -> bool {
        let code = *self as i32;
        code > Self::DataErrBegin as i32 && code < Self::DataErrEnd as i32
    }

    pub fn is_analysis_err(&self) -> bool {
        let code = *self as i32;
        code > Self::AnalysisErrBegin as i32 && code < Self::AnalysisErrEnd as i32
    }
}

#[derive(Debug, Error)]
pub enum TsaError {
    /// Table or its extracted numeric subset has no rows or no columns.
    #[error("no data for analysis: {context}")]
    EmptyInput { context: String },

    #[error("ticker {ticker} not found in data")]
    MissingTicker { ticker: String },

    /// An algorithm rejected a single ticker's series.
    #[error("computation failed for {ticker}: {reason}")]
    Computation { ticker: String, reason: String },

    #[error("malformed table: {0}")]
    Shape(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("market data source failed: {0}")]
    Source(String),

    #[error("cannot parse {what}: {input}")]
    Parse { what: &'static str, input: String },
}

impl TsaError {
    pub fn empty(context: impl Into<String>) -> Self {
        Self::EmptyInput {
            context: context.into(),
        }
    }

    pub fn computation(ticker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Computation {
            ticker: ticker.into(),
            reason: reason.into(),
        }
    }

    pub fn errcode(&self) -> ErrCode {
        match self {
            Self::EmptyInput { .. } => ErrCode::NoData,
            Self::MissingTicker { .. } => ErrCode::TickerNotFound,
            Self::Computation { .. } => ErrCode::ComputationFailure,
            Self::Shape(_) => ErrCode::TableShapeErr,
            Self::Config(_) => ErrCode::ConfigError,
            Self::InvalidRequest(_) => ErrCode::ParaError,
            Self::Source(_) => ErrCode::SrcDataNotFound,
            Self::Parse { .. } => ErrCode::SrcDataFormatError,
        }
    }

    pub fn is_data_err(&self) -> bool {
        self.errcode().is_data_err()
    }

    pub fn is_analysis_err(&self) -> bool {
        self.errcode().is_analysis_err()
    }
}

pub type TsaResult<T> = Result<T, TsaError>;
