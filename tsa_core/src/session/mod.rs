pub mod session;
pub mod source;

pub use session::Session;
pub use source::{FetchRequest, PriceSource};
