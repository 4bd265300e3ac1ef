pub mod enums;
pub mod time;
pub mod tsa_error;
pub mod utils;
