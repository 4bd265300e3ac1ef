pub mod boll;
pub mod decompose;
pub mod histogram;
pub mod returns;
pub mod rolling;
