// Pure book arithmetic: no I/O below this module
pub mod types;
pub mod fill;      // market-order walk over an aggregated book
pub mod pricing;   // volume-weighted summaries

pub use types::*;
