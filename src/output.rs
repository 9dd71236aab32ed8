//! Generated-output post-processing
//!
//! The model's output is not trusted as-is. Before it is converted or
//! published, bulk records pass through validation: taxonomy values are
//! filtered against the controlled vocabularies and records whose
//! subject webpage is missing or unreachable are dropped.

mod csv;
mod validate;

pub use csv::write_bulk_csv;
pub use validate::validate_records;
