//! Bulk-upload CSV conversion
//!
//! Writes validated bulk records into the eleven-column bulk-upload
//! template. A single object is treated as a one-record array; missing
//! or non-string fields become empty cells.

use csv::Writer;
use serde_json::Value;
use std::io;

use crate::error::Result;

/// Column headers of the bulk-upload template, in order
const HEADERS: [&str; 11] = [
    "External Identifier",
    "Resource Name",
    "Description",
    "Subject Webpage",
    "Life Cycle Status Type",
    "Language",
    "Accommodation Type",
    "Support Service Type",
    "Delivery Type",
    "Keywords",
    "Offered By",
];

/// Record fields backing each column, in the same order as [`HEADERS`]
const FIELDS: [&str; 11] = [
    "ExternalIdentifier",
    "ResourceName",
    "Description",
    "SubjectWebpage",
    "LifeCycleStatusType",
    "Language",
    "AccommodationType",
    "SupportServiceType",
    "DeliveryType",
    "Keywords",
    "OfferedBy",
];

/// Write generated bulk records as a bulk-upload CSV.
///
/// Accepts either a JSON array of records or a single record object.
pub fn write_bulk_csv<W: io::Write>(records: &Value, sink: W) -> Result<()> {
    let records: Vec<&Value> = match records {
        Value::Array(items) => items.iter().collect(),
        single => vec![single],
    };

    let mut writer = Writer::from_writer(sink);
    writer.write_record(HEADERS)?;

    for record in records {
        let row = FIELDS
            .iter()
            .map(|field| record.get(field).and_then(Value::as_str).unwrap_or(""));
        writer.write_record(row)?;
    }

    writer.flush()?;
    Ok(())
}
