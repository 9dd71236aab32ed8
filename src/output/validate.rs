//! Validation of generated bulk records
//!
//! Two checks, in order: the record's `SubjectWebpage` must be present
//! and reachable, and the pipe-separated `SupportServiceType` /
//! `AccommodationType` strings are filtered down to values that exactly
//! match the controlled vocabularies. Unknown taxonomy values are
//! silently dropped rather than failing the record.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::extract::{ACCOMMODATION_TYPES, SUPPORT_SERVICE_TYPES};
use crate::fetch::Fetch;

const TAXONOMY_KEYS: [(&str, &[&str]); 2] = [
    ("SupportServiceType", SUPPORT_SERVICE_TYPES),
    ("AccommodationType", ACCOMMODATION_TYPES),
];

/// Filter a pipe-separated taxonomy string against an allow-list,
/// rejoining the survivors with `" | "`.
fn filter_taxonomy(raw: &str, allowed: &[&str]) -> String {
    raw.split('|')
        .map(str::trim)
        .filter(|v| allowed.contains(v))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Validate generated bulk records.
///
/// Records without a reachable `SubjectWebpage` are dropped; surviving
/// records have their taxonomy fields filtered in place. Record order
/// is preserved.
#[instrument(skip(fetcher, records), level = "debug")]
pub async fn validate_records<F: Fetch + ?Sized>(fetcher: &F, records: &[Value]) -> Vec<Value> {
    let mut valid = Vec::new();

    for record in records {
        let webpage = record.get("SubjectWebpage").and_then(Value::as_str);
        let webpage = match webpage {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                debug!("Dropping record without a subject webpage");
                continue;
            }
        };

        if !fetcher.is_reachable(webpage).await {
            debug!("Dropping record with unreachable webpage {}", webpage);
            continue;
        }

        let mut record = record.clone();
        if let Some(obj) = record.as_object_mut() {
            for (key, allowed) in TAXONOMY_KEYS {
                if let Some(Value::String(raw)) = obj.get(key) {
                    let filtered = filter_taxonomy(raw, allowed);
                    obj.insert(key.to_string(), Value::String(filtered));
                }
            }
        }
        valid.push(record);
    }

    valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    /// Reachability stub: only URLs containing "good" resolve
    struct StubProbe;

    #[async_trait]
    impl Fetch for StubProbe {
        async fn fetch_page(&self, _url: &str) -> Option<String> {
            None
        }

        async fn is_reachable(&self, url: &str) -> bool {
            url.contains("good")
        }
    }

    #[tokio::test]
    async fn test_drops_records_without_reachable_webpage() {
        let records = vec![
            json!({"ResourceName": "A", "SubjectWebpage": "https://good.example.com/a"}),
            json!({"ResourceName": "B", "SubjectWebpage": "https://dead.example.com/b"}),
            json!({"ResourceName": "C"}),
            json!({"ResourceName": "D", "SubjectWebpage": ""}),
        ];

        let valid = validate_records(&StubProbe, &records).await;
        assert_eq!(valid.len(), 1);
        assert_eq!(valid[0]["ResourceName"], "A");
    }

    #[tokio::test]
    async fn test_filters_taxonomy_values_against_allow_lists() {
        let records = vec![json!({
            "SubjectWebpage": "https://good.example.com",
            "SupportServiceType": "Tutoring | SnackDelivery | CareerAdvising",
            "AccommodationType": "ScreenReader|Jacuzzi",
        })];

        let valid = validate_records(&StubProbe, &records).await;
        assert_eq!(valid[0]["SupportServiceType"], "Tutoring | CareerAdvising");
        assert_eq!(valid[0]["AccommodationType"], "ScreenReader");
    }

    #[tokio::test]
    async fn test_all_invalid_taxonomy_values_leave_empty_string() {
        let records = vec![json!({
            "SubjectWebpage": "https://good.example.com",
            "SupportServiceType": "FreeParking",
        })];

        let valid = validate_records(&StubProbe, &records).await;
        assert_eq!(valid[0]["SupportServiceType"], "");
    }

    #[test]
    fn test_filter_taxonomy_trims_around_pipes() {
        assert_eq!(
            filter_taxonomy("  Counseling |Mentoring  ", SUPPORT_SERVICE_TYPES),
            "Counseling | Mentoring"
        );
    }
}
