//! Normalization of raw search hits into [`ResourceRecord`]s.
//!
//! Tag data arrives in one of two shapes depending on the service that
//! reported the resource: a key→value mapping, or a list of `{Key, Value}`
//! pair objects. Both are handled behind the [`TagData`] sum type; only one
//! shape is expected per input.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;

use super::state::ResourceRecord;

/// Keys tried, in priority order, when tag data is a key→value mapping.
const TAG_KEYS: [&str; 4] = ["Application", "application", "App", "app"];

/// Raw resource description handed over by the scanner: identity fields
/// from the search hit plus a properties mapping that may carry tag data
/// under `Tags` or `tags`.
#[derive(Debug, Clone, Default)]
pub struct RawResource {
    pub arn: String,
    pub service: String,
    pub resource_type: String,
    pub owning_account_id: String,
    pub region: String,
    pub last_reported_at: Option<DateTime<Utc>>,
    pub properties: Value,
}

/// The two tag shapes seen in provider responses.
enum TagData<'a> {
    Map(&'a serde_json::Map<String, Value>),
    Entries(&'a [Value]),
}

fn tag_data(properties: &Value) -> Option<TagData<'_>> {
    let tags = properties.get("Tags").or_else(|| properties.get("tags"))?;
    match tags {
        Value::Object(map) => Some(TagData::Map(map)),
        Value::Array(entries) => Some(TagData::Entries(entries)),
        _ => None,
    }
}

/// Infer the Application label from whichever tag shape is present.
///
/// Mapping shape: the first non-empty value among [`TAG_KEYS`] wins.
/// List shape: the first entry whose key equals `application` or `app`
/// (case-insensitively) contributes its value; the scan stops at the first
/// key match even when the value is missing.
pub fn infer_application(properties: &Value) -> String {
    match tag_data(properties) {
        Some(TagData::Map(map)) => TAG_KEYS
            .iter()
            .filter_map(|key| map.get(*key).and_then(Value::as_str))
            .find(|value| !value.is_empty())
            .unwrap_or("")
            .to_string(),
        Some(TagData::Entries(entries)) => entries
            .iter()
            .find(|entry| {
                entry.get("Key").and_then(Value::as_str).is_some_and(|key| {
                    key.eq_ignore_ascii_case("application") || key.eq_ignore_ascii_case("app")
                })
            })
            .map(|entry| {
                entry
                    .get("Value")
                    .and_then(Value::as_str)
                    .unwrap_or("")
                    .to_string()
            })
            .unwrap_or_default(),
        None => String::new(),
    }
}

/// Strip an ARN down to its most specific component: the segment after the
/// last `/`, else after the last `:`, else the ARN verbatim. Malformed ARNs
/// degrade to themselves rather than erroring.
pub fn extract_identifier(arn: &str) -> &str {
    if let Some(idx) = arn.rfind('/') {
        &arn[idx + 1..]
    } else if let Some(idx) = arn.rfind(':') {
        &arn[idx + 1..]
    } else {
        arn
    }
}

/// Normalize one raw search hit. Pure: the same input always yields a
/// field-for-field identical record.
pub fn normalize_resource(raw: &RawResource) -> ResourceRecord {
    ResourceRecord {
        service: raw.service.clone(),
        resource_type: raw.resource_type.clone(),
        identifier: extract_identifier(&raw.arn).to_string(),
        arn: raw.arn.clone(),
        application: infer_application(&raw.properties),
        aws_account: raw.owning_account_id.clone(),
        region: raw.region.clone(),
        last_reported_at: raw
            .last_reported_at
            .map(|at| at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_application_from_tag_mapping() {
        let properties = json!({"Tags": {"App": "billing"}});
        assert_eq!(infer_application(&properties), "billing");
    }

    #[test]
    fn test_application_from_tag_list_case_insensitive() {
        let properties = json!({"Tags": [{"Key": "APPLICATION", "Value": "orders"}]});
        assert_eq!(infer_application(&properties), "orders");
    }

    #[test]
    fn test_mapping_priority_order() {
        let properties = json!({"Tags": {"App": "loser", "Application": "winner"}});
        assert_eq!(infer_application(&properties), "winner");
    }

    #[test]
    fn test_mapping_skips_empty_values() {
        let properties = json!({"Tags": {"Application": "", "app": "fallback"}});
        assert_eq!(infer_application(&properties), "fallback");
    }

    #[test]
    fn test_list_stops_at_first_key_match() {
        let properties = json!({"Tags": [
            {"Key": "app"},
            {"Key": "Application", "Value": "ignored"},
        ]});
        // The first matching key wins even with no value attached.
        assert_eq!(infer_application(&properties), "");
    }

    #[test]
    fn test_unrelated_tags_yield_empty_label() {
        let properties = json!({"Tags": [{"Key": "Team", "Value": "payments"}]});
        assert_eq!(infer_application(&properties), "");
        assert_eq!(infer_application(&json!({})), "");
        assert_eq!(infer_application(&json!({"Tags": "not-a-shape"})), "");
    }

    #[test]
    fn test_lowercase_tags_property_key() {
        let properties = json!({"tags": [{"Key": "app", "Value": "checkout"}]});
        assert_eq!(infer_application(&properties), "checkout");
    }

    #[test]
    fn test_identifier_extraction() {
        assert_eq!(
            extract_identifier("arn:aws:s3:::my-bucket/folder/file.txt"),
            "file.txt"
        );
        assert_eq!(
            extract_identifier("arn:aws:iam::123456789012:role/MyRole"),
            "MyRole"
        );
        assert_eq!(extract_identifier("arn:aws:s3:::my-bucket"), "my-bucket");
        assert_eq!(extract_identifier("no-separators-at-all"), "no-separators-at-all");
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = RawResource {
            arn: "arn:aws:lambda:us-east-1:123456789012:function:ingest".to_string(),
            service: "lambda".to_string(),
            resource_type: "lambda:function".to_string(),
            owning_account_id: "123456789012".to_string(),
            region: "us-east-1".to_string(),
            last_reported_at: DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
                .map(|at| at.with_timezone(&Utc))
                .ok(),
            properties: json!({"Tags": {"Application": "ingest-pipeline"}}),
        };

        let first = normalize_resource(&raw);
        let second = normalize_resource(&raw);
        assert_eq!(first, second);

        assert_eq!(first.identifier, "ingest");
        assert_eq!(first.application, "ingest-pipeline");
        assert_eq!(first.last_reported_at, "2024-05-01T12:00:00Z");
    }

    #[test]
    fn test_missing_fields_default_to_empty_strings() {
        let record = normalize_resource(&RawResource::default());
        assert_eq!(record.service, "");
        assert_eq!(record.identifier, "");
        assert_eq!(record.application, "");
        assert_eq!(record.last_reported_at, "");
    }
}
