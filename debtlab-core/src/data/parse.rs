//! Response parser: JSON body to text-typed records.
//!
//! The Fiscal Data API returns every value as a string (numbers and dates
//! included) and spells missing values as the literal text `"null"`. This
//! module keeps everything as text; typing happens in the normalizer.

use serde::{Deserialize, Deserializer};

use super::provider::DataError;

/// One row of the `data` array, still untyped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(deserialize_with = "text")]
    pub record_date: String,
    #[serde(deserialize_with = "text")]
    pub security_type_desc: String,
    #[serde(deserialize_with = "text")]
    pub security_class_desc: String,
    #[serde(deserialize_with = "text")]
    pub debt_held_public_amt: String,
    #[serde(deserialize_with = "text")]
    pub intragov_hold_amt: String,
    #[serde(deserialize_with = "text")]
    pub total_amt: String,
}

/// Pagination metadata from the `meta` object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PageMeta {
    /// Rows on this page.
    #[serde(default)]
    pub count: Option<u64>,
    /// Rows across all pages.
    #[serde(default, rename = "total-count")]
    pub total_count: Option<u64>,
    #[serde(default, rename = "total-pages")]
    pub total_pages: Option<u64>,
}

/// A decoded page: records in wire order plus metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedPage {
    pub records: Vec<RawRecord>,
    pub meta: PageMeta,
}

#[derive(Deserialize)]
struct Envelope {
    data: Vec<RawRecord>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

/// Decode a response body.
///
/// Unknown keys (`links`, extra `meta` entries, extra columns) are ignored.
/// Fails with `DataError::Parse` on invalid JSON, a missing `data` key, or a
/// row lacking one of the required columns.
pub fn parse_body(body: &str) -> Result<ParsedPage, DataError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| DataError::Parse(format!("invalid response body: {e}")))?;
    Ok(ParsedPage {
        records: envelope.data,
        meta: envelope.meta.unwrap_or_default(),
    })
}

/// Accept a JSON string, or `null` mapped to the API's textual `"null"`.
fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_else(|| "null".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
        "data": [
            {"record_date": "2023-12-31", "security_type_desc": "Total Public Debt Outstanding",
             "security_class_desc": "_", "debt_held_public_amt": "26900000.00",
             "intragov_hold_amt": "7101490.00", "total_amt": "34001490.00",
             "src_line_nbr": "30"}
        ],
        "meta": {"count": 1, "total-count": 1, "total-pages": 1,
                 "labels": {"record_date": "Record Date"}},
        "links": {"self": "&page%5Bnumber%5D=1", "next": null}
    }"#;

    #[test]
    fn parses_data_and_meta() {
        let page = parse_body(BODY).unwrap();
        assert_eq!(page.records.len(), 1);
        assert_eq!(page.records[0].record_date, "2023-12-31");
        assert_eq!(page.records[0].security_class_desc, "_");
        assert_eq!(page.meta.total_count, Some(1));
        assert_eq!(page.meta.total_pages, Some(1));
        assert_eq!(page.meta.count, Some(1));
    }

    #[test]
    fn meta_is_optional() {
        let page = parse_body(r#"{"data": []}"#).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.meta, PageMeta::default());
    }

    #[test]
    fn null_becomes_null_text() {
        let body = r#"{"data": [{"record_date": "2023-12-31",
            "security_type_desc": "Total Marketable", "security_class_desc": null,
            "debt_held_public_amt": "1", "intragov_hold_amt": "2", "total_amt": "3"}]}"#;
        let page = parse_body(body).unwrap();
        assert_eq!(page.records[0].security_class_desc, "null");
    }

    #[test]
    fn invalid_json_is_parse_error() {
        assert!(matches!(parse_body("<html>"), Err(DataError::Parse(_))));
    }

    #[test]
    fn missing_data_key_is_parse_error() {
        let err = parse_body(r#"{"meta": {"total-count": 0}}"#).unwrap_err();
        assert!(matches!(err, DataError::Parse(_)));
        assert!(err.to_string().contains("data"));
    }

    #[test]
    fn renamed_column_is_parse_error() {
        let body = r#"{"data": [{"record_date": "2023-12-31",
            "security_type": "Total Marketable", "security_class_desc": "_",
            "debt_held_public_amt": "1", "intragov_hold_amt": "2", "total_amt": "3"}]}"#;
        assert!(matches!(parse_body(body), Err(DataError::Parse(_))));
    }

    #[test]
    fn numeric_value_is_parse_error() {
        let body = r#"{"data": [{"record_date": "2023-12-31",
            "security_type_desc": "Total Marketable", "security_class_desc": "_",
            "debt_held_public_amt": 1, "intragov_hold_amt": "2", "total_amt": "3"}]}"#;
        assert!(matches!(parse_body(body), Err(DataError::Parse(_))));
    }
}
