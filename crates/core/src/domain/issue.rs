use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{CoreError, Result};

/// A finding emitted by an engine.
///
/// The document is passed through untouched; accessors only read the
/// fields the validations and reporters need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Issue(Value);

impl Issue {
    /// Parse one JSON document from engine output.
    pub fn parse(document: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(document)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(CoreError::InvalidIssue(format!(
                "expected a JSON object, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Whether the document declares itself as an issue (other kinds,
    /// such as measurements, are ignored by the pipeline).
    pub fn is_issue(&self) -> bool {
        self.kind()
            .map(|kind| kind.eq_ignore_ascii_case("issue"))
            .unwrap_or(false)
    }

    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    pub fn check_name(&self) -> Option<&str> {
        self.0.get("check_name").and_then(Value::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.0.get("description").and_then(Value::as_str)
    }

    pub fn location(&self) -> Option<&Value> {
        self.0.get("location")
    }

    pub fn path(&self) -> Option<&str> {
        self.location()
            .and_then(|location| location.get("path"))
            .and_then(Value::as_str)
    }

    /// First line the issue refers to, from either `lines` or `positions`.
    pub fn begin_line(&self) -> Option<u64> {
        let location = self.location()?;
        if let Some(line) = location.pointer("/lines/begin").and_then(Value::as_u64) {
            return Some(line);
        }
        location
            .pointer("/positions/begin/line")
            .and_then(Value::as_u64)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_issue() {
        let issue = Issue::parse(
            r#"{"type":"Issue","check_name":"Style/Foo","description":"Bad","location":{"path":"a.rb","lines":{"begin":3,"end":4}}}"#,
        )
        .unwrap();

        assert!(issue.is_issue());
        assert_eq!(issue.check_name(), Some("Style/Foo"));
        assert_eq!(issue.description(), Some("Bad"));
        assert_eq!(issue.path(), Some("a.rb"));
        assert_eq!(issue.begin_line(), Some(3));
    }

    #[test]
    fn test_begin_line_from_positions() {
        let issue = Issue::from_value(json!({
            "type": "issue",
            "location": {
                "path": "a.rb",
                "positions": { "begin": { "line": 7, "column": 1 }, "end": { "line": 8, "column": 2 } }
            }
        }))
        .unwrap();

        assert_eq!(issue.begin_line(), Some(7));
    }

    #[test]
    fn test_non_issue_document() {
        let issue = Issue::from_value(json!({ "type": "measurement", "name": "loc" })).unwrap();
        assert!(!issue.is_issue());
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            Issue::from_value(json!([1, 2])),
            Err(CoreError::InvalidIssue(_))
        ));
        assert!(matches!(
            Issue::parse("not json"),
            Err(CoreError::Serialization(_))
        ));
    }
}
