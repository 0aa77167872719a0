use serde_json::Value;

/// A location is well-formed when it names a path and either a `lines`
/// range or a `positions` range.
pub(crate) fn is_valid_location(location: &Value) -> bool {
    if !location.get("path").map(Value::is_string).unwrap_or(false) {
        return false;
    }

    if let Some(lines) = location.get("lines") {
        is_valid_lines(lines)
    } else if let Some(positions) = location.get("positions") {
        is_valid_positions(positions)
    } else {
        false
    }
}

fn is_valid_lines(lines: &Value) -> bool {
    is_integer(lines.get("begin")) && is_integer(lines.get("end"))
}

fn is_valid_positions(positions: &Value) -> bool {
    match (positions.get("begin"), positions.get("end")) {
        (Some(begin), Some(end)) => is_valid_position(begin) && is_valid_position(end),
        _ => false,
    }
}

fn is_valid_position(position: &Value) -> bool {
    (is_integer(position.get("line")) && is_integer(position.get("column")))
        || is_integer(position.get("offset"))
}

fn is_integer(value: Option<&Value>) -> bool {
    value.map(|v| v.is_u64() || v.is_i64()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lines_location() {
        assert!(is_valid_location(
            &json!({ "path": "a.rb", "lines": { "begin": 1, "end": 2 } })
        ));
        assert!(!is_valid_location(
            &json!({ "path": "a.rb", "lines": { "begin": 1 } })
        ));
        assert!(!is_valid_location(
            &json!({ "path": "a.rb", "lines": { "begin": "1", "end": 2 } })
        ));
    }

    #[test]
    fn test_positions_location() {
        assert!(is_valid_location(&json!({
            "path": "a.rb",
            "positions": { "begin": { "line": 1, "column": 2 }, "end": { "offset": 40 } }
        })));
        assert!(!is_valid_location(&json!({
            "path": "a.rb",
            "positions": { "begin": { "line": 1 }, "end": { "offset": 40 } }
        })));
    }

    #[test]
    fn test_location_requires_path_and_range() {
        assert!(!is_valid_location(&json!({ "lines": { "begin": 1, "end": 2 } })));
        assert!(!is_valid_location(&json!({ "path": "a.rb" })));
    }
}
