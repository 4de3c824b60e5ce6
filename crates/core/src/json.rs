//! Locating a JSON object inside free-form inference output.
//!
//! Model replies wrap the requested object in prose, markdown fences, or
//! both. A greedy `\{[\s\S]*\}` match breaks as soon as trailing prose
//! contains a stray brace, so this scans for the first *balanced* span:
//! track nesting depth from the first `{`, skip string literals and
//! escapes, and stop at the first return to depth zero.

/// Return the first balanced `{...}` span in `text`, if any.
///
/// Braces inside JSON string literals do not affect the depth count. If the
/// first `{` never closes, returns `None`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_object() {
        assert_eq!(extract_json_object(r#"{"a": 1}"#), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_surrounding_prose() {
        let text = r#"Sure! Here is the JSON you asked for: {"a": 1} Hope that helps."#;
        assert_eq!(extract_json_object(text), Some(r#"{"a": 1}"#));
    }

    #[test]
    fn test_fenced_code_block() {
        let text = "Here you go:\n```json\n{\"title\": \"Lot A\"}\n```\n";
        assert_eq!(extract_json_object(text), Some(r#"{"title": "Lot A"}"#));
    }

    #[test]
    fn test_nested_objects_stop_at_depth_zero() {
        let text = r#"reply: {"outer": {"inner": [1, 2]}} and then {"another": 2}"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"outer": {"inner": [1, 2]}}"#)
        );
    }

    #[test]
    fn test_braces_inside_strings_ignored() {
        let text = r#"{"note": "uses { and } freely", "n": 1} trailing }"#;
        assert_eq!(
            extract_json_object(text),
            Some(r#"{"note": "uses { and } freely", "n": 1}"#)
        );
    }

    #[test]
    fn test_escaped_quote_inside_string() {
        let text = r#"{"q": "she said \"hi\" {"} done"#;
        assert_eq!(extract_json_object(text), Some(r#"{"q": "she said \"hi\" {"}"#));
    }

    #[test]
    fn test_unbalanced_returns_none() {
        assert_eq!(extract_json_object(r#"{"a": 1"#), None);
        assert_eq!(extract_json_object("no json here"), None);
        assert_eq!(extract_json_object(""), None);
    }

    #[test]
    fn test_multibyte_text_around_object() {
        let text = "物件情報です： {\"price\": \"1,200万円\"} 以上";
        assert_eq!(extract_json_object(text), Some("{\"price\": \"1,200万円\"}"));
    }
}
