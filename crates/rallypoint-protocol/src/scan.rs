//! Substring scanner for matchmaking notifications.
//!
//! The receive path sees every frame, so classification has to be cheap. A
//! matchmaking notification is recognised by a marker and one string field,
//! both found by plain substring search rather than a JSON parse.

/// Marker that flags a frame as a matchmaking notification. Matched
/// case-insensitively anywhere in the frame.
pub const MATCH_FOUND_MARKER: &str = "match_found";

/// The quoted key whose string value is the opponent identifier, lowercased.
const OPPONENT_KEY: &str = "\"opponentid\"";

/// Extracts the opponent id from a matchmaking notification.
///
/// Returns `Some(id)` only when the frame contains [`MATCH_FOUND_MARKER`] and
/// then, in order: the key `"opponentId"` (any case), a `:` after it, a `"`
/// after the colon, and a closing `"`. The id is the text between the two
/// quotes, taken verbatim (escapes are not interpreted).
///
/// Returns `None` if any of those tokens is missing; callers then treat the
/// frame as chat.
///
/// ```
/// use rallypoint_protocol::scan_match_found;
///
/// let frame = r#"{"type":"match_found","opponentId":"Bob"}"#;
/// assert_eq!(scan_match_found(frame), Some("Bob"));
/// assert_eq!(scan_match_found(r#"{"type":"match_found"}"#), None);
/// ```
pub fn scan_match_found(text: &str) -> Option<&str> {
    if text.trim().is_empty() {
        return None;
    }

    // ASCII lowercasing keeps byte offsets identical, so indices found in
    // `lower` are valid (and on char boundaries) in `text`.
    let lower = text.to_ascii_lowercase();
    if !lower.contains(MATCH_FOUND_MARKER) {
        return None;
    }

    let Some(key) = lower.find(OPPONENT_KEY) else {
        tracing::trace!("match_found marker without opponentId key");
        return None;
    };
    let after_key = key + OPPONENT_KEY.len();
    let colon = after_key + lower[after_key..].find(':')?;
    let open = colon + lower[colon..].find('"')?;
    let close = open + 1 + lower[open + 1..].find('"')?;

    Some(&text[open + 1..close])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_notification() {
        let frame = r#"{"type":"match_found","opponentId":"Bob"}"#;
        assert_eq!(scan_match_found(frame), Some("Bob"));
    }

    #[test]
    fn test_marker_and_key_are_case_insensitive() {
        let frame = r#"{"TYPE":"MATCH_FOUND","OPPONENTID":"Carol"}"#;
        assert_eq!(scan_match_found(frame), Some("Carol"));
    }

    #[test]
    fn test_id_keeps_original_case() {
        let frame = r#"{"type":"match_found","opponentId":"MiXeD-42"}"#;
        assert_eq!(scan_match_found(frame), Some("MiXeD-42"));
    }

    #[test]
    fn test_whitespace_around_colon_is_tolerated() {
        let frame = "{\"type\": \"match_found\", \"opponentId\" :  \"dave\" }";
        assert_eq!(scan_match_found(frame), Some("dave"));
    }

    #[test]
    fn test_key_before_marker_still_matches() {
        let frame = r#"{"opponentId":"erin","type":"match_found"}"#;
        assert_eq!(scan_match_found(frame), Some("erin"));
    }

    #[test]
    fn test_empty_id_is_allowed() {
        let frame = r#"{"type":"match_found","opponentId":""}"#;
        assert_eq!(scan_match_found(frame), Some(""));
    }

    #[test]
    fn test_no_marker() {
        assert_eq!(scan_match_found(r#"{"opponentId":"Bob"}"#), None);
        assert_eq!(scan_match_found("hello there"), None);
    }

    #[test]
    fn test_blank_frame() {
        assert_eq!(scan_match_found(""), None);
        assert_eq!(scan_match_found("   \n"), None);
    }

    #[test]
    fn test_marker_without_key() {
        assert_eq!(scan_match_found(r#"{"type":"match_found"}"#), None);
    }

    #[test]
    fn test_unquoted_key_is_not_recognised() {
        assert_eq!(scan_match_found("match_found opponentId: \"x\""), None);
    }

    #[test]
    fn test_key_without_colon() {
        assert_eq!(scan_match_found(r#"match_found "opponentId" "Bob""#), None);
    }

    #[test]
    fn test_non_string_value_has_no_opening_quote() {
        assert_eq!(scan_match_found(r#"{"type":"match_found","opponentId":42}"#), None);
    }

    #[test]
    fn test_unterminated_value() {
        assert_eq!(scan_match_found(r#"{"type":"match_found","opponentId":"Bob"#), None);
    }

    #[test]
    fn test_numeric_value_borrows_next_quoted_string() {
        // The scanner is positional: after the colon it takes the next quoted
        // run, wherever it is.
        let frame = r#"{"type":"match_found","opponentId":42,"x":"y"}"#;
        assert_eq!(scan_match_found(frame), Some("x"));
    }
}
