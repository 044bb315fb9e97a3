//! Opaque pagination cursors.
//!
//! A cursor is the standard base64 encoding of the decimal digits of a
//! non-negative start offset, e.g. offset `10` is `"MTA="`.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{InsightError, Result};

pub fn encode_cursor(offset: usize) -> String {
    STANDARD.encode(offset.to_string())
}

/// Decodes a cursor into its start offset.
///
/// # Errors
///
/// [`InsightError::MalformedCursor`] if the cursor is not valid base64, not
/// UTF-8, or not a plain run of decimal digits that fits in `usize`.
pub fn decode_cursor(cursor: &str) -> Result<usize> {
    let malformed = || InsightError::MalformedCursor {
        cursor: cursor.to_string(),
    };
    let bytes = STANDARD.decode(cursor).map_err(|_| malformed())?;
    let digits = String::from_utf8(bytes).map_err(|_| malformed())?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    digits.parse::<usize>().map_err(|_| malformed())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encodings() {
        assert_eq!(encode_cursor(0), "MA==");
        assert_eq!(encode_cursor(1), "MQ==");
        assert_eq!(encode_cursor(10), "MTA=");
        assert_eq!(decode_cursor("MTA=").unwrap(), 10);
    }

    #[test]
    fn test_invalid_cursor_is_malformed() {
        let err = decode_cursor("invalid_cursor").unwrap_err();
        assert!(matches!(err, InsightError::MalformedCursor { ref cursor } if cursor == "invalid_cursor"));
    }

    #[test]
    fn test_non_digit_payload_is_malformed() {
        // "abc" and "-1" are valid base64 payloads but not offsets.
        assert!(decode_cursor(&STANDARD.encode("abc")).is_err());
        assert!(decode_cursor(&STANDARD.encode("-1")).is_err());
        assert!(decode_cursor(&STANDARD.encode("+1")).is_err());
        assert!(decode_cursor(&STANDARD.encode("")).is_err());
        assert!(decode_cursor("").is_err());
    }

    #[test]
    fn test_overflow_is_malformed() {
        let huge = STANDARD.encode("99999999999999999999999999999");
        assert!(decode_cursor(&huge).is_err());
    }
}
