//! The per-field directive mini-language.
//!
//! A directive is a comma-separated list of tokens attached to one field:
//! `size=<uint>` (explicit byte width of a scalar, or of each element of a
//! sequence or fixed string), `num=<uint>` (repeat count of a sequence),
//! `bo=le|be` (byte order override), or the bare exclusion marker `-`
//! (the field contributes nothing to the wire format). Unrecognized and
//! malformed tokens are ignored, so directive strings stay
//! forward-compatible.

use crate::bytes::ByteOrder;

/// Parsed form of one field's directive string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Directive {
    /// Explicit byte width of a scalar, or of each element of a sequence.
    pub size: Option<usize>,
    /// Explicit repeat count of a sequence field.
    pub num: Option<usize>,
    /// Byte order override for this field.
    pub byte_order: Option<ByteOrder>,
    /// The field is excluded from the wire format.
    pub skip: bool,
}

impl Directive {
    /// Parses a directive string. The empty string parses to the default
    /// (no overrides). Later tokens win over earlier duplicates.
    pub fn parse(raw: &str) -> Self {
        let mut directive = Directive::default();

        for token in raw.split(',') {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            if token == "-" {
                directive.skip = true;
                continue;
            }
            match token.split_once('=') {
                Some(("size", v)) => {
                    if let Some(n) = parse_uint(token, v) {
                        directive.size = Some(n);
                    }
                }
                Some(("num", v)) => {
                    if let Some(n) = parse_uint(token, v) {
                        directive.num = Some(n);
                    }
                }
                Some(("bo", "le")) => directive.byte_order = Some(ByteOrder::Le),
                Some(("bo", "be")) => directive.byte_order = Some(ByteOrder::Be),
                _ => tracing::debug!(token, "ignoring unrecognized directive token"),
            }
        }

        directive
    }
}

fn parse_uint(token: &str, value: &str) -> Option<usize> {
    match value.parse() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::debug!(token, "ignoring malformed directive value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        assert_eq!(Directive::parse(""), Directive::default());
    }

    #[test]
    fn test_parse_all_options() {
        let d = Directive::parse("size=4,num=2,bo=be");
        assert_eq!(d.size, Some(4));
        assert_eq!(d.num, Some(2));
        assert_eq!(d.byte_order, Some(ByteOrder::Be));
        assert!(!d.skip);
    }

    #[test]
    fn test_parse_exclusion_marker() {
        assert!(Directive::parse("-").skip);
    }

    #[test]
    fn test_parse_byte_orders() {
        assert_eq!(Directive::parse("bo=le").byte_order, Some(ByteOrder::Le));
        assert_eq!(Directive::parse("bo=be").byte_order, Some(ByteOrder::Be));
        assert_eq!(Directive::parse("bo=pdp").byte_order, None);
    }

    #[test]
    fn test_unrecognized_tokens_ignored() {
        let d = Directive::parse("size=2,future_option=yes,blip");
        assert_eq!(d.size, Some(2));
        assert_eq!(d.num, None);
    }

    #[test]
    fn test_malformed_value_ignored() {
        let d = Directive::parse("size=abc,num=3");
        assert_eq!(d.size, None);
        assert_eq!(d.num, Some(3));
    }

    #[test]
    fn test_whitespace_tolerated() {
        let d = Directive::parse(" size=8 , bo=be ");
        assert_eq!(d.size, Some(8));
        assert_eq!(d.byte_order, Some(ByteOrder::Be));
    }

    #[test]
    fn test_later_duplicate_wins() {
        assert_eq!(Directive::parse("size=2,size=4").size, Some(4));
    }
}
