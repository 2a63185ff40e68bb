//! 16-bit name checksums
//!
//! Tool identifiers and introspection keys are derived from configuration
//! names with a Fletcher-style checksum so they fit in a `u16`.

/// Compute the 16-bit checksum of a name.
pub const fn checksum(name: &str) -> u16 {
    let bytes = name.as_bytes();
    let mut sum1: u16 = 0;
    let mut sum2: u16 = 0;
    let mut i = 0;
    while i < bytes.len() {
        sum1 = (sum1 + bytes[i] as u16) % 255;
        sum2 = (sum2 + sum1) % 255;
        i += 1;
    }
    (sum2 << 8) | sum1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name() {
        assert_eq!(checksum(""), 0);
    }

    #[test]
    fn test_single_byte() {
        // 'a' = 97: sum1 = 97, sum2 = 97
        assert_eq!(checksum("a"), (97 << 8) | 97);
    }

    #[test]
    fn test_stable_across_calls() {
        assert_eq!(checksum("hotend"), checksum("hotend"));
    }

    #[test]
    fn test_distinguishes_names() {
        assert_ne!(checksum("hotend"), checksum("hotend2"));
        assert_ne!(checksum("tool_manager"), checksum("get_active_tool"));
    }

    #[test]
    fn test_usable_in_const() {
        const KEY: u16 = checksum("tool_manager");
        assert_eq!(KEY, checksum("tool_manager"));
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(checksum("ab"), checksum("ba"));
    }
}
