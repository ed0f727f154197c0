//! Layer name to archive path segment

/// Characters that never appear in an archive path segment
pub const RESERVED_CHARS: &[char] = &['/', '[', ']', '\\', '<', '>', '?', '*', '^', '"', '|', ' '];

/// Replace every reserved character with `_`.
///
/// Distinct names may map to the same segment; callers do not dedupe.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_reserved() {
        assert_eq!(sanitize_name("Line Art"), "Line_Art");
        assert_eq!(sanitize_name(r#"a/b\c[d]<e>?*^"|"#), "a_b_c_d__e______");
        assert_eq!(sanitize_name("Ébauche.v2-final"), "Ébauche.v2-final");
        assert_eq!(sanitize_name(""), "");
    }

    proptest! {
        #[test]
        fn sanitized_names_have_no_reserved_chars(name in any::<String>()) {
            let sanitized = sanitize_name(&name);
            prop_assert!(!sanitized.contains(RESERVED_CHARS));
            prop_assert_eq!(sanitized.chars().count(), name.chars().count());
        }

        #[test]
        fn safe_names_pass_through(name in "[a-zA-Z0-9._-]{0,24}") {
            prop_assert_eq!(sanitize_name(&name), name);
        }
    }
}
