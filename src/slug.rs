// SPDX-License-Identifier: PMPL-1.0-or-later

//! Slug generation for category fragments.
//!
//! A slug is what goes after `#` in the address bar. Slugs are built from
//! category keys (not labels), so the same fragment resolves in every
//! language.

/// Turn arbitrary text into a URL fragment identifier.
///
/// Lowercases, drops everything outside `[a-z0-9]`, whitespace and `-`,
/// trims, turns each whitespace run into a single `-` and collapses repeated
/// hyphens. Total and idempotent; empty input gives an empty slug.
///
/// # Examples
///
/// ```
/// use rules_portal::slug::slugify;
///
/// assert_eq!(slugify("Combat & Action Rules"), "combat-action-rules");
/// assert_eq!(slugify("  Safe   Zones "), "safe-zones");
/// assert_eq!(slugify("قوانين عامة"), "");
/// ```
pub fn slugify(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(kept.len());
    let mut in_space = false;
    for c in kept.trim().chars() {
        if c.is_whitespace() {
            in_space = true;
            continue;
        }
        if in_space {
            push_hyphen(&mut slug);
            in_space = false;
        }
        if c == '-' {
            push_hyphen(&mut slug);
        } else {
            slug.push(c);
        }
    }
    slug
}

fn push_hyphen(slug: &mut String) {
    if !slug.ends_with('-') {
        slug.push('-');
    }
}

/// Whether `key` is addressed by the (already lower-cased) fragment `needle`.
pub fn matches_key(key: &str, needle: &str) -> bool {
    !needle.is_empty() && slugify(key) == needle
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_simple() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("core"), "core");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("Robbery / Heist Rules"), "robbery-heist-rules");
        assert_eq!(slugify("Hello, World!"), "hello-world");
    }

    #[test]
    fn test_slugify_collapses_hyphens() {
        assert_eq!(slugify("hello--world"), "hello-world");
        assert_eq!(slugify("a - b"), "a-b");
    }

    #[test]
    fn test_slugify_keeps_edge_hyphens_after_trim() {
        // Only whitespace is trimmed; a literal leading hyphen survives.
        assert_eq!(slugify("-hello-"), "-hello-");
    }

    #[test]
    fn test_slugify_underscores_are_dropped() {
        assert_eq!(slugify("hello_world"), "helloworld");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_slugify_non_ascii() {
        assert_eq!(slugify("Café Rules"), "caf-rules");
        assert_eq!(slugify("قوانين الموت (Death RP)"), "death-rp");
    }

    #[test]
    fn test_matches_key() {
        assert!(matches_key("combat", "combat"));
        assert!(!matches_key("combat", "Combat"));
        assert!(!matches_key("!!!", ""));
    }

    proptest! {
        #[test]
        fn slugify_is_idempotent(input in "\\PC*") {
            let once = slugify(&input);
            prop_assert_eq!(slugify(&once), once);
        }

        #[test]
        fn slugify_output_is_url_safe(input in "\\PC*") {
            let slug = slugify(&input);
            prop_assert!(slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
