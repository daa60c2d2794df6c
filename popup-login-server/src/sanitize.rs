//! Cleaning up submitted credentials before they reach the identity
//! provider. Case is always preserved.

use popup_login_core::html;

/// Usernames lose markup and control characters, and have their whitespace
/// trimmed and collapsed.
pub fn username(raw: &str) -> String {
    let cleaned = html::strip_control(&html::strip_tags(raw));

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Passwords only lose control characters. Anything else might be part of
/// the password.
pub fn password(raw: &str) -> String {
    html::strip_control(raw)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn username_drops_markup_and_extra_space() {
        assert_eq!(username("  <b>Alice</b>\u{0}  Smith "), "Alice Smith");
    }

    #[test]
    fn username_keeps_case() {
        assert_eq!(username("MixedCase"), "MixedCase");
    }

    #[test]
    fn password_keeps_spaces_and_brackets() {
        assert_eq!(password(" <p4ss> word "), " <p4ss> word ");
    }

    #[test]
    fn password_drops_control_characters() {
        assert_eq!(password("pass\u{0}word\n"), "password");
    }
}
