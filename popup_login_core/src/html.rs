use std::borrow::Cow;

/// Turn entities like `&lt;` or `&#39;` into the characters they stand for.
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// Escape text so it can be embedded in HTML (including inside quoted
/// attributes) without being interpreted as markup.
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

/// Remove anything that looks like a tag (`<b>`, `</b>`, `<!-- -->`, …). A
/// `<` that can't start a tag (for example in `a < b`) is kept as text, the
/// same way a browser would parse it. An unterminated tag swallows the rest of
/// the input.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        let starts_tag = c == '<'
            && chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?'));

        if starts_tag {
            for skipped in chars.by_ref() {
                if skipped == '>' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }

    out
}

/// What a browser would show as the text of this HTML fragment: tags are
/// dropped and entities are decoded. The result is plain text and must be
/// escaped again before going back into markup.
pub fn text_content(fragment: &str) -> String {
    decode_entities(&strip_tags(fragment)).into_owned()
}

/// Drop ASCII and Unicode control characters (NUL, newlines, tabs, …).
pub fn strip_control(text: &str) -> String {
    text.chars().filter(|c| !c.is_control()).collect()
}
