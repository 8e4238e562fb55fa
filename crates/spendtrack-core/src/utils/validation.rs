/// Check that a string has the shape of an email address.
///
/// Accepts `local@domain.tld`: exactly one `@`, a non-empty local part, and a
/// domain containing a dot with at least one character on each side of it.
/// Whitespace anywhere rejects the candidate, using the ECMAScript `\s`
/// set rather than `char::is_whitespace` (they differ on U+0085 and U+FEFF).
pub fn validate_email(candidate: &str) -> bool {
    if candidate.chars().any(is_pattern_whitespace) {
        return false;
    }

    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // A dot that is neither the first nor the last character of the domain
    let len = domain.len();
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < len)
}

/// Members of the regex `\s` class: ASCII whitespace, the Unicode space
/// separators, line/paragraph separators and the byte order mark.
fn is_pattern_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\u{0B}' | '\u{0C}' | '\r' | ' '
            | '\u{A0}'
            | '\u{1680}'
            | '\u{2000}'..='\u{200A}'
            | '\u{2028}'
            | '\u{2029}'
            | '\u{202F}'
            | '\u{205F}'
            | '\u{3000}'
            | '\u{FEFF}'
    )
}
