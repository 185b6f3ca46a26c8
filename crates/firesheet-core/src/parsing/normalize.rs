/// Title-case a keyword: the first letter of every word is upper-cased,
/// the rest lower-cased. Hyphens and other non-letters start a new word,
/// so "self-diagnostic" becomes "Self-Diagnostic".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Collapse runs of whitespace inside a table cell to single spaces.
pub fn clean_cell(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
