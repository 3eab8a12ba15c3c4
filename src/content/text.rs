/// Characters scraped markup uses as invisible padding on top of regular
/// whitespace: braille blank, zero-width space, BOM, NUL.
const INVISIBLE_PADDING: [char; 4] = ['\u{2800}', '\u{200B}', '\u{FEFF}', '\0'];

fn is_padding(c: char) -> bool {
    c.is_whitespace() || INVISIBLE_PADDING.contains(&c)
}

/// True when nothing but whitespace, no-break spaces or zero-width padding remains.
pub fn is_blank(text: &str) -> bool {
    text.trim_matches(is_padding).is_empty()
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn normalize_spaces(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_variants() {
        assert!(is_blank(""));
        assert!(is_blank(" \t\n\r"));
        assert!(is_blank("\u{00A0}\u{2800}\u{200B}"));
        assert!(!is_blank(" a "));
    }

    #[test]
    fn test_normalize_spaces() {
        assert_eq!(normalize_spaces("  one\n\ttwo   three "), "one two three");
        assert_eq!(normalize_spaces("non\u{00A0}breaking"), "non breaking");
        assert_eq!(normalize_spaces(""), "");
    }
}
