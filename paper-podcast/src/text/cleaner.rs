//! Normalizes extracted PDF text before it is read aloud.

/// Typographic characters PDF text layers are full of, and plain replacements.
const SPEECH_REPLACEMENTS: &[(char, &str)] = &[
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201c}', "\""),
    ('\u{201d}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
    ('\u{00a0}', " "),
    ('\u{200b}', ""),
    ('\u{200c}', ""),
    ('\u{200d}', ""),
    ('\u{feff}', ""),
    ('\u{00ad}', ""), // soft hyphen
    ('\u{fb00}', "ff"),
    ('\u{fb01}', "fi"),
    ('\u{fb02}', "fl"),
    ('\u{fb03}', "ffi"),
    ('\u{fb04}', "ffl"),
];

/// Clean text for speech synthesis.
///
/// - Replaces typographic quotes, dashes, ligatures and invisible characters
/// - Re-joins words hyphenated across a line break ("synth-\nesis")
/// - Drops control characters
/// - Collapses all whitespace, including newlines, into single spaces
pub fn clean_for_speech(text: &str) -> String {
    let mut replaced = String::with_capacity(text.len());

    for c in text.chars() {
        if let Some((_, r)) = SPEECH_REPLACEMENTS.iter().find(|(ch, _)| *ch == c) {
            replaced.push_str(r);
        } else if c == '\n' || c == '\t' || c == '\r' || !c.is_control() {
            replaced.push(c);
        }
    }

    let joined = join_hyphenated_lines(&replaced);
    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove "-\n" line-end hyphenation between two letters.
fn join_hyphenated_lines(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] == '-' && i > 0 && chars[i - 1].is_alphabetic() {
            let mut j = i + 1;
            while j < chars.len() && (chars[j] == '\r' || chars[j] == ' ') {
                j += 1;
            }
            if j < chars.len() && chars[j] == '\n' {
                let mut k = j + 1;
                while k < chars.len() && chars[k].is_whitespace() {
                    k += 1;
                }
                if k < chars.len() && chars[k].is_lowercase() {
                    i = k;
                    continue;
                }
            }
        }
        result.push(chars[i]);
        i += 1;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_smart_quotes() {
        let text = "\u{201c}Hello,\u{201d} said the reviewer. \u{2018}It\u{2019}s novel.\u{2019}";
        assert_eq!(
            clean_for_speech(text),
            "\"Hello,\" said the reviewer. 'It's novel.'"
        );
    }

    #[test]
    fn test_clean_ligatures() {
        assert_eq!(clean_for_speech("signi\u{fb01}cant e\u{fb00}ect"), "significant effect");
    }

    #[test]
    fn test_join_hyphenated_line_break() {
        assert_eq!(
            clean_for_speech("speech synth-\nesis works"),
            "speech synthesis works"
        );
    }

    #[test]
    fn test_keeps_real_hyphens() {
        assert_eq!(clean_for_speech("state-of-the-art"), "state-of-the-art");
        assert_eq!(clean_for_speech("Section A-\nB"), "Section A- B");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(clean_for_speech("Line 1\n\n\nLine   2\t end"), "Line 1 Line 2 end");
    }

    #[test]
    fn test_drops_control_chars() {
        assert_eq!(clean_for_speech("Hello\x00World\x07"), "HelloWorld");
        assert_eq!(clean_for_speech("Hello\u{200b}World\u{feff}"), "HelloWorld");
    }

    #[test]
    fn test_empty() {
        assert_eq!(clean_for_speech(""), "");
        assert_eq!(clean_for_speech(" \n "), "");
    }
}
