//! Splits text into segments short enough for a single speech request.

/// Punctuation a segment may end on, in order of preference.
const BREAK_CHARS: &[char] = &['.', '!', '?', ';', ':', ','];

/// Split `text` into segments of at most `max_chars` characters.
///
/// Prefers breaking after punctuation, then between words, and only cuts a
/// word apart when it alone exceeds the limit. Segments are trimmed and never
/// empty.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut segments = Vec::new();
    let mut current = String::new();

    for clause in split_after_punctuation(text) {
        if char_len(&clause) > max_chars {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            segments.extend(split_on_words(&clause, max_chars));
        } else if current.is_empty() {
            current = clause;
        } else if char_len(&current) + 1 + char_len(&clause) <= max_chars {
            current.push(' ');
            current.push_str(&clause);
        } else {
            segments.push(std::mem::replace(&mut current, clause));
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Break text after each punctuation mark that is followed by whitespace.
fn split_after_punctuation(text: &str) -> Vec<String> {
    let mut clauses = Vec::new();
    let mut current = String::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        current.push(c);
        let at_break = BREAK_CHARS.contains(&c)
            && chars.peek().map_or(true, |next| next.is_whitespace());
        if at_break {
            let clause = current.trim();
            if !clause.is_empty() {
                clauses.push(clause.to_string());
            }
            current.clear();
        }
    }

    let rest = current.trim();
    if !rest.is_empty() {
        clauses.push(rest.to_string());
    }

    clauses
}

/// Pack words into segments, hard-splitting words longer than the limit.
fn split_on_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if char_len(word) > max_chars {
            if !current.is_empty() {
                segments.push(std::mem::take(&mut current));
            }
            segments.extend(hard_split(word, max_chars));
        } else if current.is_empty() {
            current = word.to_string();
        } else if char_len(&current) + 1 + char_len(word) <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            segments.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        segments.push(current);
    }

    segments
}

/// Cut text at exact character positions (last resort).
fn hard_split(text: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect())
        .collect()
}
