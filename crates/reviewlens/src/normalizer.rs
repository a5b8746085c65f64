//! Review text cleanup applied before a record is sent for classification.

use unicode_normalization::UnicodeNormalization;

/// Maximum length of normalized text, in characters.
pub const MAX_TEXT_CHARS: usize = 600;

/// Punctuation whose repeated runs ("!!!", "...") collapse to one character.
const COLLAPSIBLE_PUNCTUATION: [char; 4] = ['!', '?', '.', ','];

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Normalizes free text for submission to the classification service.
///
/// Blank input yields an empty string. Otherwise the text is NFC-normalized,
/// whitespace runs become single spaces, repeated punctuation collapses, each
/// sentence is capitalized and the result is cut to [`MAX_TEXT_CHARS`] at a
/// word boundary.
pub fn normalize(text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }

    let composed: String = text.nfc().collect();
    let collapsed = collapse_whitespace(&composed);
    let collapsed = collapse_repeated_punctuation(&collapsed);
    let capitalized = capitalize_sentences(&collapsed);
    truncate_at_word(&capitalized, MAX_TEXT_CHARS)
}

/// Like [`normalize`], treating a missing cell as empty text.
pub fn normalize_cell(cell: Option<&str>) -> String {
    cell.map(normalize).unwrap_or_default()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collapse_repeated_punctuation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<char> = None;
    for c in text.chars() {
        if previous == Some(c) && COLLAPSIBLE_PUNCTUATION.contains(&c) {
            continue;
        }
        out.push(c);
        previous = Some(c);
    }
    out
}

/// Expects single-space separated text.
fn capitalize_sentences(text: &str) -> String {
    let mut sentences: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in text.split(' ') {
        current.push(word);
        if word.ends_with(SENTENCE_TERMINATORS) {
            sentences.push(capitalize_first(&current.join(" ")));
            current.clear();
        }
    }
    if !current.is_empty() {
        sentences.push(capitalize_first(&current.join(" ")));
    }

    sentences.join(" ")
}

fn capitalize_first(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn truncate_at_word(text: &str, limit: usize) -> String {
    let Some((cut, _)) = text.char_indices().nth(limit) else {
        return text.to_string();
    };

    let head = &text[..cut];
    if text[cut..].starts_with(' ') {
        return head.trim_end().to_string();
    }
    match head.rfind(' ') {
        Some(space) => head[..space].trim_end().to_string(),
        None => head.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_input_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("  \n\t "), "");
        assert_eq!(normalize_cell(None), "");
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(normalize("  great\n\n  fit \t overall "), "Great fit overall");
    }

    #[test]
    fn test_repeated_punctuation_collapses() {
        assert_eq!(normalize("love it!!! so soft,, really...."), "Love it! So soft, really.");
        assert_eq!(normalize("why??"), "Why?");
    }

    #[test]
    fn test_mixed_punctuation_is_kept() {
        assert_eq!(normalize("really?!"), "Really?!");
    }

    #[test]
    fn test_sentences_are_capitalized() {
        assert_eq!(
            normalize("runs small. order a size up! would buy again? yes"),
            "Runs small. Order a size up! Would buy again? Yes"
        );
    }

    #[test]
    fn test_non_letter_sentence_start_unchanged() {
        assert_eq!(normalize("5 stars. \"perfect\" dress"), "5 stars. \"perfect\" dress");
    }

    #[test]
    fn test_unicode_is_composed() {
        // "e" followed by a combining acute accent becomes a single "é".
        let decomposed = "caf\u{0065}\u{0301} dress";
        let normalized = normalize(decomposed);
        assert_eq!(normalized, "Caf\u{00e9} dress");
        assert_eq!(normalized.chars().count(), 10);
    }

    #[test]
    fn test_truncates_at_word_boundary() {
        let text = "word ".repeat(200);
        let normalized = normalize(&text);
        assert!(normalized.chars().count() <= MAX_TEXT_CHARS);
        assert!(normalized.ends_with("Word") || normalized.ends_with("word"));
        assert!(!normalized.ends_with(' '));
    }

    #[test]
    fn test_truncation_never_splits_a_word() {
        let text = format!("{} tail", "abcdefghij ".repeat(60));
        let normalized = normalize(&text);
        assert!(normalized.chars().count() <= MAX_TEXT_CHARS);
        for word in normalized.split(' ') {
            assert!(word == "abcdefghij" || word == "Abcdefghij", "split word: {word}");
        }
    }

    #[test]
    fn test_single_long_word_cut_at_limit() {
        let text = "x".repeat(700);
        let normalized = normalize(&text);
        assert_eq!(normalized.chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_exact_limit_is_untouched() {
        let text = "y".repeat(MAX_TEXT_CHARS);
        assert_eq!(normalize(&text).chars().count(), MAX_TEXT_CHARS);
    }

    #[test]
    fn test_length_bound_holds_for_multibyte_text() {
        let inputs = [
            "é".repeat(900),
            "naïve résumé ".repeat(80),
            "日本語のレビュー ".repeat(120),
            "ok. ".repeat(400),
        ];
        for input in &inputs {
            let normalized = normalize(input);
            assert!(normalized.chars().count() <= MAX_TEXT_CHARS);
        }
    }
}
