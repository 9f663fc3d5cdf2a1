/// Longest card title the pipeline will send.
pub const MAX_TITLE_CHARS: usize = 120;
const FALLBACK_TITLE_CHARS: usize = 60;

/// Card title for the paragraph at 1-based `index`.
///
/// The title runs up to and including the earliest sentence terminator
/// (`.`, `!` or `?`). Without one it is the first 60 characters of the first
/// line. Whitespace runs collapse to single spaces, titles over 120
/// characters become 117 plus `...`, and an empty result becomes `Note N`.
pub fn derive_title(text: &str, index: usize) -> String {
    let terminator = ['.', '!', '?']
        .iter()
        .filter_map(|c| text.find(*c))
        .min();

    let raw: String = match terminator {
        Some(end) => text[..=end].to_string(),
        None => text
            .lines()
            .next()
            .unwrap_or_default()
            .chars()
            .take(FALLBACK_TITLE_CHARS)
            .collect(),
    };

    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let title = if collapsed.chars().count() > MAX_TITLE_CHARS {
        let head: String = collapsed.chars().take(MAX_TITLE_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        collapsed
    };

    if title.is_empty() {
        format!("Note {}", index)
    } else {
        title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_at_earliest_terminator() {
        assert_eq!(derive_title("Wait! Is it. Really?", 1), "Wait!");
        assert_eq!(derive_title("Really? Yes. Done!", 1), "Really?");
        assert_eq!(derive_title("Hello world. More text", 1), "Hello world.");
    }

    #[test]
    fn falls_back_to_first_line() {
        assert_eq!(derive_title("no terminator here\nsecond line", 1), "no terminator here");
        let long = "a".repeat(80);
        assert_eq!(derive_title(&long, 1).chars().count(), 60);
    }

    #[test]
    fn terminator_on_a_later_line_spans_lines() {
        assert_eq!(derive_title("first line\nsecond line.", 1), "first line second line.");
    }

    #[test]
    fn long_titles_are_truncated() {
        let text = format!("{}.", "word ".repeat(40));
        let title = derive_title(&text, 1);
        assert_eq!(title.chars().count(), MAX_TITLE_CHARS);
        assert!(title.ends_with("..."));
    }

    #[test]
    fn empty_titles_become_numbered_notes() {
        assert_eq!(derive_title("   ", 3), "Note 3");
        assert_eq!(derive_title("", 1), "Note 1");
    }
}
