/// Split raw document text into cleaned paragraphs, in source order.
///
/// Blocks are separated by one or more blank (whitespace-only) lines. Each
/// block is trimmed. A block made only of `#` and whitespace is discarded. A
/// block starting with `#` loses its leading run of `#`; when body lines
/// follow the heading in the same block, the heading line goes too, so
/// `# Heading\nBody` keeps only `Body` while a lone `# Chapter` keeps
/// `Chapter`. Everything else is kept with its internal formatting intact.
pub fn split_paragraphs(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n");

    let mut paragraphs = Vec::new();
    let mut block: Vec<&str> = Vec::new();

    for line in normalized.split('\n') {
        if line.trim().is_empty() {
            flush_block(&mut block, &mut paragraphs);
        } else {
            block.push(line);
        }
    }
    flush_block(&mut block, &mut paragraphs);

    paragraphs
}

fn flush_block(block: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if block.is_empty() {
        return;
    }
    let joined = block.join("\n");
    block.clear();

    if let Some(cleaned) = clean_block(&joined) {
        paragraphs.push(cleaned);
    }
}

fn clean_block(block: &str) -> Option<String> {
    let trimmed = block.trim();
    if trimmed.replace('#', "").trim().is_empty() {
        return None;
    }

    let body = if trimmed.starts_with('#') {
        strip_heading(trimmed)
    } else {
        trimmed
    };

    let body = body.trim();
    if body.is_empty() {
        None
    } else {
        Some(body.to_string())
    }
}

/// Remove the heading at the top of a block.
///
/// Heading lines followed by more lines in the same block are dropped. A
/// heading left standing alone keeps its text without the `#` run.
fn strip_heading(block: &str) -> &str {
    let mut rest = block;
    while rest.starts_with('#') {
        match rest.split_once('\n') {
            Some((_, remainder)) if !remainder.trim().is_empty() => rest = remainder.trim_start(),
            _ => break,
        }
    }
    rest.trim_start_matches('#')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lone_heading_keeps_its_text() {
        assert_eq!(strip_heading("# Chapter One"), " Chapter One");
        assert_eq!(strip_heading("##Heading"), "Heading");
    }

    #[test]
    fn heading_above_body_is_dropped() {
        assert_eq!(strip_heading("# Heading\nBody text here."), "Body text here.");
        assert_eq!(strip_heading("##Heading\nBody"), "Body");
    }

    #[test]
    fn stacked_headings_leave_the_body() {
        assert_eq!(strip_heading("# A\n## B\nBody\n#tag"), "Body\n#tag");
        assert_eq!(strip_heading("# A\n## B"), " B");
    }
}
