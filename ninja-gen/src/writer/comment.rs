/// Split comment text into the lines that follow each `# ` prefix.
///
/// Embedded newlines always start a new line and keep their left indentation.
/// A line longer than `max_len` is broken after its last whitespace; a word
/// with no whitespace before it is left intact.
pub(crate) fn comment_lines(text: &str, max_len: usize) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut split = 0;

    for (i, c) in text.char_indices() {
        if c == '\n' {
            lines.push(text[start..i].trim_end());
            start = i + 1;
            split = start;
            continue;
        }
        if c.is_whitespace() {
            split = i + c.len_utf8();
        }
        if i - start >= max_len && split > start {
            lines.push(text[start..split].trim());
            start = split;
        }
    }

    if start < text.len() {
        lines.push(text[start..].trim_end());
    }
    lines
}
