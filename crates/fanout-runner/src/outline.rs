use fanout_core::SubtaskDescriptor;

/// Split a model-written skeleton into ordered subtasks.
///
/// Every non-blank line is one point. Ordinals follow line position among the
/// kept lines; whatever numbering the model used only becomes the label.
/// ```text
/// 1. Energy conservation.      -> ordinal 0, label "1"
/// 2) Efficient transportation. -> ordinal 1, label "2"
///                              (skipped)
/// - Sustainable diet.          -> ordinal 2, label "2"
/// ```
pub fn parse_outline(skeleton: &str) -> Vec<SubtaskDescriptor> {
    skeleton
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(ordinal, line)| SubtaskDescriptor {
            ordinal,
            label: extract_label(line)
                .map(str::to_string)
                .unwrap_or_else(|| ordinal.to_string()),
            raw_text: line.to_string(),
        })
        .collect()
}

/// Extract the leading enumerator of a list line.
///
/// Accepts one or more ASCII digits, or a single ASCII letter, terminated by
/// `.`, `)` or `:`. Anything else (bullets, words, headings) has no label.
fn extract_label(line: &str) -> Option<&str> {
    let end = line.find(|c: char| matches!(c, '.' | ')' | ':'))?;
    let token = &line[..end];
    let numeric = !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit());
    let lettered = token.len() == 1 && token.bytes().all(|b| b.is_ascii_alphabetic());
    if numeric || lettered {
        Some(token)
    } else {
        None
    }
}
