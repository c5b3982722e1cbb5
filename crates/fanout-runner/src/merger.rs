use std::collections::BTreeSet;

use fanout_core::{ExpansionResult, PartialFailure};

/// Separator placed between expanded points unless configured otherwise.
pub const DEFAULT_SEPARATOR: &str = "\n";

/// Join expansions in ordinal order.
///
/// Fails with every failed ordinal if any expansion failed; nothing is
/// dropped or reordered around the gap. An empty slice merges to `""`.
pub fn merge(results: &[ExpansionResult], separator: &str) -> Result<String, PartialFailure> {
    let failed_ordinals: BTreeSet<usize> = results
        .iter()
        .filter(|r| !r.is_success())
        .map(|r| r.ordinal)
        .collect();
    if !failed_ordinals.is_empty() {
        return Err(PartialFailure {
            failed_ordinals,
            total: results.len(),
        });
    }

    let mut ordered: Vec<&ExpansionResult> = results.iter().collect();
    ordered.sort_by_key(|r| r.ordinal);

    let parts: Vec<&str> = ordered
        .into_iter()
        .filter_map(ExpansionResult::text)
        .map(clean_expansion)
        .collect();
    Ok(parts.join(separator))
}

/// Strip surrounding whitespace and a `Skeleton:` label the model may echo.
pub fn clean_expansion(text: &str) -> &str {
    const LABEL: &str = "skeleton:";
    let trimmed = text.trim();
    match trimmed.get(..LABEL.len()) {
        Some(head) if head.eq_ignore_ascii_case(LABEL) => trimmed[LABEL.len()..].trim_start(),
        _ => trimmed,
    }
}
