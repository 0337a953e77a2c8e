//! TextPack: ranked evidence text, in order, until the budget runs out.

use std::collections::HashSet;

use recall_core::models::{EvidenceItem, TextPack, TextUnit};
use recall_core::text::normalize_for_dedup;
use recall_tokens::{Meter, TokenBudget};

/// `{cycle_id}:{reference}:{source log}`; `-` when the item has no source
/// line.
pub fn provenance_tag(cycle_id: &str, item: &EvidenceItem) -> String {
    match item.source_log {
        Some(log) => format!("{cycle_id}:{}:{log}", item.reference),
        None => format!("{cycle_id}:{}:-", item.reference),
    }
}

/// Walk `evidence` in rank order, admitting each item's text whole. Stops at
/// the first item that does not fit and marks the pack truncated. Items
/// without text and repeated texts are skipped.
pub fn pack_text(
    cycle_id: &str,
    evidence: &[EvidenceItem],
    meter: &Meter,
    budget: usize,
    dedup_case_insensitive: bool,
) -> TextPack {
    let mut tokens = TokenBudget::new(meter, budget);
    let mut seen: HashSet<String> = HashSet::new();
    let mut pack = TextPack {
        budget,
        ..TextPack::default()
    };

    for item in evidence {
        let Some(text) = item.text.as_deref() else {
            continue;
        };
        if text.trim().is_empty() || !seen.insert(normalize_for_dedup(text, dedup_case_insensitive)) {
            continue;
        }
        if tokens.try_consume(text).is_none() {
            pack.truncated = true;
            break;
        }
        pack.items.push(TextUnit {
            text: text.to_string(),
            provenance_tag: provenance_tag(cycle_id, item),
            source_path: item.path,
        });
    }
    pack.size = tokens.used();
    pack
}
