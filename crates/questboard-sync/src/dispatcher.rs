//! Event dispatcher: selects the events that still need a handler.

use std::collections::HashSet;

use questboard_core::event::InteractionEvent;

use crate::ledger::DedupLedger;

/// Returns the events of `batch` whose id is not in `ledger`.
///
/// Pure filter over its inputs. Reported order is kept, and an id repeated
/// inside the batch is selected once (first occurrence wins).
#[must_use]
pub fn select_events_to_handle(
    batch: &[InteractionEvent],
    ledger: &DedupLedger,
) -> Vec<InteractionEvent> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut selected = Vec::new();
    for event in batch {
        if !ledger.contains(&event.id) && seen.insert(event.id.as_str()) {
            selected.push(event.clone());
        }
    }
    selected
}
