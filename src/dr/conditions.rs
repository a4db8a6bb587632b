//! Condition Aggregator
//!
//! Turns raw condition lists into ordered, human readable detail lines
//! describing what is still in progress.

use crate::crd::{DRCondition, CONDITION_TRUE};
use crate::domain::ports::TimeFormatter;

/// Separator between the segments of one detail line
const SEGMENT_SEPARATOR: &str = " — ";

/// Reason reported for replication legs that were never provisioned
pub const REASON_UNUSED: &str = "Unused";

/// Placement-level predicate: condition not yet satisfied
pub fn is_pending(condition: &DRCondition) -> bool {
    condition.status != CONDITION_TRUE
}

/// Resource-aggregate predicate: pending and not an unprovisioned leg
pub fn is_pending_and_used(condition: &DRCondition) -> bool {
    is_pending(condition) && condition.reason() != REASON_UNUSED
}

/// Build detail lines for the conditions matching `predicate`, most recent
/// first. Conditions with missing or unparsable timestamps sort last; equal
/// timestamps keep their original order.
pub fn build_detail_list<P>(
    conditions: &[DRCondition],
    predicate: P,
    formatter: &dyn TimeFormatter,
) -> Vec<String>
where
    P: Fn(&DRCondition) -> bool,
{
    let mut matching: Vec<_> = conditions
        .iter()
        .filter(|&c| predicate(c))
        .map(|c| (c.transition_time(), c))
        .collect();

    // Stable sort; `None` orders below every timestamp
    matching.sort_by(|(a, _), (b, _)| b.cmp(a));

    matching
        .into_iter()
        .map(|(time, condition)| format_condition(condition, time.map(|t| formatter.format(&t))))
        .collect()
}

/// Concatenate placement-level and resource-aggregate details, placement
/// first, dropping repeated lines
pub fn combine_detail_lists(placement: Vec<String>, resource: Vec<String>) -> Vec<String> {
    let mut combined: Vec<String> = Vec::with_capacity(placement.len() + resource.len());
    for line in placement.into_iter().chain(resource) {
        if !combined.contains(&line) {
            combined.push(line);
        }
    }
    combined
}

/// Detail lines for both condition sources using the canonical predicates
pub fn progress_details(
    placement_conditions: &[DRCondition],
    resource_conditions: &[DRCondition],
    formatter: &dyn TimeFormatter,
) -> Vec<String> {
    combine_detail_lists(
        build_detail_list(placement_conditions, is_pending, formatter),
        build_detail_list(resource_conditions, is_pending_and_used, formatter),
    )
}

fn format_condition(condition: &DRCondition, time: Option<String>) -> String {
    let reason = condition.reason();
    let kind = match (condition.r#type.is_empty(), reason.is_empty()) {
        (false, false) => format!("{} / {}", condition.r#type, reason),
        (false, true) => condition.r#type.clone(),
        (true, false) => reason.to_string(),
        (true, true) => String::new(),
    };

    [
        time.unwrap_or_default(),
        kind,
        condition.message.clone().unwrap_or_default(),
    ]
    .into_iter()
    .filter(|segment| !segment.trim().is_empty())
    .collect::<Vec<_>>()
    .join(SEGMENT_SEPARATOR)
}
