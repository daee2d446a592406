//! Status monitoring: several outputs that report state.

use super::utils::{has_status_suffix, list};
use super::{DetectedPattern, PatternType, RungView};

pub const MIN_STATUS_OUTPUTS: usize = 3;

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let status: Vec<&str> = view
        .output_tags
        .iter()
        .map(String::as_str)
        .filter(|t| has_status_suffix(t))
        .collect();
    if status.len() < MIN_STATUS_OUTPUTS {
        return None;
    }
    let description = format!("Reports {} status outputs: {}", status.len(), list(&status, 4));
    Some(view.pattern(
        PatternType::StatusMonitoring,
        0.9,
        status.iter().map(|t| t.to_string()).collect(),
        description,
    ))
}
