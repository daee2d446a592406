//! Zone control: two or more zone/conveyor/station tags.

use super::utils::{list, owned, tags_matching, ZONE};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    let tags = view.tags();
    let zone_tags = tags_matching(&tags, &ZONE);
    if zone_tags.len() < 2 {
        return None;
    }
    let description = format!("Coordinates zones {}", list(&zone_tags, 4));
    Some(view.pattern(PatternType::ZoneControl, 0.85, owned(&zone_tags), description))
}
