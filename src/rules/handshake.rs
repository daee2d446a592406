//! Handshake: command and feedback vocabulary on the same rung.

use super::utils::{list, owned, tags_matching, COMMAND, FEEDBACK};
use super::{DetectedPattern, PatternType, RungView};

pub fn check(view: &RungView<'_>) -> Option<DetectedPattern> {
    if !(COMMAND.is_match(&view.text) && FEEDBACK.is_match(&view.text)) {
        return None;
    }
    let tags = view.tags();
    let commands = tags_matching(&tags, &COMMAND);
    let feedback = tags_matching(&tags, &FEEDBACK);
    let mut implicated = commands.clone();
    implicated.extend(feedback.iter().copied().filter(|t| !commands.contains(t)));
    let description = format!(
        "Handshake between command {} and feedback {}",
        if commands.is_empty() { "signals".to_string() } else { list(&commands, 2) },
        if feedback.is_empty() { "signals".to_string() } else { list(&feedback, 2) }
    );
    Some(view.pattern(PatternType::Handshake, 0.8, owned(&implicated), description))
}
