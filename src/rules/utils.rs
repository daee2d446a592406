//! Shared vocabularies and shape checks for the pattern rules.

use once_cell::sync::Lazy;
use regex::Regex;

use super::RungView;
use crate::graph::opcodes::{COIL_OPCODES, COMPARISON_OPCODES, CONDITION_OPCODES};

fn vocab(pattern: &str) -> Regex {
    Regex::new(&format!("(?i){pattern}")).expect("valid vocabulary regex")
}

pub static SAFETY: Lazy<Regex> = Lazy::new(|| {
    vocab(r"(^|[^A-Z])E[_-]?STOP|(?-i:E_?Stop)|EMERG|SAFETY|GUARD|GATE|DOOR|LIGHT_?CURTAIN|INTERLOCK|INTLK|MCR")
});
pub static ESTOP: Lazy<Regex> = Lazy::new(|| vocab(r"(^|[^A-Z])E[_-]?STOP|(?-i:E_?Stop)|EMERG"));
pub static GATE: Lazy<Regex> = Lazy::new(|| vocab(r"GATE|DOOR"));
pub static GUARD: Lazy<Regex> = Lazy::new(|| vocab(r"GUARD|LIGHT_?CURTAIN|SCANNER"));
pub static MOTOR: Lazy<Regex> = Lazy::new(|| {
    vocab(r"MOTOR|MTR|PUMP|FAN|BLOWER|DRIVE|VFD|SPINDLE|CONVEYOR|(^|[_.])CONV([_.0-9]|$)|AGITATOR|COMPRESSOR|MIXER")
});
pub static START_STOP: Lazy<Regex> = Lazy::new(|| vocab(r"START|STRT|STOP|STP|RUN"));
pub static FAULT: Lazy<Regex> =
    Lazy::new(|| vocab(r"FAULT|FLT|FAIL|ERROR|(^|[_.])ERR([_.0-9]|$)|(^|[^S])TRIP|OVERLOAD"));
pub static COMMAND: Lazy<Regex> = Lazy::new(|| vocab(r"CMD|COMMAND|REQ"));
pub static FEEDBACK: Lazy<Regex> =
    Lazy::new(|| vocab(r"ACK|FEEDBACK|_FB|FB_|FB$|CONFIRM|RESPONSE|REPLY|DONE|COMPLETE"));
pub static SEQUENCE: Lazy<Regex> = Lazy::new(|| vocab(r"STEP|STATE|PHASE|SEQ|STAGE"));
pub static ZONE: Lazy<Regex> = Lazy::new(|| {
    vocab(r"ZONE|CONVEYOR|(^|[_.])CONV([_.0-9]|$)|STATION|STN|LANE|(^|[_.])CELL([_.0-9]|$)|SECTION")
});
pub static ANALOG: Lazy<Regex> = Lazy::new(|| {
    vocab(r"ANALOG|^AI_|_AI|^AO_|_AO|RAW|SCALE|EU_|_EU|TEMP|PRESS|LEVEL|FLOW|SPEED|RPM|PSI|PCT|PERCENT|SETPOINT|_SP$|_PV$")
});
pub static ALARM: Lazy<Regex> =
    Lazy::new(|| vocab(r"ALARM|ALM|HORN|BEACON|STACK_?LIGHT|BUZZER|ANNUNC|WARN|SIREN"));
pub static MODE: Lazy<Regex> = Lazy::new(|| vocab(r"AUTO|MANUAL|MAN_|_MAN$|MODE|MAINT|SEMI|SETUP"));
pub static JOG: Lazy<Regex> = Lazy::new(|| vocab(r"JOG|INCH"));
pub static HMI: Lazy<Regex> = Lazy::new(|| vocab(r"HMI|SCREEN|DISPLAY|PANEL|OIT|_IND$|PILOT|LAMP"));
pub static OPTION_BIT: Lazy<Regex> = Lazy::new(|| vocab(r"OPTION|(^|[_.])OPT([_.0-9]|$)|CFG|CONFIG"));

/// Output names that report a state rather than command one.
pub const STATUS_SUFFIXES: &[&str] =
    &["STOPPED", "RUNNING", "OK", "READY", "ACTIVE", "STATUS", "COMPLETE", "DONE"];

/// Full-scale counts and unit factors that show up in raw-to-engineering scaling.
pub const SCALING_CONSTANTS: &[&str] = &[
    "32767", "32768", "16383", "16384", "4095", "4096", "27648", "65535", "1000", "100", "60", "3600",
    "0.1", "0.01", "0.001",
];

/// Suffixes that mark a name as a bit.
const BOOLEAN_SUFFIXES: &[&str] = &[
    ".DN", ".EN", ".TT", ".CU", ".CD", ".OV", ".UN", "OK", "_ON", "_OFF", "RUNNING", "READY", "ACTIVE",
    "DONE", "ENABLE", "ENABLED", "FAULT", "ALARM", "OPEN", "OPENED", "CLOSED", "FLAG", "BIT", "STOPPED",
    "REQUEST", "_PB",
];

/// Tags from `tags` whose names match `re`, each once, in order.
pub fn tags_matching<'t>(tags: &[&'t str], re: &Regex) -> Vec<&'t str> {
    let mut out: Vec<&str> = Vec::new();
    for t in tags {
        if re.is_match(t) && !out.contains(t) {
            out.push(t);
        }
    }
    out
}

pub fn owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

pub fn has_status_suffix(name: &str) -> bool {
    let up = name.trim().to_ascii_uppercase();
    STATUS_SUFFIXES.iter().any(|s| up.ends_with(s))
}

pub fn is_boolean_named(name: &str) -> bool {
    let up = name.trim().to_ascii_uppercase();
    up.starts_with("B_") || up.starts_with("BOOL") || BOOLEAN_SUFFIXES.iter().any(|s| up.ends_with(s))
}

pub fn is_scaling_constant(operand: &str) -> bool {
    SCALING_CONSTANTS.contains(&operand.trim())
}

/// At least one condition (contact or comparison) and at least one coil:
/// the shape of a rung that gates an output.
pub fn gates_output(view: &RungView<'_>) -> bool {
    let conditions = view.count_opcode(CONDITION_OPCODES) + view.count_opcode(COMPARISON_OPCODES);
    conditions > 0 && view.has_opcode(COIL_OPCODES)
}

/// Comma-joined list, shortened to `max` names plus a count of the rest.
pub fn list(names: &[&str], max: usize) -> String {
    if names.len() <= max {
        return names.join(", ");
    }
    format!("{} and {} more", names[..max].join(", "), names.len() - max)
}
