//! Name-based semantic classification of tags.
//! A priority-ordered table of patterns; the first match wins.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SemanticType {
    Safety,
    Motor,
    Valve,
    Sensor,
    Timer,
    Counter,
    Fault,
    Status,
    Command,
    Feedback,
    Sequence,
    Hmi,
    Io,
    Unknown,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticType::Safety => "safety",
            SemanticType::Motor => "motor",
            SemanticType::Valve => "valve",
            SemanticType::Sensor => "sensor",
            SemanticType::Timer => "timer",
            SemanticType::Counter => "counter",
            SemanticType::Fault => "fault",
            SemanticType::Status => "status",
            SemanticType::Command => "command",
            SemanticType::Feedback => "feedback",
            SemanticType::Sequence => "sequence",
            SemanticType::Hmi => "hmi",
            SemanticType::Io => "io",
            SemanticType::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered by priority. Safety beats fault beats everything else, and the
/// physical I/O address form is the last resort before `unknown`.
const SEMANTIC_PATTERNS: &[(&str, SemanticType)] = &[
    (
        r"(^|[^A-Z])E[_-]?STOP|(?-i:E_?Stop)|EMERG|SAFETY|GUARD|GATE|DOOR|LIGHT_?CURTAIN|INTERLOCK|INTLK|MCR|SAFE",
        SemanticType::Safety,
    ),
    (r"FAULT|FLT|ALARM|ALM|ERROR|(^|[_.])ERR([_.0-9]|$)|(^|[^S])TRIP|FAIL|OVERLOAD", SemanticType::Fault),
    (r"^T\d+:\d+|TIMER|TMR|DELAY|_TON|_TOF", SemanticType::Timer),
    (r"^C\d+:\d+|COUNTER|COUNT|CNT|CTR", SemanticType::Counter),
    (r"STEP|STATE|PHASE|SEQ|STAGE", SemanticType::Sequence),
    (
        r"MOTOR|MTR|PUMP|FAN|BLOWER|DRIVE|VFD|SPINDLE|CONVEYOR|AGITATOR|COMPRESSOR|MIXER",
        SemanticType::Motor,
    ),
    (r"VALVE|VLV|SOLENOID|SOL_|_SOL|CYLINDER|CYL_|_CYL|DAMPER", SemanticType::Valve),
    (r"HMI|SCREEN|DISPLAY|PANEL|OIT|^PB_|_PB$|_PB_", SemanticType::Hmi),
    (r"CMD|COMMAND|REQ|START|STOP$|STOP_|RESET|ENABLE", SemanticType::Command),
    (r"FEEDBACK|_FB|FB$|ACK|CONFIRM|AUX|PROOF", SemanticType::Feedback),
    (
        r"STATUS|RUNNING|READY|ACTIVE|DONE|COMPLETE|STOPPED|IDLE|BUSY|OK$|_OK",
        SemanticType::Status,
    ),
    (
        r"SENSOR|PROX|PHOTO|LIMIT|^LS_|_LS$|_LS_|^PE_|LEVEL|PRESS|TEMP|FLOW|SWITCH",
        SemanticType::Sensor,
    ),
    (r"^LOCAL:\d+:[IO]|^[IO]:\d+|:I\.|:O\.", SemanticType::Io),
];

static SEMANTIC_TABLE: Lazy<Vec<(Regex, SemanticType)>> = Lazy::new(|| {
    SEMANTIC_PATTERNS
        .iter()
        .map(|(pattern, ty)| {
            let re = Regex::new(&format!("(?i){pattern}")).expect("valid semantic pattern");
            (re, *ty)
        })
        .collect()
});

/// Classifies a tag by its name.
pub fn classify_tag(name: &str) -> SemanticType {
    let name = name.trim();
    SEMANTIC_TABLE
        .iter()
        .find(|(re, _)| re.is_match(name))
        .map(|(_, ty)| *ty)
        .unwrap_or(SemanticType::Unknown)
}

/// Classifies by name, falling back to the declared description when the
/// name alone says nothing.
pub fn classify_with_description(name: &str, description: Option<&str>) -> SemanticType {
    match classify_tag(name) {
        SemanticType::Unknown => description.map(classify_tag).unwrap_or(SemanticType::Unknown),
        ty => ty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_names() {
        assert_eq!(classify_tag("ESTOP_OK"), SemanticType::Safety);
        assert_eq!(classify_tag("Gate1Open"), SemanticType::Safety);
        assert_eq!(classify_tag("Motor_Fault"), SemanticType::Fault);
        assert_eq!(classify_tag("T4:14.PRE"), SemanticType::Timer);
        assert_eq!(classify_tag("C5:0"), SemanticType::Counter);
        assert_eq!(classify_tag("Seq_Step"), SemanticType::Sequence);
        assert_eq!(classify_tag("Pump1_Run"), SemanticType::Motor);
        assert_eq!(classify_tag("Valve_Open"), SemanticType::Valve);
        assert_eq!(classify_tag("HMI_StartCmd"), SemanticType::Hmi);
        assert_eq!(classify_tag("Fill_Request"), SemanticType::Command);
        assert_eq!(classify_tag("Aux_Contact"), SemanticType::Feedback);
        assert_eq!(classify_tag("Line_Ready"), SemanticType::Status);
        assert_eq!(classify_tag("Tank_Level_Hi"), SemanticType::Sensor);
        assert_eq!(classify_tag("Local:1:I.Data.0"), SemanticType::Io);
        assert_eq!(classify_tag("AUTO"), SemanticType::Unknown);
    }

    #[test]
    fn camel_case_estop_is_safety() {
        assert_eq!(classify_tag("CellEStop_OK"), SemanticType::Safety);
        assert_eq!(classify_tag("LineEStop"), SemanticType::Safety);
        assert_eq!(classify_tag("GATESTOPREQUEST"), SemanticType::Safety);
    }

    #[test]
    fn fault_terms_inside_other_words() {
        assert_ne!(classify_tag("Speed_Override"), SemanticType::Fault);
        assert_ne!(classify_tag("Strip_Feeder"), SemanticType::Fault);
        assert_eq!(classify_tag("Conv_Err"), SemanticType::Fault);
        assert_eq!(classify_tag("Breaker_Trip"), SemanticType::Fault);
    }

    #[test]
    fn safety_outranks_fault() {
        assert_eq!(classify_tag("Guard_Fault"), SemanticType::Safety);
    }

    #[test]
    fn description_fallback() {
        assert_eq!(
            classify_with_description("B3_0_5", Some("Main conveyor motor running")),
            SemanticType::Motor
        );
        assert_eq!(classify_with_description("B3_0_5", None), SemanticType::Unknown);
        assert_eq!(classify_with_description("Pump", Some("safety gate")), SemanticType::Motor);
    }
}
