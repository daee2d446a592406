use serde::{Deserialize, Serialize};

use crate::error::{AnalyzerError, Result};

/// Caps and thresholds for the parts of the output that are sized by policy
/// rather than by the rung itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct AnalyzerConfig {
    /// Cap on `summary.keyTags`.
    pub max_key_tags: usize,
    /// Reference count that makes any tag a key tag.
    pub key_tag_min_references: usize,
    /// Cap on each rung's key points.
    pub max_key_points: usize,
    /// Distinct outputs at which a status-monitoring rung is categorized as
    /// such regardless of other patterns.
    pub status_override_min_outputs: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            max_key_tags: 20,
            key_tag_min_references: 3,
            max_key_points: 6,
            status_override_min_outputs: 5,
        }
    }
}

pub const EXAMPLE_CONFIG_JSON: &str = r#"{
  "maxKeyTags": 10,
  "keyTagMinReferences": 4,
  "maxKeyPoints": 4,
  "statusOverrideMinOutputs": 5
}"#;

/// Parse a config JSON string. Blank text yields the defaults; missing
/// fields take their default values; unknown fields are rejected.
pub fn parse_config_from_text(s: &str) -> Result<AnalyzerConfig> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(AnalyzerConfig::default());
    }
    serde_json::from_str::<AnalyzerConfig>(s).map_err(AnalyzerError::InvalidConfig)
}
