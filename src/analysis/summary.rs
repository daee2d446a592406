//! Project-wide rollup of the per-rung results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RungContext;
use crate::config::AnalyzerConfig;
use crate::context::RungCategory;
use crate::graph::TagGraph;
use crate::rules::{DetectedPattern, PatternType};
use crate::semantic::SemanticType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCount {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: RungCategory,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyTag {
    pub name: String,
    pub semantic_type: SemanticType,
    pub readers: usize,
    pub writers: usize,
    pub references: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramSummary {
    pub total_rungs: usize,
    pub safety_rungs: usize,
    pub motor_control_rungs: usize,
    pub timer_rungs: usize,
    pub counter_rungs: usize,
    pub total_tags: usize,
    pub unreferenced_tags: usize,
    pub pattern_counts: Vec<PatternCount>,
    pub category_counts: Vec<CategoryCount>,
    pub key_tags: Vec<KeyTag>,
}

const KEY_SEMANTICS: &[SemanticType] = &[SemanticType::Safety, SemanticType::Motor, SemanticType::Fault];

/// Counts descending; ties keep key order.
fn histogram<K: Ord + Copy>(items: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }
    let mut sorted: Vec<(K, usize)> = counts.into_iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
}

pub fn summarize(
    contexts: &[RungContext],
    patterns: &[DetectedPattern],
    graph: &TagGraph,
    config: &AnalyzerConfig,
) -> ProgramSummary {
    let has = |ctx: &RungContext, kind: PatternType| ctx.patterns.iter().any(|p| p.pattern_type == kind);

    let mut key_tags: Vec<KeyTag> = graph
        .iter()
        .filter(|t| KEY_SEMANTICS.contains(&t.semantic_type) || t.reference_count() >= config.key_tag_min_references)
        .map(|t| KeyTag {
            name: t.name.clone(),
            semantic_type: t.semantic_type,
            readers: t.readers.len(),
            writers: t.writers.len(),
            references: t.reference_count(),
        })
        .collect();
    key_tags.sort_by(|a, b| b.references.cmp(&a.references).then_with(|| a.name.cmp(&b.name)));
    key_tags.truncate(config.max_key_tags);

    ProgramSummary {
        total_rungs: contexts.len(),
        safety_rungs: contexts.iter().filter(|c| c.safety_relevant).count(),
        motor_control_rungs: contexts.iter().filter(|c| c.category == RungCategory::MotorControl).count(),
        timer_rungs: contexts.iter().filter(|c| has(*c, PatternType::TimerDelay)).count(),
        counter_rungs: contexts.iter().filter(|c| has(*c, PatternType::CounterAccumulator)).count(),
        total_tags: graph.len(),
        unreferenced_tags: graph.unreferenced_tags().len(),
        pattern_counts: histogram(patterns.iter().map(|p| p.pattern_type))
            .into_iter()
            .map(|(pattern_type, count)| PatternCount { pattern_type, count })
            .collect(),
        category_counts: histogram(contexts.iter().map(|c| c.category))
            .into_iter()
            .map(|(category, count)| CategoryCount { category, count })
            .collect(),
        key_tags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn histogram_sorts_by_count_then_key() {
        let h = histogram([3, 1, 3, 2, 1, 3].into_iter());
        assert_eq!(h, vec![(3, 3), (1, 2), (2, 1)]);
        let h = histogram(["b", "a"].into_iter());
        assert_eq!(h, vec![("a", 1), ("b", 1)]);
    }
}
