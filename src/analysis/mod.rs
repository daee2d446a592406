//! Two-phase driver: the tag graph is built over the whole project first,
//! then every rung is analysed against that finished graph.

pub mod summary;
pub mod xref;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ast::Project;
use crate::config::AnalyzerConfig;
use crate::context::{
    branch_groups, build_purpose, categorize, detect_subsystems, has_option_bits, key_points, render_purpose,
    BranchGroup, Purpose, RungCategory,
};
use crate::graph::{build_tag_graph, TagGraph, TagUsageInfo};
use crate::rules::{detect_patterns, DetectedPattern, PatternType, RungView};
use crate::semantic::SemanticType;

pub use summary::{summarize, CategoryCount, KeyTag, PatternCount, ProgramSummary};
pub use xref::related_rungs;

/// Everything the engine concluded about one rung.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RungContext {
    pub category: RungCategory,
    pub purpose: String,
    pub purpose_detail: Purpose,
    pub patterns: Vec<DetectedPattern>,
    pub related_rungs: Vec<u32>,
    pub safety_relevant: bool,
    pub input_tags: Vec<String>,
    pub output_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concerns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsystems: Vec<String>,
    #[serde(default)]
    pub key_points: Vec<String>,
    pub branch_count: usize,
    pub has_option_bits: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branch_groups: Vec<BranchGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramAnalysis {
    pub tag_usage: BTreeMap<String, TagUsageInfo>,
    pub patterns: Vec<DetectedPattern>,
    /// Keyed by `"<program>/<routine>:<rung>"`.
    pub rung_contexts: BTreeMap<String, RungContext>,
    pub summary: ProgramSummary,
}

pub fn analyze_rung(view: &RungView<'_>, graph: &TagGraph, config: &AnalyzerConfig) -> RungContext {
    let patterns = detect_patterns(view);
    let category = categorize(view, &patterns, graph, config.status_override_min_outputs);

    let tags = view.tags();
    let subsystems = detect_subsystems(&tags);
    let option_bits = has_option_bits(&tags);
    let purpose = build_purpose(view, &patterns, category, &subsystems);
    let points = key_points(view, &patterns, graph, &purpose, option_bits, config.max_key_points);

    let safety_relevant = patterns.iter().any(|p| p.pattern_type == PatternType::SafetyInterlock)
        || category == RungCategory::Safety
        || tags.iter().any(|t| graph.semantic_of(t) == SemanticType::Safety);
    let concerns = patterns
        .iter()
        .filter(|p| p.pattern_type == PatternType::CodeConcern)
        .map(|p| p.description.clone())
        .collect();

    RungContext {
        category,
        purpose: render_purpose(&purpose),
        purpose_detail: purpose,
        related_rungs: related_rungs(view, graph),
        safety_relevant,
        input_tags: view.input_tags.clone(),
        output_tags: view.output_tags.clone(),
        concerns,
        subsystems,
        key_points: points,
        branch_count: view.parsed.branch_count(),
        has_option_bits: option_bits,
        branch_groups: branch_groups(view, graph),
        patterns,
    }
}

/// Second pass. `graph` must have been built from the same `project`.
pub fn analyze_rungs(project: &Project, graph: &TagGraph, config: &AnalyzerConfig) -> ProgramAnalysis {
    let mut keys: Vec<String> = Vec::new();
    let mut contexts: Vec<RungContext> = Vec::new();
    let mut patterns: Vec<DetectedPattern> = Vec::new();

    for program in &project.programs {
        for routine in &program.routines {
            for rung in &routine.rungs {
                let view = RungView::new(&program.name, &routine.name, rung);
                let context = analyze_rung(&view, graph, config);
                patterns.extend(context.patterns.iter().cloned());
                keys.push(view.location.key());
                contexts.push(context);
            }
        }
    }

    let summary = summarize(&contexts, &patterns, graph, config);
    debug!(rungs = summary.total_rungs, patterns = patterns.len(), "analysis finished");

    ProgramAnalysis {
        tag_usage: graph.tags().clone(),
        patterns,
        // A repeated rung number keeps the later rung's context.
        rung_contexts: keys.into_iter().zip(contexts).collect(),
        summary,
    }
}

/// Both passes in order.
pub fn analyze(project: &Project, config: &AnalyzerConfig) -> ProgramAnalysis {
    let graph = build_tag_graph(project);
    analyze_rungs(project, &graph, config)
}

