//! Library crate for ladder_analyzer.
//!
//! Static analysis of ladder-logic projects that upstream parsers have
//! already turned into a [`ast::Project`] tree. Analysis runs in two phases:
//! [`graph::build_tag_graph`] walks the whole project once, then
//! [`analysis::analyze_rungs`] classifies every rung against that finished
//! graph. The engine itself never fails; only the JSON and file edges
//! return [`AnalyzerError`].

pub mod analysis;
pub mod ast;
pub mod config;
pub mod context;
pub mod error;
pub mod graph;
pub mod parser;
pub mod rules;
pub mod semantic;

use std::path::Path;

use wasm_bindgen::prelude::*;

pub use analysis::{analyze, analyze_rungs, ProgramAnalysis, RungContext};
pub use ast::Project;
pub use config::{parse_config_from_text, AnalyzerConfig};
pub use error::{AnalyzerError, Result};
pub use graph::{build_tag_graph, TagGraph};

pub fn parse_project_from_text(s: &str) -> Result<Project> {
    serde_json::from_str::<Project>(s).map_err(AnalyzerError::InvalidProject)
}

pub fn load_project(path: &Path) -> Result<Project> {
    let text = std::fs::read_to_string(path).map_err(|source| AnalyzerError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_project_from_text(&text)
}

fn analyze_json(project_json: &str, config_json: &str) -> Result<String> {
    let project = parse_project_from_text(project_json)?;
    let config = parse_config_from_text(config_json)?;
    let analysis = analyze(&project, &config);
    serde_json::to_string(&analysis).map_err(AnalyzerError::Serialize)
}

// This is the function that JavaScript will call
#[wasm_bindgen]
pub fn analyze_ladder_project(project_json: &str, config_json: &str) -> String {
    match analyze_json(project_json, config_json) {
        Ok(json) => json,
        Err(e) => serde_json::json!({ "error": e.to_string() }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasm_entry_reports_errors_as_json() {
        let out = analyze_ladder_project("not json", "");
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(v["error"].as_str().unwrap().starts_with("invalid project JSON"));

        let out = analyze_ladder_project(r#"{"programs":[]}"#, r#"{"bogus":1}"#);
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert!(v["error"].as_str().unwrap().starts_with("invalid config JSON"));
    }

    #[test]
    fn wasm_entry_returns_analysis() {
        let project = r#"{"programs":[{"name":"Main","routines":[{"name":"R1","type":"Ladder",
            "rungs":[{"number":0,"rawText":"XIC(Start) OTE(Run)"}]}]}]}"#;
        let v: serde_json::Value = serde_json::from_str(&analyze_ladder_project(project, "")).unwrap();
        assert!(v.get("error").is_none());
        assert_eq!(v["summary"]["totalRungs"], 1);
        assert!(v["rungContexts"]["Main/R1:0"].is_object());
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_project(Path::new("/nonexistent/project.json")).unwrap_err();
        assert!(matches!(err, AnalyzerError::Io { .. }));
    }
}
