//! Short independent observations about a rung, in check order.

use crate::graph::{TagGraph, Usage};
use crate::rules::utils::list;
use crate::rules::{DetectedPattern, PatternType, RungView};

use super::purpose::Purpose;

fn numbers(rungs: &[u32]) -> String {
    let names: Vec<String> = rungs.iter().map(u32::to_string).collect();
    let names: Vec<&str> = names.iter().map(String::as_str).collect();
    list(&names, 5)
}

pub fn key_points(
    view: &RungView<'_>,
    patterns: &[DetectedPattern],
    graph: &TagGraph,
    purpose: &Purpose,
    has_option_bits: bool,
    max: usize,
) -> Vec<String> {
    let fired = |kind: PatternType| patterns.iter().find(|p| p.pattern_type == kind);
    let mut points: Vec<String> = Vec::new();

    let conditions = purpose.conditions.len();
    if view.parsed.is_linear() && conditions >= 2 {
        points.push(format!("All {conditions} conditions must be true"));
    }
    if view.parsed.branch_count() >= 2 {
        points.push(format!("{} parallel branches; any one path can energize the output", view.parsed.branch_count()));
    }
    if has_option_bits {
        points.push("Uses option bits; behaviour depends on machine configuration".to_string());
    }
    if fired(PatternType::LatchUnlatch).is_some() {
        points.push("Latched output holds its state until explicitly unlatched".to_string());
    }
    if let Some(p) = fired(PatternType::TimerDelay) {
        points.push(p.description.clone());
    }
    if let Some(p) = fired(PatternType::CounterAccumulator) {
        points.push(p.description.clone());
    }
    if fired(PatternType::OneShot).is_some() {
        let edge = if view.has_opcode(&["OSF"]) { "falling" } else { "rising" };
        points.push(format!("Acts on a {edge} edge for a single scan"));
    }
    if let Some(p) = fired(PatternType::FaultDetection) {
        points.push(format!("Fault logic: {}", p.description));
    }
    if !purpose.safety_inputs.is_empty() {
        let inputs: Vec<&str> = purpose.safety_inputs.iter().map(String::as_str).collect();
        points.push(format!("Safety inputs {} must be healthy", list(&inputs, 3)));
    }

    let (program, routine, own) = (
        view.location.program.as_str(),
        view.location.routine.as_str(),
        view.location.rung_number,
    );
    if let Some(output) = &purpose.primary_output {
        let readers: Vec<u32> = graph
            .rungs_with(output, program, routine, Usage::Read)
            .into_iter()
            .filter(|n| *n != own)
            .collect();
        if !readers.is_empty() {
            points.push(format!("{output} is used by rung(s) {}", numbers(&readers)));
        }
    }
    for input in &view.input_tags {
        let writers: Vec<u32> = graph
            .rungs_with(input, program, routine, Usage::Write)
            .into_iter()
            .filter(|n| *n != own)
            .collect();
        if !writers.is_empty() {
            points.push(format!("{input} is set by rung(s) {}", numbers(&writers)));
            break;
        }
    }

    if let Some(p) = fired(PatternType::CodeConcern) {
        points.push(format!("Review: {}", p.description));
    }

    points.truncate(max);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Program, Project, Routine, Rung};
    use crate::context::categorize::categorize;
    use crate::context::purpose::build_purpose;
    use crate::context::subsystems::{detect_subsystems, has_option_bits};
    use crate::graph::build_tag_graph;
    use crate::rules::detect_patterns;

    fn project(rungs: &[(u32, &str)]) -> Project {
        Project {
            programs: vec![Program {
                name: "Main".into(),
                routines: vec![Routine {
                    name: "R1".into(),
                    kind: "Ladder".into(),
                    rungs: rungs.iter().map(|(n, t)| Rung::new(*n, *t)).collect(),
                }],
                tags: vec![],
            }],
            tags: vec![],
        }
    }

    fn points_for(project: &Project, index: usize, max: usize) -> Vec<String> {
        let graph = build_tag_graph(project);
        let rung = &project.programs[0].routines[0].rungs[index];
        let view = RungView::new("Main", "R1", rung);
        let patterns = detect_patterns(&view);
        let category = categorize(&view, &patterns, &graph, 5);
        let tags = view.tags();
        let purpose = build_purpose(&view, &patterns, category, &detect_subsystems(&tags));
        key_points(&view, &patterns, &graph, &purpose, has_option_bits(&tags), max)
    }

    #[test]
    fn series_conditions_and_cross_references() {
        let p = project(&[(3, "XIC(A) XIC(B) OTE(X)"), (7, "XIC(X) OTE(Y)"), (9, "XIC(X) OTE(Z)")]);
        let first = points_for(&p, 0, 6);
        assert_eq!(first[0], "All 2 conditions must be true");
        assert!(first.contains(&"X is used by rung(s) 7, 9".to_string()));

        let second = points_for(&p, 1, 6);
        assert!(second.contains(&"X is set by rung(s) 3".to_string()));
    }

    #[test]
    fn branches_option_bits_and_latch() {
        let p = project(&[(1, "[XIC(Opt_Labeler),XIC(Manual_Run)] OTL(Labeler_Run)")]);
        let points = points_for(&p, 0, 6);
        assert_eq!(points[0], "2 parallel branches; any one path can energize the output");
        assert!(points[1].starts_with("Uses option bits"));
        assert!(points.iter().any(|k| k.starts_with("Latched output")));
    }

    #[test]
    fn one_shot_edge_follows_the_opcode() {
        let p = project(&[(1, "XIC(A) OSF(Bit,Storage,Out)"), (2, "XIC(A) ONS(Bit2) OTE(Pulse)")]);
        assert!(points_for(&p, 0, 6).contains(&"Acts on a falling edge for a single scan".to_string()));
        assert!(points_for(&p, 1, 6).contains(&"Acts on a rising edge for a single scan".to_string()));
    }

    #[test]
    fn capped_in_insertion_order() {
        let p = project(&[(1, "XIC(ESTOP_OK) XIC(Guard_Closed) ONS(Os1) OTL(Run) TON(T4:1,10,0)")]);
        let all = points_for(&p, 0, 20);
        let capped = points_for(&p, 0, 2);
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[..], all[..2]);
    }
}
