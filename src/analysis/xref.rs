//! Cross-references between rungs of the same routine.

use std::collections::BTreeSet;

use crate::graph::{TagGraph, Usage};
use crate::rules::RungView;

/// Rungs in the same routine that read or write any tag this rung touches,
/// sorted, without the rung itself.
pub fn related_rungs(view: &RungView<'_>, graph: &TagGraph) -> Vec<u32> {
    let loc = &view.location;
    let mut related = BTreeSet::new();
    for tag in view.tags() {
        for usage in [Usage::Read, Usage::Write] {
            related.extend(graph.rungs_with(tag, &loc.program, &loc.routine, usage));
        }
    }
    related.remove(&loc.rung_number);
    related.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Program, Project, Routine, Rung};
    use crate::graph::build_tag_graph;

    #[test]
    fn links_writer_and_reader_within_routine() {
        let routine = |name: &str, rungs: &[(u32, &str)]| Routine {
            name: name.into(),
            kind: "Ladder".into(),
            rungs: rungs.iter().map(|(n, t)| Rung::new(*n, *t)).collect(),
        };
        let project = Project {
            programs: vec![Program {
                name: "Main".into(),
                routines: vec![
                    routine("R1", &[(3, "XIC(A) OTE(X)"), (5, "XIC(Q) OTE(W)"), (7, "XIC(X) OTE(Y)")]),
                    routine("R2", &[(1, "XIC(X) OTE(Z)")]),
                ],
                tags: vec![],
            }],
            tags: vec![],
        };
        let graph = build_tag_graph(&project);
        let rungs = &project.programs[0].routines[0].rungs;

        let view = RungView::new("Main", "R1", &rungs[0]);
        assert_eq!(related_rungs(&view, &graph), vec![7]);
        let view = RungView::new("Main", "R1", &rungs[2]);
        assert_eq!(related_rungs(&view, &graph), vec![3]);
        let view = RungView::new("Main", "R1", &rungs[1]);
        assert!(related_rungs(&view, &graph).is_empty());
    }
}
