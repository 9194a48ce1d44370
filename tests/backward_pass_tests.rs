use critical_path::calculations::{BackwardPass, ForwardPass};
use critical_path::graph::ScheduleDag;
use critical_path::{DependencyRecord, DurationPolicy, Graph, TaskRecord};

fn diamond() -> Graph {
    // A -> {B, C} -> D, with B taking longer than C under the weighted policy
    let tasks = vec![
        TaskRecord::new("A", "A").with_priority("low"),
        TaskRecord::new("B", "B").with_priority("high"),
        TaskRecord::new("C", "C").with_priority("low"),
        TaskRecord::new("D", "D").with_priority("medium"),
    ];
    let deps = [("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]
        .iter()
        .map(|(a, b)| DependencyRecord::new(*a, *b))
        .collect();
    Graph::build(tasks, deps).unwrap()
}

#[test]
fn backward_pass_computes_late_times() {
    let g = diamond();
    let dag = ScheduleDag::build(&g, &DurationPolicy::weighted());
    let order = dag.topological_order(&g).unwrap();

    let earlies = ForwardPass::new(&dag).execute(&order);
    let project_end = earlies.iter().map(|&(_, ef)| ef).max().unwrap();
    assert_eq!(project_end, 6);

    let lates = BackwardPass::new(&dag).execute(&order, project_end);

    assert_eq!(lates[3], (4, 6));
    assert_eq!(lates[1], (1, 4));
    // C can slip by two units
    assert_eq!(lates[2], (3, 4));
    assert_eq!(lates[0], (0, 1));
}

#[test]
fn every_sink_finishes_at_project_end() {
    let tasks = vec![
        TaskRecord::new("long", "long").with_priority("urgent"),
        TaskRecord::new("short", "short").with_priority("low"),
    ];
    let g = Graph::build(tasks, Vec::new()).unwrap();
    let dag = ScheduleDag::build(&g, &DurationPolicy::weighted());
    let order = dag.topological_order(&g).unwrap();

    let lates = BackwardPass::new(&dag).execute(&order, 5);
    assert_eq!(lates, vec![(0, 5), (4, 5)]);
}
