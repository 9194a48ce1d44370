use critical_path::calculations::ForwardPass;
use critical_path::graph::ScheduleDag;
use critical_path::{
    DependencyRecord, DurationPolicy, Graph, TaskRecord, TaskStatus,
};

fn graph(tasks: Vec<TaskRecord>, pairs: &[(&str, &str)]) -> Graph {
    let deps = pairs.iter().map(|(a, b)| DependencyRecord::new(*a, *b)).collect();
    Graph::build(tasks, deps).unwrap()
}

fn weighted(key: &str, priority: &str) -> TaskRecord {
    TaskRecord::new(key, key)
        .with_status("in-progress")
        .with_priority(priority)
}

#[test]
fn forward_pass_computes_early_times_across_dag() {
    // T1(3) -> {T2(5), T3(1)} -> T4(2)
    let g = graph(
        vec![
            weighted("T1", "high"),
            weighted("T2", "urgent"),
            weighted("T3", "low"),
            weighted("T4", "medium"),
        ],
        &[("T1", "T2"), ("T1", "T3"), ("T2", "T4"), ("T3", "T4")],
    );
    let dag = ScheduleDag::build(&g, &DurationPolicy::weighted());
    let order = dag.topological_order(&g).unwrap();

    let earlies = ForwardPass::new(&dag).execute(&order);

    assert_eq!(earlies[0], (0, 3));
    assert_eq!(earlies[1], (3, 8));
    assert_eq!(earlies[2], (3, 4));
    // T4 waits for the slower branch
    assert_eq!(earlies[3], (8, 10));
}

#[test]
fn sources_start_at_zero_even_when_disconnected() {
    let g = graph(
        vec![TaskRecord::new("A", "A"), TaskRecord::new("B", "B"), TaskRecord::new("C", "C")],
        &[("A", "B")],
    );
    let dag = ScheduleDag::build(&g, &DurationPolicy::Basic);
    let order = dag.topological_order(&g).unwrap();

    let earlies = ForwardPass::new(&dag).execute(&order);
    assert_eq!(earlies, vec![(0, 1), (1, 2), (0, 1)]);
}

#[test]
fn placeholders_and_done_tasks_take_no_time() {
    let g = graph(
        vec![
            TaskRecord::new("A", "A").with_priority("urgent"),
            TaskRecord::new("B", "B")
                .with_priority("urgent")
                .with_status("done"),
        ],
        &[("A", "B"), ("B", "end")],
    );
    assert_eq!(g.task("B").and_then(|t| t.status()), Some(TaskStatus::Done));

    let dag = ScheduleDag::build(&g, &DurationPolicy::weighted());
    let order = dag.topological_order(&g).unwrap();
    let earlies = ForwardPass::new(&dag).execute(&order);

    assert_eq!(earlies[0], (0, 5));
    assert_eq!(earlies[1], (5, 5));
    assert_eq!(earlies[2], (5, 5));
}
