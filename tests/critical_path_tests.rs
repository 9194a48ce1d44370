use critical_path::{
    CriticalPathResult, DependencyRecord, DurationPolicy, PathType, TaskRecord, compute,
};

fn run(keys: &[&str], pairs: &[(&str, &str)], policy: &DurationPolicy) -> CriticalPathResult {
    let tasks = keys.iter().map(|k| TaskRecord::new(*k, *k)).collect();
    let deps = pairs.iter().map(|(a, b)| DependencyRecord::new(*a, *b)).collect();
    compute(tasks, deps, policy).unwrap()
}

#[test]
fn chain_follows_tight_edges_from_source_to_sink() {
    let result = run(
        &["A", "B", "C", "D"],
        &[("A", "B"), ("B", "D"), ("A", "C")],
        &DurationPolicy::Basic,
    );

    assert_eq!(result.chain, vec!["A", "B", "D"]);
    assert_eq!(result.project_duration, 3);
    assert_eq!(result.chain_duration(), result.project_duration);
    assert_eq!(result.critical_tasks, vec!["A", "B", "D"]);
    assert!(result.is_critical_edge("A", "B"));
    assert!(!result.is_critical_edge("A", "C"));
}

#[test]
fn tied_paths_pick_smallest_keys_but_report_every_critical_task() {
    // Two equal branches: S -> {Y, X} -> T
    let result = run(
        &["T", "S", "Y", "X"],
        &[("S", "Y"), ("S", "X"), ("Y", "T"), ("X", "T")],
        &DurationPolicy::Basic,
    );

    assert_eq!(result.chain, vec!["S", "X", "T"]);
    assert_eq!(result.critical_tasks, vec!["S", "T", "X", "Y"]);
    assert_eq!(
        result.critical_edges,
        vec![
            ("S".to_string(), "X".to_string()),
            ("S".to_string(), "Y".to_string()),
            ("X".to_string(), "T".to_string()),
            ("Y".to_string(), "T".to_string()),
        ]
    );
}

#[test]
fn chain_starts_at_smallest_critical_source() {
    let result = run(&["b", "a"], &[], &DurationPolicy::Basic);
    assert_eq!(result.chain, vec!["a"]);
    assert_eq!(result.critical_tasks, vec!["a", "b"]);
}

#[test]
fn edges_keep_input_order_and_classification() {
    let deps = vec![
        DependencyRecord::new("A", "C").with_label("slow"),
        DependencyRecord::new("A", "B"),
        DependencyRecord::new("B", "C"),
    ];
    let tasks = ["A", "B", "C"].iter().map(|k| TaskRecord::new(*k, *k)).collect();
    let result = compute(tasks, deps, &DurationPolicy::Basic).unwrap();

    let kinds: Vec<PathType> = result.edges.iter().map(|e| e.path_type).collect();
    assert_eq!(
        kinds,
        vec![PathType::Parallel, PathType::Critical, PathType::Critical]
    );
    assert_eq!(result.edges[0].label.as_deref(), Some("slow"));
}

#[test]
fn duplicate_edges_are_classified_individually_but_counted_once_in_the_set() {
    let result = run(&["A", "B"], &[("A", "B"), ("A", "B")], &DurationPolicy::Basic);
    assert_eq!(result.edges.len(), 2);
    assert!(result.edges.iter().all(|e| e.is_critical()));
    assert_eq!(result.critical_edges.len(), 1);
}

#[test]
fn slack_table_reports_placeholders() {
    let result = run(&["A"], &[("A", "ghost")], &DurationPolicy::Basic);

    let ghost = result.slack_for("ghost").unwrap();
    assert!(ghost.placeholder);
    assert_eq!(ghost.status, "missing");
    assert_eq!(ghost.duration, 0);
    assert_eq!(result.warnings.len(), 1);
    assert!(result.is_critical_task("ghost"));
}

#[test]
fn summary_counts_and_cli_line() {
    let result = run(
        &["A", "B", "C"],
        &[("A", "B"), ("C", "end")],
        &DurationPolicy::Basic,
    );
    let summary = result.summary();

    assert_eq!(summary.task_count, 4);
    assert_eq!(summary.critical_count, 2);
    assert_eq!(summary.critical_edge_count, 1);
    assert_eq!(summary.parallel_edge_count, 1);
    assert_eq!(summary.placeholder_count, 1);
    assert_eq!(
        result.to_cli_summary(),
        "tasks=4, critical=2, duration=2, critical_edges=1, parallel_edges=1, placeholders=1, path=A->B"
    );
}

#[test]
fn empty_input_produces_empty_result() {
    let result = run(&[], &[], &DurationPolicy::Basic);
    assert!(result.chain.is_empty());
    assert_eq!(result.project_duration, 0);
    assert_eq!(result.to_cli_summary(), "tasks=0, critical=0, duration=0");
}

#[test]
fn dataframe_has_one_row_per_task() {
    let result = run(&["A", "B", "C"], &[("A", "B")], &DurationPolicy::Basic);
    let df = result.to_dataframe().unwrap();

    assert_eq!(df.height(), 3);
    assert_eq!(df.width(), 9);
    let slack = df.column("slack").unwrap().i64().unwrap();
    assert_eq!(slack.get(2), Some(1));
    let critical = df.column("is_critical").unwrap().bool().unwrap();
    assert_eq!(critical.get(0), Some(true));
    assert_eq!(critical.get(2), Some(false));
}

#[test]
fn most_and_least_slack_break_ties_by_key() {
    // A -> B -> D, C alone: C has slack 2, A/B/D none
    let result = run(
        &["D", "C", "B", "A"],
        &[("A", "B"), ("B", "D")],
        &DurationPolicy::Basic,
    );

    let most = result.most_slack().unwrap();
    assert_eq!((most.key.as_str(), most.slack), ("C", 2));
    let least = result.least_slack().unwrap();
    assert_eq!((least.key.as_str(), least.slack), ("A", 0));

    let empty = run(&[], &[], &DurationPolicy::Basic);
    assert!(empty.most_slack().is_none());
}
