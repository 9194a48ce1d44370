use critical_path::graph::schedule_dag::ScheduleDag;
use critical_path::{
    DependencyRecord, DurationPolicy, Graph, MalformedInputError, TaskPriority, TaskRecord,
    TaskStatus,
};

fn tasks(keys: &[&str]) -> Vec<TaskRecord> {
    keys.iter().map(|k| TaskRecord::new(*k, format!("Task {k}"))).collect()
}

fn deps(pairs: &[(&str, &str)]) -> Vec<DependencyRecord> {
    pairs.iter().map(|(a, b)| DependencyRecord::new(*a, *b)).collect()
}

#[test]
fn schedule_dag_builds_edges_from_dependencies() {
    // A -> {B, C}
    let graph = Graph::build(tasks(&["A", "B", "C"]), deps(&[("A", "B"), ("A", "C")])).unwrap();
    let dag = ScheduleDag::build(&graph, &DurationPolicy::Basic);

    assert_eq!(dag.graph.node_count(), 3);
    assert_eq!(dag.graph.edge_count(), 2);
    assert_eq!(dag.durations, vec![1, 1, 1]);
}

#[test]
fn unknown_endpoints_become_placeholders_with_one_warning_each() {
    let graph = Graph::build(
        tasks(&["A"]),
        deps(&[("A", "ghost"), ("ghost", "phantom"), ("A", "ghost")]),
    )
    .unwrap();

    assert_eq!(graph.len(), 3);
    let placeholders: Vec<&str> = graph.placeholders().map(|t| t.key.as_str()).collect();
    assert_eq!(placeholders, vec!["ghost", "phantom"]);

    let warnings = graph.warnings();
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].key, "ghost");
    assert_eq!(warnings[0].referenced_by, vec![0, 1, 2]);
    assert_eq!(warnings[1].key, "phantom");
    assert_eq!(warnings[1].referenced_by, vec![1]);

    let ghost = graph.task("ghost").unwrap();
    assert!(ghost.is_placeholder());
    assert_eq!(ghost.status_label(), "missing");
    assert_eq!(ghost.title(), "Placeholder for ghost");
}

#[test]
fn self_reference_to_unknown_key_is_warned_once_per_record() {
    let graph = Graph::build(Vec::new(), deps(&[("X", "X")])).unwrap();
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.warnings()[0].referenced_by, vec![0]);
}

#[test]
fn duplicate_task_keys_are_rejected() {
    let err = Graph::build(tasks(&["A", "B", "A"]), Vec::new()).unwrap_err();
    assert_eq!(
        err,
        MalformedInputError::DuplicateTaskKey { key: "A".into() }
    );
}

#[test]
fn keys_are_trimmed_before_matching() {
    let graph = Graph::build(tasks(&[" A "]), deps(&[("A", " B")])).unwrap();
    assert!(graph.task("A").is_some());
    assert_eq!(graph.warnings().len(), 1);
    assert_eq!(graph.warnings()[0].key, "B");
}

#[test]
fn task_without_key_is_rejected() {
    let records = vec![TaskRecord::new("A", "A"), TaskRecord::default()];
    let err = Graph::build(records, Vec::new()).unwrap_err();
    assert_eq!(err, MalformedInputError::MissingTaskKey { index: 1 });
}

#[test]
fn dependency_without_endpoint_is_rejected() {
    let mut record = DependencyRecord::new("A", "B");
    record.target = Some("   ".into());
    let err = Graph::build(tasks(&["A", "B"]), vec![record]).unwrap_err();
    assert!(matches!(
        err,
        MalformedInputError::MissingEndpoint { index: 0, .. }
    ));
    assert!(err.to_string().contains("successor"));
}

#[test]
fn unrecognized_status_is_rejected_but_missing_status_defaults() {
    let records = vec![TaskRecord::new("A", "A").with_status("someday")];
    let err = Graph::build(records, Vec::new()).unwrap_err();
    assert!(matches!(
        err,
        MalformedInputError::InvalidField { field: "status", .. }
    ));

    let graph = Graph::build(tasks(&["A"]), Vec::new()).unwrap();
    let task = graph.task("A").unwrap();
    assert_eq!(task.status(), Some(TaskStatus::NotStarted));
    assert_eq!(task.priority(), Some(TaskPriority::Medium));
}

#[test]
fn status_and_priority_aliases_are_normalized() {
    let records = vec![
        TaskRecord::new("A", "A")
            .with_status("In Progress")
            .with_priority("Highest")
            .with_assignee("  dana "),
    ];
    let graph = Graph::build(records, Vec::new()).unwrap();
    let task = graph.task("A").unwrap();
    assert_eq!(task.status(), Some(TaskStatus::InProgress));
    assert_eq!(task.priority(), Some(TaskPriority::Urgent));
    assert_eq!(task.assignee(), Some("dana"));
}

#[test]
fn dependency_records_accept_endpoint_aliases() {
    let records: Vec<DependencyRecord> = serde_json::from_str(
        r#"[
            {"source": "A", "target": "B"},
            {"predecessor": "B", "successor": "C", "label": "blocks"},
            {"from": 3, "to": "A"}
        ]"#,
    )
    .unwrap();

    assert_eq!(records[0].source.as_deref(), Some("A"));
    assert_eq!(records[1].target.as_deref(), Some("C"));
    assert_eq!(records[1].label.as_deref(), Some("blocks"));
    assert_eq!(records[2].source.as_deref(), Some("3"));
}
