use super::{InputBatch, PersistenceError, PersistenceResult};
use crate::critical_path::{CriticalPathResult, SlackEntry};
use crate::dependency::DependencyRecord;
use crate::duration::DurationPolicy;
use crate::task::{MISSING_STATUS, TaskRecord};
use rayon::prelude::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const TASK_FILE_PREFIX: &str = "nodes";
pub const DEPENDENCY_FILE_PREFIX: &str = "dependencies";
pub const TASK_OUTPUT_FILE: &str = "nodes.json";
pub const DEPENDENCY_OUTPUT_FILE: &str = "dependencies.json";

/// A record file holds either an array of records or one bare record.
///
/// The shape is picked from the first token so a bad record reports its own
/// field and position.
fn parse_records<T: DeserializeOwned>(bytes: &[u8]) -> serde_json::Result<Vec<T>> {
    match bytes.iter().find(|byte| !byte.is_ascii_whitespace()) {
        Some(b'[') => serde_json::from_slice(bytes),
        _ => serde_json::from_slice(bytes).map(|record| vec![record]),
    }
}

fn read_records<T: DeserializeOwned>(path: &Path) -> PersistenceResult<Vec<T>> {
    let bytes = fs::read(path).map_err(PersistenceError::io(path))?;
    let records: Vec<T> = parse_records(&bytes).map_err(PersistenceError::json(path))?;
    debug!(path = %path.display(), records = records.len(), "loaded record file");
    Ok(records)
}

/// `<prefix>*.json` files directly inside `dir`, sorted by name.
fn matching_files(dir: &Path, prefix: &str) -> PersistenceResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(PersistenceError::io(dir))? {
        let entry = entry.map_err(PersistenceError::io(dir))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if name.starts_with(prefix) && name.ends_with(".json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_all<T>(files: &[PathBuf]) -> PersistenceResult<Vec<T>>
where
    T: DeserializeOwned + Send,
{
    let batches = files
        .par_iter()
        .map(|path| read_records::<T>(path))
        .collect::<PersistenceResult<Vec<_>>>()?;
    Ok(batches.into_iter().flatten().collect())
}

pub fn load_tasks_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<Vec<TaskRecord>> {
    read_records(path.as_ref())
}

pub fn load_dependencies_from_json<P: AsRef<Path>>(
    path: P,
) -> PersistenceResult<Vec<DependencyRecord>> {
    read_records(path.as_ref())
}

/// Merges every `nodes*.json` and `dependencies*.json` file in `dir`.
///
/// Files are parsed in parallel and concatenated in file-name order.
pub fn load_batch_from_dir<P: AsRef<Path>>(dir: P) -> PersistenceResult<InputBatch> {
    let dir = dir.as_ref();
    let task_files = matching_files(dir, TASK_FILE_PREFIX)?;
    let dependency_files = matching_files(dir, DEPENDENCY_FILE_PREFIX)?;

    let (tasks, dependencies) = rayon::join(
        || load_all::<TaskRecord>(&task_files),
        || load_all::<DependencyRecord>(&dependency_files),
    );
    let batch = InputBatch::new(tasks?, dependencies?);

    info!(
        dir = %dir.display(),
        task_files = task_files.len(),
        dependency_files = dependency_files.len(),
        tasks = batch.tasks.len(),
        dependencies = batch.dependencies.len(),
        "loaded input batch"
    );
    Ok(batch)
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> PersistenceResult<()> {
    let file = File::create(path).map_err(PersistenceError::io(path))?;
    serde_json::to_writer_pretty(file, value)?;
    Ok(())
}

fn to_object<T: Serialize>(record: &T) -> PersistenceResult<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(object) => Ok(object),
        other => Err(PersistenceError::InvalidData(format!(
            "record did not serialize to an object: {other}"
        ))),
    }
}

fn insert_timing(object: &mut Map<String, Value>, entry: &SlackEntry) {
    object.insert("duration".into(), entry.duration.into());
    object.insert("earliestStart".into(), entry.earliest_start.into());
    object.insert("earliestFinish".into(), entry.earliest_finish.into());
    object.insert("latestStart".into(), entry.latest_start.into());
    object.insert("latestFinish".into(), entry.latest_finish.into());
    object.insert("slack".into(), entry.slack.into());
    object.insert("onCriticalPath".into(), entry.is_critical.into());
}

fn annotate_tasks(batch: &InputBatch, result: &CriticalPathResult) -> PersistenceResult<Vec<Value>> {
    let mut nodes = Vec::with_capacity(result.slack.len());

    for record in &batch.tasks {
        let mut object = to_object(record)?;
        let entry = record
            .key()
            .and_then(|key| result.slack_for(key))
            .ok_or_else(|| {
                PersistenceError::InvalidData(format!(
                    "task record {:?} has no computed schedule",
                    record.id
                ))
            })?;
        insert_timing(&mut object, entry);
        nodes.push(Value::Object(object));
    }

    for entry in result.slack.iter().filter(|entry| entry.placeholder) {
        let mut object = Map::new();
        object.insert("id".into(), entry.key.clone().into());
        object.insert("title".into(), entry.title.clone().into());
        object.insert("status".into(), MISSING_STATUS.into());
        insert_timing(&mut object, entry);
        nodes.push(Value::Object(object));
    }

    Ok(nodes)
}

fn annotate_dependencies(
    batch: &InputBatch,
    result: &CriticalPathResult,
) -> PersistenceResult<Vec<Value>> {
    if batch.dependencies.len() != result.edges.len() {
        return Err(PersistenceError::InvalidData(format!(
            "batch has {} dependencies but the result classifies {}",
            batch.dependencies.len(),
            result.edges.len()
        )));
    }

    batch
        .dependencies
        .iter()
        .zip(&result.edges)
        .map(|(record, edge)| {
            let mut object = to_object(record)?;
            object.insert("pathType".into(), edge.path_type.as_str().into());
            object.insert("onCriticalPath".into(), edge.is_critical().into());
            Ok(Value::Object(object))
        })
        .collect()
}

/// Writes `nodes.json` and `dependencies.json` into `dir`, creating it if needed.
///
/// Every input record keeps its original fields and gains the computed ones;
/// placeholder tasks are appended after the input tasks.
pub fn save_results_to_json<P: AsRef<Path>>(
    dir: P,
    batch: &InputBatch,
    result: &CriticalPathResult,
) -> PersistenceResult<()> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(PersistenceError::io(dir))?;

    let nodes = annotate_tasks(batch, result)?;
    let dependencies = annotate_dependencies(batch, result)?;

    write_json(&dir.join(TASK_OUTPUT_FILE), &nodes)?;
    write_json(&dir.join(DEPENDENCY_OUTPUT_FILE), &dependencies)?;

    info!(
        dir = %dir.display(),
        tasks = nodes.len(),
        dependencies = dependencies.len(),
        "saved critical path results"
    );
    Ok(())
}

/// Column order of [`SlackEntry`] as written to CSV.
pub const SLACK_CSV_HEADER: [&str; 11] = [
    "key",
    "title",
    "status",
    "duration",
    "earliest_start",
    "earliest_finish",
    "latest_start",
    "latest_finish",
    "slack",
    "is_critical",
    "placeholder",
];

/// Writes the slack table; the header is present even when there are no rows.
pub fn save_schedule_to_csv<P: AsRef<Path>>(
    result: &CriticalPathResult,
    path: P,
) -> PersistenceResult<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(SLACK_CSV_HEADER)?;
    for entry in &result.slack {
        writer.serialize(entry)?;
    }
    writer.flush().map_err(PersistenceError::io(path))?;
    Ok(())
}

pub fn load_policy_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<DurationPolicy> {
    let path = path.as_ref();
    let file = File::open(path).map_err(PersistenceError::io(path))?;
    serde_json::from_reader(BufReader::new(file)).map_err(PersistenceError::json(path))
}

pub fn save_policy_to_json<P: AsRef<Path>>(
    policy: &DurationPolicy,
    path: P,
) -> PersistenceResult<()> {
    write_json(path.as_ref(), policy)
}
