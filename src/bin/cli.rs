use clap::{Parser, ValueEnum};
use critical_path::{
    CriticalPathResult, DurationPolicy, PersistenceError, load_batch_from_dir,
    load_policy_from_json, save_results_to_json, save_schedule_to_csv,
};
use polars::prelude::{AnyValue, Column, DataFrame};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Results land here (relative to the input directory) unless `--output` is given,
/// so a rerun does not pick up its own `nodes.json`.
const DEFAULT_OUTPUT_DIR: &str = "critical-path";

#[derive(Parser, Debug)]
#[command(name = "critical-path")]
#[command(about = "Compute the critical path of a task dependency graph")]
#[command(version)]
struct Cli {
    #[arg(help = "Directory containing nodes*.json and dependencies*.json files")]
    dir: PathBuf,

    #[arg(long, value_enum, default_value = "basic", help = "Duration policy")]
    policy: PolicyArg,

    #[arg(long, help = "Duration policy JSON file (overrides --policy)")]
    config: Option<PathBuf>,

    #[arg(
        short,
        long,
        help = "Directory for annotated nodes.json and dependencies.json [default: <DIR>/critical-path]"
    )]
    output: Option<PathBuf>,

    #[arg(long, help = "Report only; do not write annotated records")]
    dry_run: bool,

    #[arg(long, help = "Write the slack table to this CSV file")]
    csv: Option<PathBuf>,

    #[arg(long, help = "Print the slack table")]
    table: bool,

    #[arg(
        short = 'l',
        long,
        default_value = "warn",
        help = "Log level used when RUST_LOG is unset"
    )]
    level: String,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PolicyArg {
    Basic,
    Weighted,
}

impl From<PolicyArg> for DurationPolicy {
    fn from(value: PolicyArg) -> Self {
        match value {
            PolicyArg::Basic => DurationPolicy::Basic,
            PolicyArg::Weighted => DurationPolicy::weighted(),
        }
    }
}

fn init_tracing(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(io::stderr)
        .with_target(false);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(layer)
        .init();
}

fn cell_text(col: &Column, row_idx: usize) -> String {
    match col.get(row_idx) {
        Ok(AnyValue::Null) | Err(_) => String::new(),
        Ok(AnyValue::Int64(v)) => v.to_string(),
        Ok(AnyValue::Boolean(v)) => v.to_string(),
        Ok(AnyValue::String(s)) => s.to_string(),
        Ok(av) => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    // Compute column widths
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for (ci, col) in columns.iter().enumerate() {
        for row_idx in 0..df.height() {
            widths[ci] = widths[ci].max(cell_text(col, row_idx).len());
        }
    }

    // Build horizontal separator
    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: Vec<String>| {
        let mut line = String::from("|");
        for (ci, cell) in cells.iter().enumerate() {
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(col_names.clone()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row_idx in 0..df.height() {
        let cells = columns.iter().map(|col| cell_text(col, row_idx)).collect();
        out.push_str(&render_row(cells));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_report(result: &CriticalPathResult) {
    let summary = result.summary();
    println!("Project duration : {}", result.project_duration);
    println!("Critical tasks   : {}", result.critical_tasks.join(", "));
    println!("Critical chain   : {}", result.chain.join(" -> "));
    if !result.warnings.is_empty() {
        let keys: Vec<&str> = result.warnings.iter().map(|w| w.key.as_str()).collect();
        println!("Placeholders     : {}", keys.join(", "));
    }
    if !result.flagged.is_empty() {
        println!("Flagged tasks    : {}", result.flagged.join(", "));
    }
    if let Some(entry) = result.most_slack() {
        println!("Most slack       : {} ({})", entry.key, entry.slack);
    }
    if let Some(entry) = result.least_slack() {
        println!("Least slack      : {} ({})", entry.key, entry.slack);
    }
    println!();
    println!("Summary:");
    println!(
        "  Critical tasks: {}/{}",
        summary.critical_count, summary.task_count
    );
    println!("  Critical edges: {}", summary.critical_edge_count);
    println!("  Parallel edges: {}", summary.parallel_edge_count);
}

fn run(cli: &Cli) -> Result<(), PersistenceError> {
    let policy = match &cli.config {
        Some(path) => load_policy_from_json(path)?,
        None => DurationPolicy::from(cli.policy),
    };

    let batch = load_batch_from_dir(&cli.dir)?;
    println!(
        "Loaded {} tasks and {} dependencies from {}",
        batch.tasks.len(),
        batch.dependencies.len(),
        cli.dir.display()
    );

    let result = batch.compute(&policy)?;
    print_report(&result);

    if cli.table {
        let df = result.to_dataframe()?;
        println!();
        print!("{}", render_df_as_text_table(&df));
    }

    if let Some(path) = &cli.csv {
        save_schedule_to_csv(&result, path)?;
        println!("Slack table saved to {}", path.display());
    }

    if cli.dry_run {
        println!("Dry run: no records written.");
        return Ok(());
    }

    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.dir.join(DEFAULT_OUTPUT_DIR));
    save_results_to_json(&output, &batch, &result)?;
    println!(
        "Saved {} tasks and {} dependencies to {}",
        result.slack.len(),
        result.edges.len(),
        output.display()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
