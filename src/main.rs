//! tablestate - Entry Point

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tablestate::config::TableConfig;
use tablestate::model::{AppError, ColumnKind, ColumnSpec, SortDirection};
use tablestate::persistence::{JsonFileStore, MemoryStore, StateStore};
use tablestate::source::FileSource;
use tablestate::Table;
use tracing::{info, warn};

/// One `--sort` argument: `field`, `field:asc` or `field:desc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortArg {
    pub field: String,
    pub dir: SortDirection,
}

fn parse_sort_arg(raw: &str) -> Result<SortArg, String> {
    let (field, dir) = match raw.rsplit_once(':') {
        Some((field, dir)) => {
            let dir = match dir.to_ascii_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => return Err(format!("unknown sort direction {other:?}, expected asc or desc")),
            };
            (field, dir)
        }
        None => (raw, SortDirection::Asc),
    };
    if field.trim().is_empty() {
        return Err("sort field must not be empty".to_string());
    }
    Ok(SortArg {
        field: field.to_string(),
        dir,
    })
}

/// Inspect a table's view state offline
#[derive(Parser, Debug)]
#[command(name = "tablestate")]
#[command(version)]
#[command(about = "Render the visible page of a data table from a JSON data file")]
pub struct Args {
    /// JSON data file: `{ "rows": [...], "filteredTotal": n }` or a plain array of rows
    pub data: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// JSON file holding persisted table state (kept in memory if not provided)
    #[arg(long)]
    pub state: Option<PathBuf>,

    /// Search query to apply
    #[arg(short, long)]
    pub query: Option<String>,

    /// Sort key `field[:asc|:desc]`; repeat for secondary keys
    #[arg(short, long = "sort", value_parser = parse_sort_arg)]
    pub sort: Vec<SortArg>,

    /// Rows per page
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub per_page: Option<u32>,

    /// 1-based page to show
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,

    /// Serve the data file one page per request instead of loading it all
    #[arg(long)]
    pub paged: bool,

    /// Log file path
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// String columns named after the first row's fields, for data files used
/// without a configured column list.
fn infer_columns(source: &FileSource) -> Vec<ColumnSpec> {
    let Some(first) = source.rows().first() else {
        return Vec::new();
    };
    first
        .keys()
        .filter_map(|field| ColumnSpec::new(field.as_str(), ColumnKind::String).ok())
        .collect()
}

/// Serve every load the last operation issued.
fn settle(table: &mut Table, source: &mut FileSource) -> Result<(), AppError> {
    table.run_pending(source);
    match table.engine().last_error() {
        Some(error) => Err(AppError::Fetch(error.clone())),
        None => Ok(()),
    }
}

fn apply_sorts(table: &mut Table, source: &mut FileSource, sorts: &[SortArg]) -> Result<(), AppError> {
    for (position, sort) in sorts.iter().enumerate() {
        let multi_key = position > 0;
        if !table.on_header_click(&sort.field, multi_key) {
            warn!(field = %sort.field, "Column cannot be sorted, skipping");
            continue;
        }
        settle(table, source)?;
        if sort.dir == SortDirection::Desc {
            table.on_header_click(&sort.field, multi_key);
            settle(table, source)?;
        }
    }
    Ok(())
}

fn state_store(config: &TableConfig, path: Option<PathBuf>) -> Result<StateStore, AppError> {
    Ok(match path {
        Some(path) => StateStore::key_value(&config.id, JsonFileStore::open(path)?),
        None => StateStore::key_value(&config.id, MemoryStore::new()),
    })
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = {
        let config_file = tablestate::config::load_config_with_precedence(args.config.clone())?;
        let merged = tablestate::config::merge_config(config_file)?;
        let mut config = tablestate::config::apply_env_overrides(merged);
        if let Some(log_file) = args.log_file.clone() {
            config.log_file_path = log_file;
        }
        if args.paged {
            config.load_all_data = false;
        }
        config
    };

    tablestate::logging::init(&config.log_file_path)?;

    let mut source = FileSource::open(&args.data)?.paged(args.paged);
    let config = if config.columns.is_empty() {
        TableConfig {
            columns: infer_columns(&source),
            ..config
        }
    } else {
        config
    };
    info!(
        table = %config.id,
        data = %args.data.display(),
        rows = source.row_count(),
        "Configuration loaded and resolved"
    );

    let store = state_store(&config, args.state.clone())?;
    let mut table = Table::new(config, store)?;
    settle(&mut table, &mut source)?;

    if let Some(per_page) = args.per_page {
        table.set_items_per_page(per_page as usize);
        settle(&mut table, &mut source)?;
    }
    if let Some(query) = &args.query {
        table.set_search_query(query);
        settle(&mut table, &mut source)?;
    }
    apply_sorts(&mut table, &mut source, &args.sort)?;
    if let Some(page) = args.page {
        if !table.change_page(page as usize) {
            warn!(page, page_total = table.engine().page_total(), "Page out of range");
        }
        settle(&mut table, &mut source)?;
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(table.render_text().as_bytes())?;
    stdout.flush()?;
    Ok(())
}
