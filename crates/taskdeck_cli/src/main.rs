//! Command line front end for taskdeck.
//!
//! # Responsibility
//! - Trim and validate user input before it reaches the store.
//! - Gate destructive bulk commands behind `--yes`.
//! - Render store views as text or JSON.

use clap::{Parser, Subcommand};
use log::info;
use std::error::Error;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use taskdeck_core::config::{normalize_db_path, normalize_slot_key};
use taskdeck_core::{
    init_logging, Clock, Filter, Item, ItemId, ItemPatch, LogLevel, LogTarget,
    PersistenceAdapter, SlotStore, SqliteSlotStore, TaskStore, TaskdeckConfig,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "taskdeck: a local task list", long_about = None)]
struct Cli {
    /// SQLite file holding the task slot.
    #[arg(long, global = true, env = "TASKDECK_DB_PATH")]
    db: Option<PathBuf>,

    /// Slot key inside the database.
    #[arg(long, global = true, env = "TASKDECK_SLOT_KEY")]
    slot: Option<String>,

    /// Log level (trace|debug|info|warn|error).
    #[arg(long, global = true, env = "TASKDECK_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when unset.
    #[arg(long, global = true, env = "TASKDECK_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a task.
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit a task's title or description.
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "clear_description")]
        description: Option<String>,
        #[arg(long)]
        clear_description: bool,
    },
    /// Toggle a task between open and completed.
    Done { id: String },
    /// Toggle a task in or out of the archive.
    Archive { id: String },
    /// Delete a task.
    Rm { id: String },
    /// Delete every completed task.
    ClearCompleted {
        #[arg(long)]
        yes: bool,
    },
    /// Delete every archived task.
    ClearArchived {
        #[arg(long)]
        yes: bool,
    },
    /// List tasks.
    List {
        #[arg(short, long, default_value = "all")]
        filter: Filter,
        #[arg(long)]
        json: bool,
    },
    /// Show per-filter counts.
    Counts,
    /// Remove the stored task list entirely.
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

const EXIT_REFUSED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<u8, Box<dyn Error>> {
    let config = resolve_config(&cli)?;
    init_logging(&config.log)?;
    info!(
        "event=cli_start module=cli status=ok db={} slot={}",
        config.db_path.display(),
        config.slot_key
    );

    let slot = SqliteSlotStore::open(&config.db_path)?;
    let adapter = PersistenceAdapter::with_key(slot, config.slot_key.as_str());
    execute(cli.command, adapter, &mut io::stdout().lock())
}

impl Command {
    /// Name of a destructive command issued without `--yes`.
    fn unconfirmed(&self) -> Option<&'static str> {
        match self {
            Self::ClearCompleted { yes: false } => Some("clear-completed"),
            Self::ClearArchived { yes: false } => Some("clear-archived"),
            Self::Reset { yes: false } => Some("reset"),
            _ => None,
        }
    }
}

fn execute<S: SlotStore + 'static>(
    command: Command,
    adapter: PersistenceAdapter<S>,
    out: &mut impl Write,
) -> Result<u8, Box<dyn Error>> {
    if let Some(name) = command.unconfirmed() {
        eprintln!("{name} deletes tasks permanently; re-run with --yes to confirm");
        return Ok(EXIT_REFUSED);
    }

    if let Command::Reset { .. } = command {
        adapter.clear()?;
        writeln!(out, "task list removed")?;
        return Ok(0);
    }

    let mut store = TaskStore::open(adapter);
    match command {
        Command::Add { title, description } => {
            let title = title.trim();
            if title.is_empty() {
                return Err("title cannot be empty".into());
            }
            let description = description.map(|text| text.trim().to_string());
            match store.create(title, description) {
                Some(id) => writeln!(out, "{id}")?,
                None => return Err("task was not created".into()),
            }
        }
        Command::Edit {
            id,
            title,
            description,
            clear_description,
        } => {
            let id = resolve_id(&store, &id)?;
            let mut patch = ItemPatch::new();
            if let Some(title) = title {
                let title = title.trim();
                if title.is_empty() {
                    return Err("title cannot be empty".into());
                }
                patch = patch.title(title);
            }
            if clear_description {
                patch = patch.description(None);
            } else if let Some(description) = description {
                patch = patch.description(Some(description.trim().to_string()));
            }
            if patch.is_empty() {
                return Err("nothing to edit; pass --title or --description".into());
            }
            store.update(id, patch);
            write_item(out, store.get(id))?;
        }
        Command::Done { id } => {
            let id = resolve_id(&store, &id)?;
            store.toggle_complete(id);
            write_item(out, store.get(id))?;
        }
        Command::Archive { id } => {
            let id = resolve_id(&store, &id)?;
            store.toggle_archive(id);
            write_item(out, store.get(id))?;
        }
        Command::Rm { id } => {
            let id = resolve_id(&store, &id)?;
            store.delete(id);
            writeln!(out, "deleted {id}")?;
        }
        Command::ClearCompleted { .. } => {
            writeln!(out, "removed {}", store.clear_completed())?;
        }
        Command::ClearArchived { .. } => {
            writeln!(out, "removed {}", store.clear_archived())?;
        }
        Command::List { filter, json } => {
            let items = store.view(filter);
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(&items)?)?;
            } else if items.is_empty() {
                writeln!(out, "no {filter} tasks")?;
            } else {
                for item in items {
                    writeln!(out, "{}", format_item(item))?;
                }
            }
        }
        Command::Counts => {
            let counts = store.counts();
            for filter in Filter::ALL {
                writeln!(out, "{filter:<10} {}", counts.get(filter))?;
            }
        }
        Command::Reset { .. } => {}
    }

    Ok(0)
}

fn resolve_config(cli: &Cli) -> Result<TaskdeckConfig, Box<dyn Error>> {
    // Warn by default so command output stays clean on stderr.
    let mut config = TaskdeckConfig::default();
    config.log.level = LogLevel::Warn;
    if let Some(db) = &cli.db {
        config.db_path = normalize_db_path(&db.to_string_lossy())?;
    }
    if let Some(slot) = &cli.slot {
        config.slot_key = normalize_slot_key(slot)?;
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.parse()?;
    }
    if let Some(dir) = &cli.log_dir {
        config.log.target = LogTarget::directory(dir)?;
    }
    Ok(config)
}

/// Accepts a full id or an unambiguous prefix of one, naming an existing task.
fn resolve_id<C: Clock>(store: &TaskStore<C>, raw: &str) -> Result<ItemId, Box<dyn Error>> {
    let needle = raw.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err("task id cannot be empty".into());
    }
    if let Ok(id) = ItemId::parse_str(&needle) {
        return match store.get(id) {
            Some(_) => Ok(id),
            None => Err(format!("no task with id `{id}`").into()),
        };
    }

    let mut matches = store
        .list()
        .iter()
        .map(|item| item.id)
        .filter(|id| id.to_string().starts_with(&needle))
        .collect::<Vec<_>>();
    match matches.len() {
        0 => Err(format!("no task matches `{needle}`").into()),
        1 => Ok(matches.remove(0)),
        n => Err(format!("`{needle}` is ambiguous ({n} tasks match)").into()),
    }
}

fn write_item(out: &mut impl Write, item: Option<&Item>) -> io::Result<()> {
    match item {
        Some(item) => writeln!(out, "{}", format_item(item)),
        None => Ok(()),
    }
}

fn format_item(item: &Item) -> String {
    let mark = if item.completed { "x" } else { " " };
    let short_id: String = item.id.simple().to_string().chars().take(8).collect();
    let archived = if item.archived { " (archived)" } else { "" };
    let line = format!("[{mark}] {short_id} {}{archived}", item.title);
    match &item.description {
        Some(description) => format!("{line} - {description}"),
        None => line,
    }
}
