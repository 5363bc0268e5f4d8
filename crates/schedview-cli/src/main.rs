//! schedview CLI - Dual-pane Gantt view
//!
//! Converts task lists to bars, renders the dual-pane page and edits the
//! persisted column preferences.

mod config;
mod store;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use schedview_core::columns::{self, CATALOG};
use schedview_core::prefs;
use schedview_core::{to_bars, ColumnPreferences, ScheduleTask, ViewMode, VisibleColumns};
use schedview_render::{GanttTheme, GanttView, PaneLayout};

use crate::config::Config;
use crate::store::FileStore;

#[derive(Parser)]
#[command(name = "schedview")]
#[command(author, version, about = "Dual-pane schedule (Gantt) view", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./schedview.toml when present)
    #[arg(long, value_name = "FILE", global = true, env = "SCHEDVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the bar representation of a task list as JSON
    Bars {
        /// Task list (JSON array)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Pretty-print the output
        #[arg(long)]
        pretty: bool,
    },

    /// Render the dual-pane page to a standalone HTML file
    Render {
        /// Task list (JSON array)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// View mode (day, week, month)
        #[arg(short, long)]
        mode: Option<ViewMode>,

        /// Hide the legend
        #[arg(long)]
        no_legend: bool,

        /// Viewport width in pixels
        #[arg(long)]
        width: Option<u32>,

        /// Pane container height in pixels
        #[arg(long)]
        height: Option<u32>,

        /// Color theme (light, dark)
        #[arg(long)]
        theme: Option<String>,

        /// Page title
        #[arg(long)]
        title: Option<String>,
    },

    /// Show or edit the visible table columns
    Columns {
        #[command(subcommand)]
        action: Option<ColumnAction>,
    },
}

#[derive(Subcommand)]
enum ColumnAction {
    /// List catalog columns and their visibility
    List,
    /// Show or hide a column
    Toggle {
        /// Column id (see `columns list`)
        id: String,
    },
    /// Move a visible column
    Move {
        /// Current position in the visible list
        from: usize,
        /// Target position in the visible list
        to: usize,
    },
    /// Restore the default columns
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Bars { file, pretty } => cmd_bars(&file, pretty),
        Commands::Render {
            file,
            output,
            mode,
            no_legend,
            width,
            height,
            theme,
            title,
        } => {
            let mut config = config;
            if let Some(mode) = mode {
                config.view.mode = mode;
            }
            if no_legend {
                config.view.legend = false;
            }
            if let Some(width) = width {
                config.layout.viewport_width = width;
            }
            if let Some(height) = height {
                config.layout.container_height = height;
            }
            if let Some(theme) = theme {
                config.view.theme = theme;
            }
            if title.is_some() {
                config.view.title = title;
            }
            cmd_render(&file, &output, &config)
        }
        Commands::Columns { action } => {
            cmd_columns(action.unwrap_or(ColumnAction::List), &config)
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_tasks(path: &Path) -> Result<Vec<ScheduleTask>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let tasks: Vec<ScheduleTask> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a task list", path.display()))?;
    info!(tasks = tasks.len(), file = %path.display(), "tasks loaded");
    Ok(tasks)
}

fn cmd_bars(file: &Path, pretty: bool) -> Result<()> {
    let bars = to_bars(&load_tasks(file)?);
    let json = if pretty {
        serde_json::to_string_pretty(&bars)?
    } else {
        serde_json::to_string(&bars)?
    };
    println!("{json}");
    Ok(())
}

fn cmd_render(file: &Path, output: &Path, config: &Config) -> Result<()> {
    let tasks = load_tasks(file)?;
    let Some(theme) = GanttTheme::named(&config.view.theme) else {
        bail!("unknown theme '{}' (expected light or dark)", config.view.theme);
    };

    let store = FileStore::new(&config.preferences.path);
    let mut view = GanttView::new(store)
        .view_mode(config.view.mode)
        .legend(config.view.legend)
        .layout(PaneLayout::from(config.layout))
        .theme(theme);
    if let Some(title) = &config.view.title {
        view = view.title(title.clone());
    }

    view.set_tasks(tasks);
    let html = view.render_page();
    if view.is_degraded() {
        warn!("timeline could not be drawn; page contains the table only");
    }

    fs::write(output, html).with_context(|| format!("failed to write {}", output.display()))?;
    println!(
        "Rendered {} tasks ({} view) to {}",
        view.tasks().len(),
        view.toolbar().mode,
        output.display()
    );
    Ok(())
}

fn cmd_columns(action: ColumnAction, config: &Config) -> Result<()> {
    let store = FileStore::new(&config.preferences.path);
    let mut preferences = ColumnPreferences::open(store);

    let changed = match action {
        ColumnAction::List => {
            print_columns(&preferences);
            return Ok(());
        }
        ColumnAction::Toggle { id } => {
            if !columns::is_known(&id) {
                bail!("unknown column '{id}' (see `schedview columns list`)");
            }
            let changed = preferences.toggle(&id);
            if !changed {
                println!(
                    "'{id}' stays visible (mandatory, or the table would drop below {} columns)",
                    VisibleColumns::MIN_LEN
                );
            }
            changed
        }
        ColumnAction::Move { from, to } => {
            let len = preferences.columns().len();
            if from >= len {
                bail!("position {from} is out of range (0..{len})");
            }
            preferences.reorder(from, to)
        }
        ColumnAction::Reset => preferences.reset(),
    };

    if changed {
        let stored = prefs::load(preferences.store());
        if stored.as_ref() != Some(preferences.columns()) {
            bail!(
                "failed to save column preferences to {}",
                preferences.store().path().display()
            );
        }
    }
    print_columns(&preferences);
    Ok(())
}

fn print_columns(preferences: &ColumnPreferences<FileStore>) {
    let visible = preferences.columns();
    for (index, id) in visible.iter().enumerate() {
        if let Some(column) = columns::get(id) {
            let lock = if columns::is_mandatory(id) { " (fixed)" } else { "" };
            println!("[x] {index:>2} {:<14} {}{lock}", column.id, column.label);
        }
    }
    for column in CATALOG.iter().filter(|c| !visible.contains(c.id)) {
        println!("[ ]    {:<14} {}", column.id, column.label);
    }
}
