use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use good_neighbor::client::{BackendError, HttpBackend};
use good_neighbor::grid::{
    DropPosition, EditMode, Grid, GridView, JsonFileStore, RejectReason, ReorderOutcome,
};
use good_neighbor::widget::{NewWidget, Properties, PropertiesError, WidgetKind, WidgetProperties};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

type CliGrid = Grid<HttpBackend, JsonFileStore>;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("{0}")]
    LoadFailed(String),
    #[error("invalid properties: {0}")]
    Properties(#[from] PropertiesError),
    #[error("invalid --set value `{0}`; expected KEY=VALUE")]
    InvalidAssignment(String),
    #[error("unknown widget type `{0}` (expected iframe, shortcut, or query)")]
    UnknownKind(String),
    #[error("widget not found: {0}")]
    WidgetNotFound(Uuid),
    #[error("reorder rejected: {0}")]
    Rejected(#[from] RejectReason),
    #[error("{0}")]
    Failed(String),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "neighbor", about = "good-neighbor homepage CLI")]
struct Cli {
    #[arg(long, env = "NEIGHBOR_BASE_URL", default_value = "http://127.0.0.1:8000")]
    base_url: String,

    /// Local UI state (container order).
    #[arg(long, env = "NEIGHBOR_STATE_FILE", default_value = "neighbor-ui.json")]
    state_file: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the server is up.
    Ping,
    /// Show widget groups in display order.
    List,
    /// Add a widget.
    #[command(subcommand)]
    Add(AddCommand),
    /// Change widget properties. Values are parsed as JSON, falling back to
    /// plain strings.
    Edit {
        widget_id: Uuid,
        #[arg(long = "set", value_name = "KEY=VALUE", required = true)]
        assignments: Vec<String>,
    },
    Remove {
        widget_id: Uuid,
    },
    /// Drop one widget before (or after) another of the same type.
    Move {
        dragged: Uuid,
        target: Uuid,
        #[arg(long)]
        after: bool,
    },
    /// Drop one widget group before (or after) another.
    MoveGroup {
        dragged: String,
        target: String,
        #[arg(long)]
        after: bool,
    },
    #[command(subcommand)]
    Homepage(HomepageCommand),
}

#[derive(Subcommand, Debug)]
enum AddCommand {
    Iframe {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        width: Option<u32>,
        #[arg(long)]
        height: Option<u32>,
        #[arg(long)]
        refresh_interval: Option<u32>,
        #[arg(long)]
        position: Option<u32>,
    },
    Shortcut {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        position: Option<u32>,
    },
    Query {
        #[arg(long)]
        title: String,
        #[arg(long)]
        url_template: String,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        placeholder: Option<String>,
        #[arg(long)]
        position: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum HomepageCommand {
    List,
    Create {
        name: String,
        #[arg(long)]
        default: bool,
    },
    Rename {
        homepage_id: Uuid,
        name: String,
    },
    /// Make a homepage the default and show its widgets.
    Use {
        homepage_id: Uuid,
    },
    Delete {
        homepage_id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    tracing::debug!(base_url = %cli.base_url, state_file = %cli.state_file.display(), "neighbor starting");
    let backend = HttpBackend::new(&cli.base_url);

    match cli.command {
        Command::Ping => run_ping(&backend).await,
        Command::List => {
            let grid = open_grid(backend, &cli.state_file).await?;
            print_grid(&grid);
            Ok(())
        }
        Command::Add(add) => run_add(backend, &cli.state_file, add).await,
        Command::Edit { widget_id, assignments } => run_edit(backend, &cli.state_file, widget_id, &assignments).await,
        Command::Remove { widget_id } => {
            let mut grid = open_grid(backend, &cli.state_file).await?;
            if !grid.delete_widget(widget_id).await {
                return Err(notices_error(&mut grid));
            }
            println!("deleted {widget_id}");
            Ok(())
        }
        Command::Move { dragged, target, after } => {
            let mut grid = open_grid(backend, &cli.state_file).await?;
            let outcome = grid.drop_widget(dragged, target, drop_position(after)).await;
            finish_reorder(&mut grid, outcome)
        }
        Command::MoveGroup { dragged, target, after } => {
            let mut grid = open_grid(backend, &cli.state_file).await?;
            let outcome = grid.drop_container(parse_kind(&dragged)?, parse_kind(&target)?, drop_position(after));
            finish_reorder(&mut grid, outcome)
        }
        Command::Homepage(command) => run_homepage(backend, &cli.state_file, command).await,
    }
}

async fn run_ping(backend: &HttpBackend) -> Result<(), CliError> {
    let health = backend.health().await?;
    println!("{} {} ({})", health.service, health.version, health.status);
    Ok(())
}

/// Load the grid with edit mode on: every CLI gesture is an explicit edit.
async fn open_grid(backend: HttpBackend, state_file: &Path) -> Result<CliGrid, CliError> {
    let mut grid = Grid::new(backend, JsonFileStore::new(state_file), EditMode::new(true));
    grid.load().await;
    if let GridView::Failed { message } = grid.view() {
        return Err(CliError::LoadFailed(message.clone()));
    }
    Ok(grid)
}

// =============================================================================
// WIDGETS
// =============================================================================

async fn run_add(backend: HttpBackend, state_file: &Path, add: AddCommand) -> Result<(), CliError> {
    let (kind, fields, position) = match add {
        AddCommand::Iframe { title, url, width, height, refresh_interval, position } => (
            WidgetKind::Iframe,
            vec![
                ("title", Some(Value::from(title))),
                ("url", Some(Value::from(url))),
                ("width", width.map(Value::from)),
                ("height", height.map(Value::from)),
                ("refresh_interval", refresh_interval.map(Value::from)),
            ],
            position,
        ),
        AddCommand::Shortcut { title, url, icon, description, position } => (
            WidgetKind::Shortcut,
            vec![
                ("title", Some(Value::from(title))),
                ("url", Some(Value::from(url))),
                ("icon", icon.map(Value::from)),
                ("description", description.map(Value::from)),
            ],
            position,
        ),
        AddCommand::Query { title, url_template, icon, placeholder, position } => (
            WidgetKind::Query,
            vec![
                ("title", Some(Value::from(title))),
                ("url_template", Some(Value::from(url_template))),
                ("icon", icon.map(Value::from)),
                ("placeholder", placeholder.map(Value::from)),
            ],
            position,
        ),
    };
    let properties = build_properties(kind, fields)?;

    let mut grid = open_grid(backend, state_file).await?;
    let Some(created) = grid.create_widget(NewWidget { kind, properties, position }).await else {
        return Err(notices_error(&mut grid));
    };
    grid.take_events();
    println!("created {} {}", created.kind, created.id);
    print_grid(&grid);
    Ok(())
}

/// Collect the given fields into a property map, filling defaults and
/// validating through the typed record.
fn build_properties(kind: WidgetKind, fields: Vec<(&str, Option<Value>)>) -> Result<Properties, CliError> {
    let mut properties = Properties::new();
    for (key, value) in fields {
        if let Some(value) = value {
            properties.insert(key.to_owned(), value);
        }
    }
    Ok(WidgetProperties::from_map(kind, &properties)?.into_map())
}

async fn run_edit(
    backend: HttpBackend,
    state_file: &Path,
    widget_id: Uuid,
    assignments: &[String],
) -> Result<(), CliError> {
    let mut grid = open_grid(backend, state_file).await?;
    let widget = grid.widget(widget_id).ok_or(CliError::WidgetNotFound(widget_id))?;
    let kind = widget.kind;
    let mut properties = widget.properties.clone();
    for raw in assignments {
        let (key, value) = parse_assignment(raw)?;
        properties.insert(key, value);
    }
    let properties = WidgetProperties::from_map(kind, &properties)?.into_map();

    if !grid.update_widget(widget_id, properties).await {
        return Err(notices_error(&mut grid));
    }
    println!("updated {widget_id}");
    print_grid(&grid);
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(String, Value), CliError> {
    let Some((key, value)) = raw.split_once('=') else {
        return Err(CliError::InvalidAssignment(raw.to_owned()));
    };
    let key = key.trim();
    if key.is_empty() {
        return Err(CliError::InvalidAssignment(raw.to_owned()));
    }
    let value = serde_json::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

fn parse_kind(raw: &str) -> Result<WidgetKind, CliError> {
    WidgetKind::parse(raw).ok_or_else(|| CliError::UnknownKind(raw.to_owned()))
}

fn drop_position(after: bool) -> DropPosition {
    if after { DropPosition::After } else { DropPosition::Before }
}

fn finish_reorder(grid: &mut CliGrid, outcome: ReorderOutcome) -> Result<(), CliError> {
    match outcome {
        ReorderOutcome::Persisted => {
            print_grid(grid);
            Ok(())
        }
        ReorderOutcome::Failed => {
            let err = notices_error(grid);
            if !matches!(grid.view(), GridView::Failed { .. }) {
                print_grid(grid);
            }
            Err(err)
        }
        ReorderOutcome::Rejected(reason) => Err(reason.into()),
    }
}

fn notices_error(grid: &mut CliGrid) -> CliError {
    let messages: Vec<String> = grid.take_notices().into_iter().map(|n| n.message).collect();
    CliError::Failed(messages.join("; "))
}

// =============================================================================
// HOMEPAGES
// =============================================================================

async fn run_homepage(backend: HttpBackend, state_file: &Path, command: HomepageCommand) -> Result<(), CliError> {
    match command {
        HomepageCommand::List => {
            let homepages = backend.list_homepages().await?;
            for homepage in homepages {
                let marker = if homepage.is_default { "*" } else { " " };
                println!("{marker} {} {}", homepage.id, homepage.name);
            }
            Ok(())
        }
        HomepageCommand::Create { name, default } => {
            let homepage = backend.create_homepage(&name, default).await?;
            print_json(&serde_json::to_value(homepage)?)
        }
        HomepageCommand::Rename { homepage_id, name } => {
            let homepage = backend.rename_homepage(homepage_id, &name).await?;
            print_json(&serde_json::to_value(homepage)?)
        }
        HomepageCommand::Use { homepage_id } => {
            let homepage = backend.set_default_homepage(homepage_id).await?;
            println!("using {} {}", homepage.id, homepage.name);
            let mut grid = Grid::new(backend, JsonFileStore::new(state_file), EditMode::new(true));
            grid.homepage_changed().await;
            if let GridView::Failed { message } = grid.view() {
                return Err(CliError::LoadFailed(message.clone()));
            }
            print_grid(&grid);
            Ok(())
        }
        HomepageCommand::Delete { homepage_id } => {
            backend.delete_homepage(homepage_id).await?;
            println!("deleted {homepage_id}");
            Ok(())
        }
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

fn print_grid(grid: &CliGrid) {
    if grid.containers().is_empty() {
        println!("(no widgets)");
        return;
    }
    for container in grid.containers() {
        println!("== {} ({}) ==", container.kind(), container.widget_count());
        for widget in container.widgets() {
            let summary = match WidgetProperties::from_map(widget.kind, &widget.properties) {
                Ok(props) => props.summary(),
                Err(e) => format!("{} [invalid properties: {e}]", widget.title().unwrap_or("(untitled)")),
            };
            println!("  [{}] {}  {}", widget.position, widget.id, summary);
        }
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
