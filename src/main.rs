//! LinkHub - live search and sensitive-content filtering for a link feed
//!
//! Command-line front end for the filter engine and the preference backend.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use linkhub::{
    config::LinkHubConfig,
    feed::Feed,
    filter::{Dismissal, FilterController, ToggleDecision},
    preference::{FileStorage, PreferenceStore, RemoteSyncClient},
    search::{HighlightMarker, SearchEngine},
    visibility::{GroupSelection, VisibilityCompositor},
};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "linkhub")]
#[command(version)]
#[command(about = "Live search and sensitive-content filtering for a link feed")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LINKHUB_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the feed and print visible items with highlights
    Search {
        /// Search text
        query: String,

        /// Feed file (JSON array of links)
        #[arg(short, long)]
        feed: PathBuf,

        /// Only show one category
        #[arg(long)]
        category: Option<String>,
    },

    /// Inspect or change the sensitive-content filter
    Filter {
        #[arg(value_enum)]
        action: FilterAction,

        /// Confirm revealing sensitive content without prompting
        #[arg(short, long)]
        yes: bool,

        /// Feed file used to report what becomes visible
        #[arg(short, long)]
        feed: Option<PathBuf>,
    },

    /// Run the preference backend
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,

        /// Feed file served under /api/links
        #[arg(short, long)]
        feed: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show default configuration
        #[arg(long)]
        default: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterAction {
    Status,
    Hide,
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("linkhub={},tower_http=info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match &cli.config {
        Some(path) => LinkHubConfig::from_file(path)?,
        None => LinkHubConfig::default(),
    };

    match cli.command {
        Commands::Search {
            query,
            feed,
            category,
        } => {
            run_search(&config, &feed, &query, category.as_deref())?;
        }
        Commands::Filter { action, yes, feed } => {
            run_filter(&config, action, yes, feed.as_deref()).await?;
        }
        Commands::Serve { host, port, feed } => {
            let mut server = config.server.clone();
            if let Some(host) = host {
                server.host = host;
            }
            if let Some(port) = port {
                server.port = port;
            }
            let feed = load_feed(feed.as_deref())?;
            linkhub::server::serve(&server, feed).await?;
        }
        Commands::Config { default } => {
            show_config(if default { None } else { Some(&config) })?;
        }
    }

    Ok(())
}

type ConsoleController =
    FilterController<console::ConsoleRender, console::ConsoleToasts, console::ConsolePrompt>;

fn build_controller(config: &LinkHubConfig, feed: Feed, sync: RemoteSyncClient) -> ConsoleController {
    let storage = FileStorage::new(config.storage.path());
    let store = PreferenceStore::new(Box::new(storage), config.storage.key.clone());
    let engine = SearchEngine::new(HighlightMarker::from(&config.search));

    FilterController::new(
        feed,
        store,
        sync,
        VisibilityCompositor::new(engine),
        console::ConsoleRender::default(),
        console::ConsoleToasts,
        console::ConsolePrompt,
    )
}

fn load_feed(path: Option<&Path>) -> Result<Feed> {
    Ok(match path {
        Some(path) => Feed::from_file(path)?,
        None => Feed::default(),
    })
}

fn run_search(
    config: &LinkHubConfig,
    feed: &Path,
    query: &str,
    category: Option<&str>,
) -> Result<()> {
    let feed = Feed::from_file(feed)?;
    let mut controller = build_controller(config, feed, RemoteSyncClient::disabled());
    controller.start();
    if let Some(category) = category {
        controller.select_group(GroupSelection::parse(category));
    }
    controller.set_query(query);

    print_plan(&controller);
    Ok(())
}

async fn run_filter(
    config: &LinkHubConfig,
    action: FilterAction,
    yes: bool,
    feed: Option<&Path>,
) -> Result<()> {
    let feed = load_feed(feed)?;
    let sync = RemoteSyncClient::from_config(&config.remote);
    let mut controller = build_controller(config, feed, sync);
    controller.start();

    let hide_sensitive = match action {
        FilterAction::Status => {
            print_status(&controller);
            return Ok(());
        }
        FilterAction::Hide => true,
        FilterAction::Show => false,
    };

    match controller.request(hide_sensitive) {
        ToggleDecision::AwaitConfirmation => {
            if yes || console::ask_yes_no()? {
                controller.confirm_reveal();
            } else {
                controller.cancel_reveal(Dismissal::CancelButton);
                println!("Cancelled; sensitive content stays hidden.");
            }
        }
        ToggleDecision::Aborted => {
            anyhow::bail!("Could not show the confirmation prompt");
        }
        ToggleDecision::Commit(_) | ToggleDecision::Ignored => {}
    }

    print_status(&controller);

    // Give the detached push a chance to land before the runtime shuts down
    if let Some(push) = controller.take_pending_push() {
        let timeout = config.remote.timeout() + Duration::from_secs(1);
        if tokio::time::timeout(timeout, push).await.is_err() {
            tracing::warn!("Remote preference push still pending at exit");
        }
    }
    Ok(())
}

fn print_status(controller: &ConsoleController) {
    let state = if controller.hide_sensitive() {
        "hidden"
    } else {
        "shown"
    };
    println!("Sensitive content: {}", state);
    if !controller.feed().is_empty() {
        println!(
            "Visible items: {}/{}",
            controller.visibility().visible_count(),
            controller.feed().len()
        );
    }
}

fn print_plan(controller: &ConsoleController) {
    let plan = controller.plan();
    if plan.no_results {
        println!("No results found");
        return;
    }

    for group in plan.groups.iter().filter(|g| g.visible) {
        println!("[{}]", group.group);
        for instruction in plan.items.iter().filter(|i| i.visible) {
            let in_group = controller
                .feed()
                .get(&instruction.id)
                .map_or(false, |item| item.group == group.group);
            if !in_group {
                continue;
            }
            println!("  {}", instruction.title);
            if !instruction.description.is_empty() {
                println!("    {}", instruction.description);
            }
        }
    }
}

fn show_config(config: Option<&LinkHubConfig>) -> Result<()> {
    let config = config.cloned().unwrap_or_default();
    let toml = toml::to_string_pretty(&config)?;
    println!("{}", toml);
    Ok(())
}

mod console {
    use super::*;
    use linkhub::filter::{
        ConfirmationSurface, FilterMarker, Notifier, RenderSurface, Severity, TextField,
        WarningNotice,
    };

    /// Terminal render surface; the plan is printed once the pass is done
    #[derive(Default)]
    pub struct ConsoleRender {
        marker: Option<FilterMarker>,
    }

    impl RenderSurface for ConsoleRender {
        fn set_item_visible(&mut self, id: &str, visible: bool) {
            tracing::trace!(id, visible, "item");
        }

        fn set_group_visible(&mut self, group: &str, visible: bool) {
            tracing::trace!(group, visible, "group");
        }

        fn replace_text(&mut self, _id: &str, _field: TextField, _text: &str) {}

        fn set_filter_marker(&mut self, marker: &FilterMarker) {
            if self.marker.as_ref() != Some(marker) {
                tracing::debug!(label = marker.label, icon = marker.icon, "Filter marker");
            }
            self.marker = Some(*marker);
        }
    }

    pub struct ConsoleToasts;

    impl Notifier for ConsoleToasts {
        fn notify(&mut self, message: &str, severity: Severity) {
            let tag = match severity {
                Severity::Success => "ok",
                Severity::Error => "error",
                Severity::Info => "info",
            };
            eprintln!("[{}] {}", tag, message);
        }
    }

    pub struct ConsolePrompt;

    impl ConfirmationSurface for ConsolePrompt {
        fn present(&mut self, notice: &WarningNotice) -> linkhub::Result<()> {
            let mut out = std::io::stdout().lock();
            writeln!(out, "{}", notice.title)?;
            writeln!(out, "{}", notice.message)?;
            writeln!(out, "This may include:")?;
            for kind in &notice.content_kinds {
                writeln!(out, "  - {}", kind)?;
            }
            writeln!(out, "{}", notice.prompt)?;
            out.flush()?;
            Ok(())
        }

        fn dismiss(&mut self) {}
    }

    /// Read a y/N answer; anything but yes declines
    pub fn ask_yes_no() -> Result<bool> {
        print!("[y/N] ");
        std::io::stdout().flush()?;
        let mut answer = String::new();
        std::io::stdin().lock().read_line(&mut answer)?;
        Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
    }
}
