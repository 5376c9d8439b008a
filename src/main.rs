//! taskwatch CLI.
//!
//! `run` starts the polling daemon; the remaining subcommands manage the
//! persisted list selection and one-shot rendering. All tracing output goes
//! to stderr so stdout stays clean for command output.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use taskwatch::api::TasksClient;
use taskwatch::notify::{ConsoleSink, FileSink, NotificationSink};
use taskwatch::poller::{PollOutcome, Poller, pipeline_action, poll_once};
use taskwatch::{WatchConfig, paths};
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "taskwatch", version, about = "Watch a remote task list as a persistent notification")]
struct Cli {
    /// Config file path (defaults to the platform config directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the polling daemon until interrupted.
    Run,
    /// List the task lists available to the signed-in identity.
    Lists,
    /// Select the task list to watch.
    Select {
        /// List identifier; defaults to the first available list.
        list_id: Option<String>,
    },
    /// Run one poll cycle and print the notification.
    Show,
    /// Clear the persisted selection.
    SignOut,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(paths::config_path);

    match cli.command {
        Command::Run => run_daemon(config_path).await,
        Command::Lists => list_lists(&config_path).await,
        Command::Select { list_id } => select_list(&config_path, list_id).await,
        Command::Show => show_once(&config_path).await,
        Command::SignOut => sign_out(&config_path),
    }
}

async fn run_daemon(config_path: PathBuf) -> anyhow::Result<()> {
    let config = WatchConfig::load_or_default(&config_path)?;
    if !config.selection.is_selected() {
        tracing::warn!("no list selected; polls are no-ops until `taskwatch select` runs");
    }

    let client = Arc::new(TasksClient::new(&config.api));
    let sink: Arc<dyn NotificationSink> = match &config.notify.status_path {
        Some(path) => Arc::new(FileSink::new(path.clone())),
        None => Arc::new(ConsoleSink),
    };

    let mut poller = Poller::new(
        Duration::from_secs(config.poll.interval_secs),
        pipeline_action(config_path, client, sink),
    );
    poller.start();

    tokio::signal::ctrl_c().await?;
    poller.stop();
    tracing::info!("taskwatch shut down cleanly");
    Ok(())
}

async fn list_lists(config_path: &std::path::Path) -> anyhow::Result<()> {
    let config = WatchConfig::load_or_default(config_path)?;
    let client = TasksClient::new(&config.api);

    let Some(lists) = client.list_task_lists().await? else {
        println!(
            "Not signed in: no credential configured ([api.token] in {})",
            config_path.display()
        );
        return Ok(());
    };

    if lists.is_empty() {
        println!("No task lists.");
        return Ok(());
    }

    for list in lists {
        let marker = if config.selection.list_id.as_deref() == Some(list.id.as_str()) {
            '*'
        } else {
            ' '
        };
        println!("{marker} {}  {}", list.id, list.title);
    }
    Ok(())
}

async fn select_list(config_path: &std::path::Path, list_id: Option<String>) -> anyhow::Result<()> {
    let mut config = WatchConfig::load_or_default(config_path)?;
    let client = TasksClient::new(&config.api);

    let Some(lists) = client.list_task_lists().await? else {
        anyhow::bail!("not signed in: no credential configured");
    };

    let chosen = match list_id {
        Some(id) => lists
            .into_iter()
            .find(|list| list.id == id)
            .ok_or_else(|| anyhow::anyhow!("no task list with id {id}"))?,
        None => lists
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no task lists available"))?,
    };

    tracing::debug!(list_id = %chosen.id, title = %chosen.title, "persisting selection");
    config.select_list(&chosen.id, &chosen.title);
    config.save_to_file(config_path)?;
    println!("Watching \"{}\" ({})", chosen.title, chosen.id);
    Ok(())
}

async fn show_once(config_path: &std::path::Path) -> anyhow::Result<()> {
    let config = WatchConfig::load_or_default(config_path)?;
    let client = TasksClient::new(&config.api);

    let outcome = poll_once(config_path, &client, &ConsoleSink, &CancellationToken::new()).await?;
    if outcome == PollOutcome::NoSelection {
        println!("No list selected. Run `taskwatch select` first.");
    }
    Ok(())
}

fn sign_out(config_path: &std::path::Path) -> anyhow::Result<()> {
    let mut config = WatchConfig::load_or_default(config_path)?;
    config.clear_selection();
    config.save_to_file(config_path)?;
    println!("Selection cleared.");
    Ok(())
}
