//! Periodic poll loop.
//!
//! A [`Poller`] owns a single background worker that executes the poll
//! action serially on a fixed delay: the next tick is armed only after the
//! previous cycle completes, so no two cycles ever overlap. `start` from
//! idle spawns the worker and runs one immediate cycle; `start` while
//! running re-arms nothing but still triggers one out-of-band cycle.
//! `stop` is cooperative: an in-flight cycle runs to completion and only
//! future ticks are suppressed.
//!
//! The actual fetch→build→render pipeline lives in [`poll_once`]; the
//! poller itself executes a boxed async action so tests can wire counters
//! where the daemon wires the pipeline.

use crate::api::TasksClient;
use crate::config::WatchConfig;
use crate::error::Result;
use crate::notify::{self, NotificationSink};
use crate::tree::{self, DayBoundaries};
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Boxed future returned by a poll action.
pub type BoxFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

/// Callback executed once per poll cycle.
///
/// Receives the worker's cancellation token so the pipeline can check it
/// before the final render hand-off.
pub type PollAction = Arc<dyn Fn(CancellationToken) -> BoxFuture + Send + Sync>;

/// Poller state, tagged rather than sentinel handles.
enum PollState {
    Idle,
    Running {
        cancel: CancellationToken,
        poke_tx: mpsc::UnboundedSender<()>,
    },
}

/// Controller for the background poll loop.
pub struct Poller {
    period: Duration,
    action: PollAction,
    state: PollState,
}

impl Poller {
    /// Create a poller with the given fixed delay and poll action.
    pub fn new(period: Duration, action: PollAction) -> Self {
        Self {
            period,
            action,
            state: PollState::Idle,
        }
    }

    /// Returns `true` while the worker loop is armed.
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, PollState::Running { .. })
    }

    /// Start the poll loop.
    ///
    /// From idle this arms the fixed-delay worker and runs one immediate
    /// cycle. While running, the timer is left alone but one immediate
    /// out-of-band cycle is still triggered.
    pub fn start(&mut self) {
        match &self.state {
            PollState::Running { poke_tx, .. } => {
                debug!("poller already running, triggering immediate poll");
                let _ = poke_tx.send(());
            }
            PollState::Idle => {
                info!(period_secs = self.period.as_secs(), "starting poller");
                let cancel = CancellationToken::new();
                let (poke_tx, poke_rx) = mpsc::unbounded_channel();
                tokio::spawn(run_worker(
                    self.period,
                    Arc::clone(&self.action),
                    cancel.clone(),
                    poke_rx,
                ));
                self.state = PollState::Running { cancel, poke_tx };
            }
        }
    }

    /// Stop the poll loop.
    ///
    /// Cooperative: an in-flight cycle completes, no further ticks run.
    pub fn stop(&mut self) {
        if let PollState::Running { cancel, .. } = &self.state {
            info!("stopping poller");
            cancel.cancel();
        }
        self.state = PollState::Idle;
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_worker(
    period: Duration,
    action: PollAction,
    cancel: CancellationToken,
    mut poke_rx: mpsc::UnboundedReceiver<()>,
) {
    debug!("poll worker started");
    action(cancel.clone()).await;

    loop {
        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(period) => action(cancel.clone()).await,
            Some(()) = poke_rx.recv() => action(cancel.clone()).await,
        }
    }
    debug!("poll worker stopped");
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No list is selected; nothing was fetched or shown.
    NoSelection,
    /// The poller was stopped between fetch and render; nothing was shown.
    Cancelled,
    /// The notification was updated.
    Rendered,
}

/// Execute one fetch → build → render cycle.
///
/// Reloads the persisted selection, fetches the selected list's tasks,
/// builds the forest, and hands the rendered payload to the sink. With no
/// selection this is a silent no-op. Fetch failures propagate so the caller
/// can log and skip the cycle; the previous notification stands.
pub async fn poll_once(
    config_path: &Path,
    client: &TasksClient,
    sink: &dyn NotificationSink,
    cancel: &CancellationToken,
) -> Result<PollOutcome> {
    let config = WatchConfig::load_or_default(config_path)?;
    let Some(list_id) = config.selection.list_id else {
        debug!("no list selected, skipping poll cycle");
        return Ok(PollOutcome::NoSelection);
    };

    let records = client.list_tasks(&list_id).await?;
    let forest = tree::build_forest(records, &DayBoundaries::now());

    let mut payload = notify::render(config.selection.list_title.as_deref(), Some(&forest));
    payload.link = config.notify.link;

    if cancel.is_cancelled() {
        debug!("poller stopped mid-cycle, dropping render");
        return Ok(PollOutcome::Cancelled);
    }

    sink.show(&payload).await?;
    Ok(PollOutcome::Rendered)
}

/// Build the daemon's poll action around the real pipeline.
///
/// Cycle failures are logged and abort that cycle only; the next scheduled
/// tick proceeds normally.
pub fn pipeline_action(
    config_path: std::path::PathBuf,
    client: Arc<TasksClient>,
    sink: Arc<dyn NotificationSink>,
) -> PollAction {
    Arc::new(move |cancel| {
        let config_path = config_path.clone();
        let client = Arc::clone(&client);
        let sink = Arc::clone(&sink);
        Box::pin(async move {
            match poll_once(&config_path, &client, sink.as_ref(), &cancel).await {
                Ok(outcome) => debug!(?outcome, "poll cycle finished"),
                Err(e) => error!("poll cycle failed: {e}"),
            }
        })
    })
}
