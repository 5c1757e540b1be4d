//! Event hub. Terminal input, the one-second tick, data-directory changes
//! and finished background fetches all arrive on one unbounded channel, so
//! the app loop only ever awaits `EventHandler::next`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind, MouseEvent};
use futures::StreamExt;
use notify::Watcher;
use notify_debouncer_mini::DebounceEventResult;
use tokio::sync::mpsc::{self, UnboundedSender};

use farm_dashboard::model::{CropCatalog, CropProfile, DataFile};
use farm_dashboard::selection::SelectionTicket;
use farm_dashboard::source::SourceError;

const TICK: Duration = Duration::from_secs(1);
const DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    Mouse(MouseEvent),
    #[allow(dead_code)]
    Resize(u16, u16),
    /// Farm data files that changed on disk (already debounced)
    FilesChanged(Vec<PathBuf>),
    Tick,
    /// A profile lookup started by `begin_select` finished
    ProfileFetched {
        ticket: SelectionTicket,
        result: Result<Option<CropProfile>, SourceError>,
    },
    /// A live catalog fetch finished
    CatalogFetched {
        generation: u64,
        result: Result<CropCatalog, SourceError>,
    },
}

pub struct EventHandler {
    tx: UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// `watch_dir` is `None` when there is nothing on disk to watch.
    pub fn new(watch_dir: Option<PathBuf>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(forward_terminal(tx.clone()));
        tokio::spawn(tick(tx.clone()));
        if let Some(dir) = watch_dir {
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(e) = watch_data_dir(&dir, tx).await {
                    tracing::error!(dir = %dir.display(), error = %e, "file watcher failed");
                }
            });
        }

        Self { tx, rx }
    }

    /// Sender for background work (profile and catalog fetches) to report back on.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

async fn forward_terminal(tx: UnboundedSender<Event>) {
    let mut stream = EventStream::new();
    while let Some(Ok(raw)) = stream.next().await {
        let event = match raw {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            CrosstermEvent::Mouse(mouse) => Event::Mouse(mouse),
            CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
            _ => continue,
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}

async fn tick(tx: UnboundedSender<Event>) {
    let mut interval = tokio::time::interval(TICK);
    loop {
        interval.tick().await;
        if tx.send(Event::Tick).is_err() {
            return;
        }
    }
}

/// Watch the top level of `dir` only; the data files never live in
/// subdirectories.
async fn watch_data_dir(dir: &Path, tx: UnboundedSender<Event>) -> color_eyre::Result<()> {
    let (batch_tx, mut batch_rx) = mpsc::channel::<Vec<PathBuf>>(64);

    let mut debouncer = notify_debouncer_mini::new_debouncer(
        DEBOUNCE,
        move |result: DebounceEventResult| match result {
            Ok(events) => {
                let changed = farm_paths(events.into_iter().map(|e| e.path));
                if !changed.is_empty() {
                    let _ = batch_tx.blocking_send(changed);
                }
            }
            Err(e) => tracing::warn!(error = %e, "watch error"),
        },
    )?;
    debouncer
        .watcher()
        .watch(dir, notify::RecursiveMode::NonRecursive)?;
    tracing::debug!(dir = %dir.display(), "watching farm data");

    // The debouncer stops when dropped, so it lives for as long as this loop.
    while let Some(changed) = batch_rx.recv().await {
        if tx.send(Event::FilesChanged(changed)).is_err() {
            break;
        }
    }
    Ok(())
}

/// Keep only paths that name a farm data file, without duplicates.
fn farm_paths(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = Vec::new();
    for path in paths {
        if DataFile::from_path(&path).is_some() && !out.contains(&path) {
            out.push(path);
        }
    }
    out
}
