use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use catalog::{ContentError, ContentLookup, InMemoryContentStore, NoContent};
use tracing::{info, warn};

type LoadResult = Result<InMemoryContentStore, ContentError>;

/// Content loaded off the frame thread and picked up at frame boundaries.
///
/// Until the load lands (or if it fails) every lookup resolves to empty.
pub struct ContentSlot {
    pending: Option<Receiver<LoadResult>>,
    store: Option<InMemoryContentStore>,
}

impl ContentSlot {
    pub fn spawn(projects: PathBuf, about: PathBuf) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            // The frame loop may already be gone; nothing to report then.
            let _ = tx.send(InMemoryContentStore::load(&projects, &about));
        });
        Self {
            pending: Some(rx),
            store: None,
        }
    }

    pub fn ready(store: InMemoryContentStore) -> Self {
        Self {
            pending: None,
            store: Some(store),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn is_loaded(&self) -> bool {
        self.store.is_some()
    }

    /// Picks up a finished load. Returns `true` when content just arrived.
    pub fn poll(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        match rx.try_recv() {
            Err(TryRecvError::Empty) => false,
            Ok(Ok(store)) => {
                info!(nodes = store.node_count(), "content loaded");
                self.store = Some(store);
                self.pending = None;
                true
            }
            Ok(Err(err)) => {
                warn!(%err, "content load failed; continuing without content");
                self.pending = None;
                false
            }
            Err(TryRecvError::Disconnected) => {
                warn!("content loader exited without a result");
                self.pending = None;
                false
            }
        }
    }

    /// Blocks until the load settles. Used by tests and `--wait-content`.
    pub fn wait(&mut self) -> bool {
        let Some(rx) = self.pending.take() else {
            return self.is_loaded();
        };
        match rx.recv() {
            Ok(Ok(store)) => {
                self.store = Some(store);
                true
            }
            Ok(Err(err)) => {
                warn!(%err, "content load failed; continuing without content");
                false
            }
            Err(_) => false,
        }
    }

    pub fn lookup(&self) -> &dyn ContentLookup {
        match &self.store {
            Some(store) => store as &dyn ContentLookup,
            None => &NoContent,
        }
    }
}
