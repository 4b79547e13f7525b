//! Connectivity state shared between the engine's components
//!
//! The observer owns the only writer. Everyone else holds a read-only
//! [`ConnectivitySignal`] and can await transitions.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Platform connectivity notification
#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityEvent {
    Online,
    Offline,
}

/// Owner of the connectivity flag
#[derive(Clone)]
pub struct ConnectivityObserver {
    tx: Arc<watch::Sender<bool>>,
}

impl ConnectivityObserver {
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx: Arc::new(tx) }
    }

    /// Read-only handle for consumers
    pub fn signal(&self) -> ConnectivitySignal {
        ConnectivitySignal {
            rx: self.tx.subscribe(),
        }
    }

    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Update the flag. Returns whether the value changed.
    pub fn set_online(&self, online: bool) -> bool {
        let changed = self.tx.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        });

        if changed {
            log::info!(
                "Connectivity changed: {}",
                if online { "online" } else { "offline" }
            );
        }
        changed
    }

    /// Apply a stream of platform events to the flag until it ends
    #[allow(dead_code)]
    pub fn bind<S>(&self, events: S) -> JoinHandle<()>
    where
        S: Stream<Item = ConnectivityEvent> + Send + 'static,
    {
        let observer = self.clone();
        tokio::spawn(async move {
            let mut events = Box::pin(events);
            while let Some(event) = events.next().await {
                observer.set_online(event == ConnectivityEvent::Online);
            }
        })
    }
}

/// Read-only view of the connectivity flag
#[derive(Clone)]
pub struct ConnectivitySignal {
    rx: watch::Receiver<bool>,
}

impl ConnectivitySignal {
    pub fn is_online(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the next change. `None` once the observer is gone.
    #[allow(dead_code)]
    pub async fn changed(&mut self) -> Option<bool> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Wait for the next offline to online transition. Returns `false` if
    /// the observer is dropped first.
    #[allow(dead_code)]
    pub async fn reconnected(&mut self) -> bool {
        loop {
            match self.changed().await {
                Some(true) => return true,
                Some(false) => continue,
                None => return false,
            }
        }
    }
}
