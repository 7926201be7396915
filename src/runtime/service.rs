// ABOUTME: Tracker actor consuming a single event queue on a tokio task
// ABOUTME: Publishes snapshots over a watch channel and shuts down gracefully on request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Geopace Contributors

use geopace_core::models::{TrackerCommand, TrackerEvent};
use geopace_core::{TrackingError, TrackingResult};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::router::Tracker;
use crate::tracking::TrackerSnapshot;

/// Cloneable producer side of the tracker's event queue
#[derive(Debug, Clone)]
pub struct EventSender {
    inner: mpsc::Sender<TrackerEvent>,
}

impl EventSender {
    /// Queue an event, waiting for capacity
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::ChannelClosed` if the tracker is gone
    pub async fn post(&self, event: TrackerEvent) -> TrackingResult<()> {
        self.inner
            .send(event)
            .await
            .map_err(|_| TrackingError::ChannelClosed)
    }

    /// Whether the tracker stopped consuming
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

/// Bounded event queue
#[must_use]
pub fn event_channel(capacity: usize) -> (EventSender, mpsc::Receiver<TrackerEvent>) {
    let (inner, receiver) = mpsc::channel(capacity);
    (EventSender { inner }, receiver)
}

/// Runs a [`Tracker`] as a tokio actor
pub struct TrackerService;

impl TrackerService {
    /// Move `tracker` onto its own task, consuming `events`
    ///
    /// `sender` must feed `events`; it is handed out through the returned
    /// handle so callers and collaborators share one queue.
    #[must_use]
    pub fn spawn(
        tracker: Tracker,
        sender: EventSender,
        events: mpsc::Receiver<TrackerEvent>,
    ) -> TrackerHandle {
        let (snapshot_tx, snapshot_rx) = watch::channel(tracker.snapshot());
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
        let task = tokio::spawn(Self::run(tracker, events, shutdown_rx, snapshot_tx));

        TrackerHandle {
            events: sender,
            snapshots: snapshot_rx,
            shutdown_tx,
            task,
        }
    }

    async fn run(
        mut tracker: Tracker,
        mut events: mpsc::Receiver<TrackerEvent>,
        mut shutdown_rx: mpsc::Receiver<()>,
        snapshots: watch::Sender<TrackerSnapshot>,
    ) -> Tracker {
        info!("Tracker service started");
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => {
                    debug!("Tracker service received shutdown signal");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        debug!("Event queue closed");
                        break;
                    };
                    if let Err(error) = tracker.dispatch(event) {
                        warn!(%error, "Event handling failed");
                    }
                    snapshots.send_replace(tracker.snapshot());
                }
            }
        }

        // Release every platform registration before handing the tracker back
        if let Err(error) = tracker.dispatch(TrackerEvent::command(TrackerCommand::Stop)) {
            warn!(%error, "Failed to stop tracker during shutdown");
        }
        snapshots.send_replace(tracker.snapshot());
        info!("Tracker service stopped");
        tracker
    }
}

/// Caller side of a running [`TrackerService`]
#[derive(Debug)]
pub struct TrackerHandle {
    events: EventSender,
    snapshots: watch::Receiver<TrackerSnapshot>,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<Tracker>,
}

impl TrackerHandle {
    /// Queue producer for collaborators and callers
    #[must_use]
    pub fn sender(&self) -> EventSender {
        self.events.clone()
    }

    /// Queue an event
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::ChannelClosed` if the service has stopped
    pub async fn post(&self, event: TrackerEvent) -> TrackingResult<()> {
        self.events.post(event).await
    }

    /// Latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Snapshot stream
    #[must_use]
    pub fn watch_snapshots(&self) -> watch::Receiver<TrackerSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the service and return the tracker
    ///
    /// Events already queued ahead of the signal may be dropped.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::SchedulerUnavailable` if the task panicked or
    /// was cancelled
    pub async fn shutdown(self) -> TrackingResult<Tracker> {
        if self.shutdown_tx.send(()).await.is_err() {
            debug!("Tracker service already stopped");
        }
        self.task
            .await
            .map_err(|e| TrackingError::scheduler_unavailable(format!("tracker task failed: {e}")))
    }
}
