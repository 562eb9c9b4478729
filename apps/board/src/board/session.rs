use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::board::moves::DropEvent;
use crate::board::notification::Notification;
use crate::board::state::{Board, DropOutcome, IgnoreReason, MoveTicket, PendingMove, Settlement};
use crate::board::store::{BoardSource, StageStore};
use crate::errors::BoardError;
use crate::models::application::Application;

/// Result of one persistence call, delivered back to the session loop.
#[derive(Debug)]
pub struct MoveOutcome {
    pub pending: PendingMove,
    pub result: Result<(), BoardError>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Sent(MoveTicket),
    Ignored(IgnoreReason),
}

/// Drives a `Board`: applies drops, persists them on spawned tasks and
/// settles their outcomes. Persistence tasks never touch the board; they only
/// send a `MoveOutcome` back.
pub struct BoardSession {
    board: Board,
    store: Arc<dyn StageStore>,
    outcomes_tx: mpsc::UnboundedSender<MoveOutcome>,
    outcomes_rx: mpsc::UnboundedReceiver<MoveOutcome>,
}

impl BoardSession {
    pub fn new(board: Board, store: Arc<dyn StageStore>) -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            board,
            store,
            outcomes_tx,
            outcomes_rx,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Applies `event` optimistically and starts its persistence call.
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, event: DropEvent) -> Dispatch {
        let pending = match self.board.drop_card(event) {
            DropOutcome::Ignored(reason) => {
                debug!(
                    "Ignoring drop of application {}: {reason:?}",
                    event.application_id
                );
                return Dispatch::Ignored(reason);
            }
            DropOutcome::Applied(pending) => pending,
        };

        let ticket = pending.ticket;
        debug!(
            "Dispatching {ticket}: application {} -> {}",
            pending.application_id, pending.stage
        );
        let store = Arc::clone(&self.store);
        let tx = self.outcomes_tx.clone();

        tokio::spawn(async move {
            let result = store
                .update_stage(pending.application_id, pending.stage)
                .await;
            // Receiver gone means the session was dropped; nothing to settle.
            let _ = tx.send(MoveOutcome { pending, result });
        });

        Dispatch::Sent(ticket)
    }

    /// Waits for the next persistence result. Pending forever when nothing is
    /// in flight, so callers select it against other events.
    pub async fn next_outcome(&mut self) -> Option<MoveOutcome> {
        self.outcomes_rx.recv().await
    }

    pub fn settle(&mut self, outcome: MoveOutcome) -> (Settlement, Notification) {
        let MoveOutcome { pending, result } = outcome;
        let id = pending.application_id;

        match result {
            Ok(()) => {
                let settlement = self.board.settle(&pending, true);
                info!("Application {id} moved to {}", pending.stage);
                (settlement, Notification::stage_updated())
            }
            Err(e) => {
                warn!("Failed to update stage of application {id}: {e}");
                let settlement = self.board.settle(&pending, false);
                debug!("Rollback of application {id}: {settlement:?}");
                (settlement, Notification::stage_update_failed())
            }
        }
    }

    /// `next_outcome` followed by `settle`.
    pub async fn settle_next(&mut self) -> Option<(Settlement, Notification)> {
        let outcome = self.next_outcome().await?;
        Some(self.settle(outcome))
    }

    pub fn replace_snapshot(&mut self, snapshot: Arc<Vec<Application>>) -> bool {
        self.board.replace_snapshot(snapshot)
    }

    /// Fetches a fresh snapshot and makes it the working copy. On error the
    /// current working copy is kept.
    pub async fn reload(&mut self, source: &dyn BoardSource) -> Result<usize, BoardError> {
        let applications = source.fetch_board().await?;
        let count = applications.len();
        self.board.replace_snapshot(Arc::new(applications));
        info!("Board reloaded ({count} applications)");
        Ok(count)
    }
}
