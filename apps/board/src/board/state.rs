use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::board::grouping::{self, Column};
use crate::board::moves::{self, DropEvent, Slot};
use crate::models::application::{Application, Stage, StageTag};

/// Identifies one optimistic move until its persistence call settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveTicket(u64);

impl fmt::Display for MoveTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "move#{}", self.0)
    }
}

/// An optimistic move awaiting its persistence result.
#[derive(Debug, Clone)]
pub struct PendingMove {
    pub ticket: MoveTicket,
    pub epoch: u64,
    pub application_id: i64,
    pub stage: Stage,
    /// Working copy right before the move was applied.
    before: Arc<Vec<Application>>,
    /// Working copy right after the move was applied.
    after: Arc<Vec<Application>>,
    previous_stage: StageTag,
    previous_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// No destination: the drag was cancelled.
    Cancelled,
    /// Dropped on the slot it started from.
    SamePosition,
    /// The card is not in the working copy (or is hidden).
    UnknownApplication,
    /// The card still has a persistence call outstanding.
    MoveInFlight,
}

#[derive(Debug, Clone)]
pub enum DropOutcome {
    Ignored(IgnoreReason),
    Applied(PendingMove),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Persisted; the optimistic state stands.
    Confirmed,
    /// Failed; the working copy is back to the exact pre-move snapshot.
    RolledBack,
    /// Failed after other moves landed on top; only this card was reverted.
    RecordReverted,
    /// Issued against a snapshot that has since been replaced; no state change.
    Stale,
}

/// Owns the working copy of the board.
///
/// The working copy is an `Arc<Vec<_>>` so a snapshot can be captured and
/// restored by pointer. A new parent snapshot (different `Arc`) replaces it
/// wholesale and starts a new epoch.
#[derive(Debug)]
pub struct Board {
    source: Arc<Vec<Application>>,
    working: Arc<Vec<Application>>,
    epoch: u64,
    next_ticket: u64,
    in_flight: HashMap<i64, MoveTicket>,
}

impl Board {
    pub fn new(snapshot: Arc<Vec<Application>>) -> Self {
        Self {
            working: Arc::clone(&snapshot),
            source: snapshot,
            epoch: 0,
            next_ticket: 0,
            in_flight: HashMap::new(),
        }
    }

    pub fn from_applications(applications: Vec<Application>) -> Self {
        Self::new(Arc::new(applications))
    }

    /// Accepts a snapshot from the loader. Returns `false` if it is the same
    /// snapshot (by identity) already in use.
    pub fn replace_snapshot(&mut self, snapshot: Arc<Vec<Application>>) -> bool {
        if Arc::ptr_eq(&self.source, &snapshot) {
            return false;
        }
        debug!(
            "Replacing board snapshot ({} records, {} persistence calls still outstanding)",
            snapshot.len(),
            self.in_flight.len()
        );
        // `in_flight` tracks network calls, not snapshot state: it survives
        // the swap so a card stays locked until its call settles.
        self.working = Arc::clone(&snapshot);
        self.source = snapshot;
        self.epoch += 1;
        true
    }

    pub fn applications(&self) -> &[Application] {
        &self.working
    }

    /// Shared handle to the current working copy.
    pub fn snapshot(&self) -> Arc<Vec<Application>> {
        Arc::clone(&self.working)
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn columns(&self) -> Vec<Column<'_>> {
        grouping::group_by_stage(&self.working)
    }

    pub fn hidden_count(&self) -> usize {
        grouping::hidden_count(&self.working)
    }

    pub fn locate(&self, id: i64) -> Option<Slot> {
        grouping::locate(&self.working, id)
    }

    pub fn get(&self, id: i64) -> Option<&Application> {
        self.working.iter().find(|app| app.id == id)
    }

    pub fn in_flight_count(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_in_flight(&self, id: i64) -> bool {
        self.in_flight.contains_key(&id)
    }

    /// Handles a completed drag. On `Applied`, the working copy already
    /// reflects the move and the caller must persist it and later `settle`.
    pub fn drop_card(&mut self, event: DropEvent) -> DropOutcome {
        let destination = match event.destination {
            None => return DropOutcome::Ignored(IgnoreReason::Cancelled),
            Some(_) if event.is_same_slot() => {
                return DropOutcome::Ignored(IgnoreReason::SamePosition)
            }
            Some(slot) => slot,
        };

        let id = event.application_id;
        let Some(previous_index) = self.working.iter().position(|app| app.id == id) else {
            return DropOutcome::Ignored(IgnoreReason::UnknownApplication);
        };
        let previous_stage = self.working[previous_index].stage.clone();
        if previous_stage.known().is_none() {
            return DropOutcome::Ignored(IgnoreReason::UnknownApplication);
        }
        if self.in_flight.contains_key(&id) {
            return DropOutcome::Ignored(IgnoreReason::MoveInFlight);
        }

        let Some(next) =
            moves::apply_move(&self.working, id, destination.stage, destination.index)
        else {
            return DropOutcome::Ignored(IgnoreReason::UnknownApplication);
        };

        let before = Arc::clone(&self.working);
        self.working = Arc::new(next);

        let ticket = MoveTicket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight.insert(id, ticket);

        debug!(
            "Optimistic move: application {id} {} -> {} (index {})",
            previous_stage, destination.stage, destination.index
        );

        DropOutcome::Applied(PendingMove {
            ticket,
            epoch: self.epoch,
            application_id: id,
            stage: destination.stage,
            before,
            after: Arc::clone(&self.working),
            previous_stage,
            previous_index,
        })
    }

    /// Applies the persistence result of `pending`.
    pub fn settle(&mut self, pending: &PendingMove, persisted: bool) -> Settlement {
        if self.in_flight.get(&pending.application_id) == Some(&pending.ticket) {
            self.in_flight.remove(&pending.application_id);
        }
        if pending.epoch != self.epoch {
            return Settlement::Stale;
        }

        if persisted {
            return Settlement::Confirmed;
        }

        if Arc::ptr_eq(&self.working, &pending.after) {
            self.working = Arc::clone(&pending.before);
            return Settlement::RolledBack;
        }

        // Other moves landed after this one; revert only this card so their
        // effect survives.
        match moves::restore_record(
            &self.working,
            pending.application_id,
            &pending.previous_stage,
            pending.previous_index,
        ) {
            Some(next) => {
                self.working = Arc::new(next);
                Settlement::RecordReverted
            }
            None => Settlement::Stale,
        }
    }
}
