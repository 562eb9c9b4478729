//! Pipeline board — stage columns over a working copy of application records.
//!
//! Flow of a move:
//! 1. A `DropEvent` arrives (source slot, optional destination slot, card id).
//! 2. `Board::drop_card` ignores cancelled / same-slot drops, otherwise swaps
//!    the working copy for `apply_move(...)` and hands back a `PendingMove`.
//! 3. `BoardSession` persists the move on a spawned task via `StageStore`.
//! 4. The outcome comes back through a channel and `Board::settle` keeps the
//!    optimistic state or restores the pre-move snapshot.
//!
//! Only `Board` mutates the working copy, and only from the session's loop.

pub mod grouping;
pub mod moves;
pub mod notification;
pub mod session;
pub mod state;
pub mod store;

pub use moves::{DropEvent, Slot};
pub use notification::Notification;
pub use session::{BoardSession, Dispatch};
pub use state::{Board, IgnoreReason};
