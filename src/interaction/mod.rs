//! Cut history and interaction timing.
//!
//! The history stack remembers cut links for undo; the interaction clock
//! decides when an idle mesh starts healing itself.

mod clock;
mod history;

pub use clock::InteractionClock;
pub use history::HistoryStack;
