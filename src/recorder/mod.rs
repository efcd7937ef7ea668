//! Recording sessions, the event log and its persistence

pub mod coordinator;
pub mod error;
pub mod log;
pub mod state;

pub use coordinator::MacroCoordinator;
pub use error::{MacroError, MacroResult};
pub use log::{Event, EventLog};
pub use state::{MacroSummary, RecordingState};
