//! Command handlers
//!
//! Each handler implements one front-end command on top of
//! [`MacroCoordinator`](crate::recorder::MacroCoordinator). The binary wires
//! them to the command line; any other front-end can call them the same way.

pub mod inspect;
pub mod play;
pub mod recording;

pub use inspect::inspect_macro;
pub use play::play_macro;
pub use recording::record_macro;
