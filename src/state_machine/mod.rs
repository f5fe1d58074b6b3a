//! Core conversation state machine
//!
//! Pure state transitions over per-user conversation state; the router
//! executes the resulting effects.

mod effect;
pub mod event;
mod state;
mod transition;

pub use effect::Effect;
pub use event::Event;
pub use state::{ChatState, StateStore};
pub use transition::{transition, TransitionResult};
