// Use cases layer: arena workflows built on the domain ports.

pub mod action_queue;
pub mod engine;
pub mod lifecycle;
pub mod narration;
pub mod resolution;
pub mod submit_action;

#[cfg(test)]
pub(crate) mod test_support;

pub use engine::{ArenaEngine, GameStatus};
pub use lifecycle::{GameSettings, JoinRequest};
pub use narration::NarrationPublisher;
pub use resolution::{RoundReport, RoundResolver};
pub use submit_action::ActionSubmission;
