// Interface adapters: HTTP intake, state store and narration sinks.

pub mod handlers;
pub mod narration;
pub mod protocol;
pub mod routes;
pub mod state;
