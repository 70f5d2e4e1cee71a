// Frameworks layer: configuration, seed data and server bootstrap.

pub mod config;
pub mod seed;
pub mod server;
