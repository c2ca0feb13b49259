//! Bridge between the UI thread and the backend worker that runs remote queries.

pub mod commands;
pub mod runtime;
