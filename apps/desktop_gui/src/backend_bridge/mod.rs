//! Backend side of the GUI: commands queued by the UI and the worker that performs them.

pub mod commands;
pub mod runtime;
