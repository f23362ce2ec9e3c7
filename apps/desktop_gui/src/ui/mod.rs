//! UI layer for desktop GUI: the contact form, the contact list, and their palette.

pub mod app;
pub mod theme;

pub use app::ContactManagerApp;
