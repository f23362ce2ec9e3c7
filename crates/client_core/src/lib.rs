//! Contact manager core: HTTP transport, state types, the pure reducer and
//! the store/manager layers that drive it.

pub mod error;
pub mod manager;
pub mod reducer;
pub mod settings;
pub mod store;
pub mod transport;
pub mod types;

pub use manager::{ClientEvent, ContactManager};
pub use reducer::{
    reduce, Action, ActionOutcome, ShortFieldPolicy, SubmitPolicy, UpdateFailurePolicy,
};
pub use settings::{load_settings, Settings};
pub use store::{execute, ContactStore, PendingRequest};
pub use transport::{ContactsApi, HttpContactsApi};
pub use types::{ContactsState, EditContext, FormState, RequestTarget, RequestToken};

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
