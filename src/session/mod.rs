pub mod error;
pub mod session_state;
pub mod store;
pub mod tracker;
