pub mod conversation;
pub mod interpreter;
