pub mod command_model;
pub mod executor;
