pub mod builder;
pub mod dom;
pub mod page_model;
