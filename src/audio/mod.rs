pub mod credentials;
pub mod feedback;
pub mod gateway;
pub mod queue;
pub mod turn;
