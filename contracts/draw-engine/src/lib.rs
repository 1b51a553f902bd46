pub mod contract;
pub mod error;
pub mod execute;
pub mod msg;
pub mod query;
pub mod queue;
pub mod resupply;
pub mod reveal;
pub mod state;
