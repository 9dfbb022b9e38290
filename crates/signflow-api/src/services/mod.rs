pub mod signing;

pub use signing::{SigningService, WorkflowFailure, WorkflowStage};
