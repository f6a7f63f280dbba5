//! Application layer: orchestration across domain logic and infrastructure I/O.

pub mod submission;
pub mod workflow;

pub use submission::SubmissionPipeline;
pub use workflow::{build_transfer, gather_account_states, next_sequence_number};
