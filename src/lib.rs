pub mod boundary;
pub mod catalogue;
pub mod contact;
pub mod feedback;
pub mod form;
pub mod relay;

pub use contact::{ContactIntake, SubmissionOutcome};
