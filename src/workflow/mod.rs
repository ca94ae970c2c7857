pub mod assignment;
pub mod review;

pub use assignment::{assign_reports, AssignRequest, AssignmentOutcome};
pub use review::{submit_answers, update_status, StatusChange, Submission};
