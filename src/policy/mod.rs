//! Leave business rules shared by the dashboard and the HTTP service.

pub mod dates;
pub mod leave;
pub mod review;

pub use dates::{CalendarDay, Clock, FixedClock, SystemClock, normalize};
pub use leave::{LeaveDraft, LeaveError, LeaveRuleViolation, LeaveSubmission, validate_submission};
pub use review::{ReviewDecision, ReviewError};
