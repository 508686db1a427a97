use crate::model::{
    leave::{Leave, LeaveStatus, LeaveStatusPatch, LeaveWithUser},
    user::User,
};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("A rejection reason is required")]
    ReasonRequired,
    #[error("Leave can only be approved or rejected")]
    InvalidTarget,
    #[error("Leave request not found or already processed")]
    AlreadyProcessed,
    #[error("You cannot review your own leave")]
    SelfReview,
}

/// Pending -> Approved, or Pending -> Rejected with a reason. Nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject { reason: String },
}

impl ReviewDecision {
    pub fn reject(reason: &str) -> Result<Self, ReviewError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(ReviewError::ReasonRequired);
        }
        Ok(ReviewDecision::Reject {
            reason: reason.to_string(),
        })
    }

    pub fn from_patch(patch: &LeaveStatusPatch) -> Result<Self, ReviewError> {
        match patch.status {
            LeaveStatus::Approved => Ok(ReviewDecision::Approve),
            LeaveStatus::Rejected => Self::reject(patch.reject_reason.as_deref().unwrap_or("")),
            LeaveStatus::Pending => Err(ReviewError::InvalidTarget),
        }
    }

    pub fn status(&self) -> LeaveStatus {
        match self {
            ReviewDecision::Approve => LeaveStatus::Approved,
            ReviewDecision::Reject { .. } => LeaveStatus::Rejected,
        }
    }

    pub fn reject_reason(&self) -> Option<&str> {
        match self {
            ReviewDecision::Approve => None,
            ReviewDecision::Reject { reason } => Some(reason),
        }
    }

    pub fn to_patch(&self) -> LeaveStatusPatch {
        LeaveStatusPatch {
            status: self.status(),
            reject_reason: self.reject_reason().map(str::to_string),
        }
    }
}

/// Reviewers never act on their own requests, and decided leaves are final.
pub fn ensure_reviewable(leave: &Leave, reviewer_id: u64) -> Result<(), ReviewError> {
    if leave.user_id == reviewer_id {
        return Err(ReviewError::SelfReview);
    }
    if leave.status != LeaveStatus::Pending {
        return Err(ReviewError::AlreadyProcessed);
    }
    Ok(())
}

/// Leaves the reviewer may act on, each tagged with its submitter's email.
/// Unknown submitters get an empty email.
pub fn review_queue<F>(leaves: Vec<Leave>, reviewer_id: u64, email_of: F) -> Vec<LeaveWithUser>
where
    F: Fn(u64) -> Option<String>,
{
    leaves
        .into_iter()
        .filter(|leave| leave.user_id != reviewer_id)
        .map(|leave| {
            let user_email = email_of(leave.user_id).unwrap_or_default();
            LeaveWithUser { leave, user_email }
        })
        .collect()
}

pub fn join_with_users(leaves: Vec<Leave>, users: &[User], reviewer_id: u64) -> Vec<LeaveWithUser> {
    let emails: HashMap<u64, &str> = users.iter().map(|u| (u.id, u.email.as_str())).collect();
    review_queue(leaves, reviewer_id, |id| emails.get(&id).map(|e| e.to_string()))
}
