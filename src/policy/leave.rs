use crate::model::leave::{Leave, LeaveStatus, LeaveType, NewLeave};
use crate::policy::dates::normalize;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

pub const MIN_REASON_CHARS: usize = 5;

/// Raw leave form values, before any validation. This is also the body the
/// server accepts on `POST /leaves`; unknown fields such as `status` or
/// `userId` are ignored there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveDraft {
    #[schema(example = "2025-12-01", format = "date", value_type = Option<String>)]
    #[serde(default)]
    pub from_date: Option<NaiveDate>,
    #[schema(example = "2025-12-05", format = "date", value_type = Option<String>)]
    #[serde(default)]
    pub to_date: Option<NaiveDate>,
    #[schema(example = "Casual")]
    #[serde(rename = "type", default)]
    pub leave_type: String,
    #[schema(example = "Family trip")]
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "camelCase")]
pub enum FieldError {
    #[error("fromDate is required")]
    FromDateRequired,
    #[error("toDate is required")]
    ToDateRequired,
    #[error("type is required")]
    TypeRequired,
    #[error("type must be Sick or Casual")]
    TypeInvalid,
    #[error("reason is required")]
    ReasonRequired,
    #[error("reason must be at least 5 characters")]
    ReasonTooShort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LeaveRuleViolation {
    #[error("To date cannot be before from date.")]
    DateRange,
    #[error("Sick leave can only be applied for today.")]
    SickNotToday,
    #[error("Casual leave cannot start in the past.")]
    CasualInPast,
    #[error("You already have leave during these dates.")]
    Overlap { leave_id: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LeaveError {
    #[error("Please fix errors before submitting")]
    Structural(Vec<FieldError>),
    #[error(transparent)]
    Rule(#[from] LeaveRuleViolation),
}

/// A draft that passed structural checks and the date policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveSubmission {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub leave_type: LeaveType,
    pub reason: String,
}

impl LeaveDraft {
    pub fn structural_errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.from_date.is_none() {
            errors.push(FieldError::FromDateRequired);
        }
        if self.to_date.is_none() {
            errors.push(FieldError::ToDateRequired);
        }
        if self.leave_type.trim().is_empty() {
            errors.push(FieldError::TypeRequired);
        } else if self.leave_type().is_none() {
            errors.push(FieldError::TypeInvalid);
        }
        let reason = self.reason.trim();
        if reason.is_empty() {
            errors.push(FieldError::ReasonRequired);
        } else if reason.chars().count() < MIN_REASON_CHARS {
            errors.push(FieldError::ReasonTooShort);
        }
        errors
    }

    pub fn leave_type(&self) -> Option<LeaveType> {
        self.leave_type.trim().parse().ok()
    }

    /// Structural checks, then the leave-type date policy against `today`.
    pub fn check(&self, today: NaiveDate) -> Result<LeaveSubmission, LeaveError> {
        let errors = self.structural_errors();
        if !errors.is_empty() {
            return Err(LeaveError::Structural(errors));
        }
        let (Some(from_date), Some(to_date), Some(leave_type)) =
            (self.from_date, self.to_date, self.leave_type())
        else {
            return Err(LeaveError::Structural(vec![FieldError::TypeInvalid]));
        };

        check_date_policy(leave_type, from_date, to_date, today)?;

        Ok(LeaveSubmission {
            from_date,
            to_date,
            leave_type,
            reason: self.reason.trim().to_string(),
        })
    }
}

impl LeaveSubmission {
    pub fn check_overlap(&self, existing: &[Leave]) -> Result<(), LeaveRuleViolation> {
        match find_overlap(self.from_date, self.to_date, existing) {
            Some(leave) => Err(LeaveRuleViolation::Overlap { leave_id: leave.id }),
            None => Ok(()),
        }
    }

    /// New requests always start out pending.
    pub fn into_new_leave(self, user_id: u64) -> NewLeave {
        NewLeave {
            from_date: self.from_date,
            to_date: self.to_date,
            leave_type: self.leave_type,
            reason: self.reason,
            status: LeaveStatus::Pending,
            user_id,
        }
    }
}

/// Date range first, then the per-type rule. First failure wins.
pub fn check_date_policy(
    leave_type: LeaveType,
    from_date: NaiveDate,
    to_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), LeaveRuleViolation> {
    let from = normalize(&from_date);
    let today = normalize(&today);

    if normalize(&to_date) < from {
        return Err(LeaveRuleViolation::DateRange);
    }
    match leave_type {
        LeaveType::Sick if from != today => Err(LeaveRuleViolation::SickNotToday),
        LeaveType::Casual if from < today => Err(LeaveRuleViolation::CasualInPast),
        _ => Ok(()),
    }
}

/// Closed day ranges: sharing a single boundary day counts.
pub fn ranges_overlap(
    a_from: NaiveDate,
    a_to: NaiveDate,
    b_from: NaiveDate,
    b_to: NaiveDate,
) -> bool {
    normalize(&a_from) <= normalize(&b_to) && normalize(&a_to) >= normalize(&b_from)
}

pub fn overlaps(from_date: NaiveDate, to_date: NaiveDate, existing: &Leave) -> bool {
    ranges_overlap(from_date, to_date, existing.from_date, existing.to_date)
}

/// Every existing record counts, whatever its status. Rejected leaves block too.
pub fn find_overlap(from_date: NaiveDate, to_date: NaiveDate, existing: &[Leave]) -> Option<&Leave> {
    existing.iter().find(|leave| overlaps(from_date, to_date, leave))
}

pub fn validate_submission(
    draft: &LeaveDraft,
    existing: &[Leave],
    today: NaiveDate,
) -> Result<LeaveSubmission, LeaveError> {
    let submission = draft.check(today)?;
    submission.check_overlap(existing)?;
    Ok(submission)
}
