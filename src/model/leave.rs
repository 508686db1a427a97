use crate::model::id;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum LeaveType {
    Sick,
    Casual,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 1,
    "fromDate": "2025-10-10",
    "toDate": "2025-10-20",
    "type": "Casual",
    "reason": "Family trip",
    "status": "Pending",
    "userId": 2
}))]
pub struct Leave {
    #[serde(deserialize_with = "id::deserialize")]
    pub id: u64,
    #[schema(example = "2025-10-10", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2025-10-20", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(deserialize_with = "id::deserialize")]
    pub user_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}

/// Leave joined with its submitter, as shown on the admin review list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveWithUser {
    #[serde(flatten)]
    pub leave: Leave,
    #[schema(example = "jane@company.com")]
    pub user_email: String,
}

/// Body of `POST /leaves` as the dashboard sends it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLeave {
    #[schema(example = "2025-12-01", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2025-12-05", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    pub reason: String,
    pub status: LeaveStatus,
    #[serde(deserialize_with = "id::deserialize")]
    pub user_id: u64,
}

/// Body of `PATCH /leaves/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({ "status": "Rejected", "rejectReason": "Team is short-staffed" }))]
pub struct LeaveStatusPatch {
    pub status: LeaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
}

#[derive(Debug, FromRow)]
pub struct LeaveRow {
    pub id: u64,
    pub user_id: u64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub leave_type: String,
    pub reason: String,
    pub status: String,
    pub reject_reason: Option<String>,
}

impl TryFrom<LeaveRow> for Leave {
    type Error = strum::ParseError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        Ok(Leave {
            id: row.id,
            from_date: row.from_date,
            to_date: row.to_date,
            leave_type: row.leave_type.parse()?,
            reason: row.reason,
            status: row.status.parse()?,
            user_id: row.user_id,
            reject_reason: row.reject_reason,
        })
    }
}
