use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::leave::{Leave, LeaveRow, LeaveStatusPatch},
    policy::{
        Clock, LeaveDraft, ReviewDecision, SystemClock,
        review::{ensure_reviewable, review_queue},
    },
    utils::user_directory::UserDirectory,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::IntoParams;

const SELECT_LEAVE: &str = r#"
    SELECT id, user_id, from_date, to_date, leave_type, reason, status, reject_reason
    FROM leaves
"#;

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct LeaveQuery {
    /// Only leaves of this user. Employees may only ask for themselves.
    pub user_id: Option<u64>,
}

fn into_leaves(rows: Vec<LeaveRow>) -> Result<Vec<Leave>, AppError> {
    rows.into_iter()
        .map(|row| {
            let id = row.id;
            Leave::try_from(row)
                .map_err(|e| AppError::Internal(format!("leave {id} has an invalid column: {e}")))
        })
        .collect()
}

pub async fn fetch_user_leaves(pool: &MySqlPool, user_id: u64) -> Result<Vec<Leave>, AppError> {
    let rows = sqlx::query_as::<_, LeaveRow>(&format!(
        "{SELECT_LEAVE} WHERE user_id = ? ORDER BY from_date, id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    into_leaves(rows)
}

async fn fetch_all_leaves(pool: &MySqlPool) -> Result<Vec<Leave>, AppError> {
    let rows = sqlx::query_as::<_, LeaveRow>(&format!("{SELECT_LEAVE} ORDER BY from_date, id"))
        .fetch_all(pool)
        .await?;

    into_leaves(rows)
}

pub async fn fetch_leave(pool: &MySqlPool, leave_id: u64) -> Result<Leave, AppError> {
    let row = sqlx::query_as::<_, LeaveRow>(&format!("{SELECT_LEAVE} WHERE id = ?"))
        .bind(leave_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Leave request not found".into()))?;

    into_leaves(vec![row])?
        .pop()
        .ok_or_else(|| AppError::NotFound("Leave request not found".into()))
}

/* =========================
List leaves
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveQuery),
    responses(
        (status = 200, description = "Leaves of the requested user, or all leaves for an admin", body = [Leave]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveQuery>,
) -> actix_web::Result<impl Responder> {
    let leaves = match query.user_id {
        Some(user_id) => {
            auth.require_access(user_id)?;
            fetch_user_leaves(pool.get_ref(), user_id).await?
        }
        None if auth.role.is_admin() => fetch_all_leaves(pool.get_ref()).await?,
        None => fetch_user_leaves(pool.get_ref(), auth.user_id).await?,
    };

    Ok(HttpResponse::Ok().json(leaves))
}

/* =========================
Review list (admin)
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/review",
    responses(
        (status = 200, description = "Everyone else's leaves with the submitter's email", body = [crate::model::leave::LeaveWithUser]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn review_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    directory: web::Data<UserDirectory>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;

    let leaves = fetch_all_leaves(pool.get_ref()).await?;
    let emails = directory
        .emails_for(pool.get_ref(), leaves.iter().map(|l| l.user_id))
        .await
        .map_err(AppError::from)?;

    let queue = review_queue(leaves, auth.user_id, |id| emails.get(&id).cloned());

    Ok(HttpResponse::Ok().json(queue))
}

/* =========================
Get one leave
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = Leave),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "Leave request not found"
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let leave = fetch_leave(pool.get_ref(), path.into_inner()).await?;
    auth.require_access(leave.user_id)?;

    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Create leave request
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body(
        content = LeaveDraft,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = Leave),
        (status = 400, description = "Invalid fields or date policy violated", body = Object, example = json!({
            "message": "Sick leave can only be applied for today."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Overlaps an existing leave", body = Object, example = json!({
            "message": "You already have leave during these dates."
        }))
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<LeaveDraft>,
) -> actix_web::Result<impl Responder> {
    // 1️⃣ fields + date policy, before touching the database
    let submission = payload.check(SystemClock.today()).map_err(AppError::from)?;

    // 2️⃣ overlap against every existing leave of the caller, any status
    let existing = fetch_user_leaves(pool.get_ref(), auth.user_id).await?;
    submission.check_overlap(&existing).map_err(AppError::from)?;

    // 3️⃣ insert as pending, owned by the caller
    let new_leave = submission.into_new_leave(auth.user_id);
    let result = sqlx::query(
        r#"
        INSERT INTO leaves
            (user_id, from_date, to_date, leave_type, reason, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(new_leave.user_id)
    .bind(new_leave.from_date)
    .bind(new_leave.to_date)
    .bind(new_leave.leave_type.as_ref())
    .bind(&new_leave.reason)
    .bind(new_leave.status.as_ref())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, user_id = auth.user_id, "Failed to create leave request");
        AppError::from(e)
    })?;

    let leave = fetch_leave(pool.get_ref(), result.last_insert_id()).await?;
    tracing::info!(leave_id = leave.id, user_id = leave.user_id, "Leave request submitted");

    Ok(HttpResponse::Created().json(leave))
}

/* =========================
Approve / reject (admin)
========================= */
#[utoipa::path(
    patch,
    path = "/api/leaves/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to review")
    ),
    request_body = LeaveStatusPatch,
    responses(
        (status = 200, description = "Leave reviewed", body = Leave),
        (status = 400, description = "Missing reason, invalid status, or already processed", body = Object, example = json!({
            "message": "Leave request not found or already processed"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn review_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<LeaveStatusPatch>,
) -> actix_web::Result<impl Responder> {
    auth.require_admin()?;
    let decision = ReviewDecision::from_patch(&payload).map_err(AppError::from)?;

    let leave_id = path.into_inner();
    let leave = fetch_leave(pool.get_ref(), leave_id).await?;
    ensure_reviewable(&leave, auth.user_id).map_err(AppError::from)?;

    let result = sqlx::query(
        r#"
        UPDATE leaves
        SET status = ?, reject_reason = ?
        WHERE id = ?
        AND status = 'Pending'
        "#,
    )
    .bind(decision.status().as_ref())
    .bind(decision.reject_reason())
    .bind(leave_id)
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, leave_id, "Review leave failed");
        AppError::from(e)
    })?;

    // another reviewer got there first
    if result.rows_affected() == 0 {
        return Err(AppError::from(crate::policy::ReviewError::AlreadyProcessed).into());
    }

    tracing::info!(leave_id, reviewer = auth.user_id, status = %decision.status(), "Leave reviewed");

    let leave = fetch_leave(pool.get_ref(), leave_id).await?;
    Ok(HttpResponse::Ok().json(leave))
}
