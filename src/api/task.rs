use crate::{
    auth::auth::AuthUser,
    error::AppError,
    model::task::{NewTask, Task},
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::IntoParams;

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    /// Owner of the tasks. Defaults to the caller.
    pub user_id: Option<u64>,
}

fn clean_title(title: &str) -> Result<String, AppError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("title must not be empty".into()));
    }
    Ok(title.to_string())
}

async fn fetch_task(pool: &MySqlPool, task_id: u64) -> Result<Task, AppError> {
    sqlx::query_as::<_, Task>("SELECT id, title, completed, user_id FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Tasks are only ever changed by their owner.
fn require_owner(auth: &AuthUser, task: &Task) -> Result<(), AppError> {
    if task.user_id == auth.user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden("Only the owner can change this task".into()))
    }
}

#[utoipa::path(
    get,
    path = "/api/tasks",
    params(TaskQuery),
    responses(
        (status = 200, description = "Tasks of the user", body = [Task]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn list_tasks(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<TaskQuery>,
) -> actix_web::Result<impl Responder> {
    let user_id = query.user_id.unwrap_or(auth.user_id);
    auth.require_access(user_id)?;

    let tasks = sqlx::query_as::<_, Task>(
        "SELECT id, title, completed, user_id FROM tasks WHERE user_id = ? ORDER BY id",
    )
    .bind(user_id)
    .fetch_all(pool.get_ref())
    .await
    .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(tasks))
}

#[utoipa::path(
    get,
    path = "/api/tasks/{task_id}",
    params(("task_id" = u64, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "Task found", body = Task),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn get_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let task = fetch_task(pool.get_ref(), path.into_inner()).await?;
    auth.require_access(task.user_id)?;

    Ok(HttpResponse::Ok().json(task))
}

#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = NewTask,
    responses(
        (status = 201, description = "Task created", body = Task),
        (status = 400, description = "Empty title"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn create_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<NewTask>,
) -> actix_web::Result<impl Responder> {
    let title = clean_title(&payload.title)?;

    let result = sqlx::query("INSERT INTO tasks (user_id, title, completed) VALUES (?, ?, ?)")
        .bind(auth.user_id)
        .bind(&title)
        .bind(payload.completed)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, user_id = auth.user_id, "Failed to create task");
            AppError::from(e)
        })?;

    let task = Task {
        id: result.last_insert_id(),
        title,
        completed: payload.completed,
        user_id: auth.user_id,
    };

    Ok(HttpResponse::Created().json(task))
}

#[utoipa::path(
    put,
    path = "/api/tasks/{task_id}",
    params(("task_id" = u64, Path, description = "ID of the task")),
    request_body = Task,
    responses(
        (status = 200, description = "Task replaced", body = Task),
        (status = 400, description = "Empty title"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn update_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<Task>,
) -> actix_web::Result<impl Responder> {
    let title = clean_title(&payload.title)?;
    let task_id = path.into_inner();

    let existing = fetch_task(pool.get_ref(), task_id).await?;
    require_owner(&auth, &existing)?;

    sqlx::query("UPDATE tasks SET title = ?, completed = ? WHERE id = ?")
        .bind(&title)
        .bind(payload.completed)
        .bind(task_id)
        .execute(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(Task {
        id: task_id,
        title,
        completed: payload.completed,
        user_id: existing.user_id,
    }))
}

#[utoipa::path(
    delete,
    path = "/api/tasks/{task_id}",
    params(("task_id" = u64, Path, description = "ID of the task")),
    responses(
        (status = 200, description = "Task deleted", body = Object, example = json!({})),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Task not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn delete_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    let task_id = path.into_inner();

    let existing = fetch_task(pool.get_ref(), task_id).await?;
    require_owner(&auth, &existing)?;

    sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id)
        .execute(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    Ok(HttpResponse::Ok().json(json!({})))
}
