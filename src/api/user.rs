use crate::{
    auth::{auth::AuthUser, handlers},
    config::Config,
    error::AppError,
    models::{UserQuery, UserSql},
    utils::user_directory::UserDirectory,
};
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;

/// `GET /users`. With `email` and `password` in the query this is the login
/// call and needs no token; otherwise it lists every account (admin only).
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserQuery),
    responses(
        (status = 200, description = "Matching users; a login match carries a token", body = [crate::model::user::User]),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        (),
        ("bearer_auth" = [])
    ),
    tag = "User"
)]
pub async fn list_users(
    query: web::Query<UserQuery>,
    auth: Option<AuthUser>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    directory: web::Data<UserDirectory>,
) -> actix_web::Result<impl Responder> {
    if let Some((email, password)) = query.credentials() {
        let users = handlers::login(email, password, pool.get_ref(), &config, &directory).await?;
        return Ok(HttpResponse::Ok().json(users));
    }

    let auth = auth.ok_or_else(|| AppError::Unauthorized("Missing or invalid token".into()))?;
    auth.require_admin()?;

    let rows = sqlx::query_as::<_, UserSql>("SELECT id, email, password, role FROM users ORDER BY id")
        .fetch_all(pool.get_ref())
        .await
        .map_err(AppError::from)?;

    let mut users = Vec::with_capacity(rows.len());
    for row in rows {
        directory.remember(row.id, &row.email).await;
        users.push(row.into_user(None));
    }

    Ok(HttpResponse::Ok().json(users))
}
