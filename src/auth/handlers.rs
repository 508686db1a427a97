use crate::{
    auth::{
        jwt::generate_access_token,
        password::{hash_password, verify_password},
    },
    config::{AdminAccount, Config},
    error::AppError,
    model::{role::Role, user::User},
    models::UserSql,
    utils::user_directory::UserDirectory,
};
use sqlx::MySqlPool;
use tracing::{debug, error, info, instrument};

/// Looks the account up by email and checks the password. A match comes back
/// as a one-element list carrying a fresh bearer token; anything else is an
/// empty list so callers cannot tell unknown emails from wrong passwords.
#[instrument(name = "auth_login", skip(pool, config, directory, password))]
pub async fn login(
    email: &str,
    password: &str,
    pool: &MySqlPool,
    config: &Config,
    directory: &UserDirectory,
) -> Result<Vec<User>, AppError> {
    info!("Login request received");

    // 1️⃣ Basic validation
    if email.trim().is_empty() || password.is_empty() {
        info!("Validation failed: empty email or password");
        return Err(AppError::BadRequest("Email and password required".into()));
    }

    debug!("Fetching user from database");

    // 2️⃣ Fetch user
    let db_user = match sqlx::query_as::<_, UserSql>(
        r#"
        SELECT id, email, password, role
        FROM users
        WHERE email = ?
        "#,
    )
    .bind(email.trim())
    .fetch_optional(pool)
    .await
    {
        Ok(Some(user)) => {
            debug!(user_id = user.id, "User found");
            user
        }
        Ok(None) => {
            info!("Invalid credentials: user not found");
            return Ok(Vec::new());
        }
        Err(e) => {
            error!(error = %e, "Database error while fetching user");
            return Err(e.into());
        }
    };

    // 3️⃣ Verify password
    if let Err(e) = verify_password(password, &db_user.password) {
        info!(error = %e, "Invalid credentials: password mismatch");
        return Ok(Vec::new());
    }

    debug!("Password verified");

    // 4️⃣ Generate access token
    let role = Role::from_name(&db_user.role);
    let token = generate_access_token(
        db_user.id,
        &db_user.email,
        role,
        &config.jwt_secret,
        config.access_token_ttl,
    )
    .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))?;

    directory.remember(db_user.id, &db_user.email).await;

    info!(user_id = db_user.id, "Login successful");

    Ok(vec![db_user.into_user(Some(token))])
}

/// Row for the configured admin, password hashed with argon2.
fn admin_row(account: &AdminAccount) -> Result<UserSql, AppError> {
    let password = hash_password(&account.password)
        .map_err(|e| AppError::Internal(format!("password hashing failed: {e}")))?;

    Ok(UserSql {
        id: 0,
        email: account.email.clone(),
        password,
        role: Role::Admin.to_string(),
    })
}

/// Creates the configured admin unless the email already exists. Returns
/// whether a row was inserted.
#[instrument(name = "bootstrap_admin", skip(pool, account), fields(email = %account.email))]
pub async fn bootstrap_admin(pool: &MySqlPool, account: &AdminAccount) -> Result<bool, AppError> {
    let row = admin_row(account)?;

    let result = sqlx::query("INSERT IGNORE INTO users (email, password, role) VALUES (?, ?, ?)")
        .bind(&row.email)
        .bind(&row.password)
        .bind(&row.role)
        .execute(pool)
        .await?;

    let created = result.rows_affected() > 0;
    if created {
        info!("Admin account created");
    } else {
        debug!("Admin account already present");
    }
    Ok(created)
}
