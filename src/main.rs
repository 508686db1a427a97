use actix_web::middleware::NormalizePath;
use actix_web::web::Data;
use actix_web::{App, HttpServer, Responder, get};
use anyhow::Context;
use leavedesk::auth::handlers::bootstrap_admin;
use leavedesk::config::Config;
use leavedesk::db::{ensure_schema, init_db};
use leavedesk::docs::ApiDoc;
use leavedesk::routes::{self, Limiters};
use leavedesk::utils::user_directory::UserDirectory;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_appender::rolling;
use utoipa::OpenApi; // ← needed for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

#[get("/")]
async fn index() -> impl Responder {
    "Leavedesk is running"
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid configuration")?;

    // Rolling daily log
    let file_appender = rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_target(false) // removes module path
        .with_level(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .pretty()
        .init();

    info!("Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .context("failed to connect to database")?;
    ensure_schema(&pool).await.context("failed to apply schema")?;
    if let Some(admin) = &config.admin {
        bootstrap_admin(&pool, admin)
            .await
            .context("failed to create admin account")?;
    }

    let limiters = Arc::new(Limiters::from_config(&config).context("invalid rate limits")?);
    let directory = UserDirectory::new(Duration::from_secs(config.directory_ttl_secs));

    let pool_for_warmup = pool.clone();
    let directory_for_warmup = directory.clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = directory_for_warmup.warmup(&pool_for_warmup, 250).await {
            error!(error = %e, "Failed to warm up user directory");
        }
    });

    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}") // ← important: wildcard {_:.*} to match JS/CSS files
                    .url("/api-doc/openapi.json", ApiDoc::openapi()),
            )
            .app_data(Data::new(pool.clone()))
            .app_data(Data::new(config.clone()))
            .app_data(Data::new(directory.clone()))
            .service(index)
            .configure(|cfg| routes::configure(cfg, &config, &limiters))
    })
    .bind(server_addr)?
    .run()
    .await?;

    Ok(())
}
