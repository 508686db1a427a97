use crate::{
    api::{leave, task, user},
    auth::middleware::auth_middleware,
    config::{Config, ConfigError},
    error::AppError,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};

type LimiterConfig = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-route rate limits, validated once at startup.
pub struct Limiters {
    login: LimiterConfig,
    protected: LimiterConfig,
}

impl Limiters {
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            login: build_limiter("RATE_LOGIN_PER_MIN", config.rate_login_per_min)?,
            protected: build_limiter("RATE_PROTECTED_PER_MIN", config.rate_protected_per_min)?,
        })
    }
}

fn build_limiter(key: &'static str, requests_per_min: u32) -> Result<LimiterConfig, ConfigError> {
    if requests_per_min == 0 {
        return Err(ConfigError::Invalid {
            key,
            value: "0".into(),
        });
    }
    GovernorConfigBuilder::default()
        .per_millisecond((60_000 / u64::from(requests_per_min)).max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or(ConfigError::Invalid {
            key,
            value: requests_per_min.to_string(),
        })
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &Limiters) {
    let prefix = config.api_prefix.trim_end_matches('/');

    // Malformed bodies, queries and paths answer with the same JSON error shape
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|e, _| AppError::BadRequest(e.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|e, _| AppError::BadRequest(e.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|e, _| AppError::BadRequest(e.to_string()).into()),
    );

    // Public: login lives on GET /users?email=&password=
    cfg.service(
        web::resource(format!("{prefix}/users"))
            .wrap(Governor::new(&limiters.login))
            .route(web::get().to(user::list_users)),
    );

    // Protected routes
    cfg.service(
        web::scope(prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(&limiters.protected)) // rate limiting
            .configure(protected),
    );
}

/// Everything behind the bearer token.
pub fn protected(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/leaves")
            // /leaves
            .service(
                web::resource("")
                    .route(web::get().to(leave::list_leaves))
                    .route(web::post().to(leave::create_leave)),
            )
            // /leaves/review
            .service(web::resource("/review").route(web::get().to(leave::review_leaves)))
            // /leaves/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(leave::get_leave))
                    .route(web::patch().to(leave::review_leave)),
            ),
    )
    .service(
        web::scope("/tasks")
            // /tasks
            .service(
                web::resource("")
                    .route(web::get().to(task::list_tasks))
                    .route(web::post().to(task::create_task)),
            )
            // /tasks/{id}
            .service(
                web::resource("/{id}")
                    .route(web::get().to(task::get_task))
                    .route(web::put().to(task::update_task))
                    .route(web::delete().to(task::delete_task)),
            ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(login: u32) -> Config {
        Config::from_lookup(|key| match key {
            "SERVER_ADDR" => Some("127.0.0.1:0".into()),
            "DATABASE_URL" => Some("mysql://localhost/leavedesk".into()),
            "JWT_SECRET" => Some("secret".into()),
            "RATE_LOGIN_PER_MIN" => Some(login.to_string()),
            _ => None,
        })
        .unwrap()
    }

    #[test]
    fn limiters_build_from_sane_rates() {
        assert!(Limiters::from_config(&config(60)).is_ok());
        assert!(Limiters::from_config(&config(120_000)).is_ok());
    }

    #[test]
    fn zero_rate_is_a_config_error() {
        assert!(matches!(
            Limiters::from_config(&config(0)),
            Err(ConfigError::Invalid { key: "RATE_LOGIN_PER_MIN", .. })
        ));
    }
}
