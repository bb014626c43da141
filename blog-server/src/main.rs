use actix_cors::Cors;
use actix_web::middleware::DefaultHeaders;
use actix_web::{App, HttpServer};
use anyhow::Context;
use blog_server::Services;
use blog_server::infrastructure::config::AppConfig;
use blog_server::infrastructure::database::{create_pool, run_migrations};
use blog_server::infrastructure::logging::init_logging;
use blog_server::presentation::middleware::{RequestIdMiddleware, TimingMiddleware};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let pool = create_pool(&config.database_url, config.max_connections)
        .await
        .context("failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    let services = Services::new(pool);
    let config_data = config.clone();

    info!(host = %config.host, port = config.port, "HTTP server starting");

    HttpServer::new(move || {
        let cors = build_cors(&config_data);
        App::new()
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("Referrer-Policy", "no-referrer"))
                    .add(("Permissions-Policy", "geolocation=()"))
                    .add(("Cross-Origin-Opener-Policy", "same-origin")),
            )
            .wrap(cors)
            .configure(|cfg| services.configure(cfg))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    info!("HTTP server stopped");
    Ok(())
}

fn build_cors(config: &AppConfig) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE"])
        .allowed_headers(vec![actix_web::http::header::CONTENT_TYPE])
        .expose_headers(vec!["x-request-id"])
        .max_age(3600);

    for origin in &config.cors_origins {
        cors = if origin == "*" {
            cors.allow_any_origin()
        } else {
            cors.allowed_origin(origin)
        };
    }

    cors
}
