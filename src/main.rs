use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use sqlx::postgres::PgPoolOptions;

use taskboard::auth::TokenService;
use taskboard::config::Config;
use taskboard::routes;

/// Unmatched routes get the same error envelope as everything else.
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "success": false,
        "message": "Route not found"
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    // Fails fast here if DATABASE_URL or JWT_SECRET is missing: the process
    // never comes up able to issue or accept insecurely-signed tokens.
    let config = Config::from_env();

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    let tokens = TokenService::new(&config.jwt_secret);

    log::info!("Starting taskboard server at {}", config.server_url());
    let bind_addr = (config.server_host.clone(), config.server_port);

    HttpServer::new(move || {
        let tokens = tokens.clone();
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(tokens.clone()))
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(routes::health::health)
            .configure(|cfg| routes::config(cfg, tokens))
            .default_service(web::route().to(not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
