use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpServer};

use taskvault::auth::{AuthMiddleware, TokenService};
use taskvault::config::Config;
use taskvault::routes::health;
use taskvault::{db, routes};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();

    let pool = db::connect(&config.database_url)
        .await
        .expect("Failed to connect to database");

    log::info!("Creating tables...");
    db::create_tables(&pool)
        .await
        .expect("Failed to create database tables");

    // One signing key for the whole process lifetime.
    let token_service = web::Data::new(TokenService::new(&config.jwt_secret));

    log::info!("Starting TaskVault server at {}", config.server_url());
    let bind_addr = (config.server_host.clone(), config.server_port);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(token_service.clone())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .configure(routes::config),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
