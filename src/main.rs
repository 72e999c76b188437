use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use league_strength::config::{ServerSettings, Settings};
use league_strength::core::StrengthEngine;
use league_strength::middleware::request_id;
use league_strength::routes::{self, AppState};
use league_strength::services::ResultCache;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn build_cors(server: &ServerSettings) -> Cors {
    if server.allowed_origins.is_empty() {
        return Cors::permissive();
    }

    server
        .allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

fn init_logging(level: &str, format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()));
        }
    };

    init_logging(&settings.logging.level, &settings.logging.format);
    info!("Starting league strength service...");

    let feed = settings.feed.build_source().map_err(|e| {
        error!("Failed to configure match feed: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    info!("Match feed configured ({:?})", settings.feed.source);

    let cache = Arc::new(ResultCache::new(
        settings.cache.max_entries,
        Duration::from_secs(settings.cache.ttl_secs),
    ));

    // Periodic sweep of expired results
    if !cache.ttl().is_zero() {
        let sweeper = Arc::clone(&cache);
        actix_web::rt::spawn(async move {
            let mut interval = actix_web::rt::time::interval(sweeper.ttl());
            loop {
                interval.tick().await;
                sweeper.cleanup_expired().await;
            }
        });
    }

    let engine = StrengthEngine::new((&settings.engine).into());
    info!("Strength engine initialized with {:?}", engine.options());

    let app_state = AppState {
        feed: Arc::new(feed),
        cache,
        engine,
    };

    // Configure HTTP server
    let server = settings.server.clone();
    let workers = server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", server.host, server.port);

    let bind = (server.host.clone(), server.port);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(build_cors(&server))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::from_fn(request_id))
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind(bind)?
    .run()
    .await
}
