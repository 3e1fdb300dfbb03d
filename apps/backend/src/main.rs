use actix_web::{web, App, HttpServer};
use backend::config::ai::AiConfig;
use backend::config::storage::StorageConfig;
use backend::infra::db::connect_db;
use backend::middleware::cors::cors_middleware;
use backend::middleware::jwt_extract::JwtExtract;
use backend::middleware::request_trace::RequestTrace;
use backend::routes;
use backend::state::app_state::AppState;
use backend::state::security_config::SecurityConfig;

mod telemetry;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: set via docker-compose env_file or docker run --env-file
    // - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("❌ BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    println!("🚀 Starting QualityHub Backend on http://{}:{}", host, port);

    let jwt = match std::env::var("BACKEND_JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("❌ BACKEND_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let security_config = SecurityConfig::new(jwt.as_bytes());

    let db = match connect_db().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to the database: {e}");
            std::process::exit(1);
        }
    };
    println!("✅ Database connected");

    let mut app_state = AppState::new(db, security_config);

    // Optional integrations: the server runs without them and the
    // affected endpoints answer with a configuration error instead.
    match AiConfig::from_env() {
        Ok(ai) => {
            println!("✅ AI service proxy configured: {}", ai.base_url);
            app_state = match app_state.with_ai(ai) {
                Ok(state) => state,
                Err(e) => {
                    eprintln!("❌ Failed to build the AI service client: {e}");
                    std::process::exit(1);
                }
            };
        }
        Err(_) => println!("ℹ️ AI_SERVICE_URL not set; AI generation endpoints disabled"),
    }
    match StorageConfig::from_env() {
        Ok(storage) => {
            println!("✅ Attachment storage at {}", storage.root.display());
            app_state = app_state.with_storage(storage);
        }
        Err(_) => println!("ℹ️ STORAGE_ROOT not set; attachment endpoints disabled"),
    }

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(cors_middleware())
            .wrap(RequestTrace)
            .app_data(data.clone())
            .service(web::scope("/health").configure(routes::health::configure_routes))
            .service(web::scope("/api/v1/auth").configure(routes::auth::configure_routes))
            .service(
                web::scope("/api/v1")
                    .wrap(JwtExtract)
                    .configure(routes::configure_protected),
            )
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
