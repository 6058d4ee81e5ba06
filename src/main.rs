use actix_cors::Cors;
use actix_web::{web, App, HttpServer, middleware};
use clap::{Parser, Subcommand};
use matchmaker::config::Settings;
use matchmaker::core::{Matchmaker, ProfileTarget};
use matchmaker::routes::{self, matches::AppState};
use matchmaker::services::{OpenAiOracle, PostgresClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "matchmaker", about = "Pairwise compatibility matching for dating profiles")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Run the matcher once and exit
    Run {
        /// Match only the profile with this name (case-insensitive)
        #[arg(long, conflicts_with = "id")]
        name: Option<String>,
        /// Match only the profile with this id
        #[arg(long)]
        id: Option<i64>,
        /// Score pairs without persisting matches
        #[arg(long)]
        dry_run: bool,
    },
}

fn init_logging(settings: &Settings) {
    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| settings.logging.level.clone());
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| settings.logging.format.clone());

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level))
        .with_target(false)
        .with_level(true);

    if log_format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.compact().init();
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;

    init_logging(&settings);

    info!("Configuration loaded successfully");

    let postgres = Arc::new(
        PostgresClient::from_settings(
            &settings.database.url,
            settings.database.max_connections,
            settings.database.min_connections,
            settings.database.acquire_timeout_secs,
            settings.database.idle_timeout_secs,
        )
        .await
        .map_err(|e| {
            error!("Failed to connect to PostgreSQL: {}", e);
            std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
        })?,
    );

    info!("PostgreSQL client initialized");

    if settings.oracle.api_key.is_empty() {
        error!("Oracle API key is empty; every pair will be undeterminable");
    }

    let oracle = Arc::new(OpenAiOracle::new(settings.oracle.to_oracle_config()).map_err(|e| {
        error!("Failed to create oracle client: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?);

    let options = settings.matching_options();
    let matchmaker = Matchmaker::new(postgres.clone(), postgres.clone(), oracle, options);

    info!("Matchmaker initialized with options: {:?}", options);

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings, postgres, matchmaker).await,
        Command::Run { name, id, dry_run } => run_once(&matchmaker, name, id, dry_run).await,
    }
}

async fn run_once(
    matchmaker: &Matchmaker,
    name: Option<String>,
    id: Option<i64>,
    dry_run: bool,
) -> std::io::Result<()> {
    let target = match (id, name) {
        (Some(id), _) => Some(ProfileTarget::Id(id)),
        (None, Some(name)) => Some(ProfileTarget::Name(name)),
        (None, None) => None,
    };

    let result = match &target {
        Some(target) => matchmaker.run_for_profile(target, dry_run).await,
        None => matchmaker.run_all(dry_run).await,
    };

    let report = result.map_err(|e| {
        error!("Matching run failed: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    match &report.target {
        Some(target) => println!("Generated {} matches for {}", report.matches_created, target),
        None => println!("Successfully generated {} matches for all profiles", report.matches_created),
    }

    for m in &report.matches {
        println!("{}", "-".repeat(50));
        if report.target.is_some() {
            // Single-profile runs put the target on side A
            println!("Match with {}", m.partner_of(m.record.profile_a));
        } else {
            println!("{}", m);
        }
        println!("Compatibility Score: {:.1}", m.record.score);
        println!("Reason: {}", m.record.rationale);
    }

    Ok(())
}

async fn serve(
    settings: Settings,
    postgres: Arc<PostgresClient>,
    matchmaker: Matchmaker,
) -> std::io::Result<()> {
    let app_state = AppState { postgres, matchmaker };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(web::JsonConfig::default().error_handler(routes::handle_json_payload_error))
            .app_data(web::QueryConfig::default().error_handler(routes::handle_query_payload_error))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
