use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod error;
mod jwt;
mod middleware;
mod models;
mod reconcile;
mod repositories;
mod routes;
mod state;
mod storage;
mod validation;

use common::database::{DatabaseConfig, init_pool};

use crate::jwt::{JwtConfig, JwtService};
use crate::repositories::{
    AssignmentRepository, ClassRepository, ExerciseRepository, SettingsRepository, UserRepository,
};
use crate::state::AppState;
use crate::storage::AudioStorage;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("setting default subscriber failed");

    info!("Starting studio API service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    // Apply pending migrations
    sqlx::migrate!().run(&pool).await?;
    info!("Database migrations applied");

    // Initialize JWT service
    let jwt_config = JwtConfig::from_env()?;
    let jwt_service = JwtService::new(jwt_config);

    // Initialize blob storage
    let storage = AudioStorage::from_env().await?;

    // Initialize repositories
    let user_repository = UserRepository::new(pool.clone());
    let exercise_repository = ExerciseRepository::new(pool.clone());
    let assignment_repository = AssignmentRepository::new(pool.clone());
    let class_repository = ClassRepository::new(pool.clone());
    let settings_repository = SettingsRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        storage,
        user_repository,
        exercise_repository,
        assignment_repository,
        class_repository,
        settings_repository,
    };

    info!("Studio API service initialized successfully");

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Studio API service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
