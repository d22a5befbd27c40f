//! Repositories for database operations
//!
//! One repository per aggregate, all backed by the shared PgPool. Handlers
//! never issue SQL directly.

pub mod assignment;
pub mod class;
pub mod exercise;
pub mod settings;
pub mod user;

pub use assignment::AssignmentRepository;
pub use class::ClassRepository;
pub use exercise::ExerciseRepository;
pub use settings::SettingsRepository;
pub use user::UserRepository;
