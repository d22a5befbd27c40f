//! Application state shared across handlers

use sqlx::PgPool;

use crate::jwt::JwtService;
use crate::repositories::{
    AssignmentRepository, ClassRepository, ExerciseRepository, SettingsRepository, UserRepository,
};
use crate::storage::AudioStorage;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub storage: AudioStorage,
    pub user_repository: UserRepository,
    pub exercise_repository: ExerciseRepository,
    pub assignment_repository: AssignmentRepository,
    pub class_repository: ClassRepository,
    pub settings_repository: SettingsRepository,
}
