//! API models for request and response payloads
//!
//! All request and response bodies use camelCase field names regardless of
//! the snake_case column naming in the database.

pub mod class;
pub mod exercise;
pub mod settings;
pub mod user;

pub use class::{
    ClassQuery, ClassSummary, CreateClassRequest, PaymentStatus, PaymentStatusRequest,
    ScheduledClass, StudentBrief, UpdateClassRequest,
};
pub use exercise::{
    AssignStudentsRequest, AssignedStudent, AssignmentWithExercise, CreateExerciseRequest,
    Exercise, ExerciseAssignments, ExerciseSummary, ExerciseWithCount, ReconcileRequest,
    ReconcileResponse, UnassignRequest, UpdateExerciseRequest,
};
pub use settings::{ContactInfo, PricingItem, SiteSettings, UpdateSettingsRequest};
pub use user::{
    ChangePasswordRequest, CreateStudentRequest, LoginRequest, ProfileResponse, RegisterRequest,
    Role, StudentDetail, StudentResponse, StudentSummary, TeacherProfile, TokenResponse,
    UpdateProfileRequest, UpdateStudentRequest, User,
};
