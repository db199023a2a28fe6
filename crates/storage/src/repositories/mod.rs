pub mod predictions_repo;
pub mod session_repo;

pub use predictions_repo::PredictionRepository;
pub use session_repo::{SessionError, SessionRepository, SignupForm};
