use crate::error::AppError;
use crate::model::Capability;
use crate::repository::error::DatabaseError;

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ServiceError {
    #[error("Actor \"{actor}\" lacks the {capability:?} capability")]
    Forbidden {
        actor: String,
        capability: Capability,
    },

    #[error("AppError: {0}")]
    AppError(#[from] AppError),

    #[error("DatabaseError: {0}")]
    DatabaseError(#[from] DatabaseError),
}
