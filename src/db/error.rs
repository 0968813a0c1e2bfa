use sea_orm::DbErr;
use thiserror::Error;

/// Errors surfaced by the store services in `db::services`.
///
/// The first three variants are the outcomes callers are expected to branch
/// on; `Db` carries everything the driver reports that the services do not
/// interpret.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Db(#[from] DbErr),
}
