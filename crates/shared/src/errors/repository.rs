use sqlx::{
    Error as SqlxError,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Sqlx(SqlxError),

    #[error("Not found")]
    NotFound,

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Check violation: {0}")]
    Check(String),

    #[error("Custom: {0}")]
    Custom(String),
}

impl From<SqlxError> for RepositoryError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::RowNotFound => RepositoryError::NotFound,
            SqlxError::Database(db) => match db.kind() {
                ErrorKind::UniqueViolation => RepositoryError::AlreadyExists(constraint_name(&*db)),
                ErrorKind::ForeignKeyViolation => RepositoryError::ForeignKey(constraint_name(&*db)),
                ErrorKind::CheckViolation => RepositoryError::Check(constraint_name(&*db)),
                _ => RepositoryError::Sqlx(SqlxError::Database(db)),
            },
            other => RepositoryError::Sqlx(other),
        }
    }
}

fn constraint_name(db: &dyn DatabaseError) -> String {
    db.constraint()
        .map(str::to_string)
        .unwrap_or_else(|| db.message().to_string())
}
