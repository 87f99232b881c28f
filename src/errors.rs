use sea_orm::error::DbErr;
use uuid::Uuid;

/// Unified error type returned by every engine service.
///
/// All variants are recoverable at the call boundary: a failed use case rolls
/// its transaction back and leaves previously committed state untouched.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::error::DbErr),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid status: {0}")]
    InvalidStatus(String),

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

    #[error("No open shift: {0}")]
    NoOpenShift(String),

    #[error("No completed orders: {0}")]
    NoCompletedOrders(String),

    #[error("Item not found at destination: {0}")]
    ItemNotFoundAtDestination(String),

    #[error("Concurrent modification: {0}")]
    ConcurrencyConflict(Uuid),

    #[error("Event error: {0}")]
    EventError(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

/// Store-level write contention: Postgres serialization failures and
/// deadlocks, SQLite busy/locked.
fn is_write_contention(err: &DbErr) -> bool {
    let runtime = match err {
        DbErr::Conn(e) | DbErr::Exec(e) | DbErr::Query(e) => e,
        _ => return false,
    };
    match runtime {
        sea_orm::RuntimeErr::SqlxError(sea_orm::sqlx::Error::Database(db)) => matches!(
            db.code().as_deref(),
            Some("40001") | Some("40P01") | Some("5") | Some("6") | Some("517")
        ),
        _ => false,
    }
}

impl ServiceError {
    /// True for errors caused by store-level write contention. These are
    /// retried once by the keyed-lock wrappers before being surfaced.
    pub fn is_retryable(&self) -> bool {
        match self {
            ServiceError::ConcurrencyConflict(_) => true,
            ServiceError::DatabaseError(err) => is_write_contention(err),
            _ => false,
        }
    }
}

/// Maps sea-orm transaction failures back onto the service taxonomy.
impl From<sea_orm::TransactionError<ServiceError>> for ServiceError {
    fn from(err: sea_orm::TransactionError<ServiceError>) -> Self {
        match err {
            sea_orm::TransactionError::Connection(e) => ServiceError::DatabaseError(e),
            sea_orm::TransactionError::Transaction(e) => e,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_wraps_db_err() {
        let err: ServiceError = DbErr::Custom("boom".into()).into();
        assert!(matches!(err, ServiceError::DatabaseError(_)));
        assert_eq!(err.to_string(), "Database error: Custom Error: boom");
    }

    #[test]
    fn validation_errors_convert() {
        use validator::Validate;

        #[derive(Validate)]
        struct OrderLine {
            #[validate(range(min = 1))]
            quantity: i32,
        }

        let err: ServiceError = OrderLine { quantity: 0 }.validate().unwrap_err().into();
        assert!(matches!(err, ServiceError::ValidationError(_)));
    }

    #[test]
    fn only_contention_is_retryable() {
        assert!(ServiceError::ConcurrencyConflict(Uuid::new_v4()).is_retryable());
        assert!(!ServiceError::NotFound("x".into()).is_retryable());
        assert!(!ServiceError::InsufficientStock("x".into()).is_retryable());
        assert!(!ServiceError::DatabaseError(DbErr::Custom("boom".into())).is_retryable());
        assert!(!ServiceError::DatabaseError(DbErr::Query(sea_orm::RuntimeErr::Internal(
            "not contention".into()
        )))
        .is_retryable());
    }
}
