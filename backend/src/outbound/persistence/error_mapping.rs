//! Shared Diesel error mapping for the account repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Extract a readable message from a pool error.
pub(super) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Constructors a repository supplies to translate Diesel failures.
pub(super) struct DieselErrorMapping<Q, C, U> {
    pub query: Q,
    pub connection: C,
    /// Called with the violated constraint name, when Postgres reports one.
    pub unique_violation: U,
}

/// Map a Diesel error through the repository's constructors.
///
/// Unique violations go to `unique_violation`; closed connections to
/// `connection`; everything else to `query` with a redacted message.
pub(super) fn map_diesel_error<E, Q, C, U>(
    error: DieselError,
    mapping: DieselErrorMapping<Q, C, U>,
) -> E
where
    Q: FnOnce(&'static str) -> E,
    C: FnOnce(&'static str) -> E,
    U: FnOnce(Option<&str>) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => (mapping.query)("record not found"),
        DieselError::QueryBuilderError(_) => (mapping.query)("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            (mapping.unique_violation)(info.constraint_name())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            (mapping.connection)("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            (mapping.query)("referenced record missing")
        }
        _ => (mapping.query)("database error"),
    }
}
