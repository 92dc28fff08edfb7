use thiserror::Error;

/// Errors raised by the dynamic storage layer.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("database error: `{0}`")]
    DBError(#[from] sea_orm::DbErr),

    #[error("entity not found: {0}")]
    EntityNotFound(String),

    /// A statement could not be assembled, e.g. a value was bound to a
    /// column the described schema does not contain.
    #[error("statement build error: {0}")]
    Statement(String),

    /// A fetched column did not decode as the kind its description declares.
    #[error("column decode error: {0}")]
    Decode(String),
}
