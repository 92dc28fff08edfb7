pub mod config;
pub mod storage;

use crate::{config::ConfigurationError, storage::StorageError};
use anyhow::Error as AnyhowError;
use sea_orm::DbErr;
use serde_json::Error as SerdeJsonError;
use thiserror::Error;

pub type I18nResult<T, E = I18nError> = anyhow::Result<T, E>;

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    /// Raised when an operation needs a language but none was given and no
    /// default language is configured.
    #[error("no language given")]
    MissingLanguage,

    /// Raised by the setter when the property name to update is missing.
    #[error("property name to update is missing")]
    MissingProperty,

    #[error("{0}")]
    Json(#[from] SerdeJsonError),

    #[error("{0}")]
    ConfigFile(#[from] ::config::ConfigError),

    #[error("{0}")]
    Anyhow(#[from] AnyhowError),
}

impl From<DbErr> for I18nError {
    #[inline]
    fn from(e: DbErr) -> Self {
        I18nError::Storage(StorageError::DBError(e))
    }
}

impl From<String> for I18nError {
    #[inline]
    fn from(e: String) -> Self {
        I18nError::Anyhow(AnyhowError::msg(e))
    }
}
