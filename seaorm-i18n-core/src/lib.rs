//! Per-row, per-language translation storage on top of SeaORM.
//!
//! For each registered base entity with localized fields the plugin
//! synthesizes a companion `<base>_i18n` table, keeps its rows in sync with
//! the base rows through lifecycle hooks, and projects one language's values
//! onto a loaded instance via `get_i18n`/`set_i18n`.
//!
//! Everything is driven by an explicit [`I18n`](seaorm_i18n_model::I18n)
//! registry: define entities against it, run [`Schema::sync`] once, then
//! operate through [`EntityClient`].

pub mod client;
pub mod hooks;
pub mod instance;
pub mod repository;
pub mod schema;

pub use client::EntityClient;
pub use hooks::{CreateOptions, LifecycleHooks, UpdateOptions};
pub use instance::{GetI18nOptions, Instance, TranslationRow};
pub use repository::UpsertOutcome;
pub use schema::Schema;

pub use seaorm_i18n_error as error;
pub use seaorm_i18n_model as model;
