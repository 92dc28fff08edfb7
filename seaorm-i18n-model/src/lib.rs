pub mod constants;
pub mod field;
pub mod language;
pub mod registry;
pub mod settings;
pub mod unit;
pub mod value;

pub use field::{EntityDef, FieldDef, FieldKind, NamedScope, ScopeFilter};
pub use language::{LanguageId, LanguageKind};
pub use registry::{EntityRecord, I18n};
pub use settings::I18nOptions;
pub use unit::{translation_entity_name, TranslationUnit};
