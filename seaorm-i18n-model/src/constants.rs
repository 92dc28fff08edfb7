/// Suffix appended to a base entity name to derive its translation entity.
pub const TRANSLATION_SUFFIX: &str = "_i18n";

/// Synthetic primary key column of every synthesized translation table.
pub const ID_COL: &str = "id";

/// Foreign key column referencing the base entity's primary key.
pub const PARENT_ID_COL: &str = "parent_id";

/// Language discriminator column of a translation table.
pub const LANGUAGE_ID_COL: &str = "language_id";

/// Base-entity primary key column used when the options name no other.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// Name of the selectable scope that eagerly loads translation rows.
pub const I18N_SCOPE: &str = "i18n";
