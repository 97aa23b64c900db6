//! Session configuration.

use levelkit_schema::ValidationSettings;

/// Group stamped on entities added in a session, unless configured off.
pub const DEFAULT_TAG_GROUP: i64 = 9999;

/// Checks run over the whole level before it is written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportChecks {
    /// Re-run field validation on every entity, imported ones included.
    pub revalidate: bool,

    /// Require every group a trigger targets to be carried by some entity.
    pub targets_exist: bool,
}

impl Default for ExportChecks {
    fn default() -> Self {
        Self {
            revalidate: true,
            targets_exist: false,
        }
    }
}

impl ExportChecks {
    /// Disables every check.
    #[must_use]
    pub fn none() -> Self {
        Self {
            revalidate: false,
            targets_exist: false,
        }
    }

    /// Enables or disables revalidation.
    #[must_use]
    pub fn with_revalidate(mut self, enabled: bool) -> Self {
        self.revalidate = enabled;
        self
    }

    /// Enables or disables the target-exists check.
    #[must_use]
    pub fn with_targets_exist(mut self, enabled: bool) -> Self {
        self.targets_exist = enabled;
        self
    }
}

/// Configuration for a [`Session`](crate::Session).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Group marking entities added this session. Loaded entities carrying
    /// it are dropped, so re-running a build script replaces its output.
    pub tag_group: Option<i64>,

    /// Validation applied to every write.
    pub validation: ValidationSettings,

    /// Checks run at export.
    pub export: ExportChecks,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tag_group: Some(DEFAULT_TAG_GROUP),
            validation: ValidationSettings::default(),
            export: ExportChecks::default(),
        }
    }
}

impl SessionConfig {
    /// Sets the tag group, or disables tagging with `None`.
    #[must_use]
    pub fn with_tag_group(mut self, tag_group: Option<i64>) -> Self {
        self.tag_group = tag_group;
        self
    }

    /// Sets the validation settings.
    #[must_use]
    pub fn with_validation(mut self, validation: ValidationSettings) -> Self {
        self.validation = validation;
        self
    }

    /// Sets the export checks.
    #[must_use]
    pub fn with_export(mut self, export: ExportChecks) -> Self {
        self.export = export;
        self
    }
}
