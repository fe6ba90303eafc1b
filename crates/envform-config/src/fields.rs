//! Catalog of operator-facing configuration fields.
//!
//! # Design
//! - Display order, editor kind and help text for each key live here, next to
//!   the defaults, so form surfaces do not keep their own copies.
//! - Shape checks are advisory; saving never depends on them.

use serde::Serialize;

use crate::cron::check_cron;
use crate::error::ConfigResult;

/// Editor used for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text.
    Text,
    /// Directory picked through the filesystem browser.
    TargetDir,
    /// Cron schedule.
    Cron,
    /// `true`/`false` toggle.
    Checkbox,
    /// Delimiter-encoded pattern list.
    Filter,
}

/// Static description of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    /// Configuration key.
    pub key: &'static str,
    /// Editor kind.
    pub kind: FieldKind,
    /// Help text shown next to the field.
    pub tooltip: &'static str,
}

impl FieldSpec {
    const fn new(key: &'static str, kind: FieldKind, tooltip: &'static str) -> Self {
        Self { key, kind, tooltip }
    }

    /// Whether the value should be masked when displayed.
    #[must_use]
    pub fn is_secret(&self) -> bool {
        self.key.contains("PASSWORD") || self.key.contains("SECRET")
    }
}

/// Fields in display order.
pub const FIELD_SPECS: &[FieldSpec] = &[
    FieldSpec::new(
        "TARGET_DIR",
        FieldKind::TargetDir,
        "Directory to store backups",
    ),
    FieldSpec::new(
        "BACKUP_CRON",
        FieldKind::Cron,
        "Cron expression for backup schedule",
    ),
    FieldSpec::new(
        "FILTER",
        FieldKind::Filter,
        "Regular expressions selecting what to back up",
    ),
    FieldSpec::new("DRY_RUN", FieldKind::Checkbox, "Enable dry run mode"),
    FieldSpec::new(
        "LOG_LEVEL",
        FieldKind::Text,
        "Logging level (debug, info, warn, error)",
    ),
    FieldSpec::new(
        "DB_ENGINE",
        FieldKind::Text,
        "Database engine (postgres, mysql)",
    ),
    FieldSpec::new("POSTGRES_USER", FieldKind::Text, "PostgreSQL username"),
    FieldSpec::new("POSTGRES_PASSWORD", FieldKind::Text, "PostgreSQL password"),
    FieldSpec::new("POSTGRES_HOST", FieldKind::Text, "PostgreSQL host"),
    FieldSpec::new("POSTGRES_DB", FieldKind::Text, "PostgreSQL database name"),
    FieldSpec::new(
        "MIN_STORAGE_DURATION",
        FieldKind::Text,
        "Minimum duration to keep backups (e.g., 7d, 30d)",
    ),
    FieldSpec::new("BUCKET_NAME", FieldKind::Text, "S3 bucket name"),
    FieldSpec::new("DYNAMO_TABLE", FieldKind::Text, "DynamoDB table name"),
    FieldSpec::new("AWS_ACCESS_KEY_ID", FieldKind::Text, "AWS access key ID"),
    FieldSpec::new(
        "AWS_SECRET_ACCESS_KEY",
        FieldKind::Text,
        "AWS secret access key",
    ),
    FieldSpec::new("AWS_DEFAULT_REGION", FieldKind::Text, "AWS region"),
    FieldSpec::new("NTFY_URL", FieldKind::Text, "ntfy.sh URL"),
    FieldSpec::new("NTFY_TOPIC", FieldKind::Text, "ntfy.sh topic"),
    FieldSpec::new("NTFY_USERNAME", FieldKind::Text, "ntfy.sh username"),
    FieldSpec::new("NTFY_PASSWORD", FieldKind::Text, "ntfy.sh password"),
];

/// Catalog entry for `key`.
#[must_use]
pub fn field_spec(key: &str) -> Option<&'static FieldSpec> {
    FIELD_SPECS.iter().find(|spec| spec.key == key)
}

/// Whether `value` has the syntactic shape expected by `kind`.
///
/// # Errors
///
/// Returns an error if the cron patterns fail to compile.
pub fn check_field(kind: FieldKind, value: &str) -> ConfigResult<bool> {
    match kind {
        FieldKind::Cron => Ok(check_cron(value)?.is_valid()),
        FieldKind::Checkbox => Ok(matches!(value, "true" | "false")),
        FieldKind::Text | FieldKind::TargetDir | FieldKind::Filter => Ok(true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConfigMap;

    #[test]
    fn every_field_has_a_default() {
        let defaults = ConfigMap::defaults();
        for spec in FIELD_SPECS {
            assert!(defaults.get(spec.key).is_some(), "missing default for {}", spec.key);
        }
    }

    #[test]
    fn default_values_have_valid_shapes() -> ConfigResult<()> {
        let defaults = ConfigMap::defaults();
        for spec in FIELD_SPECS {
            let value = defaults.get(spec.key).unwrap_or_default();
            assert!(check_field(spec.kind, value)?, "{} default rejected", spec.key);
        }
        Ok(())
    }

    #[test]
    fn secrets_are_detected_by_key() {
        let secret_keys: Vec<_> = FIELD_SPECS
            .iter()
            .filter(|spec| spec.is_secret())
            .map(|spec| spec.key)
            .collect();
        assert_eq!(
            secret_keys,
            vec!["POSTGRES_PASSWORD", "AWS_SECRET_ACCESS_KEY", "NTFY_PASSWORD"]
        );
    }

    #[test]
    fn checkbox_accepts_only_literal_booleans() -> ConfigResult<()> {
        assert!(check_field(FieldKind::Checkbox, "true")?);
        assert!(!check_field(FieldKind::Checkbox, "yes")?);
        assert!(!check_field(FieldKind::Cron, "every day")?);
        assert!(check_field(FieldKind::Text, "anything at all")?);
        Ok(())
    }

    #[test]
    fn lookup_by_key() {
        assert_eq!(field_spec("FILTER").map(|spec| spec.kind), Some(FieldKind::Filter));
        assert!(field_spec("FILTER_DELIMITER").is_none());
    }
}
