//! Canonical default configuration.
//!
//! # Design
//! - The only place default keys and values are declared; the store seeds new
//!   files from it and the field catalog/API overlay loaded maps on top of it.
//! - Entry order is the order written to a freshly created file.

/// Location of the configuration file when no override is supplied.
pub const DEFAULT_ENV_FILE: &str = "/.env";

/// Default configuration entries, in file order.
pub const DEFAULT_CONFIG: &[(&str, &str)] = &[
    ("BACKUP_CRON", "0 2 * * *"),
    ("TARGET_DIR", "/backup"),
    ("FILTER", ""),
    ("FILTER_DELIMITER", ""),
    ("DRY_RUN", "false"),
    ("LOG_LEVEL", "info"),
    ("DB_ENGINE", "postgres"),
    ("POSTGRES_USER", "postgres"),
    ("POSTGRES_PASSWORD", "password"),
    ("POSTGRES_HOST", "database"),
    ("POSTGRES_DB", "postgres"),
    ("MIN_STORAGE_DURATION", ""),
    ("BUCKET_NAME", ""),
    ("DYNAMO_TABLE", ""),
    ("AWS_ACCESS_KEY_ID", ""),
    ("AWS_SECRET_ACCESS_KEY", ""),
    ("AWS_DEFAULT_REGION", "us-east-1"),
    ("NTFY_URL", ""),
    ("NTFY_TOPIC", ""),
    ("NTFY_USERNAME", ""),
    ("NTFY_PASSWORD", ""),
];
