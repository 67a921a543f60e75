/// Bounds for values read from `config.toml` and the environment.
/// Fewest backups kept per application by cleanup
pub const MIN_KEEP_COUNT: usize = 1;

/// Most backups kept per application by cleanup
pub const MAX_KEEP_COUNT: usize = 1000;

/// Shortest retention for backups (days)
pub const MIN_KEEP_DAYS: i64 = 1;

/// Longest retention for backups (10 years)
pub const MAX_KEEP_DAYS: i64 = 3650;

/// Longest a reload command may run (seconds)
pub const MAX_RELOAD_TIMEOUT_SECS: u64 = 120;

/// Longest a generation request may run (10 minutes)
pub const MAX_GENERATOR_TIMEOUT_SECS: u64 = 600;

/// Shortest timeout accepted for any external command (seconds)
pub const MIN_COMMAND_TIMEOUT_SECS: u64 = 1;

/// Longest accepted theme name
pub const MAX_THEME_NAME_LENGTH: usize = 64;
