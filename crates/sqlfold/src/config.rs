//! Builder configuration.

use serde::Deserialize;

/// Default maximum number of parameters in one statement (the T-SQL limit).
pub const DEFAULT_MAX_PARAMS: usize = 2100;

/// Settings shared by the query, insert and update builders.
///
/// Deserializable so applications can keep it next to their connection
/// settings; missing keys fall back to [`BuilderConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Prefix written in front of every parameter name in SQL text.
    pub param_prefix: char,
    /// Add `WITH (NOLOCK)` to tables registered through the typed shortcuts.
    pub nolock: bool,
    /// Emit `ORDER BY (SELECT NULL)` when paging a query that has no ordering.
    pub paging_order_fallback: bool,
    /// Alternate wildcard accepted by `like` and rewritten to `%`.
    pub like_wildcard: char,
    /// Maximum parameters per statement. `None` disables the check.
    pub max_params: Option<usize>,
    /// Truncate SQL in log events (in bytes). `None` means no truncation.
    pub max_logged_sql: Option<usize>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            param_prefix: '@',
            nolock: false,
            paging_order_fallback: true,
            like_wildcard: '*',
            max_params: Some(DEFAULT_MAX_PARAMS),
            max_logged_sql: Some(200),
        }
    }
}

impl BuilderConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the parameter prefix (`@` by default).
    pub fn with_param_prefix(mut self, prefix: char) -> Self {
        self.param_prefix = prefix;
        self
    }

    /// Hint `WITH (NOLOCK)` on every table registered through `from`/`*_join`.
    pub fn with_nolock(mut self, nolock: bool) -> Self {
        self.nolock = nolock;
        self
    }

    /// Enable or disable the `ORDER BY (SELECT NULL)` paging fallback.
    pub fn with_paging_order_fallback(mut self, enabled: bool) -> Self {
        self.paging_order_fallback = enabled;
        self
    }

    /// Set the alternate LIKE wildcard (`*` by default).
    pub fn with_like_wildcard(mut self, wildcard: char) -> Self {
        self.like_wildcard = wildcard;
        self
    }

    /// Set the parameter limit.
    pub fn with_max_params(mut self, limit: usize) -> Self {
        self.max_params = Some(limit);
        self
    }

    /// Disable the parameter limit.
    pub fn unlimited_params(mut self) -> Self {
        self.max_params = None;
        self
    }

    /// Set maximum SQL length shown in log events.
    pub fn with_max_logged_sql(mut self, len: usize) -> Self {
        self.max_logged_sql = Some(len);
        self
    }

    /// Disable SQL truncation in log events.
    pub fn no_log_truncate(mut self) -> Self {
        self.max_logged_sql = None;
        self
    }

    /// Render a bound parameter name as it appears in SQL text.
    pub(crate) fn placeholder(&self, name: &str) -> String {
        format!("{}{}", self.param_prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = BuilderConfig::default();
        assert_eq!(cfg.placeholder("p1"), "@p1");
        assert_eq!(cfg.max_params, Some(DEFAULT_MAX_PARAMS));
        assert!(cfg.paging_order_fallback);
        assert!(!cfg.nolock);
    }

    #[test]
    fn test_chained_setters() {
        let cfg = BuilderConfig::new()
            .with_nolock(true)
            .with_like_wildcard('?')
            .unlimited_params();
        assert!(cfg.nolock);
        assert_eq!(cfg.like_wildcard, '?');
        assert_eq!(cfg.max_params, None);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let cfg: BuilderConfig =
            serde_json::from_str(r#"{"nolock": true, "max_params": 10}"#).unwrap();
        assert!(cfg.nolock);
        assert_eq!(cfg.max_params, Some(10));
        assert_eq!(cfg.param_prefix, '@');
    }
}
