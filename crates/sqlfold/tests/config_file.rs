//! `BuilderConfig` loaded from a TOML settings file.

use sqlfold::{BuilderConfig, DEFAULT_MAX_PARAMS};

#[derive(serde::Deserialize)]
struct Settings {
    #[serde(default)]
    sql: BuilderConfig,
}

#[test]
fn reads_partial_table() {
    let settings: Settings = toml::from_str(
        r#"
        [sql]
        nolock = true
        like_wildcard = "?"
        max_params = 500
        "#,
    )
    .unwrap();

    assert!(settings.sql.nolock);
    assert_eq!(settings.sql.like_wildcard, '?');
    assert_eq!(settings.sql.max_params, Some(500));
    assert_eq!(settings.sql.param_prefix, '@');
    assert!(settings.sql.paging_order_fallback);
}

#[test]
fn missing_table_uses_defaults() {
    let settings: Settings = toml::from_str("").unwrap();
    assert_eq!(settings.sql, BuilderConfig::default());
    assert_eq!(settings.sql.max_params, Some(DEFAULT_MAX_PARAMS));
}
