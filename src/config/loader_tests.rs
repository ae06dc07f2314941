//! Tests for configuration file loading.

use super::*;
use serial_test::serial;
use std::env;
use std::fs;

#[test]
fn default_config_path_contains_evsheet_config_toml() {
    let Some(path) = default_config_path() else {
        return;
    };
    let path_str = path.to_string_lossy();
    assert!(
        path_str.contains("evsheet") && path_str.ends_with("config.toml"),
        "Path should contain 'evsheet' and end with 'config.toml', got: {}",
        path_str
    );
}

#[test]
fn load_config_file_returns_ok_none_for_missing_file() {
    let result = load_config_file("/nonexistent/path/to/config.toml");
    assert_eq!(
        result,
        Ok(None),
        "Missing config file should return Ok(None), not an error"
    );
}

#[test]
fn load_config_file_parses_valid_toml() {
    let config_path = env::temp_dir().join("evsheet_test_config.toml");

    let toml_content = r#"
overscan_count = 5
default_row_height = 2
viewport_height = 40
indent_width = 4
text_width = 72
match_case = true

[search]
event_strings = false
"#;

    fs::write(&config_path, toml_content).expect("Failed to write test config");

    let config = load_config_file(&config_path)
        .expect("Should successfully parse valid TOML")
        .expect("Should return Some(ConfigFile) for existing file");

    assert_eq!(config.overscan_count, Some(5));
    assert_eq!(config.default_row_height, Some(2));
    assert_eq!(config.viewport_height, Some(40));
    assert_eq!(config.indent_width, Some(4));
    assert_eq!(config.text_width, Some(72));
    assert_eq!(config.match_case, Some(true));
    assert_eq!(
        config.search,
        Some(SearchScopeSection {
            event_strings: Some(false),
            ..SearchScopeSection::default()
        })
    );

    fs::remove_file(config_path).ok();
}

#[test]
fn load_config_file_returns_error_for_invalid_toml() {
    let config_path = env::temp_dir().join("evsheet_test_invalid.toml");

    fs::write(&config_path, "this is not valid TOML ][}{")
        .expect("Failed to write invalid test config");

    let result = load_config_file(&config_path);
    match result {
        Err(ConfigError::ParseError { path, reason: _ }) => {
            assert_eq!(path, config_path);
        }
        _ => panic!("Expected ParseError, got {:?}", result),
    }

    fs::remove_file(config_path).ok();
}

#[test]
fn config_file_rejects_unknown_fields() {
    let result: Result<ConfigFile, _> = toml::from_str("theme = \"monokai\"");
    assert!(result.is_err(), "Unknown keys must be rejected");

    let result: Result<ConfigFile, _> = toml::from_str("[search]\ncomments = true");
    assert!(result.is_err(), "Unknown search keys must be rejected");
}

#[test]
fn merge_config_uses_defaults_when_none() {
    assert_eq!(merge_config(None), ResolvedConfig::default());
}

#[test]
fn merge_config_overrides_with_config_file_values() {
    let config_file = ConfigFile {
        overscan_count: Some(3),
        viewport_height: Some(10),
        search: Some(SearchScopeSection {
            actions: Some(false),
            ..SearchScopeSection::default()
        }),
        ..ConfigFile::default()
    };

    let resolved = merge_config(Some(config_file));
    let defaults = ResolvedConfig::default();
    assert_eq!(resolved.overscan_count, 3);
    assert_eq!(resolved.viewport_height, 10);
    assert!(!resolved.search_in_actions);
    assert_eq!(resolved.search_in_conditions, defaults.search_in_conditions);
    assert_eq!(resolved.indent_width, defaults.indent_width);
    assert_eq!(resolved.text_width, None);
}

#[test]
fn resolved_config_default_has_expected_values() {
    let config = ResolvedConfig::default();
    assert_eq!(config.overscan_count, 20);
    assert_eq!(config.default_row_height, 1);
    assert!(!config.match_case);
    assert!(config.search_in_event_sentences);
}

#[test]
fn search_inputs_follow_configured_scopes() {
    let config = ResolvedConfig {
        match_case: true,
        search_in_event_strings: false,
        ..ResolvedConfig::default()
    };
    let inputs = config.search_inputs("Player");
    assert_eq!(inputs.search_text, "Player");
    assert!(inputs.match_case);
    assert!(!inputs.search_in_event_strings);
    assert!(inputs.search_in_conditions);
    assert!(!inputs.search_in_selection);
}

/// RAII guard to ensure environment variable cleanup even under test parallelism.
struct EnvGuard(&'static str);

impl EnvGuard {
    fn new(name: &'static str) -> Self {
        env::remove_var(name);
        EnvGuard(name)
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        env::remove_var(self.0);
    }
}

#[test]
#[serial(evsheet_match_case)]
fn apply_env_overrides_respects_match_case() {
    let _guard = EnvGuard::new(MATCH_CASE_ENV_VAR);

    env::set_var(MATCH_CASE_ENV_VAR, "true");
    assert!(apply_env_overrides(ResolvedConfig::default()).match_case);

    env::set_var(MATCH_CASE_ENV_VAR, "0");
    let base = ResolvedConfig {
        match_case: true,
        ..ResolvedConfig::default()
    };
    assert!(!apply_env_overrides(base).match_case);
}

#[test]
#[serial(evsheet_match_case)]
fn apply_env_overrides_ignores_garbage() {
    let _guard = EnvGuard::new(MATCH_CASE_ENV_VAR);

    env::set_var(MATCH_CASE_ENV_VAR, "maybe");
    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(evsheet_match_case)]
fn apply_env_overrides_no_change_when_env_var_not_set() {
    let _guard = EnvGuard::new(MATCH_CASE_ENV_VAR);

    let base = ResolvedConfig::default();
    assert_eq!(apply_env_overrides(base.clone()), base);
}

#[test]
#[serial(evsheet_config)]
fn load_config_with_precedence_prefers_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);

    let temp_dir = env::temp_dir();
    let explicit_path = temp_dir.join("evsheet_explicit.toml");
    fs::write(&explicit_path, "viewport_height = 11").expect("Failed to write explicit config");

    let env_path = temp_dir.join("evsheet_env.toml");
    fs::write(&env_path, "viewport_height = 22").expect("Failed to write env config");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let config = load_config_with_precedence(Some(explicit_path.clone()))
        .expect("Should load")
        .expect("Should find explicit config");
    assert_eq!(
        config.viewport_height,
        Some(11),
        "Should use explicit path, not EVSHEET_CONFIG env var"
    );

    fs::remove_file(explicit_path).ok();
    fs::remove_file(env_path).ok();
}

#[test]
#[serial(evsheet_config)]
fn load_config_with_precedence_uses_env_var_when_no_explicit_path() {
    let _guard = EnvGuard::new(CONFIG_ENV_VAR);

    let env_path = env::temp_dir().join("evsheet_env_only.toml");
    fs::write(&env_path, "indent_width = 7").expect("Failed to write env config");
    env::set_var(CONFIG_ENV_VAR, &env_path);

    let config = load_config_with_precedence(None)
        .expect("Should load")
        .expect("Should find env config");
    assert_eq!(config.indent_width, Some(7));

    fs::remove_file(env_path).ok();
}

#[test]
fn apply_cli_overrides_only_touches_given_flags() {
    let base = ResolvedConfig::default();
    assert_eq!(apply_cli_overrides(base.clone(), None, None), base);

    let overridden = apply_cli_overrides(base.clone(), Some(true), Some(5));
    assert!(overridden.match_case);
    assert_eq!(overridden.viewport_height, 5);
    assert_eq!(overridden.overscan_count, base.overscan_count);
}

#[test]
#[serial(evsheet_match_case)]
fn precedence_chain_file_then_env_then_cli() {
    let _guard = EnvGuard::new(MATCH_CASE_ENV_VAR);

    let file = ConfigFile {
        match_case: Some(true),
        viewport_height: Some(30),
        ..ConfigFile::default()
    };
    let merged = merge_config(Some(file));
    assert!(merged.match_case);

    env::set_var(MATCH_CASE_ENV_VAR, "no");
    let with_env = apply_env_overrides(merged);
    assert!(!with_env.match_case);

    let resolved = apply_cli_overrides(with_env, Some(true), None);
    assert!(resolved.match_case);
    assert_eq!(resolved.viewport_height, 30);
}
