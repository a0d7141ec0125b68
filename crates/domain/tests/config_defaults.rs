use mx_domain::config::{Config, ProviderKind};

#[test]
fn default_provider_is_gemini_flash() {
    let config = Config::default();
    assert_eq!(config.provider.kind, ProviderKind::Google);
    assert_eq!(config.provider.default_model, "gemini-2.5-flash");
    assert_eq!(
        config.provider.base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(config.provider.timeout_ms, 120_000);
}

#[test]
fn default_api_key_comes_from_gemini_env() {
    let config = Config::default();
    assert_eq!(config.provider.auth.env.as_deref(), Some("GEMINI_API_KEY"));
    assert!(config.provider.auth.key.is_none());
}

#[test]
fn empty_file_yields_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.provider.id, "google");
    assert!(config.explorer.model.is_none());
    assert_eq!(config.observability.filter, "warn");
    assert!(!config.observability.json);
}

#[test]
fn explorer_section_parses() {
    let toml_str = r#"
[explorer]
model = "gemini-2.0-flash"
max_output_tokens = 4096
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.explorer.model.as_deref(), Some("gemini-2.0-flash"));
    assert_eq!(config.explorer.max_output_tokens, Some(4096));
}

#[test]
fn provider_auth_overrides_parse() {
    let toml_str = r#"
[provider]
base_url = "http://localhost:8089/"
timeout_ms = 5000

[provider.auth]
env = "MY_GEMINI_KEY"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.provider.base_url, "http://localhost:8089/");
    assert_eq!(config.provider.timeout_ms, 5000);
    assert_eq!(config.provider.auth.env.as_deref(), Some("MY_GEMINI_KEY"));
    assert_eq!(config.provider.default_model, "gemini-2.5-flash");
}

#[test]
fn load_or_default_missing_file_is_default() {
    let config = Config::load_or_default("/nonexistent/mapexplorer.toml").unwrap();
    assert_eq!(config.provider.id, "google");
}

#[test]
fn unknown_provider_kind_is_rejected() {
    let toml_str = r#"
[provider]
kind = "carrier_pigeon"
"#;
    assert!(toml::from_str::<Config>(toml_str).is_err());
}
