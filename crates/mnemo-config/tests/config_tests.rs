// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Mnemo configuration system.

use figment::Jail;
use mnemo_config::diagnostic::ConfigError;
use mnemo_config::model::{MnemoConfig, TopicModelSource};
use mnemo_config::{load_and_validate_str, load_config, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[logging]
level = "debug"
json = true

[models]
generation_model = "claude-3-5-haiku-latest"
topic_model = "gpt-4o"
embedding_model = "text-embedding-3-small"

[openai]
api_key = "sk-test"
base_url = "http://localhost:8080/v1"

[anthropic]
api_key = "sk-ant-test"
max_tokens = 2048

[extraction]
topic_model_source = "statistical"
topic_model_path = "/var/lib/mnemo/topics.json"
top_k_topics = 5
enable_ner = false
retry_attempts = 4
discrete_page_size = 10
discrete_concurrency = 4
data_dir = "/tmp/mnemo"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
    assert_eq!(config.models.generation_model, "claude-3-5-haiku-latest");
    assert_eq!(config.models.embedding_model, "text-embedding-3-small");
    assert_eq!(config.openai.base_url.as_deref(), Some("http://localhost:8080/v1"));
    assert_eq!(config.anthropic.max_tokens, 2048);
    assert_eq!(config.anthropic.api_version, "2023-06-01");
    assert_eq!(
        config.extraction.topic_model_source,
        TopicModelSource::Statistical
    );
    assert_eq!(config.extraction.top_k_topics, 5);
    assert!(!config.extraction.enable_ner);
    assert!(config.extraction.enable_discrete_memory_extraction);
    assert_eq!(config.extraction.retry_attempts, 4);
    assert_eq!(config.extraction.discrete_concurrency, 4);
}

#[test]
fn empty_toml_uses_defaults() {
    let config = load_config_from_str("").expect("empty config is valid");
    assert_eq!(config.models.generation_model, "gpt-4o-mini");
    assert_eq!(config.models.topic_model, "gpt-4o-mini");
    assert_eq!(config.models.embedding_model, "text-embedding-ada-002");
    assert_eq!(config.extraction.topic_model_source, TopicModelSource::Llm);
    assert_eq!(config.extraction.top_k_topics, 3);
    assert_eq!(config.extraction.ner_model, "dslim/bert-base-NER");
    assert_eq!(config.extraction.retry_attempts, 3);
    assert_eq!(config.extraction.discrete_page_size, 25);
    assert_eq!(config.extraction.discrete_concurrency, 1);
    assert_eq!(config.anthropic.max_tokens, 1024);
    assert!(config.openai.api_key.is_none());
}

#[test]
fn bertopic_is_accepted_as_statistical() {
    let config = load_config_from_str(
        "[extraction]\ntopic_model_source = \"bertopic\"\ntopic_model_path = \"t.json\"\n",
    )
    .unwrap();
    assert_eq!(
        config.extraction.topic_model_source,
        TopicModelSource::Statistical
    );
}

#[test]
fn unknown_field_suggests_correction() {
    let toml = "[extraction]\ntop_k_topic = 4\n";
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            valid_keys,
            ..
        } => {
            assert_eq!(key, "top_k_topic");
            assert_eq!(suggestion.as_deref(), Some("top_k_topics"));
            assert!(valid_keys.contains("discrete_page_size"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_top_level_section_is_rejected() {
    let errors = load_and_validate_str("[storage]\npath = \"x\"\n").unwrap_err();
    assert!(matches!(&errors[0], ConfigError::UnknownKey { key, .. } if key == "storage"));
}

#[test]
fn wrong_type_reports_key_path() {
    let errors = load_and_validate_str("[extraction]\ntop_k_topics = \"many\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert!(key.ends_with("top_k_topics"), "{key}"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn unknown_topic_source_is_invalid_value() {
    let errors =
        load_and_validate_str("[extraction]\ntopic_model_source = \"lda\"\n").unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().contains("lda"), "{}", errors[0]);
}

#[test]
fn validation_errors_surface_through_load() {
    let errors = load_and_validate_str(
        "[extraction]\ntopic_model_source = \"statistical\"\nretry_attempts = 0\n",
    )
    .unwrap_err();
    assert_eq!(errors.len(), 2);
    assert!(
        errors
            .iter()
            .all(|e| matches!(e, ConfigError::Validation { .. }))
    );
}

#[test]
fn config_error_renders_with_miette() {
    let errors = load_and_validate_str("[logging]\njsn = true\n").unwrap_err();
    let handler = miette::GraphicalReportHandler::new();
    let mut out = String::new();
    handler.render_report(&mut out, &errors[0]).unwrap();
    assert!(out.contains("mnemo::config::unknown_key"));
    assert!(out.contains("json"));
}

#[test]
fn env_vars_override_files() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "mnemo.toml",
            "[models]\ngeneration_model = \"gpt-4\"\n[extraction]\ntop_k_topics = 2\n",
        )?;
        jail.set_env("MNEMO_EXTRACTION_TOP_K_TOPICS", "7");
        jail.set_env("MNEMO_OPENAI_API_KEY", "sk-from-env");
        jail.set_env("MNEMO_MODELS_TOPIC_MODEL", "claude-3-opus-latest");

        let config: MnemoConfig = load_config()?;
        assert_eq!(config.models.generation_model, "gpt-4");
        assert_eq!(config.models.topic_model, "claude-3-opus-latest");
        assert_eq!(config.extraction.top_k_topics, 7);
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-from-env"));
        Ok(())
    });
}
