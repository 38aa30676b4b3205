// SPDX-FileCopyrightText: 2026 Mnemo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::{MnemoConfig, TopicModelSource};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &MnemoConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let level = config.logging.level.trim().to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    for (key, value) in [
        ("models.generation_model", &config.models.generation_model),
        ("models.topic_model", &config.models.topic_model),
        ("models.embedding_model", &config.models.embedding_model),
        ("extraction.ner_model", &config.extraction.ner_model),
    ] {
        if value.trim().is_empty() {
            fail(format!("{key} must not be empty"));
        }
    }

    if config.anthropic.max_tokens == 0 {
        fail("anthropic.max_tokens must be greater than 0".to_string());
    }

    let extraction = &config.extraction;
    if extraction.top_k_topics == 0 {
        fail("extraction.top_k_topics must be greater than 0".to_string());
    }
    if extraction.retry_attempts == 0 {
        fail("extraction.retry_attempts must be at least 1".to_string());
    }
    if extraction.discrete_page_size == 0 {
        fail("extraction.discrete_page_size must be greater than 0".to_string());
    }
    if extraction.discrete_concurrency == 0 {
        fail("extraction.discrete_concurrency must be at least 1".to_string());
    }
    if extraction.data_dir.trim().is_empty() {
        fail("extraction.data_dir must not be empty".to_string());
    }

    let has_topic_table = extraction
        .topic_model_path
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    if extraction.enable_topic_extraction
        && extraction.topic_model_source == TopicModelSource::Statistical
        && !has_topic_table
    {
        fail(
            "extraction.topic_model_path is required when topic_model_source = \"statistical\""
                .to_string(),
        );
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &MnemoConfig) -> Vec<String> {
        match validate_config(config) {
            Ok(()) => Vec::new(),
            Err(errors) => errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&MnemoConfig::default()).is_ok());
    }

    #[test]
    fn unknown_log_level_fails() {
        let mut config = MnemoConfig::default();
        config.logging.level = "loud".into();
        let msgs = messages(&config);
        assert_eq!(msgs.len(), 1);
        assert!(msgs[0].contains("logging.level"));
    }

    #[test]
    fn zero_counts_are_all_reported() {
        let mut config = MnemoConfig::default();
        config.extraction.top_k_topics = 0;
        config.extraction.retry_attempts = 0;
        config.extraction.discrete_page_size = 0;
        config.extraction.discrete_concurrency = 0;
        assert_eq!(messages(&config).len(), 4);
    }

    #[test]
    fn empty_model_name_fails() {
        let mut config = MnemoConfig::default();
        config.models.generation_model = "  ".into();
        let msgs = messages(&config);
        assert!(msgs.iter().any(|m| m.contains("models.generation_model")));
    }

    #[test]
    fn statistical_source_requires_topic_table() {
        let mut config = MnemoConfig::default();
        config.extraction.topic_model_source = TopicModelSource::Statistical;
        assert!(messages(&config)[0].contains("topic_model_path"));

        config.extraction.topic_model_path = Some("/var/lib/mnemo/topics.json".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn statistical_source_ignored_when_topics_disabled() {
        let mut config = MnemoConfig::default();
        config.extraction.enable_topic_extraction = false;
        config.extraction.topic_model_source = TopicModelSource::Statistical;
        assert!(validate_config(&config).is_ok());
    }
}
