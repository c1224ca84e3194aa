//! Snapshot tests for the OpenAI client

#[cfg(test)]
mod snapshot_tests {
    use crate::OpenAiConfig;
    use insta::assert_yaml_snapshot;

    #[test]
    fn test_config_snapshot() {
        let config = OpenAiConfig {
            api_key: "test_api_key_redacted".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            embedding_dimensions: Some(256),
        };

        assert_yaml_snapshot!(config, @r###"
        ---
        api_key: test_api_key_redacted
        base_url: "https://api.openai.com/v1"
        embedding_model: text-embedding-3-small
        chat_model: gpt-4o-mini
        embedding_dimensions: 256
        "###);
    }
}
