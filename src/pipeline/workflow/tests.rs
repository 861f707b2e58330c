#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::pipeline::context::ResearchContext;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn create_test_context() -> (ResearchContext, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            company_url: "https://acme.com".to_string(),
            output_path: temp_dir.path().join("output"),
            internal_path: temp_dir.path().join(".dossier"),
            ..Default::default()
        };

        let context = ResearchContext::new(config).unwrap();
        (context, temp_dir)
    }

    #[test]
    fn test_research_context_creation() {
        let (_context, _temp_dir) = create_test_context();

        // Context creation itself must not require network or API keys
    }

    #[test]
    fn test_research_context_paths() {
        let (context, temp_dir) = create_test_context();

        assert_eq!(context.config.company_url, "https://acme.com");
        assert_eq!(context.config.output_path, temp_dir.path().join("output"));
        assert_eq!(
            context.config.internal_path,
            temp_dir.path().join(".dossier")
        );
    }

    #[test]
    fn test_research_context_llm_config() {
        let (context, _temp_dir) = create_test_context();

        // api_key may be empty if env var is not set
        assert!(!context.config.llm.api_base_url.is_empty());
        assert!(!context.config.llm.model_efficient.is_empty());
        assert!(!context.config.llm.model_powerful.is_empty());
        assert_eq!(context.config.llm.max_tokens, 131072);
        assert_eq!(context.config.llm.temperature, 0.1);
    }

    #[test]
    fn test_research_context_cache_config() {
        let (context, _temp_dir) = create_test_context();

        assert!(context.config.cache.enabled);
        assert_eq!(
            context.config.cache.cache_dir,
            PathBuf::from(".dossier/cache")
        );
        assert_eq!(context.config.cache.expire_hours, 8760);
    }

    #[tokio::test]
    async fn test_context_memory_roundtrip() {
        let (context, _temp_dir) = create_test_context();

        context
            .store_to_memory("test_scope", "key", "value".to_string())
            .await
            .unwrap();

        assert!(context.has_memory_data("test_scope", "key").await);
        let value: Option<String> = context.get_from_memory("test_scope", "key").await;
        assert_eq!(value, Some("value".to_string()));

        let keys = context.list_memory_keys("test_scope").await;
        assert_eq!(keys, vec!["key".to_string()]);
    }

    #[test]
    fn test_config_with_custom_values() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            company_url: "https://custom.example".to_string(),
            output_path: temp_dir.path().join("custom_output"),
            internal_path: temp_dir.path().join(".dossier"),
            force_regenerate: true,
            verbose: true,
            ..Default::default()
        };

        let context = ResearchContext::new(config);
        assert!(context.is_ok());

        let ctx = context.unwrap();
        assert_eq!(ctx.config.company_url, "https://custom.example");
        assert!(ctx.config.force_regenerate);
        assert!(ctx.config.verbose);
    }

    #[test]
    fn test_skip_flags() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            company_url: "https://acme.com".to_string(),
            output_path: temp_dir.path().join("output"),
            skip_intake: true,
            skip_research: true,
            skip_report: true,
            ..Default::default()
        };

        let context = ResearchContext::new(config);
        assert!(context.is_ok());

        let ctx = context.unwrap();
        assert!(ctx.config.skip_intake);
        assert!(ctx.config.skip_research);
        assert!(ctx.config.skip_report);
    }

    #[test]
    fn test_target_language() {
        use crate::i18n::TargetLanguage;

        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            company_url: "https://acme.com".to_string(),
            output_path: temp_dir.path().join("output"),
            target_language: TargetLanguage::Japanese,
            ..Default::default()
        };

        let context = ResearchContext::new(config);
        assert!(context.is_ok());

        let ctx = context.unwrap();
        assert_eq!(ctx.config.target_language, TargetLanguage::Japanese);
    }
}
