#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use std::path::PathBuf;

    #[test]
    fn test_args_default_values() {
        let args = Args::try_parse_from(&["dossier-rs"]).unwrap();

        assert!(args.url.is_none());
        assert_eq!(args.output_path, PathBuf::from("./dossier.report"));
        assert!(!args.skip_intake);
        assert!(!args.skip_research);
        assert!(!args.skip_report);
        assert!(!args.verbose);
        assert!(!args.force_regenerate);
        assert!(!args.no_cache);
    }

    #[test]
    fn test_args_short_options() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "-u", "https://acme.com",
            "-o", "/test/output",
            "-n", "Acme Corp",
            "-v"
        ]).unwrap();

        assert_eq!(args.url, Some("https://acme.com".to_string()));
        assert_eq!(args.output_path, PathBuf::from("/test/output"));
        assert_eq!(args.name, Some("Acme Corp".to_string()));
        assert!(args.verbose);
    }

    #[test]
    fn test_args_long_options() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "--url", "https://acme.com",
            "--output-path", "/test/output",
            "--skip-intake",
            "--skip-research",
            "--skip-report",
            "--force-regenerate",
            "--verbose"
        ]).unwrap();

        assert_eq!(args.url, Some("https://acme.com".to_string()));
        assert_eq!(args.output_path, PathBuf::from("/test/output"));
        assert!(args.skip_intake);
        assert!(args.skip_research);
        assert!(args.skip_report);
        assert!(args.force_regenerate);
        assert!(args.verbose);
    }

    #[test]
    fn test_args_llm_options() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "--llm-provider", "openai",
            "--llm-api-key", "test-key",
            "--llm-api-base-url", "https://api.openai.com",
            "--model-efficient", "gpt-4o-mini",
            "--model-powerful", "gpt-4o",
            "--max-tokens", "2048",
            "--temperature", "0.7",
            "--max-parallels", "5"
        ]).unwrap();

        assert_eq!(args.llm_provider, Some("openai".to_string()));
        assert_eq!(args.llm_api_key, Some("test-key".to_string()));
        assert_eq!(args.llm_api_base_url, Some("https://api.openai.com".to_string()));
        assert_eq!(args.model_efficient, Some("gpt-4o-mini".to_string()));
        assert_eq!(args.model_powerful, Some("gpt-4o".to_string()));
        assert_eq!(args.max_tokens, Some(2048));
        assert_eq!(args.temperature, Some(0.7));
        assert_eq!(args.max_parallels, Some(5));
    }

    #[test]
    fn test_args_seed_urls() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "--seed-url", "https://acme.com/blog",
            "--seed-url", "https://acme.com/press",
        ]).unwrap();

        assert_eq!(args.seed_url.len(), 2);
    }

    #[test]
    fn test_args_target_language() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "--target-language", "zh"
        ]).unwrap();

        assert_eq!(args.target_language, Some("zh".to_string()));
    }

    #[test]
    fn test_into_config_basic() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "-u", "https://acme.com",
            "-o", "/test/output"
        ]).unwrap();

        let config = args.into_config();
        assert_eq!(config.company_url, "https://acme.com");
        assert_eq!(config.output_path, PathBuf::from("/test/output"));
        assert_eq!(config.internal_path, PathBuf::from(".dossier"));
    }

    #[test]
    fn test_into_config_llm_overrides() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "-u", "https://acme.com",
            "--llm-provider", "deepseek",
            "--llm-api-key", "k",
            "--model-efficient", "m1",
            "--max-parallels", "8",
            "--no-cache",
        ]).unwrap();

        let config = args.into_config();
        assert_eq!(config.llm.provider, crate::config::LLMProvider::DeepSeek);
        assert_eq!(config.llm.api_key, "k");
        assert_eq!(config.llm.model_efficient, "m1");
        // model_powerful未指定时回落到efficient
        assert_eq!(config.llm.model_powerful, "m1");
        assert_eq!(config.llm.max_parallels, 8);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_into_config_seed_urls() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "-u", "https://acme.com",
            "--seed-url", "https://acme.com/blog",
        ]).unwrap();

        let config = args.into_config();
        assert!(config
            .research
            .seed_urls
            .contains(&"https://acme.com/blog".to_string()));
    }

    #[test]
    fn test_into_config_unknown_provider_keeps_default() {
        let args = Args::try_parse_from(&[
            "dossier-rs",
            "-u", "https://acme.com",
            "--llm-provider", "not-a-provider",
        ]).unwrap();

        let config = args.into_config();
        assert_eq!(config.llm.provider, crate::config::LLMProvider::OpenAI);
    }
}
