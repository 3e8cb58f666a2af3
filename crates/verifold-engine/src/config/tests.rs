#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn test_default_pipeline_sizes() {
        let pipeline = PipelineConfig::default();
        assert_eq!(pipeline.sequences_per_cycle, 256);
        assert_eq!(pipeline.batch_size, 32);
        assert_eq!(pipeline.progress_interval, 5);
        assert!(pipeline.max_cycles.is_none());
    }

    #[test]
    fn test_default_scaling_is_enabled() {
        let scaling = ScalingConfig::default();
        assert!(scaling.auto_scale);
        assert_eq!(scaling.high_memory_gb, 100);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [pipeline]
            sequences_per_cycle = 64
            seed = 42
            "#,
        )
        .unwrap();
        assert_eq!(config.pipeline.sequences_per_cycle, 64);
        assert_eq!(config.pipeline.seed, Some(42));
        assert_eq!(config.pipeline.batch_size, 32);
        assert_eq!(config.web.bind_addr, "127.0.0.1:8501");
        assert_eq!(config.database.path, "./data/verifold.lance");
    }

    #[test]
    fn test_empty_toml_is_fully_defaulted() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.database.fallback_dir, "./data/fallback_discoveries");
        assert!(config.scaling.auto_scale);
    }
}
