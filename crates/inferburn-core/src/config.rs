use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{InferBurnError, Result, TestDescriptor};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    pub docker_container: String,
    pub python: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            docker_container: "inferburn".to_string(),
            python: "python3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestConfig {
    #[serde(default)]
    pub tests: Vec<TestDescriptor>,
}

impl TestConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(InferBurnError::Config(format!(
                "Wrong path to configuration file: {}",
                path.display()
            )));
        }
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_json(&contents)?;
        tracing::info!("Loaded {} tests from {:?}", config.tests.len(), path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ExecutionMode;
    use std::io::Write;

    #[test]
    fn test_load_preserves_order() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"tests": [
                {{"framework": "PyTorch", "model": {{"name": "a", "path": "a.pt"}},
                  "batch_size": 1, "iterations": 5}},
                {{"framework": "OpenVINO DLDT", "model": {{"name": "b", "path": "b.xml"}},
                  "batch_size": 8, "iterations": 100, "mode": "async"}}
            ]}}"#
        )
        .unwrap();

        let config = TestConfig::load(file.path()).unwrap();
        assert_eq!(config.tests.len(), 2);
        assert_eq!(config.tests[0].model.name, "a");
        assert_eq!(config.tests[1].mode, ExecutionMode::Async);
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = TestConfig::from_json(include_str!("../../../configs/sample.json")).unwrap();
        assert_eq!(config.tests.len(), 2);
        for test in &config.tests {
            test.validate().unwrap();
        }
    }

    #[test]
    fn test_missing_file() {
        let result = TestConfig::load(Path::new("/nonexistent/inferburn.json"));
        assert!(matches!(result, Err(InferBurnError::Config(_))));
    }
}
