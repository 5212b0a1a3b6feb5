use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ExecutionMode, InferBurnError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub precision: Option<String>,
}

/// One benchmark case as read from the test configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestDescriptor {
    pub framework: String,
    pub model: ModelSpec,
    pub batch_size: u32,
    #[serde(default)]
    pub mode: ExecutionMode,
    pub iterations: u32,
    /// Samples shorter than this (seconds) are treated as invalid.
    #[serde(default)]
    pub min_inference_time: f64,
    #[serde(default = "default_device")]
    pub device: String,
    /// Framework-specific options passed through to the adapter.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

fn default_device() -> String {
    "CPU".to_string()
}

impl TestDescriptor {
    pub fn validate(&self) -> Result<()> {
        if self.framework.trim().is_empty() {
            return Err(InferBurnError::InvalidDescriptor(
                "framework must not be empty".to_string(),
            ));
        }
        if self.batch_size == 0 {
            return Err(InferBurnError::InvalidDescriptor(format!(
                "batch_size must be positive for model {}",
                self.model.name
            )));
        }
        if self.iterations == 0 {
            return Err(InferBurnError::InvalidDescriptor(format!(
                "iterations must be positive for model {}",
                self.model.name
            )));
        }
        if !self.min_inference_time.is_finite() || self.min_inference_time < 0.0 {
            return Err(InferBurnError::InvalidDescriptor(format!(
                "min_inference_time must be a non-negative number, got {}",
                self.min_inference_time
            )));
        }
        Ok(())
    }

    pub fn parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).map(String::as_str)
    }
}

#[cfg(test)]
pub(crate) fn sample_descriptor(framework: &str) -> TestDescriptor {
    TestDescriptor {
        framework: framework.to_string(),
        model: ModelSpec {
            name: "resnet-50".to_string(),
            path: "models/resnet-50.xml".to_string(),
            precision: Some("FP32".to_string()),
        },
        batch_size: 1,
        mode: ExecutionMode::Sync,
        iterations: 10,
        min_inference_time: 0.0,
        device: default_device(),
        parameters: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let json = r#"{
            "framework": "PyTorch",
            "model": {"name": "bert", "path": "bert.pt"},
            "batch_size": 4,
            "iterations": 20
        }"#;
        let descriptor: TestDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(descriptor.mode, ExecutionMode::Sync);
        assert_eq!(descriptor.min_inference_time, 0.0);
        assert_eq!(descriptor.device, "CPU");
        assert!(descriptor.parameters.is_empty());
        assert!(descriptor.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_batch() {
        let mut descriptor = sample_descriptor("PyTorch");
        descriptor.batch_size = 0;
        assert!(matches!(
            descriptor.validate(),
            Err(InferBurnError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn test_rejects_negative_min_time() {
        let mut descriptor = sample_descriptor("PyTorch");
        descriptor.min_inference_time = -0.5;
        assert!(descriptor.validate().is_err());
    }
}
