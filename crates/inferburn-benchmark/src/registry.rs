//! Name-keyed lookup of framework adapters.

use std::collections::HashMap;
use std::sync::OnceLock;

use inferburn_core::InferBurnError;

use crate::adapters::{CppBenchmarkAdapter, FrameworkAdapter, ScriptAdapter};
use crate::Result;

const SCRIPT_FRAMEWORKS: &[(&str, &str)] = &[
    ("OpenVINO DLDT", "inference_sync_mode.py"),
    ("PyTorch", "inference_pytorch.py"),
    ("ONNX Runtime", "inference_onnx_runtime.py"),
    ("TensorFlow", "inference_tensorflow.py"),
    ("TensorFlowLite", "inference_tensorflowlite.py"),
    ("Caffe", "inference_caffe.py"),
    ("MXNet", "inference_mxnet.py"),
];

#[derive(Default)]
pub struct FrameworkRegistry {
    adapters: HashMap<String, Box<dyn FrameworkAdapter>>,
}

impl FrameworkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in adapter.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for &(name, script) in SCRIPT_FRAMEWORKS {
            registry.register(ScriptAdapter::new(name, script));
        }
        registry.register(CppBenchmarkAdapter);
        registry
    }

    /// Process-wide registry, built on first use and never modified.
    pub fn global() -> &'static FrameworkRegistry {
        static REGISTRY: OnceLock<FrameworkRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::builtin)
    }

    pub fn register(&mut self, adapter: impl FrameworkAdapter + 'static) {
        self.adapters.insert(adapter.name().to_string(), Box::new(adapter));
    }

    pub fn get(&self, framework: &str) -> Result<&dyn FrameworkAdapter> {
        self.adapters
            .get(framework)
            .map(|adapter| adapter.as_ref())
            .ok_or_else(|| InferBurnError::UnknownFramework(framework.to_string()).into())
    }

    pub fn frameworks(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
