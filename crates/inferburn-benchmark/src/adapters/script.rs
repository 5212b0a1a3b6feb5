use inferburn_core::TestDescriptor;

use crate::executor::{ExecutorKind, TestCommand};
use crate::process::{parse_json_report, TestProcess};
use crate::Result;

use super::{FrameworkAdapter, ProcessOptions};

/// Launches a Python inference script that prints a JSON measurement
/// report as its last line.
pub struct ScriptAdapter {
    name: &'static str,
    script: &'static str,
}

impl ScriptAdapter {
    pub const fn new(name: &'static str, script: &'static str) -> Self {
        Self { name, script }
    }

    fn command(&self, descriptor: &TestDescriptor, options: &ProcessOptions) -> TestCommand {
        let script = options.scripts_dir.join(self.script);

        let mut command = TestCommand::new(options.python.clone())
            .arg(script.to_string_lossy())
            .args(["-m", descriptor.model.path.as_str()])
            .args(["-b".to_string(), descriptor.batch_size.to_string()])
            .args(["-ni".to_string(), descriptor.iterations.to_string()])
            .args(["-d", descriptor.device.as_str()])
            .args(["--mode", descriptor.mode.label()]);

        if let Some(precision) = &descriptor.model.precision {
            command = command.args(["--precision", precision.as_str()]);
        }
        for (key, value) in &descriptor.parameters {
            command = command.arg(format!("--{key}")).arg(value.as_str());
        }
        command
    }
}

impl FrameworkAdapter for ScriptAdapter {
    fn name(&self) -> &str {
        self.name
    }

    fn create_process(
        &self,
        descriptor: &TestDescriptor,
        _executor: ExecutorKind,
        options: &ProcessOptions,
    ) -> Result<TestProcess> {
        Ok(TestProcess::new(
            descriptor.clone(),
            self.command(descriptor, options),
            options.min_time_for(descriptor),
            parse_json_report,
        ))
    }
}
