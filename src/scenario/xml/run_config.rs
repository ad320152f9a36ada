//! Run-configuration file (`configuration` root)

use super::records::{
    number, to_document, ConfigurationFile, InputSection, OutputSection, ProcessingSection,
    TimeSection, Value,
};
use crate::scenario::error::Result;
use crate::scenario::run_config::RunConfig;

fn joined(files: &[String]) -> Option<Value> {
    (!files.is_empty()).then(|| Value::new(files.join(",")))
}

fn file_value(file: &Option<String>) -> Option<Value> {
    file.as_deref().map(Value::new)
}

pub fn render_run_config(config: &RunConfig) -> Result<String> {
    config.validate()?;

    let outputs = &config.outputs;
    let file = ConfigurationFile {
        input: InputSection {
            net_file: file_value(&config.net_file),
            route_files: joined(&config.route_files),
            additional_files: joined(&config.additional_files),
        },
        time: TimeSection {
            begin: Value::new(number(config.begin)),
            end: Value::new(number(config.end)),
            step_length: Value::new(number(config.step_length)),
        },
        output: OutputSection {
            tripinfo: file_value(&outputs.tripinfo),
            fcd: file_value(&outputs.fcd),
            emission: file_value(&outputs.emission),
            summary: file_value(&outputs.summary),
            queue: file_value(&outputs.queue),
            statistic: file_value(&outputs.statistic),
        },
        processing: ProcessingSection {
            time_to_teleport: Value::new(config.time_to_teleport.to_string()),
            ignore_route_errors: config.ignore_route_errors.then(|| Value::new("true")),
        },
    };
    to_document(&file)
}
