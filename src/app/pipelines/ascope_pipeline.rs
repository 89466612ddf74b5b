use crate::core::{Pipeline, Storage};
use crate::domain::model::AscopeReport;
use crate::utils::error::{Result, ToolError};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::path::PathBuf;

pub const REPORT_ID_PREFIX: &str = "ASCOPE-";

/// Wraps the `template` object of a template file into a timestamped report.
pub struct AscopePipeline<S: Storage> {
    storage: S,
    template_path: PathBuf,
    report_path: PathBuf,
    timestamp: Option<DateTime<Local>>,
}

impl<S: Storage> AscopePipeline<S> {
    pub fn new(
        storage: S,
        template_path: impl Into<PathBuf>,
        report_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            storage,
            template_path: template_path.into(),
            report_path: report_path.into(),
            timestamp: None,
        }
    }

    /// Pin the report timestamp instead of reading the clock.
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

pub fn build_report(content: Value, timestamp: DateTime<Local>) -> AscopeReport {
    AscopeReport {
        report_id: format!("{}{}", REPORT_ID_PREFIX, timestamp.format("%Y%m%d%H%M%S")),
        generated_at: iso_local(timestamp),
        content,
    }
}

/// Local ISO-8601 without offset; microseconds only when non-zero.
fn iso_local(timestamp: DateTime<Local>) -> String {
    let format = if timestamp.timestamp_subsec_micros() == 0 {
        "%Y-%m-%dT%H:%M:%S"
    } else {
        "%Y-%m-%dT%H:%M:%S%.6f"
    };
    timestamp.naive_local().format(format).to_string()
}

/// Empty, zero, false and null templates carry nothing to report.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for AscopePipeline<S> {
    type Extracted = Value;
    type Transformed = AscopeReport;
    type Output = PathBuf;

    fn name(&self) -> &str {
        "ascope-report"
    }

    async fn extract(&self) -> Result<Value> {
        let data = match self.storage.read_file(&self.template_path).await {
            Ok(data) => data,
            Err(ToolError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ToolError::NothingToDo {
                    message: format!(
                        "Template file not found at {}",
                        self.template_path.display()
                    ),
                });
            }
            Err(e) => return Err(e),
        };

        let document: Value = serde_json::from_slice(&data)?;
        let Value::Object(mut fields) = document else {
            return Err(ToolError::processing(format!(
                "{} must contain a JSON object",
                self.template_path.display()
            )));
        };

        let template = fields.remove("template").unwrap_or(Value::Null);
        if is_blank(&template) {
            return Err(ToolError::NothingToDo {
                message: "No template data available to generate the report".to_string(),
            });
        }

        Ok(template)
    }

    async fn transform(&self, template: Value) -> Result<AscopeReport> {
        let timestamp = self.timestamp.unwrap_or_else(Local::now);
        Ok(build_report(template, timestamp))
    }

    async fn load(&self, report: AscopeReport) -> Result<PathBuf> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
        report.serialize(&mut serializer)?;

        self.storage.write_file(&self.report_path, &buffer).await?;
        tracing::debug!("{} written ({} bytes)", report.report_id, buffer.len());

        Ok(self.report_path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use serde_json::json;

    #[test]
    fn test_report_id_from_timestamp() {
        let timestamp = Local.with_ymd_and_hms(2024, 9, 3, 14, 5, 9).unwrap();
        let report = build_report(json!({"area": "San Juan"}), timestamp);

        assert_eq!(report.report_id, "ASCOPE-20240903140509");
        assert_eq!(report.generated_at, "2024-09-03T14:05:09");
        assert_eq!(report.content, json!({"area": "San Juan"}));
    }

    #[test]
    fn test_generated_at_keeps_microseconds() {
        let timestamp = Local
            .with_ymd_and_hms(2024, 9, 3, 14, 5, 9)
            .unwrap()
            .with_nanosecond(42_500_000)
            .unwrap();
        let report = build_report(json!({"area": "San Juan"}), timestamp);

        assert_eq!(report.report_id, "ASCOPE-20240903140509");
        assert_eq!(report.generated_at, "2024-09-03T14:05:09.042500");
    }

    #[test]
    fn test_blank_templates() {
        assert!(is_blank(&json!({})));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!(0)));
        assert!(!is_blank(&json!({"Areas": []})));
        assert!(!is_blank(&json!("text")));
    }
}
