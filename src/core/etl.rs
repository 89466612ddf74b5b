use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Runs a pipeline's extract, transform and load phases in order.
pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<P::Output> {
        let name = self.pipeline.name();
        tracing::info!("🚀 Starting {}", name);

        // Extract
        tracing::debug!("[{}] extracting", name);
        let extracted = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        // Transform
        tracing::debug!("[{}] transforming", name);
        let transformed = self.pipeline.transform(extracted).await?;
        self.monitor.log_stats("Transform");

        // Load
        tracing::debug!("[{}] loading", name);
        let output = self.pipeline.load(transformed).await?;
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ToolError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingPipeline {
        phases: Mutex<Vec<&'static str>>,
        fail_transform: bool,
    }

    impl RecordingPipeline {
        fn new(fail_transform: bool) -> Self {
            Self {
                phases: Mutex::new(Vec::new()),
                fail_transform,
            }
        }
    }

    #[async_trait]
    impl Pipeline for RecordingPipeline {
        type Extracted = Vec<u32>;
        type Transformed = u32;
        type Output = String;

        fn name(&self) -> &str {
            "recording"
        }

        async fn extract(&self) -> Result<Vec<u32>> {
            self.phases.lock().unwrap().push("extract");
            Ok(vec![1, 2, 3])
        }

        async fn transform(&self, data: Vec<u32>) -> Result<u32> {
            self.phases.lock().unwrap().push("transform");
            if self.fail_transform {
                return Err(ToolError::processing("boom"));
            }
            Ok(data.iter().sum())
        }

        async fn load(&self, result: u32) -> Result<String> {
            self.phases.lock().unwrap().push("load");
            Ok(format!("total={}", result))
        }
    }

    #[tokio::test]
    async fn test_phases_run_in_order() {
        let engine = EtlEngine::new(RecordingPipeline::new(false));

        let output = engine.run().await.unwrap();

        assert_eq!(output, "total=6");
        assert_eq!(
            *engine.pipeline().phases.lock().unwrap(),
            vec!["extract", "transform", "load"]
        );
    }

    #[tokio::test]
    async fn test_failure_stops_later_phases() {
        let engine = EtlEngine::new_with_monitoring(RecordingPipeline::new(true), false);

        assert!(engine.run().await.is_err());
        assert_eq!(
            *engine.pipeline().phases.lock().unwrap(),
            vec!["extract", "transform"]
        );
    }
}
