use crate::core::discovery::{
    discover_divisions, discover_link_lists, parse_link_lines, LinkListSelector,
};
use crate::core::naming::{ArtifactNamer, NameClaim};
use crate::core::qr::{encode_png, RenderOptions};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{
    ArtifactPlan, BatchFailure, BatchPlan, BatchReport, LinkEntry, PlannedArtifact, QrArtifact,
};
use crate::utils::error::{Result, ToolError};
use std::path::{Path, PathBuf};

/// Batch QR generator.
///
/// Storage is rooted at the batch root, so every path handled here is
/// relative to it.
pub struct QrBatchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    selector: LinkListSelector,
    render: RenderOptions,
}

impl<S: Storage, C: ConfigProvider> QrBatchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let selector = LinkListSelector::parse(config.link_list());
        let render = RenderOptions::from_config(&config)?;
        Ok(Self {
            storage,
            config,
            selector,
            render,
        })
    }

    /// Path as the user sees it, i.e. prefixed with the root directory.
    pub fn display_path(&self, relative: &Path) -> PathBuf {
        Path::new(self.config.root_dir()).join(relative)
    }

    async fn read_link_list(&self, path: &Path) -> Result<String> {
        let bytes = self.storage.read_file(path).await?;
        String::from_utf8(bytes).map_err(|e| {
            ToolError::processing(format!("link list is not valid UTF-8: {}", e.utf8_error()))
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for QrBatchPipeline<S, C> {
    type Extracted = BatchPlan;
    type Transformed = ArtifactPlan;
    type Output = BatchReport;

    fn name(&self) -> &str {
        "qr-batch"
    }

    async fn extract(&self) -> Result<BatchPlan> {
        let mut plan = BatchPlan::default();
        let root = Path::new("");

        if !self.storage.is_dir(root).await {
            if self.config.require_root() {
                return Err(ToolError::MissingInputError {
                    path: self.config.root_dir().to_string(),
                });
            }
            tracing::warn!(
                "Root directory '{}' not found, nothing to process",
                self.config.root_dir()
            );
            return Ok(plan);
        }

        plan.divisions = discover_divisions(&self.storage, root, self.config.marker_dir()).await?;
        tracing::debug!("Found {} division(s)", plan.divisions.len());

        for division in &plan.divisions {
            if !self.storage.is_dir(&division.marker_dir).await {
                tracing::debug!(
                    "Division '{}' has no '{}' directory, skipping",
                    division.name,
                    self.config.marker_dir()
                );
                continue;
            }

            let link_lists = discover_link_lists(&self.storage, division, &self.selector).await;
            let link_lists = match link_lists {
                Ok(lists) => lists,
                Err(e) => {
                    tracing::warn!("⚠️ Cannot list '{}': {}", division.marker_dir.display(), e);
                    plan.failures.push(BatchFailure::file(&division.marker_dir, &e));
                    continue;
                }
            };

            if link_lists.is_empty() {
                tracing::info!("Division '{}' has no link list, skipping", division.name);
                continue;
            }

            for list in link_lists {
                let content = match self.read_link_list(&list).await {
                    Ok(content) => content,
                    Err(e) => {
                        tracing::warn!("⚠️ Cannot read '{}': {}", list.display(), e);
                        plan.failures.push(BatchFailure::file(&list, &e));
                        continue;
                    }
                };

                let lines = parse_link_lines(&content);
                tracing::debug!("{}: {} link(s)", list.display(), lines.len());

                plan.entries
                    .extend(lines.into_iter().map(|(line_number, url)| LinkEntry {
                        division: division.name.clone(),
                        source: list.clone(),
                        line_number,
                        url,
                        output_dir: division.marker_dir.clone(),
                    }));
                plan.link_lists.push(list);
            }
        }

        Ok(plan)
    }

    /// Assign every entry its output path. Nothing is encoded yet, so a dry
    /// run can stop here and print exactly what a real run would write.
    async fn transform(&self, plan: BatchPlan) -> Result<ArtifactPlan> {
        let mut namer = ArtifactNamer::new();
        let mut artifacts = Vec::with_capacity(plan.entries.len());

        for entry in plan.entries {
            let (path, duplicate) = match namer.claim(&entry.output_dir, &entry.url) {
                NameClaim::Fresh(path) => (path, false),
                NameClaim::Duplicate(path) => {
                    tracing::info!(
                        "🔁 {}:{} repeats an earlier URL, sharing '{}'",
                        entry.source.display(),
                        entry.line_number,
                        path.display()
                    );
                    (path, true)
                }
            };
            artifacts.push(PlannedArtifact {
                entry,
                path,
                duplicate,
            });
        }

        Ok(ArtifactPlan {
            divisions: plan.divisions.len(),
            link_lists: plan.link_lists.len(),
            artifacts,
            failures: plan.failures,
        })
    }

    /// Encode and write one artifact at a time, so only a single image is
    /// held in memory.
    async fn load(&self, plan: ArtifactPlan) -> Result<BatchReport> {
        let mut report = BatchReport {
            divisions: plan.divisions,
            link_lists: plan.link_lists,
            artifacts: Vec::with_capacity(plan.artifacts.len()),
            duplicates: 0,
            failures: plan.failures,
        };

        for artifact in plan.artifacts {
            if artifact.duplicate {
                report.duplicates += 1;
                continue;
            }

            let png = match encode_png(&artifact.entry.url, &self.render) {
                Ok(png) => png,
                Err(e) => {
                    tracing::warn!(
                        "⚠️ {}:{} could not be encoded: {}",
                        artifact.entry.source.display(),
                        artifact.entry.line_number,
                        e
                    );
                    report.failures.push(BatchFailure::line(&artifact.entry, &e));
                    continue;
                }
            };

            match self.storage.write_file(&artifact.path, &png).await {
                Ok(()) => {
                    println!(
                        "Generated QR code for: {} -> {}",
                        artifact.entry.url,
                        self.display_path(&artifact.path).display()
                    );
                    report.artifacts.push(QrArtifact {
                        division: artifact.entry.division,
                        url: artifact.entry.url,
                        path: artifact.path,
                        bytes: png.len(),
                    });
                }
                Err(e) => {
                    tracing::warn!("⚠️ Failed to write '{}': {}", artifact.path.display(), e);
                    report.failures.push(BatchFailure::line(&artifact.entry, &e));
                }
            }
        }

        Ok(report)
    }
}
