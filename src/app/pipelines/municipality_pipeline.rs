use crate::core::{Pipeline, Storage};
use crate::domain::model::Municipality;
use crate::utils::error::{Result, ToolError};
use serde::Deserialize;
use std::path::PathBuf;

/// CSV row as read; coordinates are parsed during transform so errors can
/// name the offending row.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMunicipality {
    #[serde(rename = "Municipality")]
    pub municipality: String,
    #[serde(rename = "Latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude")]
    pub longitude: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionSummary {
    pub records: usize,
    pub output_path: PathBuf,
}

/// Municipality coordinate table, CSV in and JSON array out.
pub struct MunicipalityPipeline<S: Storage> {
    storage: S,
    input: PathBuf,
    output: PathBuf,
}

impl<S: Storage> MunicipalityPipeline<S> {
    pub fn new(storage: S, input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            input: input.into(),
            output: output.into(),
        }
    }
}

fn parse_coordinate(field: &str, value: &str, row: usize) -> Result<f64> {
    let parsed: f64 = value.trim().parse().map_err(|_| {
        ToolError::processing(format!("row {}: {} '{}' is not a number", row, field, value))
    })?;

    if !parsed.is_finite() {
        return Err(ToolError::processing(format!(
            "row {}: {} '{}' is not a finite number",
            row, field, value
        )));
    }

    Ok(parsed)
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for MunicipalityPipeline<S> {
    type Extracted = Vec<RawMunicipality>;
    type Transformed = Vec<Municipality>;
    type Output = ConversionSummary;

    fn name(&self) -> &str {
        "municipalities-json"
    }

    async fn extract(&self) -> Result<Vec<RawMunicipality>> {
        let data = self.storage.read_file(&self.input).await?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_reader(data.as_slice());

        let mut rows = Vec::new();
        for row in reader.deserialize::<RawMunicipality>() {
            rows.push(row?);
        }

        tracing::debug!("Read {} row(s) from {}", rows.len(), self.input.display());
        Ok(rows)
    }

    async fn transform(&self, rows: Vec<RawMunicipality>) -> Result<Vec<Municipality>> {
        let mut municipalities = Vec::with_capacity(rows.len());

        for (index, raw) in rows.into_iter().enumerate() {
            // 資料列從 1 起算，不含標題列
            let row = index + 1;
            municipalities.push(Municipality {
                latitude: parse_coordinate("Latitude", &raw.latitude, row)?,
                longitude: parse_coordinate("Longitude", &raw.longitude, row)?,
                municipality: raw.municipality,
                description: String::new(),
            });
        }

        Ok(municipalities)
    }

    async fn load(&self, municipalities: Vec<Municipality>) -> Result<ConversionSummary> {
        let json = serde_json::to_string_pretty(&municipalities)?;
        self.storage.write_file(&self.output, json.as_bytes()).await?;

        Ok(ConversionSummary {
            records: municipalities.len(),
            output_path: self.output.clone(),
        })
    }
}
