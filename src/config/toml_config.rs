use crate::core::qr::EC_LEVELS;
use crate::core::ConfigProvider;
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{
    validate_one_of, validate_path, validate_path_component, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Batch QR generator settings, loadable from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub batch: BatchSection,
    pub render: RenderSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSection {
    pub root_dir: String,
    pub marker_dir: String,
    /// Fixed file name, or `*.ext` for every file with that extension.
    pub link_list: String,
    pub require_root: bool,
}

impl Default for BatchSection {
    fn default() -> Self {
        Self {
            root_dir: "PR-DIV".to_string(),
            marker_dir: "TAK".to_string(),
            link_list: "beacons.txt".to_string(),
            require_root: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSection {
    pub module_size: u32,
    pub quiet_zone: u32,
    pub ec_level: String,
}

impl Default for RenderSection {
    fn default() -> Self {
        Self {
            module_size: 10,
            quiet_zone: 4,
            ec_level: "M".to_string(),
        }
    }
}

impl BatchConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ToolError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ToolError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DIVISION_ROOT})，未定義者保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ToolError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_path("batch.root_dir", &self.batch.root_dir)?;
        validate_path_component("batch.marker_dir", &self.batch.marker_dir)?;
        validate_path_component("batch.link_list", &self.batch.link_list)?;

        if self.batch.link_list == "*." {
            return Err(ToolError::InvalidConfigValueError {
                field: "batch.link_list".to_string(),
                value: self.batch.link_list.clone(),
                reason: "Extension pattern needs an extension, e.g. *.txt".to_string(),
            });
        }

        validate_range("render.module_size", self.render.module_size, 1, 100)?;
        validate_range("render.quiet_zone", self.render.quiet_zone, 0, 100)?;

        let ec_level = self.render.ec_level.to_ascii_uppercase();
        validate_one_of("render.ec_level", &ec_level, &EC_LEVELS)?;

        Ok(())
    }
}

impl ConfigProvider for BatchConfig {
    fn root_dir(&self) -> &str {
        &self.batch.root_dir
    }

    fn marker_dir(&self) -> &str {
        &self.batch.marker_dir
    }

    fn link_list(&self) -> &str {
        &self.batch.link_list
    }

    fn require_root(&self) -> bool {
        self.batch.require_root
    }

    fn module_size(&self) -> u32 {
        self.render.module_size
    }

    fn quiet_zone(&self) -> u32 {
        self.render.quiet_zone
    }

    fn ec_level(&self) -> &str {
        &self.render.ec_level
    }
}

impl Validate for BatchConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
