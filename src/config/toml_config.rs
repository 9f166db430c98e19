use crate::utils::error::{Result, ScoutError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern compiles"));

pub const ID_PLACEHOLDER: &str = "{id}";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoutConfig {
    pub server: ServerConfig,
    pub source: SourceConfig,
    pub parse: ParseConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub user_agent: String,
    /// No timeout unless set; reqwest's default applies.
    pub timeout_seconds: Option<u64>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: "https://www.example.org/transfer-list".to_string(),
            user_agent: format!(
                "transfer-scout/{} (roster dashboard transfer-list fetcher)",
                env!("CARGO_PKG_VERSION")
            ),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Spellings of the tracked nationality as the upstream page renders them.
    pub nationality_tokens: Vec<String>,
    pub u21_heading: String,
    pub nt_heading: String,
    /// Must contain `{id}`.
    pub profile_url_template: String,
    pub min_id_digits: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            nationality_tokens: vec![
                "Cyprus".to_string(),
                "Kypros".to_string(),
                "Κύπρος".to_string(),
            ],
            u21_heading: "U-21".to_string(),
            nt_heading: "National Team".to_string(),
            profile_url_template:
                "https://www.hattrick.org/Club/Players/Player.aspx?playerId={id}".to_string(),
            min_id_digits: 6,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub verbose: bool,
    pub json: bool,
}

impl ScoutConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScoutError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScoutError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SCOUT_SOURCE_URL})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind", &self.server.bind)?;
        validation::validate_url("source.url", &self.source.url)?;
        validation::validate_non_empty_string("source.user_agent", &self.source.user_agent)?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout as usize, 1)?;
        }

        validation::validate_non_empty_list(
            "parse.nationality_tokens",
            &self.parse.nationality_tokens,
        )?;
        validation::validate_non_empty_string("parse.u21_heading", &self.parse.u21_heading)?;
        validation::validate_non_empty_string("parse.nt_heading", &self.parse.nt_heading)?;
        if self
            .parse
            .u21_heading
            .eq_ignore_ascii_case(&self.parse.nt_heading)
        {
            return Err(ScoutError::InvalidConfigValueError {
                field: "parse.nt_heading".to_string(),
                value: self.parse.nt_heading.clone(),
                reason: "Section headings must differ".to_string(),
            });
        }
        if !self.parse.profile_url_template.contains(ID_PLACEHOLDER) {
            return Err(ScoutError::InvalidConfigValueError {
                field: "parse.profile_url_template".to_string(),
                value: self.parse.profile_url_template.clone(),
                reason: format!("Template must contain {}", ID_PLACEHOLDER),
            });
        }
        validation::validate_positive_number("parse.min_id_digits", self.parse.min_id_digits, 1)?;

        Ok(())
    }
}

impl Validate for ScoutConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
