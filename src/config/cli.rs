use crate::config::toml_config::ScoutConfig;
use crate::utils::error::Result;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "transfer-scout")]
#[command(about = "Serves the tracked nationality's transfer-list entries as JSON")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Override the listen address, e.g. 127.0.0.1:3000
    #[arg(long)]
    pub bind: Option<String>,

    /// Override the upstream transfer-list URL
    #[arg(long)]
    pub source_url: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 載入設定檔 (若有) 再套用命令列覆蓋
    pub fn load(&self) -> Result<ScoutConfig> {
        let mut config = match &self.config {
            Some(path) => ScoutConfig::from_file(path)?,
            None => ScoutConfig::default(),
        };
        self.apply_overrides(&mut config);
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut ScoutConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(url) = &self.source_url {
            config.source.url = url.clone();
        }
        if self.verbose {
            config.logging.verbose = true;
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}
