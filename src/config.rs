use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Image fetched by `picfetch fetch` when no URL is given
pub const DEFAULT_SOURCE_URL: &str =
    "https://s3e8p5g8.rocketcdn.me/wp-content/uploads/2020/11/midwestern-state-university2.jpg";

/// Local config file looked up in the working directory
const LOCAL_CONFIG_FILE: &str = "picfetch.toml";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
    pub cli: CliConfig,
}

/// Outbound HTTP client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Whole-request deadline in seconds
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
}

impl HttpConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: concat!("picfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Which form `GET /` renders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FormVariant {
    /// Single `image_url` field posting to `/upload`
    #[default]
    Upload,
    /// `imageURL` + `imageName` fields posting to `/download`
    Download,
}

/// Web server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub form: FormVariant,
}

impl ServerConfig {
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            form: FormVariant::default(),
        }
    }
}

/// Where fetched files land
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Destination for `POST /upload`
    pub upload_dir: PathBuf,
    /// Destination for `POST /download`
    pub download_dir: PathBuf,
    /// Served under `/static`
    pub static_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("."),
            download_dir: PathBuf::from("static/downloads"),
            static_dir: PathBuf::from("static"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub json: bool,
    /// Also write a daily rolling log file here
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            directory: None,
        }
    }
}

/// Defaults for `picfetch fetch`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub source_url: String,
    pub output_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            output_path: PathBuf::from("downloaded_image.jpg"),
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    ///
    /// An explicit `path` must exist. Without one, `picfetch.toml` in the working
    /// directory is tried, then `<config dir>/picfetch/config.toml`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).format(FileFormat::Toml));
            }
            None => {
                if let Some(path) = default_config_path() {
                    builder = builder.add_source(
                        File::from(path)
                            .format(FileFormat::Toml)
                            .required(false),
                    );
                }
            }
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix("PICFETCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string, without the environment layer
    pub fn from_toml(source: &str) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.http.timeout_secs == 0 {
            return Err(Error::Config("http.timeout_secs must be positive".into()));
        }
        if self.http.connect_timeout_secs == 0 {
            return Err(Error::Config(
                "http.connect_timeout_secs must be positive".into(),
            ));
        }
        if self.storage.download_dir.as_os_str().is_empty() {
            return Err(Error::Config("storage.download_dir is empty".into()));
        }
        Ok(())
    }
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(LOCAL_CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    dirs::config_dir().map(|dir| dir.join("picfetch").join("config.toml"))
}
