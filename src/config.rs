use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct InputConfig {
    #[serde(default = "default_data_csv")]
    pub data_csv: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Logs every HTTP request and makes open pages reload after a restart.
    #[serde(default = "default_debug")]
    pub debug: bool,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,
}

fn default_data_csv() -> PathBuf { PathBuf::from("dados.csv") }
fn default_host() -> IpAddr { IpAddr::V4(Ipv4Addr::UNSPECIFIED) }
fn default_port() -> u16 { 8080 }
fn default_debug() -> bool { true }
fn default_assets_dir() -> PathBuf { PathBuf::from("assets") }
fn default_out_dir() -> PathBuf { PathBuf::from("export") }

impl Default for InputConfig {
    fn default() -> Self {
        Self { data_csv: default_data_csv() }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: default_debug(),
            assets_dir: default_assets_dir(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { out_dir: default_out_dir() }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Reads `path` when given, otherwise falls back to the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Ok(Self::default()),
        }
    }
}
