//! Server configuration
//!
//! Command-line flags (with env fallbacks) beat the TOML file, which beats
//! compiled defaults.

use clap::Parser;
use spinkit_common::config::{
    TomlConfig, DEFAULT_BIND_ADDRESS, DEFAULT_NOTION_BASE_URL, DEFAULT_NOTION_VERSION,
    DEFAULT_PORT,
};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::notion::NotionConfig;
use spinkit_common::{Error, Result};

/// Command-line arguments for spinkit-api
#[derive(Parser, Debug, Default)]
#[command(name = "spinkit-api")]
#[command(about = "Listing API for SpinKit discovery pages")]
#[command(version)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, env = "SPINKIT_PORT")]
    pub port: Option<u16>,

    /// Address to bind
    #[arg(long, env = "SPINKIT_BIND_ADDRESS")]
    pub bind_address: Option<String>,

    /// Directory with djs.json, venues.json, events.json, recordings.json
    /// (embedded mock data when absent)
    #[arg(short, long, env = "SPINKIT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Notion integration token for the admin export routes
    #[arg(long, env = "NOTION_API_KEY", hide_env_values = true)]
    pub notion_api_key: Option<String>,

    /// Notion API base URL
    #[arg(long, env = "NOTION_BASE_URL")]
    pub notion_base_url: Option<String>,
}

/// Fully resolved server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    pub data_dir: Option<PathBuf>,
    pub notion: Option<NotionConfig>,
}

impl ApiConfig {
    pub fn resolve(args: Args, toml: TomlConfig) -> Result<Self> {
        let port = args.port.or(toml.port).unwrap_or(DEFAULT_PORT);
        let bind = args
            .bind_address
            .or(toml.bind_address)
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let ip: IpAddr = bind
            .parse()
            .map_err(|_| Error::Config(format!("Invalid bind address: {}", bind)))?;

        let notion = args
            .notion_api_key
            .or(toml.notion.api_key)
            .filter(|key| !key.trim().is_empty())
            .map(|api_key| NotionConfig {
                api_key,
                base_url: args
                    .notion_base_url
                    .or(toml.notion.base_url)
                    .unwrap_or_else(|| DEFAULT_NOTION_BASE_URL.to_string()),
                version: toml
                    .notion
                    .version
                    .unwrap_or_else(|| DEFAULT_NOTION_VERSION.to_string()),
            });

        Ok(Self {
            listen_addr: SocketAddr::new(ip, port),
            data_dir: args.data_dir.or(toml.data_dir),
            notion,
        })
    }
}
