use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::AppError;

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory holding the brand logo and per-ticker overlay logos
    pub assets_dir: PathBuf,

    /// CSV file read by the multi-company dashboard
    pub company_data_path: PathBuf,

    /// Socket address the HTTP API binds to (default: 0.0.0.0:3000)
    pub bind_addr: SocketAddr,

    /// Social handle printed in the stat card footer
    pub card_handle: String,

    /// Website printed under the handle
    pub card_site: String,

    /// Brand logo file name inside `assets_dir`, drawn top-right on every card
    pub brand_logo: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            assets_dir: PathBuf::from("assets"),
            company_data_path: PathBuf::from("company_data.csv"),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            card_handle: "@UTXOmgmt".to_string(),
            card_site: "utxo.management".to_string(),
            brand_logo: Some("utxologo.webp".to_string()),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            assets_dir: std::env::var("TREASURY_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            company_data_path: std::env::var("TREASURY_COMPANY_DATA")
                .map(PathBuf::from)
                .unwrap_or(defaults.company_data_path),
            bind_addr: match std::env::var("TREASURY_BIND_ADDR") {
                Ok(raw) => parse_bind_addr(&raw)?,
                Err(_) => defaults.bind_addr,
            },
            card_handle: std::env::var("TREASURY_CARD_HANDLE").unwrap_or(defaults.card_handle),
            card_site: std::env::var("TREASURY_CARD_SITE").unwrap_or(defaults.card_site),
            // An empty value disables the brand overlay
            brand_logo: match std::env::var("TREASURY_BRAND_LOGO") {
                Ok(name) if name.trim().is_empty() => None,
                Ok(name) => Some(name),
                Err(_) => defaults.brand_logo,
            },
        })
    }
}

fn parse_bind_addr(raw: &str) -> Result<SocketAddr, AppError> {
    raw.trim().parse().map_err(|e| {
        AppError::Config(format!(
            "TREASURY_BIND_ADDR must be a valid socket address, got {raw:?}: {e}"
        ))
    })
}
