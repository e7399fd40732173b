use std::path::PathBuf;

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub products_file: PathBuf,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3004".to_string())
                .parse()
                .context("PORT must be a valid number")?,
            products_file: std::env::var("PRODUCTS_FILE")
                .unwrap_or_else(|_| "products.json".to_string())
                .into(),
        })
    }
}
