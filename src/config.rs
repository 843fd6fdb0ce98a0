use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

// Bounds accepted by the bcrypt crate.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;

/// Longest lifetime a bearer token may be issued with (one year).
pub const MAX_TOKEN_TTL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Parser, Debug, Default)]
#[command(name = "jwtblog", about = "A small blog backend")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long, env = "APP_PORT")]
    pub port: Option<u16>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Secret used to sign bearer tokens
    #[arg(long, env = "JWT_SECRET_KEY", hide_env_values = true)]
    pub jwt_secret: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

/// Where the auth gate looks for a bearer token, in order.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenLocation {
    Headers,
    Cookies,
    /// `access_token` field of a JSON request body.
    Json,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_secs: u64,
    pub leeway_secs: u64,
    pub bcrypt_cost: u32,
    pub token_locations: Vec<TokenLocation>,
    pub cookie_name: String,
    /// Drop revocation entries for tokens that have already expired.
    /// Off by default: the revocation list is append-only.
    pub compact_revoked_on_startup: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: 3600,
            leeway_secs: 0,
            bcrypt_cost: bcrypt::DEFAULT_COST,
            token_locations: vec![
                TokenLocation::Headers,
                TokenLocation::Cookies,
                TokenLocation::Json,
            ],
            cookie_name: "access_token_cookie".to_string(),
            compact_revoked_on_startup: false,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(ref secret) = cli.jwt_secret {
            config.auth.jwt_secret = Some(secret.clone());
        }

        // Resolve paths relative to data dir
        if config.database.path.is_none() {
            config.database.path = Some(data_dir.join("jwtblog.db"));
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let secret = self.auth.jwt_secret.as_deref().unwrap_or("");
        anyhow::ensure!(
            !secret.trim().is_empty(),
            "a JWT secret is required (set auth.jwt_secret, --jwt-secret or JWT_SECRET_KEY)"
        );
        anyhow::ensure!(
            (MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost),
            "auth.bcrypt_cost must be between {} and {}",
            MIN_BCRYPT_COST,
            MAX_BCRYPT_COST
        );
        anyhow::ensure!(
            (1..=MAX_TOKEN_TTL_SECS).contains(&self.auth.token_ttl_secs),
            "auth.token_ttl_secs must be between 1 and {}",
            MAX_TOKEN_TTL_SECS
        );
        Ok(())
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".jwtblog")
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("jwtblog.db"))
    }

    pub fn jwt_secret(&self) -> &str {
        self.auth.jwt_secret.as_deref().unwrap_or("")
    }
}
