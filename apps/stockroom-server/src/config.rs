//! Server configuration
//!
//! Three layers, later ones winning: built-in defaults, the YAML file
//! named on the command line, and `STOCKROOM_`-prefixed environment
//! variables with `__` for nesting (`STOCKROOM_DATABASE__URL`,
//! `STOCKROOM_AUTH__SECRET`, ...). A missing config file is fine; the
//! defaults plus environment must then carry everything.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SeaORM connection URL; `postgres://...` in production, the
    /// bundled SQLite file for local runs.
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret for access tokens. Empty means unset, and
    /// the server refuses to start.
    pub secret: String,
    pub token_ttl_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Exact origins allowed to call the API. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "sqlite://stockroom.db?mode=rwc".to_string(),
                max_connections: 10,
                connect_timeout_secs: 30,
            },
            auth: AuthConfig {
                secret: String::new(),
                token_ttl_days: 1,
            },
            cors: CorsConfig {
                allowed_origins: Vec::new(),
            },
        }
    }
}

/// Resolve the effective configuration from defaults, `path`, and the
/// process environment.
pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
    let config = Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Yaml::file(path))
        .merge(Env::prefixed("STOCKROOM_").split("__"))
        .extract()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file_or_env() {
        figment::Jail::expect_with(|_jail| {
            let config = load(Path::new("does-not-exist.yaml")).expect("defaults should load");
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.database.url, "sqlite://stockroom.db?mode=rwc");
            assert_eq!(config.database.max_connections, 10);
            assert_eq!(config.database.connect_timeout_secs, 30);
            assert!(config.auth.secret.is_empty());
            assert!(config.cors.allowed_origins.is_empty());
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_the_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "stockroom.yaml",
                r#"
server:
  port: 9000
auth:
  secret: file-secret
cors:
  allowed_origins:
    - https://app.example.com
"#,
            )?;
            jail.set_env("STOCKROOM_SERVER__PORT", "9100");
            jail.set_env("STOCKROOM_AUTH__TOKEN_TTL_DAYS", "7");

            let config = load(Path::new("stockroom.yaml")).expect("config should load");
            // File beats defaults, environment beats the file.
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.auth.secret, "file-secret");
            assert_eq!(config.auth.token_ttl_days, 7);
            assert_eq!(
                config.cors.allowed_origins,
                vec!["https://app.example.com".to_string()]
            );
            Ok(())
        });
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("stockroom.yaml", "server: [not, a, mapping]")?;
            assert!(load(Path::new("stockroom.yaml")).is_err());
            Ok(())
        });
    }
}
