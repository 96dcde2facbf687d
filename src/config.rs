use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub tenancy: TenancyConfig,
    #[serde(default)]
    pub billing: BillingConfig,
    #[serde(default)]
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expires_in: i64,  // seconds
    pub refresh_token_expires_in: i64, // seconds
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    /// Storefronts are served from `<subdomain>.<root_domain>`
    pub root_domain: String,
    #[serde(default = "default_trial_days")]
    pub trial_days: i64,
}

/// Monthly plan prices in DZD
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    pub basic_monthly_price: i64,
    pub pro_monthly_price: i64,
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            basic_monthly_price: 2900,
            pro_monthly_price: 5900,
        }
    }
}

/// Super-admin account created at startup when both fields are set
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

fn default_trial_days() -> i64 {
    14
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> Result<Self, Box<dyn std::error::Error>> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        let mut config: Config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => {
                toml::from_str(&config_str).map_err(|e| format!("failed to parse {config_path}: {e}"))?
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Self::from_env()?,
            Err(e) => {
                return Err(format!("cannot read config file {config_path}: {e}").into());
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Builds a configuration purely from environment variables and defaults.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // No config file: the database URL must come from the environment
        let database_url = get_env("DATABASE_URL")
            .ok_or("DATABASE_URL is not set and no config.toml was found")?;

        let defaults = BillingConfig::default();
        Ok(Config {
            server: ServerConfig {
                host: get_env("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: get_env_parse("SERVER_PORT", 8080u16),
            },
            database: DatabaseConfig {
                url: database_url,
                max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
            },
            jwt: JwtConfig {
                secret: get_env("JWT_SECRET").unwrap_or_else(|| "change-me-in-production".to_string()),
                access_token_expires_in: get_env_parse("JWT_ACCESS_EXPIRES_IN", 7200i64),
                refresh_token_expires_in: get_env_parse("JWT_REFRESH_EXPIRES_IN", 2_592_000i64),
            },
            tenancy: TenancyConfig {
                root_domain: get_env("ROOT_DOMAIN").unwrap_or_else(|| "localhost".to_string()),
                trial_days: get_env_parse("TRIAL_DAYS", default_trial_days()),
            },
            billing: BillingConfig {
                basic_monthly_price: get_env_parse("BASIC_MONTHLY_PRICE", defaults.basic_monthly_price),
                pro_monthly_price: get_env_parse("PRO_MONTHLY_PRICE", defaults.pro_monthly_price),
            },
            admin: AdminConfig {
                email: get_env("ADMIN_EMAIL"),
                password: get_env("ADMIN_PASSWORD"),
            },
        })
    }

    /// Environment variables win over file values.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("SERVER_PORT")
            && let Ok(p) = v.parse()
        {
            self.server.port = p;
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.jwt.secret = v;
        }
        if let Ok(v) = env::var("JWT_ACCESS_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.access_token_expires_in = n;
        }
        if let Ok(v) = env::var("JWT_REFRESH_EXPIRES_IN")
            && let Ok(n) = v.parse()
        {
            self.jwt.refresh_token_expires_in = n;
        }
        if let Ok(v) = env::var("ROOT_DOMAIN") {
            self.tenancy.root_domain = v;
        }
        if let Ok(v) = env::var("TRIAL_DAYS")
            && let Ok(n) = v.parse()
        {
            self.tenancy.trial_days = n;
        }
        if let Ok(v) = env::var("BASIC_MONTHLY_PRICE")
            && let Ok(n) = v.parse()
        {
            self.billing.basic_monthly_price = n;
        }
        if let Ok(v) = env::var("PRO_MONTHLY_PRICE")
            && let Ok(n) = v.parse()
        {
            self.billing.pro_monthly_price = n;
        }
        if let Ok(v) = env::var("ADMIN_EMAIL") {
            self.admin.email = Some(v);
        }
        if let Ok(v) = env::var("ADMIN_PASSWORD") {
            self.admin.password = Some(v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_toml() {
        let raw = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [database]
            url = "postgres://localhost/storefront"
            max_connections = 5

            [jwt]
            secret = "s3cret"
            access_token_expires_in = 60
            refresh_token_expires_in = 3600

            [tenancy]
            root_domain = "souk.dz"
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.tenancy.root_domain, "souk.dz");
        assert_eq!(config.tenancy.trial_days, 14);
        assert_eq!(config.billing.basic_monthly_price, 2900);
        assert!(config.admin.email.is_none());
    }

    #[test]
    fn test_billing_section_overrides_defaults() {
        let raw = r#"
            [server]
            host = "0.0.0.0"
            port = 8080

            [database]
            url = "postgres://localhost/storefront"
            max_connections = 5

            [jwt]
            secret = "s3cret"
            access_token_expires_in = 60
            refresh_token_expires_in = 3600

            [tenancy]
            root_domain = "souk.dz"
            trial_days = 7

            [billing]
            basic_monthly_price = 1500
            pro_monthly_price = 4500
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.tenancy.trial_days, 7);
        assert_eq!(config.billing.pro_monthly_price, 4500);
    }
}
