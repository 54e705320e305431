use anyhow::{Context, Result, anyhow};
use std::{fmt::Display, str::FromStr};

/// Token settings read from the environment. The Basic-auth flow never
/// consults them; they are parsed so a misconfigured deployment still fails fast.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret_key: Option<String>,
    pub algorithm: String,
    pub access_token_expire_minutes: i64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub app_name: String,
    pub app_version: String,
    pub debug: bool,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub run_migrations: bool,
    pub db_min_conn: u32,
    pub db_max_conn: u32,
    pub bcrypt_cost: u32,
    pub token: TokenConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let database_url = match env.get("DATABASE_URL") {
            Some(url) => url,
            None => {
                let host = env.get("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port: u16 = env.parse_or("DB_PORT", 5432)?;
                let name = env.required("DB_NAME")?;
                let user = env.required("DB_USER")?;
                let password = env.required("DB_PASSWORD")?;
                format!("postgres://{user}:{password}@{host}:{port}/{name}")
            }
        };

        let db_min_conn: u32 = env.parse_or("DB_MIN_CONN", 1)?;
        let db_max_conn: u32 = env.parse_or("DB_MAX_CONN", 5)?;
        if db_min_conn > db_max_conn {
            return Err(anyhow!(
                "DB_MIN_CONN ({db_min_conn}) must not exceed DB_MAX_CONN ({db_max_conn})"
            ));
        }

        let bcrypt_cost: u32 = env.parse_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(anyhow!("BCRYPT_COST must be between 4 and 31, got {bcrypt_cost}"));
        }

        let token = TokenConfig {
            secret_key: env.get("SECRET_KEY"),
            algorithm: env.get("ALGORITHM").unwrap_or_else(|| "HS256".to_string()),
            access_token_expire_minutes: env.parse_or("ACCESS_TOKEN_EXPIRE_MINUTES", 30)?,
        };

        Ok(Self {
            app_name: env
                .get("APP_NAME")
                .unwrap_or_else(|| "Heladeria API".to_string()),
            app_version: env.get("APP_VERSION").unwrap_or_else(|| "1.0.0".to_string()),
            debug: env.flag("DEBUG", false)?,
            host: env.get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.parse_or("PORT", 8000)?,
            database_url,
            run_migrations: env.flag("RUN_MIGRATIONS", true)?,
            db_min_conn,
            db_max_conn,
            bcrypt_cost,
            token,
        })
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, key: &str) -> Result<String> {
        self.get(key)
            .with_context(|| format!("Missing environment variable: {key}"))
    }

    fn parse_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            Some(raw) => raw
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow!("{key} must be a valid {}: {e}", std::any::type_name::<T>())),
            None => Ok(default),
        }
    }

    fn flag(&self, key: &str, default: bool) -> Result<bool> {
        match self.get(key).map(|v| v.trim().to_ascii_lowercase()) {
            None => Ok(default),
            Some(v) => match v.as_str() {
                "true" | "1" | "yes" => Ok(true),
                "false" | "0" | "no" => Ok(false),
                other => Err(anyhow!("{key} must be 'true' or 'false', got '{other}'")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_with_only_database_url() {
        let config = config_from(&[("DATABASE_URL", "postgres://u:p@db/heladeria")]).unwrap();

        assert_eq!(config.app_name, "Heladeria API");
        assert_eq!(config.app_version, "1.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(!config.debug);
        assert!(config.run_migrations);
        assert_eq!(config.token.algorithm, "HS256");
        assert_eq!(config.token.access_token_expire_minutes, 30);
    }

    #[test]
    fn database_url_is_assembled_from_parts() {
        let config = config_from(&[
            ("DB_HOST", "pg"),
            ("DB_PORT", "5433"),
            ("DB_NAME", "heladeria"),
            ("DB_USER", "admin"),
            ("DB_PASSWORD", "secret"),
        ])
        .unwrap();

        assert_eq!(config.database_url, "postgres://admin:secret@pg:5433/heladeria");
    }

    #[test]
    fn missing_database_settings_fail() {
        let err = config_from(&[("DB_USER", "admin")]).unwrap_err();
        assert!(err.to_string().contains("DB_NAME"));
    }

    #[test]
    fn malformed_values_are_rejected() {
        assert!(config_from(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")]).is_err());
        assert!(config_from(&[("DATABASE_URL", "postgres://x"), ("DEBUG", "maybe")]).is_err());
        assert!(config_from(&[("DATABASE_URL", "postgres://x"), ("BCRYPT_COST", "2")]).is_err());
        assert!(
            config_from(&[
                ("DATABASE_URL", "postgres://x"),
                ("DB_MIN_CONN", "10"),
                ("DB_MAX_CONN", "2"),
            ])
            .is_err()
        );
    }

    #[test]
    fn debug_flag_accepts_common_spellings() {
        let config = config_from(&[("DATABASE_URL", "postgres://x"), ("DEBUG", "True")]).unwrap();
        assert!(config.debug);
    }
}
