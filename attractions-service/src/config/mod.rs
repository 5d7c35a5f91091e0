use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::str::FromStr;

pub const DEFAULT_SEARCH_LIMIT: i64 = 50;
pub const DEFAULT_MAX_SEARCH_LIMIT: i64 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct AttractionsConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub mongodb: MongoConfig,
    pub search: SearchConfig,
    pub cors: CorsConfig,
}

/// Storage target. Both values are optional outside production; the service
/// then runs without a storage handle and only the probes answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MongoConfig {
    pub uri: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_SEARCH_LIMIT,
            max_limit: DEFAULT_MAX_SEARCH_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl AttractionsConfig {
    pub fn load() -> Result<Self, AppError> {
        // Load common config (handles .env, APP__ prefix and PORT)
        let common_config = core_config::Config::load()?;
        Self::from_lookup(common_config, |key| env::var(key).ok())
    }

    /// Builds the service config from any key lookup, so the parsing rules can
    /// be exercised without touching the process environment.
    pub fn from_lookup<F>(common: core_config::Config, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let is_prod = lookup("ENVIRONMENT").unwrap_or_else(|| "dev".to_string()) == "prod";

        let mongodb = MongoConfig {
            uri: get_env(&lookup, "DATABASE_URL", is_prod)?,
            database: get_env(&lookup, "DATABASE_NAME", is_prod)?,
        };

        let search = SearchConfig {
            default_limit: parse_env(&lookup, "SEARCH_DEFAULT_LIMIT", DEFAULT_SEARCH_LIMIT)?,
            max_limit: parse_env(&lookup, "SEARCH_MAX_LIMIT", DEFAULT_MAX_SEARCH_LIMIT)?,
        };
        if search.default_limit < 1 || search.max_limit < search.default_limit {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "search limits must satisfy 1 <= SEARCH_DEFAULT_LIMIT ({}) <= SEARCH_MAX_LIMIT ({})",
                search.default_limit,
                search.max_limit
            )));
        }

        let cors = CorsConfig {
            allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
        };

        Ok(AttractionsConfig {
            common,
            mongodb,
            search,
            cors,
        })
    }
}

fn get_env<F>(lookup: &F, key: &str, is_prod: bool) -> Result<Option<String>, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key).filter(|val| !val.is_empty()) {
        Some(val) => Ok(Some(val)),
        None if is_prod => Err(AppError::ConfigError(anyhow::anyhow!(
            "{} is required in production but not set",
            key
        ))),
        None => Ok(None),
    }
}

fn parse_env<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("Invalid value for {}: {}", key, e))
        }),
        None => Ok(default),
    }
}

/// `*` (alone or in the list) means any origin.
fn parse_origins(raw: &str) -> Vec<String> {
    let origins: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect();

    if origins.iter().any(|origin| origin == "*") {
        Vec::new()
    } else {
        origins
    }
}
