use std::env;
use std::path::PathBuf;

/// Top-level configuration, read once at process start.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub delivery: DeliveryConfig,
    pub site: SiteConfig,
}

/// Settings for the content-delivery GraphQL endpoint.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// GraphQL endpoint URL
    pub api_url: String,
    /// Static token sent with every query
    pub auth_token: String,
    /// Base URL prefix for derived public asset links
    pub public_link_base: String,
}

/// Settings controlling the site build output.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub output_dir: PathBuf,
    /// Properties sold more than this many months ago are not listed
    pub sold_cutoff_months: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("SOLD_CUTOFF_MONTHS must be a nonnegative integer")]
    InvalidCutoffMonths,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let delivery = DeliveryConfig {
            api_url: require("DELIVERY_API_URL")?,
            auth_token: require("DELIVERY_API_AUTH_TOKEN")?,
            public_link_base: require("PUBLIC_LINK_URL")?,
        };

        let output_dir = env::var("SITE_OUTPUT_DIR")
            .unwrap_or_else(|_| "site".to_string())
            .into();
        let sold_cutoff_months = match env::var("SOLD_CUTOFF_MONTHS") {
            Ok(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidCutoffMonths)?,
            Err(_) => 1,
        };

        Ok(Self {
            delivery,
            site: SiteConfig {
                output_dir,
                sold_cutoff_months,
            },
        })
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}
