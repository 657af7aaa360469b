use crate::calendar::WeekStart;
use crate::error::{config_error, env_error, SiteResult};
use crate::utils::time::today_in;
use chrono::NaiveDate;
use chrono_tz::Tz;
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Default Cosmic REST endpoint
pub const DEFAULT_COSMIC_API_URL: &str = "https://api.cosmicjs.com/v3";

/// Default number of events fetched for the list and calendar views
pub const DEFAULT_EVENTS_LIMIT: u32 = 100;

/// Optional site overrides file
pub const SITE_CONFIG_PATH: &str = "config/site.toml";

/// Main configuration structure for the site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cosmic bucket slug
    pub cosmic_bucket_slug: String,
    /// Cosmic read key
    pub cosmic_read_key: String,
    /// Cosmic write key, needed only for submissions
    pub cosmic_write_key: Option<String>,
    /// Base URL of the Cosmic REST API
    pub cosmic_api_url: String,
    /// Address to bind the web server to
    pub bind_addr: String,
    /// Port for the web server
    pub port: u16,
    /// Timezone used to decide what "today" is
    pub timezone: String,
    /// First column of the calendar
    pub week_start: WeekStart,
    /// Locale for user-facing messages
    pub site_locale: String,
    /// How many events to fetch per page view
    pub events_limit: u32,
    /// Site title and tagline
    pub site: SiteSettings,
}

/// Presentation settings, overridable from `config/site.toml`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SiteSettings {
    pub title: String,
    pub tagline: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: "Community Events".to_string(),
            tagline: "Discover what's happening near you".to_string(),
        }
    }
}

/// Shape of `config/site.toml`; every key is optional
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SiteFile {
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub week_start: Option<WeekStart>,
    pub events_limit: Option<u32>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn load() -> SiteResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        // Required environment variables
        let cosmic_bucket_slug =
            env::var("COSMIC_BUCKET_SLUG").map_err(|_| env_error("COSMIC_BUCKET_SLUG"))?;
        let cosmic_read_key =
            env::var("COSMIC_READ_KEY").map_err(|_| env_error("COSMIC_READ_KEY"))?;

        let cosmic_write_key = env::var("COSMIC_WRITE_KEY").ok().filter(|k| !k.is_empty());
        let cosmic_api_url =
            env::var("COSMIC_API_URL").unwrap_or_else(|_| DEFAULT_COSMIC_API_URL.to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match env::var("PORT") {
            Ok(port) => port
                .parse::<u16>()
                .map_err(|_| config_error(&format!("Invalid PORT value: {}", port)))?,
            Err(_) => 3000,
        };

        let timezone = env::var("TIMEZONE").unwrap_or_else(|_| String::from("UTC"));
        let site_locale = env::var("SITE_LOCALE").unwrap_or_else(|_| String::from("en"));

        let week_start = match env::var("WEEK_START") {
            Ok(value) => value
                .parse::<WeekStart>()
                .map_err(|e| config_error(&e.to_string()))?,
            Err(_) => WeekStart::default(),
        };

        let events_limit = match env::var("EVENTS_LIMIT") {
            Ok(limit) => limit
                .parse::<u32>()
                .map_err(|_| config_error(&format!("Invalid EVENTS_LIMIT value: {}", limit)))?,
            Err(_) => DEFAULT_EVENTS_LIMIT,
        };

        let mut config = Config {
            cosmic_bucket_slug,
            cosmic_read_key,
            cosmic_write_key,
            cosmic_api_url,
            bind_addr,
            port,
            timezone,
            week_start,
            site_locale,
            events_limit,
            site: SiteSettings::default(),
        };

        // Merge site overrides from file if it exists
        if Path::new(SITE_CONFIG_PATH).exists() {
            let content = fs::read_to_string(SITE_CONFIG_PATH)?;
            config.apply_site_file(toml::from_str(&content)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Overlay values from `config/site.toml`
    pub fn apply_site_file(&mut self, file: SiteFile) {
        if let Some(title) = file.title {
            self.site.title = title;
        }
        if let Some(tagline) = file.tagline {
            self.site.tagline = tagline;
        }
        if let Some(week_start) = file.week_start {
            self.week_start = week_start;
        }
        if let Some(limit) = file.events_limit {
            self.events_limit = limit;
        }
    }

    /// Check values that can only be verified after loading
    pub fn validate(&self) -> SiteResult<()> {
        self.tz()?;
        if self.events_limit == 0 {
            return Err(config_error("EVENTS_LIMIT must be greater than zero"));
        }
        url::Url::parse(&self.cosmic_api_url)
            .map_err(|e| config_error(&format!("Invalid COSMIC_API_URL: {}", e)))?;
        Ok(())
    }

    /// Parsed site timezone
    pub fn tz(&self) -> SiteResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| config_error(&format!("Invalid timezone: {}", self.timezone)))
    }

    /// Current date in the site timezone, falling back to UTC
    pub fn today(&self) -> NaiveDate {
        today_in(&self.tz().unwrap_or(Tz::UTC))
    }

    /// Socket address string for the web server
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Configuration for tests and offline runs
    pub fn for_tests() -> Self {
        Config {
            cosmic_bucket_slug: "test-bucket".to_string(),
            cosmic_read_key: "test-read-key".to_string(),
            cosmic_write_key: Some("test-write-key".to_string()),
            cosmic_api_url: DEFAULT_COSMIC_API_URL.to_string(),
            bind_addr: "127.0.0.1".to_string(),
            port: 3000,
            timezone: "UTC".to_string(),
            week_start: WeekStart::Sunday,
            site_locale: "en".to_string(),
            events_limit: DEFAULT_EVENTS_LIMIT,
            site: SiteSettings::default(),
        }
    }
}
