//! Configuration management for the Alexandria engine

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::models::patron::PatronKind;

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Lending policy parameters for one patron category.
#[derive(Debug, Deserialize, Clone, Copy)]
pub struct CategoryPolicy {
    /// Maximum simultaneous active loans.
    pub max_loans: usize,
    /// Loan duration in days when no due-date override is given.
    pub loan_days: i64,
}

/// Per-category lending policy table.
#[derive(Debug, Deserialize, Clone)]
pub struct PolicyConfig {
    pub student: CategoryPolicy,
    pub teacher: CategoryPolicy,
}

impl PolicyConfig {
    pub fn for_kind(&self, kind: PatronKind) -> CategoryPolicy {
        match kind {
            PatronKind::Student => self.student,
            PatronKind::Teacher => self.teacher,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix ALEXANDRIA_)
            .add_source(
                Environment::with_prefix("ALEXANDRIA")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut loaded: AppConfig = config.try_deserialize()?;

        // A category limit of zero would make every issuance fail; treat
        // it as a configuration mistake rather than a valid policy.
        if loaded.policy.student.max_loans == 0 {
            loaded.policy.student = PolicyConfig::default().student;
        }
        if loaded.policy.teacher.max_loans == 0 {
            loaded.policy.teacher = PolicyConfig::default().teacher;
        }

        Ok(loaded)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            policy: PolicyConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            student: CategoryPolicy {
                max_loans: 5,
                loan_days: 7,
            },
            teacher: CategoryPolicy {
                max_loans: 8,
                loan_days: 30,
            },
        }
    }
}
