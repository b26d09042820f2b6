use anyhow::Context;
use chrono_tz::Tz;

/// Which leave applications a department head may see and review.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewerScope {
    /// HODs only see and review applications from their own department.
    Department,
    /// Every reviewer sees every application.
    All,
}

impl std::str::FromStr for ReviewerScope {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "department" => Ok(Self::Department),
            "all" => Ok(Self::All),
            other => anyhow::bail!("REVIEWER_SCOPE must be 'department' or 'all', got '{}'", other),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub listen_addr: String,
    pub cors_origins: Vec<String>,
    pub monthly_leave_allowance: u32,
    pub reviewer_scope: ReviewerScope,
    pub timezone: Tz,
    pub seed_default_users: bool,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET must be set")?;
        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters for security");
        }
        if jwt_secret.contains("change_me") {
            anyhow::bail!("JWT_SECRET contains placeholder value, set a real secret before running");
        }

        let monthly_leave_allowance: u32 = lookup("MONTHLY_LEAVE_ALLOWANCE")
            .unwrap_or_else(|| "5".into())
            .parse()
            .context("MONTHLY_LEAVE_ALLOWANCE must be a number")?;
        if monthly_leave_allowance == 0 {
            anyhow::bail!("MONTHLY_LEAVE_ALLOWANCE must be greater than zero");
        }

        let timezone_name = lookup("APP_TIMEZONE").unwrap_or_else(|| "UTC".into());
        let timezone: Tz = timezone_name
            .parse()
            .map_err(|e| anyhow::anyhow!("APP_TIMEZONE '{}' is not a known zone: {}", timezone_name, e))?;

        Ok(Self {
            jwt_secret,
            jwt_expiry_hours: lookup("JWT_EXPIRY_HOURS")
                .unwrap_or_else(|| "12".into())
                .parse()
                .context("JWT_EXPIRY_HOURS must be a number")?,
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".into()),
            cors_origins: lookup("CORS_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            monthly_leave_allowance,
            reviewer_scope: lookup("REVIEWER_SCOPE")
                .unwrap_or_else(|| "department".into())
                .parse()?,
            timezone,
            seed_default_users: lookup("SEED_DEFAULT_USERS")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(true),
            log_format: match lookup("LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                _ => LogFormat::Text,
            },
        })
    }
}
