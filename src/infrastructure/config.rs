use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "config/report";
const ENV_PREFIX: &str = "ALERT_REPORT";

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    pub database: DatabaseSettings,
    pub output: OutputSettings,
    pub window: WindowSettings,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: Option<String>,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputSettings {
    pub path: PathBuf,
}

/// Query windows, bound as parameters into the aggregate queries
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct WindowSettings {
    pub trailing_days: i64,
    pub recent_hours: i64,
    pub top_priorities: i64,
}

impl Default for WindowSettings {
    fn default() -> Self {
        Self {
            trailing_days: 7,
            recent_hours: 24,
            top_priorities: 10,
        }
    }
}

impl WindowSettings {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.trailing_days <= 0 {
            anyhow::bail!("window.trailing_days must be positive, got {}", self.trailing_days);
        }
        if self.recent_hours <= 0 {
            anyhow::bail!("window.recent_hours must be positive, got {}", self.recent_hours);
        }
        if self.top_priorities <= 0 {
            anyhow::bail!("window.top_priorities must be positive, got {}", self.top_priorities);
        }
        Ok(())
    }
}

// Keeps the password out of logs and error output
impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}/{}", self.user, self.host, self.port, self.name)
    }
}

/// Values supplied on the command line, applied over file and environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
    pub db_name: Option<String>,
}

pub fn load_report_config(overrides: &ConfigOverrides) -> anyhow::Result<ReportConfig> {
    load_with_environment(overrides, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
}

fn load_with_environment(
    overrides: &ConfigOverrides,
    environment: config::Environment,
) -> anyhow::Result<ReportConfig> {
    let defaults = WindowSettings::default();
    let file = match &overrides.config_file {
        Some(path) => config::File::from(path.as_path()).required(true),
        None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
    };

    let settings = config::Config::builder()
        .set_default("database.host", "localhost")?
        .set_default("database.port", 3306_i64)?
        .set_default("database.user", "root")?
        .set_default("database.name", "securityonion_db")?
        .set_default("output.path", "security_report.pdf")?
        .set_default("window.trailing_days", defaults.trailing_days)?
        .set_default("window.recent_hours", defaults.recent_hours)?
        .set_default("window.top_priorities", defaults.top_priorities)?
        .add_source(file)
        .add_source(environment)
        .set_override_option("database.host", overrides.db_host.clone())?
        .set_override_option("database.port", overrides.db_port.map(i64::from))?
        .set_override_option("database.user", overrides.db_user.clone())?
        .set_override_option("database.password", overrides.db_password.clone())?
        .set_override_option("database.name", overrides.db_name.clone())?
        .set_override_option(
            "output.path",
            overrides
                .output_path
                .as_ref()
                .map(|p| p.to_string_lossy().into_owned()),
        )?
        .build()?;

    let config: ReportConfig = settings.try_deserialize()?;
    config.window.validate()?;
    Ok(config)
}
