// MySQL repository implementation
use crate::application::event_repository::EventRepository;
use crate::domain::dataset::{Dataset, LabeledValue, ReportSection};
use crate::domain::error::{ReportError, Result};
use crate::infrastructure::config::{DatabaseSettings, WindowSettings};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::Connection;

// Calendar dates in the trailing window, outer-joined so quiet days count as 0
const DAILY_COUNTS_QUERY: &str = "\
SELECT CAST(calendar.datefield AS CHAR) AS label,
       COUNT(event.signature) AS value
FROM event RIGHT JOIN calendar
  ON (DATE(event.timestamp) = calendar.datefield)
WHERE calendar.datefield BETWEEN DATE_SUB(NOW(), INTERVAL ? DAY) AND NOW()
GROUP BY calendar.datefield
ORDER BY calendar.datefield DESC";

const NOISY_SIGNATURES_QUERY: &str = "\
SELECT CAST(COALESCE(signature, '') AS CHAR) AS label,
       COUNT(*) AS value
FROM event
WHERE timestamp > DATE_SUB(NOW(), INTERVAL ? HOUR)
GROUP BY signature
ORDER BY value DESC";

const TOP_PRIORITIES_QUERY: &str = "\
SELECT CAST(COALESCE(signature, '') AS CHAR) AS label,
       CAST(COALESCE(priority, 0) AS SIGNED) AS value
FROM event
WHERE timestamp > DATE_SUB(NOW(), INTERVAL ? HOUR)
ORDER BY priority DESC
LIMIT ?";

#[derive(Debug, sqlx::FromRow)]
struct EventRow {
    label: String,
    value: i64,
}

impl From<EventRow> for LabeledValue {
    fn from(row: EventRow) -> Self {
        LabeledValue::new(row.label, row.value as f64)
    }
}

/// Opens a fresh connection for every query and closes it afterwards
#[derive(Debug, Clone)]
pub struct MySqlEventRepository {
    options: MySqlConnectOptions,
    window: WindowSettings,
}

impl MySqlEventRepository {
    pub fn new(settings: &DatabaseSettings, window: WindowSettings) -> Self {
        let mut options = MySqlConnectOptions::new()
            .host(&settings.host)
            .port(settings.port)
            .username(&settings.user)
            .database(&settings.name);
        if let Some(password) = &settings.password {
            options = options.password(password);
        }

        Self { options, window }
    }

    fn query_text(section: ReportSection) -> &'static str {
        match section {
            ReportSection::Counts => DAILY_COUNTS_QUERY,
            ReportSection::Priority => TOP_PRIORITIES_QUERY,
            ReportSection::Noise => NOISY_SIGNATURES_QUERY,
        }
    }

    /// Positional parameters for a section's query, in placeholder order
    fn parameters(&self, section: ReportSection) -> Vec<i64> {
        match section {
            ReportSection::Counts => vec![self.window.trailing_days],
            ReportSection::Priority => {
                vec![self.window.recent_hours, self.window.top_priorities]
            }
            ReportSection::Noise => vec![self.window.recent_hours],
        }
    }
}

#[async_trait]
impl EventRepository for MySqlEventRepository {
    async fn fetch(&self, section: ReportSection) -> Result<Dataset> {
        let mut conn = MySqlConnection::connect_with(&self.options)
            .await
            .map_err(ReportError::Connection)?;

        let mut query = sqlx::query_as::<_, EventRow>(Self::query_text(section));
        for parameter in self.parameters(section) {
            query = query.bind(parameter);
        }

        tracing::debug!("Executing {} query", section);
        let result = query.fetch_all(&mut conn).await;

        if let Err(e) = conn.close().await {
            tracing::warn!("Failed to close connection after {} query: {}", section, e);
        }

        let rows = result.map_err(|source| ReportError::Store {
            dataset: section.name(),
            source,
        })?;

        tracing::debug!("{} query returned {} rows", section, rows.len());
        Ok(Dataset::new(rows.into_iter().map(LabeledValue::from).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> MySqlEventRepository {
        let settings = DatabaseSettings {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: None,
            name: "securityonion_db".to_string(),
        };
        MySqlEventRepository::new(&settings, WindowSettings::default())
    }

    #[test]
    fn test_parameters_match_placeholders() {
        let repo = repository();
        for section in ReportSection::ALL {
            let placeholders = MySqlEventRepository::query_text(section).matches('?').count();
            assert_eq!(placeholders, repo.parameters(section).len(), "{}", section);
        }
    }

    #[test]
    fn test_default_windows_are_bound() {
        let repo = repository();
        assert_eq!(repo.parameters(ReportSection::Counts), vec![7]);
        assert_eq!(repo.parameters(ReportSection::Noise), vec![24]);
        assert_eq!(repo.parameters(ReportSection::Priority), vec![24, 10]);
    }

    #[test]
    fn test_configured_limit_is_the_last_priority_parameter() {
        let settings = DatabaseSettings {
            host: "localhost".to_string(),
            port: 3306,
            user: "root".to_string(),
            password: None,
            name: "securityonion_db".to_string(),
        };
        let window = WindowSettings {
            trailing_days: 14,
            recent_hours: 6,
            top_priorities: 5,
        };
        let repo = MySqlEventRepository::new(&settings, window);

        assert_eq!(repo.parameters(ReportSection::Priority), vec![6, 5]);
        assert_eq!(repo.parameters(ReportSection::Noise), vec![6]);
        assert_eq!(repo.parameters(ReportSection::Counts), vec![14]);
    }

    #[test]
    fn test_row_conversion() {
        let row = EventRow {
            label: "ET SCAN Nmap".to_string(),
            value: 42,
        };
        assert_eq!(LabeledValue::from(row), LabeledValue::new("ET SCAN Nmap", 42.0));
    }
}
