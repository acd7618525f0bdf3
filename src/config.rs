// src/config.rs

use std::env;
use std::time::Duration;

use crate::models::SheetSource;

/// One practice location. Each reports on two tabs of the shared workbook,
/// named by convention after the location.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: String,
}

impl Location {
    pub fn range_for(&self, source: SheetSource) -> String {
        match source {
            SheetSource::DailyOps => format!("'EOD - {}'!A1:Z", self.name),
            SheetSource::FrontDesk => format!("'Front Desk KPI - {}'!A1:Z", self.name),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spreadsheet_id: String,
    pub api_key: String,
    pub locations: Vec<Location>,
    pub cache_ttl: Duration,
}

impl AppConfig {
    /// Reads the environment (after dotenvy has loaded .env).
    pub fn from_env() -> Self {
        let spreadsheet_id =
            env::var("SPREADSHEET_ID").expect("❌ SPREADSHEET_ID must be set in your .env file");
        let api_key =
            env::var("GOOGLE_API_KEY").expect("❌ GOOGLE_API_KEY must be set in your .env file");

        let locations = parse_locations(&env::var("LOCATIONS").unwrap_or_else(|_| "Main".into()));

        let cache_ttl_secs: u64 = env::var("CACHE_TTL_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(300); // default 5 minutes

        Self {
            spreadsheet_id,
            api_key,
            locations,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
        }
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.locations
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(name))
    }
}

fn parse_locations(raw: &str) -> Vec<Location> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| Location {
            name: name.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_parse_from_a_comma_list() {
        let locations = parse_locations("Baytown, Humble,, Atascocita ");
        let names: Vec<&str> = locations.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Baytown", "Humble", "Atascocita"]);
    }

    #[test]
    fn ranges_follow_the_tab_naming_convention() {
        let loc = Location {
            name: "Baytown".into(),
        };
        assert_eq!(loc.range_for(SheetSource::DailyOps), "'EOD - Baytown'!A1:Z");
        assert_eq!(
            loc.range_for(SheetSource::FrontDesk),
            "'Front Desk KPI - Baytown'!A1:Z"
        );
    }
}
