//! Historical panel for one location: recent rows plus chart series.

use serde::Serialize;
use worksafe_dataset::{build_all, Chart, ChartKind, Dataset, DatasetError, Table};

#[derive(Debug, Clone, Serialize)]
pub struct History {
    pub location: String,
    pub recent: Table,
    pub charts: Vec<Chart>,
    /// Charts left out, with the reason shown to the user
    pub skipped: Vec<(ChartKind, String)>,
}

impl History {
    /// Assemble the panel. A missing column drops only the charts that need
    /// it; a missing `Location` column or an empty location fails the panel.
    pub fn build(dataset: &Dataset, location: &str, recent_rows: usize) -> Result<Self, DatasetError> {
        let view = dataset.for_location(location)?;
        view.require_rows()?;

        let mut charts = Vec::new();
        let mut skipped = Vec::new();
        for (kind, chart) in build_all(&view) {
            match chart {
                Ok(chart) => charts.push(chart),
                Err(e) => skipped.push((kind, e.user_message())),
            }
        }

        Ok(Self {
            location: view.location().to_string(),
            recent: view.recent(recent_rows),
            charts,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_skips_missing_flood_column() {
        let csv = "\
Location,Date_Time,Temperature_C,Humidity_pct,Precipitation_mm,Wind_Speed_kmh,Weather_Description,Work_Suitability
Mumbai,2024-07-01 09:00:00,29.0,88,14.0,22,Heavy Rain,No
Mumbai,2024-07-01 12:00:00,30.5,84,6.0,18,Showers,Yes
";
        let dataset = Dataset::from_reader(csv.as_bytes()).unwrap();
        let history = History::build(&dataset, "Mumbai", 5).unwrap();

        assert_eq!(history.recent.rows.len(), 2);
        assert_eq!(history.charts.len(), ChartKind::ALL.len() - 1);
        assert_eq!(history.skipped.len(), 1);
        assert_eq!(history.skipped[0].0, ChartKind::FloodRiskDistribution);
    }

    #[test]
    fn test_history_for_unknown_location() {
        let dataset = Dataset::from_reader("Location,Temperature_C\nDelhi,30\n".as_bytes()).unwrap();
        assert!(matches!(
            History::build(&dataset, "Agra", 5),
            Err(DatasetError::NoData(_))
        ));
    }
}
