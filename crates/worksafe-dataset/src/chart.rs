//! Chart series derived from one location's rows.
//!
//! Each chart needs its own columns; a missing column only skips that chart.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::dataset::{columns, parse_date_time, LocationView};
use crate::error::DatasetError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    TemperatureOverTime,
    HumidityOverTime,
    WorkSuitabilityDistribution,
    PrecipitationOverTime,
    WindSpeedOverTime,
    WeatherDescriptionDistribution,
    FloodRiskDistribution,
    WorkSuitabilityOverTime,
}

impl ChartKind {
    /// Dashboard order
    pub const ALL: [ChartKind; 8] = [
        ChartKind::TemperatureOverTime,
        ChartKind::HumidityOverTime,
        ChartKind::WorkSuitabilityDistribution,
        ChartKind::PrecipitationOverTime,
        ChartKind::WindSpeedOverTime,
        ChartKind::WeatherDescriptionDistribution,
        ChartKind::FloodRiskDistribution,
        ChartKind::WorkSuitabilityOverTime,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Self::TemperatureOverTime => "Temperature Over Time",
            Self::HumidityOverTime => "Humidity Over Time",
            Self::WorkSuitabilityDistribution => "Work Suitability Distribution",
            Self::PrecipitationOverTime => "Precipitation Over Time (mm)",
            Self::WindSpeedOverTime => "Wind Speed Over Time (km/h)",
            Self::WeatherDescriptionDistribution => "Frequency of Weather Descriptions",
            Self::FloodRiskDistribution => "Flood Risk Distribution",
            Self::WorkSuitabilityOverTime => "Work Suitability Over Time (Yes=1, No=0)",
        }
    }

    /// The value column the chart plots or counts
    pub fn column(&self) -> &'static str {
        match self {
            Self::TemperatureOverTime => columns::TEMPERATURE,
            Self::HumidityOverTime => columns::HUMIDITY,
            Self::WorkSuitabilityDistribution => columns::WORK_SUITABILITY,
            Self::PrecipitationOverTime => columns::PRECIPITATION,
            Self::WindSpeedOverTime => columns::WIND_SPEED,
            Self::WeatherDescriptionDistribution => columns::WEATHER_DESCRIPTION,
            Self::FloodRiskDistribution => columns::FLOOD_RISK,
            Self::WorkSuitabilityOverTime => columns::WORK_SUITABILITY,
        }
    }

    pub fn is_time_series(&self) -> bool {
        matches!(
            self,
            Self::TemperatureOverTime
                | Self::HumidityOverTime
                | Self::PrecipitationOverTime
                | Self::WindSpeedOverTime
                | Self::WorkSuitabilityOverTime
        )
    }

    /// Plotted value for one cell; `None` drops the point
    fn point_value(&self, raw: &str) -> Option<f64> {
        match self {
            Self::WorkSuitabilityOverTime => match raw {
                "Yes" => Some(1.0),
                "No" => Some(0.0),
                _ => None,
            },
            _ => raw.parse().ok(),
        }
    }
}

impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimePoint {
    /// `None` when the row's timestamp could not be parsed
    pub time: Option<NaiveDateTime>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    TimeSeries {
        kind: ChartKind,
        points: Vec<TimePoint>,
    },
    Distribution {
        kind: ChartKind,
        counts: Vec<(String, usize)>,
    },
}

impl Chart {
    pub fn kind(&self) -> ChartKind {
        match self {
            Chart::TimeSeries { kind, .. } | Chart::Distribution { kind, .. } => *kind,
        }
    }
}

/// Build one chart. Fails with `MissingColumn` when a needed column is absent
/// and `NoData` when the location has no rows.
pub fn build_chart(view: &LocationView<'_>, kind: ChartKind) -> Result<Chart, DatasetError> {
    view.require_rows()?;

    if kind.is_time_series() {
        let times = view.column(columns::DATE_TIME)?;
        let values = view.column(kind.column())?;

        let mut points: Vec<TimePoint> = times
            .into_iter()
            .zip(values)
            .filter_map(|(time, value)| {
                kind.point_value(value.trim()).map(|value| TimePoint {
                    time: parse_date_time(time),
                    value,
                })
            })
            .collect();

        // unparseable times sort last; ties keep file order
        points.sort_by(|a, b| match (a.time, b.time) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(Chart::TimeSeries { kind, points })
    } else {
        let values = view.column(kind.column())?;

        let mut tally: HashMap<&str, usize> = HashMap::new();
        for value in values.into_iter().filter(|v| !v.is_empty()) {
            *tally.entry(value).or_default() += 1;
        }

        let mut counts: Vec<(String, usize)> = tally
            .into_iter()
            .map(|(label, count)| (label.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Ok(Chart::Distribution { kind, counts })
    }
}

/// Build every dashboard chart independently, in dashboard order
pub fn build_all(view: &LocationView<'_>) -> Vec<(ChartKind, Result<Chart, DatasetError>)> {
    ChartKind::ALL
        .iter()
        .map(|&kind| {
            let chart = build_chart(view, kind);
            if let Err(e) = &chart {
                tracing::warn!("Skipping chart '{}' for {}: {}", kind, view.location(), e);
            }
            (kind, chart)
        })
        .collect()
}
