use anyhow::Result;
use worksafe_core::Config;
use worksafe_dashboard::{AppError, Dashboard, History};
use worksafe_dataset::Dataset;
use worksafe_weather::WeatherReading;

#[tokio::main]
async fn main() -> Result<()> {
    worksafe_core::init()?;

    let (config, _) = Config::load_validated()?;

    let mut dashboard = Dashboard::from_config(&config)?;
    tracing::info!("WorkSafe dashboard started");

    // Manual panel starts from the slider defaults
    match dashboard.predict_manual(WeatherReading::default()) {
        Ok(evaluation) => println!(
            "Manual: {} -> {:?}{}",
            evaluation.category,
            evaluation.verdict.suitability,
            if evaluation.alert_triggered { " (ALERT)" } else { "" }
        ),
        Err(e) => report(&e),
    }

    if config.provider.api_key().is_some() {
        if let Some(city) = dashboard.cities().first().map(|c| c.name.clone()) {
            match dashboard.predict_realtime(&city).await {
                Ok(outcome) => println!(
                    "Real-time {}: {} -> {:?}{}",
                    outcome.city,
                    outcome.evaluation.category,
                    outcome.evaluation.verdict.suitability,
                    if outcome.evaluation.alert_triggered { " (ALERT)" } else { "" }
                ),
                Err(e) => report(&e),
            }
        }
    }

    match history(&config) {
        Ok(Some(history)) => {
            println!(
                "History for {}: {} recent rows, {} charts",
                history.location,
                history.recent.rows.len(),
                history.charts.len()
            );
            for (kind, reason) in &history.skipped {
                println!("  skipped {}: {}", kind, reason);
            }
        }
        Ok(None) => tracing::warn!("Dataset has no locations"),
        Err(e) => report(&e),
    }

    Ok(())
}

fn history(config: &Config) -> Result<Option<History>, AppError> {
    let dataset = Dataset::from_path(&config.dataset.path)?;
    let Some(location) = dataset.locations()?.into_iter().next() else {
        return Ok(None);
    };
    Ok(Some(History::build(
        &dataset,
        &location,
        config.dataset.recent_rows,
    )?))
}

fn report(e: &AppError) {
    tracing::error!("{}", e);
    eprintln!("{}", e.user_message());
}
