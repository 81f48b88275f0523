use anyhow::Context;
use chrono::{Months, Utc};
use listing_press::config::AppConfig;
use listing_press::delivery::DeliveryApi;
use listing_press::site;
use tracing::{info, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let api = DeliveryApi::new(&config.delivery).context("failed to create delivery API")?;

    // Properties sold more than the configured number of months ago have
    // dropped off the site.
    let sold_on_cutoff = Utc::now()
        .date_naive()
        .checked_sub_months(Months::new(config.site.sold_cutoff_months))
        .context("sold-on cutoff out of range")?;

    info!("building listing site (sold-on cutoff {sold_on_cutoff})");
    let summary = site::build_site(&api, sold_on_cutoff, &config.site.output_dir).await?;

    info!(
        "build finished: {} pages written to {}, {} skipped",
        summary.pages,
        config.site.output_dir.display(),
        summary.skipped
    );

    Ok(())
}
