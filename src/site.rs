//! Build driver: turns the delivery API's two operations into static
//! render-data files, one JSON document per property page plus an index of
//! all generated pages.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::delivery::PropertySource;
use crate::models::{MultiLanguageString, Property};

/// Language used for build logs and anywhere a single localization must be
/// picked.
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Counts for one completed site build
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BuildSummary {
    pub pages: usize,
    pub skipped: usize,
}

/// Render data for one property page: the full detail record plus derived
/// display fields.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PageData<'a> {
    #[serde(flatten)]
    property: &'a Property,
    price_label: String,
    type_label: &'a str,
}

/// Generate the site's render data under `out_dir`.
///
/// Enumerates the published properties, writes `index.json`, then fetches
/// each property serially and writes `properties/<slug>.json`. A slug that
/// no longer resolves is skipped, not a failure: the property may have been
/// unpublished between enumeration and fetch.
pub async fn build_site<S: PropertySource>(
    source: &S,
    sold_on_cutoff: NaiveDate,
    out_dir: &Path,
) -> Result<BuildSummary> {
    info!(
        source = source.source_name(),
        "enumerating published properties"
    );
    let properties = source
        .list_published(sold_on_cutoff)
        .await
        .context("failed to enumerate published properties")?;
    info!("{} properties to render", properties.len());

    let pages_dir = out_dir.join("properties");
    tokio::fs::create_dir_all(&pages_dir)
        .await
        .with_context(|| format!("failed to create {}", pages_dir.display()))?;

    let index = serde_json::to_string_pretty(&properties)?;
    tokio::fs::write(out_dir.join("index.json"), index)
        .await
        .context("failed to write index.json")?;

    let mut summary = BuildSummary::default();
    for item in &properties {
        let property = source
            .property_detail(&item.slug)
            .await
            .with_context(|| format!("failed to fetch property `{}`", item.slug))?;

        match property {
            Some(property) => {
                let page = PageData {
                    price_label: format_price(property.price),
                    type_label: type_label(&property.property_type),
                    property: &property,
                };
                let json = serde_json::to_string_pretty(&page)?;
                let path = pages_dir.join(format!("{}.json", item.slug));
                tokio::fs::write(&path, json)
                    .await
                    .with_context(|| format!("failed to write {}", path.display()))?;

                info!(
                    slug = %item.slug,
                    title = %localized(&property.title, DEFAULT_LANGUAGE),
                    "rendered property page"
                );
                summary.pages += 1;
            }
            None => {
                warn!(slug = %item.slug, "property vanished between enumeration and fetch, skipping");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}

/// One language's text, or empty when that localization is missing.
pub fn localized<'a>(text: &'a MultiLanguageString, language: &str) -> &'a str {
    text.get(language).map(String::as_str).unwrap_or_default()
}

/// Thousands-separated price label. Absent and zero prices render as empty
/// rather than "0".
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(value) if value > 0.0 => {
            let text = value.to_string();
            let (whole, fraction) = match text.split_once('.') {
                Some((whole, fraction)) => (whole, Some(fraction)),
                None => (text.as_str(), None),
            };

            let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
            for (i, digit) in whole.chars().enumerate() {
                if i > 0 && (whole.len() - i) % 3 == 0 {
                    grouped.push(',');
                }
                grouped.push(digit);
            }

            match fraction {
                Some(fraction) => format!("{grouped}.{fraction}"),
                None => grouped,
            }
        }
        _ => String::new(),
    }
}

/// Last segment of the dotted taxonomy string, e.g. "residential.villa"
/// renders as "villa".
pub fn type_label(property_type: &str) -> &str {
    property_type.rsplit('.').next().unwrap_or(property_type)
}
