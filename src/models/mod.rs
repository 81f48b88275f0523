use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Localized text keyed by locale code (e.g. "en-US"). No particular locale
/// is guaranteed to be present.
pub type MultiLanguageString = BTreeMap<String, String>;

/// Enumeration entry for one property detail page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyListItem {
    pub id: String,
    pub slug: String,
}

/// Fully assembled property detail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub title: MultiLanguageString,
    pub description: MultiLanguageString,
    pub price: Option<f64>,
    /// Dotted taxonomy string, e.g. "residential.villa"
    #[serde(rename = "type")]
    pub property_type: String,
    pub built: i32,
    pub sold: bool,
    pub sold_on: Option<NaiveDate>,
    pub address: String,
    pub city_state: String,
    #[serde(rename = "zIP")]
    pub zip: String,
    /// Unique external identifier, used as the page URL key
    pub slug: String,
    pub main_image: Option<Asset>,
    /// Gallery images; the main image is always first when it appears here
    pub images: Vec<Asset>,
    pub documents: Vec<Asset>,
}

/// One uploaded file (image or document) and its derived variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub file_name: String,
    pub thumbnail: Option<PublicLink>,
    pub preview: Option<PublicLink>,
    pub download_original: Option<PublicLink>,
}

/// One externally fetchable URL variant of an asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicLink {
    /// Variant tag: "thumbnail", "preview" or "downloadOriginal"
    pub resource: String,
    pub relative_url: String,
    pub version_hash: String,
    pub status: String,
    /// Derived cache-busting URL, not served by the remote system
    pub href: String,
}
