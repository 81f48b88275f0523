//! Schema-matching decode targets for the delivery API's two query shapes.
//!
//! Raw responses are decoded into these types before mapping, so a response
//! that drifts from the expected shape fails with a `SchemaMismatch` instead
//! of silently defaulting. Fields that the remote system may legitimately
//! omit are `Option`; everything else is required.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{MultiLanguageString, PropertyListItem};

/// Paged relation wrapper used by every multi-valued field.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ResultPage<T> {
    #[serde(default)]
    pub results: Vec<T>,
}

/// `data` payload of the path-enumeration query.
#[derive(Debug, Deserialize)]
pub(crate) struct PropertyListData {
    #[serde(rename = "allProperty")]
    pub all_property: Option<ResultPage<PropertyListItem>>,
}

/// `data` payload of the slug-lookup query.
#[derive(Debug, Deserialize)]
pub(crate) struct PropertyDetailData {
    #[serde(rename = "allProperty")]
    pub all_property: Option<ResultPage<RawProperty>>,
}

/// One property as served, relations still nested.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawProperty {
    pub id: String,
    pub title: Option<MultiLanguageString>,
    pub description: Option<MultiLanguageString>,
    pub price: Option<f64>,
    #[serde(rename = "type")]
    pub property_type: String,
    pub built: i32,
    pub sold: bool,
    pub sold_on: Option<NaiveDate>,
    pub address: String,
    pub city_state: String,
    #[serde(rename = "zIP")]
    pub zip: String,
    pub slug: String,
    pub property_to_main_image: Option<RawAsset>,
    pub property_to_images: Option<ResultPage<RawAsset>>,
    pub property_to_documents: Option<ResultPage<RawAsset>>,
}

/// One asset as served, its public-link relation still nested.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawAsset {
    pub id: String,
    pub file_name: String,
    pub asset_to_public_link: Option<ResultPage<RawPublicLink>>,
}

/// One public link as served, before href derivation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPublicLink {
    pub resource: String,
    pub relative_url: String,
    pub version_hash: String,
    pub status: String,
}
