//! Query construction and response flattening for the delivery API.
//!
//! Two operations back the whole site build: path enumeration (id + slug
//! only) and a full detail lookup by slug. The mapper flattens the nested
//! multi-resource responses into the flat view models in `crate::models`:
//! public links are classified into thumbnail/preview/download-original
//! variants, and the designated main image is promoted to the front of the
//! gallery.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::config::DeliveryConfig;
use crate::delivery::client::DeliveryClient;
use crate::delivery::error::DeliveryError;
use crate::delivery::response::{PropertyDetailData, PropertyListData, RawAsset, ResultPage};
use crate::delivery::traits::PropertySource;
use crate::models::{Asset, Property, PropertyListItem, PublicLink};

const PROPERTY_BY_SLUG_QUERY: &str = r#"
query PropertyBySlug($slug: String!) {
  allProperty(where: { slug_eq: $slug }) {
    results {
      id
      title
      description
      price
      type
      built
      sold
      soldOn
      address
      cityState
      zIP
      slug
      propertyToMainImage {
        ...AssetFields
      }
      propertyToImages {
        results {
          ...AssetFields
        }
      }
      propertyToDocuments {
        results {
          ...AssetFields
        }
      }
    }
  }
}

fragment AssetFields on Asset {
  id
  fileName
  assetToPublicLink {
    results {
      status
      relativeUrl
      resource
      versionHash
    }
  }
}
"#;

/// Selects properties that are published and still relevant: unsold, sold
/// without a recorded date, or sold after the cutoff. Everything the site
/// lists comes through this filter; nothing is re-filtered locally.
fn published_properties_query(sold_on_cutoff: NaiveDate) -> String {
    format!(
        r#"{{
  allProperty(where: {{
    publishedToWebsite_eq: true,
    OR: [
      {{ sold_eq: false }},
      {{ soldOn_eq: null }},
      {{ soldOn_gt: "{sold_on_cutoff}" }}
    ]
  }}) {{
    results {{
      id
      slug
    }}
  }}
}}"#
    )
}

/// High-level delivery API: issues the two property queries and maps the
/// raw responses into view models.
pub struct DeliveryApi {
    client: DeliveryClient,
    public_link_base: String,
}

impl DeliveryApi {
    pub fn new(config: &DeliveryConfig) -> Result<Self, DeliveryError> {
        Ok(Self {
            client: DeliveryClient::new(config)?,
            public_link_base: config.public_link_base.clone(),
        })
    }

    /// Enumerate the properties that should have a detail page.
    pub async fn list_published_properties(
        &self,
        sold_on_cutoff: NaiveDate,
    ) -> Result<Vec<PropertyListItem>, DeliveryError> {
        let data = self
            .client
            .fetch_graphql(&published_properties_query(sold_on_cutoff), None)
            .await?;
        map_property_list(data)
    }

    /// Fetch and assemble the property with exactly this slug.
    ///
    /// Zero matches is a valid outcome (`None`); more than one match is a
    /// `DataIntegrity` failure, raised before any mapping happens.
    pub async fn property_by_slug(&self, slug: &str) -> Result<Option<Property>, DeliveryError> {
        let data = self
            .client
            .fetch_graphql(PROPERTY_BY_SLUG_QUERY, Some(json!({ "slug": slug })))
            .await?;
        map_property_detail(data, slug, &self.public_link_base)
    }
}

#[async_trait]
impl PropertySource for DeliveryApi {
    async fn list_published(
        &self,
        sold_on_cutoff: NaiveDate,
    ) -> Result<Vec<PropertyListItem>, DeliveryError> {
        self.list_published_properties(sold_on_cutoff).await
    }

    async fn property_detail(&self, slug: &str) -> Result<Option<Property>, DeliveryError> {
        self.property_by_slug(slug).await
    }

    fn source_name(&self) -> &'static str {
        "delivery-api"
    }
}

fn map_property_list(data: Value) -> Result<Vec<PropertyListItem>, DeliveryError> {
    let decoded: Option<PropertyListData> =
        serde_json::from_value(data).map_err(DeliveryError::SchemaMismatch)?;

    Ok(decoded
        .and_then(|data| data.all_property)
        .map(|page| page.results)
        .unwrap_or_default())
}

fn map_property_detail(
    data: Value,
    slug: &str,
    public_link_base: &str,
) -> Result<Option<Property>, DeliveryError> {
    let decoded: Option<PropertyDetailData> =
        serde_json::from_value(data).map_err(DeliveryError::SchemaMismatch)?;
    let mut results = decoded
        .and_then(|data| data.all_property)
        .map(|page| page.results)
        .unwrap_or_default();

    if results.is_empty() {
        return Ok(None);
    }
    if results.len() > 1 {
        return Err(DeliveryError::DataIntegrity {
            slug: slug.to_string(),
            count: results.len(),
        });
    }

    let raw = results.remove(0);
    let main_image = raw
        .property_to_main_image
        .map(|asset| map_asset(asset, public_link_base));
    let mut images = map_assets(raw.property_to_images, public_link_base);
    let documents = map_assets(raw.property_to_documents, public_link_base);
    promote_main_image(main_image.as_ref(), &mut images);

    Ok(Some(Property {
        id: raw.id,
        title: raw.title.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        price: raw.price,
        property_type: raw.property_type,
        built: raw.built,
        sold: raw.sold,
        sold_on: raw.sold_on,
        address: raw.address,
        city_state: raw.city_state,
        zip: raw.zip,
        slug: raw.slug,
        main_image,
        images,
        documents,
    }))
}

fn map_assets(page: Option<ResultPage<RawAsset>>, public_link_base: &str) -> Vec<Asset> {
    page.map(|page| page.results)
        .unwrap_or_default()
        .into_iter()
        .map(|asset| map_asset(asset, public_link_base))
        .collect()
}

/// Classify an asset's public links into the three variant slots.
/// When the remote system serves several links with the same resource tag,
/// the first one encountered wins; unknown tags are dropped.
fn map_asset(raw: RawAsset, public_link_base: &str) -> Asset {
    let mut thumbnail = None;
    let mut preview = None;
    let mut download_original = None;

    let links = raw
        .asset_to_public_link
        .map(|page| page.results)
        .unwrap_or_default();
    for link in links {
        let link = PublicLink {
            href: public_href(public_link_base, &link.relative_url, &link.version_hash),
            resource: link.resource,
            relative_url: link.relative_url,
            version_hash: link.version_hash,
            status: link.status,
        };
        let slot = match link.resource.as_str() {
            "thumbnail" => &mut thumbnail,
            "preview" => &mut preview,
            "downloadOriginal" => &mut download_original,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(link);
        }
    }

    Asset {
        id: raw.id,
        file_name: raw.file_name,
        thumbnail,
        preview,
        download_original,
    }
}

/// Cache-busting public URL for one link variant. Plain concatenation, no
/// normalization of slashes on either side.
fn public_href(public_link_base: &str, relative_url: &str, version_hash: &str) -> String {
    format!("{public_link_base}{relative_url}?v={version_hash}")
}

/// The gallery's first image must be the designated main image whenever
/// that image also appears in the gallery. Without a match, source order
/// is preserved untouched.
fn promote_main_image(main_image: Option<&Asset>, images: &mut Vec<Asset>) {
    if let Some(main) = main_image {
        if let Some(position) = images.iter().position(|image| image.id == main.id) {
            let image = images.remove(position);
            images.insert(0, image);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://cdn.example/";

    fn link(resource: &str, relative_url: &str, version_hash: &str) -> Value {
        json!({
            "resource": resource,
            "relativeUrl": relative_url,
            "versionHash": version_hash,
            "status": "Available"
        })
    }

    fn raw_asset(id: &str, links: Value) -> Value {
        json!({
            "id": id,
            "fileName": format!("{id}.jpg"),
            "assetToPublicLink": { "results": links }
        })
    }

    fn decode_asset(value: Value) -> RawAsset {
        serde_json::from_value(value).expect("raw asset decodes")
    }

    fn detail_result(slug: &str) -> Value {
        json!({
            "id": "prop-1",
            "title": { "en-US": "Seaside Villa" },
            "description": { "en-US": "<p>Ocean views.</p>" },
            "price": 450000.0,
            "type": "residential.villa",
            "built": 1987,
            "sold": false,
            "soldOn": null,
            "address": "1 Shore Road",
            "cityState": "Falmouth, MA",
            "zIP": "02540",
            "slug": slug,
            "propertyToMainImage": null,
            "propertyToImages": null,
            "propertyToDocuments": null
        })
    }

    fn detail_data(results: Value) -> Value {
        json!({ "allProperty": { "results": results } })
    }

    #[test]
    fn href_is_plain_concatenation_with_version_suffix() {
        assert_eq!(
            public_href(BASE, "/r/abc", "v1"),
            "https://cdn.example//r/abc?v=v1"
        );
    }

    #[test]
    fn first_link_per_resource_variant_wins() {
        let asset = map_asset(
            decode_asset(raw_asset(
                "img-1",
                json!([
                    link("thumbnail", "/thumb/a", "t1"),
                    link("preview", "/preview/a", "p1"),
                    link("thumbnail", "/thumb/b", "t2"),
                    link("downloadOriginal", "/original/a", "o1"),
                ]),
            )),
            BASE,
        );

        assert_eq!(
            asset.thumbnail.as_ref().map(|l| l.href.as_str()),
            Some("https://cdn.example//thumb/a?v=t1")
        );
        assert_eq!(
            asset.preview.as_ref().map(|l| l.relative_url.as_str()),
            Some("/preview/a")
        );
        assert_eq!(
            asset
                .download_original
                .as_ref()
                .map(|l| l.relative_url.as_str()),
            Some("/original/a")
        );
    }

    #[test]
    fn unknown_resource_tags_are_dropped() {
        let asset = map_asset(
            decode_asset(raw_asset("img-1", json!([link("poster", "/poster/a", "x1")]))),
            BASE,
        );

        assert!(asset.thumbnail.is_none());
        assert!(asset.preview.is_none());
        assert!(asset.download_original.is_none());
    }

    #[test]
    fn asset_without_link_relation_has_empty_slots() {
        let asset = map_asset(
            decode_asset(json!({ "id": "img-1", "fileName": "img-1.jpg" })),
            BASE,
        );

        assert!(asset.thumbnail.is_none());
        assert!(asset.preview.is_none());
        assert!(asset.download_original.is_none());
    }

    #[test]
    fn absent_relations_default_to_none_and_empty() {
        let property = map_property_detail(
            detail_data(json!([detail_result("seaside-villa")])),
            "seaside-villa",
            BASE,
        )
        .expect("maps")
        .expect("present");

        assert!(property.main_image.is_none());
        assert!(property.images.is_empty());
        assert!(property.documents.is_empty());
    }

    #[test]
    fn absent_title_defaults_to_empty_map() {
        let mut result = detail_result("seaside-villa");
        result["title"] = Value::Null;

        let property = map_property_detail(detail_data(json!([result])), "seaside-villa", BASE)
            .expect("maps")
            .expect("present");

        assert!(property.title.is_empty());
    }

    #[test]
    fn main_image_is_promoted_to_front_of_gallery() {
        let mut result = detail_result("seaside-villa");
        result["propertyToMainImage"] = raw_asset("img-x", json!([]));
        result["propertyToImages"] = json!({ "results": [
            raw_asset("img-a", json!([])),
            raw_asset("img-x", json!([])),
            raw_asset("img-b", json!([])),
        ] });

        let property = map_property_detail(detail_data(json!([result])), "seaside-villa", BASE)
            .expect("maps")
            .expect("present");

        let order: Vec<&str> = property.images.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, ["img-x", "img-a", "img-b"]);
    }

    #[test]
    fn gallery_order_is_preserved_without_a_match() {
        let mut result = detail_result("seaside-villa");
        result["propertyToMainImage"] = raw_asset("img-x", json!([]));
        result["propertyToImages"] = json!({ "results": [
            raw_asset("img-a", json!([])),
            raw_asset("img-x2", json!([])),
            raw_asset("img-b", json!([])),
        ] });

        let property = map_property_detail(detail_data(json!([result])), "seaside-villa", BASE)
            .expect("maps")
            .expect("present");

        let order: Vec<&str> = property.images.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(order, ["img-a", "img-x2", "img-b"]);
    }

    #[test]
    fn duplicate_slug_is_a_data_integrity_failure() {
        let err = map_property_detail(
            detail_data(json!([
                detail_result("seaside-villa"),
                detail_result("seaside-villa"),
            ])),
            "seaside-villa",
            BASE,
        )
        .expect_err("duplicate slug rejected");

        match err {
            DeliveryError::DataIntegrity { slug, count } => {
                assert_eq!(slug, "seaside-villa");
                assert_eq!(count, 2);
            }
            other => panic!("expected DataIntegrity, got {other:?}"),
        }
    }

    #[test]
    fn zero_results_is_absent_not_an_error() {
        let property = map_property_detail(detail_data(json!([])), "gone", BASE).expect("maps");
        assert!(property.is_none());
    }

    #[test]
    fn null_data_is_absent() {
        assert!(map_property_detail(Value::Null, "gone", BASE)
            .expect("maps")
            .is_none());
        assert!(map_property_list(Value::Null).expect("maps").is_empty());
    }

    #[test]
    fn missing_required_field_is_a_schema_mismatch() {
        let mut result = detail_result("seaside-villa");
        result.as_object_mut().expect("object").remove("slug");

        let err = map_property_detail(detail_data(json!([result])), "seaside-villa", BASE)
            .expect_err("missing slug rejected");
        assert!(matches!(err, DeliveryError::SchemaMismatch(_)));
    }

    #[test]
    fn list_maps_id_and_slug_only() {
        let items = map_property_list(json!({
            "allProperty": { "results": [
                { "id": "prop-1", "slug": "seaside-villa", "publishedToWebsite": true },
                { "id": "prop-2", "slug": "hillside-cabin" }
            ] }
        }))
        .expect("maps");

        assert_eq!(
            items,
            vec![
                PropertyListItem {
                    id: "prop-1".to_string(),
                    slug: "seaside-villa".to_string()
                },
                PropertyListItem {
                    id: "prop-2".to_string(),
                    slug: "hillside-cabin".to_string()
                },
            ]
        );
    }

    #[test]
    fn list_performs_no_local_filtering() {
        // Filtering is the remote query's job: an unpublished record in the
        // raw response is still mapped verbatim.
        let items = map_property_list(json!({
            "allProperty": { "results": [
                { "id": "prop-9", "slug": "not-actually-published", "publishedToWebsite": false }
            ] }
        }))
        .expect("maps");

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].slug, "not-actually-published");
    }

    #[test]
    fn absent_result_set_lists_nothing() {
        assert!(map_property_list(json!({})).expect("maps").is_empty());
        assert!(map_property_list(json!({ "allProperty": null }))
            .expect("maps")
            .is_empty());
        assert!(map_property_list(json!({ "allProperty": {} }))
            .expect("maps")
            .is_empty());
    }

    #[test]
    fn list_query_carries_the_cutoff_date() {
        let cutoff = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        let query = published_properties_query(cutoff);

        assert!(query.contains(r#"soldOn_gt: "2024-01-15""#));
        assert!(query.contains("publishedToWebsite_eq: true"));
    }
}
