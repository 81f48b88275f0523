use async_trait::async_trait;
use chrono::NaiveDate;

use crate::delivery::error::DeliveryError;
use crate::models::{Property, PropertyListItem};

/// Read-only source of property data for the site build.
/// Abstracts the delivery backend so page generation can run against a
/// different source (or a stub) without touching the build driver.
#[async_trait]
pub trait PropertySource: Send + Sync {
    /// Enumerate the properties that should have a detail page.
    async fn list_published(
        &self,
        sold_on_cutoff: NaiveDate,
    ) -> Result<Vec<PropertyListItem>, DeliveryError>;

    /// Fetch one property's full detail record. `None` means the page does
    /// not exist.
    async fn property_detail(&self, slug: &str) -> Result<Option<Property>, DeliveryError>;

    /// Name of the backing source, for logging
    fn source_name(&self) -> &'static str;
}
