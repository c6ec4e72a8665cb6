//! Request and response records for the marketplace API.
//!
//! Field names follow the backend's camelCase JSON.

use chrono::{DateTime, NaiveDate};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use seller_panel_core::{
    AttachmentId, CategoryId, PriceInCents, ProductId, ProductStatus, SellerId,
};

// =============================================================================
// Entities
// =============================================================================

/// Uploaded file reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub url: String,
}

/// Seller profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub id: SellerId,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<Attachment>,
}

/// Product category (static reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub title: String,
    pub slug: String,
}

/// A product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub price_in_cents: PriceInCents,
    pub status: ProductStatus,
    #[serde(default)]
    pub owner: Option<Seller>,
    pub category: Category,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

impl Product {
    /// Cover image, if the product has any.
    #[must_use]
    pub fn cover(&self) -> Option<&Attachment> {
        self.attachments.first()
    }
}

/// Views on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyViews {
    #[serde(deserialize_with = "deserialize_day")]
    pub date: NaiveDate,
    pub amount: u64,
}

impl DailyViews {
    /// Chart label (`DD/MM`).
    #[must_use]
    pub fn label(&self) -> String {
        self.date.format("%d/%m").to_string()
    }
}

/// Accept either a plain date or a full RFC 3339 timestamp.
fn deserialize_day<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.date_naive())
        .map_err(serde::de::Error::custom)
}

// =============================================================================
// Response envelopes
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct SellerEnvelope {
    pub seller: Seller,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductEnvelope {
    pub product: Product,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductsEnvelope {
    pub products: Vec<Product>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesEnvelope {
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AttachmentsEnvelope {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AmountEnvelope {
    pub amount: u64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewsPerDayEnvelope {
    pub views_per_day: Vec<DailyViews>,
}

// =============================================================================
// Requests
// =============================================================================

/// Filters for the seller's product list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub status: Option<ProductStatus>,
}

impl ProductListQuery {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.status.is_none()
    }
}

/// Credentials for `POST /sellers/sessions`.
#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
}

/// Body for `POST /sellers`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterSeller {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub avatar_id: Option<AttachmentId>,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    #[serde(serialize_with = "serialize_secret")]
    pub password_confirmation: SecretString,
}

/// Body for `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub category_id: CategoryId,
    pub description: String,
    pub price_in_cents: PriceInCents,
    pub attachments_ids: Vec<AttachmentId>,
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

// =============================================================================
// Dashboard
// =============================================================================

/// Everything the metrics screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSummary {
    pub sold: u64,
    pub available: u64,
    pub views: u64,
    pub views_per_day: Vec<DailyViews>,
}

impl DashboardSummary {
    /// First and last day covered by the chart.
    #[must_use]
    pub fn range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.views_per_day.first()?;
        let last = self.views_per_day.last()?;
        Some((first.date, last.date))
    }
}
