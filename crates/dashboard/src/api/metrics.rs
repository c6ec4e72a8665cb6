//! Dashboard metrics.
//!
//! The backend computes every figure over the last 30 days.

use tracing::instrument;

use super::MarketplaceApi;
use super::types::{AmountEnvelope, DailyViews, DashboardSummary, ViewsPerDayEnvelope};
use crate::cache::{CacheKey, CacheValue, MetricKind};
use crate::error::ApiError;
use crate::http::ApiRequest;

impl MetricKind {
    const fn path(self) -> &'static str {
        match self {
            Self::SoldProducts => "sellers/metrics/products/sold",
            Self::AvailableProducts => "sellers/metrics/products/available",
            Self::Views => "sellers/metrics/views",
        }
    }
}

impl MarketplaceApi {
    /// One counter from the metrics endpoints.
    ///
    /// # Errors
    ///
    /// Returns the request's `ApiError`.
    #[instrument(skip(self))]
    pub async fn metric(&self, kind: MetricKind) -> Result<u64, ApiError> {
        let key = CacheKey::Metric(kind);
        if let Some(CacheValue::Amount(amount)) = self.cache.get(&key).await {
            return Ok(amount);
        }

        let generation = self.cache.generation().await;
        let envelope: AmountEnvelope = self.http.send(ApiRequest::get(kind.path())).await?;
        self.cache
            .insert_fresh(key, CacheValue::Amount(envelope.amount), generation)
            .await;
        Ok(envelope.amount)
    }

    /// Views per day (`GET /sellers/metrics/views/days`), oldest first.
    ///
    /// # Errors
    ///
    /// Returns the request's `ApiError`.
    #[instrument(skip(self))]
    pub async fn views_per_day(&self) -> Result<Vec<DailyViews>, ApiError> {
        if let Some(CacheValue::ViewsPerDay(days)) = self.cache.get(&CacheKey::ViewsPerDay).await {
            return Ok(days);
        }

        let generation = self.cache.generation().await;
        let envelope: ViewsPerDayEnvelope = self
            .http
            .send(ApiRequest::get("sellers/metrics/views/days"))
            .await?;

        let mut days = envelope.views_per_day;
        days.sort_by_key(|day| day.date);

        self.cache
            .insert_fresh(CacheKey::ViewsPerDay, CacheValue::ViewsPerDay(days.clone()), generation)
            .await;
        Ok(days)
    }

    /// All four dashboard figures, fetched concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first `ApiError` among the four requests.
    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, ApiError> {
        let (sold, available, views, views_per_day) = tokio::try_join!(
            self.metric(MetricKind::SoldProducts),
            self.metric(MetricKind::AvailableProducts),
            self.metric(MetricKind::Views),
            self.views_per_day(),
        )?;

        Ok(DashboardSummary {
            sold,
            available,
            views,
            views_per_day,
        })
    }
}
