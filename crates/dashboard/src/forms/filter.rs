//! Product list filters.
//!
//! Filters live in the product list's route (`/products?search=..&status=..`),
//! so applying them is a navigation and the list reads them back from the
//! route.

use seller_panel_core::ProductStatus;

use crate::api::ProductListQuery;
use crate::navigation::{NavigationMode, Navigator, Route};

/// Values in the filter panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilterForm {
    pub search: String,
    /// A status name; empty or `none` means any status.
    pub status: String,
}

impl ProductFilterForm {
    /// Panel pre-filled from the current route.
    #[must_use]
    pub fn from_route(route: &Route) -> Self {
        match route {
            Route::Products { search, status } => Self {
                search: search.clone().unwrap_or_default(),
                status: status.map(|s| s.as_str().to_string()).unwrap_or_default(),
            },
            _ => Self::default(),
        }
    }

    /// The query these values describe. Blank values and unknown statuses
    /// are dropped.
    #[must_use]
    pub fn query(&self) -> ProductListQuery {
        let search = self.search.trim();
        ProductListQuery {
            search: (!search.is_empty()).then(|| search.to_string()),
            status: match self.status.trim() {
                "" | "none" => None,
                other => other.parse::<ProductStatus>().ok(),
            },
        }
    }

    /// Show the list with these filters.
    pub fn apply(&self, navigator: &dyn Navigator) -> ProductListQuery {
        let query = self.query();
        navigator.navigate(query_route(&query), NavigationMode::Push);
        query
    }

    /// Reset the panel and show the unfiltered list.
    pub fn clear(&mut self, navigator: &dyn Navigator) {
        *self = Self::default();
        navigator.navigate(Route::products(), NavigationMode::Push);
    }
}

/// Route of the product list for a query.
#[must_use]
pub fn query_route(query: &ProductListQuery) -> Route {
    Route::Products {
        search: query.search.clone(),
        status: query.status,
    }
}

/// Query described by a product list route.
#[must_use]
pub fn route_query(route: &Route) -> ProductListQuery {
    ProductFilterForm::from_route(route).query()
}
