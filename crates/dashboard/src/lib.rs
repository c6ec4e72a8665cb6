//! Seller Panel dashboard library.
//!
//! Everything a seller-facing front-end needs below its rendering layer:
//!
//! - [`http`] - the single HTTP egress point with its response interceptor chain
//! - [`session`] - the guard that redirects to sign-in when the session expires
//! - [`navigation`] - routes, push/replace navigation and an in-memory history
//! - [`scope`] - per-screen cancellation of in-flight requests
//! - [`api`] - typed request functions for every backend resource, with a query cache
//! - [`forms`] - validate-then-submit pipelines for sign-in, sign-up and products
//! - [`notify`] - transient notifications ("toasts")
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use seller_panel_dashboard::{
//!     api::MarketplaceApi, config::DashboardConfig, http::HttpClient,
//!     navigation::History, session::SessionGuard,
//! };
//!
//! let config = DashboardConfig::from_env()?;
//! let client = HttpClient::new(&config)?;
//! let api = MarketplaceApi::new(client.clone(), config.cache_ttl);
//! let history = Arc::new(History::new());
//!
//! // Entering a protected screen
//! let guard = SessionGuard::attach(&client, history.clone());
//! let products = api.seller_products(&Default::default()).await?;
//! drop(guard); // leaving it
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod forms;
pub mod http;
pub mod navigation;
pub mod notify;
pub mod scope;
pub mod session;
pub mod upload;

pub use error::ApiError;
