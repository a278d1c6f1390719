//! An HTTP client adapter for HAL (`application/hal+json`) APIs.
//!
//! [`HalClient`] sends requests through a pluggable [`http::HttpClient`]
//! and interprets every response the same way:
//!
//! - `302`, `303` and `307` are followed with a GET to `Location`.
//! - `204 No Content` yields an empty [`RootResource`].
//! - Other successful responses must be `application/hal+json`; the body is
//!   parsed into a [`RootResource`].
//! - Unsuccessful responses become [`HalClientError`]s carrying the status,
//!   the reason phrase and, when the body was HAL, the parsed resource.
//!
//! ```no_run
//! # #[cfg(feature = "http-client-reqwest-0_13")]
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use hal_client::{HalClient, HalClientConfig};
//!
//! let config = HalClientConfig::builder()
//!     .base_address("https://api.example.com/")?
//!     .build();
//! // Redirects are followed by the HAL client, not by reqwest.
//! let transport = hal_client::http::reqwest_0_13::client_builder().build()?;
//! let client = HalClient::with_config(transport, config);
//!
//! let root = client.get("/").await?;
//! if let Some(orders) = root.link("orders") {
//!     let orders = client.get(orders.href.as_str()).await?;
//!     println!("{} orders", orders.embedded_for("orders").len());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod client;
pub mod config;
mod error;
pub mod http;
pub mod interpret;
pub mod parser;
pub mod platform;
mod request_uri;
pub mod resource;

pub use client::{BuildRequestError, ClientError, HalClient, HalClientError, RawClient};
pub use config::HalClientConfig;
pub use error::Error;
pub use interpret::APPLICATION_HAL_JSON;
pub use parser::{HalParser, JsonHalParser};
pub use request_uri::{IntoRequestUri, ResolveUriError};
pub use resource::{Link, Resource, RootResource};

pub use bytes::Bytes;
