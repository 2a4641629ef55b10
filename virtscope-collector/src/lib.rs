//! # virtscope Collector
//!
//! Client library for the property-collector protocol of a
//! virtualization-management inventory service. It describes *which* objects
//! to visit (traversal graphs), *what* to fetch about them (property
//! projections), drains large result sets page by page, and long-polls a
//! versioned change log for incremental updates.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌───────────────────────┐
//! │  Traversal   │──▶│    Spec      │──▶│  Paginated Retriever  │
//! │   Builder    │   │   Composer   │   │  (one-shot queries)   │
//! └──────────────┘   └──────┬───────┘   └───────────────────────┘
//!                           │
//!                           ▼ (standing filter)
//!                    ┌──────────────┐
//!                    │Change Poller │◀── version token loop
//!                    └──────────────┘
//! ```
//!
//! All remote calls go through the [`CollectorTransport`] trait; the library
//! itself never touches the network. [`MockTransport`] implements the trait
//! in memory for tests and development.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use virtscope_collector::{InventoryClient, MockTransport, ObjectKind};
//!
//! #[tokio::main]
//! async fn main() {
//!     let transport = Arc::new(MockTransport::new());
//!     let client = InventoryClient::new(transport);
//!
//!     let vms = client
//!         .get_objects(ObjectKind::VirtualMachine, &["name"], false)
//!         .await
//!         .unwrap();
//!     println!("{} VMs", vms.len());
//! }
//! ```

pub mod client;
pub mod error;
pub mod mock;
pub mod monitor;
pub mod settings;
pub mod spec;
pub mod traits;
pub mod traversal;
pub mod types;

pub use client::InventoryClient;
pub use error::{CollectorError, Result};
pub use mock::MockTransport;
pub use monitor::{MonitorHandle, UpdateMonitor};
pub use settings::CollectorSettings;
pub use spec::{
    collection_filter, filter_for_anchors, FilterSpec, ObjectAnchor, PropertyProjection,
    Selection, SelectionRule, TraversalRule, DEFAULT_PROPERTY_PATHS,
};
pub use traits::CollectorTransport;
pub use traversal::{full_traversal, root_traversal};
pub use types::*;
