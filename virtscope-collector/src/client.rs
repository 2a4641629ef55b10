//! High-level inventory client over a [`CollectorTransport`].
//!
//! Every method assembles typed request records and hands them to the
//! transport; nothing here touches the network directly. Transport and
//! remote failures propagate unmodified - retry policy belongs to the
//! transport implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::error::Result;
use crate::settings::CollectorSettings;
use crate::spec::{collection_filter, filter_for_anchors, FilterSpec, ObjectAnchor, PropertyProjection};
use crate::traits::CollectorTransport;
use crate::traversal::root_traversal;
use crate::types::{
    ManagedObjectRef, ObjectContent, ObjectKind, RetrieveOptions, UpdateSet, WaitOptions,
};

/// Client for the inventory property-collection and change-polling protocol.
#[derive(Clone)]
pub struct InventoryClient {
    transport: Arc<dyn CollectorTransport>,
    settings: CollectorSettings,
}

impl InventoryClient {
    /// Create a client with default settings.
    pub fn new(transport: Arc<dyn CollectorTransport>) -> Self {
        Self::with_settings(transport, CollectorSettings::default())
    }

    /// Create a client with explicit settings.
    pub fn with_settings(transport: Arc<dyn CollectorTransport>, settings: CollectorSettings) -> Self {
        Self { transport, settings }
    }

    /// The settings this client was built with.
    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    // =========================================================================
    // Session lookups
    // =========================================================================

    /// The distinguished inventory root folder.
    pub async fn root_folder(&self) -> Result<ManagedObjectRef> {
        Ok(self.transport.service_content().await?.root_folder)
    }

    /// Remote identifier of the root folder.
    pub async fn root_folder_id(&self) -> Result<String> {
        Ok(self.root_folder().await?.value)
    }

    /// The session-wide property collector.
    pub async fn property_collector(&self) -> Result<ManagedObjectRef> {
        Ok(self.transport.service_content().await?.property_collector)
    }

    /// The inventory-path search index.
    pub async fn search_index(&self) -> Result<ManagedObjectRef> {
        Ok(self.transport.service_content().await?.search_index)
    }

    /// Resolve an object by its inventory path.
    pub async fn find_by_inventory_path(&self, path: &str) -> Result<Option<ManagedObjectRef>> {
        let index = self.search_index().await?;
        self.transport.find_by_inventory_path(&index, path).await
    }

    /// Look up a distributed virtual switch by UUID.
    pub async fn dvs_by_uuid(&self, uuid: &str) -> Result<Option<ManagedObjectRef>> {
        let manager = self.transport.service_content().await?.dvs_manager;
        self.transport.query_dvs_by_uuid(&manager, uuid).await
    }

    // =========================================================================
    // Paginated retrieval
    // =========================================================================

    /// Submit filter specs to the session collector and drain every page.
    pub async fn retrieve_all(&self, spec_set: &[FilterSpec]) -> Result<Vec<ObjectContent>> {
        let collector = self.property_collector().await?;
        self.retrieve_all_with(&collector, spec_set, self.settings.retrieve_options())
            .await
    }

    /// Drain every result page from an explicit collector.
    ///
    /// Pages are concatenated in arrival order, each fetched exactly once;
    /// the loop ends when a page arrives without a continuation token. The
    /// page sequence is inherently serial since each token comes from the
    /// prior response.
    pub async fn retrieve_all_with(
        &self,
        collector: &ManagedObjectRef,
        spec_set: &[FilterSpec],
        options: RetrieveOptions,
    ) -> Result<Vec<ObjectContent>> {
        let mut contents = Vec::new();
        let first = self
            .transport
            .retrieve_properties_ex(collector, spec_set, &options)
            .await?;
        let mut page = match first {
            Some(page) => page,
            None => return Ok(contents),
        };
        loop {
            debug!(
                objects = page.objects.len(),
                has_token = page.token.is_some(),
                "Retrieved page"
            );
            contents.extend(page.objects);
            match page.token.filter(|t| !t.is_empty()) {
                Some(token) => {
                    page = self
                        .transport
                        .continue_retrieve_properties_ex(collector, &token)
                        .await?;
                }
                None => break,
            }
        }
        Ok(contents)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// List every object of `kind` reachable from the root folder.
    ///
    /// Empty `paths` projects the default property set; `all_properties`
    /// fetches everything instead.
    pub async fn get_objects(
        &self,
        kind: ObjectKind,
        paths: &[&str],
        all_properties: bool,
    ) -> Result<Vec<ObjectContent>> {
        let projection = if all_properties {
            PropertyProjection::all(kind)
        } else {
            PropertyProjection::named(kind, paths.iter().copied())
        };
        let anchor =
            ObjectAnchor::new(self.root_folder().await?).with_traversals(vec![root_traversal()]);
        let spec = FilterSpec::new(vec![projection], vec![anchor]);
        self.retrieve_all(&[spec]).await
    }

    /// Fetch properties of one object, without any traversal.
    ///
    /// A missing object reference short-circuits to `None` without a remote
    /// call. An empty `paths` list fetches all properties.
    pub async fn get_object_properties(
        &self,
        obj: Option<&ManagedObjectRef>,
        paths: &[&str],
    ) -> Result<Option<Vec<ObjectContent>>> {
        let obj = match obj {
            Some(obj) => obj,
            None => return Ok(None),
        };
        let projection = if paths.is_empty() {
            PropertyProjection::all(obj.kind.clone())
        } else {
            PropertyProjection::named(obj.kind.clone(), paths.iter().copied())
        };
        let spec = FilterSpec::new(vec![projection], vec![ObjectAnchor::new(obj.clone())]);
        Ok(Some(self.retrieve_all(&[spec]).await?))
    }

    /// Fetch named properties of one object as a name-to-value map.
    ///
    /// An empty response yields an empty map.
    pub async fn get_dynamic_properties(
        &self,
        obj: &ManagedObjectRef,
        names: &[&str],
    ) -> Result<HashMap<String, Value>> {
        let contents = self
            .get_object_properties(Some(obj), names)
            .await?
            .unwrap_or_default();
        let mut properties = HashMap::new();
        if let Some(content) = contents.into_iter().next() {
            for prop in content.props {
                properties.insert(prop.name, prop.value);
            }
        }
        Ok(properties)
    }

    /// Fetch a single property of one object. Absent properties are `None`.
    pub async fn get_dynamic_property(
        &self,
        obj: &ManagedObjectRef,
        name: &str,
    ) -> Result<Option<Value>> {
        let mut properties = self.get_dynamic_properties(obj, &[name]).await?;
        Ok(properties.remove(name))
    }

    /// Fetch one shared set of properties for an explicit object collection.
    ///
    /// Membership is already known, so no traversal is attached. An empty
    /// collection returns an empty list without a remote call.
    pub async fn properties_for_collection(
        &self,
        kind: ObjectKind,
        objects: &[ManagedObjectRef],
        paths: &[&str],
    ) -> Result<Vec<ObjectContent>> {
        if objects.is_empty() {
            return Ok(Vec::new());
        }
        let spec = collection_filter(
            PropertyProjection::named(kind, paths.iter().copied()),
            objects,
        );
        self.retrieve_all(&[spec]).await
    }

    /// Compose a traversal filter over (kind -> property list) projections.
    ///
    /// `anchors` defaults to the root folder when empty. Anchors equal to the
    /// root use the root-anchored traversal; others use the flat rule list.
    pub async fn traversal_filter(
        &self,
        projections: Vec<PropertyProjection>,
        anchors: &[ManagedObjectRef],
    ) -> Result<FilterSpec> {
        let root = self.root_folder().await?;
        let anchors = if anchors.is_empty() {
            std::slice::from_ref(&root)
        } else {
            anchors
        };
        Ok(filter_for_anchors(&root, projections, anchors))
    }

    // =========================================================================
    // Filter lifecycle
    // =========================================================================

    /// Register a standing filter; `collector` defaults to the session one.
    pub async fn create_filter(
        &self,
        spec: &FilterSpec,
        collector: Option<&ManagedObjectRef>,
    ) -> Result<ManagedObjectRef> {
        let collector = match collector {
            Some(c) => c.clone(),
            None => self.property_collector().await?,
        };
        let handle = self
            .transport
            .create_filter(&collector, spec, self.settings.partial_updates)
            .await?;
        info!(filter = %handle, collector = %collector, "Created property filter");
        Ok(handle)
    }

    /// Create a private property collector scoped to this caller.
    pub async fn create_property_collector(&self) -> Result<ManagedObjectRef> {
        let session = self.property_collector().await?;
        let handle = self.transport.create_property_collector(&session).await?;
        info!(collector = %handle, "Created property collector");
        Ok(handle)
    }

    /// Destroy a previously created collector. A `None` handle is a no-op.
    pub async fn destroy_property_collector(
        &self,
        collector: Option<&ManagedObjectRef>,
    ) -> Result<()> {
        let collector = match collector {
            Some(c) => c,
            None => return Ok(()),
        };
        self.transport.destroy_property_collector(collector).await?;
        info!(collector = %collector, "Destroyed property collector");
        Ok(())
    }

    // =========================================================================
    // Change polling
    // =========================================================================

    /// Long-poll the session collector for changes since `version`.
    ///
    /// Wait options come from the client settings. An empty version requests
    /// the full baseline; `Ok(None)` means the wait timed out or was
    /// canceled, both normal returns.
    pub async fn wait_for_updates(&self, version: &str) -> Result<Option<UpdateSet>> {
        let collector = self.property_collector().await?;
        self.wait_for_updates_with(&collector, version, self.settings.wait_options())
            .await
    }

    /// Long-poll an explicit collector with explicit wait options.
    pub async fn wait_for_updates_with(
        &self,
        collector: &ManagedObjectRef,
        version: &str,
        options: WaitOptions,
    ) -> Result<Option<UpdateSet>> {
        debug!(
            collector = %collector,
            version = %version,
            wait_secs = options.max_wait_seconds,
            "Waiting for updates"
        );
        self.transport
            .wait_for_updates_ex(collector, version, &options)
            .await
    }

    /// Unblock a pending wait on the session collector.
    pub async fn cancel_wait(&self) -> Result<()> {
        let collector = self.property_collector().await?;
        self.cancel_wait_on(&collector).await
    }

    /// Unblock a pending wait on an explicit collector.
    pub async fn cancel_wait_on(&self, collector: &ManagedObjectRef) -> Result<()> {
        self.transport.cancel_wait_for_updates(collector).await
    }
}
