//! Mock transport for testing and development.
//!
//! Simulates the remote collector in memory: retrieval pages and update sets
//! are scripted ahead of time, and every remote call is counted so tests can
//! assert on exact call patterns. No network, no wire encoding.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::error::{CollectorError, Result};
use crate::spec::FilterSpec;
use crate::traits::CollectorTransport;
use crate::types::{
    ManagedObjectRef, ObjectKind, RetrieveOptions, RetrievePage, ServiceContent, UpdateSet,
    WaitOptions,
};

/// Scripted in-memory stand-in for the remote collector service.
pub struct MockTransport {
    content: ServiceContent,
    pages: Mutex<VecDeque<RetrievePage>>,
    update_sets: Mutex<VecDeque<UpdateSet>>,
    paths: Mutex<HashMap<String, ManagedObjectRef>>,
    switches: Mutex<HashMap<String, ManagedObjectRef>>,
    destroyed: Mutex<Vec<ManagedObjectRef>>,
    cancel_requested: AtomicBool,
    retrieve_calls: AtomicUsize,
    continue_calls: AtomicUsize,
    wait_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
    last_spec_set: Mutex<Option<Vec<FilterSpec>>>,
    last_retrieve_options: Mutex<Option<RetrieveOptions>>,
    last_wait_options: Mutex<Option<WaitOptions>>,
    last_wait_version: Mutex<Option<String>>,
    last_filter: Mutex<Option<(FilterSpec, bool)>>,
}

impl MockTransport {
    /// Create a mock with a fixed service content.
    pub fn new() -> Self {
        Self {
            content: ServiceContent {
                root_folder: ManagedObjectRef::new(ObjectKind::Folder, "group-d1"),
                property_collector: ManagedObjectRef::new(
                    ObjectKind::PropertyCollector,
                    "propertyCollector",
                ),
                search_index: ManagedObjectRef::new(ObjectKind::SearchIndex, "searchIndex"),
                dvs_manager: ManagedObjectRef::new(
                    ObjectKind::DistributedVirtualSwitchManager,
                    "dvSwitchManager",
                ),
            },
            pages: Mutex::new(VecDeque::new()),
            update_sets: Mutex::new(VecDeque::new()),
            paths: Mutex::new(HashMap::new()),
            switches: Mutex::new(HashMap::new()),
            destroyed: Mutex::new(Vec::new()),
            cancel_requested: AtomicBool::new(false),
            retrieve_calls: AtomicUsize::new(0),
            continue_calls: AtomicUsize::new(0),
            wait_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
            last_spec_set: Mutex::new(None),
            last_retrieve_options: Mutex::new(None),
            last_wait_options: Mutex::new(None),
            last_wait_version: Mutex::new(None),
            last_filter: Mutex::new(None),
        }
    }

    /// Script the page sequence returned by retrieval calls, in order.
    pub fn with_pages(self, pages: Vec<RetrievePage>) -> Self {
        *self.pages.lock().unwrap() = pages.into();
        self
    }

    /// Append one update set to the wait queue.
    pub fn push_update_set(&self, set: UpdateSet) {
        self.update_sets.lock().unwrap().push_back(set);
    }

    /// Register an inventory path for `find_by_inventory_path`.
    pub fn register_path(&self, path: impl Into<String>, obj: ManagedObjectRef) {
        self.paths.lock().unwrap().insert(path.into(), obj);
    }

    /// Register a distributed virtual switch for `query_dvs_by_uuid`.
    pub fn register_switch(&self, uuid: impl Into<String>, obj: ManagedObjectRef) {
        self.switches.lock().unwrap().insert(uuid.into(), obj);
    }

    // =========================================================================
    // Call inspection
    // =========================================================================

    pub fn retrieve_calls(&self) -> usize {
        self.retrieve_calls.load(Ordering::SeqCst)
    }

    pub fn continue_calls(&self) -> usize {
        self.continue_calls.load(Ordering::SeqCst)
    }

    pub fn wait_calls(&self) -> usize {
        self.wait_calls.load(Ordering::SeqCst)
    }

    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    /// Spec set seen by the most recent retrieval call.
    pub fn last_spec_set(&self) -> Option<Vec<FilterSpec>> {
        self.last_spec_set.lock().unwrap().clone()
    }

    /// Options seen by the most recent retrieval call.
    pub fn last_retrieve_options(&self) -> Option<RetrieveOptions> {
        *self.last_retrieve_options.lock().unwrap()
    }

    /// Options seen by the most recent wait call.
    pub fn last_wait_options(&self) -> Option<WaitOptions> {
        *self.last_wait_options.lock().unwrap()
    }

    /// Version token seen by the most recent wait call.
    pub fn last_wait_version(&self) -> Option<String> {
        self.last_wait_version.lock().unwrap().clone()
    }

    /// Spec and partial-updates flag of the most recent filter registration.
    pub fn last_filter(&self) -> Option<(FilterSpec, bool)> {
        self.last_filter.lock().unwrap().clone()
    }

    /// Collectors destroyed so far, in call order.
    pub fn destroyed(&self) -> Vec<ManagedObjectRef> {
        self.destroyed.lock().unwrap().clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CollectorTransport for MockTransport {
    async fn service_content(&self) -> Result<ServiceContent> {
        Ok(self.content.clone())
    }

    async fn create_filter(
        &self,
        _collector: &ManagedObjectRef,
        spec: &FilterSpec,
        partial_updates: bool,
    ) -> Result<ManagedObjectRef> {
        *self.last_filter.lock().unwrap() = Some((spec.clone(), partial_updates));
        let handle = ManagedObjectRef::new(
            ObjectKind::PropertyFilter,
            format!("filter-{}", Uuid::new_v4()),
        );
        debug!(filter = %handle, "Mock filter created");
        Ok(handle)
    }

    async fn create_property_collector(
        &self,
        _collector: &ManagedObjectRef,
    ) -> Result<ManagedObjectRef> {
        Ok(ManagedObjectRef::new(
            ObjectKind::PropertyCollector,
            format!("collector-{}", Uuid::new_v4()),
        ))
    }

    async fn destroy_property_collector(&self, collector: &ManagedObjectRef) -> Result<()> {
        self.destroyed.lock().unwrap().push(collector.clone());
        Ok(())
    }

    async fn retrieve_properties_ex(
        &self,
        _collector: &ManagedObjectRef,
        spec_set: &[FilterSpec],
        options: &RetrieveOptions,
    ) -> Result<Option<RetrievePage>> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_spec_set.lock().unwrap() = Some(spec_set.to_vec());
        *self.last_retrieve_options.lock().unwrap() = Some(*options);
        let page = self.pages.lock().unwrap().pop_front();
        debug!(served = page.is_some(), "Mock retrieve");
        Ok(page)
    }

    async fn continue_retrieve_properties_ex(
        &self,
        _collector: &ManagedObjectRef,
        token: &str,
    ) -> Result<RetrievePage> {
        self.continue_calls.fetch_add(1, Ordering::SeqCst);
        self.pages.lock().unwrap().pop_front().ok_or_else(|| {
            CollectorError::RemoteFault(format!("invalid continuation token: {}", token))
        })
    }

    async fn wait_for_updates_ex(
        &self,
        _collector: &ManagedObjectRef,
        version: &str,
        options: &WaitOptions,
    ) -> Result<Option<UpdateSet>> {
        self.wait_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_wait_options.lock().unwrap() = Some(*options);
        *self.last_wait_version.lock().unwrap() = Some(version.to_string());
        if self.cancel_requested.swap(false, Ordering::SeqCst) {
            debug!("Mock wait canceled");
            return Ok(None);
        }
        // Timeout when nothing is scripted
        Ok(self.update_sets.lock().unwrap().pop_front())
    }

    async fn cancel_wait_for_updates(&self, _collector: &ManagedObjectRef) -> Result<()> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.cancel_requested.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn find_by_inventory_path(
        &self,
        _search_index: &ManagedObjectRef,
        inventory_path: &str,
    ) -> Result<Option<ManagedObjectRef>> {
        Ok(self.paths.lock().unwrap().get(inventory_path).cloned())
    }

    async fn query_dvs_by_uuid(
        &self,
        _dvs_manager: &ManagedObjectRef,
        uuid: &str,
    ) -> Result<Option<ManagedObjectRef>> {
        Ok(self.switches.lock().unwrap().get(uuid).cloned())
    }
}
