//! Transport seam between the client and the remote collector service.

use async_trait::async_trait;

use crate::error::Result;
use crate::spec::FilterSpec;
use crate::types::{
    ManagedObjectRef, RetrieveOptions, RetrievePage, ServiceContent, UpdateSet, WaitOptions,
};

/// One method per remote collector operation.
///
/// Implementations own the wire encoding, the session, and any retry policy;
/// this library only assembles typed requests and hands them over. Errors
/// from an implementation propagate to callers unmodified.
#[async_trait]
pub trait CollectorTransport: Send + Sync {
    // =========================================================================
    // Session
    // =========================================================================

    /// Handles published by the remote service entry point.
    async fn service_content(&self) -> Result<ServiceContent>;

    // =========================================================================
    // Filter lifecycle
    // =========================================================================

    /// Register a standing filter on a collector; returns the filter handle.
    async fn create_filter(
        &self,
        collector: &ManagedObjectRef,
        spec: &FilterSpec,
        partial_updates: bool,
    ) -> Result<ManagedObjectRef>;

    /// Create a private collector scoped to the caller.
    async fn create_property_collector(
        &self,
        collector: &ManagedObjectRef,
    ) -> Result<ManagedObjectRef>;

    /// Destroy a previously created collector.
    async fn destroy_property_collector(&self, collector: &ManagedObjectRef) -> Result<()>;

    // =========================================================================
    // Retrieval
    // =========================================================================

    /// First page of a one-shot retrieval. `None` when nothing matched.
    async fn retrieve_properties_ex(
        &self,
        collector: &ManagedObjectRef,
        spec_set: &[FilterSpec],
        options: &RetrieveOptions,
    ) -> Result<Option<RetrievePage>>;

    /// Next page of an in-progress retrieval, addressed by continuation token.
    async fn continue_retrieve_properties_ex(
        &self,
        collector: &ManagedObjectRef,
        token: &str,
    ) -> Result<RetrievePage>;

    // =========================================================================
    // Change polling
    // =========================================================================

    /// Block until a change occurs or the wait budget elapses.
    ///
    /// An empty `version` requests the full baseline. `None` means the wait
    /// timed out or was canceled out-of-band; both are normal returns.
    async fn wait_for_updates_ex(
        &self,
        collector: &ManagedObjectRef,
        version: &str,
        options: &WaitOptions,
    ) -> Result<Option<UpdateSet>>;

    /// Unblock a pending wait on the same collector.
    async fn cancel_wait_for_updates(&self, collector: &ManagedObjectRef) -> Result<()>;

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Resolve an inventory path through the search index.
    async fn find_by_inventory_path(
        &self,
        search_index: &ManagedObjectRef,
        inventory_path: &str,
    ) -> Result<Option<ManagedObjectRef>>;

    /// Look up a distributed virtual switch by UUID.
    async fn query_dvs_by_uuid(
        &self,
        dvs_manager: &ManagedObjectRef,
        uuid: &str,
    ) -> Result<Option<ManagedObjectRef>>;
}
