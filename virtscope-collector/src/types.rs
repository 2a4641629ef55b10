//! Type definitions for managed-object identity, retrieval results and
//! change-polling records.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// MANAGED-OBJECT IDENTITY
// =============================================================================

/// Well-known inventory object kinds.
///
/// The remote side identifies types by name; `Custom` carries anything not
/// in the closed set so projections against product-specific types still work.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ObjectKind {
    Folder,
    Datacenter,
    ComputeResource,
    ResourcePool,
    HostSystem,
    Datastore,
    Network,
    VirtualMachine,
    DistributedVirtualSwitch,
    DistributedVirtualSwitchManager,
    PropertyCollector,
    PropertyFilter,
    SearchIndex,
    Custom(String),
}

impl ObjectKind {
    /// Wire name of the kind.
    pub fn as_str(&self) -> &str {
        match self {
            ObjectKind::Folder => "Folder",
            ObjectKind::Datacenter => "Datacenter",
            ObjectKind::ComputeResource => "ComputeResource",
            ObjectKind::ResourcePool => "ResourcePool",
            ObjectKind::HostSystem => "HostSystem",
            ObjectKind::Datastore => "Datastore",
            ObjectKind::Network => "Network",
            ObjectKind::VirtualMachine => "VirtualMachine",
            ObjectKind::DistributedVirtualSwitch => "DistributedVirtualSwitch",
            ObjectKind::DistributedVirtualSwitchManager => "DistributedVirtualSwitchManager",
            ObjectKind::PropertyCollector => "PropertyCollector",
            ObjectKind::PropertyFilter => "PropertyFilter",
            ObjectKind::SearchIndex => "SearchIndex",
            ObjectKind::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ObjectKind {
    fn from(name: String) -> Self {
        match name.as_str() {
            "Folder" => ObjectKind::Folder,
            "Datacenter" => ObjectKind::Datacenter,
            "ComputeResource" => ObjectKind::ComputeResource,
            "ResourcePool" => ObjectKind::ResourcePool,
            "HostSystem" => ObjectKind::HostSystem,
            "Datastore" => ObjectKind::Datastore,
            "Network" => ObjectKind::Network,
            "VirtualMachine" => ObjectKind::VirtualMachine,
            "DistributedVirtualSwitch" => ObjectKind::DistributedVirtualSwitch,
            "DistributedVirtualSwitchManager" => ObjectKind::DistributedVirtualSwitchManager,
            "PropertyCollector" => ObjectKind::PropertyCollector,
            "PropertyFilter" => ObjectKind::PropertyFilter,
            "SearchIndex" => ObjectKind::SearchIndex,
            _ => ObjectKind::Custom(name),
        }
    }
}

impl From<ObjectKind> for String {
    fn from(kind: ObjectKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Reference to a remote managed object.
///
/// Equality is structural over `{kind, value}`: two references built by
/// independent calls compare equal when they point at the same remote object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManagedObjectRef {
    /// Object kind (remote type name)
    pub kind: ObjectKind,
    /// Remote identifier, opaque to this library
    pub value: String,
}

impl ManagedObjectRef {
    /// Create a reference to a remote object.
    pub fn new(kind: ObjectKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for ManagedObjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.value)
    }
}

/// Handles published by the remote service entry point.
///
/// The transport resolves these once per session; every query and poll is
/// addressed to one of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceContent {
    /// The distinguished inventory root
    pub root_folder: ManagedObjectRef,
    /// Session-wide property collector
    pub property_collector: ManagedObjectRef,
    /// Inventory-path search index
    pub search_index: ManagedObjectRef,
    /// Distributed-virtual-switch manager
    pub dvs_manager: ManagedObjectRef,
}

// =============================================================================
// RETRIEVAL RESULTS
// =============================================================================

/// A single fetched property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicProperty {
    /// Property path as requested in the projection
    pub name: String,
    /// Fetched value
    pub value: Value,
}

impl DynamicProperty {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Properties fetched for one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectContent {
    /// The object the properties belong to
    pub obj: ManagedObjectRef,
    /// Fetched properties, in remote order
    pub props: Vec<DynamicProperty>,
}

impl ObjectContent {
    /// Look up a fetched property by name.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.props.iter().find(|p| p.name == name).map(|p| &p.value)
    }
}

/// Page-size bound for a retrieval call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveOptions {
    /// Max objects returned per page
    pub max_objects: u32,
}

/// Default page-size bound for retrieval calls.
pub const DEFAULT_PAGE_SIZE: u32 = 500;

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self {
            max_objects: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of a retrieval, possibly with a continuation token.
///
/// Produced by a single remote call and consumed immediately; the token, when
/// present, fetches the next page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievePage {
    /// Results in remote order
    pub objects: Vec<ObjectContent>,
    /// Continuation token; absent on the final page
    pub token: Option<String>,
}

// =============================================================================
// CHANGE POLLING
// =============================================================================

/// Default wait budget for a long poll, in seconds.
///
/// Kept below the assumed ~90s transport socket timeout so the remote side's
/// own timeout fires before the connection is forcibly closed.
pub const DEFAULT_WAIT_BUDGET_SECS: u32 = 85;

/// Wait/size budget for one long-poll call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitOptions {
    /// Max seconds the remote side may block before returning empty-handed
    pub max_wait_seconds: u32,
    /// Max object updates per call; unbounded when absent
    pub max_object_updates: Option<u32>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            max_wait_seconds: DEFAULT_WAIT_BUDGET_SECS,
            max_object_updates: None,
        }
    }
}

impl WaitOptions {
    /// Create wait options with the default budget and no update bound.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wait budget in seconds.
    pub fn with_wait_budget(mut self, secs: u32) -> Self {
        self.max_wait_seconds = secs;
        self
    }

    /// Bound the number of object updates per call.
    ///
    /// Zero or negative means unbounded and leaves the field unset.
    pub fn with_update_limit(mut self, limit: i64) -> Self {
        self.max_object_updates = if limit > 0 { Some(limit as u32) } else { None };
        self
    }
}

/// How an object entered an update set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdateKind {
    /// Object newly matches the filter
    Enter,
    /// A watched property changed
    Modify,
    /// Object no longer matches the filter
    Leave,
}

/// Operation applied to a single property in an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyChangeOp {
    Assign,
    Remove,
}

/// A single property delta reported by the remote change log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyChange {
    /// Property path
    pub name: String,
    /// Operation applied
    pub op: PropertyChangeOp,
    /// New value; absent for removals
    pub value: Option<Value>,
}

/// Per-object delta within an update set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectUpdate {
    /// How the object entered this update set
    pub kind: UpdateKind,
    /// The object concerned
    pub obj: ManagedObjectRef,
    /// Property-level changes
    pub changes: Vec<PropertyChange>,
}

/// Result of one successful long poll.
///
/// The version token is opaque and must be passed verbatim to the next poll;
/// an empty version string on the request side asks for a full baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSet {
    /// Token representing the state this delta advances to
    pub version: String,
    /// Incremental updates since the supplied version
    pub updates: Vec<ObjectUpdate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_ref_structural_equality() {
        let a = ManagedObjectRef::new(ObjectKind::VirtualMachine, "vm-42");
        let b = ManagedObjectRef::new(ObjectKind::VirtualMachine, "vm-42");
        let c = ManagedObjectRef::new(ObjectKind::HostSystem, "vm-42");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_object_kind_round_trips_through_string() {
        assert_eq!(ObjectKind::from("Datastore".to_string()), ObjectKind::Datastore);
        let custom = ObjectKind::from("DistributedVirtualPortgroup".to_string());
        assert_eq!(custom.as_str(), "DistributedVirtualPortgroup");
    }

    #[test]
    fn test_wait_options_update_limit() {
        let opts = WaitOptions::new().with_update_limit(10);
        assert_eq!(opts.max_object_updates, Some(10));
        assert_eq!(opts.max_wait_seconds, DEFAULT_WAIT_BUDGET_SECS);

        let unset = WaitOptions::new().with_update_limit(0);
        assert_eq!(unset.max_object_updates, None);

        let negative = WaitOptions::new().with_update_limit(-1);
        assert_eq!(negative.max_object_updates, None);
    }

    #[test]
    fn test_object_content_property_lookup() {
        let content = ObjectContent {
            obj: ManagedObjectRef::new(ObjectKind::VirtualMachine, "vm-1"),
            props: vec![DynamicProperty::new("name", json!("web-01"))],
        };
        assert_eq!(content.property("name"), Some(&json!("web-01")));
        assert_eq!(content.property("runtime.powerState"), None);
    }
}
