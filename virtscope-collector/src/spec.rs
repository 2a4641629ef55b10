//! Filter-specification records and the spec composer.
//!
//! A query against the property collector is one [`FilterSpec`]: which
//! properties to fetch per object kind, and which anchor objects to start
//! from, each optionally carrying a traversal graph describing how to walk
//! onward from the anchor. Composition is pure data assembly with no I/O.

use serde::{Deserialize, Serialize};

use crate::traversal::{full_traversal, root_traversal};
use crate::types::{ManagedObjectRef, ObjectKind};

/// Property paths fetched when a caller asks for a named projection without
/// naming any paths.
pub const DEFAULT_PROPERTY_PATHS: &[&str] = &["name"];

// =============================================================================
// TRAVERSAL RECORDS
// =============================================================================

/// Name-only reference to a traversal rule defined elsewhere in the same
/// graph. Resolution happens on the remote side; a dangling name is a caller
/// programming error and fails there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRule {
    /// Name of the referenced traversal rule
    pub name: String,
}

/// Entry in a selection set: either a reference to a sibling rule by name or
/// an embedded traversal rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// Follow the rule with this name
    Reference(SelectionRule),
    /// Follow this embedded rule
    Traversal(TraversalRule),
}

impl Selection {
    /// Name reference to a rule defined elsewhere in the graph.
    pub fn reference(name: impl Into<String>) -> Self {
        Selection::Reference(SelectionRule { name: name.into() })
    }
}

/// One edge-class of an inventory walk.
///
/// Applies from objects of `source` kind, follows the `path` relation, and
/// continues the walk through `select_set`. Rule names must be unique within
/// one graph since [`SelectionRule`] references resolve by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalRule {
    /// Unique name within the traversal graph
    pub name: String,
    /// Object kind this rule applies from
    pub source: ObjectKind,
    /// Field/relation to follow
    pub path: String,
    /// Exclude the rule's own starting object from results
    pub skip_root: bool,
    /// Rules active once the walk arrives here
    pub select_set: Vec<Selection>,
}

impl TraversalRule {
    /// Create a non-skipping rule with an empty selection set.
    pub fn new(name: impl Into<String>, source: ObjectKind, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source,
            path: path.into(),
            skip_root: false,
            select_set: Vec::new(),
        }
    }

    /// Replace the selection set.
    pub fn with_select_set(mut self, select_set: Vec<Selection>) -> Self {
        self.select_set = select_set;
        self
    }
}

// =============================================================================
// PROJECTIONS AND ANCHORS
// =============================================================================

/// Which properties to fetch for objects of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyProjection {
    /// Object kind the projection applies to
    pub kind: ObjectKind,
    /// Property paths to fetch; empty only when `all_properties` is set
    pub paths: Vec<String>,
    /// Fetch every property instead of a named subset
    pub all_properties: bool,
}

impl PropertyProjection {
    /// Projection over named property paths.
    ///
    /// An empty path list falls back to [`DEFAULT_PROPERTY_PATHS`] so the
    /// projection never ends up meaningless. The default is copied per call,
    /// never shared.
    pub fn named<I, S>(kind: ObjectKind, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut paths: Vec<String> = paths.into_iter().map(Into::into).collect();
        if paths.is_empty() {
            paths = DEFAULT_PROPERTY_PATHS.iter().map(|p| p.to_string()).collect();
        }
        Self {
            kind,
            paths,
            all_properties: false,
        }
    }

    /// Projection fetching every property of the kind.
    pub fn all(kind: ObjectKind) -> Self {
        Self {
            kind,
            paths: Vec::new(),
            all_properties: true,
        }
    }
}

/// A root object to start retrieval from, with an optional traversal graph to
/// walk onward from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectAnchor {
    /// The anchor object
    pub obj: ManagedObjectRef,
    /// Exclude the anchor itself from results
    pub skip_root: bool,
    /// Traversal graph applied from the anchor; empty for direct fetch
    pub select_set: Vec<Selection>,
}

impl ObjectAnchor {
    /// Anchor with no traversal attached (direct property fetch).
    pub fn new(obj: ManagedObjectRef) -> Self {
        Self {
            obj,
            skip_root: false,
            select_set: Vec::new(),
        }
    }

    /// Attach traversal rules to walk from the anchor.
    pub fn with_traversals(mut self, rules: Vec<TraversalRule>) -> Self {
        self.select_set = rules.into_iter().map(Selection::Traversal).collect();
        self
    }
}

/// The unit submitted to the retrieval protocol: projections plus anchors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Property projections, in caller order
    pub projections: Vec<PropertyProjection>,
    /// Object anchors, in caller order
    pub anchors: Vec<ObjectAnchor>,
}

impl FilterSpec {
    pub fn new(projections: Vec<PropertyProjection>, anchors: Vec<ObjectAnchor>) -> Self {
        Self {
            projections,
            anchors,
        }
    }
}

// =============================================================================
// COMPOSERS
// =============================================================================

/// Compose a filter over traversal-anchored objects.
///
/// An anchor equal to the distinguished root folder gets the cheap nested
/// root traversal; any other anchor gets the general flat rule list, whose
/// rules are all addressable by name for selection-set wiring.
pub fn filter_for_anchors(
    root_folder: &ManagedObjectRef,
    projections: Vec<PropertyProjection>,
    anchors: &[ManagedObjectRef],
) -> FilterSpec {
    let anchors = anchors
        .iter()
        .map(|obj| {
            let rules = if obj == root_folder {
                vec![root_traversal()]
            } else {
                full_traversal()
            };
            ObjectAnchor::new(obj.clone()).with_traversals(rules)
        })
        .collect();
    FilterSpec::new(projections, anchors)
}

/// Compose a flat property fetch over an explicit object list.
///
/// Membership is already known, so no traversal is attached; one shared
/// projection covers every object.
pub fn collection_filter(
    projection: PropertyProjection,
    objects: &[ManagedObjectRef],
) -> FilterSpec {
    let anchors = objects
        .iter()
        .map(|obj| ObjectAnchor::new(obj.clone()))
        .collect();
    FilterSpec::new(vec![projection], anchors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root() -> ManagedObjectRef {
        ManagedObjectRef::new(ObjectKind::Folder, "group-d1")
    }

    #[test]
    fn test_named_projection_defaults_to_name() {
        let proj = PropertyProjection::named(ObjectKind::VirtualMachine, Vec::<String>::new());
        assert_eq!(proj.paths, vec!["name".to_string()]);
        assert!(!proj.all_properties);
    }

    #[test]
    fn test_all_projection_has_no_paths() {
        let proj = PropertyProjection::all(ObjectKind::HostSystem);
        assert!(proj.paths.is_empty());
        assert!(proj.all_properties);
    }

    #[test]
    fn test_root_anchor_selects_root_traversal() {
        let spec = filter_for_anchors(
            &root(),
            vec![PropertyProjection::named(ObjectKind::VirtualMachine, ["name"])],
            &[root()],
        );
        assert_eq!(spec.anchors.len(), 1);
        // Root anchor carries the single nested composite.
        assert_eq!(spec.anchors[0].select_set.len(), 1);
        match &spec.anchors[0].select_set[0] {
            Selection::Traversal(rule) => assert_eq!(rule.name, "visitFolders"),
            other => panic!("expected embedded traversal, got {:?}", other),
        }
    }

    #[test]
    fn test_non_root_anchor_selects_flat_traversal_list() {
        let cluster = ManagedObjectRef::new(ObjectKind::ComputeResource, "domain-c7");
        let spec = filter_for_anchors(
            &root(),
            vec![PropertyProjection::named(ObjectKind::VirtualMachine, ["name"])],
            &[cluster],
        );
        // The flat general-purpose graph has every rule embedded at top level.
        assert!(spec.anchors[0].select_set.len() > 1);
    }

    #[test]
    fn test_collection_filter_attaches_no_traversal() {
        let objs = vec![
            ManagedObjectRef::new(ObjectKind::VirtualMachine, "vm-1"),
            ManagedObjectRef::new(ObjectKind::VirtualMachine, "vm-2"),
        ];
        let spec = collection_filter(
            PropertyProjection::named(ObjectKind::VirtualMachine, ["runtime.host"]),
            &objs,
        );
        assert_eq!(spec.projections.len(), 1);
        assert_eq!(spec.anchors.len(), 2);
        assert!(spec.anchors.iter().all(|a| a.select_set.is_empty()));
        assert!(spec.anchors.iter().all(|a| !a.skip_root));
    }
}
