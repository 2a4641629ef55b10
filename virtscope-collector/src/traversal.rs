//! Traversal-graph builders for the fixed inventory hierarchy.
//!
//! The inventory is walked folder → datacenter → compute-resource → host →
//! VM, with folder-in-folder and resource-pool-in-resource-pool recursion.
//! Two graph forms exist:
//!
//! - [`root_traversal`]: a single nested composite, valid only when the walk
//!   starts at the distinguished root folder;
//! - [`full_traversal`]: a flat ordered rule list with every rule addressable
//!   by name, required when the anchor is an arbitrary mid-tree object so
//!   selection sets can reference siblings instead of embedding them.
//!
//! A selection name with no matching rule is a caller programming error; it
//! is not checked here and fails on the remote side.

use crate::spec::{Selection, TraversalRule};
use crate::types::ObjectKind;

/// Build the root-anchored traversal composite.
///
/// One `visitFolders` rule whose selection set embeds the sibling rules and
/// references itself for folder recursion. Resource-pool recursion is wired
/// through `rpToRp`/`rpToVm` name references resolved against the embedded
/// rules. Every rule is non-skipping.
pub fn root_traversal() -> TraversalRule {
    let visit_folders_ref = Selection::reference("visitFolders");
    let rp_recursion = || vec![Selection::reference("rpToRp"), Selection::reference("rpToVm")];

    // Datacenter fan-out back into folder recursion
    let dc_to_hf = TraversalRule::new("dcToHf", ObjectKind::Datacenter, "hostFolder")
        .with_select_set(vec![visit_folders_ref.clone()]);
    let dc_to_vmf = TraversalRule::new("dcToVmf", ObjectKind::Datacenter, "vmFolder")
        .with_select_set(vec![visit_folders_ref.clone()]);
    let dc_to_nwf = TraversalRule::new("dcToNwf", ObjectKind::Datacenter, "networkFolder")
        .with_select_set(vec![visit_folders_ref.clone()]);

    let h_to_vm = TraversalRule::new("hToVm", ObjectKind::HostSystem, "vm")
        .with_select_set(vec![visit_folders_ref.clone()]);

    // Compute-resource branches; host and datastore edges terminate the walk
    let cr_to_h = TraversalRule::new("crToH", ObjectKind::ComputeResource, "host");
    let cr_to_ds = TraversalRule::new("crToDs", ObjectKind::ComputeResource, "datastore");
    let cr_to_rp = TraversalRule::new("crToRp", ObjectKind::ComputeResource, "resourcePool")
        .with_select_set(rp_recursion());

    // Resource-pool self-recursion
    let rp_to_rp = TraversalRule::new("rpToRp", ObjectKind::ResourcePool, "resourcePool")
        .with_select_set(rp_recursion());
    let rp_to_vm = TraversalRule::new("rpToVm", ObjectKind::ResourcePool, "vm")
        .with_select_set(rp_recursion());

    TraversalRule::new("visitFolders", ObjectKind::Folder, "childEntity").with_select_set(vec![
        visit_folders_ref,
        Selection::Traversal(dc_to_hf),
        Selection::Traversal(dc_to_vmf),
        Selection::Traversal(dc_to_nwf),
        Selection::Traversal(cr_to_ds),
        Selection::Traversal(cr_to_h),
        Selection::Traversal(cr_to_rp),
        Selection::Traversal(rp_to_rp),
        Selection::Traversal(h_to_vm),
        Selection::Traversal(rp_to_vm),
    ])
}

/// Build the object-anchored traversal graph as a flat ordered rule list.
///
/// Compared to the root form this adds the datacenter→datastore and
/// datastore→vm edges and drops datacenter→networkFolder; every rule sits at
/// top level so any selection set can reference it by name.
pub fn full_traversal() -> Vec<TraversalRule> {
    let visit_folders_ref = || vec![Selection::reference("visitFolders")];
    let rp_recursion = vec![Selection::reference("rpToRp"), Selection::reference("rpToVm")];

    let rp_to_rp = TraversalRule::new("rpToRp", ObjectKind::ResourcePool, "resourcePool")
        .with_select_set(rp_recursion.clone());
    let rp_to_vm = TraversalRule::new("rpToVm", ObjectKind::ResourcePool, "vm");

    let cr_to_rp = TraversalRule::new("crToRp", ObjectKind::ComputeResource, "resourcePool")
        .with_select_set(rp_recursion);
    let cr_to_h = TraversalRule::new("crToH", ObjectKind::ComputeResource, "host");

    let dc_to_hf = TraversalRule::new("dcToHf", ObjectKind::Datacenter, "hostFolder")
        .with_select_set(visit_folders_ref());
    let dc_to_vmf = TraversalRule::new("dcToVmf", ObjectKind::Datacenter, "vmFolder")
        .with_select_set(visit_folders_ref());
    let dc_to_ds = TraversalRule::new("dcToDs", ObjectKind::Datacenter, "datastore")
        .with_select_set(visit_folders_ref());

    let h_to_vm = TraversalRule::new("hToVm", ObjectKind::HostSystem, "vm")
        .with_select_set(visit_folders_ref());
    let ds_to_vm = TraversalRule::new("dsToVm", ObjectKind::Datastore, "vm")
        .with_select_set(visit_folders_ref());

    let visit_folders = TraversalRule::new("visitFolders", ObjectKind::Folder, "childEntity")
        .with_select_set(vec![
            Selection::reference("visitFolders"),
            Selection::reference("dcToHf"),
            Selection::reference("dcToVmf"),
            Selection::reference("crToH"),
            Selection::reference("crToRp"),
            Selection::reference("dcToDs"),
            Selection::reference("hToVm"),
            Selection::reference("dsToVm"),
            Selection::reference("rpToVm"),
        ]);

    vec![
        visit_folders,
        dc_to_vmf,
        dc_to_ds,
        dc_to_hf,
        cr_to_h,
        cr_to_rp,
        rp_to_rp,
        h_to_vm,
        ds_to_vm,
        rp_to_vm,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn collect_defined(rule: &TraversalRule, names: &mut Vec<String>) {
        names.push(rule.name.clone());
        for sel in &rule.select_set {
            if let Selection::Traversal(nested) = sel {
                collect_defined(nested, names);
            }
        }
    }

    fn collect_referenced(rule: &TraversalRule, names: &mut HashSet<String>) {
        for sel in &rule.select_set {
            match sel {
                Selection::Reference(r) => {
                    names.insert(r.name.clone());
                }
                Selection::Traversal(nested) => collect_referenced(nested, names),
            }
        }
    }

    #[test]
    fn test_root_traversal_references_all_resolve() {
        let graph = root_traversal();
        let mut defined = Vec::new();
        collect_defined(&graph, &mut defined);
        let mut referenced = HashSet::new();
        collect_referenced(&graph, &mut referenced);

        for name in &referenced {
            assert_eq!(
                defined.iter().filter(|d| *d == name).count(),
                1,
                "selection reference {:?} must resolve to exactly one rule",
                name
            );
        }
    }

    #[test]
    fn test_root_traversal_names_unique() {
        let graph = root_traversal();
        let mut defined = Vec::new();
        collect_defined(&graph, &mut defined);
        let unique: HashSet<_> = defined.iter().collect();
        assert_eq!(unique.len(), defined.len(), "duplicate rule name in {:?}", defined);
    }

    #[test]
    fn test_full_traversal_names_unique() {
        let rules = full_traversal();
        let names: Vec<_> = rules.iter().map(|r| r.name.clone()).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len(), "duplicate rule name in {:?}", names);
    }

    #[test]
    fn test_full_traversal_references_all_resolve() {
        let rules = full_traversal();
        let defined: HashSet<_> = rules.iter().map(|r| r.name.clone()).collect();
        let mut referenced = HashSet::new();
        for rule in &rules {
            collect_referenced(rule, &mut referenced);
        }
        for name in &referenced {
            assert!(defined.contains(name), "dangling selection reference {:?}", name);
        }
    }

    #[test]
    fn test_no_rule_skips_its_root() {
        let mut all = full_traversal();
        all.push(root_traversal());
        fn assert_non_skipping(rule: &TraversalRule) {
            assert!(!rule.skip_root, "rule {:?} must not skip its root", rule.name);
            for sel in &rule.select_set {
                if let Selection::Traversal(nested) = sel {
                    assert_non_skipping(nested);
                }
            }
        }
        for rule in &all {
            assert_non_skipping(rule);
        }
    }

    #[test]
    fn test_form_edge_asymmetry() {
        // Only the root form walks the network folder; only the flat form
        // walks datacenter datastores and datastore VMs.
        let root = root_traversal();
        let mut root_names = Vec::new();
        collect_defined(&root, &mut root_names);
        assert!(root_names.contains(&"dcToNwf".to_string()));
        assert!(!root_names.contains(&"dsToVm".to_string()));

        let flat_names: Vec<_> = full_traversal().iter().map(|r| r.name.clone()).collect();
        assert!(flat_names.contains(&"dcToDs".to_string()));
        assert!(flat_names.contains(&"dsToVm".to_string()));
        assert!(!flat_names.contains(&"dcToNwf".to_string()));
    }
}
