//! Integration tests for the collector client over the mock transport.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

use virtscope_collector::{
    DynamicProperty, FilterSpec, InventoryClient, ManagedObjectRef, MockTransport, ObjectContent,
    ObjectKind, ObjectUpdate, PropertyChange, PropertyChangeOp, PropertyProjection, RetrievePage,
    UpdateKind, UpdateMonitor, UpdateSet,
};

fn vm_content(id: &str, name: &str) -> ObjectContent {
    ObjectContent {
        obj: ManagedObjectRef::new(ObjectKind::VirtualMachine, id),
        props: vec![DynamicProperty::new("name", json!(name))],
    }
}

/// Full query path: compose a traversal filter, retrieve across pages, read
/// values back out of the results.
#[tokio::test]
async fn test_query_pipeline_end_to_end() {
    virtscope_common::init_test_logging();

    let transport = Arc::new(MockTransport::new().with_pages(vec![
        RetrievePage {
            objects: vec![vm_content("vm-1", "web-01"), vm_content("vm-2", "web-02")],
            token: Some("page-2".to_string()),
        },
        RetrievePage {
            objects: vec![vm_content("vm-3", "db-01")],
            token: None,
        },
    ]));
    let client = InventoryClient::new(transport.clone());

    let spec = client
        .traversal_filter(
            vec![PropertyProjection::named(ObjectKind::VirtualMachine, ["name"])],
            &[],
        )
        .await
        .unwrap();
    let results = client.retrieve_all(&[spec]).await.unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[2].property("name"), Some(&json!("db-01")));
    assert_eq!(transport.retrieve_calls(), 1);
    assert_eq!(transport.continue_calls(), 1);

    // Page size from default settings reached the transport.
    assert_eq!(transport.last_retrieve_options().unwrap().max_objects, 500);
}

/// Standing-filter path: private collector, filter registration, baseline
/// plus delta through the monitor, teardown.
#[tokio::test]
async fn test_standing_filter_lifecycle() {
    virtscope_common::init_test_logging();

    let transport = Arc::new(MockTransport::new());
    let client = InventoryClient::new(transport.clone());

    let collector = client.create_property_collector().await.unwrap();
    let spec = FilterSpec::new(
        vec![PropertyProjection::named(
            ObjectKind::VirtualMachine,
            ["runtime.powerState"],
        )],
        vec![],
    );
    client.create_filter(&spec, Some(&collector)).await.unwrap();
    let (_, partial_updates) = transport.last_filter().unwrap();
    assert!(!partial_updates);

    transport.push_update_set(UpdateSet {
        version: "1".to_string(),
        updates: vec![ObjectUpdate {
            kind: UpdateKind::Enter,
            obj: ManagedObjectRef::new(ObjectKind::VirtualMachine, "vm-1"),
            changes: vec![PropertyChange {
                name: "runtime.powerState".to_string(),
                op: PropertyChangeOp::Assign,
                value: Some(json!("poweredOff")),
            }],
        }],
    });
    transport.push_update_set(UpdateSet {
        version: "2".to_string(),
        updates: vec![ObjectUpdate {
            kind: UpdateKind::Modify,
            obj: ManagedObjectRef::new(ObjectKind::VirtualMachine, "vm-1"),
            changes: vec![PropertyChange {
                name: "runtime.powerState".to_string(),
                op: PropertyChangeOp::Assign,
                value: Some(json!("poweredOn")),
            }],
        }],
    });

    let monitor = UpdateMonitor::new(client.clone(), collector.clone());
    let handle = monitor.handle();
    let (tx, mut rx) = mpsc::channel(4);
    let task = tokio::spawn(monitor.run(tx));

    let baseline = rx.recv().await.unwrap();
    assert_eq!(baseline.version, "1");
    assert_eq!(baseline.updates[0].kind, UpdateKind::Enter);

    let delta = rx.recv().await.unwrap();
    assert_eq!(delta.version, "2");
    assert_eq!(
        delta.updates[0].changes[0].value,
        Some(json!("poweredOn"))
    );

    handle.stop().await.unwrap();
    task.await.unwrap().unwrap();

    client
        .destroy_property_collector(Some(&collector))
        .await
        .unwrap();
    assert_eq!(transport.destroyed(), vec![collector]);
}

/// Lookup helpers resolve through the service content handles.
#[tokio::test]
async fn test_lookups() {
    let transport = Arc::new(MockTransport::new());
    let cluster = ManagedObjectRef::new(ObjectKind::ComputeResource, "domain-c7");
    transport.register_path("dc-1/host/cluster-a", cluster.clone());
    let dvs = ManagedObjectRef::new(ObjectKind::DistributedVirtualSwitch, "dvs-14");
    transport.register_switch("50 2e 6b 9f", dvs.clone());

    let client = InventoryClient::new(transport);

    assert_eq!(client.root_folder_id().await.unwrap(), "group-d1");
    assert_eq!(
        client
            .find_by_inventory_path("dc-1/host/cluster-a")
            .await
            .unwrap(),
        Some(cluster)
    );
    assert_eq!(
        client.find_by_inventory_path("dc-1/missing").await.unwrap(),
        None
    );
    assert_eq!(client.dvs_by_uuid("50 2e 6b 9f").await.unwrap(), Some(dvs));
    assert_eq!(client.dvs_by_uuid("00 00 00 00").await.unwrap(), None);
}
