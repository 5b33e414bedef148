use crate::test_utils::{create_resource, factory, xid};
use std::sync::Arc;
use std::thread;
use triad_resolver::xa::{
    ReadOnlyHooks, TransactionManagerContext, TransactionResource, XaErrorCode, XaFlags,
    XaResource, XaResourceConfig, XaResult, XidKey,
};

#[test]
fn test_is_same_rm_follows_factory_identity() -> XaResult<()> {
    let context = TransactionManagerContext::new();
    let factory_a = factory("a");
    let factory_b = factory("b");

    let first = create_resource(&context, &factory_a)?;
    let second = create_resource(&context, &factory_a)?;
    let other = create_resource(&context, &factory_b)?;

    assert!(first.is_same_rm(&first));
    assert!(first.is_same_rm(&second));
    assert!(second.is_same_rm(&first));
    assert!(!first.is_same_rm(&other));
    assert!(!other.is_same_rm(&first));
    Ok(())
}

#[test]
fn test_factories_with_equal_names_are_distinct() -> XaResult<()> {
    let context = TransactionManagerContext::new();

    let first = create_resource(&context, &factory("store"))?;
    let second = create_resource(&context, &factory("store"))?;

    assert!(!first.is_same_rm(&second));
    Ok(())
}

#[test]
fn test_branch_is_shared_between_resources() -> XaResult<()> {
    let context = TransactionManagerContext::new();
    let factory = factory("shared");
    let first = create_resource(&context, &factory)?;
    let second = create_resource(&context, &factory)?;

    first.start(&xid(1), XaFlags::NOFLAGS)?;
    first.end(&xid(1), XaFlags::SUCCESS)?;
    second.prepare(&xid(1))?;
    first.close();

    assert_eq!(second.recover(XaFlags::STARTRSCAN)?, vec![xid(1)]);
    second.commit(&xid(1), false)?;
    assert!(second.resource_manager().is_empty());
    Ok(())
}

#[test]
fn test_state_type_must_match_registration() -> XaResult<()> {
    let context = TransactionManagerContext::new();
    let factory = factory("mixed");
    create_resource(&context, &factory)?;

    let error = XaResource::new(&context, &factory, ReadOnlyHooks)
        .err()
        .unwrap();

    assert_eq!(error.code(), XaErrorCode::RmErr);
    Ok(())
}

#[test]
fn test_read_only_hooks() -> XaResult<()> {
    let context = TransactionManagerContext::new();
    let resource = XaResource::with_config(
        &context,
        &factory("read-only"),
        ReadOnlyHooks,
        &XaResourceConfig {
            transaction_timeout_secs: 30,
        },
    )?;

    resource.start(&xid(1), XaFlags::NOFLAGS)?;
    resource.end(&xid(1), XaFlags::SUCCESS)?;
    resource.commit(&xid(1), true)?;

    assert!(resource.resource_manager().is_empty());
    assert_eq!(resource.transaction_timeout(), 30);
    Ok(())
}

#[test]
fn test_shutdown_reports_abandoned_branches() -> XaResult<()> {
    let context = TransactionManagerContext::new();
    let factory_a = factory("a");
    let factory_b = factory("b");
    let first = create_resource(&context, &factory_a)?;
    let second = create_resource(&context, &factory_b)?;
    first.start(&xid(1), XaFlags::NOFLAGS)?;
    first.start(&xid(2), XaFlags::NOFLAGS)?;
    second.start(&xid(1), XaFlags::NOFLAGS)?;
    assert_eq!(context.len(), 2);

    assert_eq!(context.shutdown(), 3);

    assert!(context.is_empty());
    let fresh = create_resource(&context, &factory_a)?;
    assert!(!fresh.is_same_rm(&first));
    assert!(fresh.resource_manager().is_empty());
    Ok(())
}

#[test]
fn test_dropped_factory_is_purged() -> XaResult<()> {
    let context = TransactionManagerContext::new();
    let dropped = factory("dropped");
    create_resource(&context, &dropped)?;
    drop(dropped);

    let kept = factory("kept");
    create_resource(&context, &kept)?;

    assert_eq!(context.len(), 1);
    Ok(())
}

#[test]
fn test_concurrent_branches() -> XaResult<()> {
    let context = TransactionManagerContext::new();
    let resource = Arc::new(create_resource(&context, &factory("concurrent"))?);

    let handles = (0..8u8)
        .map(|worker| {
            let resource = Arc::clone(&resource);
            thread::spawn(move || -> XaResult<()> {
                for branch in 0..16u8 {
                    let xid = XidKey::new(1, &[worker], &[branch])?;
                    resource.start(&xid, XaFlags::NOFLAGS)?;
                    resource.end(&xid, XaFlags::SUCCESS)?;
                    resource.prepare(&xid)?;
                    resource.commit(&xid, false)?;
                }
                Ok(())
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        handle.join().unwrap()?;
    }
    assert!(resource.resource_manager().is_empty());
    Ok(())
}
