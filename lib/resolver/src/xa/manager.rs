use crate::xa::{ResourceManagerId, RmInfo, XaError, XaErrorCode, XaResult};
use std::any::Any;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError, Weak};
use tracing::{debug, warn};
use triad_common::{ResolverFactory, ResolverFactoryRef};

/// A registry as stored in the [TransactionManagerContext], with its branch state type erased.
trait RegisteredResourceManager: Send + Sync {
    fn id(&self) -> ResourceManagerId;

    fn open_branches(&self) -> usize;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<S: Send + Sync + 'static> RegisteredResourceManager for RmInfo<S> {
    fn id(&self) -> ResourceManagerId {
        RmInfo::id(self)
    }

    fn open_branches(&self) -> usize {
        self.len()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

struct Registration {
    factory: Weak<dyn ResolverFactory>,
    factory_name: String,
    resource_manager: Arc<dyn RegisteredResourceManager>,
}

impl Registration {
    fn is_for(&self, factory: &ResolverFactoryRef) -> bool {
        std::ptr::addr_eq(self.factory.as_ptr(), Arc::as_ptr(factory))
    }

    fn is_alive(&self) -> bool {
        self.factory.strong_count() > 0
    }
}

/// Maps resolver factories to the registry of their open transaction branches.
///
/// The context only holds weak references to the factories. Registrations of dropped factories
/// are purged on every lookup and by [TransactionManagerContext::purge].
#[derive(Default)]
pub struct TransactionManagerContext {
    registrations: Mutex<Vec<Registration>>,
}

impl TransactionManagerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The context shared by the whole process.
    pub fn global() -> &'static TransactionManagerContext {
        static GLOBAL: LazyLock<TransactionManagerContext> =
            LazyLock::new(TransactionManagerContext::new);
        &GLOBAL
    }

    /// Returns the registry of `factory`, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns [XaErrorCode::RmErr] if the factory has already been registered with a different
    /// branch state type.
    pub fn resource_manager<S: Send + Sync + 'static>(
        &self,
        factory: &ResolverFactoryRef,
    ) -> XaResult<Arc<RmInfo<S>>> {
        let mut registrations = self.lock();
        registrations.retain(Registration::is_alive);

        if let Some(registration) = registrations.iter().find(|r| r.is_for(factory)) {
            return Arc::clone(&registration.resource_manager)
                .into_any()
                .downcast::<RmInfo<S>>()
                .map_err(|_| {
                    XaError::new(
                        XaErrorCode::RmErr,
                        format!(
                            "Factory {} is registered with a different transaction state",
                            factory.name()
                        ),
                    )
                });
        }

        let resource_manager = Arc::new(RmInfo::<S>::new());
        debug!(
            factory = factory.name(),
            resource_manager = %resource_manager.id(),
            "Registered resource manager"
        );
        let registered: Arc<dyn RegisteredResourceManager> = resource_manager.clone();
        registrations.push(Registration {
            factory: Arc::downgrade(factory),
            factory_name: factory.name().to_owned(),
            resource_manager: registered,
        });
        Ok(resource_manager)
    }

    /// Removes the registrations of all dropped factories. Returns the number of removed
    /// registrations.
    pub fn purge(&self) -> usize {
        let mut registrations = self.lock();
        let before = registrations.len();
        registrations.retain(Registration::is_alive);
        before - registrations.len()
    }

    /// The number of registered factories, including dropped factories that have not been purged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Removes all registrations. Returns the number of branches that were still open and have
    /// been abandoned.
    ///
    /// Resources created before the shutdown keep working on their registry, but new resources
    /// for the same factory get a fresh registry.
    pub fn shutdown(&self) -> usize {
        let registrations = std::mem::take(&mut *self.lock());
        let mut abandoned = 0;
        for registration in registrations {
            let open = registration.resource_manager.open_branches();
            if open > 0 {
                warn!(
                    factory = %registration.factory_name,
                    resource_manager = %registration.resource_manager.id(),
                    open,
                    "Shutting down with open transaction branches"
                );
            }
            abandoned += open;
        }
        debug!(abandoned, "Transaction manager context shut down");
        abandoned
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Registration>> {
        self.registrations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for TransactionManagerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionManagerContext")
            .field("registrations", &self.len())
            .finish()
    }
}
