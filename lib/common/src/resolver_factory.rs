use std::fmt::Debug;
use std::sync::Arc;

/// A factory for the resolvers of one backend.
///
/// The transaction layer only uses a factory as an identity: every transaction resource created
/// for the same factory instance shares one registry of open branches. The registry only holds
/// weak references, so dropping the last [ResolverFactoryRef] releases the registry as well.
pub trait ResolverFactory: Debug + Send + Sync + 'static {
    /// A human-readable name of the backend. Only used for logging.
    fn name(&self) -> &str;
}

pub type ResolverFactoryRef = Arc<dyn ResolverFactory>;
