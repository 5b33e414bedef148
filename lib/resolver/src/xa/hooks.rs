use crate::xa::{HookError, PrepareVote, TxInfo, XaFlags, XidKey};

/// The backend-specific part of an [XaResource](crate::xa::XaResource).
///
/// The hooks are only invoked after the state machine has validated the request. A hook is never
/// invoked while the registry is locked, so hooks may block.
pub trait XaResourceHooks: Send + Sync {
    /// The state that the backend keeps per transaction branch.
    type State: Send + Sync + 'static;

    /// Creates the state of a new branch.
    fn new_transaction(&self, xid: &XidKey) -> Result<Self::State, HookError>;

    /// Associates the caller with the branch. `is_new` is `true` if the branch has just been
    /// created.
    fn do_start(
        &self,
        _transaction: &TxInfo<Self::State>,
        _flags: XaFlags,
        _is_new: bool,
    ) -> Result<(), HookError> {
        Ok(())
    }

    /// Ends the association of the caller with the branch.
    fn do_end(&self, _transaction: &TxInfo<Self::State>, _flags: XaFlags) -> Result<(), HookError> {
        Ok(())
    }

    /// Prepares the branch for committing.
    fn do_prepare(&self, transaction: &TxInfo<Self::State>) -> Result<PrepareVote, HookError>;

    fn do_commit(&self, transaction: &TxInfo<Self::State>) -> Result<(), HookError>;

    fn do_rollback(&self, transaction: &TxInfo<Self::State>) -> Result<(), HookError>;

    /// Discards the knowledge about a heuristically completed branch.
    fn do_forget(&self, _transaction: &TxInfo<Self::State>) -> Result<(), HookError> {
        Ok(())
    }
}

/// Hooks for resolvers that never write. Every branch votes read-only in the prepare phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReadOnlyHooks;

impl XaResourceHooks for ReadOnlyHooks {
    type State = ();

    fn new_transaction(&self, _xid: &XidKey) -> Result<Self::State, HookError> {
        Ok(())
    }

    fn do_prepare(&self, _transaction: &TxInfo<Self::State>) -> Result<PrepareVote, HookError> {
        Ok(PrepareVote::ReadOnly)
    }

    fn do_commit(&self, _transaction: &TxInfo<Self::State>) -> Result<(), HookError> {
        Ok(())
    }

    fn do_rollback(&self, _transaction: &TxInfo<Self::State>) -> Result<(), HookError> {
        Ok(())
    }
}
