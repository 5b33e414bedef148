use crate::xa::{
    HookError, PrepareVote, ResourceManagerId, RmInfo, TransactionManagerContext, TxInfo,
    XaError, XaErrorCode, XaFlags, XaResourceConfig, XaResourceHooks, XaResult, Xid, XidKey,
};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::{debug, error, warn};
use triad_common::ResolverFactoryRef;

/// The operations that a transaction coordinator invokes on a participant.
pub trait TransactionResource: Send + Sync {
    /// Starts work on behalf of the branch `xid`.
    ///
    /// [XaFlags::NOFLAGS] creates a new branch, [XaFlags::JOIN] and [XaFlags::RESUME] associate the
    /// caller with an existing branch.
    fn start(&self, xid: &dyn Xid, flags: XaFlags) -> XaResult<()>;

    /// Ends work on behalf of the branch `xid`.
    fn end(&self, xid: &dyn Xid, flags: XaFlags) -> XaResult<()>;

    /// Asks the branch to vote on committing.
    fn prepare(&self, xid: &dyn Xid) -> XaResult<PrepareVote>;

    /// Commits the branch. With `one_phase`, the branch is prepared first.
    fn commit(&self, xid: &dyn Xid, one_phase: bool) -> XaResult<()>;

    fn rollback(&self, xid: &dyn Xid) -> XaResult<()>;

    /// Discards a heuristically completed branch.
    fn forget(&self, xid: &dyn Xid) -> XaResult<()>;

    /// Returns the prepared branches of this resource manager.
    fn recover(&self, flags: XaFlags) -> XaResult<Vec<XidKey>>;

    fn resource_manager_id(&self) -> ResourceManagerId;

    /// Returns `true` if both resources belong to the same resource manager.
    fn is_same_rm(&self, other: &dyn TransactionResource) -> bool {
        self.resource_manager_id() == other.resource_manager_id()
    }

    /// The transaction timeout in seconds.
    fn transaction_timeout(&self) -> u32;

    fn set_transaction_timeout(&self, seconds: u32);
}

/// A [TransactionResource] that drives a backend through the XA state machine.
///
/// All resources created for the same resolver factory share one [RmInfo]. Thus, a branch started
/// through one resource can be completed through another.
pub struct XaResource<H: XaResourceHooks> {
    hooks: H,
    resource_manager: Arc<RmInfo<H::State>>,
    transaction_timeout: AtomicU32,
}

impl<H: XaResourceHooks> XaResource<H> {
    /// Creates a new [XaResource] for `factory` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the factory is registered with a different branch state type.
    pub fn new(
        context: &TransactionManagerContext,
        factory: &ResolverFactoryRef,
        hooks: H,
    ) -> XaResult<Self> {
        Self::with_config(context, factory, hooks, &XaResourceConfig::default())
    }

    /// Creates a new [XaResource] for `factory`.
    pub fn with_config(
        context: &TransactionManagerContext,
        factory: &ResolverFactoryRef,
        hooks: H,
        config: &XaResourceConfig,
    ) -> XaResult<Self> {
        let resource_manager = context.resource_manager::<H::State>(factory)?;
        Ok(Self {
            hooks,
            resource_manager,
            transaction_timeout: AtomicU32::new(config.transaction_timeout_secs),
        })
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn resource_manager(&self) -> &Arc<RmInfo<H::State>> {
        &self.resource_manager
    }

    /// Releases this resource. Open branches stay in the shared registry and can be completed
    /// through other resources of the same factory.
    pub fn close(self) {
        debug!(
            resource_manager = %self.resource_manager.id(),
            open = self.resource_manager.len(),
            "Closed transaction resource"
        );
    }

    fn existing(&self, xid: &XidKey, operation: &str) -> XaResult<Arc<TxInfo<H::State>>> {
        self.resource_manager.get(xid).ok_or_else(|| {
            error!(%xid, operation, "Unknown transaction branch");
            XaError::new(
                XaErrorCode::Nota,
                format!("Unknown transaction branch {xid}"),
            )
        })
    }

    fn create_branch(&self, xid: XidKey, flags: XaFlags) -> XaResult<()> {
        if self.resource_manager.contains(&xid) {
            error!(%xid, "Transaction branch has already been started");
            return Err(duplicate(&xid));
        }

        let state = self.hooks.new_transaction(&xid).map_err(|cause| {
            warn!(%xid, error = %cause, "Failed to create transaction branch");
            XaError::with_source(
                XaErrorCode::RmFail,
                format!("Failed to create transaction branch {xid}"),
                cause,
            )
        })?;
        let transaction = Arc::new(TxInfo::new(xid, state));
        if !self.resource_manager.insert_new(Arc::clone(&transaction)) {
            error!(xid = %transaction.xid(), "Transaction branch has been started concurrently");
            return Err(duplicate(transaction.xid()));
        }

        self.run_start(&transaction, flags, true)
    }

    fn run_start(
        &self,
        transaction: &TxInfo<H::State>,
        flags: XaFlags,
        is_new: bool,
    ) -> XaResult<()> {
        self.hooks
            .do_start(transaction, flags, is_new)
            .map_err(|cause| {
                self.resource_manager.remove(transaction.xid());
                warn!(xid = %transaction.xid(), error = %cause, "Start hook failed, removed branch");
                XaError::with_source(
                    XaErrorCode::RmFail,
                    format!("Failed to start transaction branch {}", transaction.xid()),
                    cause,
                )
            })
    }

    /// Rolls back a branch that cannot be committed anymore and removes it.
    fn force_rollback(&self, transaction: &TxInfo<H::State>) {
        if let Err(cause) = self.hooks.do_rollback(transaction) {
            error!(
                severity = "fatal",
                xid = %transaction.xid(),
                error = %cause,
                "Forced rollback failed, data may be inconsistent"
            );
        }
        self.resource_manager.remove(transaction.xid());
    }

    fn rolled_back(&self, transaction: &TxInfo<H::State>, reason: &str) -> XaError {
        self.force_rollback(transaction);
        XaError::new(
            XaErrorCode::RbRollback,
            format!("Transaction branch {} rolled back: {reason}", transaction.xid()),
        )
    }

    fn rolled_back_by(&self, transaction: &TxInfo<H::State>, cause: HookError) -> XaError {
        warn!(xid = %transaction.xid(), error = %cause, "Prepare failed, rolling back");
        self.force_rollback(transaction);
        XaError::with_source(
            XaErrorCode::RbRollback,
            format!("Transaction branch {} rolled back after failed prepare", transaction.xid()),
            cause,
        )
    }

    /// Applies the outcome of a commit or rollback hook to the registry.
    fn complete(
        &self,
        transaction: &TxInfo<H::State>,
        outcome: Result<(), HookError>,
        operation: &str,
    ) -> XaResult<()> {
        let xid = transaction.xid();
        match outcome {
            Ok(()) => {
                self.resource_manager.remove(xid);
                debug!(%xid, operation, "Completed transaction branch");
                Ok(())
            }
            Err(HookError::Xa(code)) if code.is_heuristic() => {
                warn!(%xid, operation, %code, "Heuristic outcome, retaining branch until forgotten");
                Err(XaError::new(
                    code,
                    format!("Heuristic outcome for transaction branch {xid}"),
                ))
            }
            Err(HookError::Xa(code)) => {
                self.resource_manager.remove(xid);
                error!(
                    severity = "fatal",
                    %xid,
                    operation,
                    %code,
                    "Hook reported failure, removed branch"
                );
                Err(XaError::new(
                    code,
                    format!("Failed to {operation} transaction branch {xid}"),
                ))
            }
            Err(HookError::Failure(cause)) => {
                error!(
                    severity = "fatal",
                    %xid,
                    operation,
                    error = %cause,
                    "Unexpected failure, data may be inconsistent"
                );
                Err(XaError::with_source(
                    XaErrorCode::RmErr,
                    format!("Unexpected failure during {operation} of transaction branch {xid}"),
                    cause,
                ))
            }
        }
    }
}

impl<H: XaResourceHooks> TransactionResource for XaResource<H> {
    fn start(&self, xid: &dyn Xid, flags: XaFlags) -> XaResult<()> {
        let xid = XidKey::from_xid(xid)?;
        debug!(%xid, %flags, "Start");

        match flags {
            XaFlags::NOFLAGS => self.create_branch(xid, flags),
            XaFlags::JOIN | XaFlags::RESUME => {
                let transaction = self.existing(&xid, "start")?;
                self.run_start(&transaction, flags, false)
            }
            _ => {
                if let Some(transaction) = self.resource_manager.get(&xid) {
                    transaction.mark_rollback_only();
                }
                error!(%xid, %flags, "Invalid flags for start");
                Err(XaError::new(
                    XaErrorCode::Inval,
                    format!("Invalid flags {flags} for start of {xid}"),
                ))
            }
        }
    }

    fn end(&self, xid: &dyn Xid, flags: XaFlags) -> XaResult<()> {
        let xid = XidKey::from_xid(xid)?;
        debug!(%xid, %flags, "End");

        let transaction = self.existing(&xid, "end")?;
        if !matches!(flags, XaFlags::SUCCESS | XaFlags::FAIL | XaFlags::SUSPEND) {
            error!(%xid, %flags, "Invalid flags for end");
            return Err(XaError::new(
                XaErrorCode::Inval,
                format!("Invalid flags {flags} for end of {xid}"),
            ));
        }
        if flags == XaFlags::FAIL {
            transaction.mark_rollback_only();
        }

        self.hooks.do_end(&transaction, flags).map_err(|cause| {
            self.resource_manager.remove(&xid);
            warn!(%xid, error = %cause, "End hook failed, removed branch");
            XaError::with_source(
                XaErrorCode::RmFail,
                format!("Failed to end transaction branch {xid}"),
                cause,
            )
        })
    }

    fn prepare(&self, xid: &dyn Xid) -> XaResult<PrepareVote> {
        let xid = XidKey::from_xid(xid)?;
        debug!(%xid, "Prepare");

        let transaction = self.existing(&xid, "prepare")?;
        if transaction.is_rollback_only() {
            return Err(self.rolled_back(&transaction, "marked rollback-only"));
        }

        match self.hooks.do_prepare(&transaction) {
            Ok(PrepareVote::ReadOnly) => {
                self.resource_manager.remove(&xid);
                debug!(%xid, "Read-only branch completed in prepare");
                Ok(PrepareVote::ReadOnly)
            }
            Ok(PrepareVote::Ok) => {
                transaction.mark_prepared();
                Ok(PrepareVote::Ok)
            }
            Err(cause) => Err(self.rolled_back_by(&transaction, cause)),
        }
    }

    fn commit(&self, xid: &dyn Xid, one_phase: bool) -> XaResult<()> {
        let xid = XidKey::from_xid(xid)?;
        debug!(%xid, one_phase, "Commit");

        let transaction = self.existing(&xid, "commit")?;
        if transaction.is_rollback_only() {
            return Err(self.rolled_back(&transaction, "marked rollback-only"));
        }

        if one_phase {
            match self.hooks.do_prepare(&transaction) {
                Ok(PrepareVote::ReadOnly) => {
                    self.resource_manager.remove(&xid);
                    debug!(%xid, "Read-only branch completed in one-phase commit");
                    return Ok(());
                }
                Ok(PrepareVote::Ok) => transaction.mark_prepared(),
                Err(cause) => return Err(self.rolled_back_by(&transaction, cause)),
            }
        }

        let outcome = self.hooks.do_commit(&transaction);
        self.complete(&transaction, outcome, "commit")
    }

    fn rollback(&self, xid: &dyn Xid) -> XaResult<()> {
        let xid = XidKey::from_xid(xid)?;
        debug!(%xid, "Rollback");

        let transaction = self.existing(&xid, "rollback")?;
        let outcome = self.hooks.do_rollback(&transaction);
        self.complete(&transaction, outcome, "rollback")
    }

    fn forget(&self, xid: &dyn Xid) -> XaResult<()> {
        let xid = XidKey::from_xid(xid)?;
        debug!(%xid, "Forget");

        let transaction = self.existing(&xid, "forget")?;
        match self.hooks.do_forget(&transaction) {
            Ok(()) => {
                self.resource_manager.remove(&xid);
                Ok(())
            }
            Err(HookError::Xa(XaErrorCode::RmErr)) => {
                warn!(%xid, "Forget failed, retaining branch");
                Err(XaError::new(
                    XaErrorCode::RmErr,
                    format!("Failed to forget transaction branch {xid}"),
                ))
            }
            Err(HookError::Xa(code)) => {
                self.resource_manager.remove(&xid);
                Err(XaError::new(
                    code,
                    format!("Failed to forget transaction branch {xid}"),
                ))
            }
            Err(HookError::Failure(cause)) => {
                error!(%xid, error = %cause, "Forget failed unexpectedly, retaining branch");
                Err(XaError::with_source(
                    XaErrorCode::RmErr,
                    format!("Failed to forget transaction branch {xid}"),
                    cause,
                ))
            }
        }
    }

    fn recover(&self, flags: XaFlags) -> XaResult<Vec<XidKey>> {
        debug!(%flags, "Recover");
        if !flags.is_subset_of(XaFlags::STARTRSCAN | XaFlags::ENDRSCAN) {
            error!(%flags, "Invalid flags for recover");
            return Err(XaError::new(
                XaErrorCode::Inval,
                format!("Invalid flags {flags} for recover"),
            ));
        }
        Ok(self.resource_manager.prepared_xids())
    }

    fn resource_manager_id(&self) -> ResourceManagerId {
        self.resource_manager.id()
    }

    fn transaction_timeout(&self) -> u32 {
        self.transaction_timeout.load(Ordering::Relaxed)
    }

    fn set_transaction_timeout(&self, seconds: u32) {
        self.transaction_timeout.store(seconds, Ordering::Relaxed);
    }
}

fn duplicate(xid: &XidKey) -> XaError {
    XaError::new(
        XaErrorCode::DupId,
        format!("Transaction branch {xid} has already been started"),
    )
}
