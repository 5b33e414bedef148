use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use triad_common::{ResolverFactory, ResolverFactoryRef};
use triad_resolver::xa::{
    HookError, PrepareVote, TransactionManagerContext, TxInfo, XaErrorCode, XaFlags, XaResource,
    XaResourceHooks, XaResult, XidKey,
};

#[derive(Debug)]
pub struct TestFactory(pub &'static str);

impl ResolverFactory for TestFactory {
    fn name(&self) -> &str {
        self.0
    }
}

pub fn factory(name: &'static str) -> ResolverFactoryRef {
    Arc::new(TestFactory(name))
}

pub fn xid(branch: u8) -> XidKey {
    XidKey::new(4711, b"global-transaction", &[branch]).unwrap()
}

/// The result that a scripted hook returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    Ok,
    Xa(XaErrorCode),
    Failure,
}

impl Outcome {
    fn into_result(self) -> Result<(), HookError> {
        match self {
            Outcome::Ok => Ok(()),
            Outcome::Xa(code) => Err(HookError::Xa(code)),
            Outcome::Failure => Err(HookError::failure("backend exploded")),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Script {
    pub new_transaction: Outcome,
    pub start: Outcome,
    pub end: Outcome,
    pub prepare: Outcome,
    pub vote: PrepareVote,
    pub commit: Outcome,
    pub rollback: Outcome,
    pub forget: Outcome,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            new_transaction: Outcome::Ok,
            start: Outcome::Ok,
            end: Outcome::Ok,
            prepare: Outcome::Ok,
            vote: PrepareVote::Ok,
            commit: Outcome::Ok,
            rollback: Outcome::Ok,
            forget: Outcome::Ok,
        }
    }
}

/// Hooks whose outcomes are scripted by the test. The state of a branch counts its associations.
#[derive(Debug, Default)]
pub struct ScriptedHooks {
    script: Mutex<Script>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedHooks {
    pub fn script(&self, update: impl FnOnce(&mut Script)) {
        update(&mut self.script.lock().unwrap());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) -> Script {
        self.calls.lock().unwrap().push(call.into());
        *self.script.lock().unwrap()
    }
}

impl XaResourceHooks for ScriptedHooks {
    type State = AtomicU32;

    fn new_transaction(&self, _xid: &XidKey) -> Result<Self::State, HookError> {
        self.record("new_transaction")
            .new_transaction
            .into_result()
            .map(|()| AtomicU32::new(0))
    }

    fn do_start(
        &self,
        transaction: &TxInfo<Self::State>,
        _flags: XaFlags,
        is_new: bool,
    ) -> Result<(), HookError> {
        let script = self.record(format!("start(new={is_new})"));
        transaction.state().fetch_add(1, Ordering::Relaxed);
        script.start.into_result()
    }

    fn do_end(&self, _transaction: &TxInfo<Self::State>, flags: XaFlags) -> Result<(), HookError> {
        self.record(format!("end({flags})")).end.into_result()
    }

    fn do_prepare(&self, _transaction: &TxInfo<Self::State>) -> Result<PrepareVote, HookError> {
        let script = self.record("prepare");
        script.prepare.into_result().map(|()| script.vote)
    }

    fn do_commit(&self, _transaction: &TxInfo<Self::State>) -> Result<(), HookError> {
        self.record("commit").commit.into_result()
    }

    fn do_rollback(&self, _transaction: &TxInfo<Self::State>) -> Result<(), HookError> {
        self.record("rollback").rollback.into_result()
    }

    fn do_forget(&self, _transaction: &TxInfo<Self::State>) -> Result<(), HookError> {
        self.record("forget").forget.into_result()
    }
}

pub fn create_resource(
    context: &TransactionManagerContext,
    factory: &ResolverFactoryRef,
) -> XaResult<XaResource<ScriptedHooks>> {
    XaResource::new(context, factory, ScriptedHooks::default())
}

/// Creates a resource with its own context and factory.
pub fn isolated_resource() -> XaResult<(ResolverFactoryRef, XaResource<ScriptedHooks>)> {
    let factory = factory("isolated");
    let resource = create_resource(&TransactionManagerContext::new(), &factory)?;
    Ok((factory, resource))
}
