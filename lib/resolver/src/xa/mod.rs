//! The participant side of the X/Open XA two-phase commit protocol.
//!
//! Every resolver factory owns one [RmInfo] registry of open transaction branches. All
//! [XaResource]s created for the same factory share this registry, which is looked up in a
//! [TransactionManagerContext]. The protocol state machine is implemented once in [XaResource],
//! backends only provide [XaResourceHooks].

mod config;
mod error;
mod flags;
mod hooks;
mod info;
mod manager;
mod resource;
mod xid;

pub use config::XaResourceConfig;
pub use error::{HookError, PrepareVote, XaError, XaErrorCode, XaResult};
pub use flags::XaFlags;
pub use hooks::{ReadOnlyHooks, XaResourceHooks};
pub use info::{BranchPhase, ResourceManagerId, RmInfo, TxInfo};
pub use manager::TransactionManagerContext;
pub use resource::{TransactionResource, XaResource};
pub use xid::{Xid, XidKey};
