use std::error::Error;
use std::fmt;

pub type XaResult<T> = Result<T, XaError>;

/// The standard XA error and outcome codes that a participant reports to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XaErrorCode {
    /// The branch was rolled back for an unspecified reason.
    RbRollback,
    RbCommFail,
    RbDeadlock,
    RbIntegrity,
    RbOther,
    RbProto,
    RbTimeout,
    RbTransient,
    /// The branch may have been heuristically completed.
    HeurHaz,
    /// The branch has been heuristically committed.
    HeurCom,
    /// The branch has been heuristically rolled back.
    HeurRb,
    /// The branch has been partially committed and partially rolled back.
    HeurMix,
    Async,
    /// A resource manager error occurred in the branch.
    RmErr,
    /// The xid is not known to the resource manager.
    Nota,
    /// Invalid arguments were given.
    Inval,
    /// The operation was invoked in an improper context.
    Proto,
    /// The resource manager is unavailable.
    RmFail,
    /// The xid already denotes an existing branch.
    DupId,
    Outside,
}

impl XaErrorCode {
    /// Returns the standard numeric value of this code.
    pub fn code(self) -> i32 {
        match self {
            XaErrorCode::RbRollback => 100,
            XaErrorCode::RbCommFail => 101,
            XaErrorCode::RbDeadlock => 102,
            XaErrorCode::RbIntegrity => 103,
            XaErrorCode::RbOther => 104,
            XaErrorCode::RbProto => 105,
            XaErrorCode::RbTimeout => 106,
            XaErrorCode::RbTransient => 107,
            XaErrorCode::HeurHaz => 8,
            XaErrorCode::HeurCom => 7,
            XaErrorCode::HeurRb => 6,
            XaErrorCode::HeurMix => 5,
            XaErrorCode::Async => -2,
            XaErrorCode::RmErr => -3,
            XaErrorCode::Nota => -4,
            XaErrorCode::Inval => -5,
            XaErrorCode::Proto => -6,
            XaErrorCode::RmFail => -7,
            XaErrorCode::DupId => -8,
            XaErrorCode::Outside => -9,
        }
    }

    /// Returns the code with the numeric value `code`, if it is an error or outcome code.
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            100 => XaErrorCode::RbRollback,
            101 => XaErrorCode::RbCommFail,
            102 => XaErrorCode::RbDeadlock,
            103 => XaErrorCode::RbIntegrity,
            104 => XaErrorCode::RbOther,
            105 => XaErrorCode::RbProto,
            106 => XaErrorCode::RbTimeout,
            107 => XaErrorCode::RbTransient,
            8 => XaErrorCode::HeurHaz,
            7 => XaErrorCode::HeurCom,
            6 => XaErrorCode::HeurRb,
            5 => XaErrorCode::HeurMix,
            -2 => XaErrorCode::Async,
            -3 => XaErrorCode::RmErr,
            -4 => XaErrorCode::Nota,
            -5 => XaErrorCode::Inval,
            -6 => XaErrorCode::Proto,
            -7 => XaErrorCode::RmFail,
            -8 => XaErrorCode::DupId,
            -9 => XaErrorCode::Outside,
            _ => return None,
        })
    }

    /// Returns `true` for the heuristic outcomes. A branch with a heuristic outcome is retained
    /// until the coordinator forgets it.
    pub fn is_heuristic(self) -> bool {
        matches!(
            self,
            XaErrorCode::HeurHaz | XaErrorCode::HeurCom | XaErrorCode::HeurRb | XaErrorCode::HeurMix
        )
    }

    /// Returns `true` if the code reports that the branch has been rolled back.
    pub fn is_rollback(self) -> bool {
        (100..=107).contains(&self.code())
    }

    fn name(self) -> &'static str {
        match self {
            XaErrorCode::RbRollback => "XA_RBROLLBACK",
            XaErrorCode::RbCommFail => "XA_RBCOMMFAIL",
            XaErrorCode::RbDeadlock => "XA_RBDEADLOCK",
            XaErrorCode::RbIntegrity => "XA_RBINTEGRITY",
            XaErrorCode::RbOther => "XA_RBOTHER",
            XaErrorCode::RbProto => "XA_RBPROTO",
            XaErrorCode::RbTimeout => "XA_RBTIMEOUT",
            XaErrorCode::RbTransient => "XA_RBTRANSIENT",
            XaErrorCode::HeurHaz => "XA_HEURHAZ",
            XaErrorCode::HeurCom => "XA_HEURCOM",
            XaErrorCode::HeurRb => "XA_HEURRB",
            XaErrorCode::HeurMix => "XA_HEURMIX",
            XaErrorCode::Async => "XAER_ASYNC",
            XaErrorCode::RmErr => "XAER_RMERR",
            XaErrorCode::Nota => "XAER_NOTA",
            XaErrorCode::Inval => "XAER_INVAL",
            XaErrorCode::Proto => "XAER_PROTO",
            XaErrorCode::RmFail => "XAER_RMFAIL",
            XaErrorCode::DupId => "XAER_DUPID",
            XaErrorCode::Outside => "XAER_OUTSIDE",
        }
    }
}

impl fmt::Display for XaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An error reported to the transaction coordinator.
#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct XaError {
    code: XaErrorCode,
    message: String,
    #[source]
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

impl XaError {
    pub fn new(code: XaErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Creates an error that has been caused by `source`.
    pub fn with_source(
        code: XaErrorCode,
        message: impl Into<String>,
        source: impl Into<Box<dyn Error + Send + Sync + 'static>>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn code(&self) -> XaErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The error of a backend hook.
///
/// A hook that knows the XA outcome of its failure reports it with [HookError::Xa]. All other
/// failures are unclassified and may leave the backend in an unknown state.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Hook reported {0}")]
    Xa(XaErrorCode),
    #[error("{0}")]
    Failure(#[source] Box<dyn Error + Send + Sync + 'static>),
}

impl HookError {
    /// Creates an unclassified failure.
    pub fn failure(cause: impl Into<Box<dyn Error + Send + Sync + 'static>>) -> Self {
        Self::Failure(cause.into())
    }
}

impl From<XaErrorCode> for HookError {
    fn from(value: XaErrorCode) -> Self {
        Self::Xa(value)
    }
}

/// The vote of a branch in the first phase of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrepareVote {
    /// The branch is prepared and can be committed.
    Ok,
    /// The branch did not write anything and is already complete.
    ReadOnly,
}

impl PrepareVote {
    /// Returns `XA_OK` (0) or `XA_RDONLY` (3).
    pub fn code(self) -> i32 {
        match self {
            PrepareVote::Ok => 0,
            PrepareVote::ReadOnly => 3,
        }
    }
}
