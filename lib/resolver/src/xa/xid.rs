use crate::xa::{XaError, XaErrorCode, XaResult};
use std::fmt;

/// The identifier of a transaction branch, as assigned by the coordinator.
pub trait Xid {
    fn format_id(&self) -> i32;

    fn global_transaction_id(&self) -> &[u8];

    fn branch_qualifier(&self) -> &[u8];
}

/// An owned [Xid] that compares by value.
///
/// Coordinators may hand out different objects for the same branch, so branches are always looked
/// up by a copy of the identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct XidKey {
    format_id: i32,
    global_transaction_id: Box<[u8]>,
    branch_qualifier: Box<[u8]>,
}

impl XidKey {
    pub const MAX_GTRID_SIZE: usize = 64;
    pub const MAX_BQUAL_SIZE: usize = 64;

    /// Creates a new [XidKey].
    ///
    /// # Errors
    ///
    /// Returns [XaErrorCode::Inval] if an identifier is longer than 64 bytes.
    pub fn new(
        format_id: i32,
        global_transaction_id: &[u8],
        branch_qualifier: &[u8],
    ) -> XaResult<Self> {
        if global_transaction_id.len() > Self::MAX_GTRID_SIZE {
            return Err(XaError::new(
                XaErrorCode::Inval,
                format!(
                    "Global transaction id has {} bytes, at most {} are allowed",
                    global_transaction_id.len(),
                    Self::MAX_GTRID_SIZE
                ),
            ));
        }
        if branch_qualifier.len() > Self::MAX_BQUAL_SIZE {
            return Err(XaError::new(
                XaErrorCode::Inval,
                format!(
                    "Branch qualifier has {} bytes, at most {} are allowed",
                    branch_qualifier.len(),
                    Self::MAX_BQUAL_SIZE
                ),
            ));
        }

        Ok(Self {
            format_id,
            global_transaction_id: global_transaction_id.into(),
            branch_qualifier: branch_qualifier.into(),
        })
    }

    /// Copies the identifier of `xid`.
    pub fn from_xid(xid: &(impl Xid + ?Sized)) -> XaResult<Self> {
        Self::new(
            xid.format_id(),
            xid.global_transaction_id(),
            xid.branch_qualifier(),
        )
    }
}

impl Xid for XidKey {
    fn format_id(&self) -> i32 {
        self.format_id
    }

    fn global_transaction_id(&self) -> &[u8] {
        &self.global_transaction_id
    }

    fn branch_qualifier(&self) -> &[u8] {
        &self.branch_qualifier
    }
}

impl fmt::Display for XidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.format_id,
            hex::encode(&self.global_transaction_id),
            hex::encode(&self.branch_qualifier)
        )
    }
}

impl fmt::Debug for XidKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "XidKey({self})")
    }
}
