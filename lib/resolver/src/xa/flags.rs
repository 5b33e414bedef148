use std::fmt;
use std::ops::BitOr;

/// The flags of an XA operation, with their standard numeric values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct XaFlags(i32);

impl XaFlags {
    pub const NOFLAGS: XaFlags = XaFlags(0);
    /// The caller joins an existing branch.
    pub const JOIN: XaFlags = XaFlags(0x0020_0000);
    /// Ends a recovery scan.
    pub const ENDRSCAN: XaFlags = XaFlags(0x0080_0000);
    /// Starts a recovery scan.
    pub const STARTRSCAN: XaFlags = XaFlags(0x0100_0000);
    /// The caller suspends its association with a branch.
    pub const SUSPEND: XaFlags = XaFlags(0x0200_0000);
    /// The work of the caller is complete.
    pub const SUCCESS: XaFlags = XaFlags(0x0400_0000);
    /// The caller resumes a suspended association.
    pub const RESUME: XaFlags = XaFlags(0x0800_0000);
    /// The caller failed. The branch must be rolled back.
    pub const FAIL: XaFlags = XaFlags(0x2000_0000);
    pub const ONEPHASE: XaFlags = XaFlags(0x4000_0000);

    const NAMES: [(XaFlags, &'static str); 8] = [
        (XaFlags::JOIN, "TMJOIN"),
        (XaFlags::ENDRSCAN, "TMENDRSCAN"),
        (XaFlags::STARTRSCAN, "TMSTARTRSCAN"),
        (XaFlags::SUSPEND, "TMSUSPEND"),
        (XaFlags::SUCCESS, "TMSUCCESS"),
        (XaFlags::RESUME, "TMRESUME"),
        (XaFlags::FAIL, "TMFAIL"),
        (XaFlags::ONEPHASE, "TMONEPHASE"),
    ];

    /// Creates flags from their raw value. Unknown bits are kept.
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> i32 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all bits of `other` are set.
    pub const fn contains(self, other: XaFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no bit outside of `allowed` is set.
    pub const fn is_subset_of(self, allowed: XaFlags) -> bool {
        self.0 & !allowed.0 == 0
    }
}

impl BitOr for XaFlags {
    type Output = XaFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        XaFlags(self.0 | rhs.0)
    }
}

impl fmt::Display for XaFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("TMNOFLAGS");
        }

        let mut remaining = self.0;
        let mut first = true;
        for (flag, name) in XaFlags::NAMES {
            if self.contains(flag) {
                if !first {
                    f.write_str("|")?;
                }
                f.write_str(name)?;
                first = false;
                remaining &= !flag.0;
            }
        }
        if remaining != 0 {
            if !first {
                f.write_str("|")?;
            }
            write!(f, "{remaining:#x}")?;
        }
        Ok(())
    }
}
