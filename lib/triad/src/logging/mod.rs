//! Logging setup for applications and tests.
//!
//! All crates of this workspace emit [tracing] events. Applications install a subscriber once with
//! [init]. Tests capture the events of a closure with [test_capture::capture_logs].

mod init;
pub mod test_capture;

pub use init::{init, Profile};
