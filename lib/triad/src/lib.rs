#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod logging;

pub mod model {
    pub use triad_model::*;
}

pub mod common {
    pub use triad_common::*;
}

pub mod logical {
    pub use triad_logical::*;
}

pub mod resolver {
    pub use triad_resolver::*;
}
