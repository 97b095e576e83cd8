//! Command handlers shared by the `firmroast` and `roast` binaries.

pub mod analyze;
pub mod config;
pub mod consult;
pub mod credential;
pub mod questions;
pub mod run;

/// Version line with build metadata from `build.rs`.
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "\ncommit: ",
    env!("FR_GIT_SHA"),
    "\nbuilt: ",
    env!("FR_BUILD_TS"),
    "\nprofile: ",
    env!("FR_BUILD_PROFILE")
);
