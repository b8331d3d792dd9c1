//! WikiView Navigation
//!
//! Decides what happens to every URL the rendering surface is about to load:
//! - Wiki URLs → loaded in-app, tagged with the configured skin
//! - Anything else → handed to the user for confirmation
//! - Static asset hosts → display hint (zoomed out, wide viewport)
//!
//! Also parses the `@command` lines of the headless shell.

mod command;
mod error;
mod input;
mod policy;

pub use command::{Command, CommandType};
pub use error::NavigationError;
pub use input::{normalize_url, ShellInput};
pub use policy::{
    DisplayHint, HostMatching, Interception, UrlClass, UrlPolicy, SAFE_MODE_PARAM, SKIN_PARAM,
    STATIC_ASSET_INITIAL_SCALE,
};

pub type Result<T> = std::result::Result<T, NavigationError>;
