//! # update-gate
//!
//! A blocking "update available" notice for terminal applications.
//!
//! ## Overview
//!
//! When the update service reports a new version, a notice opens over the
//! application, shows the download progress, and once the update is on disk
//! offers "Install & Restart" or "Manually Download". The notice cannot be
//! dismissed: while it is up, every key and mouse event of the window is
//! filtered so that only the notice's own controls respond.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          App                                │
//! │   Terminal loop: guard-first input dispatch, async worker   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!          ┌───────────────────┼───────────────────┐
//!          ▼                   ▼                   ▼
//! ┌─────────────────┐ ┌─────────────────┐ ┌─────────────────┐
//! │   Controller    │ │      Guard      │ │    Reporter     │
//! │                 │ │                 │ │                 │
//! │ • State machine │ │ • Key filter    │ │ • Percent       │
//! │ • Notice view   │ │ • Click filter  │ │ • Speed         │
//! │ • Actions       │ │ • Hit-testing   │ │ • Size          │
//! └─────────────────┘ └─────────────────┘ └─────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐
//! │     Bridge      │
//! │                 │
//! │ • Subscriptions │
//! │ • Check/install │
//! │ • Simulation    │
//! └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`app`] — TUI application state and event loop
//! - [`bridge`] — Update service interface and the simulated service
//! - [`config`] — Configuration management
//! - [`error`] — Bridge error type
//! - [`theme`] — Theme support via ratatui-themes
//! - [`update`] — Notice lifecycle, input guard and progress formatting
//!
//! ## Example
//!
//! ```no_run
//! use update_gate::{Config, app};
//!
//! fn main() -> anyhow::Result<()> {
//!     app::run(Config::load()?)
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/update-gate/0.1.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::manual_let_else)]
#![allow(clippy::return_self_not_must_use)]

pub mod app;
pub mod bridge;
pub mod config;
pub mod error;
pub mod paths;
pub mod theme;
pub mod update;

// Re-export main types for convenience
pub use app::AppState;
pub use bridge::{SimulatedBridge, Subscription, UpdateBridge};
pub use config::{Config, SimulationConfig};
pub use error::BridgeError;
pub use theme::{Theme, ThemeColors};
pub use update::{
    CheckResponse, LifecycleState, ModalInputGuard, NoticeView, ProgressSample, UpdateInfo,
    UpdateLifecycleController, Verdict,
};

/// ASCII logo for the application
pub const LOGO: &str = r"
               __       __
  __  ______  / /___ _ / /____       ____ _____ _/ /____
 / / / / __ \/ __/ _ `/ __/ -_)____/ _ `/ _ `/ __/ -_)
 \_,_/ .___/\__/\_,_/\__/\__/     \_, /\_,_/\__/\__/
    /_/                          /___/
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Page opened by "Manually Download" unless configured otherwise
pub const RELEASES_URL: &str = "https://github.com/update-gate/update-gate/releases/latest";
