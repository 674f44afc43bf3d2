//! # Core Application Logic
//!
//! Everything `hn` does that is not terminal input handling.
//!
//! ```text
//!      ┌────────────┐        ┌────────────┐
//!      │    CLI     │        │   Shell    │
//!      │   (clap)   │        │   (repl)   │
//!      └─────┬──────┘        └─────┬──────┘
//!            └──────────┬──────────┘
//!                       ▼
//!            ┌─────────────────────┐
//!            │        CORE         │
//!            │ • config (settings) │
//!            │ • state (App)       │
//!            │ • commands          │
//!            │ • render            │
//!            └──────────┬──────────┘
//!                       ▼
//!            ┌─────────────────────┐
//!            │  api (NewsSource)   │
//!            └─────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`config`]: settings and their override hierarchy
//! - [`state`]: the `App` struct and the shared `DisplayConfig`
//! - [`commands`]: one async function per subcommand
//! - [`render`]: text formatting of stories, comments and users
//! - [`store`]: ids of the last listing, for `view <index>`

pub mod commands;
pub mod config;
pub mod onions;
pub mod render;
pub mod state;
pub mod store;
