//! Research-synthesis board application layer.
//!
//! Wraps the `canvas` engine with what the full application needs around
//! it: workspace tabs, environment configuration, the AI collaborator ports
//! and the services that drive them.
//!
//! | Module | Role |
//! |--------|------|
//! | [`workspace`] | Ordered tabs, one active; implements `canvas::doc::BoardStore` |
//! | [`config`] | `BoardConfig` from environment variables |
//! | [`error`] | `ConfigError`, `AiError`, `WorkspaceError` and the `ErrorCode` trait |
//! | [`ai`] | Completion / vector-search ports, tool registry, lenient JSON decoding |
//! | [`services`] | Research assistant chat turns and theme classification |

pub mod ai;
pub mod config;
pub mod error;
pub mod services;
pub mod workspace;

pub use config::BoardConfig;
pub use error::{AiError, ConfigError, ErrorCode, WorkspaceError};
pub use workspace::{Tab, TabId, Workspace};
