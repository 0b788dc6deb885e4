pub mod auth;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod error;
pub mod fetch;
pub mod install;
pub mod markup;
pub mod pipeline;
pub mod session;

pub use auth::authenticate;
pub use credentials::Credentials;
pub use error::{Error, FailureKind, Result};
pub use fetch::{fetch_archive, Archive, TaskId};
pub use install::{install, InstallReport};
pub use pipeline::{run, Pipeline, PipelineBuilder};
pub use session::{Session, SessionConfig, SessionConfigBuilder};
