use std::path::{Path, PathBuf};

use derive_builder::Builder;
use log::info;

use crate::{
    auth::authenticate, fetch::fetch_archive, install::install, Credentials, InstallReport,
    Result, Session, SessionConfig, TaskId,
};

#[derive(Debug, Builder)]
#[builder(setter(into))]
pub struct Pipeline {
    task: TaskId,
    root_directory: PathBuf,
    subdirectory: String,
    credentials: Credentials,
    #[builder(default)]
    session: SessionConfig,
}

impl Pipeline {
    pub fn destination(&self) -> PathBuf {
        destination(&self.root_directory, &self.subdirectory)
    }

    /// Stops at the first failing stage. Each run opens its own session.
    pub async fn run(&self) -> Result<InstallReport> {
        let session = Session::new(self.session.clone())?;

        authenticate(&session, &self.credentials).await?;
        let archive = fetch_archive(&session, &self.task).await?;
        let report = install(archive.bytes(), &self.destination())?;

        info!(
            "task {}: {} test files saved in {}",
            self.task,
            report.files.len(),
            report.destination.display()
        );
        Ok(report)
    }
}

pub fn destination(root_directory: &Path, subdirectory: &str) -> PathBuf {
    root_directory.join(subdirectory).join("tests")
}

/// Logs in to the default site, downloads the tests of `task` and unpacks
/// them into `<root_directory>/<subdirectory>/tests`.
///
/// ```no_run
/// # async fn demo() -> cses_tests::Result<()> {
/// let task = cses_tests::TaskId::new("1068").unwrap();
/// let report = cses_tests::run(task, "/srv/cses", "weird-algorithm", "alice", "secret").await?;
/// assert!(report.destination.ends_with("weird-algorithm/tests"));
/// # Ok(())
/// # }
/// ```
pub async fn run(
    task: TaskId,
    root_directory: impl Into<PathBuf>,
    subdirectory: impl Into<String>,
    identifier: impl Into<String>,
    secret: impl Into<String>,
) -> Result<InstallReport> {
    default_pipeline(task, root_directory, subdirectory, identifier, secret)
        .run()
        .await
}

fn default_pipeline(
    task: TaskId,
    root_directory: impl Into<PathBuf>,
    subdirectory: impl Into<String>,
    identifier: impl Into<String>,
    secret: impl Into<String>,
) -> Pipeline {
    Pipeline {
        task,
        root_directory: root_directory.into(),
        subdirectory: subdirectory.into(),
        credentials: Credentials::new(identifier, secret),
        session: SessionConfig::default(),
    }
}
