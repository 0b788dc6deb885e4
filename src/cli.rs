//! Command line front end: turns flags, the settings file and prompts into
//! a ready-to-run [`Pipeline`].

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use dialoguer::{Input, Password};
use log::info;

use crate::{
    config::Settings,
    session::{SessionConfigBuilder, DEFAULT_BASE_URL},
    Credentials, Pipeline, PipelineBuilder, TaskId,
};

#[derive(Parser, Debug)]
#[command(name = "cses-tests")]
#[command(about = "Download and unpack the test cases of a CSES problem")]
#[command(after_help = "Tests are saved in <ROOT_DIRECTORY>/<DIRECTORY_NAME>/tests. \
Values not given on the command line are taken from the settings file or asked for once and saved.")]
pub struct Cli {
    /// The CSES problem task number
    #[arg(short = 't', long = "task-number")]
    pub task: String,

    /// Task's subdirectory name, e.g. hanoi
    #[arg(short = 'f', long = "directory-name")]
    pub directory_name: String,

    /// Your CSES username
    #[arg(short, long)]
    pub username: Option<String>,

    /// Your CSES password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Root directory for downloads (saved for later runs)
    #[arg(short, long)]
    pub root_directory: Option<PathBuf>,

    /// Settings file to use instead of the default location
    #[arg(long, env = "CSES_TESTS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Site to talk to
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Never prompt; fail if a value is missing
    #[arg(short = 'n', long)]
    pub no_interaction: bool,

    /// Log every request
    #[arg(short, long)]
    pub verbose: bool,
}

pub trait Prompt {
    fn ask(&mut self, label: &str, hidden: bool) -> Result<String>;
}

pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, label: &str, hidden: bool) -> Result<String> {
        let value = if hidden {
            Password::new().with_prompt(label).interact()?
        } else {
            Input::<String>::new().with_prompt(label).interact_text()?
        };
        Ok(value.trim().to_string())
    }
}

pub struct NoPrompt;

impl Prompt for NoPrompt {
    fn ask(&mut self, label: &str, _hidden: bool) -> Result<String> {
        bail!("{} is not set; pass it on the command line", label)
    }
}

impl Cli {
    pub fn config_path(&self) -> Result<PathBuf> {
        self.config
            .clone()
            .or_else(Settings::default_path)
            .context("Cannot locate a config directory; pass --config")
    }

    /// Resolves every input of the run, flags first, then the settings file,
    /// then `prompt`. Prompted values and a new root directory are saved.
    pub fn resolve(self, prompt: &mut dyn Prompt) -> Result<Pipeline> {
        let task = TaskId::new(self.task.as_str()).context("Task number must not be empty")?;
        let config_path = self.config_path()?;
        let mut settings = Settings::load(&config_path)?;
        let mut changed = false;

        let root_directory = match self.root_directory {
            Some(root) => {
                changed |= settings.root_directory.as_ref() != Some(&root);
                settings.root_directory = Some(root.clone());
                root
            }
            None => match settings.root_directory.clone() {
                Some(root) => root,
                None => {
                    let root = PathBuf::from(ask(prompt, "Root directory to store test cases", false)?);
                    settings.root_directory = Some(root.clone());
                    changed = true;
                    root
                }
            },
        };

        let username = match self.username.or_else(|| settings.username.clone()) {
            Some(username) => username,
            None => {
                let username = ask(prompt, "CSES username", false)?;
                settings.username = Some(username.clone());
                changed = true;
                username
            }
        };

        let password = match self
            .password
            .or_else(|| settings.password.as_ref().map(|p| p.expose().to_string()))
        {
            Some(password) => password,
            None => {
                let password = ask(prompt, "CSES password", true)?;
                settings.password = Some(password.clone().into());
                changed = true;
                password
            }
        };

        if changed {
            settings.save(&config_path)?;
            info!("settings saved to {}", config_path.display());
        }

        let session = SessionConfigBuilder::default()
            .base_url(self.base_url)
            .timeout(Duration::from_secs(self.timeout))
            .build()?;

        Ok(PipelineBuilder::default()
            .task(task)
            .root_directory(root_directory)
            .subdirectory(self.directory_name)
            .credentials(Credentials::new(username, password))
            .session(session)
            .build()?)
    }
}

fn ask(prompt: &mut dyn Prompt, label: &str, hidden: bool) -> Result<String> {
    let value = prompt.ask(label, hidden)?;
    if value.is_empty() {
        bail!("{} must not be empty", label);
    }
    Ok(value)
}
