//! # Command line configuration

use crate::component::ComponentSet;
use color_eyre::eyre::WrapErr;
use color_eyre::Report;
use log::*;
use serde::Deserialize;
use std::ffi::OsStr;
use std::path::PathBuf;
use structopt::StructOpt;
use tokio::fs::read_to_string;
use tracing::instrument;

/// The commandline flags
#[derive(Debug, StructOpt)]
#[structopt(name = "content-components")]
pub struct Flags {
    /// Which component file to use (TOML, or JSON with a `.json` extension)
    #[structopt(long = "cfg", short = "c")]
    pub cfg: Option<PathBuf>,
    /// Pretty-print the generated specs
    #[structopt(long = "pretty", short = "p")]
    pub pretty: bool,
    /// Print the default DOM of every component instead of the specs
    #[structopt(long = "html")]
    pub html: bool,
}

/// What to print
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Output {
    /// The node and mark specs as JSON
    Specs { pretty: bool },
    /// One HTML element per component
    Html,
}

/// The setup that we are actually using
#[derive(Debug)]
pub struct Setup {
    pub components: ComponentSet,
    pub output: Output,
}

/// A component file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// The components, by name
    #[serde(default)]
    pub components: ComponentSet,
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Config, Report> {
        let config: Config = toml::from_str(input).wrap_err("Could not parse config file")?;
        config.components.check().wrap_err("Invalid components")?;
        Ok(config)
    }

    pub fn from_json_str(input: &str) -> Result<Config, Report> {
        let config: Config =
            serde_json::from_str(input).wrap_err("Could not parse config file")?;
        config.components.check().wrap_err("Invalid components")?;
        Ok(config)
    }
}

impl Flags {
    fn output(&self) -> Output {
        if self.html {
            Output::Html
        } else {
            Output::Specs {
                pretty: self.pretty,
            }
        }
    }

    #[instrument]
    /// Load the components from the config file
    pub async fn load_cfg(&self) -> Result<Setup, Report> {
        if let Some(cfg) = &self.cfg {
            let cfg_string: String = read_to_string(cfg)
                .await
                .wrap_err("Could not read config file")?;
            let config = match cfg.extension().and_then(OsStr::to_str) {
                Some("json") => Config::from_json_str(&cfg_string)?,
                _ => Config::from_toml_str(&cfg_string)?,
            };
            info!(
                "Loaded {} components from {}",
                config.components.len(),
                cfg.display()
            );
            Ok(Setup {
                components: config.components,
                output: self.output(),
            })
        } else {
            warn!("No component file given, using no components");
            Ok(Setup {
                components: ComponentSet::new(),
                output: self.output(),
            })
        }
    }
}
