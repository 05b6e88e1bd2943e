use std::path::{Path, PathBuf};

mod check;
mod label;
mod styles;
mod terminal;

use anyhow::Context;
use check::Check;
use clap::ArgAction;
use label::Label;
use numbering::LabelConfig;
use styles::Styles;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML label configuration
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);
        self.command.run(self.config.as_deref())
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Label one or more JSON documents and resolve their cross-references
    Label(Label),

    /// List the supported counter styles with sample values
    Styles(Styles),

    /// Parse label templates and show their components
    Check(Check),
}

impl Command {
    fn run(self, config: Option<&Path>) -> anyhow::Result<()> {
        match self {
            Self::Label(command) => command.run(&load_config(config)?)?,
            Self::Styles(command) => command.run(),
            Self::Check(command) => command.run()?,
        }
        Ok(())
    }
}

/// Loads the configuration at `path`, or the default configuration.
fn load_config(path: Option<&Path>) -> anyhow::Result<LabelConfig> {
    path.map_or_else(
        || Ok(LabelConfig::default()),
        |path| {
            LabelConfig::load(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))
        },
    )
}
