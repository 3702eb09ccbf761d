//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use slipway::ops::ConfigureOptions;

/// Slipway - A build configuration resolver for native C++ projects
#[derive(Parser)]
#[command(name = "slipway")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the build configuration and write the plan
    Configure(ConfigureArgs),

    /// Print the resolved compiler flag set, one token per line
    Flags(InputArgs),

    /// Print the third-party link line in link order
    Linkplan(InputArgs),

    /// List the registered test targets
    Tests(InputArgs),

    /// Explain how the link mode was resolved
    Explain(InputArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Resolution inputs, shared by every subcommand that runs the
/// configuration pass. Values not given here fall back to the layered
/// config files, then to the built-in defaults.
#[derive(Args)]
pub struct InputArgs {
    /// Build type (debug, fastdebug, release, profile_gen, profile_build)
    #[arg(long, env = "SLIPWAY_BUILD_TYPE")]
    pub build_type: Option<String>,

    /// Link mode request (auto, dynamic, static)
    #[arg(long, env = "SLIPWAY_LINK")]
    pub link: Option<String>,

    /// Comma-separated sanitizers (address, thread)
    #[arg(long, env = "SLIPWAY_SANITIZE")]
    pub sanitize: Option<String>,

    /// Enable coverage instrumentation
    #[arg(long, env = "SLIPWAY_COVERAGE")]
    pub coverage: bool,

    /// Whether test targets are registered (true/false)
    #[arg(long, env = "SLIPWAY_TESTS")]
    pub tests: Option<bool>,

    /// Toolchain prefix whose bin/ holds the compilers
    #[arg(long, env = "SLIPWAY_TOOLCHAIN_ROOT")]
    pub toolchain_root: Option<PathBuf>,
}

impl InputArgs {
    pub fn to_options(&self) -> ConfigureOptions {
        ConfigureOptions {
            build_type: self.build_type.clone(),
            link: self.link.clone(),
            sanitize: self.sanitize.clone(),
            coverage: self.coverage,
            tests: self.tests,
            toolchain_root: self.toolchain_root.clone(),
        }
    }
}

#[derive(Args)]
pub struct ConfigureArgs {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Print the plan to stdout instead of writing .slipway/plan.json
    #[arg(long)]
    pub print: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
