//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueHint};

/// Step-by-step AVL tree: insert, delete, search and watch the rotations
#[derive(Parser, Debug)]
#[command(name = "rsavl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Print every engine step (visits, rotations) as it happens
    #[arg(long, global = true)]
    pub steps: bool,

    /// Pace steps with the configured delays
    #[arg(long, global = true)]
    pub animate: bool,

    /// Extra config file layered over the global one
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply a script of operations to a fresh tree
    ///
    /// Example: rsavl run insert 10 20 30 delete 20 traverse inorder
    Run {
        /// Operations, e.g. `insert 10 20 search 20 preorder`
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        ops: Vec<String>,

        /// Only draw the final tree instead of after every change
        #[arg(short, long)]
        quiet: bool,
    },

    /// Read commands from stdin, one line at a time
    Shell,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings as TOML
    Show,
    /// Print the global config file location
    Path,
    /// Print a commented config template
    Template,
}
