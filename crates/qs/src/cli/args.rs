//! Clap argument definitions for the `qs` CLI.

use std::{env, path::PathBuf, process::exit};

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, error::ErrorKind};
use qs_config::{Modifier, Mode};
use qs_core::parse_mode;

/// Parses a mode name such as `headings`, `symbol-list` or `EditorList`.
fn parse_mode_arg(s: &str) -> Result<Mode, String> {
    parse_mode(s).map_err(|e| e.to_string())
}

/// Parses a modifier key name.
fn parse_modifier_arg(s: &str) -> Result<Modifier, String> {
    s.parse::<Modifier>().map_err(|e| e.to_string())
}

/// Top-level CLI options.
#[derive(Parser)]
#[command(name = "qs")]
#[command(about = "Quick switcher: ranked files, headings, symbols and more for a folder of notes")]
pub struct Cli {
    /// Log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides it
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Shared settings file flags.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Settings file to load instead of discovering .qs.toml files; repeat for layers,
    /// highest precedence first
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Arguments for `qs search`.
#[derive(Args, Debug, Clone)]
pub struct SearchCommand {
    /// Query text, including any mode trigger such as `#` for headings
    #[arg(default_value = "")]
    pub query: String,

    /// Open the switcher in this mode; the mode's trigger is put in front of the query
    #[arg(short = 'm', long, value_parser = parse_mode_arg)]
    pub mode: Option<Mode>,

    /// Vault directory [default: current directory]
    #[arg(short = 'r', long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Vault path of the file to treat as the focused editor
    #[arg(short = 'a', long, value_name = "PATH")]
    pub active: Option<String>,

    /// Vault registry file listing known vaults (obsidian.json)
    #[arg(long, value_name = "FILE")]
    pub vaults: Option<PathBuf>,

    /// Maximum suggestions [default: 50]
    #[arg(short = 'n', long)]
    pub limit: Option<usize>,

    /// Turn on a facet by id; repeatable
    #[arg(short = 'f', long = "facet", value_name = "ID")]
    pub facets: Vec<String>,

    /// Print the action for choosing the suggestion at this position, counting from 1
    #[arg(long, value_name = "N")]
    pub choose: Option<usize>,

    /// Modifier held while choosing (mod, ctrl, meta, shift, alt); repeatable
    #[arg(long = "modifier", value_name = "MOD", value_parser = parse_modifier_arg)]
    pub modifiers: Vec<Modifier>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Settings files.
    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for `qs init`.
#[derive(Args, Debug, Clone)]
pub struct InitCommand {
    /// Overwrite an existing settings file
    #[arg(long)]
    pub force: bool,
}

/// Supported `qs` subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Rank suggestions for a query
    #[command(after_help = "\
MODE TRIGGERS (defaults):
  edt               Open editors
  @                 Symbols of the active file ($ for the active editor)
  #                 Headings across the vault
  '                 Bookmarks
  >                 Commands
  +                 Saved workspaces
  ~                 Related items (^ for the active editor)
  vault             Known vaults

EXAMPLES:
  qs search plan
  qs search '#milestones'
  qs search --mode symbols --active notes/plan.md
  qs search --mode related --active notes/plan.md --facet backlink
  qs search plan --choose 1 --modifier mod")]
    Search(SearchCommand),

    /// Validate settings and report problems
    Check(ConfigArgs),

    /// Show effective settings
    Config(ConfigArgs),

    /// Create a .qs.toml settings file in the current directory
    Init(InitCommand),
}

/// Parses CLI arguments, printing a compact command list for top-level `--help`.
pub fn parse_cli() -> Cli {
    match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            if e.kind() == ErrorKind::DisplayHelp && env::args().len() <= 2 {
                print_command_help();
                exit(0);
            }
            e.exit();
        }
    }
}

/// Prints the about line and one line per subcommand.
fn print_command_help() {
    let cmd = Cli::command();
    let about = cmd.get_about().map(|s| s.to_string()).unwrap_or_default();

    println!("{about}");
    println!();
    println!("Usage: qs [-v] <COMMAND>");
    println!();
    println!("Commands:");
    for sub in cmd.get_subcommands() {
        let name = sub.get_name();
        if name == "help" {
            continue;
        }
        let about = sub.get_about().map(|s| s.to_string()).unwrap_or_default();
        println!("  {name:8} {about}");
    }
    println!(
        "  {:<8} Print this message or the help of the given subcommand(s)",
        "help"
    );
    println!();
    println!("Options:");
    println!("  -v, --verbose  Increase log verbosity");
    println!("  -h, --help     Print help");
}

#[cfg(test)]
mod tests {
    use qs_config::Settings;

    use super::*;

    #[test]
    fn mode_names_parse() {
        let cli = Cli::try_parse_from(["qs", "search", "--mode", "headings", "x"]).unwrap();
        let Commands::Search(cmd) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(cmd.mode, Some(Mode::HeadingsList));
        assert_eq!(cmd.query, "x");
    }

    #[test]
    fn unknown_mode_is_rejected() {
        assert!(Cli::try_parse_from(["qs", "search", "--mode", "nope"]).is_err());
    }

    #[test]
    fn repeated_flags_collect() {
        let cli = Cli::try_parse_from([
            "qs", "-vv", "search", "-c", "a.toml", "-c", "b.toml", "-f", "backlink", "--modifier",
            "mod",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Search(cmd) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(cmd.config.files.len(), 2);
        assert_eq!(cmd.facets, vec!["backlink"]);
        assert_eq!(cmd.modifiers, vec![Modifier::Mod]);
        assert_eq!(cmd.query, "");
    }

    /// Keeps the documented trigger list in step with the default settings.
    #[test]
    fn help_lists_default_triggers() {
        let cmd = Cli::command();
        let search = cmd
            .get_subcommands()
            .find(|c| c.get_name() == "search")
            .unwrap();
        let help = search.get_after_help().map(|h| h.to_string()).unwrap_or_default();
        let triggers = Settings::default().triggers;
        for trigger in [
            &triggers.symbol_list,
            &triggers.headings_list,
            &triggers.bookmarks_list,
            &triggers.command_list,
            &triggers.workspace_list,
            &triggers.related_items_list,
        ] {
            assert!(help.contains(&format!("  {trigger} ")), "missing trigger {trigger}");
        }
    }
}
