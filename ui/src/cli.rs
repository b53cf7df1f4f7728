//! Command-line argument definitions using clap
//!
//! - icon-switcher                  # Print the menu (default)
//! - icon-switcher list             # Installed themes, one per line
//! - icon-switcher current          # Active theme name
//! - icon-switcher set <NAME>       # Apply a theme
//! - icon-switcher watch            # Reprint the menu on every change

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "icon-switcher")]
#[command(about = "Pick the desktop icon theme from the themes installed on this machine")]
#[command(version)]
pub struct Cli {
    /// Configuration file to use instead of the default locations
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Icon theme directory to scan; repeat to scan several (replaces configured roots)
    #[arg(long = "root", global = true, value_name = "DIR")]
    pub roots: Vec<PathBuf>,

    /// Keep the active theme in process memory instead of the desktop settings
    #[arg(long, global = true)]
    pub memory_store: bool,

    /// Increase log output (-v debug, -vv trace)
    #[arg(short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print installed icon themes, one per line
    List {
        /// Emit a JSON array instead of plain lines
        #[arg(long)]
        json: bool,

        /// Also report theme roots that could not be read
        #[arg(long)]
        verbose: bool,
    },

    /// Print the active icon theme name
    Current,

    /// Print the theme menu with the active entry checked
    Menu {
        /// Emit the entries and their markers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Make NAME the active icon theme
    Set {
        /// Theme directory name, e.g. Adwaita
        name: String,
    },

    /// Reprint the menu whenever the active theme changes
    Watch,
}

impl Cli {
    /// Subcommand to run, the menu when none was given
    pub fn selected_command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Menu { json: false })
    }

    /// `--root` values made absolute against `cwd`
    pub fn absolute_roots(&self, cwd: &Path) -> Vec<PathBuf> {
        self.roots
            .iter()
            .map(|root| {
                if root.is_absolute() {
                    root.clone()
                } else {
                    cwd.join(root)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_menu_is_default_command() {
        let cli = Cli::parse_from(["icon-switcher"]);
        assert_eq!(cli.selected_command(), Command::Menu { json: false });
        assert!(!cli.memory_store);
        assert_eq!(cli.verbosity, 0);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "icon-switcher",
            "set",
            "Papirus",
            "--memory-store",
            "--root",
            "/opt/icons",
            "--root",
            "themes",
            "-vv",
        ]);

        assert_eq!(
            cli.selected_command(),
            Command::Set {
                name: "Papirus".to_string()
            }
        );
        assert!(cli.memory_store);
        assert_eq!(cli.verbosity, 2);
        assert_eq!(
            cli.absolute_roots(Path::new("/home/user")),
            [
                PathBuf::from("/opt/icons"),
                PathBuf::from("/home/user/themes")
            ]
        );
    }

    #[test]
    fn test_list_flags() {
        let cli = Cli::parse_from(["icon-switcher", "list", "--verbose", "--json"]);
        assert_eq!(
            cli.selected_command(),
            Command::List {
                json: true,
                verbose: true
            }
        );
    }

    #[test]
    fn test_set_requires_name() {
        assert!(Cli::try_parse_from(["icon-switcher", "set"]).is_err());
    }
}
