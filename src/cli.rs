// Command line parsing
use crate::config::DEFAULT_CONFIG_PATH;
use crate::utils::error::TransferError;
use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "\
Usage: repo-transfer <command>
Commands:
  list       - List all available repositories
  set <repo> - Set the current repository
  show       - Show files in the current repository
  cd <dir>   - Change the current directory for the repository
  get <name> - Get a file or folder from the current repository
  put <name> - Put a file or folder in the current repository";

#[derive(Parser, Debug)]
#[command(name = "repo-transfer")]
#[command(about = "Copy files to and from the current local or SSH repository")]
#[command(version)]
pub struct Cli {
    /// Repository configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// One of: list, set, show, get, put, cd
    #[arg(allow_hyphen_values = true)]
    pub command: Option<String>,

    /// Argument for set, get, put and cd; anything after it is ignored
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Set when clap rejected the command line
    #[arg(skip)]
    pub rejected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Set(String),
    Show,
    Get(String),
    Put(String),
    Cd(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    Run(Command),
    /// Print [`USAGE`] and exit with the given status.
    Usage(i32),
}

impl Cli {
    /// Parses `args` (program name first). Help and version requests are
    /// returned as errors for clap to print; any other rejected command line
    /// yields a `Cli` whose invocation is the usage screen with status 0.
    pub fn parse_lenient<I, T>(args: I) -> std::result::Result<Cli, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        match Cli::try_parse_from(args) {
            Ok(cli) => Ok(cli),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => Err(e),
            Err(_) => Ok(Cli {
                config: PathBuf::from(DEFAULT_CONFIG_PATH),
                verbose: false,
                command: None,
                args: Vec::new(),
                rejected: true,
            }),
        }
    }

    pub fn invocation(&self) -> Result<Invocation> {
        if self.rejected {
            return Ok(Invocation::Usage(0));
        }
        let Some(command) = self.command.as_deref() else {
            return Ok(Invocation::Usage(1));
        };

        let argument = |message: &str| -> Result<String> {
            self.args
                .first()
                .cloned()
                .ok_or_else(|| TransferError::MissingArgument(message.to_string()).into())
        };

        let command = match command {
            "list" => Command::List,
            "show" => Command::Show,
            "set" => Command::Set(argument("Please specify a repository to set.")?),
            "get" => Command::Get(argument("Please specify a file or folder to get.")?),
            "put" => Command::Put(argument("Please specify a file or folder to put.")?),
            "cd" => Command::Cd(argument("Please specify a directory to change to.")?),
            other => {
                log::debug!("Unknown command '{}'", other);
                return Ok(Invocation::Usage(0));
            }
        };
        Ok(Invocation::Run(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("repo-transfer").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn commands_with_arguments() {
        assert_eq!(parse(&["set", "home"]).invocation().unwrap(), Invocation::Run(Command::Set("home".into())));
        assert_eq!(parse(&["get", "sub", "extra"]).invocation().unwrap(), Invocation::Run(Command::Get("sub".into())));
        assert_eq!(parse(&["list"]).invocation().unwrap(), Invocation::Run(Command::List));
        assert_eq!(parse(&["show"]).invocation().unwrap(), Invocation::Run(Command::Show));
    }

    #[test]
    fn missing_argument_is_an_error() {
        for command in ["set", "get", "put", "cd"] {
            let err = parse(&[command]).invocation().unwrap_err();
            assert!(matches!(
                err.downcast_ref::<TransferError>(),
                Some(TransferError::MissingArgument(_))
            ));
        }
    }

    #[test]
    fn usage_exit_status() {
        assert_eq!(parse(&[]).invocation().unwrap(), Invocation::Usage(1));
        assert_eq!(parse(&["frobnicate"]).invocation().unwrap(), Invocation::Usage(0));
    }

    #[test]
    fn hyphenated_words_are_not_fatal() {
        let lenient = |args: &[&str]| {
            Cli::parse_lenient(std::iter::once("repo-transfer").chain(args.iter().copied())).unwrap()
        };

        assert_eq!(
            lenient(&["get", "-notes.txt"]).invocation().unwrap(),
            Invocation::Run(Command::Get("-notes.txt".into()))
        );
        assert_eq!(
            lenient(&["put", "--draft", "-x"]).invocation().unwrap(),
            Invocation::Run(Command::Put("--draft".into()))
        );
        assert_eq!(lenient(&["--bogus"]).invocation().unwrap(), Invocation::Usage(0));
        assert_eq!(lenient(&["-q", "list"]).invocation().unwrap(), Invocation::Usage(0));
        assert_eq!(lenient(&["-v", "list"]).invocation().unwrap(), Invocation::Run(Command::List));

        let help = Cli::parse_lenient(["repo-transfer", "--help"]).unwrap_err();
        assert_eq!(help.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn config_flag() {
        let cli = parse(&["--config", "/etc/repos.json", "-v", "list"]);
        assert_eq!(cli.config, PathBuf::from("/etc/repos.json"));
        assert!(cli.verbose);
        assert_eq!(parse(&["list"]).config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }
}
