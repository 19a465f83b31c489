// Typed command invocations
//
// Every registered command parses its argument list into one `Command`
// variant. Argument problems surface as a `UsageError` line in the transcript.

use thiserror::Error;

use crate::providers::LookupKind;

/// Static informational pages formatted from the owner profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoPage {
    Contact,
    Resume,
    Experience,
    Kaggle,
    Research,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Clear the transcript, or the stored history with `--history`
    Clear { history: bool },
    /// Switch palette; `None` lists the palettes
    Theme { name: Option<String> },
    History,
    /// Mount a cartridge; `None` mounts the first configured one
    Mount { cartridge: Option<String> },
    Eject,
    /// Cosmetic privilege escalation
    Sudo { command: Vec<String> },
    Info(InfoPage),
    Lookup(LookupKind),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("{command}: unrecognized option '{option}'")]
    UnknownOption { command: String, option: String },

    #[error("{command}: unexpected argument '{argument}'")]
    UnexpectedArgument { command: String, argument: String },
}

/// Parser from an argument list to a command variant
pub type ArgParser = fn(&[&str]) -> Result<Command, UsageError>;

fn reject_options(command: &str, args: &[&str]) -> Result<(), UsageError> {
    match args.iter().find(|arg| arg.starts_with('-')) {
        Some(option) => Err(UsageError::UnknownOption {
            command: command.to_string(),
            option: option.to_string(),
        }),
        None => Ok(()),
    }
}

pub fn parse_help(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("help", args)?;
    Ok(Command::Help)
}

pub fn parse_clear(args: &[&str]) -> Result<Command, UsageError> {
    let mut history = false;
    for arg in args {
        match *arg {
            "--history" => history = true,
            option if option.starts_with('-') => {
                return Err(UsageError::UnknownOption {
                    command: "clear".to_string(),
                    option: option.to_string(),
                })
            }
            argument => {
                return Err(UsageError::UnexpectedArgument {
                    command: "clear".to_string(),
                    argument: argument.to_string(),
                })
            }
        }
    }
    Ok(Command::Clear { history })
}

pub fn parse_theme(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("theme", args)?;
    Ok(Command::Theme {
        name: args.first().map(|name| name.to_lowercase()),
    })
}

pub fn parse_history(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("history", args)?;
    Ok(Command::History)
}

pub fn parse_mount(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("mount", args)?;
    Ok(Command::Mount {
        cartridge: args.first().map(|name| name.to_lowercase()),
    })
}

pub fn parse_eject(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("eject", args)?;
    Ok(Command::Eject)
}

pub fn parse_sudo(args: &[&str]) -> Result<Command, UsageError> {
    Ok(Command::Sudo {
        command: args.iter().map(|arg| arg.to_string()).collect(),
    })
}

pub fn parse_contact(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("contact", args)?;
    Ok(Command::Info(InfoPage::Contact))
}

pub fn parse_resume(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("resume", args)?;
    Ok(Command::Info(InfoPage::Resume))
}

pub fn parse_experience(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("experience", args)?;
    Ok(Command::Info(InfoPage::Experience))
}

pub fn parse_kaggle(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("kaggle", args)?;
    Ok(Command::Info(InfoPage::Kaggle))
}

pub fn parse_research(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("research", args)?;
    Ok(Command::Info(InfoPage::Research))
}

pub fn parse_projects(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("projects", args)?;
    Ok(Command::Lookup(LookupKind::Projects))
}

pub fn parse_stats(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("stats", args)?;
    Ok(Command::Lookup(LookupKind::Stats))
}

pub fn parse_cp(args: &[&str]) -> Result<Command, UsageError> {
    reject_options("cp", args)?;
    Ok(Command::Lookup(LookupKind::Rating))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_flags() {
        assert_eq!(parse_clear(&[]), Ok(Command::Clear { history: false }));
        assert_eq!(parse_clear(&["--history"]), Ok(Command::Clear { history: true }));
        assert_eq!(
            parse_clear(&["--all"]),
            Err(UsageError::UnknownOption {
                command: "clear".to_string(),
                option: "--all".to_string()
            })
        );
        assert!(matches!(
            parse_clear(&["screen"]),
            Err(UsageError::UnexpectedArgument { .. })
        ));
    }

    #[test]
    fn test_theme_name_is_lowercased() {
        assert_eq!(
            parse_theme(&["Dracula"]),
            Ok(Command::Theme {
                name: Some("dracula".to_string())
            })
        );
        assert_eq!(parse_theme(&[]), Ok(Command::Theme { name: None }));
    }

    #[test]
    fn test_unknown_flags_rejected() {
        let err = parse_help(&["--verbose"]).unwrap_err();
        assert_eq!(err.to_string(), "help: unrecognized option '--verbose'");
    }

    #[test]
    fn test_sudo_accepts_anything() {
        assert_eq!(
            parse_sudo(&["rm", "-rf", "/"]),
            Ok(Command::Sudo {
                command: vec!["rm".to_string(), "-rf".to_string(), "/".to_string()]
            })
        );
    }

    #[test]
    fn test_lookup_commands() {
        assert_eq!(parse_cp(&[]), Ok(Command::Lookup(LookupKind::Rating)));
        assert_eq!(parse_projects(&[]), Ok(Command::Lookup(LookupKind::Projects)));
        assert_eq!(parse_stats(&[]), Ok(Command::Lookup(LookupKind::Stats)));
    }
}
