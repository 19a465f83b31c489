// Command registry with descriptions, parameter hints and prefix completion
//
// Insertion order is the order `help` lists commands in.

use anyhow::{bail, Result};

use super::command::{self, ArgParser};

/// Command definition with description and argument parser
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// Command name, lowercase (e.g., "clear")
    pub name: &'static str,

    /// Optional parameter syntax (e.g., "[--history]", "[name]")
    pub params: Option<&'static str>,

    /// Human-readable description
    pub description: &'static str,

    /// Turns the argument list into a typed command
    pub parse: ArgParser,
}

impl CommandSpec {
    /// Get full command syntax (name + params)
    pub fn full_syntax(&self) -> String {
        if let Some(params) = self.params {
            format!("{} {}", self.name, params)
        } else {
            self.name.to_string()
        }
    }
}

/// Outcome of tab completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    NoMatch,
    Unique(&'static str),
    Ambiguous(Vec<&'static str>),
}

pub struct CommandRegistry {
    commands: Vec<CommandSpec>,
}

impl CommandRegistry {
    /// Registry holding the built-in command set
    pub fn new() -> Self {
        let builtins: &[(&'static str, Option<&'static str>, &'static str, ArgParser)] = &[
            ("help", None, "Show available commands", command::parse_help),
            (
                "clear",
                Some("[--history]"),
                "Clear the screen, or the command history with --history",
                command::parse_clear,
            ),
            ("theme", Some("[name]"), "List colour themes or switch to one", command::parse_theme),
            ("history", None, "List previously entered commands", command::parse_history),
            ("projects", None, "Recently updated GitHub repositories", command::parse_projects),
            ("cp", None, "Codeforces rank and rating", command::parse_cp),
            ("stats", None, "Most used languages on GitHub", command::parse_stats),
            ("kaggle", None, "Kaggle profile", command::parse_kaggle),
            ("research", None, "arXiv publications", command::parse_research),
            ("resume", None, "Resume", command::parse_resume),
            ("contact", None, "Email and social links", command::parse_contact),
            ("experience", None, "Work experience", command::parse_experience),
            (
                "mount",
                Some("[cartridge]"),
                "Insert a media cartridge (Esc ejects)",
                command::parse_mount,
            ),
            ("eject", None, "Eject the mounted cartridge", command::parse_eject),
            ("sudo", Some("<command>"), "Run a command as root", command::parse_sudo),
        ];

        Self {
            commands: builtins
                .iter()
                .map(|&(name, params, description, parse)| CommandSpec {
                    name,
                    params,
                    description,
                    parse,
                })
                .collect(),
        }
    }

    /// Registry with no commands
    pub fn empty() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Add a command; names must be lowercase and unique
    pub fn register(&mut self, spec: CommandSpec) -> Result<()> {
        if spec.name.is_empty() || spec.name.contains(char::is_whitespace) {
            bail!("Invalid command name '{}'", spec.name);
        }
        if spec.name != spec.name.to_lowercase() {
            bail!("Command name '{}' must be lowercase", spec.name);
        }
        if self.resolve(spec.name).is_some() {
            bail!("Command '{}' is already registered", spec.name);
        }
        self.commands.push(spec);
        Ok(())
    }

    /// Case-insensitive exact lookup
    pub fn resolve(&self, name: &str) -> Option<&CommandSpec> {
        let name = name.to_lowercase();
        self.commands.iter().find(|cmd| cmd.name == name)
    }

    /// Get all commands matching a prefix
    pub fn match_prefix(&self, prefix: &str) -> Vec<&CommandSpec> {
        if prefix.is_empty() {
            return Vec::new();
        }

        let prefix_lower = prefix.to_lowercase();

        self.commands
            .iter()
            .filter(|cmd| cmd.name.starts_with(&prefix_lower))
            .collect()
    }

    pub fn complete(&self, partial: &str) -> Completion {
        let matches = self.match_prefix(partial);
        match matches.as_slice() {
            [] => Completion::NoMatch,
            [only] => Completion::Unique(only.name),
            many => Completion::Ambiguous(many.iter().map(|cmd| cmd.name).collect()),
        }
    }

    /// Get all commands, in registration order
    pub fn all_commands(&self) -> &[CommandSpec] {
        &self.commands
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
