//! Command-line parsing and escaping
//!
//! A [`CommandLine`] is an immutable argv0 plus argument list. Parsing
//! defers to the OS tokenizer so the grammar matches what a spawned child
//! would actually receive; escaping implements the inverse grammar.

mod escape;

use std::fmt;

use crate::core::types::{ProcessError, ProcessResult};
use crate::windows::bindings::{kernel32, shell32};

const TOKEN_SEP: char = ' ';

/// An executable path plus its argument list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    argv0: String,
    args: Vec<String>,
}

impl CommandLine {
    /// Build from a full argv vector; the first element becomes argv0
    pub fn new(argv: Vec<String>) -> ProcessResult<Self> {
        let mut argv = argv.into_iter();
        let argv0 = argv.next().ok_or(ProcessError::EmptyArgv)?;
        Ok(CommandLine {
            argv0,
            args: argv.collect(),
        })
    }

    /// Build from an explicit argv0 and argument list
    pub fn with_args<S1, S2>(argv0: S1, args: impl IntoIterator<Item = S2>) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
    {
        CommandLine {
            argv0: argv0.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The command line this process was started with
    pub fn query() -> ProcessResult<Self> {
        Self::parse(&kernel32::command_line())
    }

    /// Tokenize a single command-line string with the OS quoting grammar
    ///
    /// Fails with [`ProcessError::MalformedCommandLine`] on empty or
    /// whitespace-only input and on input that tokenizes to nothing.
    pub fn parse(src: &str) -> ProcessResult<Self> {
        let src = src.trim();
        if src.is_empty() {
            return Err(ProcessError::MalformedCommandLine(
                "command line cannot be an empty string".to_string(),
            ));
        }

        let tokens = shell32::command_line_to_argv(src)?;
        if tokens.is_empty() {
            return Err(ProcessError::MalformedCommandLine(
                "command line must contain at least one token".to_string(),
            ));
        }

        Self::new(tokens)
    }

    /// Quote one token for the process loader's command-line grammar
    pub fn escape(arg: &str) -> String {
        escape::escape(arg)
    }

    /// Quote one token for interpolation into a cmd.exe command string
    pub fn escape_cmd(arg: &str) -> String {
        escape::escape_cmd(arg)
    }

    /// The executable token
    pub fn argv0(&self) -> &str {
        &self.argv0
    }

    /// The arguments, argv0 excluded
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The full argv vector, argv0 included
    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(self.argv0.clone());
        argv.extend(self.args.iter().cloned());
        argv
    }

    /// Escaped arguments joined with single spaces, argv0 omitted
    pub fn args_to_string(&self) -> String {
        self.escaped_args().join(&TOKEN_SEP.to_string())
    }

    fn escaped_args(&self) -> Vec<String> {
        self.args.iter().map(|arg| Self::escape(arg)).collect()
    }
}

impl fmt::Display for CommandLine {
    /// The whole command line, every token escaped, space-separated
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Self::escape(&self.argv0))?;
        for arg in &self.args {
            write!(f, "{}{}", TOKEN_SEP, Self::escape(arg))?;
        }
        Ok(())
    }
}
