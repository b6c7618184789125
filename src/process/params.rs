//! Process creation parameters

use winapi::shared::minwindef::DWORD;
use winapi::um::winbase::{CREATE_NEW_CONSOLE, CREATE_NO_WINDOW};
use winapi::um::winnt::{PROCESS_QUERY_INFORMATION, PROCESS_VM_READ};

use crate::cmd_line::CommandLine;
use crate::process::io::IO;

/// Console policy for a spawned process
///
/// Child processes can inherit the parent console, meaning they display
/// their output in the same window; if both processes then read stdin,
/// which one receives any given input byte is unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleMode {
    /// Suppress window creation entirely
    None,
    /// Share the parent's console window
    #[default]
    Inherit,
    /// Force a new console window
    New,
}

impl ConsoleMode {
    pub(crate) fn creation_flags(self) -> DWORD {
        match self {
            ConsoleMode::None => CREATE_NO_WINDOW,
            ConsoleMode::Inherit => 0,
            ConsoleMode::New => CREATE_NEW_CONSOLE,
        }
    }
}

/// Everything [`crate::process::Process::create`] needs; consumed by creation
#[derive(Debug)]
pub struct ProcessParameters {
    pub cmd_line: CommandLine,
    pub io: Option<IO>,
    pub console_mode: ConsoleMode,
}

impl ProcessParameters {
    pub fn new(cmd_line: CommandLine) -> Self {
        ProcessParameters {
            cmd_line,
            io: None,
            console_mode: ConsoleMode::default(),
        }
    }

    pub fn with_io(mut self, io: IO) -> Self {
        self.io = Some(io);
        self
    }

    pub fn with_console_mode(mut self, console_mode: ConsoleMode) -> Self {
        self.console_mode = console_mode;
        self
    }
}

impl From<CommandLine> for ProcessParameters {
    fn from(cmd_line: CommandLine) -> Self {
        Self::new(cmd_line)
    }
}

/// Parameters for the shell-execute launch path
///
/// argv0 resolves as the target file, the remaining arguments as a single
/// escaped parameter string. This path cannot redirect standard handles.
#[derive(Debug)]
pub struct ShellParameters {
    pub cmd_line: CommandLine,
    /// Shell verb; "open" when absent
    pub verb: Option<String>,
    pub console_mode: ConsoleMode,
}

impl ShellParameters {
    pub fn new(cmd_line: CommandLine) -> Self {
        ShellParameters {
            cmd_line,
            verb: None,
            console_mode: ConsoleMode::default(),
        }
    }

    /// Launch with the elevation verb
    pub fn runas(cmd_line: CommandLine) -> Self {
        Self::new(cmd_line).with_verb("runas")
    }

    pub fn with_verb(mut self, verb: impl Into<String>) -> Self {
        self.verb = Some(verb.into());
        self
    }

    pub fn with_console_mode(mut self, console_mode: ConsoleMode) -> Self {
        self.console_mode = console_mode;
        self
    }
}

impl From<CommandLine> for ShellParameters {
    fn from(cmd_line: CommandLine) -> Self {
        Self::new(cmd_line)
    }
}

/// Access rights requested when opening an existing process
#[derive(Debug, Clone, Copy)]
pub struct ProcessAccess {
    value: DWORD,
}

impl ProcessAccess {
    /// Status queries only
    pub const QUERY_INFORMATION: Self = Self {
        value: PROCESS_QUERY_INFORMATION,
    };
    /// Read the process's memory
    pub const VM_READ: Self = Self {
        value: PROCESS_VM_READ,
    };

    /// Combine access rights
    pub fn combine(rights: &[Self]) -> Self {
        let mut value = 0;
        for right in rights {
            value |= right.value;
        }
        Self { value }
    }

    /// Get the raw access mask
    pub fn value(&self) -> DWORD {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_mode_flags() {
        assert_eq!(ConsoleMode::None.creation_flags(), CREATE_NO_WINDOW);
        assert_eq!(ConsoleMode::Inherit.creation_flags(), 0);
        assert_eq!(ConsoleMode::New.creation_flags(), CREATE_NEW_CONSOLE);
        assert_eq!(ConsoleMode::default(), ConsoleMode::Inherit);
    }

    #[test]
    fn test_process_access_combine() {
        let combined = ProcessAccess::combine(&[
            ProcessAccess::QUERY_INFORMATION,
            ProcessAccess::VM_READ,
        ]);
        assert_eq!(
            combined.value(),
            PROCESS_QUERY_INFORMATION | PROCESS_VM_READ
        );
    }

    #[test]
    fn test_parameter_builders() {
        let cmd_line = CommandLine::with_args("test.exe", ["a"]);
        let params = ProcessParameters::new(cmd_line.clone()).with_console_mode(ConsoleMode::New);
        assert!(params.io.is_none());
        assert_eq!(params.console_mode, ConsoleMode::New);

        let shell = ShellParameters::runas(cmd_line);
        assert_eq!(shell.verb.as_deref(), Some("runas"));
    }
}
