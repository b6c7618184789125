//! Process creation and lifecycle management
//!
//! [`Process`] owns the handle of a child (or attached) process and exposes
//! wait, terminate and exit-code queries. Creation goes through either the
//! OS process loader ([`Process::create`]) or the shell-execute facility
//! ([`Process::shell`]).

mod io;
mod params;
mod spawn;

pub use io::{Stream, IO};
pub use params::{ConsoleMode, ProcessAccess, ProcessParameters, ShellParameters};

use std::fmt;
use tracing::debug;
use winapi::shared::winerror::WAIT_TIMEOUT;
use winapi::um::minwinbase::STILL_ACTIVE;
use winapi::um::winbase::{INFINITE, WAIT_FAILED, WAIT_OBJECT_0};

use crate::cmd_line::CommandLine;
use crate::core::types::{ExitCode, ProcessError, ProcessId, ProcessResult};
use crate::windows::bindings::kernel32;
use crate::windows::types::Handle;

/// An owned reference to an OS process
pub struct Process {
    id: ProcessId,
    handle: Handle,
}

impl Process {
    /// Spawn a child through the OS process loader
    ///
    /// The command line is escaped into a single writable wide buffer; any
    /// redirect handles are wired into the startup structure and the
    /// parent's copies are closed once the child exists. Accepts a bare
    /// [`CommandLine`] or full [`ProcessParameters`].
    pub fn create(params: impl Into<ProcessParameters>) -> ProcessResult<Self> {
        let mut params = params.into();
        let (handle, id) = spawn::create_process(&mut params)?;
        Ok(Process { id, handle })
    }

    /// Launch through the shell-execute facility
    ///
    /// Accepts a bare [`CommandLine`] or full [`ShellParameters`]. No
    /// standard-handle redirection on this path; only the console policy
    /// applies.
    pub fn shell(params: impl Into<ShellParameters>) -> ProcessResult<Self> {
        let handle = spawn::shell_execute(&params.into())?;
        let id = kernel32::process_id(handle.raw())?;
        Ok(Process { id, handle })
    }

    /// Launch elevated via the "runas" verb
    pub fn runas(cmd_line: CommandLine) -> ProcessResult<Self> {
        Self::shell(ShellParameters::runas(cmd_line))
    }

    /// Attach to an existing process by ID
    pub fn open(id: ProcessId, access: ProcessAccess) -> ProcessResult<Self> {
        let handle = Handle::new(kernel32::open_process(id, access.value())?);
        Ok(Process { id, handle })
    }

    /// Attach to an existing process for status and memory-read queries
    pub fn open_r(id: ProcessId) -> ProcessResult<Self> {
        Self::open(
            id,
            ProcessAccess::combine(&[ProcessAccess::QUERY_INFORMATION, ProcessAccess::VM_READ]),
        )
    }

    /// The calling process, via its pseudo-handle
    ///
    /// The pseudo-handle takes no extra OS reference and is never closed.
    pub fn current() -> Self {
        Process {
            id: kernel32::current_process_id(),
            handle: Handle::new(kernel32::current_process()),
        }
    }

    /// The process ID
    pub fn id(&self) -> ProcessId {
        self.id
    }

    /// The owned process handle
    pub fn handle(&self) -> &Handle {
        &self.handle
    }

    /// Poll whether the process is still alive
    ///
    /// A zero-timeout wait: signalled means exited, timeout means running.
    pub fn is_running(&self) -> ProcessResult<bool> {
        match kernel32::wait_for_single_object(self.handle.raw(), 0) {
            WAIT_OBJECT_0 => Ok(false),
            WAIT_TIMEOUT => Ok(true),
            WAIT_FAILED => Err(ProcessError::system("WaitForSingleObject")),
            other => Err(ProcessError::custom("WaitForSingleObject", other)),
        }
    }

    /// Block until the process exits
    pub fn wait(&self) -> ProcessResult<()> {
        match kernel32::wait_for_single_object(self.handle.raw(), INFINITE) {
            WAIT_OBJECT_0 => Ok(()),
            WAIT_FAILED => Err(ProcessError::system("WaitForSingleObject")),
            other => Err(ProcessError::custom("WaitForSingleObject", other)),
        }
    }

    /// Ask the OS to terminate the process with the given exit code
    pub fn terminate(&self, exit_code: ExitCode) -> ProcessResult<()> {
        debug!(pid = self.id, exit_code, "terminating process");
        kernel32::terminate_process(self.handle.raw(), exit_code)
    }

    /// Terminate, then wait for the exit to complete
    ///
    /// For children whose stdin is not available for a cooperative shutdown.
    pub fn shut_down(&self, exit_code: ExitCode) -> ProcessResult<()> {
        self.terminate(exit_code)?;
        self.wait()
    }

    /// The process's exit code
    ///
    /// Fails with [`ProcessError::StillRunning`] while the process is alive;
    /// the OS reserves a sentinel code to report that state.
    pub fn exit_code(&self) -> ProcessResult<ExitCode> {
        let code = kernel32::exit_code_process(self.handle.raw())?;
        if code == STILL_ACTIVE {
            return Err(ProcessError::StillRunning);
        }
        Ok(code)
    }

    /// Full path of the process's executable image
    pub fn exe_path(&self) -> ProcessResult<String> {
        if self.handle.raw() == kernel32::current_process() {
            spawn::current_exe_path()
        } else {
            spawn::exe_path(&self.handle)
        }
    }
}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process")
            .field("id", &self.id)
            .field("handle", &self.handle)
            .finish()
    }
}
