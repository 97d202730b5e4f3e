//! Print dispatch
//!
//! The batch loop hands each file to a [`Printer`]. [`SystemPrinter`] runs
//! the operating system's print command for the file and waits for it to
//! exit; it does not track the job once the spooler has accepted it.

use std::ffi::{OsStr, OsString};
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStderr, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::debug;
use wait_timeout::ChildExt;
use crate::error::{Error, Result};

/// Something that accepts one file per print attempt
pub trait Printer {
    /// Submit `path` for printing, returning once the submission finished
    fn submit(&mut self, path: &Path) -> Result<()>;
}

/// Which program a [`SystemPrinter`] runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// The platform print verb: `Start-Process -Verb Print` on Windows,
    /// `lp` everywhere else
    Default,
    /// A program run as `program args... <path>`
    Program {
        program: OsString,
        args: Vec<OsString>,
    },
}

/// Prints files by running an external command
#[derive(Debug, Clone)]
pub struct SystemPrinter {
    /// Program to run for each file
    pub invocation: Invocation,
    /// Kill the command if it runs longer than this
    pub timeout: Option<Duration>,
}

impl Default for SystemPrinter {
    fn default() -> Self {
        Self {
            invocation: Invocation::Default,
            timeout: None,
        }
    }
}

impl SystemPrinter {
    /// Run `program args... <path>` instead of the platform print verb
    pub fn program<S, I, A>(program: S, args: I) -> Self
    where
        S: AsRef<OsStr>,
        I: IntoIterator<Item = A>,
        A: AsRef<OsStr>,
    {
        Self {
            invocation: Invocation::Program {
                program: program.as_ref().to_os_string(),
                args: args.into_iter().map(|a| a.as_ref().to_os_string()).collect(),
            },
            timeout: None,
        }
    }

    /// Set the per-file timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the command that prints `path`
    pub fn command(&self, path: &Path) -> Command {
        match &self.invocation {
            Invocation::Default => default_command(path),
            Invocation::Program { program, args } => {
                let mut command = Command::new(program);
                command.args(args).arg(path);
                command
            }
        }
    }
}

impl Printer for SystemPrinter {
    fn submit(&mut self, path: &Path) -> Result<()> {
        let mut command = self.command(path);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let program = command.get_program().to_string_lossy().into_owned();

        debug!(program = %program, path = %path.display(), "running print command");
        let mut child = command.spawn()?;

        // Drain stderr while the command runs so a chatty program can't fill
        // the pipe and block
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let status = match self.timeout {
            Some(timeout) => wait_with_timeout(&mut child, path, timeout)?,
            None => child.wait()?,
        };

        if status.success() {
            return Ok(());
        }

        let stderr = stderr_reader
            .and_then(|reader| reader.join().ok())
            .unwrap_or_default();

        Err(Error::PrintCommand {
            program,
            status,
            stderr,
        })
    }
}

/// Read a child's stderr to the end on a helper thread
fn spawn_reader(mut pipe: ChildStderr) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        // Best effort; the exit status is the real error
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

/// Wait for `child`, killing it once `timeout` has passed
///
/// On timeout the stderr reader is left to finish on its own: a grandchild
/// of the killed command may still hold the pipe open.
fn wait_with_timeout(child: &mut Child, path: &Path, timeout: Duration) -> Result<ExitStatus> {
    match child.wait_timeout(timeout)? {
        Some(status) => Ok(status),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(Error::PrintTimeout {
                path: path.to_path_buf(),
                timeout,
            })
        }
    }
}

#[cfg(target_os = "windows")]
fn default_command(path: &Path) -> Command {
    let script = format!(
        "Start-Process -FilePath {} -Verb Print",
        powershell_quote(&path.to_string_lossy())
    );
    let mut command = Command::new("powershell");
    command.args(["-NoProfile", "-NonInteractive", "-Command", script.as_str()]);
    command
}

#[cfg(not(target_os = "windows"))]
fn default_command(path: &Path) -> Command {
    let mut command = Command::new("lp");
    command.arg(path);
    command
}

/// Quote a string as a PowerShell single-quoted literal
pub fn powershell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_powershell_quote_doubles_single_quotes() {
        assert_eq!(powershell_quote("report 1.pdf"), "'report 1.pdf'");
        assert_eq!(powershell_quote("Bob's notes.pdf"), "'Bob''s notes.pdf'");
    }

    #[test]
    fn test_program_invocation_appends_path() {
        let printer = SystemPrinter::program("lpr", ["-P", "office"]);
        let command = printer.command(Path::new("a 1.pdf"));
        assert_eq!(command.get_program(), "lpr");
        let args: Vec<&OsStr> = command.get_args().collect();
        assert_eq!(
            args,
            vec![OsStr::new("-P"), OsStr::new("office"), OsStr::new("a 1.pdf")]
        );
    }

    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_default_invocation_uses_lp() {
        let command = SystemPrinter::default().command(Path::new("a.pdf"));
        assert_eq!(command.get_program(), "lp");
        assert_eq!(command.get_args().collect::<Vec<_>>(), vec![OsStr::new("a.pdf")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_command() {
        let mut printer = SystemPrinter::program("sh", ["-c", "exit 0", "sh"]);
        assert!(printer.submit(Path::new("a.pdf")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_reports_stderr() {
        let mut printer = SystemPrinter::program(
            "sh",
            ["-c", "echo no default destination >&2; exit 3", "sh"],
        );
        let err = printer.submit(Path::new("a.pdf")).unwrap_err();
        match err {
            Error::PrintCommand { program, status, stderr } => {
                assert_eq!(program, "sh");
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr.trim(), "no default destination");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_command_receives_path_as_last_argument() {
        let mut printer =
            SystemPrinter::program("sh", ["-c", "test \"$1\" = 'report 2.pdf'", "sh"]);
        assert!(printer.submit(Path::new("report 2.pdf")).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_command_times_out() {
        let mut printer = SystemPrinter::program("sh", ["-c", "sleep 5", "sh"])
            .with_timeout(Some(Duration::from_millis(200)));
        let start = Instant::now();
        let err = printer.submit(Path::new("slow.pdf")).unwrap_err();
        assert!(matches!(err, Error::PrintTimeout { .. }));
        assert!(start.elapsed() < Duration::from_secs(4));
    }

    /// Writes well past a pipe buffer to stderr, then fails
    #[cfg(unix)]
    const FLOOD_STDERR: &str = "yes 'paper jam' | head -c 200000 >&2; exit 1";

    #[cfg(unix)]
    #[test]
    fn test_large_stderr_does_not_block_without_timeout() {
        let mut printer = SystemPrinter::program("sh", ["-c", FLOOD_STDERR, "sh"]);
        match printer.submit(Path::new("a.pdf")).unwrap_err() {
            Error::PrintCommand { status, stderr, .. } => {
                assert_eq!(status.code(), Some(1));
                assert_eq!(stderr.len(), 200_000);
                assert!(stderr.starts_with("paper jam\n"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_large_stderr_is_not_reported_as_timeout() {
        let mut printer = SystemPrinter::program("sh", ["-c", FLOOD_STDERR, "sh"])
            .with_timeout(Some(Duration::from_secs(10)));
        let err = printer.submit(Path::new("a.pdf")).unwrap_err();
        assert!(matches!(err, Error::PrintCommand { .. }), "unexpected error: {err}");
    }

    #[test]
    fn test_missing_program_is_io_error() {
        let mut printer =
            SystemPrinter::program("pdf-batch-print-no-such-program", Vec::<&str>::new());
        assert!(matches!(printer.submit(Path::new("a.pdf")), Err(Error::Io(_))));
    }
}
