//! External process execution.
//!
//! Every external tool the pipeline touches (the minifier, the preprocessor
//! compilers, the self-updater) goes through [`Cmd`]:
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! // Minify a batch of scripts
//! Cmd::new("java").args(["-jar", jar, "-o", ".js$:.js"]).args(&files).run()?;
//!
//! // Compile a stylesheet source read from stdin
//! let output = Cmd::from_slice(&["sass", "--stdin"]).cwd(dir).stdin(source).run()?;
//!
//! // Let the updater draw its own progress
//! Cmd::from_slice(&command).pty(true).run()?;
//! ```
//!
//! There is no timeout: a child is awaited until it exits.

use crate::log;
use anyhow::{Context, Result, anyhow, bail};
use portable_pty::{CommandBuilder, NativePtySystem, PtySize, PtySystem};
use regex::Regex;
use std::{
    ffi::{OsStr, OsString},
    io::{Read, Write},
    path::{Path, PathBuf},
    process::{Command, ExitStatus, Output, Stdio},
    sync::OnceLock,
};

// ============================================================================
// Builder API
// ============================================================================

/// Builder for one external process invocation.
#[derive(Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    stdin_data: Option<Vec<u8>>,
    use_pty: bool,
    filter: Option<&'static FilterRule>,
}

impl Cmd {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Build from a configured command line (`["sass", "--stdin"]`).
    ///
    /// The first element is the program; an empty slice yields an empty
    /// program name, which fails at spawn time.
    pub fn from_slice<S: AsRef<OsStr>>(cmd: &[S]) -> Self {
        let (program, rest) = match cmd.split_first() {
            Some((first, rest)) => (first.as_ref().to_owned(), rest),
            None => (OsString::new(), &[][..]),
        };
        Self::new(program).args(rest)
    }

    /// Add a single argument. Empty arguments are dropped.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        let arg = arg.as_ref();
        if !arg.is_empty() {
            self.args.push(arg.to_owned());
        }
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        for arg in args {
            self = self.arg(arg);
        }
        self
    }

    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_owned());
        self
    }

    /// Pipe `data` to the child's stdin and capture stdout.
    pub fn stdin<D: AsRef<[u8]>>(mut self, data: D) -> Self {
        self.stdin_data = Some(data.as_ref().to_vec());
        self
    }

    /// Run inside a pseudo-terminal so the child renders as in a real shell.
    pub fn pty(mut self, enable: bool) -> Self {
        self.use_pty = enable;
        self
    }

    /// Set the rule used to log the child's diagnostic output.
    pub fn filter(mut self, filter: &'static FilterRule) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Execute and wait. A nonzero exit status is an error.
    pub fn run(mut self) -> Result<Output> {
        let filter = self.filter.unwrap_or(&EMPTY_FILTER);

        match self.stdin_data.take() {
            Some(data) => self.run_with_stdin(data, filter),
            None if self.use_pty => self.run_with_pty(filter),
            None => self.run_simple(filter),
        }
    }

    fn program_name(&self) -> String {
        self.program.to_string_lossy().to_string()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn run_simple(self, filter: &'static FilterRule) -> Result<Output> {
        let name = self.program_name();
        let output = self
            .command()
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        log_output(&name, &output, filter)?;
        Ok(output)
    }

    fn run_with_stdin(self, data: Vec<u8>, filter: &'static FilterRule) -> Result<Output> {
        let name = self.program_name();
        let mut child = self
            .command()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn `{name}`"))?;

        // Dropping the handle closes the pipe so the child sees EOF
        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(&data)
                .with_context(|| format!("Failed to write stdin to `{name}`"))?;
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for `{name}`"))?;

        log_output(&name, &output, filter)?;
        Ok(output)
    }

    fn run_with_pty(self, filter: &'static FilterRule) -> Result<Output> {
        let name = self.program_name();

        let mut builder = CommandBuilder::new(&self.program);
        builder.args(&self.args);
        if let Some(dir) = &self.cwd {
            builder.cwd(dir);
        }

        let pair = NativePtySystem::default().openpty(PtySize {
            rows: 24,
            cols: 80,
            pixel_width: 0,
            pixel_height: 0,
        })?;

        let mut child = pair
            .slave
            .spawn_command(builder)
            .with_context(|| format!("Failed to spawn `{name}`"))?;
        drop(pair.slave);

        // The master blocks until EOF, so drain it on its own thread
        let mut reader = pair.master.try_clone_reader()?;
        let drain = std::thread::spawn(move || {
            let mut captured = String::new();
            let _ = reader.read_to_string(&mut captured);
            captured
        });

        let status = child.wait()?;
        drop(pair.master);

        let captured = drain
            .join()
            .map_err(|_| anyhow!("Failed to join output reader of `{name}`"))?;

        if !status.success() {
            bail!("Command `{name}` failed: {status:?}\n{captured}");
        }
        filter.log(&name, &captured);

        Ok(Output {
            status: exit_status(status.exit_code()),
            stdout: captured.into_bytes(),
            stderr: Vec::new(),
        })
    }
}

#[cfg(unix)]
#[allow(clippy::cast_possible_wrap)]
fn exit_status(code: u32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw((code as i32) << 8)
}

#[cfg(windows)]
fn exit_status(code: u32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code)
}

// ============================================================================
// Output Filtering
// ============================================================================

/// Which lines of a child's diagnostic output get logged.
pub struct FilterRule {
    /// Lines starting with any of these are dropped.
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Log the lines of `output` that pass the filter under `name`.
    pub fn log(&self, name: &str, output: &str) {
        let lines: Vec<_> = output
            .lines()
            .filter(|line| !self.should_skip(strip_ansi(line).trim()))
            .collect();

        if !lines.is_empty() {
            log!(name; "{}", lines.join("\n"));
        }
    }
}

/// Log everything.
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

/// Log nothing.
pub const SILENT_FILTER: FilterRule = FilterRule::new(&[""]);

// ============================================================================
// Helpers
// ============================================================================

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").unwrap());
    re.replace_all(s, "")
}

fn log_output(name: &str, output: &Output, filter: &'static FilterRule) -> Result<()> {
    if !output.status.success() {
        bail!(format_error(name, output));
    }

    let stderr = String::from_utf8_lossy(&output.stderr);
    filter.log(name, stderr.trim());
    Ok(())
}

/// Failure message carrying the tool's own diagnostics.
fn format_error(name: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{name}` failed with {}", output.status);
    let stderr = stderr.trim();
    if !stderr.is_empty() {
        msg.push('\n');
        msg.push_str(stderr);
    }
    let stdout = stdout.trim();
    if !stdout.is_empty() {
        msg.push_str("\nStdout:\n");
        msg.push_str(stdout);
    }
    msg
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cmd_builder() {
        let cmd = Cmd::new("java")
            .arg("-jar")
            .args(["yui.jar", "-o"])
            .cwd("/tmp");

        assert_eq!(cmd.program, OsString::from("java"));
        assert_eq!(cmd.args.len(), 3);
        assert_eq!(cmd.cwd, Some(PathBuf::from("/tmp")));
    }

    #[test]
    fn test_from_slice_splits_program() {
        let cmd = Cmd::from_slice(&["sass", "--stdin", "--no-source-map"]);
        assert_eq!(cmd.program, OsString::from("sass"));
        assert_eq!(cmd.args, vec![OsString::from("--stdin"), OsString::from("--no-source-map")]);

        let empty: [&str; 0] = [];
        let cmd = Cmd::from_slice(&empty);
        assert!(cmd.program.is_empty());
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_empty_args_filtered() {
        let cmd = Cmd::new("echo").arg("").args(["a", "", "b"]);
        assert_eq!(cmd.args.len(), 2);
    }

    #[test]
    fn test_filter_rule() {
        let filter = FilterRule::new(&["WARN:", "DEPRECATION"]);
        assert!(filter.should_skip("WARN: something"));
        assert!(filter.should_skip("DEPRECATION WARNING"));
        assert!(!filter.should_skip("ERROR: something"));
        assert!(filter.should_skip(""));
        assert!(SILENT_FILTER.should_skip("anything"));
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_ansi("Plain text"), "Plain text");
    }

    #[cfg(unix)]
    #[test]
    fn test_simple_command() {
        let output = Cmd::new("echo").arg("hello").run().unwrap();
        assert!(output.status.success());
        assert!(String::from_utf8_lossy(&output.stdout).contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_pipe() {
        let output = Cmd::new("cat").stdin(b"a { color: red }").run().unwrap();
        assert!(output.status.success());
        assert_eq!(output.stdout, b"a { color: red }");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_error() {
        let err = Cmd::new("sh").args(["-c", "echo broken >&2; exit 3"]).run().unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("`sh` failed"));
        assert!(msg.contains("broken"));
    }

    #[test]
    fn test_missing_program_is_error() {
        assert!(Cmd::new("train-no-such-program-xyz").run().is_err());
    }
}
