use std::fmt;
use std::time::Duration;

use crate::error::{Error, Result};

/// A fully described external command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Executable name or path
    pub program: String,
    /// Ordered arguments
    pub args: Vec<String>,
    /// Wall-clock bound (None = wait forever)
    pub timeout: Option<Duration>,
    /// Treat a non-zero exit code as an error
    pub check: bool,
    /// Let the child write straight to our terminal instead of capturing
    pub stream_output: bool,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout: None,
            check: false,
            stream_output: false,
        }
    }

    /// Build a spec from a full argv; the first element is the program.
    pub fn from_argv<S: AsRef<str>>(argv: &[S]) -> Result<Self> {
        let (program, args) = argv.split_first().ok_or(Error::EmptyCommand)?;
        if program.as_ref().is_empty() {
            return Err(Error::EmptyCommand);
        }
        Ok(Self::new(program.as_ref(), args.iter().map(|a| a.as_ref().to_string())))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn checked(mut self) -> Self {
        self.check = true;
        self
    }

    pub fn streaming(mut self) -> Self {
        self.stream_output = true;
        self
    }

    /// Same arguments, different executable.
    pub fn with_program(&self, program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..self.clone()
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished child process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// -1 when the child was terminated by a signal
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}
