//! Interactive credential prompts.
//!
//! The username is read as a plain line; the password is read without echo
//! through `rpassword` when attached to a terminal. Both prompts block until
//! the operator answers. There is no timeout.

use dbprobe_core::{CredentialSource, DbProbeError, RawCredentials, Result};
use std::io::{self, BufRead, IsTerminal, Write};

/// Prompt shown before reading the username.
pub const USERNAME_PROMPT: &str = "Enter username: ";
/// Prompt shown before reading the password.
pub const PASSWORD_PROMPT: &str = "Enter password: ";

/// How the password is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordInput {
    /// Read from the controlling terminal with echo disabled
    Masked,
    /// Read as a plain line from the same input as the username
    Plain,
}

impl PasswordInput {
    /// Masked input needs a terminal; piped or detached stdin falls back to
    /// reading the password as a plain line.
    fn for_stdin(stdin_is_terminal: bool) -> Self {
        if stdin_is_terminal {
            Self::Masked
        } else {
            Self::Plain
        }
    }
}

/// Credential source that asks an operator, one prompt after the other.
pub struct PromptCredentialSource<R, W> {
    input: R,
    output: W,
    password_input: PasswordInput,
}

impl PromptCredentialSource<io::StdinLock<'static>, io::Stderr> {
    /// Prompts on stderr and reads the username from stdin.
    ///
    /// The password is read from the terminal without echo when stdin is a
    /// terminal, otherwise as the next line of stdin.
    pub fn terminal() -> Self {
        let stdin = io::stdin();
        let password_input = PasswordInput::for_stdin(stdin.is_terminal());
        Self {
            input: stdin.lock(),
            output: io::stderr(),
            password_input,
        }
    }
}

impl<R: BufRead, W: Write> PromptCredentialSource<R, W> {
    /// Prompts on `output` and reads both values as lines from `input`.
    ///
    /// Used for scripted input and tests; the password is not masked.
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            password_input: PasswordInput::Plain,
        }
    }

    /// Consumes the source and returns the prompt output.
    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, text: &str) -> Result<()> {
        write!(self.output, "{text}")
            .and_then(|()| self.output.flush())
            .map_err(|e| DbProbeError::prompt_failed("writing prompt", e))
    }

    fn read_password(&mut self) -> Result<Option<String>> {
        match self.password_input {
            PasswordInput::Plain => {
                self.prompt(PASSWORD_PROMPT)?;
                read_line_value(&mut self.input)
                    .map_err(|e| DbProbeError::prompt_failed("reading password", e))
            }
            PasswordInput::Masked => match rpassword::prompt_password(PASSWORD_PROMPT) {
                Ok(password) => Ok(Some(password)),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(None),
                Err(e) => Err(DbProbeError::prompt_failed("reading password", e)),
            },
        }
    }
}

impl<R: BufRead, W: Write> CredentialSource for PromptCredentialSource<R, W> {
    fn read_credentials(&mut self) -> Result<RawCredentials> {
        self.prompt(USERNAME_PROMPT)?;
        let username = read_line_value(&mut self.input)
            .map_err(|e| DbProbeError::prompt_failed("reading username", e))?;

        // No password prompt once input has ended
        if username.is_none() {
            return Ok(RawCredentials::default());
        }

        let password = self.read_password()?;

        Ok(RawCredentials { username, password })
    }
}

/// Reads one line, without its line terminator.
///
/// Returns `None` at end of input. Only `\n` or `\r\n` is removed; other
/// whitespace is part of the value and left for validation to judge.
pub fn read_line_value(input: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }

    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Some(line))
}
