//! Purpose: Run an external decoder process and read its tree document from stdout.
//! Exports: `ExecLoader`.
//! Role: Plug-in point for native FSD decoders that cannot be linked into this binary.
//! Invariants: The child gets the resolved input path as its only argument.
//! Invariants: stdin is closed and stderr is inherited, so decoder diagnostics reach the user.
//! Invariants: A non-zero exit is a loader failure even if stdout parses.
use std::path::Path;
use std::process::{Command, Stdio};

use crate::core::error::{Error, ErrorKind};
use crate::core::value::FsdValue;

use super::EXEC_PREFIX;
use super::tree::parse_tree;

pub struct ExecLoader {
    name: String,
    program: String,
}

impl ExecLoader {
    pub fn new(program: impl Into<String>) -> Self {
        let program = program.into();
        Self {
            name: format!("{EXEC_PREFIX}{program}"),
            program,
        }
    }
}

impl super::Loader for ExecLoader {
    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> &str {
        "run an external decoder that prints a tree document on stdout"
    }

    fn load(&self, input: &Path) -> Result<FsdValue, Error> {
        tracing::debug!(program = %self.program, input = %input.display(), "spawning decoder");
        let output = Command::new(&self.program)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|err| {
                Error::new(ErrorKind::Loader)
                    .with_message(format!("failed to run decoder `{}`", self.program))
                    .with_hint("Check that the program exists and is executable.")
                    .with_source(err)
            })?;

        if !output.status.success() {
            return Err(Error::new(ErrorKind::Loader)
                .with_message(format!(
                    "decoder `{}` exited with {}",
                    self.program, output.status
                ))
                .with_path(input));
        }

        tracing::debug!(bytes = output.stdout.len(), "decoder finished");
        parse_tree(&output.stdout, "loader.exec").map_err(|err| err.with_path(input))
    }
}
