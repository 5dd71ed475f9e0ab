// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inspection of code signatures via Apple's `codesign` tool.

use {
    crate::error::BlessError,
    log::debug,
    std::{
        ffi::OsString,
        fmt::{Display, Formatter},
        path::{Path, PathBuf},
    },
};

/// Prefix of the single line `codesign -d -r -` prints for a designated requirement.
pub const DESIGNATED_PREFIX: &str = "designated => ";

/// The role a binary plays in the SMJobBless relationship.
///
/// Only used to qualify error messages.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgramKind {
    App,
    Tool,
}

impl Display for ProgramKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::App => "app",
            Self::Tool => "tool",
        })
    }
}

/// Something that can validate code signatures and read designated requirements.
pub trait SignatureInspector {
    /// Verify the code signature of the binary or bundle at `path`.
    fn verify_signature(&self, path: &Path, kind: ProgramKind) -> Result<(), BlessError>;

    /// Obtain the designated requirement of the binary or bundle at `path`.
    ///
    /// The returned string is the requirement expression without the
    /// `designated => ` prefix.
    fn designated_requirement(&self, path: &Path, kind: ProgramKind)
        -> Result<String, BlessError>;
}

/// Extract the designated requirement from `codesign -d -r -` output.
///
/// The output must consist of exactly one line starting with
/// [DESIGNATED_PREFIX]. Anything else is reported as a malformed requirement
/// for `path`.
pub fn parse_designated_requirement(
    output: &str,
    path: &Path,
    kind: ProgramKind,
) -> Result<String, BlessError> {
    let mut lines = output.lines();

    match (lines.next(), lines.next()) {
        (Some(line), None) => line
            .strip_prefix(DESIGNATED_PREFIX)
            .map(|req| req.to_string())
            .ok_or_else(|| BlessError::RequirementMalformed(kind, path.to_path_buf())),
        _ => Err(BlessError::RequirementMalformed(kind, path.to_path_buf())),
    }
}

/// A [SignatureInspector] that invokes a `codesign` executable.
#[derive(Clone, Debug)]
pub struct CodesignTool {
    executable: PathBuf,
}

impl CodesignTool {
    /// Construct an instance using an explicit `codesign` executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Construct an instance by locating `codesign` on `PATH`.
    pub fn find() -> Result<Self, BlessError> {
        let executable = which::which("codesign").map_err(BlessError::CodesignNotFound)?;

        Ok(Self::new(executable))
    }

    /// The `codesign` executable being invoked.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    fn command(&self, args: &[&str], path: &Path) -> duct::Expression {
        let mut argv = args.iter().map(OsString::from).collect::<Vec<_>>();
        argv.push(path.as_os_str().to_os_string());

        debug!("invoking {} with args: {:?}", self.executable.display(), argv);

        duct::cmd(self.executable.as_path(), argv)
    }
}

impl SignatureInspector for CodesignTool {
    fn verify_signature(&self, path: &Path, kind: ProgramKind) -> Result<(), BlessError> {
        let output = self
            .command(&["-v", "-v"], path)
            .stdout_null()
            .stderr_null()
            .unchecked()
            .run()
            .map_err(BlessError::CodesignExec)?;

        if output.status.success() {
            Ok(())
        } else {
            Err(BlessError::SignatureInvalid(kind, path.to_path_buf()))
        }
    }

    fn designated_requirement(
        &self,
        path: &Path,
        kind: ProgramKind,
    ) -> Result<String, BlessError> {
        let output = self
            .command(&["-d", "-r", "-"], path)
            .stdout_capture()
            .stderr_null()
            .unchecked()
            .run()
            .map_err(BlessError::CodesignExec)?;

        if !output.status.success() {
            return Err(BlessError::RequirementUnreadable(kind, path.to_path_buf()));
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| BlessError::RequirementMalformed(kind, path.to_path_buf()))?;

        let req = parse_designated_requirement(&stdout, path, kind)?;
        debug!("{} designated requirement: {}", path.display(), req);

        Ok(req)
    }
}
