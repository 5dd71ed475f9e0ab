// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    crate::codesign::ProgramKind,
    std::path::{Path, PathBuf},
    thiserror::Error,
};

/// Unified error type for SMJobBless requirement management.
///
/// [BlessError::CliUsage] represents a malformed command line invocation.
/// Every other variant is a check failure. Most check failures are
/// associated with a filesystem path, available via [BlessError::path].
/// The [std::fmt::Display] implementation renders just the message so
/// callers can prefix it with the path.
#[derive(Debug, Error)]
pub enum BlessError {
    #[error("invalid command line usage")]
    CliUsage,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("app not found")]
    AppNotFound(PathBuf),

    #[error("{0} 'Info.plist' not found")]
    InfoPlistNotFound(ProgramKind, PathBuf),

    #[error("'Info.plist' not readable: {1}")]
    InfoPlistIo(PathBuf, std::io::Error),

    #[error("'Info.plist' not readable: {1}")]
    InfoPlistUnreadable(PathBuf, plist::Error),

    #[error("'Info.plist' root must be a dictionary")]
    InfoPlistNotDictionary(PathBuf),

    #[error("'Info.plist' not writable: {1}")]
    InfoPlistUnwritable(PathBuf, plist::Error),

    #[error("tool directory not found")]
    ToolDirectoryNotFound(PathBuf),

    #[error("tool directory not readable: {1}")]
    ToolDirectoryUnreadable(PathBuf, walkdir::Error),

    #[error("found {found} tools but {expected} tool 'Info.plist' paths were provided")]
    ToolCountMismatch {
        path: PathBuf,
        found: usize,
        expected: usize,
    },

    #[error("'CFBundleIdentifier' not found")]
    BundleIdentifierMissing(PathBuf),

    #[error("no tool found for 'CFBundleIdentifier' {identifier}")]
    ToolNotFound { path: PathBuf, identifier: String },

    #[error("'CFBundleIdentifier' {identifier} already used by another tool 'Info.plist'")]
    DuplicateBundleIdentifier { path: PathBuf, identifier: String },

    #[error("tool not readable: {1}")]
    ToolUnreadable(PathBuf, std::io::Error),

    #[error("{0} code signature invalid")]
    SignatureInvalid(ProgramKind, PathBuf),

    #[error("{0} designated requirement unreadable")]
    RequirementUnreadable(ProgramKind, PathBuf),

    #[error("{0} designated requirement malformed")]
    RequirementMalformed(ProgramKind, PathBuf),

    #[error("codesign executable not found: {0}")]
    CodesignNotFound(which::Error),

    #[error("error running codesign: {0}")]
    CodesignExec(std::io::Error),

    #[error("Mach-O parse error: {1}")]
    MachOParse(PathBuf, goblin::error::Error),

    #[error("tool embedded {1} section not found")]
    EmbeddedPlistMissing(PathBuf, &'static str),

    #[error("tool 'CFBundleIdentifier' does not match tool name")]
    BundleIdentifierMismatch(PathBuf),

    #[error("tool 'SMAuthorizedClients' does not match app designated requirement")]
    AuthorizedClientsMismatch(PathBuf),

    #[error("tool launchd 'Label' does not match tool name")]
    LaunchdLabelMismatch(PathBuf),

    #[error("app 'SMPrivilegedExecutables' does not match tool designated requirements")]
    PrivilegedExecutablesMismatch(PathBuf),
}

impl BlessError {
    /// The filesystem path this error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::CliUsage
            | Self::Io(_)
            | Self::CodesignNotFound(_)
            | Self::CodesignExec(_) => None,
            Self::AppNotFound(path)
            | Self::InfoPlistNotFound(_, path)
            | Self::InfoPlistIo(path, _)
            | Self::InfoPlistUnreadable(path, _)
            | Self::InfoPlistNotDictionary(path)
            | Self::InfoPlistUnwritable(path, _)
            | Self::ToolDirectoryNotFound(path)
            | Self::ToolDirectoryUnreadable(path, _)
            | Self::ToolCountMismatch { path, .. }
            | Self::BundleIdentifierMissing(path)
            | Self::ToolNotFound { path, .. }
            | Self::DuplicateBundleIdentifier { path, .. }
            | Self::ToolUnreadable(path, _)
            | Self::SignatureInvalid(_, path)
            | Self::RequirementUnreadable(_, path)
            | Self::RequirementMalformed(_, path)
            | Self::MachOParse(path, _)
            | Self::EmbeddedPlistMissing(path, _)
            | Self::BundleIdentifierMismatch(path)
            | Self::AuthorizedClientsMismatch(path)
            | Self::LaunchdLabelMismatch(path)
            | Self::PrivilegedExecutablesMismatch(path) => Some(path.as_path()),
        }
    }

    /// Whether this error represents a malformed command line invocation.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::CliUsage)
    }
}
