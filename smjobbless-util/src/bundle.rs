// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Application bundles carrying privileged helper tools.

use {
    crate::{
        codesign::{ProgramKind, SignatureInspector},
        error::BlessError,
        info_plist::InfoPlist,
    },
    log::info,
    std::path::{Path, PathBuf},
};

/// A macOS application bundle backed by a directory.
///
/// Privileged helper tools installed with `SMJobBless` live in
/// `Contents/Library/LaunchServices`. Each tool's file name is its bundle
/// identifier.
#[derive(Clone, Debug)]
pub struct AppBundle {
    /// Root directory of this bundle.
    root: PathBuf,

    /// Name of the root directory.
    root_name: String,
}

impl AppBundle {
    /// Open an existing bundle from a filesystem path.
    ///
    /// The only validation performed is that the path is a directory. The
    /// bundle's own `Info.plist` isn't read until [AppBundle::info_plist]
    /// is called.
    pub fn new_from_path(directory: &Path) -> Result<Self, BlessError> {
        if !directory.is_dir() {
            return Err(BlessError::AppNotFound(directory.to_path_buf()));
        }

        let root_name = directory
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| directory.display().to_string());

        Ok(Self {
            root: directory.to_path_buf(),
            root_name,
        })
    }

    /// Resolve the path to a file in the bundle's `Contents` directory.
    pub fn resolve_path(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join("Contents").join(path.as_ref())
    }

    /// The on-disk name of this bundle, including the `.app` suffix.
    pub fn name(&self) -> &str {
        &self.root_name
    }

    pub fn info_plist_path(&self) -> PathBuf {
        self.resolve_path("Info.plist")
    }

    /// Load the bundle's built `Info.plist`.
    pub fn info_plist(&self) -> Result<InfoPlist, BlessError> {
        let path = self.info_plist_path();

        if !path.is_file() {
            return Err(BlessError::InfoPlistNotFound(ProgramKind::App, path));
        }

        InfoPlist::from_path(path)
    }

    /// Directory holding helper tools.
    pub fn launch_services_dir(&self) -> PathBuf {
        self.resolve_path("Library").join("LaunchServices")
    }

    /// Every entry of the helper tool directory as `(file name, path)`.
    ///
    /// Entries are sorted by file name. No filtering is applied: anything in
    /// the directory is considered a tool.
    pub fn helper_tool_paths(&self) -> Result<Vec<(String, PathBuf)>, BlessError> {
        let dir = self.launch_services_dir();

        if !dir.is_dir() {
            return Err(BlessError::ToolDirectoryNotFound(dir));
        }

        walkdir::WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .map(|entry| {
                let entry = entry.map_err(|e| BlessError::ToolDirectoryUnreadable(dir.clone(), e))?;

                Ok((
                    entry.file_name().to_string_lossy().to_string(),
                    entry.path().to_path_buf(),
                ))
            })
            .collect::<Result<Vec<_>, BlessError>>()
    }

    /// Discover helper tools and read their designated requirements.
    pub fn helper_tools(
        &self,
        inspector: &dyn SignatureInspector,
    ) -> Result<Vec<HelperTool>, BlessError> {
        self.helper_tool_paths()?
            .into_iter()
            .map(|(name, path)| {
                let requirement = inspector.designated_requirement(&path, ProgramKind::Tool)?;
                info!("found tool {} in {}", name, self.name());

                Ok(HelperTool {
                    name,
                    path,
                    requirement,
                })
            })
            .collect::<Result<Vec<_>, BlessError>>()
    }
}

/// A privileged helper tool discovered inside an [AppBundle].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HelperTool {
    name: String,
    path: PathBuf,
    requirement: String,
}

impl HelperTool {
    /// File name of the tool, which doubles as its bundle identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The tool's live designated requirement.
    pub fn requirement(&self) -> &str {
        &self.requirement
    }
}
