// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property lists embedded in Mach-O binaries.
//!
//! A helper tool is a bare executable, not a bundle, so its `Info.plist` and
//! its launchd job definition are linked into `__TEXT` sections instead of
//! living in separate files.

use {
    crate::{error::BlessError, info_plist::InfoPlist},
    goblin::mach::Mach,
    std::path::Path,
};

pub const SEG_TEXT: &str = "__TEXT";
pub const SECT_INFO_PLIST: &str = "__info_plist";
pub const SECT_LAUNCHD_PLIST: &str = "__launchd_plist";

/// Find the content of a `__TEXT` section in Mach-O data.
///
/// For fat binaries only the first architecture is examined.
pub fn find_text_section<'a>(
    data: &'a [u8],
    section_name: &str,
) -> Result<Option<&'a [u8]>, goblin::error::Error> {
    let macho = match Mach::parse(data)? {
        Mach::Binary(macho) => macho,
        Mach::Fat(multiarch) => multiarch.get(0)?,
    };

    for segment in macho
        .segments
        .iter()
        .filter(|segment| matches!(segment.name(), Ok(SEG_TEXT)))
    {
        for (section, section_data) in segment.sections()? {
            if matches!(section.name(), Ok(name) if name == section_name) {
                return Ok(Some(section_data));
            }
        }
    }

    Ok(None)
}

/// Read the plist embedded in a `__TEXT` section of the binary at `path`.
pub fn embedded_plist(path: &Path, section_name: &'static str) -> Result<InfoPlist, BlessError> {
    let data =
        std::fs::read(path).map_err(|e| BlessError::ToolUnreadable(path.to_path_buf(), e))?;

    let section = find_text_section(&data, section_name)
        .map_err(|e| BlessError::MachOParse(path.to_path_buf(), e))?
        .ok_or_else(|| BlessError::EmbeddedPlistMissing(path.to_path_buf(), section_name))?;

    InfoPlist::from_data(path, section)
}
