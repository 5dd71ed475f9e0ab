// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `Info.plist` documents.
//!
//! Documents are held as a [plist::Dictionary] so keys this crate doesn't
//! care about survive a read/modify/write cycle untouched.

use {
    crate::error::BlessError,
    plist::{Dictionary, Value},
    std::{
        collections::BTreeMap,
        io::Cursor,
        path::{Path, PathBuf},
    },
};

pub const BUNDLE_IDENTIFIER_KEY: &str = "CFBundleIdentifier";
pub const PRIVILEGED_EXECUTABLES_KEY: &str = "SMPrivilegedExecutables";
pub const AUTHORIZED_CLIENTS_KEY: &str = "SMAuthorizedClients";
pub const LAUNCHD_LABEL_KEY: &str = "Label";

const BINARY_PLIST_MAGIC: &[u8] = b"bplist00";

/// Serialization format of a property list file.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlistFormat {
    Xml,
    Binary,
}

impl PlistFormat {
    /// Sniff the format of serialized plist data.
    pub fn detect(data: &[u8]) -> Self {
        if data.starts_with(BINARY_PLIST_MAGIC) {
            Self::Binary
        } else {
            Self::Xml
        }
    }
}

/// A parsed `Info.plist` whose root is a dictionary.
#[derive(Clone, Debug)]
pub struct InfoPlist {
    path: PathBuf,
    format: PlistFormat,
    dict: Dictionary,
}

impl InfoPlist {
    /// Read and parse the file at `path`.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BlessError> {
        let path = path.as_ref();
        let data =
            std::fs::read(path).map_err(|e| BlessError::InfoPlistIo(path.to_path_buf(), e))?;

        Self::from_data(path, &data)
    }

    /// Parse serialized plist data.
    ///
    /// `path` is recorded as the document's location. It is used for error
    /// reporting and as the destination of [InfoPlist::write].
    pub fn from_data(path: impl AsRef<Path>, data: &[u8]) -> Result<Self, BlessError> {
        let path = path.as_ref();
        let format = PlistFormat::detect(data);

        let value = Value::from_reader(Cursor::new(data))
            .map_err(|e| BlessError::InfoPlistUnreadable(path.to_path_buf(), e))?;
        let dict = value
            .into_dictionary()
            .ok_or_else(|| BlessError::InfoPlistNotDictionary(path.to_path_buf()))?;

        Ok(Self {
            path: path.to_path_buf(),
            format,
            dict,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> PlistFormat {
        self.format
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Obtain a key's value if it is a string.
    pub fn string_value(&self, key: &str) -> Option<&str> {
        self.dict.get(key).and_then(Value::as_string)
    }

    /// Obtain `CFBundleIdentifier`.
    ///
    /// A missing, empty, or non-string value is an error.
    pub fn bundle_identifier(&self) -> Result<&str, BlessError> {
        match self.string_value(BUNDLE_IDENTIFIER_KEY) {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(BlessError::BundleIdentifierMissing(self.path.clone())),
        }
    }

    /// Whether `SMPrivilegedExecutables` is exactly the given map.
    ///
    /// Key order is irrelevant. Every value must be a string.
    pub fn privileged_executables_match(&self, expected: &BTreeMap<String, String>) -> bool {
        match self
            .dict
            .get(PRIVILEGED_EXECUTABLES_KEY)
            .and_then(Value::as_dictionary)
        {
            Some(current) => {
                current.len() == expected.len()
                    && expected.iter().all(|(id, req)| {
                        current.get(id).and_then(Value::as_string) == Some(req.as_str())
                    })
            }
            None => false,
        }
    }

    pub fn set_privileged_executables(&mut self, executables: &BTreeMap<String, String>) {
        let value = executables
            .iter()
            .map(|(id, req)| (id.clone(), Value::String(req.clone())))
            .collect::<Dictionary>();

        self.dict
            .insert(PRIVILEGED_EXECUTABLES_KEY.to_string(), Value::Dictionary(value));
    }

    /// Whether `SMAuthorizedClients` is exactly the given list.
    pub fn authorized_clients_match(&self, expected: &[String]) -> bool {
        match self
            .dict
            .get(AUTHORIZED_CLIENTS_KEY)
            .and_then(Value::as_array)
        {
            Some(current) => {
                current.len() == expected.len()
                    && current
                        .iter()
                        .zip(expected)
                        .all(|(value, req)| value.as_string() == Some(req.as_str()))
            }
            None => false,
        }
    }

    pub fn set_authorized_clients(&mut self, clients: &[String]) {
        let value = clients
            .iter()
            .map(|req| Value::String(req.clone()))
            .collect::<Vec<_>>();

        self.dict
            .insert(AUTHORIZED_CLIENTS_KEY.to_string(), Value::Array(value));
    }

    /// Write the document back to its path, in the format it was read in.
    pub fn write(&self) -> Result<(), BlessError> {
        let value = Value::Dictionary(self.dict.clone());

        let res = match self.format {
            PlistFormat::Xml => value.to_file_xml(&self.path),
            PlistFormat::Binary => value.to_file_binary(&self.path),
        };

        res.map_err(|e| BlessError::InfoPlistUnwritable(self.path.clone(), e))
    }
}
