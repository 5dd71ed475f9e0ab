// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Configure `SMJobBless` code signing requirements.
//!
//! `SMJobBless` installs a privileged helper tool shipped inside an app
//! bundle only when the app and the tool trust each other: the app's
//! `Info.plist` must name each tool and the code signing requirement it
//! satisfies (`SMPrivilegedExecutables`), and each tool's embedded
//! `Info.plist` must name the requirement of the app allowed to install it
//! (`SMAuthorizedClients`).
//!
//! Those requirements are the *designated requirements* of the signed
//! binaries, which depend on the signing identity. This crate reads them
//! from the live signatures (via Apple's `codesign` tool) and writes them
//! into the `Info.plist` files, or verifies a built app is configured
//! consistently.
//!
//! The main entry point is [Reconciler]. Signature inspection goes through
//! the [SignatureInspector] trait, implemented for `codesign` by
//! [CodesignTool].

pub mod bundle;
pub mod codesign;
pub mod error;
pub mod info_plist;
pub mod macho;
pub mod reconcile;

pub use {
    bundle::{AppBundle, HelperTool},
    codesign::{CodesignTool, ProgramKind, SignatureInspector},
    error::BlessError,
    info_plist::{InfoPlist, PlistFormat},
    reconcile::Reconciler,
};
