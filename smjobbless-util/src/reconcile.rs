// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reconciliation of `SMJobBless` requirements between an app and its tools.
//!
//! `SMJobBless` only installs a helper tool when two conditions hold:
//!
//! * The app's `Info.plist` has an `SMPrivilegedExecutables` entry mapping
//!   the tool's bundle identifier to a requirement the tool satisfies.
//! * The tool's embedded `Info.plist` has an `SMAuthorizedClients` entry
//!   with a requirement the app satisfies.
//!
//! [Reconciler::set_requirements] computes both from the live code
//! signatures and writes them into the source `Info.plist` files.
//! [Reconciler::check] validates an already built app without writing.

use {
    crate::{
        bundle::AppBundle,
        codesign::{ProgramKind, SignatureInspector},
        error::BlessError,
        info_plist::{InfoPlist, LAUNCHD_LABEL_KEY},
        macho::{embedded_plist, SECT_INFO_PLIST, SECT_LAUNCHD_PLIST},
    },
    log::{debug, info, warn},
    std::{
        collections::BTreeMap,
        io::Write,
        path::{Path, PathBuf},
    },
};

/// Drives requirement reconciliation using a [SignatureInspector].
pub struct Reconciler<'a> {
    inspector: &'a dyn SignatureInspector,
}

impl<'a> Reconciler<'a> {
    pub fn new(inspector: &'a dyn SignatureInspector) -> Self {
        Self { inspector }
    }

    /// Write designated requirements into app and tool `Info.plist` files.
    ///
    /// `app_path` is the built app bundle. `app_info_plist_path` and
    /// `tool_info_plist_paths` are the (source) `Info.plist` files to update.
    /// There must be exactly one tool `Info.plist` per tool in the app's
    /// `Contents/Library/LaunchServices` directory.
    ///
    /// A `<path>: updated` line is written to `report` for every file that is
    /// rewritten. Files already holding the expected values are not touched.
    /// Returns the paths of rewritten files.
    pub fn set_requirements(
        &self,
        app_path: &Path,
        app_info_plist_path: &Path,
        tool_info_plist_paths: &[PathBuf],
        report: &mut dyn Write,
    ) -> Result<Vec<PathBuf>, BlessError> {
        let bundle = AppBundle::new_from_path(app_path)?;

        if !app_info_plist_path.is_file() {
            return Err(BlessError::InfoPlistNotFound(
                ProgramKind::App,
                app_info_plist_path.to_path_buf(),
            ));
        }
        if let Some(path) = tool_info_plist_paths.iter().find(|path| !path.is_file()) {
            return Err(BlessError::InfoPlistNotFound(ProgramKind::Tool, path.clone()));
        }

        let app_requirement = self
            .inspector
            .designated_requirement(app_path, ProgramKind::App)?;

        let tool_requirements = bundle
            .helper_tools(self.inspector)?
            .into_iter()
            .map(|tool| {
                debug!("{}: {}", tool.path().display(), tool.requirement());
                (tool.name().to_string(), tool.requirement().to_string())
            })
            .collect::<BTreeMap<_, _>>();

        if tool_requirements.len() != tool_info_plist_paths.len() {
            return Err(BlessError::ToolCountMismatch {
                path: bundle.launch_services_dir(),
                found: tool_requirements.len(),
                expected: tool_info_plist_paths.len(),
            });
        }

        let mut tool_info_plists = Vec::with_capacity(tool_info_plist_paths.len());
        let mut privileged_executables = BTreeMap::new();

        for path in tool_info_plist_paths {
            let tool_info = InfoPlist::from_path(path)?;
            let identifier = tool_info.bundle_identifier()?;

            let requirement =
                tool_requirements
                    .get(identifier)
                    .ok_or_else(|| BlessError::ToolNotFound {
                        path: path.clone(),
                        identifier: identifier.to_string(),
                    })?;

            // With matching counts, a repeated identifier means some tool has no manifest.
            if privileged_executables
                .insert(identifier.to_string(), requirement.clone())
                .is_some()
            {
                return Err(BlessError::DuplicateBundleIdentifier {
                    path: path.clone(),
                    identifier: identifier.to_string(),
                });
            }
            tool_info_plists.push(tool_info);
        }

        let mut updated = vec![];

        let mut app_info = InfoPlist::from_path(app_info_plist_path)?;
        if !app_info.privileged_executables_match(&privileged_executables) {
            app_info.set_privileged_executables(&privileged_executables);
            app_info.write()?;
            writeln!(report, "{}: updated", app_info.path().display())?;
            updated.push(app_info.path().to_path_buf());
        }

        let authorized_clients = vec![app_requirement];
        for mut tool_info in tool_info_plists {
            if !tool_info.authorized_clients_match(&authorized_clients) {
                tool_info.set_authorized_clients(&authorized_clients);
                tool_info.write()?;
                writeln!(report, "{}: updated", tool_info.path().display())?;
                updated.push(tool_info.path().to_path_buf());
            }
        }

        if updated.is_empty() {
            info!("all 'Info.plist' files already up to date");
        }

        Ok(updated)
    }

    /// Verify that a built app and its tools are correctly configured.
    ///
    /// Signatures of the app and every tool must be valid and the embedded
    /// requirements must agree with the live ones. Nothing is written.
    pub fn check(&self, app_path: &Path) -> Result<(), BlessError> {
        let bundle = AppBundle::new_from_path(app_path)?;

        self.inspector
            .verify_signature(app_path, ProgramKind::App)?;
        let app_requirement = self
            .inspector
            .designated_requirement(app_path, ProgramKind::App)?;

        let app_info = bundle.info_plist()?;

        let tool_paths = bundle.helper_tool_paths()?;
        if tool_paths.is_empty() {
            warn!("{} contains no helper tools", bundle.launch_services_dir().display());
        }

        let authorized_clients = vec![app_requirement];
        let mut privileged_executables = BTreeMap::new();

        for (name, path) in tool_paths {
            self.inspector
                .verify_signature(&path, ProgramKind::Tool)?;
            let requirement = self
                .inspector
                .designated_requirement(&path, ProgramKind::Tool)?;

            let tool_info = embedded_plist(&path, SECT_INFO_PLIST)?;
            if tool_info.bundle_identifier()? != name {
                return Err(BlessError::BundleIdentifierMismatch(path));
            }
            if !tool_info.authorized_clients_match(&authorized_clients) {
                return Err(BlessError::AuthorizedClientsMismatch(path));
            }

            let launchd = embedded_plist(&path, SECT_LAUNCHD_PLIST)?;
            if launchd.string_value(LAUNCHD_LABEL_KEY) != Some(name.as_str()) {
                return Err(BlessError::LaunchdLabelMismatch(path));
            }

            privileged_executables.insert(name, requirement);
        }

        if !app_info.privileged_executables_match(&privileged_executables) {
            return Err(BlessError::PrivilegedExecutablesMismatch(
                app_info.path().to_path_buf(),
            ));
        }

        info!(
            "{} and {} tools are correctly configured",
            bundle.name(),
            privileged_executables.len()
        );

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use {
        super::*,
        crate::{
            codesign::testutil::FakeInspector,
            info_plist::{AUTHORIZED_CLIENTS_KEY, PRIVILEGED_EXECUTABLES_KEY},
            macho::testutil::text_sections_macho,
        },
        plist::{Dictionary, Value},
        std::fs::create_dir_all,
    };

    const APP_REQ: &str = "identifier \"com.example.App\" and anchor apple generic";
    const HELPER_ID: &str = "com.example.Helper";
    const HELPER_REQ: &str = "identifier \"com.example.Helper\" and anchor apple generic";

    /// Scratch layout of a built app plus source `Info.plist` files.
    struct Fixture {
        _temp: tempfile::TempDir,
        app: PathBuf,
        app_info: PathBuf,
        tools_dir: PathBuf,
        tool_infos: Vec<PathBuf>,
    }

    impl Fixture {
        fn new(tool_ids: &[&str]) -> Self {
            let temp = tempfile::Builder::new()
                .prefix("smjobbless-util-")
                .tempdir()
                .unwrap();

            let app = temp.path().join("Example.app");
            let tools_dir = app.join("Contents").join("Library").join("LaunchServices");
            create_dir_all(&tools_dir).unwrap();

            let app_info = temp.path().join("App-Info.plist");
            write_plist(&app_info, &[("CFBundleIdentifier", "com.example.App".into())]);

            let mut tool_infos = vec![];
            for id in tool_ids {
                std::fs::write(tools_dir.join(id), b"binary").unwrap();

                let path = temp.path().join(format!("{}-Info.plist", id));
                write_plist(&path, &[("CFBundleIdentifier", Value::String(id.to_string()))]);
                tool_infos.push(path);
            }

            Self {
                _temp: temp,
                app,
                app_info,
                tools_dir,
                tool_infos,
            }
        }

        fn tool(&self, id: &str) -> PathBuf {
            self.tools_dir.join(id)
        }

        fn inspector(&self, tool_ids: &[&str]) -> FakeInspector {
            tool_ids.iter().fold(
                FakeInspector::default().with_requirement(&self.app, APP_REQ),
                |inspector, id| {
                    inspector.with_requirement(self.tool(id), &format!("identifier \"{}\"", id))
                },
            )
        }

        fn run(
            &self,
            inspector: &FakeInspector,
        ) -> (Result<Vec<PathBuf>, BlessError>, String) {
            let mut report = vec![];
            let res = Reconciler::new(inspector).set_requirements(
                &self.app,
                &self.app_info,
                &self.tool_infos,
                &mut report,
            );

            (res, String::from_utf8(report).unwrap())
        }

        fn snapshot(&self) -> Vec<Vec<u8>> {
            std::iter::once(&self.app_info)
                .chain(self.tool_infos.iter())
                .map(|path| std::fs::read(path).unwrap())
                .collect()
        }
    }

    fn write_plist(path: &Path, entries: &[(&str, Value)]) {
        let dict = entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect::<Dictionary>();

        Value::Dictionary(dict).to_file_xml(path).unwrap();
    }

    fn load(path: &Path) -> Dictionary {
        InfoPlist::from_path(path).unwrap().dictionary().clone()
    }

    #[test]
    fn end_to_end_single_helper() {
        let fixture = Fixture::new(&[HELPER_ID]);
        let inspector = FakeInspector::default()
            .with_requirement(&fixture.app, APP_REQ)
            .with_requirement(fixture.tool(HELPER_ID), HELPER_REQ);

        let (res, report) = fixture.run(&inspector);
        let updated = res.unwrap();

        assert_eq!(updated, vec![fixture.app_info.clone(), fixture.tool_infos[0].clone()]);
        assert_eq!(
            report,
            format!(
                "{}: updated\n{}: updated\n",
                fixture.app_info.display(),
                fixture.tool_infos[0].display()
            )
        );

        let app = load(&fixture.app_info);
        let executables = app
            .get(PRIVILEGED_EXECUTABLES_KEY)
            .and_then(Value::as_dictionary)
            .unwrap();
        assert_eq!(executables.len(), 1);
        assert_eq!(
            executables.get(HELPER_ID).and_then(Value::as_string),
            Some(HELPER_REQ)
        );
        assert_eq!(
            app.get("CFBundleIdentifier").and_then(Value::as_string),
            Some("com.example.App")
        );

        let tool = load(&fixture.tool_infos[0]);
        assert_eq!(
            tool.get(AUTHORIZED_CLIENTS_KEY),
            Some(&Value::Array(vec![Value::String(APP_REQ.to_string())]))
        );
    }

    #[test]
    fn second_run_is_noop() {
        let ids = ["com.example.A", "com.example.B"];
        let fixture = Fixture::new(&ids);
        let inspector = fixture.inspector(&ids);

        let (res, _) = fixture.run(&inspector);
        assert_eq!(res.unwrap().len(), 3);

        let before = fixture.snapshot();
        let (res, report) = fixture.run(&inspector);
        assert!(res.unwrap().is_empty());
        assert!(report.is_empty());
        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn only_stale_files_rewritten() {
        let ids = ["com.example.A", "com.example.B"];
        let fixture = Fixture::new(&ids);
        let inspector = fixture.inspector(&ids);
        fixture.run(&inspector).0.unwrap();

        // Invalidate just one tool.
        write_plist(
            &fixture.tool_infos[1],
            &[
                ("CFBundleIdentifier", Value::String(ids[1].to_string())),
                (
                    AUTHORIZED_CLIENTS_KEY,
                    Value::Array(vec![Value::String("stale".into())]),
                ),
            ],
        );
        let untouched = std::fs::read(&fixture.tool_infos[0]).unwrap();

        let (res, report) = fixture.run(&inspector);
        assert_eq!(res.unwrap(), vec![fixture.tool_infos[1].clone()]);
        assert_eq!(report, format!("{}: updated\n", fixture.tool_infos[1].display()));
        assert_eq!(std::fs::read(&fixture.tool_infos[0]).unwrap(), untouched);
    }

    #[test]
    fn changed_tool_requirement_rewrites_app_only() {
        let ids = [HELPER_ID];
        let fixture = Fixture::new(&ids);
        fixture.run(&fixture.inspector(&ids)).0.unwrap();

        let inspector = FakeInspector::default()
            .with_requirement(&fixture.app, APP_REQ)
            .with_requirement(fixture.tool(HELPER_ID), "identifier \"new\"");

        let (res, report) = fixture.run(&inspector);
        assert_eq!(res.unwrap(), vec![fixture.app_info.clone()]);
        assert_eq!(report, format!("{}: updated\n", fixture.app_info.display()));
    }

    #[test]
    fn preconditions_in_order() {
        let fixture = Fixture::new(&[HELPER_ID]);
        let inspector = fixture.inspector(&[HELPER_ID]);
        let reconciler = Reconciler::new(&inspector);
        let mut sink = vec![];

        let missing_app = fixture.app.with_file_name("Missing.app");
        let err = reconciler
            .set_requirements(
                &missing_app,
                Path::new("/nonexistent/Info.plist"),
                &fixture.tool_infos,
                &mut sink,
            )
            .unwrap_err();
        assert!(matches!(err, BlessError::AppNotFound(_)));
        assert_eq!(err.path(), Some(missing_app.as_path()));

        let err = reconciler
            .set_requirements(
                &fixture.app,
                Path::new("/nonexistent/Info.plist"),
                &fixture.tool_infos,
                &mut sink,
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "app 'Info.plist' not found");

        let missing_tool = PathBuf::from("/nonexistent/Tool-Info.plist");
        let err = reconciler
            .set_requirements(
                &fixture.app,
                &fixture.app_info,
                &[fixture.tool_infos[0].clone(), missing_tool.clone()],
                &mut sink,
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "tool 'Info.plist' not found");
        assert_eq!(err.path(), Some(missing_tool.as_path()));
    }

    #[test]
    fn missing_tool_directory() {
        let fixture = Fixture::new(&[HELPER_ID]);
        std::fs::remove_dir_all(&fixture.tools_dir).unwrap();

        let (res, _) = fixture.run(&fixture.inspector(&[]));
        let err = res.unwrap_err();
        assert!(matches!(err, BlessError::ToolDirectoryNotFound(_)));
        assert_eq!(err.path(), Some(fixture.tools_dir.as_path()));
    }

    #[test]
    fn tool_count_mismatch_writes_nothing() {
        let fixture = Fixture::new(&[HELPER_ID]);
        std::fs::write(fixture.tool("com.example.Extra"), b"binary").unwrap();
        let inspector = fixture.inspector(&[HELPER_ID, "com.example.Extra"]);

        let before = fixture.snapshot();
        let (res, report) = fixture.run(&inspector);
        assert!(matches!(
            res,
            Err(BlessError::ToolCountMismatch {
                found: 2,
                expected: 1,
                ..
            })
        ));
        assert!(report.is_empty());
        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn malformed_requirement_writes_nothing() {
        let fixture = Fixture::new(&[HELPER_ID]);
        let before = fixture.snapshot();

        let inspector = FakeInspector::default()
            .with_requirement(&fixture.app, APP_REQ)
            .with_output(
                fixture.tool(HELPER_ID),
                "designated => anchor apple\nsomething else\n",
            );
        let (res, _) = fixture.run(&inspector);
        let err = res.unwrap_err();
        assert!(matches!(err, BlessError::RequirementMalformed(ProgramKind::Tool, _)));
        assert_eq!(err.path(), Some(fixture.tool(HELPER_ID).as_path()));
        assert_eq!(fixture.snapshot(), before);

        let inspector = FakeInspector::default()
            .with_output(&fixture.app, "host => anchor apple\n")
            .with_requirement(fixture.tool(HELPER_ID), HELPER_REQ);
        let (res, _) = fixture.run(&inspector);
        let err = res.unwrap_err();
        assert!(matches!(err, BlessError::RequirementMalformed(ProgramKind::App, _)));
        assert_eq!(err.path(), Some(fixture.app.as_path()));
        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn missing_bundle_identifier() {
        let fixture = Fixture::new(&[HELPER_ID]);
        write_plist(&fixture.tool_infos[0], &[("CFBundleName", "Helper".into())]);

        let (res, _) = fixture.run(&fixture.inspector(&[HELPER_ID]));
        let err = res.unwrap_err();
        assert_eq!(err.to_string(), "'CFBundleIdentifier' not found");
        assert_eq!(err.path(), Some(fixture.tool_infos[0].as_path()));
    }

    #[test]
    fn unknown_bundle_identifier_is_fatal() {
        let fixture = Fixture::new(&[HELPER_ID]);
        write_plist(
            &fixture.tool_infos[0],
            &[("CFBundleIdentifier", "com.example.Other".into())],
        );
        let before = fixture.snapshot();

        let (res, report) = fixture.run(&fixture.inspector(&[HELPER_ID]));
        match res {
            Err(BlessError::ToolNotFound { path, identifier }) => {
                assert_eq!(path, fixture.tool_infos[0]);
                assert_eq!(identifier, "com.example.Other");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(report.is_empty());
        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn repeated_bundle_identifier_is_fatal() {
        let fixture = Fixture::new(&["com.example.A", "com.example.B"]);
        write_plist(
            &fixture.tool_infos[1],
            &[("CFBundleIdentifier", "com.example.A".into())],
        );
        let before = fixture.snapshot();

        let (res, report) = fixture.run(&fixture.inspector(&["com.example.A", "com.example.B"]));
        match res {
            Err(BlessError::DuplicateBundleIdentifier { path, identifier }) => {
                assert_eq!(path, fixture.tool_infos[1]);
                assert_eq!(identifier, "com.example.A");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(report.is_empty());
        assert_eq!(fixture.snapshot(), before);
    }

    #[test]
    fn malformed_app_info_plist() {
        let fixture = Fixture::new(&[HELPER_ID]);
        std::fs::write(&fixture.app_info, b"garbage").unwrap();

        let (res, _) = fixture.run(&fixture.inspector(&[HELPER_ID]));
        let err = res.unwrap_err();
        assert!(matches!(err, BlessError::InfoPlistUnreadable(..)));
        assert_eq!(err.path(), Some(fixture.app_info.as_path()));
    }

    /// Build a helper tool binary carrying the given embedded plists.
    fn write_tool(path: &Path, info: &[(&str, Value)], label: &str) {
        let mut info_xml = vec![];
        Value::Dictionary(
            info.iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<Dictionary>(),
        )
        .to_writer_xml(&mut info_xml)
        .unwrap();

        let mut launchd_xml = vec![];
        let mut launchd = Dictionary::new();
        launchd.insert("Label".into(), Value::String(label.into()));
        Value::Dictionary(launchd)
            .to_writer_xml(&mut launchd_xml)
            .unwrap();

        std::fs::write(
            path,
            text_sections_macho(&[
                (SECT_INFO_PLIST, info_xml.as_slice()),
                (SECT_LAUNCHD_PLIST, launchd_xml.as_slice()),
            ]),
        )
        .unwrap();
    }

    fn clients(req: &str) -> Value {
        Value::Array(vec![Value::String(req.into())])
    }

    /// A built app whose embedded requirements are all consistent.
    fn checkable_app() -> (Fixture, FakeInspector) {
        let fixture = Fixture::new(&[HELPER_ID]);

        write_tool(
            &fixture.tool(HELPER_ID),
            &[
                ("CFBundleIdentifier", HELPER_ID.into()),
                (AUTHORIZED_CLIENTS_KEY, clients(APP_REQ)),
            ],
            HELPER_ID,
        );

        let mut executables = Dictionary::new();
        executables.insert(HELPER_ID.into(), Value::String(HELPER_REQ.into()));
        write_plist(
            &fixture.app.join("Contents").join("Info.plist"),
            &[
                ("CFBundleIdentifier", "com.example.App".into()),
                (PRIVILEGED_EXECUTABLES_KEY, Value::Dictionary(executables)),
            ],
        );

        let inspector = FakeInspector::default()
            .with_requirement(&fixture.app, APP_REQ)
            .with_requirement(fixture.tool(HELPER_ID), HELPER_REQ);

        (fixture, inspector)
    }

    #[test]
    fn check_consistent_app() {
        let (fixture, inspector) = checkable_app();
        Reconciler::new(&inspector).check(&fixture.app).unwrap();
    }

    #[test]
    fn check_invalid_signatures() {
        let (fixture, inspector) = checkable_app();
        let inspector = inspector.with_invalid_signature(fixture.tool(HELPER_ID));
        let err = Reconciler::new(&inspector).check(&fixture.app).unwrap_err();
        assert_eq!(err.to_string(), "tool code signature invalid");

        let inspector = FakeInspector::default().with_invalid_signature(&fixture.app);
        let err = Reconciler::new(&inspector).check(&fixture.app).unwrap_err();
        assert_eq!(err.to_string(), "app code signature invalid");
        assert_eq!(err.path(), Some(fixture.app.as_path()));
    }

    #[test]
    fn check_missing_app_info_plist() {
        let (fixture, inspector) = checkable_app();
        std::fs::remove_file(fixture.app.join("Contents").join("Info.plist")).unwrap();

        assert!(matches!(
            Reconciler::new(&inspector).check(&fixture.app),
            Err(BlessError::InfoPlistNotFound(ProgramKind::App, _))
        ));
    }

    #[test]
    fn check_tool_mismatches() {
        let (fixture, inspector) = checkable_app();
        let tool = fixture.tool(HELPER_ID);

        write_tool(
            &tool,
            &[
                ("CFBundleIdentifier", "com.example.Wrong".into()),
                (AUTHORIZED_CLIENTS_KEY, clients(APP_REQ)),
            ],
            HELPER_ID,
        );
        assert!(matches!(
            Reconciler::new(&inspector).check(&fixture.app),
            Err(BlessError::BundleIdentifierMismatch(_))
        ));

        write_tool(
            &tool,
            &[
                ("CFBundleIdentifier", HELPER_ID.into()),
                (AUTHORIZED_CLIENTS_KEY, clients("identifier \"other\"")),
            ],
            HELPER_ID,
        );
        assert!(matches!(
            Reconciler::new(&inspector).check(&fixture.app),
            Err(BlessError::AuthorizedClientsMismatch(_))
        ));

        write_tool(
            &tool,
            &[
                ("CFBundleIdentifier", HELPER_ID.into()),
                (AUTHORIZED_CLIENTS_KEY, clients(APP_REQ)),
            ],
            "com.example.Wrong",
        );
        let err = Reconciler::new(&inspector).check(&fixture.app).unwrap_err();
        assert!(matches!(err, BlessError::LaunchdLabelMismatch(_)));
        assert_eq!(err.path(), Some(tool.as_path()));
    }

    #[test]
    fn check_stale_app_requirements() {
        let (fixture, _) = checkable_app();
        let inspector = FakeInspector::default()
            .with_requirement(&fixture.app, APP_REQ)
            .with_requirement(fixture.tool(HELPER_ID), "identifier \"changed\"");

        let err = Reconciler::new(&inspector).check(&fixture.app).unwrap_err();
        assert!(matches!(err, BlessError::PrivilegedExecutablesMismatch(_)));
        assert_eq!(
            err.path(),
            Some(fixture.app.join("Contents").join("Info.plist").as_path())
        );
    }

    #[test]
    fn check_never_writes() {
        let (fixture, inspector) = checkable_app();
        let info = fixture.app.join("Contents").join("Info.plist");
        let before = std::fs::read(&info).unwrap();

        write_plist(&info, &[("CFBundleIdentifier", "com.example.App".into())]);
        let stale = std::fs::read(&info).unwrap();
        assert_ne!(before, stale);

        assert!(Reconciler::new(&inspector).check(&fixture.app).is_err());
        assert_eq!(std::fs::read(&info).unwrap(), stale);
    }
}
