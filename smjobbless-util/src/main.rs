// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use {
    clap::{error::ErrorKind, value_parser, Arg, ArgAction, ArgMatches, Command},
    log::{info, LevelFilter},
    smjobbless_util::{BlessError, CodesignTool, Reconciler},
    std::{ffi::OsString, path::PathBuf},
};

const CHECK_ABOUT: &str = "\
Verify that an app and its privileged helper tools are configured for SMJobBless.

The code signatures of the app and of every tool in
Contents/Library/LaunchServices must be valid. Each tool's embedded Info.plist
must carry its own bundle identifier and an SMAuthorizedClients list holding
the app's designated requirement. Each tool's embedded launchd plist must
have a Label equal to the tool name. The app's Info.plist must have an
SMPrivilegedExecutables map of every tool to its designated requirement.

Nothing is modified.
";

const SETREQ_ABOUT: &str = "\
Write SMJobBless code signing requirements into Info.plist files.

The designated requirements of the built app and of every tool in its
Contents/Library/LaunchServices directory are read from their code signatures.
SMPrivilegedExecutables in the app Info.plist and SMAuthorizedClients in each
tool Info.plist are then updated to match.

Exactly one tool Info.plist must be given per tool in the app. Files already
holding the expected values are left untouched. Every rewritten file is
printed as `<path>: updated`.
";

const PROGRAM_NAME: &str = "smjobblessutil";

fn program_name() -> String {
    std::env::args_os()
        .next()
        .map(PathBuf::from)
        .and_then(|path| {
            path.file_name()
                .map(|name| name.to_string_lossy().to_string())
        })
        .unwrap_or_else(|| PROGRAM_NAME.to_string())
}

fn print_usage(program: &str) {
    eprintln!("usage: {} check  /path/to/app", program);
    eprintln!(
        "       {} setreq /path/to/app /path/to/app/Info.plist /path/to/tool/Info.plist...",
        program
    );
}

/// Drop arguments starting with `-f`.
///
/// Older build scripts pass `-f`-prefixed flags which were always ignored.
fn filter_legacy_args(args: impl IntoIterator<Item = OsString>) -> Vec<OsString> {
    let mut args = args.into_iter();
    let program = args.next();

    program
        .into_iter()
        .chain(args.filter(|arg| !arg.to_string_lossy().starts_with("-f")))
        .collect()
}

fn app_command() -> Command {
    Command::new(PROGRAM_NAME)
        .version(env!("CARGO_PKG_VERSION"))
        .about("Configure SMJobBless code signing requirements between an app and its helper tools")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::Count)
                .help("Increase logging verbosity. Can be specified multiple times."),
        )
        .arg(
            Arg::new("codesign_path")
                .long("codesign-path")
                .global(true)
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .help("codesign executable to use instead of searching PATH"),
        )
        .arg(
            // Accepted and ignored for compatibility with older invocations.
            Arg::new("legacy_d")
                .short('d')
                .global(true)
                .action(ArgAction::SetTrue)
                .hide(true),
        )
        .subcommand(
            Command::new("check")
                .about("Verify SMJobBless configuration of a built app")
                .long_about(CHECK_ABOUT)
                .arg(
                    Arg::new("app_path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the built .app bundle"),
                ),
        )
        .subcommand(
            Command::new("setreq")
                .about("Write SMJobBless requirements into Info.plist files")
                .long_about(SETREQ_ABOUT)
                .arg(
                    Arg::new("app_path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the built .app bundle"),
                )
                .arg(
                    Arg::new("app_info_plist")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the app's source Info.plist"),
                )
                .arg(
                    Arg::new("tool_info_plist")
                        .required(true)
                        .num_args(1..)
                        .value_parser(value_parser!(PathBuf))
                        .help("Paths to each tool's source Info.plist"),
                ),
        )
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(log_level.as_str()),
    );

    // Disable log context except at higher log levels.
    if log_level <= LevelFilter::Info {
        builder
            .format_timestamp(None)
            .format_level(false)
            .format_target(false);
    }

    builder.init();
}

fn codesign_tool(args: &ArgMatches) -> Result<CodesignTool, BlessError> {
    let tool = match args.get_one::<PathBuf>("codesign_path") {
        Some(path) => CodesignTool::new(path),
        None => CodesignTool::find()?,
    };
    info!("using {}", tool.executable().display());

    Ok(tool)
}

fn command_check(args: &ArgMatches) -> Result<(), BlessError> {
    let app_path = args
        .get_one::<PathBuf>("app_path")
        .ok_or(BlessError::CliUsage)?;

    let inspector = codesign_tool(args)?;

    Reconciler::new(&inspector).check(app_path)
}

fn command_setreq(args: &ArgMatches) -> Result<(), BlessError> {
    let app_path = args
        .get_one::<PathBuf>("app_path")
        .ok_or(BlessError::CliUsage)?;
    let app_info_plist = args
        .get_one::<PathBuf>("app_info_plist")
        .ok_or(BlessError::CliUsage)?;
    let tool_info_plists = args
        .get_many::<PathBuf>("tool_info_plist")
        .ok_or(BlessError::CliUsage)?
        .cloned()
        .collect::<Vec<_>>();

    let inspector = codesign_tool(args)?;

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    Reconciler::new(&inspector).set_requirements(
        app_path,
        app_info_plist,
        &tool_info_plists,
        &mut stdout,
    )?;

    Ok(())
}

fn main_impl() -> Result<(), BlessError> {
    let matches = match app_command().try_get_matches_from(filter_legacy_args(std::env::args_os()))
    {
        Ok(matches) => matches,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => return Err(BlessError::CliUsage),
    };

    match matches.subcommand() {
        Some(("check", args)) => {
            init_logging(args.get_count("verbose"));
            command_check(args)
        }
        Some(("setreq", args)) => {
            init_logging(args.get_count("verbose"));
            command_setreq(args)
        }
        _ => Err(BlessError::CliUsage),
    }
}

fn main() {
    let program = program_name();

    let exit_code = match main_impl() {
        Ok(()) => 0,
        Err(BlessError::CliUsage) => {
            print_usage(&program);
            1
        }
        Err(err) => {
            match err.path() {
                Some(path) => eprintln!("{}: {}", path.display(), err),
                None => eprintln!("{}: {}", program, err),
            }
            1
        }
    };

    std::process::exit(exit_code)
}
