use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use roster_cli::session::{self, Flow};
use roster_cli::{spawn_notification_printers, Console, TerminalSurface};
use roster_core::{
    Action, AttendanceOutcome, ClientConfig, Filter, LoadOutcome, ReportOutcome, SyncController,
};
use roster_http::HttpRosterService;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let email = || {
        Arg::new("email")
            .required(true)
            .help("Student email")
    };
    let activity = || {
        Arg::new("activity")
            .required(true)
            .help("Activity name")
    };

    Command::new("roster")
        .version(roster_core::VERSION)
        .about("Browse activities and manage enrollment")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("base-url")
                .long("base-url")
                .global(true)
                .help("Activity service root URL (overrides the config file)"),
        )
        .arg(
            Arg::new("json-logs")
                .long("json-logs")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON on stderr"),
        )
        .subcommand(
            Command::new("list")
                .about("Show the activity roster")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .help("Only show this category"),
                ),
        )
        .subcommand(Command::new("categories").about("Show the activity categories"))
        .subcommand(
            Command::new("signup")
                .about("Sign a student up for an activity")
                .arg(activity())
                .arg(email()),
        )
        .subcommand(
            Command::new("unregister")
                .about("Remove a student from an activity")
                .arg(activity())
                .arg(email()),
        )
        .subcommand(
            Command::new("attend")
                .about("Record attendance for one session")
                .arg(activity())
                .arg(email())
                .arg(
                    Arg::new("date")
                        .required(true)
                        .help("Session date (YYYY-MM-DD)"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Show a student's activity report")
                .arg(email()),
        )
        .subcommand(
            Command::new("attendance")
                .about("Show attendance for an activity")
                .arg(activity())
                .arg(
                    Arg::new("email")
                        .long("email")
                        .help("Only this student's attendance"),
                ),
        )
        .subcommand(Command::new("interactive").about("Start an interactive session"))
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(matches: &ArgMatches) -> anyhow::Result<ClientConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => ClientConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ClientConfig::new(),
    };
    if let Some(base_url) = matches.get_one::<String>("base-url") {
        config = config.with_base_url(base_url.clone());
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn arg<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    args.get_one::<String>(name).map_or("", String::as_str)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("json-logs"));

    let config = load_config(&matches)?;
    let service = Arc::new(HttpRosterService::new(&config)?);
    tracing::debug!(base_url = %service.base_url(), "service client ready");
    let console = Console::stdout();
    let surface = Arc::new(TerminalSurface::new(console.clone()));
    let controller = SyncController::new(config, service, surface);

    let success = match matches.subcommand() {
        Some(("list", args)) => {
            let filter = Filter::from_selection(
                args.get_one::<String>("category")
                    .map_or(Filter::ALL_LABEL, String::as_str),
            );
            let outcome = match controller.select_filter(filter).await {
                Some(outcome) => outcome,
                None => controller.refresh().await.1,
            };
            !matches!(outcome, LoadOutcome::Failed(_))
        }
        Some(("categories", _)) => {
            let loaded = controller.store().load_categories().await;
            let options = roster_core::projector::project_categories(
                &controller.view().catalog,
                &controller.current_filter(),
            );
            console.print(&roster_cli::render::categories_text(&options));
            loaded.is_ok()
        }
        Some(("signup", args)) => {
            submit(&controller, &console, Action::signup(arg(args, "activity"), arg(args, "email"))).await
        }
        Some(("unregister", args)) => {
            submit(
                &controller,
                &console,
                Action::unregister(arg(args, "activity"), arg(args, "email")),
            )
            .await
        }
        Some(("attend", args)) => {
            submit(
                &controller,
                &console,
                Action::record_attendance(arg(args, "activity"), arg(args, "email"), arg(args, "date")),
            )
            .await
        }
        Some(("report", args)) => matches!(
            controller.request_report(arg(args, "email")).await,
            ReportOutcome::Rendered(_)
        ),
        Some(("attendance", args)) => {
            let email = args.get_one::<String>("email").map(String::as_str);
            matches!(
                controller.lookup_attendance(arg(args, "activity"), email).await,
                AttendanceOutcome::Rendered(_)
            )
        }
        Some(("interactive", _)) | None => {
            interactive(controller, console).await?;
            true
        }
        Some((other, _)) => anyhow::bail!("unknown subcommand {other}"),
    };

    std::process::exit(if success { 0 } else { 1 });
}

/// Run one lifecycle and print its notification; the roster repaint, if
/// any, has already been printed by the surface
async fn submit(controller: &SyncController, console: &Console, action: Action) -> bool {
    let outcome = controller.submit(action).await;
    if let Some(notification) = controller.notifications().current(outcome.surface) {
        console.print(&roster_cli::render::notification_text(&notification));
    }
    controller.shutdown();
    outcome.succeeded()
}

async fn interactive(controller: SyncController, console: Console) -> anyhow::Result<()> {
    let printers = spawn_notification_printers(controller.notifications(), &console);
    controller.bootstrap().await;
    console.print("Type `help` for commands.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading stdin")? {
        match session::Command::parse(&line) {
            Ok(Some(command)) => {
                if session::execute(&controller, &console, command).await == Flow::Quit {
                    break;
                }
            }
            Ok(None) => {}
            Err(error) => console.print(&format!("{error}\n")),
        }
    }

    controller.shutdown();
    drop(controller);
    // Printers stop once every lifecycle still in flight has finished.
    futures::future::join_all(printers).await;
    Ok(())
}
