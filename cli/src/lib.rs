//! WikiView - terminal shell
//!
//! Plain input lines filter the wiki's page titles as you type them;
//! `@`-commands open pages and move around. The "rendering surface" just
//! prints the URLs it would load.

mod console;

use anyhow::Context;
use clap::Parser;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use console::{ConsolePrompt, ConsoleShell, ConsoleSurface, ExternalPolicy, PrintOpener};
use wikiview_core::{
    Collaborators, Command, CommandType, Config, NavigationController, ShellInput, WikiApi,
};

const HELP: &str = "\
Type to search page titles. Commands:
  @open <title|n>   open a page by title or result number
  @go <url>         navigate to a URL
  @back  @reload  @home  @quit";

#[derive(Debug, Parser)]
#[command(
    name = "wikiview",
    version,
    about = "Browse and search a MediaWiki site's pages from the terminal"
)]
struct Cli {
    /// JSON config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Script path of the wiki, e.g. https://en.wikipedia.org/w
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,
    #[arg(long)]
    skin: Option<String>,
    /// Upper bound on listing requests
    #[arg(long)]
    max_requests: Option<usize>,
    /// What to do with links that leave the wiki
    #[arg(long, value_enum, default_value_t = ExternalPolicy::Ask)]
    external: ExternalPolicy,
    /// Results printed per query
    #[arg(long, default_value_t = 20)]
    max_results: usize,
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
        if cli.config.is_none() {
            // host lists in the defaults belong to Wikipedia
            config.primary_host.clear();
            config.internal_host_suffixes.clear();
            config.static_host_suffixes.clear();
        }
    }
    if let Some(skin) = &cli.skin {
        config.skin = skin.clone();
    }
    if let Some(max_requests) = cli.max_requests {
        config.fetch.max_requests = max_requests;
    }

    config.validate()?;
    Ok(config)
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    wikiview_core::init_logging();

    let config = build_config(&cli)?;
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    let guard = runtime.enter();

    let surface = Arc::new(ConsoleSurface::default());
    let shell = Arc::new(ConsoleShell::new(cli.max_results));
    let collaborators = Collaborators {
        surface: surface.clone(),
        shell: shell.clone(),
        prompt: Arc::new(ConsolePrompt::new(cli.external)),
        opener: Arc::new(PrintOpener),
    };

    let controller = Arc::new(NavigationController::connect(config, collaborators)?);
    surface.report_to(Arc::downgrade(&controller));
    let startup = controller.start();

    tracing::info!(
        session_id = %controller.session().id(),
        base_url = %controller.config().base_url,
        "WikiView started"
    );
    println!("{}", HELP);

    let stdin = std::io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let keep_going = match ShellInput::parse(&line) {
            Ok(ShellInput::Query(query)) => {
                controller.on_query_changed(&query);
                true
            }
            Ok(ShellInput::Command(command)) => execute(&*controller, &shell, command),
            Err(e) => {
                println!("{}", e);
                true
            }
        };

        if !keep_going {
            break;
        }
    }

    controller.shutdown();
    drop(guard);
    if let Err(e) = runtime.block_on(startup) {
        tracing::warn!(error = %e, "Startup task did not finish cleanly");
    }

    Ok(())
}

/// Run one shell command. Returns `false` when the shell should exit.
fn execute<A: WikiApi + 'static>(
    controller: &NavigationController<A>,
    shell: &ConsoleShell,
    command: Command,
) -> bool {
    let argument = command.argument.unwrap_or_default();

    match command.command_type {
        CommandType::Open => {
            let title = argument
                .parse::<usize>()
                .ok()
                .and_then(|n| shell.nth_result(n))
                .map(|t| t.into_string())
                .unwrap_or(argument);
            controller.on_title_selected(&title);
        }
        CommandType::Go => {
            if let Err(e) = controller.open_url(&argument) {
                println!("{}", e);
            }
        }
        CommandType::Back => {
            if !controller.go_back() {
                println!("No earlier page; @quit to exit");
            }
        }
        CommandType::Reload => controller.reload(),
        CommandType::Home => {
            if !controller.go_home() {
                println!("Main page is not available");
            }
        }
        CommandType::Quit => return false,
    }

    true
}
