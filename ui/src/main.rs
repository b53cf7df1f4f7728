use clap::Parser;
use icon_switcher::app::App;
use icon_switcher::cli::Cli;
use icon_switcher::config;
use icon_switcher::error::AppResult;
use icon_switcher::logger;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            if let Some(suggestion) = e.suggestion() {
                eprintln!("{suggestion}");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> AppResult<()> {
    // --root replaces the configured roots before they are validated
    let theme_roots = if cli.roots.is_empty() {
        Vec::new()
    } else {
        cli.absolute_roots(&std::env::current_dir()?)
    };
    let app_config = config::init_config(cli.config.as_deref(), theme_roots).as_result()?;

    if let Err(e) = logger::setup_logger(app_config.logging(), cli.verbosity) {
        eprintln!("Warning: Failed to initialize logger: {e}");
    }

    let mut app = App::new(app_config, cli.memory_store);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.run(&cli.selected_command(), &mut out)
}
