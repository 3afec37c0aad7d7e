use clap::Parser;
use voice_navigation::cli::commands::{cmd_analyze, cmd_exec, cmd_run};
use voice_navigation::cli::config::{load_config, Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run {
            url,
            api_base,
            language,
            routes,
            trace,
            headless,
        } => {
            cmd_run(
                &url,
                api_base.as_deref(),
                language.as_deref(),
                routes.as_deref(),
                trace.as_deref(),
                headless,
                cli.verbose,
                &config,
            )?;
        }
        Commands::Analyze {
            url,
            pretty,
            headless,
        } => {
            cmd_analyze(&url, pretty, headless, cli.verbose, &config)?;
        }
        Commands::Exec {
            url,
            action,
            params,
            routes,
            language,
            headless,
        } => {
            let ok = cmd_exec(
                &url,
                &action,
                params.as_deref(),
                routes.as_deref(),
                language.as_deref(),
                headless,
                cli.verbose,
                &config,
            )?;
            if !ok {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
