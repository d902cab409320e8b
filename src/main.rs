use clap::Parser;
use phpdoc_lint::cli::{Cli, Commands};
use phpdoc_lint::commands::{self, CheckConfig, FixConfig, EXIT_ERROR, EXIT_SUCCESS};
use phpdoc_lint::config;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            paths,
            format,
            output,
            exclude,
            missing,
            no_color,
            no_parallel,
            no_cache,
            clear_cache,
            cache_file,
            cache_mode,
        } => commands::check(
            CheckConfig {
                paths,
                format,
                output,
                exclude,
                missing,
                no_color,
                no_parallel,
                no_cache,
                clear_cache,
                cache_file,
                cache_mode,
            },
            &config::load_config(),
        ),
        Commands::Fix {
            paths,
            fix_missing,
            exclude,
            dry_run,
        } => commands::fix(
            FixConfig {
                paths,
                fix_missing,
                exclude,
                dry_run,
            },
            &config::load_config(),
        ),
        Commands::Init { force } => commands::init_config(force).map(|()| EXIT_SUCCESS),
    };

    let code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            EXIT_ERROR
        }
    };

    std::process::exit(code);
}
