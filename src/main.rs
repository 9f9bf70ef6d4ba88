use clap::Parser;
use modlint::cli::{Cli, Commands};
use modlint::commands::check::{self, CheckOptions};

fn main() {
    let cli = Cli::parse();

    let code = match cli.command {
        Commands::Check {
            paths,
            accepted_version,
            config,
            format,
            output,
            no_parallel,
            verbosity,
        } => {
            init_logging(verbosity);
            let options = CheckOptions {
                paths,
                accepted_version,
                config,
                format: format.into(),
                output,
                parallel: !no_parallel,
            };
            match check::run(options) {
                Ok(code) => code,
                Err(err) => {
                    log::error!("{err:#}");
                    2
                }
            }
        }
    };

    std::process::exit(code);
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
