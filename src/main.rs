use asprite::cli::Cli;
use clap::Parser;
use log::LevelFilter;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    asprite::cli::run(cli)?;

    Ok(())
}

/// `RUST_LOG` wins when set; otherwise each `-v` raises the level by one.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}
