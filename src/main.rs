use std::process;

use clap::Parser;
use colored::Colorize;
use kmerfreq::{cli::Args, config::Config, run};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let quiet = args.quiet;

    let config = Config::from_args(args).unwrap_or_else(|e| {
        eprintln!(
            "{}\n {}",
            "Problem with arguments:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    });

    if !quiet {
        println!("{}: {}", "data".bold(), config.path.display().to_string().underline().blue());
        println!("{}: {}", "k-length".bold(), config.k.to_string().blue().bold());
        println!(
            "{}: {}",
            "database".bold(),
            config.database_path.display().to_string().blue()
        );
        println!(
            "{}: {}",
            "filter".bold(),
            match config.filter {
                Some(_) => "bloom",
                None => "off",
            }
            .blue()
            .bold()
        );
        println!();
    }

    if let Err(e) = run::run(config) {
        eprintln!(
            "{}\n {}",
            "Application error:".blue().bold(),
            e.to_string().blue()
        );
        process::exit(1);
    }
}
