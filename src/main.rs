use deploy_dashboard::{Config, Error};
use log::info;
use std::{path::PathBuf, process};
use structopt::StructOpt;

#[derive(StructOpt)]
struct Options {
    #[structopt(short, long, parse(from_os_str))]
    /// TOML config file to use instead of the built-in defaults
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opts = Options::from_args();

    // set up logging, allowing info level logging by default
    env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match &opts.config {
        Some(path) => {
            info!("using config {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    let token = match config.github.token() {
        Ok(token) => token,
        Err(error @ Error::MissingToken { .. }) => {
            eprintln!("{}", error);
            process::exit(1);
        }
        Err(error) => return Err(error.into()),
    };

    let count = deploy_dashboard::run_update(&config, &token).await?;
    println!("Wrote dashboard files for {} deployments", count);

    Ok(())
}
