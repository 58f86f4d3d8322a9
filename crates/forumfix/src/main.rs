use crate::prelude::{println, *};
use clap::Parser;
use std::path::PathBuf;

use crate::client::ForumClient;
use crate::driver::Driver;
use crate::report::{summary_table, ConsoleReporter};
use forumfix_core::repair::Pipeline;

mod client;
mod config;
mod driver;
mod error;
mod pagination;
mod prelude;
mod report;

#[derive(Debug, clap::Parser)]
#[command(
    author,
    version,
    about,
    long_about = "Rewrite imported BBCode/HTML forum posts into Markdown through the forum REST API"
)]
pub struct App {
    /// Path to the TOML configuration file
    #[clap(long, short, env = "FORUMFIX_CONFIG", default_value = "forumfix.toml")]
    config: PathBuf,

    /// Print repaired posts instead of writing them back
    #[clap(long)]
    dry_run: bool,

    /// API token, overrides server.token
    #[clap(long, env = "FORUMFIX_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Hide progress bars
    #[clap(long, short)]
    quiet: bool,

    /// Print the run summary as JSON
    #[clap(long)]
    json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    color_eyre::install()?;

    let app = App::parse();

    let config = config::load_config(&app.config)?.with_overrides(app.token, app.dry_run);
    let token = config.token()?;

    if config.rules.is_empty() {
        log::warn!("No reparation rule enabled, posts will be left untouched");
    }
    if config.dry_run {
        log::info!("Dry run: repaired posts are printed, nothing is written back");
    }

    let client = ForumClient::connect(
        &config.server.url,
        token,
        config.server.check_auth,
        !app.quiet,
    )
    .await?;

    let mut reporter = ConsoleReporter;
    let summary = Driver::new(
        &client,
        Pipeline::new(config.rules.clone()),
        config.dry_run,
        &mut reporter,
    )
    .run(&config.selection)
    .await?;

    if app.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        summary_table(&summary).printstd();
    }

    if summary.has_failures() {
        log::warn!("Some categories, topics or posts could not be processed, see the log above");
    }

    Ok(())
}
