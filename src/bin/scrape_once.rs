use clap::Parser;
use std::path::PathBuf;
use transfer_scout::core::fetcher::decode_page;
use transfer_scout::domain::ports::PageSource;
use transfer_scout::utils::{logger, validation::Validate};
use transfer_scout::{
    FilePageSource, Group, HttpPageSource, ParseRules, Result, ScoutConfig, TransferFetcher,
};

#[derive(Parser)]
#[command(name = "scrape-once")]
#[command(about = "Fetch and parse the transfer list once, printing JSON to stdout")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// u21, nt, or all
    #[arg(short, long, default_value = "all")]
    team: String,

    /// Parse a saved HTML page instead of fetching
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print the decoded plain text instead of listings
    #[arg(long)]
    dump_text: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // stdout 保留給 JSON 輸出
    logger::init_stderr_logger(args.verbose);

    let config = match &args.config {
        Some(path) => ScoutConfig::from_file(path)?,
        None => ScoutConfig::default(),
    };
    config.validate()?;

    let rules = ParseRules::from_config(&config.parse)?;

    match &args.file {
        Some(path) => {
            let source = FilePageSource::new(path, config.source.url.clone());
            run(TransferFetcher::new(source, rules), &args).await?;
        }
        None => {
            let source = HttpPageSource::new(&config.source)?;
            run(TransferFetcher::new(source, rules), &args).await?;
        }
    }

    Ok(())
}

async fn run<P: PageSource>(fetcher: TransferFetcher<P>, args: &Args) -> Result<()> {
    let page = fetcher.fetch_page().await?;

    if args.dump_text {
        println!("{}", decode_page(&page)?);
        return Ok(());
    }

    let json = if args.team == "all" {
        serde_json::to_string_pretty(&fetcher.transfer_report(&page)?)?
    } else {
        let group = Group::parse(&args.team)?;
        serde_json::to_string_pretty(&fetcher.group_report(&page, group)?)?
    };
    println!("{}", json);

    Ok(())
}
