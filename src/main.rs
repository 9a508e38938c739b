use anyhow::{bail, Context, Result};
use jobboard::{
    board::{JobBoard, ListingView},
    cache::DirStorage,
    config::Config,
    fetch::SheetClient,
    process::FilterCriteria,
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: jobboard [--search TEXT] [--pathway TEXT] [--location TEXT] \
[--skill TEXT] [--salary MIN-MAX|MIN+] [--page N] [--refresh]";

#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    criteria: FilterCriteria,
    page: i64,
    refresh: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<CliArgs> {
    let mut out = CliArgs {
        page: 1,
        ..Default::default()
    };
    let mut args = args.into_iter();
    while let Some(flag) = args.next() {
        if flag == "--refresh" {
            out.refresh = true;
            continue;
        }
        let value = match flag.as_str() {
            "--search" | "--pathway" | "--location" | "--skill" | "--salary" | "--page" => args
                .next()
                .with_context(|| format!("{} needs a value\n{}", flag, USAGE))?,
            "-h" | "--help" => bail!("{}", USAGE),
            other => bail!("unknown argument {}\n{}", other, USAGE),
        };
        match flag.as_str() {
            "--search" => out.criteria.search_term = Some(value),
            "--pathway" => out.criteria.pathway = Some(value),
            "--location" => out.criteria.location = Some(value),
            "--skill" => out.criteria.skill = Some(value),
            "--salary" => out.criteria.salary_range = Some(value),
            _ => {
                out.page = value
                    .trim()
                    .parse()
                    .with_context(|| format!("--page expects a number, got {:?}", value))?
            }
        }
    }
    Ok(out)
}

fn print_view(view: &ListingView) {
    println!("{}", view.visible_headers.join(" | "));
    for row in &view.page.rows {
        println!("{}", row.join(" | "));
    }
    println!();
    println!(
        "Page {} of {} ({} jobs)",
        view.page.current_page, view.page.total_pages, view.page.total_rows
    );
    println!("Jobs:       {}", view.stats.count);
    if let Some(range) = view.stats.pay_range_label() {
        println!("Pay range:  {}", range);
    }
    println!("Top skills: {}", view.stats.top_skills);
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,jobboard=info"));
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args(env::args().skip(1))?;
    let config = Config::from_env();
    info!(?config, "startup");

    let client = SheetClient::new(&config)?;
    let board = JobBoard::new(client, DirStorage::new()?, config);

    let loaded = if args.refresh {
        board.refresh().await
    } else {
        board.load().await
    };

    match loaded {
        Ok(listing) => {
            let view = listing.view(&args.criteria, args.page, board.config().page_size);
            print_view(&view);
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "unable to load job listings");
            eprintln!("Unable to load job listings. Please try again with --refresh.");
            Err(e.into())
        }
    }
}
