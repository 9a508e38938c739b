use anyhow::Result;
use chrono::Local;
use jobboard::{
    fetch::load_fallback,
    process::{apply_auto_deactivation, deactivate::is_deactivated, DEFAULT_DEACTIVATE_AFTER_DAYS},
    sheet::{columns, normalize},
};
use std::{env, path::PathBuf, process::exit};

/// Print what the pipeline makes of a payload or snapshot file.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("warn").init();

    let mut args = env::args().skip(1);
    let Some(path) = args.next().map(PathBuf::from) else {
        eprintln!("Usage: inspect_payload <PAYLOAD_OR_SNAPSHOT_JSON> [DAYS]");
        exit(1);
    };
    let days = args
        .next()
        .and_then(|d| d.parse().ok())
        .unwrap_or(DEFAULT_DEACTIVATE_AFTER_DAYS);

    let payload = load_fallback(&path).await?;
    let table = normalize(&payload);
    println!("=== {} ===", path.display());
    println!("Range:            {}", payload.range);
    println!("Major dimension:  {}", payload.dimension().as_str());
    println!("Headers ({}):", table.headers.len());
    for (i, h) in table.headers.iter().enumerate() {
        println!("  {:>2}. {:?}", i, h);
    }
    println!("Rows:             {}", table.rows.len());

    let today = Local::now().date_naive();
    let table = apply_auto_deactivation(table, days, today);
    let deactivated = table
        .column(columns::DEACTIVATE)
        .map(|idx| table.rows.iter().filter(|r| is_deactivated(r, idx)).count())
        .unwrap_or(0);
    println!(
        "Deactivated:      {} (threshold {} days, reference {})",
        deactivated, days, today
    );
    println!("Active:           {}", table.rows.len() - deactivated);
    Ok(())
}
