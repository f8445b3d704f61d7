//! Example: Resolve the time-shift playlist of a past program
//!
//! Run with: cargo run -p pmoradiko --example timeshift_playlist -- TBS 20240101050000
//!
//! The timestamp must be the exact listed start of a program (JST).
//! Set RUST_LOG=pmoradiko=debug to trace the requests.

use anyhow::{bail, Context};
use pmoradiko::{RadikoClient, Timestamp};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = env::args().skip(1);
    let (Some(station), Some(start)) = (args.next(), args.next()) else {
        bail!("usage: timeshift_playlist <station_id> <YYYYMMDDHHmmss>");
    };

    let start = Timestamp::parse(&start)?
        .to_datetime()
        .context("start is not a valid date-time")?;

    let mut client = RadikoClient::new().await?;
    let auth = client.authorize().await?;
    println!("Authorized in area {}", auth.area_id);

    let program = client.get_program_by_start_time(&station, &start).await?;
    println!("Program: {} ({} - {})", program.title, program.ftl, program.tol);
    if !program.pfm.is_empty() {
        println!("  With: {}", program.pfm);
    }

    let uri = client.timeshift_playlist_m3u8(&station, &start).await?;
    println!("Playlist: {}", uri);

    Ok(())
}
