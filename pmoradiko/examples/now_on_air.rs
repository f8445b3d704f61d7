//! Example: List what is on air in an area
//!
//! Run with: cargo run -p pmoradiko --example now_on_air
//! Or for another area: cargo run -p pmoradiko --example now_on_air -- JP27

use pmoradiko::RadikoClient;
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let area = env::args().nth(1).unwrap_or_else(|| "JP13".to_string());

    println!("Fetching programs on air in {}...\n", area);

    let client = RadikoClient::builder().area_id(&area).build().await?;
    let now = client.get_now_programs().await?;

    for station in &now {
        match station.programs().next() {
            Some(program) => println!(
                "{:<8} {:<24} {}-{}  {}",
                station.id, station.name, program.ftl, program.tol, program.title
            ),
            None => println!("{:<8} {:<24} (no program listed)", station.id, station.name),
        }
    }

    Ok(())
}
