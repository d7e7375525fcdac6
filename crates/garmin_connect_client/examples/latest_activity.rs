use garmin_connect_client::{ActivitySource, Config, GarminConnectClient};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::from_env()?;
    let client = GarminConnectClient::sign_in(&cfg)
        .await
        .map_err(|e| format!("sign-in failed: {e}"))?;

    let latest = client.get_latest().await?;
    println!("Latest activity: {}", latest.name()?);
    println!("  started  {}", latest.start_time()?.format("%Y-%m-%d %H:%M"));
    println!(
        "  distance {} {}",
        latest.distance_short()?,
        latest.short_unit()?
    );
    println!(
        "  pace     {} {}",
        latest.pace()?.format("%H:%M:%S"),
        latest.pace_unit()?
    );

    Ok(())
}
