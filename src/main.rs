#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = smartedu_api::run().await {
        eprintln!("smartedu-api fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
