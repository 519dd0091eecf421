#[tokio::main]
async fn main() {
    if let Err(e) = agroscan::run().await {
        tracing::error!("{e}");
        eprintln!("agroscan: {e}");
        std::process::exit(1);
    }
}
