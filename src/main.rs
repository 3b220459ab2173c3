#[tokio::main]
async fn main() {
    if let Err(e) = hmpi::run().await {
        eprintln!("hmpi: {} ({})", e, e.recovery_suggestion());
        std::process::exit(1);
    }
}
