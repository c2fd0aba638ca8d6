#[tokio::main]
async fn main() {
    if let Err(e) = stellar_txn_inspector::cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
