use deribit_http_client::{DeribitClient, Kind, PublicGetInstrumentsRequest};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Public calls against the test exchange
    let client = DeribitClient::testnet()?;

    // 1) Connectivity check
    let version = client.test_connectivity().await?;
    println!("API version: {}", version.version);

    // 2) List instruments (example: BTC futures, not expired)
    let instruments = client
        .call(PublicGetInstrumentsRequest {
            currency: "BTC".to_string(),
            kind: Some(Kind::Future),
            expired: Some(false),
        })
        .await?;
    println!("BTC futures ({}):", instruments.len());
    for instrument in &instruments {
        println!("  {}", instrument.name);
    }

    // 3) Fetch an order book snapshot (example: BTC perpetual)
    let book = client.get_order_book("BTC-PERPETUAL", 5).await?;
    println!("Best bid: {:?}, best ask: {:?}", book.best_bid_price, book.best_ask_price);
    for (price, amount) in &book.bids {
        println!("  bid {price:>10} x {amount}");
    }

    Ok(())
}
