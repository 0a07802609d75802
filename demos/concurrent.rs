use deribit_http_client::{CallState, DeribitClient};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = DeribitClient::testnet()?;

    // Call 1: order book, polled the way a UI frame loop would
    let c1 = client.clone();
    let book = client.dispatch(async move { c1.get_order_book("BTC-PERPETUAL", 10).await });

    // Call 2: instrument names, awaited directly
    let c2 = client.clone();
    let names = client.dispatch(async move { c2.list_instrument_names().await });

    while book.is_loading() {
        println!("order book loading...");
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    match book.state() {
        CallState::Done(Ok(book)) => println!("Spread: {:?}", book.spread()),
        state => println!("Order book failed: {:?}", state.message()),
    }

    match names.wait().await {
        Ok(names) => println!("{} instruments", names.len()),
        Err(e) => println!("Instrument list failed: {e}"),
    }

    Ok(())
}
