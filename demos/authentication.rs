use deribit_http_client::{
    ClientConfig, Credentials, DeribitClient, Kind, OpenOrdersType, OrderRequest, OrderType,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // DERIBIT_ENV defaults to the test exchange
    let client = DeribitClient::new(ClientConfig::from_env()?)?;

    // Read credentials from env vars (or a .env file)
    let credentials = Credentials::from_env()?;
    let session = client.authenticate(&credentials).await?;
    println!(
        "Authenticated with scope `{}`, token valid for {}s",
        session.scope, session.expires_in
    );

    let position = client.get_position("BTC-PERPETUAL").await?;
    println!("Position: {:?}", position);

    // A limit order far from the market so it rests on the book
    let placed = client
        .place_order(OrderRequest {
            instrument_name: "BTC-PERPETUAL".to_string(),
            r#type: OrderType::Limit,
            label: "demo".to_string(),
            amount: Some(10.0),
            price: Some(1_000.0),
            ..Default::default()
        })
        .await?;
    println!("Placed {} ({})", placed.order.order_id, placed.order.state);

    let orders = client
        .get_open_orders(Kind::Future, OpenOrdersType::All)
        .await?;
    println!("Open orders: {}", orders.len());

    let edited = client
        .modify_order(&placed.order.order_id, Some(20.0), None)
        .await?;
    println!("Edited amount: {:?}", edited.order.amount);

    let cancelled = client.cancel_order(&placed.order.order_id).await?;
    println!("Order {} is {}", cancelled.order_id, cancelled.state);

    Ok(())
}
