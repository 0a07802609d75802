use crate::ApiRequest;
use crate::error::{Error, Result, ValidationError};
use crate::models::{ApiVersion, AuthGrant, Instrument, Order, OrderBook, PlacedOrder, Position};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Depths accepted by `public/get_order_book`.
pub const ORDER_BOOK_DEPTHS: [u32; 8] = [1, 5, 10, 20, 50, 100, 1000, 10000];

/// Longest user label the exchange accepts.
pub const MAX_LABEL_LEN: usize = 64;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublicAuthGrantType {
    #[default]
    ClientCredentials,
    RefreshToken,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    #[default]
    Future,
    FutureCombo,
    Option,
    OptionCombo,
    Spot,
}

/// Order type filter for `private/get_open_orders`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenOrdersType {
    #[default]
    All,
    Limit,
    StopAll,
    StopLimit,
    StopMarket,
    TakeAll,
    TakeLimit,
    TakeMarket,
    TrailingAll,
    TrailingStop,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    #[default]
    Limit,
    StopLimit,
    Market,
    StopMarket,
    TakeLimit,
    TakeMarket,
    MarketLimit,
    TrailingStop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Limit => "limit",
            OrderType::StopLimit => "stop_limit",
            OrderType::Market => "market",
            OrderType::StopMarket => "stop_market",
            OrderType::TakeLimit => "take_limit",
            OrderType::TakeMarket => "take_market",
            OrderType::MarketLimit => "market_limit",
            OrderType::TrailingStop => "trailing_stop",
        }
    }

    pub fn requires_price(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLimit)
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    #[default]
    Buy,
    Sell,
}

fn require_non_empty(value: &str, field: &'static str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty(field));
    }
    Ok(())
}

fn require_positive(value: Option<f64>, field: &'static str) -> std::result::Result<(), ValidationError> {
    match value {
        Some(v) if v.is_nan() || v <= 0.0 => Err(ValidationError::NotPositive(field)),
        _ => Ok(()),
    }
}

fn is_positive(value: &Option<f64>) -> bool {
    value.is_some_and(|v| v > 0.0)
}

/// Zero, negative and NaN quantities are left out of the params.
fn skip_quantity(value: &Option<f64>) -> bool {
    !is_positive(value)
}

fn validate_quantity(
    amount: Option<f64>,
    contracts: Option<f64>,
) -> std::result::Result<(), ValidationError> {
    if is_positive(&amount) || is_positive(&contracts) {
        return Ok(());
    }
    Err(ValidationError::MissingQuantity)
}

fn expect_array(result: Value, what: &str) -> Result<Vec<Value>> {
    match result {
        Value::Array(items) => Ok(items),
        _ => Err(Error::UnexpectedResponse(format!("{what} result is not an array"))),
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PublicAuthRequest {
    pub grant_type: PublicAuthGrantType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Milliseconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl std::fmt::Debug for PublicAuthRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicAuthRequest")
            .field("grant_type", &self.grant_type)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl ApiRequest for PublicAuthRequest {
    type Response = AuthGrant;

    fn method_name(&self) -> &'static str {
        "public/auth"
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        match self.grant_type {
            PublicAuthGrantType::ClientCredentials => {
                require_non_empty(self.client_id.as_deref().unwrap_or_default(), "client_id")?;
                require_non_empty(
                    self.client_secret.as_deref().unwrap_or_default(),
                    "client_secret",
                )
            }
            PublicAuthGrantType::RefreshToken => require_non_empty(
                self.refresh_token.as_deref().unwrap_or_default(),
                "refresh_token",
            ),
        }
    }

    fn parse_result(result: Value) -> Result<AuthGrant> {
        AuthGrant::from_result(&result)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicGetInstrumentsRequest {
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<Kind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expired: Option<bool>,
}

impl Default for PublicGetInstrumentsRequest {
    fn default() -> Self {
        Self {
            currency: "any".to_string(),
            kind: None,
            expired: None,
        }
    }
}

impl ApiRequest for PublicGetInstrumentsRequest {
    type Response = Vec<Instrument>;

    fn method_name(&self) -> &'static str {
        "public/get_instruments"
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_non_empty(&self.currency, "currency")
    }

    fn parse_result(result: Value) -> Result<Vec<Instrument>> {
        Ok(expect_array(result, "instrument list")?
            .iter()
            .filter_map(Instrument::from_value)
            .collect())
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PublicTestRequest {}

impl ApiRequest for PublicTestRequest {
    type Response = ApiVersion;

    fn method_name(&self) -> &'static str {
        "public/test"
    }

    fn parse_result(result: Value) -> Result<ApiVersion> {
        Ok(ApiVersion::from_result(&result))
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PublicGetOrderBookRequest {
    pub instrument_name: String,
    pub depth: u32,
}

impl ApiRequest for PublicGetOrderBookRequest {
    type Response = OrderBook;

    fn method_name(&self) -> &'static str {
        "public/get_order_book"
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_non_empty(&self.instrument_name, "instrument_name")?;
        if !ORDER_BOOK_DEPTHS.contains(&self.depth) {
            return Err(ValidationError::InvalidDepth(self.depth));
        }
        Ok(())
    }

    fn parse_result(result: Value) -> Result<OrderBook> {
        OrderBook::from_result(&result)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PrivateGetPositionRequest {
    pub instrument_name: String,
}

impl ApiRequest for PrivateGetPositionRequest {
    type Response = Position;

    fn method_name(&self) -> &'static str {
        "private/get_position"
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_non_empty(&self.instrument_name, "instrument_name")
    }

    fn parse_result(result: Value) -> Result<Position> {
        Position::from_result(&result)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PrivateGetOpenOrdersRequest {
    pub kind: Kind,
    pub r#type: OpenOrdersType,
}

impl ApiRequest for PrivateGetOpenOrdersRequest {
    type Response = Vec<Order>;

    fn method_name(&self) -> &'static str {
        "private/get_open_orders"
    }

    fn parse_result(result: Value) -> Result<Vec<Order>> {
        Ok(expect_array(result, "open orders")?
            .iter()
            .map(Order::from_value)
            .collect())
    }
}

/// A new order. Sent as `private/buy` or `private/sell` depending on `side`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub instrument_name: String,
    pub r#type: OrderType,
    pub label: String,
    #[serde(skip)]
    pub side: Side,
    #[serde(skip_serializing_if = "skip_quantity")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "skip_quantity")]
    pub contracts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ApiRequest for OrderRequest {
    type Response = PlacedOrder;

    fn method_name(&self) -> &'static str {
        match self.side {
            Side::Buy => "private/buy",
            Side::Sell => "private/sell",
        }
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_non_empty(&self.instrument_name, "instrument_name")?;
        require_non_empty(&self.label, "label")?;
        let len = self.label.chars().count();
        if len > MAX_LABEL_LEN {
            return Err(ValidationError::LabelTooLong {
                len,
                max: MAX_LABEL_LEN,
            });
        }
        validate_quantity(self.amount, self.contracts)?;
        if self.r#type.requires_price() && self.price.is_none() {
            return Err(ValidationError::MissingPrice(self.r#type.as_str()));
        }
        require_positive(self.price, "price")
    }

    fn parse_result(result: Value) -> Result<PlacedOrder> {
        PlacedOrder::from_result(&result)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PrivateEditRequest {
    pub order_id: String,
    #[serde(skip_serializing_if = "skip_quantity")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "skip_quantity")]
    pub contracts: Option<f64>,
}

impl ApiRequest for PrivateEditRequest {
    type Response = PlacedOrder;

    fn method_name(&self) -> &'static str {
        "private/edit"
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_non_empty(&self.order_id, "order_id")?;
        validate_quantity(self.amount, self.contracts)
    }

    fn parse_result(result: Value) -> Result<PlacedOrder> {
        PlacedOrder::from_result(&result)
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct PrivateCancelRequest {
    pub order_id: String,
}

impl ApiRequest for PrivateCancelRequest {
    type Response = Order;

    fn method_name(&self) -> &'static str {
        "private/cancel"
    }

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        require_non_empty(&self.order_id, "order_id")
    }

    fn parse_result(result: Value) -> Result<Order> {
        if !result.is_object() {
            return Err(Error::UnexpectedResponse(
                "cancel result is not an object".into(),
            ));
        }
        let order = Order::from_value(&result);
        if !order.is_cancelled() {
            return Err(Error::UnexpectedResponse(format!(
                "order {} is in state `{}` after cancel",
                order.order_id, order.state
            )));
        }
        Ok(order)
    }
}
