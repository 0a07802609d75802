//! Typed results projected out of `result` payloads.
//!
//! Models are read with `from_value`/`from_result`, which tolerate missing
//! and mistyped fields. They serialize with the exchange's field names.

use crate::error::{Error, Result};
use crate::response::{bool_field, f64_field, levels_field, opt_str_field, str_field, u64_field};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Buy,
    Sell,
    Zero,
}

impl Direction {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "buy" => Some(Direction::Buy),
            "sell" => Some(Direction::Sell),
            "zero" => Some(Direction::Zero),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Instrument {
    #[serde(rename = "instrument_name")]
    pub name: String,
    pub kind: String,
    pub base_currency: String,
    pub is_active: bool,
    pub tick_size: Option<f64>,
}

impl Instrument {
    /// Entries without an `instrument_name` yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        let name = value.get("instrument_name")?.as_str()?.to_string();
        Some(Self {
            name,
            kind: str_field(value, "kind"),
            base_currency: str_field(value, "base_currency"),
            is_active: bool_field(value, "is_active"),
            tick_size: f64_field(value, "tick_size"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub order_id: String,
    pub instrument_name: String,
    pub direction: Option<Direction>,
    /// `None` when the exchange reports a non-numeric price like `market_price`.
    pub price: Option<f64>,
    pub amount: Option<f64>,
    pub contracts: Option<f64>,
    #[serde(rename = "order_state")]
    pub state: String,
    pub order_type: String,
    pub label: String,
}

impl Order {
    pub fn from_value(value: &Value) -> Self {
        Self {
            order_id: str_field(value, "order_id"),
            instrument_name: str_field(value, "instrument_name"),
            direction: value
                .get("direction")
                .and_then(Value::as_str)
                .and_then(Direction::parse),
            price: f64_field(value, "price"),
            amount: f64_field(value, "amount"),
            contracts: f64_field(value, "contracts"),
            state: str_field(value, "order_state"),
            order_type: str_field(value, "order_type"),
            label: str_field(value, "label"),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state == "cancelled"
    }
}

/// Result of `private/buy`, `private/sell` and `private/edit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedOrder {
    pub order: Order,
    pub trades: usize,
}

impl PlacedOrder {
    pub fn from_result(result: &Value) -> Result<Self> {
        let order = result
            .get("order")
            .filter(|order| order.is_object())
            .ok_or_else(|| Error::UnexpectedResponse("result has no `order` object".into()))?;
        Ok(Self {
            order: Order::from_value(order),
            trades: result
                .get("trades")
                .and_then(Value::as_array)
                .map_or(0, Vec::len),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Greeks {
    pub delta: Option<f64>,
    pub gamma: Option<f64>,
    pub vega: Option<f64>,
    pub theta: Option<f64>,
    pub rho: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBook {
    pub instrument_name: String,
    /// `(price, amount)`, best first.
    pub bids: Vec<(f64, f64)>,
    pub asks: Vec<(f64, f64)>,
    pub best_bid_price: Option<f64>,
    pub best_ask_price: Option<f64>,
    pub mark_price: Option<f64>,
    pub last_price: Option<f64>,
    pub index_price: Option<f64>,
    pub open_interest: Option<f64>,
    pub state: String,
    pub timestamp: u64,
    /// Only present for options.
    pub greeks: Option<Greeks>,
}

impl OrderBook {
    pub fn from_result(result: &Value) -> Result<Self> {
        if !result.is_object() {
            return Err(Error::UnexpectedResponse(
                "order book result is not an object".into(),
            ));
        }
        Ok(Self {
            instrument_name: str_field(result, "instrument_name"),
            bids: levels_field(result, "bids"),
            asks: levels_field(result, "asks"),
            best_bid_price: f64_field(result, "best_bid_price"),
            best_ask_price: f64_field(result, "best_ask_price"),
            mark_price: f64_field(result, "mark_price"),
            last_price: f64_field(result, "last_price"),
            index_price: f64_field(result, "index_price"),
            open_interest: f64_field(result, "open_interest"),
            state: str_field(result, "state"),
            timestamp: u64_field(result, "timestamp"),
            greeks: result
                .get("greeks")
                .filter(|g| g.is_object())
                .map(|g| Greeks {
                    delta: f64_field(g, "delta"),
                    gamma: f64_field(g, "gamma"),
                    vega: f64_field(g, "vega"),
                    theta: f64_field(g, "theta"),
                    rho: f64_field(g, "rho"),
                }),
        })
    }

    pub fn spread(&self) -> Option<f64> {
        Some(self.best_ask_price? - self.best_bid_price?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Position {
    pub instrument_name: String,
    pub direction: Option<Direction>,
    pub kind: String,
    pub size: f64,
    pub average_price: Option<f64>,
    pub mark_price: Option<f64>,
    pub floating_profit_loss: Option<f64>,
    pub total_profit_loss: Option<f64>,
}

impl Position {
    pub fn from_result(result: &Value) -> Result<Self> {
        if !result.is_object() {
            return Err(Error::UnexpectedResponse(
                "position result is not an object".into(),
            ));
        }
        Ok(Self {
            instrument_name: str_field(result, "instrument_name"),
            direction: result
                .get("direction")
                .and_then(Value::as_str)
                .and_then(Direction::parse),
            kind: str_field(result, "kind"),
            size: f64_field(result, "size").unwrap_or(0.0),
            average_price: f64_field(result, "average_price"),
            mark_price: f64_field(result, "mark_price"),
            floating_profit_loss: f64_field(result, "floating_profit_loss"),
            total_profit_loss: f64_field(result, "total_profit_loss"),
        })
    }
}

/// Result of `public/test`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiVersion {
    pub version: String,
}

impl ApiVersion {
    pub fn from_result(result: &Value) -> Self {
        Self {
            version: str_field(result, "version"),
        }
    }
}

/// Token payload of `public/auth`, before it is stamped into a `Session`.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthGrant {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub scope: String,
}

impl AuthGrant {
    pub fn from_result(result: &Value) -> Result<Self> {
        let access_token = opt_str_field(result, "access_token").ok_or_else(|| {
            Error::UnexpectedResponse("auth result has no `access_token`".into())
        })?;
        Ok(Self {
            access_token,
            refresh_token: str_field(result, "refresh_token"),
            expires_in: u64_field(result, "expires_in"),
            scope: str_field(result, "scope"),
        })
    }
}
