use deribit_http_client::*;
use serde_json::json;

#[test]
fn interpret_returns_result_unchanged() {
    let result = json!({
        "instrument_name": "BTC-PERPETUAL",
        "bids": [[50000.5, 120.0], [50000.0, 40.0]],
        "nested": { "flag": true, "list": [1, "two", null] }
    });
    let raw = json!({ "jsonrpc": "2.0", "id": 3, "result": result.clone() }).to_string();
    assert_eq!(
        interpret(&raw),
        RpcResponse::Success {
            id: Some(3),
            result
        }
    );
}

#[test]
fn interpret_accepts_scalar_and_null_results() {
    assert_eq!(
        interpret(r#"{"result": 1755765833825}"#),
        RpcResponse::Success {
            id: None,
            result: json!(1_755_765_833_825i64)
        }
    );
    assert_eq!(
        interpret(r#"{"result": null}"#),
        RpcResponse::Success {
            id: None,
            result: json!(null)
        }
    );
}

#[test]
fn interpret_is_total() {
    let inputs = [
        "",
        "   ",
        "not json",
        "{",
        "[]",
        "42",
        "\"result\"",
        "null",
        "{}",
        r#"{"jsonrpc":"2.0","id":1}"#,
        r#"{"error": "plain string"}"#,
        r#"{"error": null}"#,
        r#"{"error": {"data": 5}}"#,
        "<html>502 Bad Gateway</html>",
    ];
    for input in inputs {
        match interpret(input) {
            RpcResponse::Success { .. } | RpcResponse::Failure { .. } | RpcResponse::Malformed(_) => {}
        }
    }
    assert!(matches!(interpret(""), RpcResponse::Malformed(_)));
    assert!(matches!(interpret("[]"), RpcResponse::Malformed(_)));
    assert!(matches!(interpret("{}"), RpcResponse::Malformed(_)));
    assert!(matches!(
        interpret(r#"{"error": "plain string"}"#),
        RpcResponse::Failure { .. }
    ));
}

#[test]
fn error_with_param_and_reason_formats_message() {
    let raw = r#"{"error":{"message":"Invalid params","data":{"param":"amount","reason":"must be positive"}}}"#;
    let RpcResponse::Failure { error, .. } = interpret(raw) else {
        panic!("expected a failure");
    };
    assert_eq!(error.summary(), "Invalid params (amount: must be positive)");
    assert_eq!(
        Error::RpcError(error).to_string(),
        "Invalid params (amount: must be positive)"
    );
}

#[test]
fn error_without_data_uses_message_only() {
    let raw = r#"{"jsonrpc":"2.0","id":9,"error":{"code":13009,"message":"unauthorized"}}"#;
    let RpcResponse::Failure { id, error } = interpret(raw) else {
        panic!("expected a failure");
    };
    assert_eq!(id, Some(9));
    assert_eq!(error.code, 13009);
    assert_eq!(error.data, None);
    assert_eq!(error.to_string(), "unauthorized");
}

#[test]
fn error_with_partial_data_keeps_the_present_field() {
    let raw = r#"{"error":{"code":11044,"message":"not_open_order","data":{"reason":"already cancelled"}}}"#;
    let RpcResponse::Failure { error, .. } = interpret(raw) else {
        panic!("expected a failure");
    };
    assert_eq!(
        error.data,
        Some(ErrorData::Other(json!({ "reason": "already cancelled" })))
    );
    assert_eq!(error.summary(), "not_open_order (already cancelled)");

    let raw = r#"{"error":{"message":"Invalid params","data":{"param":"price"}}}"#;
    let RpcResponse::Failure { error, .. } = interpret(raw) else {
        panic!("expected a failure");
    };
    assert_eq!(error.summary(), "Invalid params (price)");
}

#[test]
fn error_with_unknown_data_shape_is_kept_generic() {
    let error = RpcError::from_value(&json!({
        "code": 10001,
        "message": "error",
        "data": { "retry_after": 5 }
    }));
    assert_eq!(
        error.data,
        Some(ErrorData::Other(json!({ "retry_after": 5 })))
    );
    assert_eq!(error.summary(), "error");
}

#[test]
fn error_without_message_falls_back_to_code() {
    let RpcResponse::Failure { error, .. } = interpret(r#"{"error":{"code":10009}}"#) else {
        panic!("expected a failure");
    };
    assert_eq!(error.summary(), "RPC error 10009");
}

#[test]
fn error_wins_over_result() {
    let raw = r#"{"result": {}, "error": {"message": "boom"}}"#;
    assert!(matches!(interpret(raw), RpcResponse::Failure { .. }));
}

#[test]
fn instrument_list_projects_names_and_skips_nameless_entries() {
    let result = json!([
        { "instrument_name": "BTC-PERPETUAL", "kind": "future", "base_currency": "BTC", "is_active": true, "tick_size": 0.5 },
        { "kind": "option" },
        { "instrument_name": "ETH-PERPETUAL", "tick_size": "0.05" }
    ]);
    let instruments = PublicGetInstrumentsRequest::parse_result(result).unwrap();
    assert_eq!(instruments.len(), 2);
    assert_eq!(instruments[0].name, "BTC-PERPETUAL");
    assert_eq!(instruments[0].tick_size, Some(0.5));
    assert!(instruments[0].is_active);
    assert_eq!(instruments[1].name, "ETH-PERPETUAL");
    assert_eq!(instruments[1].kind, "");
    assert_eq!(instruments[1].tick_size, None);
}

#[test]
fn instrument_list_rejects_non_array_result() {
    let err = PublicGetInstrumentsRequest::parse_result(json!({})).unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse(_)));
}

#[test]
fn open_orders_tolerate_missing_and_mistyped_fields() {
    let result = json!([
        {
            "order_id": "ETH-1",
            "instrument_name": "ETH-PERPETUAL",
            "direction": "buy",
            "price": 1800.5,
            "amount": 10.0,
            "contracts": 10.0,
            "order_state": "open",
            "order_type": "limit",
            "label": "a"
        },
        {
            "order_id": "BTC-2",
            "direction": "sideways",
            "price": "market_price",
            "contracts": "3"
        }
    ]);
    let orders = PrivateGetOpenOrdersRequest::parse_result(result).unwrap();
    assert_eq!(orders[0].direction, Some(Direction::Buy));
    assert_eq!(orders[0].price, Some(1800.5));
    assert_eq!(orders[0].state, "open");
    assert_eq!(orders[1].order_id, "BTC-2");
    assert_eq!(orders[1].instrument_name, "");
    assert_eq!(orders[1].direction, None);
    assert_eq!(orders[1].price, None);
    assert_eq!(orders[1].contracts, None);
}

#[test]
fn serialized_models_use_exchange_field_names() {
    let wire = json!({
        "order_id": "ETH-1",
        "instrument_name": "ETH-PERPETUAL",
        "direction": "sell",
        "price": 1800.5,
        "amount": 10.0,
        "order_state": "open",
        "order_type": "limit",
        "label": "a"
    });
    let order = Order::from_value(&wire);
    let serialized = serde_json::to_value(&order).unwrap();
    assert_eq!(serialized["instrument_name"], "ETH-PERPETUAL");
    assert_eq!(serialized["order_state"], "open");
    assert_eq!(Order::from_value(&serialized), order);

    let instrument = Instrument::from_value(&json!({
        "instrument_name": "BTC-PERPETUAL",
        "kind": "future",
        "tick_size": 0.5
    }))
    .unwrap();
    let serialized = serde_json::to_value(&instrument).unwrap();
    assert_eq!(Instrument::from_value(&serialized), Some(instrument));
}

#[test]
fn order_book_projection() {
    let result = json!({
        "instrument_name": "BTC-27DEC24-60000-C",
        "bids": [[0.05, 10.0], ["bad", 1.0], [0.045]],
        "asks": [[0.055, 4.0]],
        "best_bid_price": 0.05,
        "best_ask_price": 0.055,
        "mark_price": 0.052,
        "state": "open",
        "timestamp": 1_700_000_000_000u64,
        "greeks": { "delta": 0.41, "gamma": 0.0001, "vega": 12.3, "theta": -8.1, "rho": 3.2 }
    });
    let book = PublicGetOrderBookRequest::parse_result(result).unwrap();
    assert_eq!(book.bids, vec![(0.05, 10.0)]);
    assert_eq!(book.asks, vec![(0.055, 4.0)]);
    assert_eq!(book.last_price, None);
    assert_eq!(book.timestamp, 1_700_000_000_000);
    assert_eq!(book.greeks.as_ref().and_then(|g| g.delta), Some(0.41));
    assert!((book.spread().unwrap() - 0.005).abs() < 1e-12);
}

#[test]
fn position_projection_defaults() {
    let position = PrivateGetPositionRequest::parse_result(json!({
        "instrument_name": "BTC-PERPETUAL",
        "direction": "zero"
    }))
    .unwrap();
    assert_eq!(position.direction, Some(Direction::Zero));
    assert_eq!(position.size, 0.0);
    assert_eq!(position.average_price, None);
}

#[test]
fn placed_order_requires_order_object() {
    let placed = OrderRequest::parse_result(json!({
        "order": { "order_id": "ETH-42", "order_state": "open" },
        "trades": [{}, {}]
    }))
    .unwrap();
    assert_eq!(placed.order.order_id, "ETH-42");
    assert_eq!(placed.trades, 2);

    let err = OrderRequest::parse_result(json!({ "trades": [] })).unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse(_)));
}

#[test]
fn cancel_result_must_report_cancelled_state() {
    let order = PrivateCancelRequest::parse_result(json!({
        "order_id": "ETH-42",
        "order_state": "cancelled"
    }))
    .unwrap();
    assert!(order.is_cancelled());

    let err = PrivateCancelRequest::parse_result(json!({
        "order_id": "ETH-42",
        "order_state": "open"
    }))
    .unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse(_)));
}

#[test]
fn auth_result_defaults_optional_fields() {
    let grant = PublicAuthRequest::parse_result(json!({
        "access_token": "tok",
        "expires_in": "soon",
        "scope": 7
    }))
    .unwrap();
    assert_eq!(grant.access_token, "tok");
    assert_eq!(grant.refresh_token, "");
    assert_eq!(grant.expires_in, 0);
    assert_eq!(grant.scope, "");

    let err = PublicAuthRequest::parse_result(json!({ "refresh_token": "r" })).unwrap_err();
    assert!(matches!(err, Error::UnexpectedResponse(_)));
}
