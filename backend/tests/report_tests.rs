//! Reporting rule tests
//!
//! Stock classification, the alert threshold and the response envelope.

use shared::models::{is_low_stock, StockStatus};
use shared::types::{ApiResponse, DateRange};

#[test]
fn report_status_is_low_only_below_minimum() {
    // the report classifies strictly below the threshold...
    assert_eq!(StockStatus::classify(9, 10), StockStatus::LowStock);
    assert_eq!(StockStatus::classify(10, 10), StockStatus::Normal);
    assert_eq!(StockStatus::classify(11, 10), StockStatus::Normal);
}

#[test]
fn alert_list_includes_the_threshold_itself() {
    // ...while the live alert list is inclusive of it
    assert!(is_low_stock(10, 10));
    assert!(is_low_stock(0, 0));
    assert!(!is_low_stock(11, 10));
}

#[test]
fn stock_status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&StockStatus::LowStock).unwrap(),
        "\"low_stock\""
    );
    assert_eq!(StockStatus::Normal.as_str(), "normal");
}

#[test]
fn date_range_is_inclusive() {
    let range = DateRange::new(
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        chrono::NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    );

    assert!(range.contains(chrono::NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    assert!(range.contains(chrono::NaiveDate::from_ymd_opt(2024, 3, 31).unwrap()));
    assert!(!range.contains(chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
}

#[test]
fn success_envelope_carries_data_without_message() {
    let response = ApiResponse::success(vec![1, 2, 3]);
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["ok"], true);
    assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    assert!(json.get("message").is_none());
}

#[test]
fn message_envelope_carries_no_data() {
    let response: ApiResponse<()> = ApiResponse::message("Item deleted");
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["ok"], true);
    assert_eq!(json["message"], "Item deleted");
    assert!(json.get("data").is_none());
}
