//! Wire format tests for API request and response types

use chrono::Utc;
use rust_decimal_macros::dec;
use uuid::Uuid;

use dutch_server::debts::{CreateDebtRequest, DebtQuery, ExportRequest};
use dutch_server::models::{
    ApiResponse, DebtResponse, DebtStatus, PaginatedResponse, Priority, UserSummary,
};

fn sample_debt_response() -> DebtResponse {
    let now = Utc::now();
    DebtResponse {
        id: Uuid::new_v4(),
        description: "Concert tickets".to_string(),
        amount: dec!(120.00),
        currency: "USD".to_string(),
        status: DebtStatus::Pending,
        is_paid: false,
        creditor_id: Uuid::new_v4(),
        debtor_id: Uuid::new_v4(),
        creditor: UserSummary {
            id: Uuid::new_v4(),
            full_name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
        },
        debtor: UserSummary {
            id: Uuid::new_v4(),
            full_name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
        },
        created_at: now,
        updated_at: now,
        due_date: None,
        paid_at: None,
        notes: None,
        category: None,
        priority: Priority::Medium,
    }
}

#[test]
fn debt_response_uses_camel_case_keys() {
    let json = serde_json::to_value(sample_debt_response()).unwrap();

    assert!(json.get("isPaid").is_some());
    assert!(json.get("creditorId").is_some());
    assert!(json.get("debtorId").is_some());
    assert!(json.get("createdAt").is_some());
    assert!(json.get("dueDate").is_some());
    assert_eq!(json["status"], "PENDING");
    assert_eq!(json["priority"], "MEDIUM");
    assert_eq!(json["creditor"]["fullName"], "Alice");
}

#[test]
fn create_debt_request_accepts_camel_case_payload() {
    let creditor = Uuid::new_v4();
    let debtor = Uuid::new_v4();
    let payload = format!(
        r#"{{
            "description": "Road trip fuel",
            "amount": "45.30",
            "creditorId": "{}",
            "debtorId": "{}",
            "priority": "HIGH"
        }}"#,
        creditor, debtor
    );

    let req: CreateDebtRequest = serde_json::from_str(&payload).unwrap();
    assert_eq!(req.amount, dec!(45.30));
    assert_eq!(req.creditor_id, creditor);
    assert_eq!(req.debtor_id, debtor);
    assert_eq!(req.priority, Some(Priority::High));
    assert!(req.currency.is_none());
}

#[test]
fn debt_query_parses_filter_fields() {
    let json = r#"{
        "page": 2,
        "limit": 25,
        "status": "OVERDUE",
        "isPaid": false,
        "sortBy": "amount",
        "sortOrder": "asc"
    }"#;

    let query: DebtQuery = serde_json::from_str(json).unwrap();
    assert_eq!(query.page, Some(2));
    assert_eq!(query.limit, Some(25));
    assert_eq!(query.status, Some(DebtStatus::Overdue));
    assert_eq!(query.is_paid, Some(false));
    assert_eq!(query.sort_by.as_deref(), Some("amount"));
}

#[test]
fn export_request_defaults_to_json_format() {
    let req: ExportRequest = serde_json::from_str("{}").unwrap();
    assert!(req.format.is_none());
    assert!(req.start_date.is_none());

    let req: ExportRequest = serde_json::from_str(r#"{"format": "csv"}"#).unwrap();
    assert_eq!(
        req.format,
        Some(dutch_server::debts::ExportFormat::Csv)
    );
}

#[test]
fn api_response_envelope_shape() {
    let response = ApiResponse::ok(sample_debt_response());
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["success"], true);
    assert!(json["data"].is_object());
    assert!(json["error"].is_null());
}

#[test]
fn paginated_response_reports_total_pages() {
    let page = PaginatedResponse {
        data: vec![sample_debt_response()],
        total: 21,
        page: 1,
        limit: 10,
        total_pages: 3,
    };
    let json = serde_json::to_value(&page).unwrap();

    assert_eq!(json["total"], 21);
    assert_eq!(json["totalPages"], 3);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}
