//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each case names an operation, its input, the expected request body, a
//! simulated response and either the expected parsed rows or the expected
//! error message. Comparing parsed JSON (not raw strings) avoids false
//! negatives from field-ordering differences.

use todo_client::{ApiError, HttpRequest, HttpResponse, Operation, TodoClient, TodoId, TodoItem};

const VECTORS: &str = include_str!("../../test-vectors/operations.json");

fn build(client: &TodoClient, operation: Operation, input: &serde_json::Value) -> HttpRequest {
    match operation {
        Operation::GetTodos => client.build_get_todos(),
        Operation::AddTodo => client.build_add_todo(input["text"].as_str().unwrap()),
        Operation::ToggleTodo => client.build_toggle_todo(
            &TodoId::new(input["id"].as_str().unwrap()),
            input["done"].as_bool().unwrap(),
        ),
        Operation::DeleteTodo => client.build_delete_todo(&TodoId::new(input["id"].as_str().unwrap())),
    }
    .unwrap()
}

fn parse(client: &TodoClient, operation: Operation, response: HttpResponse) -> Result<Vec<TodoItem>, ApiError> {
    match operation {
        Operation::GetTodos => client.parse_get_todos(response),
        Operation::AddTodo => client.parse_add_todo(response),
        Operation::ToggleTodo => client.parse_toggle_todo(response),
        Operation::DeleteTodo => client.parse_delete_todo(response),
    }
}

#[test]
fn operation_test_vectors() {
    let vectors: serde_json::Value = serde_json::from_str(VECTORS).unwrap();
    let endpoint = vectors["endpoint"].as_str().unwrap();
    let client = TodoClient::new(endpoint);

    let cases = vectors["cases"].as_array().unwrap();
    assert!(!cases.is_empty());

    for case in cases {
        let name = case["name"].as_str().unwrap();
        let operation = Operation::from_name(case["operation"].as_str().unwrap())
            .unwrap_or_else(|| panic!("{name}: unknown operation"));

        // Verify build
        let req = build(&client, operation, &case["input"]);
        assert_eq!(req.url, endpoint, "{name}: url");
        assert!(
            req.headers
                .contains(&("content-type".to_string(), "application/json".to_string())),
            "{name}: content-type"
        );
        let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body, case["expected_request"]["body"], "{name}: body");

        // Verify parse
        let sim = &case["simulated_response"];
        let response = HttpResponse {
            status: sim["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: sim["body"].as_str().unwrap().to_string(),
        };
        let result = parse(&client, operation, response);

        if let Some(expected_error) = case.get("expected_error") {
            let err = result.expect_err(name);
            assert_eq!(err.to_string(), expected_error.as_str().unwrap(), "{name}: error");
        } else {
            let expected: Vec<TodoItem> = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

#[test]
fn every_operation_has_a_vector() {
    let vectors: serde_json::Value = serde_json::from_str(VECTORS).unwrap();
    for operation in [
        Operation::GetTodos,
        Operation::AddTodo,
        Operation::ToggleTodo,
        Operation::DeleteTodo,
    ] {
        assert!(
            vectors["cases"]
                .as_array()
                .unwrap()
                .iter()
                .any(|case| case["operation"] == operation.name()),
            "missing vector for {operation}"
        );
    }
}
