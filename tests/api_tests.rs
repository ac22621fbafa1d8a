use axum_test::TestServer;
use serde_json::json;

use pantry_api::api::{create_router, AppState};

fn create_test_server() -> TestServer {
    let state = AppState::new();
    let app = create_router(state);
    TestServer::new(app).unwrap()
}

async fn publish_pancakes(server: &TestServer) -> String {
    let response = server
        .post("/recipes")
        .json(&json!({
            "name": "Pancakes",
            "category": "breakfast",
            "steps": ["Mix", "Fry"],
            "ingredients": [
                {"name": "Flour", "quantity": 1.0, "unit": "cup"},
                {"name": "Milk", "quantity": 1.0, "unit": "cup"}
            ],
            "tools": ["Stove"]
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    let recipe: serde_json::Value = response.json();
    recipe["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health_check() {
    let server = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_publish_and_get_recipe() {
    let server = create_test_server();
    let id = publish_pancakes(&server).await;

    let response = server.get("/recipes").await;
    response.assert_status_ok();
    let recipes: Vec<serde_json::Value> = response.json();
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["name"], "Pancakes");
    // names are canonicalized by the engine, not the caller
    assert_eq!(recipes[0]["ingredients"][0]["ingredient"]["name"], "flour");
    assert_eq!(recipes[0]["tools"][0], "stove");

    let response = server.get(&format!("/recipes/{}", id)).await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_get_unknown_recipe_is_404() {
    let server = create_test_server();
    let response = server
        .get("/recipes/00000000-0000-0000-0000-000000000000")
        .await;
    response.assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_recipe_is_rejected_with_validation_error() {
    let server = create_test_server();

    let response = server
        .post("/recipes")
        .json(&json!({
            "name": "Broken",
            "ingredients": [
                {"name": "flour", "quantity": 0.0, "unit": "gram"}
            ]
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("flour"));

    // nothing was published
    let recipes: Vec<serde_json::Value> = server.get("/recipes").await.json();
    assert!(recipes.is_empty());
}

#[tokio::test]
async fn test_dangling_hint_is_rejected() {
    let server = create_test_server();

    let response = server
        .post("/recipes")
        .json(&json!({
            "name": "Broken",
            "ingredients": [{"name": "flour"}],
            "hints": [
                {"target": "saffron", "context": "ingredient", "alternatives": ["turmeric"]}
            ]
        }))
        .await;
    response.assert_status(axum::http::StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_inventory_round_trip() {
    let server = create_test_server();

    server
        .post("/inventory/ingredients")
        .json(&json!({"name": "  Whole Milk ", "quantity": 1.0, "unit": "liter"}))
        .await
        .assert_status_ok();
    server
        .post("/inventory/tools")
        .json(&json!({"name": "Oven"}))
        .await
        .assert_status_ok();
    server
        .post("/inventory/exclusions")
        .json(&json!({"name": "Peanuts"}))
        .await
        .assert_status_ok();

    let inventory: serde_json::Value = server.get("/inventory").await.json();
    assert!(inventory["ingredients"].get("whole milk").is_some());
    assert_eq!(inventory["tools"][0], "oven");
    assert_eq!(inventory["exclusions"][0], "peanuts");

    server
        .delete("/inventory/ingredients/whole%20milk")
        .await
        .assert_status(axum::http::StatusCode::NO_CONTENT);
    server
        .delete("/inventory/ingredients/whole%20milk")
        .await
        .assert_status(axum::http::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_match_with_tool_substitution() {
    let server = create_test_server();
    let id = publish_pancakes(&server).await;

    // global rule: an oven can stand in for a stove
    server
        .post("/substitutions")
        .json(&json!({
            "target": "stove",
            "context": "tool",
            "alternatives": [{"name": "oven", "score": 0.7}]
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    server
        .post("/inventory/ingredients")
        .json(&json!({"name": "flour"}))
        .await
        .assert_status_ok();
    server
        .post("/inventory/tools")
        .json(&json!({"name": "oven"}))
        .await
        .assert_status_ok();

    // milk is missing and unsubstitutable: status stays missing even though
    // the tools are satisfiable
    let report: serde_json::Value = server.get(&format!("/match/{}", id)).await.json();
    assert_eq!(report["status"], "missing");
    assert_eq!(report["tool_compatibility"], "via_substitution");

    // with milk on hand the recipe is ready via substitution, 0.5 + 0.5 * 0.7
    server
        .post("/inventory/ingredients")
        .json(&json!({"name": "milk"}))
        .await
        .assert_status_ok();
    let report: serde_json::Value = server.get(&format!("/match/{}", id)).await.json();
    assert_eq!(report["status"], "ready_with_substitution");
    assert!((report["score"].as_f64().unwrap() - 0.85).abs() < 1e-9);
}

#[tokio::test]
async fn test_match_all_respects_limit_and_order() {
    let server = create_test_server();
    publish_pancakes(&server).await;
    server
        .post("/recipes")
        .json(&json!({"name": "Tap Water", "ingredients": []}))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let reports: Vec<serde_json::Value> = server.get("/match").await.json();
    assert_eq!(reports.len(), 2);
    // the recipe with no requirements ranks first
    assert_eq!(reports[0]["recipe_name"], "Tap Water");
    assert_eq!(reports[0]["score"], 1.0);

    let limited: Vec<serde_json::Value> = server.get("/match?limit=1").await.json();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn test_recipe_substitutions_endpoint() {
    let server = create_test_server();
    let id = publish_pancakes(&server).await;

    server
        .post("/substitutions")
        .json(&json!({
            "target": "milk",
            "context": "ingredient",
            "alternatives": [{"name": "oat milk", "score": 0.8}]
        }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let alternatives: Vec<serde_json::Value> = server
        .get(&format!("/recipes/{}/substitutions?target=milk", id))
        .await
        .json();
    assert_eq!(alternatives.len(), 1);
    assert_eq!(alternatives[0]["name"], "oat milk");
}

#[tokio::test]
async fn test_shopping_list_flow() {
    let server = create_test_server();
    let id = publish_pancakes(&server).await;

    server
        .post("/inventory/ingredients")
        .json(&json!({"name": "flour"}))
        .await
        .assert_status_ok();

    // milk is the only unresolved ingredient
    let entries: Vec<serde_json::Value> = server
        .post(&format!("/shopping-list/recipes/{}", id))
        .await
        .json();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["ingredient"], "milk");
    assert_eq!(entries[0]["sources"][0], id);
    assert_eq!(entries[0]["manual"], false);

    // manual addition survives recipe removal
    server
        .post("/shopping-list/manual")
        .json(&json!({"name": "coffee"}))
        .await
        .assert_status_ok();

    let entries: Vec<serde_json::Value> = server
        .delete(&format!("/shopping-list/recipes/{}", id))
        .await
        .json();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["ingredient"], "coffee");
    assert_eq!(entries[0]["manual"], true);

    // toggle + clear completed
    let toggled: serde_json::Value = server
        .post("/shopping-list/entries/coffee/toggle")
        .await
        .json();
    assert_eq!(toggled["completed"], true);

    let cleared: serde_json::Value = server.post("/shopping-list/clear-completed").await.json();
    assert_eq!(cleared["cleared"], 1);

    let entries: Vec<serde_json::Value> = server.get("/shopping-list").await.json();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_excluded_ingredient_forces_missing() {
    let server = create_test_server();
    let id = publish_pancakes(&server).await;

    for name in ["flour", "milk"] {
        server
            .post("/inventory/ingredients")
            .json(&json!({"name": name}))
            .await
            .assert_status_ok();
    }
    server
        .post("/inventory/tools")
        .json(&json!({"name": "stove"}))
        .await
        .assert_status_ok();
    server
        .post("/inventory/exclusions")
        .json(&json!({"name": "flour"}))
        .await
        .assert_status_ok();

    let report: serde_json::Value = server.get(&format!("/match/{}", id)).await.json();
    assert_eq!(report["status"], "missing");
    let flour = &report["ingredients"][0];
    assert_eq!(flour["resolution"]["via"], "unresolved");
    assert_eq!(flour["resolution"]["reason"], "excluded");
}
