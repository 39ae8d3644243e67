use crate::common::{TestApp, routes};
use serde_json::json;

fn valid_problem_body(title: &str) -> serde_json::Value {
    json!({
        "title": title,
        "content": "Read two integers and print their sum.",
        "time_limit": 1000,
        "memory_limit": 262144,
    })
}

mod problem_creation {
    use super::*;

    #[tokio::test]
    async fn creates_problem() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::PROBLEMS, &valid_problem_body("A + B")).await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["title"], "A + B");
        assert_eq!(res.body["time_limit"], 1000);
        assert_eq!(res.body["memory_limit"], 262144);
    }

    #[tokio::test]
    async fn rejects_out_of_range_limits() {
        let app = TestApp::spawn().await;

        let mut body = valid_problem_body("Slow");
        body["time_limit"] = json!(0);
        let res = app.post(routes::PROBLEMS, &body).await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");

        let mut body = valid_problem_body("Hungry");
        body["memory_limit"] = json!(2_000_000);
        let res = app.post(routes::PROBLEMS, &body).await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn rejects_missing_fields_with_structured_error() {
        let app = TestApp::spawn().await;

        let res = app.post(routes::PROBLEMS, &json!({ "title": "No body" })).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod problem_retrieval {
    use super::*;

    #[tokio::test]
    async fn gets_problem_with_content() {
        let app = TestApp::spawn().await;
        let id = app.create_problem("Full").await;

        let res = app.get(&routes::problem(id)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["id"], id);
        assert!(res.body["content"].as_str().unwrap().contains("Solve this"));
    }

    #[tokio::test]
    async fn returns_404_for_missing_problem() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::problem(999_999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn list_omits_content_and_searches_titles() {
        let app = TestApp::spawn().await;
        app.create_problem("Shortest Path").await;
        app.create_problem("Knapsack").await;

        let res = app.get(&format!("{}?search=PATH", routes::PROBLEMS)).await;

        assert_eq!(res.status, 200);
        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["title"], "Shortest Path");
        assert!(data[0].get("content").is_none());
        assert_eq!(res.body["pagination"]["total"], 1);
    }

    #[tokio::test]
    async fn search_treats_wildcards_literally() {
        let app = TestApp::spawn().await;
        app.create_problem("100% Correct").await;
        app.create_problem("Other").await;

        let res = app.get(&format!("{}?search=%25", routes::PROBLEMS)).await;

        let data = res.body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["title"], "100% Correct");
    }
}
