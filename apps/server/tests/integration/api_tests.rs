//! HTTP tests for upload, runs and dashboard endpoints.

use actix_web::http::header::CONTENT_TYPE;
use actix_web::{App, test, web};
use robot_results_lib::api;
use robot_results_lib::config::{DashboardConfig, UPLOADED_BY_HEADER};
use robot_results_lib::db::NewRunUpload;
use robot_results_lib::services::robot::parse_output_xml;
use serde_json::Value;
use uuid::Uuid;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_health_endpoint() {
    let app = test::init_service(
        App::new().service(web::scope("/api/v1").configure(api::configure_health_routes)),
    )
    .await;

    let req = test::TestRequest::get().uri("/api/v1/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");
}

#[actix_rt::test]
async fn test_dashboard_rejects_non_numeric_days() {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(DashboardConfig::default()))
            .service(web::scope("/api/v1").configure(api::configure_dashboard_routes)),
    )
    .await;

    for uri in [
        "/api/v1/dashboard?days=abc",
        "/api/v1/dashboard/trends?days=-1",
        "/api/v1/dashboard/hosts?days=1.5",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "{}", uri);
    }
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_upload_rf7_raw_body_and_fetch_detail() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/upload?name=nightly.xml")
        .insert_header((CONTENT_TYPE, "application/xml"))
        .insert_header((UPLOADED_BY_HEADER, "ci-bot"))
        .set_payload(RF7_OUTPUT)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Nightly");
    assert_eq!(body["total"], 3);
    assert_eq!(body["passed"], 1);
    assert_eq!(body["failed"], 1);
    assert_eq!(body["skipped"], 1);
    assert_eq!(body["status"], "COMPLETED");
    assert_eq!(body["suitesCount"], 2);

    let id = body["id"].as_str().unwrap().to_string();
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/runs/{}", id))
        .to_request();
    let detail: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(detail["id"], id.as_str());
    assert_eq!(detail["source"], "nightly.xml");
    assert_eq!(detail["host"], "build-agent-7");
    assert_eq!(detail["uploadedBy"], "ci-bot");
    assert_eq!(detail["duration"], 12_345);

    let suites = detail["suites"].as_array().unwrap();
    assert_eq!(suites.len(), 2);
    assert_eq!(suites[0]["name"], "Nightly");
    assert_eq!(suites[1]["name"], "API");
    assert_eq!(suites[1]["tests"][0]["status"], "FAIL");
    assert_eq!(
        suites[1]["tests"][0]["message"],
        "Expected status 200 but got 500"
    );
    assert_eq!(suites[1]["tests"][0]["tags"][1], "regression");
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_upload_rf6_multipart() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let boundary = "robot-boundary";
    let req = test::TestRequest::post()
        .uri("/api/v1/upload")
        .insert_header((
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        ))
        .set_payload(multipart_body(boundary, "file", "results/output.xml", RF6_OUTPUT))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Acceptance");
    assert_eq!(body["total"], 4);
    assert_eq!(body["suitesCount"], 2);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_upload_rejects_invalid_documents() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    for payload in ["", "<testsuites/>", "<robot><suite></robot>"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/upload")
            .insert_header((CONTENT_TYPE, "application/xml"))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "payload {:?}", payload);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_INPUT");
    }

    let req = test::TestRequest::post()
        .uri("/api/v1/upload")
        .insert_header((
            CONTENT_TYPE,
            "multipart/form-data; boundary=robot-boundary",
        ))
        .set_payload(multipart_body("robot-boundary", "other", "x.xml", RF7_OUTPUT))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_upload_rejects_oversized_body() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let oversized = format!(
        "<robot>{}</robot>",
        " ".repeat(test_upload_config().max_upload_size)
    );
    let req = test::TestRequest::post()
        .uri("/api/v1/upload")
        .insert_header((CONTENT_TYPE, "application/xml"))
        .set_payload(oversized)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 413);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_run_lookup_errors() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri("/api/v1/runs/not-a-uuid")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/runs/{}", Uuid::now_v7()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_runs_list_is_paginated() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/upload")
        .insert_header((CONTENT_TYPE, "application/xml"))
        .set_payload(RF6_OUTPUT)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), 200);

    let req = test::TestRequest::get()
        .uri("/api/v1/runs?page=1&limit=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["runs"].as_array().unwrap().len(), 1);
    assert_eq!(body["pagination"]["limit"], 1);
    assert!(body["pagination"]["total"].as_u64().unwrap() >= 1);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_dashboard_endpoints_shapes() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/v1/dashboard").to_request();
    let overview: Value = test::call_and_read_body_json(&app, req).await;
    for key in [
        "totalRuns",
        "totalTests",
        "totalPassed",
        "totalFailed",
        "totalSkipped",
        "avgPassRate",
        "recentRuns",
        "dailyTrend",
        "suiteBreakdown",
    ] {
        assert!(overview.get(key).is_some(), "missing {}", key);
    }
    assert!(overview["recentRuns"].as_array().unwrap().len() <= 5);
    assert!(overview["suiteBreakdown"].as_array().unwrap().len() <= 10);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/trends?days=7")
        .to_request();
    let trends: Value = test::call_and_read_body_json(&app, req).await;
    assert!(trends["trend"].is_array());
    assert!(trends["summary"]["passRate"].is_number());

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/suites")
        .to_request();
    let suites: Value = test::call_and_read_body_json(&app, req).await;
    assert!(suites["suites"].is_array());

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/hosts?days=3")
        .to_request();
    let hosts: Value = test::call_and_read_body_json(&app, req).await;
    let dates = hosts["dates"].as_array().unwrap();
    assert_eq!(dates.len(), 4);
    for row in hosts["heatmap"].as_array().unwrap() {
        assert_eq!(row["data"].as_array().unwrap().len(), 4);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard/hosts?days=10000")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_rt::test]
#[ignore = "requires PostgreSQL"]
async fn test_suite_groups_merge_stored_runs() {
    let pool = create_test_pool().await;
    let run = parse_output_xml(RF6_OUTPUT, fixed_now()).unwrap();
    for _ in 0..2 {
        pool.insert_parsed_run(
            &run,
            NewRunUpload {
                source: "output.xml".to_string(),
                uploaded_by: None,
            },
        )
        .await
        .unwrap();
    }

    let groups = pool.suite_groups(None).await.unwrap();
    let login = groups.iter().find(|g| g.name == "Login").unwrap();
    assert!(login.occurrences >= 2);
    assert_eq!(login.total, login.occurrences * 2);
    assert_eq!(login.failed, login.occurrences);
    assert_eq!(login.timed_occurrences, login.occurrences);
    assert_eq!(login.avg_duration(), Some(3_700));
    assert_eq!(groups.iter().filter(|g| g.name == "Login").count(), 1);

    // Fixture runs start in 2024
    let future = fixed_now() + chrono::Duration::days(365 * 10);
    assert!(pool.suite_groups(Some(future)).await.unwrap().is_empty());
}
