use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use jiff::tz::TimeZone;
use serde_json::{json, Value};
use tower::ServiceExt;

use sonora_api::state::AppState;
use sonora_storage::objects::ObjectStore;
use sonora_storage::records::Records;

fn test_app() -> Router {
    let state = AppState::new(Records::new(ObjectStore::in_memory()), TimeZone::UTC);
    sonora_api::app(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(value) => Body::from(serde_json::to_vec(&value).unwrap()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_patient(app: &Router, body: Value) -> String {
    let (status, patient) = send(app, Method::POST, "/patients", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "{patient}");
    patient["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn adult_audiogram_reports_pta_per_ear() {
    let app = test_app();
    let id = create_patient(
        &app,
        json!({
            "rut": "12.345.678-5",
            "first_name": "Ana",
            "last_name": "Rojas",
            "birth_date": "1980-06-15"
        }),
    )
    .await;

    let (status, audiogram) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/audiograms"),
        Some(json!({
            "date": "2024-05-20",
            "thresholds": [
                { "ear": "R", "pathway": "AC", "symbol": "O",
                  "levels": { "f_500": 21, "f_1000": 22, "f_2000": 24 } },
                { "ear": "L", "pathway": "AC", "symbol": "X",
                  "levels": { "f_500": 40, "f_1000": 45 } }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{audiogram}");
    assert_eq!(audiogram["age_at_exam"], 43);
    assert_eq!(audiogram["pta"]["right"], 22.3);
    assert_eq!(audiogram["pta"]["left"], Value::Null);
    assert_eq!(audiogram["pta"]["binaural"], Value::Null);
    assert_eq!(audiogram["exam_type"], "TONAL");
    assert_eq!(audiogram["transducer"], "INSERT");

    let audiogram_id = audiogram["id"].as_str().unwrap();
    let (status, fetched) = send(
        &app,
        Method::GET,
        &format!("/patients/{id}/audiograms/{audiogram_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["pta"], audiogram["pta"]);

    let (_, right) = send(
        &app,
        Method::GET,
        &format!("/patients/{id}/audiograms/{audiogram_id}/pta/R"),
        None,
    )
    .await;
    assert_eq!(right, json!({ "ear": "R", "pta": 22.3 }));

    let (status, unknown) = send(
        &app,
        Method::GET,
        &format!("/patients/{id}/audiograms/{audiogram_id}/pta/Q"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown["pta"], Value::Null);
}

#[tokio::test]
async fn child_audiogram_uses_pediatric_frequencies() {
    let app = test_app();
    let id = create_patient(
        &app,
        json!({
            "rut": "25.000.000-1",
            "first_name": "Tomás",
            "last_name": "Pérez",
            "birth_date": "2014-01-10"
        }),
    )
    .await;

    let (status, audiogram) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/audiograms"),
        Some(json!({
            "date": "2024-05-20",
            "exam_type": "PLAY",
            "thresholds": [
                { "ear": "R", "levels": { "f_1000": 10, "f_2000": 20, "f_4000": 30 } }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(audiogram["age_at_exam"], 10);
    assert_eq!(audiogram["pta"]["right"], 20.0);
}

#[tokio::test]
async fn duplicate_threshold_rows_are_unprocessable() {
    let app = test_app();
    let id = create_patient(
        &app,
        json!({ "rut": "1-9", "first_name": "Ana", "last_name": "Rojas" }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/audiograms"),
        Some(json!({
            "thresholds": [ { "ear": "R", "pathway": "AC" }, { "ear": "R", "pathway": "AC" } ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "thresholds");

    let (_, list) = send(&app, Method::GET, &format!("/patients/{id}/audiograms"), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn duplicate_rut_conflicts() {
    let app = test_app();
    create_patient(
        &app,
        json!({ "rut": "9.876.543-K", "first_name": "Luis", "last_name": "Soto" }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/patients",
        Some(json!({ "rut": "9.876.543-k", "first_name": "Otro", "last_name": "Soto" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("9.876.543-K"));
}

#[tokio::test]
async fn invalid_patient_lists_field_errors() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/patients",
        Some(json!({ "rut": "", "first_name": "Ana", "last_name": "", "email": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<_> = body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["field"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(fields, ["rut", "last_name", "email"]);
}

#[tokio::test]
async fn unknown_patient_is_not_found() {
    let app = test_app();
    let missing = uuid::Uuid::new_v4();

    let (status, _) = send(&app, Method::GET, &format!("/patients/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/patients/{missing}/ldl"),
        Some(json!({ "ear": "L", "ldl_500": 95 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_filters_by_name_or_rut() {
    let app = test_app();
    for (rut, first, last) in [
        ("11.111.111-1", "Ana", "Rojas"),
        ("22.222.222-2", "Luis", "Soto"),
        ("33.333.333-3", "Marta", "Rojas"),
    ] {
        create_patient(
            &app,
            json!({ "rut": rut, "first_name": first, "last_name": last }),
        )
        .await;
    }

    let (_, rojas) = send(&app, Method::GET, "/patients?q=roJAS", None).await;
    let names: Vec<_> = rojas
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["first_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Ana", "Marta"]);

    let (_, by_rut) = send(&app, Method::GET, "/patients?q=222", None).await;
    assert_eq!(by_rut.as_array().unwrap().len(), 1);

    let (_, all) = send(&app, Method::GET, "/patients", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, recent) = send(&app, Method::GET, "/patients/recent", None).await;
    assert_eq!(recent.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn chart_collects_every_record_kind() {
    let app = test_app();
    let id = create_patient(
        &app,
        json!({ "rut": "12.345.678-5", "first_name": "Ana", "last_name": "Rojas" }),
    )
    .await;

    let (status, intake) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/anamneses"),
        Some(json!({ "date": "2024-01-05", "tinnitus": true, "main_complaint": "Zumbido" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(intake["tinnitus"], true);
    assert_eq!(intake["hearing_loss"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/speech"),
        Some(json!({ "date": "2024-01-05", "ear": "L", "srt": 25, "wrs_percent": 92 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/speech"),
        Some(json!({ "wrs_percent": 140 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["fields"][0]["field"], "wrs_percent");

    let (status, ldl) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/ldl"),
        Some(json!({ "ldl_1k": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ldl["ear"], "R");
    assert!(ldl["date"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/audiograms"),
        Some(json!({ "date": "2024-01-05" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, chart) = send(&app, Method::GET, &format!("/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(chart["patient"]["rut"], "12.345.678-5");
    assert_eq!(chart["age"], Value::Null);
    assert_eq!(chart["anamneses"].as_array().unwrap().len(), 1);
    assert_eq!(chart["speech"][0]["srt"], 25);
    assert_eq!(chart["ldl"].as_array().unwrap().len(), 1);
    assert_eq!(chart["audiograms"][0]["pta"]["right"], Value::Null);

    let (_, speech) = send(&app, Method::GET, &format!("/patients/{id}/speech"), None).await;
    assert_eq!(speech.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn update_then_delete_patient() {
    let app = test_app();
    let id = create_patient(
        &app,
        json!({ "rut": "12.345.678-5", "first_name": "Ana", "last_name": "Rojas" }),
    )
    .await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/patients/{id}"),
        Some(json!({
            "rut": "12.345.678-5",
            "first_name": "Ana María",
            "last_name": "Rojas",
            "sex": "F",
            "phone": "+56 9 1234 5678"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["first_name"], "Ana María");
    assert_eq!(updated["sex"], "F");

    send(
        &app,
        Method::POST,
        &format!("/patients/{id}/anamneses"),
        Some(json!({})),
    )
    .await;

    let (status, deleted) = send(&app, Method::DELETE, &format!("/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["removed"], 2);

    let (status, _) = send(&app, Method::GET, &format!("/patients/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn threshold_layout_proposes_five_rows() {
    let app = test_app();
    let (status, rows) = send(&app, Method::GET, "/audiograms/threshold-layout", None).await;
    assert_eq!(status, StatusCode::OK);
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["ear"], "R");
    assert_eq!(rows[0]["symbol"], "O");
    assert_eq!(rows[4]["ear"], "B");
    assert_eq!(rows[4]["symbol"], "◇");
}

#[tokio::test]
async fn over_long_vertigo_details_are_unprocessable() {
    let app = test_app();
    let id = create_patient(
        &app,
        json!({ "rut": "12.345.678-5", "first_name": "Ana", "last_name": "Rojas" }),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/anamneses"),
        Some(json!({ "vertigo": true, "vertigo_triggers": "x".repeat(201) })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation failed");
    assert_eq!(body["fields"][0]["field"], "vertigo_triggers");

    let (_, list) = send(&app, Method::GET, &format!("/patients/{id}/anamneses"), None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn malformed_bodies_get_a_json_error() {
    let app = test_app();
    let id = create_patient(
        &app,
        json!({ "rut": "12.345.678-5", "first_name": "Ana", "last_name": "Rojas" }),
    )
    .await;

    for body in [
        json!({ "ear": "Q" }),
        json!({ "date": "2024-13-40" }),
    ] {
        let (status, error) = send(
            &app,
            Method::POST,
            &format!("/patients/{id}/speech"),
            Some(body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(error["error"].is_string(), "{error}");
    }

    let (status, audiogram) = send(
        &app,
        Method::POST,
        &format!("/patients/{id}/audiograms"),
        Some(json!({
            "thresholds": [
                { "ear": "R", "symbol": "" },
                { "ear": "L", "symbol": "□" }
            ]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{audiogram}");
    assert_eq!(audiogram["thresholds"][0]["symbol"], Value::Null);
    assert_eq!(audiogram["thresholds"][1]["symbol"], "□");
}
