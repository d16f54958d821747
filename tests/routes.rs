use actix_web::http::StatusCode;
use actix_web::{App, test};
use serde_json::Value;

use m2_studio::routes::configure;

#[actix_web::test]
async fn lists_project_types() {
    let app = test::init_service(App::new().configure(configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/quote/project-types")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let types = body.as_array().unwrap();
    assert_eq!(types.len(), 6);
    assert_eq!(types[0]["value"], "house");
    assert_eq!(types[0]["label"], "Kuća (novogradnja)");
}

#[actix_web::test]
async fn returns_wizard_config_in_step_order() {
    let app = test::init_service(App::new().configure(configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/quote/config/house")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let step_ids: Vec<_> = body["steps"]
        .as_array()
        .unwrap()
        .iter()
        .map(|step| step["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(step_ids, vec!["house-basic", "house-scope", "house-contact"]);
    let contact = &body["steps"][2]["fields"];
    assert_eq!(contact[1]["id"], "email");
    assert_eq!(contact[1]["type"], "email");
    assert_eq!(contact[4]["type"], "file");
    assert_eq!(
        contact[4]["helpText"],
        "Opcionalno – možete dodati PDF, slike ili DWG fajlove."
    );
}

#[actix_web::test]
async fn unknown_project_type_is_not_found() {
    let app = test::init_service(App::new().configure(configure)).await;

    let req = test::TestRequest::get()
        .uri("/api/quote/config/garage")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());
}
