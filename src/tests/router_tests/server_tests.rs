use crate::router::respond;
use crate::tests::utils::*;

#[test]
fn preflight_is_answered_for_any_path() {
    let t = init_test_app();
    let resp = respond(request("OPTIONS", "/api/reports/assign", None, None), &t.app);
    assert_eq!(resp.status(), 204);
    assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
    assert!(resp.headers()["Access-Control-Allow-Methods"]
        .to_str()
        .unwrap()
        .contains("PATCH"));
}

#[test]
fn unknown_routes_get_a_404_envelope() {
    let t = init_test_app();
    let (status, v) = send(&t, "GET", "/api/nothing-here", None, None);
    assert_eq!(status, 404);
    assert_eq!(v["err"], -404);
    assert!(v["data"].is_null());
}

#[test]
fn me_describes_role_and_leader_tdp() {
    let t = init_test_app();
    let id = create_tdp(&t, "TDP 1", LEADER_A);

    let (status, v) = send(&t, "GET", "/api/me", Some(LEADER_A), None);
    assert_eq!(status, 200);
    let me = &v["data"];
    assert_eq!(me["role"], "leader");
    assert_eq!(me["canAccessReportWorkflow"], true);
    assert_eq!(me["canViewStats"], false);
    assert_eq!(me["tdp"]["id"], id.as_str());
    assert!(me["permissions"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("submit_report")));

    let (_, v) = send(&t, "GET", "/api/me", Some("citizen-9"), None);
    assert_eq!(v["data"]["role"], "citizen");
    assert_eq!(v["data"]["canAccessReportWorkflow"], false);
    assert_eq!(v["data"]["canViewStats"], false);

    let (_, v) = send(&t, "GET", "/api/me", Some(MODERATOR), None);
    assert_eq!(v["data"]["canViewStats"], true);
    assert!(v["data"]["tdp"].is_null());
}

#[test]
fn malformed_json_is_a_bad_request() {
    let t = init_test_app();
    let req = http::Request::builder()
        .method("POST")
        .uri("/api/news")
        .header(crate::auth::identity::HEADER_ID_BY_OA, ADMIN)
        .body(astra::Body::from("{ not json"))
        .unwrap();
    let resp = respond(req, &t.app);
    assert_eq!(resp.status(), 400);
}

#[test]
fn empty_body_reads_as_empty_object() {
    let t = init_test_app();
    let id = create_tdp(&t, "TDP 1", LEADER_A);

    let (status, v) = send(&t, "PATCH", &format!("/api/tdp/{id}"), Some(ADMIN), None);
    assert_eq!(status, 200, "{v}");
    assert_eq!(v["data"]["name"], "TDP 1");

    let (status, _) = send(&t, "PATCH", &format!("/api/tdp/{id}"), Some(ADMIN), Some(serde_json::Value::Null));
    assert_eq!(status, 200);
}
