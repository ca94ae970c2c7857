use crate::tests::utils::*;
use serde_json::json;

#[test]
fn staff_manage_tdps() {
    let t = init_test_app();

    let body = json!({ "name": "TDP 1", "leaderIdentity": LEADER_A });
    let (status, v) = send(&t, "POST", "/api/tdp", Some(LEADER_A), Some(body.clone()));
    assert_eq!(status, 403);
    assert_eq!(v["err"], -403);

    let (status, _) = send(&t, "POST", "/api/tdp", None, Some(body.clone()));
    assert_eq!(status, 403);

    let (status, v) = send(&t, "POST", "/api/tdp", Some(MODERATOR), Some(body));
    assert_eq!(status, 201, "{v}");
    let id = v["data"]["id"].as_str().unwrap().to_string();

    let (status, v) = send(&t, "PATCH", &format!("/api/tdp/{id}"), Some(MODERATOR), Some(json!({ "address": "Tổ 3" })));
    assert_eq!(status, 200, "{v}");

    let (status, v) = send(&t, "GET", "/api/tdp", Some(MODERATOR), None);
    assert_eq!(status, 200);
    assert_eq!(v["data"][0]["id"], id.as_str());
    assert_eq!(v["data"][0]["address"], "Tổ 3");

    let (status, _) = send(&t, "DELETE", &format!("/api/tdp/{id}"), Some(MODERATOR), None);
    assert_eq!(status, 200);
}

#[test]
fn leader_cannot_lead_two_active_tdps() {
    let t = init_test_app();
    create_tdp(&t, "TDP 1", LEADER_A);

    let (status, v) = send(
        &t,
        "POST",
        "/api/tdp",
        Some(ADMIN),
        Some(json!({ "name": "TDP 2", "leaderIdentity": LEADER_A })),
    );
    assert_eq!(status, 409, "{v}");
}

#[test]
fn patch_collapses_event_objects_to_their_value() {
    let t = init_test_app();
    let id = create_tdp(&t, "TDP 1", LEADER_A);

    let (status, v) = send(
        &t,
        "PATCH",
        &format!("/api/tdp/{id}"),
        Some(ADMIN),
        Some(json!({
            "address": { "nativeEvent": {}, "target": { "value": "12 Lê Lợi" } },
            "householdCount": 40
        })),
    );
    assert_eq!(status, 200, "{v}");
    assert_eq!(v["data"]["householdCount"], 40);
    assert_eq!(v["data"]["address"], "12 Lê Lợi");

    let (status, _) = send(&t, "PATCH", "/api/tdp/missing", Some(ADMIN), Some(json!({ "name": "x" })));
    assert_eq!(status, 404);
}

#[test]
fn delete_is_blocked_while_reports_reference_the_tdp() {
    let t = init_test_app();
    let used = create_tdp(&t, "TDP 1", LEADER_A);
    let unused = create_tdp(&t, "TDP 2", LEADER_B);

    let (status, _) = send(
        &t,
        "POST",
        "/api/reports/assign",
        Some(ADMIN),
        Some(json!({ "title": "Dân số", "dueDate": 4_102_444_800_000i64, "tdpIds": [&used] })),
    );
    assert_eq!(status, 201);

    let (status, v) = send(&t, "DELETE", &format!("/api/tdp/{used}"), Some(ADMIN), None);
    assert_eq!(status, 409, "{v}");

    let (status, _) = send(&t, "DELETE", &format!("/api/tdp/{unused}"), Some(ADMIN), None);
    assert_eq!(status, 200);
    let (status, _) = send(&t, "GET", &format!("/api/tdp/{unused}"), Some(ADMIN), None);
    assert_eq!(status, 404);
}

#[test]
fn null_description_clears_it() {
    let t = init_test_app();
    let id = create_tdp(&t, "TDP 1", LEADER_A);
    let uri = format!("/api/tdp/{id}");

    let (_, v) = send(&t, "PATCH", &uri, Some(ADMIN), Some(json!({ "description": "Gần chợ" })));
    assert_eq!(v["data"]["description"], "Gần chợ");

    let (status, v) = send(&t, "PATCH", &uri, Some(ADMIN), Some(json!({ "description": null })));
    assert_eq!(status, 200, "{v}");
    assert!(v["data"]["description"].is_null());
}
