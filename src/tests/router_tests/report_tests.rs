use crate::tests::utils::*;
use serde_json::{json, Value};

const FAR_FUTURE: i64 = 4_102_444_800_000;

fn template(tdp_ids: &[&str]) -> Value {
    json!({
        "title": "Rà soát hộ nghèo",
        "priority": "high",
        "dueDate": FAR_FUTURE,
        "questions": [
            { "id": "q1", "text": "Số hộ nghèo", "type": "short_answer", "isRequired": true },
            {
                "id": "q2",
                "text": "Tình trạng",
                "type": "single_choice",
                "options": [{ "id": "o1", "value": "Ổn định" }, { "id": "o2", "value": "Cần hỗ trợ" }]
            }
        ],
        "tdpIds": tdp_ids,
    })
}

fn assign(t: &TestApp, tdp_ids: &[&str]) -> Value {
    let (status, v) = send(t, "POST", "/api/reports/assign", Some(ADMIN), Some(template(tdp_ids)));
    assert_eq!(status, 201, "{v}");
    v["data"].clone()
}

#[test]
fn assignment_fans_out_one_report_per_tdp() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);
    let b = create_tdp(&t, "TDP 2", LEADER_B);

    let outcome = assign(&t, &[&a, &b]);
    assert_eq!(outcome["created"].as_array().unwrap().len(), 2);
    assert!(outcome["skipped"].as_array().unwrap().is_empty());

    let (status, v) = send(&t, "GET", "/api/reports", Some(ADMIN), None);
    assert_eq!(status, 200);
    let list = v["data"].as_array().unwrap();
    assert_eq!(list.len(), 2);

    let mut names: Vec<&str> = list
        .iter()
        .map(|r| r["assignedTo"]["tdpName"].as_str().unwrap())
        .collect();
    names.sort();
    assert_eq!(names, ["TDP 1", "TDP 2"]);

    for r in list {
        assert_eq!(r["status"], "pending");
        assert_eq!(r["version"], 1);
        assert_eq!(r["history"].as_array().unwrap().len(), 1);
        assert_eq!(r["assignedBy"]["identity"], ADMIN);
        assert_eq!(r["isOverdue"], false);
    }
}

#[test]
fn unknown_and_repeated_targets_are_skipped_with_reasons() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);

    let outcome = assign(&t, &[&a, "ghost", &a]);
    assert_eq!(outcome["created"].as_array().unwrap().len(), 1);
    assert_eq!(
        outcome["skipped"],
        json!([
            { "tdpId": "ghost", "reason": "not_found" },
            { "tdpId": a, "reason": "duplicate" }
        ])
    );
}

#[test]
fn leader_only_sees_own_reports() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);
    let b = create_tdp(&t, "TDP 2", LEADER_B);
    assign(&t, &[&a, &b]);

    let (status, v) = send(&t, "GET", "/api/reports", Some(LEADER_A), None);
    assert_eq!(status, 200);
    let mine = v["data"].as_array().unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0]["assignedTo"]["tdpId"], a.as_str());

    let (_, v) = send(&t, "GET", "/api/reports", Some(LEADER_B), None);
    let theirs = v["data"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(&t, "GET", &format!("/api/reports/{theirs}"), Some(LEADER_A), None);
    assert_eq!(status, 403);

    let (status, _) = send(&t, "GET", "/api/reports", Some("citizen-1"), None);
    assert_eq!(status, 403);
}

#[test]
fn full_workflow_ends_approved() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);
    let id = assign(&t, &[&a])["created"][0].as_str().unwrap().to_string();

    let (status, v) = send(
        &t,
        "POST",
        &format!("/api/reports/{id}/status"),
        Some(LEADER_A),
        Some(json!({ "status": "in_progress", "expectedVersion": 1 })),
    );
    assert_eq!(status, 200, "{v}");
    assert_eq!(v["data"]["version"], 2);

    let (status, v) = send(
        &t,
        "POST",
        &format!("/api/reports/{id}/answers"),
        Some(LEADER_A),
        Some(json!({
            "answers": [
                { "kind": "text", "questionId": "q1", "value": "12" },
                { "kind": "text", "questionId": "q2", "value": "o2" }
            ],
            "expectedVersion": 2
        })),
    );
    assert_eq!(status, 200, "{v}");
    assert_eq!(v["data"]["status"], "submitted");
    assert!(v["data"]["submittedAt"].is_i64());

    // leaders cannot review their own work
    let (status, _) = send(
        &t,
        "POST",
        &format!("/api/reports/{id}/status"),
        Some(LEADER_A),
        Some(json!({ "status": "approved" })),
    );
    assert_eq!(status, 403);

    let (status, v) = send(
        &t,
        "POST",
        &format!("/api/reports/{id}/status"),
        Some(MODERATOR),
        Some(json!({ "status": "approved", "note": "Tốt" })),
    );
    assert_eq!(status, 200, "{v}");
    let report = &v["data"];
    assert_eq!(report["status"], "approved");
    assert_eq!(report["version"], 4);
    assert!(report["completedAt"].is_i64());
    let history = report["history"].as_array().unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[3]["action"], "Đã duyệt");
    assert_eq!(history[3]["note"], "Tốt");

    let (status, _) = send(
        &t,
        "POST",
        &format!("/api/reports/{id}/status"),
        Some(ADMIN),
        Some(json!({ "status": "rejected" })),
    );
    assert_eq!(status, 409);
}

#[test]
fn stale_version_is_a_conflict() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);
    let id = assign(&t, &[&a])["created"][0].as_str().unwrap().to_string();

    let (status, v) = send(
        &t,
        "POST",
        &format!("/api/reports/{id}/status"),
        Some(LEADER_A),
        Some(json!({ "status": "in_progress", "expectedVersion": 7 })),
    );
    assert_eq!(status, 409);
    assert_eq!(v["err"], -409);

    let (_, v) = send(&t, "GET", &format!("/api/reports/{id}"), Some(ADMIN), None);
    assert_eq!(v["data"]["status"], "pending");
    assert_eq!(v["data"]["version"], 1);
}

#[test]
fn missing_required_answer_is_rejected() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);
    let id = assign(&t, &[&a])["created"][0].as_str().unwrap().to_string();

    let (status, _) = send(
        &t,
        "POST",
        &format!("/api/reports/{id}/answers"),
        Some(LEADER_A),
        Some(json!({ "answers": [{ "kind": "text", "questionId": "q2", "value": "o1" }] })),
    );
    assert_eq!(status, 400);
}

#[test]
fn leaders_get_stats_for_their_own_reports() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);
    let b = create_tdp(&t, "TDP 2", LEADER_B);
    assign(&t, &[&a, &b]);
    assign(&t, &[&b]);

    let (status, v) = send(&t, "GET", "/api/reports/stats", Some(MODERATOR), None);
    assert_eq!(status, 200, "{v}");
    assert_eq!(v["data"]["totalReports"], 3);

    let (status, v) = send(&t, "GET", "/api/reports/stats", Some(LEADER_A), None);
    assert_eq!(status, 200, "{v}");
    assert_eq!(v["data"]["totalReports"], 1);

    let (_, v) = send(&t, "GET", "/api/reports/stats", Some(LEADER_B), None);
    assert_eq!(v["data"]["totalReports"], 2);

    let (status, _) = send(&t, "GET", "/api/reports/stats", Some("citizen-1"), None);
    assert_eq!(status, 403);
}

#[test]
fn delete_is_admin_only() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);
    let id = assign(&t, &[&a])["created"][0].as_str().unwrap().to_string();

    let (status, _) = send(&t, "DELETE", &format!("/api/reports/{id}"), Some(MODERATOR), None);
    assert_eq!(status, 403);
    let (status, _) = send(&t, "DELETE", &format!("/api/reports/{id}"), Some(ADMIN), None);
    assert_eq!(status, 200);
    let (status, _) = send(&t, "GET", &format!("/api/reports/{id}"), Some(ADMIN), None);
    assert_eq!(status, 404);
}

#[test]
fn vietnamese_display_names_reach_history() {
    let t = init_test_app();
    let a = create_tdp(&t, "TDP 1", LEADER_A);

    let req = request_named(
        "POST",
        "/api/reports/assign",
        Some(ADMIN),
        Some("Nguyễn Văn A"),
        Some(template(&[&a])),
    );
    let (status, v) = send_request(&t, req);
    assert_eq!(status, 201, "{v}");
    let id = v["data"]["created"][0].as_str().unwrap().to_string();

    let req = request_named(
        "POST",
        &format!("/api/reports/{id}/status"),
        Some(LEADER_A),
        Some("Trần Thị Bình"),
        Some(json!({ "status": "in_progress" })),
    );
    let (status, v) = send_request(&t, req);
    assert_eq!(status, 200, "{v}");

    let report = &v["data"];
    assert_eq!(report["assignedBy"]["name"], "Nguyễn Văn A");
    assert_eq!(report["history"][0]["actor"]["name"], "Nguyễn Văn A");
    assert_eq!(report["history"][1]["actor"]["name"], "Trần Thị Bình");
    assert_eq!(report["history"][1]["actor"]["identity"], LEADER_A);
}
