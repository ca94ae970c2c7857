use crate::config::FeedbackRateLimit;
use crate::tests::utils::*;
use serde_json::json;

fn feedback(content: &str) -> serde_json::Value {
    json!({
        "content": content,
        "feedBackTypeId": 2,
        "fullName": "Nguyễn Văn A",
        "phoneNumber": "0900000000",
        "location": { "latitude": "16.07", "longitude": "108.22" }
    })
}

#[test]
fn citizens_submit_and_list_feedback() {
    let t = init_test_app();

    let (status, v) = send(&t, "POST", "/api/feedbacks", Some("citizen-1"), Some(feedback("Đèn hỏng")));
    assert_eq!(status, 201, "{v}");
    let created = &v["data"];
    assert_eq!(created["type"], "An toàn giao thông");
    assert_eq!(created["status"], "Mới");
    assert_eq!(created["title"], "Phản ánh từ Nguyễn Văn A");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, v) = send(&t, "GET", "/api/feedbacks?limit=5", None, None);
    assert_eq!(status, 200);
    assert_eq!(v["data"].as_array().unwrap().len(), 1);

    let (status, v) = send(&t, "GET", &format!("/api/feedbacks/{id}"), None, None);
    assert_eq!(status, 200);
    assert_eq!(v["data"]["location"]["latitude"], "16.07");

    let (status, _) = send(&t, "GET", "/api/feedbacks?limit=abc", None, None);
    assert_eq!(status, 400);

    let (status, _) = send(&t, "POST", "/api/feedbacks", None, Some(json!({ "content": "", "feedBackTypeId": 1 })));
    assert_eq!(status, 400);
}

#[test]
fn submissions_over_the_window_limit_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&dir);
    config.feedback_rate_limit = FeedbackRateLimit { max_per_window: 2, window_secs: 3600 };
    let t = init_test_app_with(config, dir);

    for n in 0..2 {
        let (status, _) = send(&t, "POST", "/api/feedbacks", Some("citizen-1"), Some(feedback(&format!("#{n}"))));
        assert_eq!(status, 201);
    }

    let (status, v) = send(&t, "POST", "/api/feedbacks", Some("citizen-1"), Some(feedback("#3")));
    assert_eq!(status, 429);
    assert_eq!(v["err"], -429);

    // counted per submitter
    let (status, _) = send(&t, "POST", "/api/feedbacks", Some("citizen-2"), Some(feedback("#4")));
    assert_eq!(status, 201);
}

#[test]
fn only_staff_reply() {
    let t = init_test_app();
    let (_, v) = send(&t, "POST", "/api/feedbacks", None, Some(feedback("Rác thải")));
    let id = v["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/feedbacks/{id}/reply");

    let (status, _) = send(&t, "POST", &uri, Some(LEADER_A), Some(json!({ "response": "Đã tiếp nhận" })));
    assert_eq!(status, 403);

    let (status, _) = send(&t, "POST", &uri, Some(MODERATOR), Some(json!({ "response": "  " })));
    assert_eq!(status, 400);

    let (status, v) = send(&t, "POST", &uri, Some(MODERATOR), Some(json!({ "response": "Đã tiếp nhận" })));
    assert_eq!(status, 200, "{v}");
    assert_eq!(v["data"]["status"], "Đã xử lý");
    assert_eq!(v["data"]["response"], "Đã tiếp nhận");
    assert!(v["data"]["responseTime"].is_i64());
}

#[test]
fn feedback_types_are_ordered() {
    let t = init_test_app();
    let (status, v) = send(&t, "GET", "/api/feedback-types", None, None);
    assert_eq!(status, 200);
    let types = v["data"].as_array().unwrap();
    assert_eq!(types.len(), 12);
    assert_eq!(types[0]["id"], 1);
    assert_eq!(types[11]["title"], "Các vấn đề khác");
}
