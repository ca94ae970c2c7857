use crate::tests::utils::*;
use serde_json::json;

#[test]
fn staff_publish_and_everyone_reads() {
    let t = init_test_app();

    let (status, _) = send(&t, "POST", "/api/news", Some(LEADER_A), Some(json!({ "title": "Lịch tiêm chủng" })));
    assert_eq!(status, 403);

    let (status, v) = send(
        &t,
        "POST",
        "/api/news",
        Some(ADMIN),
        Some(json!({ "title": "Lịch tiêm chủng", "content": "Thứ Bảy", "images": ["https://files.test/a.png"] })),
    );
    assert_eq!(status, 201, "{v}");
    let id = v["data"]["id"].as_str().unwrap().to_string();

    let (status, v) = send(&t, "GET", "/api/news", None, None);
    assert_eq!(status, 200);
    assert_eq!(v["data"][0]["title"], "Lịch tiêm chủng");
    assert_eq!(v["data"][0]["images"][0], "https://files.test/a.png");

    let (status, v) = send(&t, "PATCH", &format!("/api/news/{id}"), Some(MODERATOR), Some(json!({ "content": "Chủ Nhật" })));
    assert_eq!(status, 200, "{v}");
    assert_eq!(v["data"]["content"], "Chủ Nhật");
    assert_eq!(v["data"]["title"], "Lịch tiêm chủng");

    let (status, _) = send(&t, "DELETE", &format!("/api/news/{id}"), Some(MODERATOR), None);
    assert_eq!(status, 200);
    let (status, _) = send(&t, "GET", &format!("/api/news/{id}"), None, None);
    assert_eq!(status, 404);
}

#[test]
fn news_requires_a_title() {
    let t = init_test_app();
    let (status, v) = send(&t, "POST", "/api/news", Some(ADMIN), Some(json!({ "title": " " })));
    assert_eq!(status, 400);
    assert_eq!(v["err"], -400);
}
