use crate::router::respond;
use crate::tests::utils::*;
use crate::upload::multipart::tests::body;
use astra::Body;

const BOUNDARY: &str = "----ward-test";

fn multipart(payload: Vec<u8>, content_type: &str) -> astra::Request {
    http::Request::builder()
        .method("POST")
        .uri("/upload")
        .header("Content-Type", content_type)
        .body(Body::from(payload))
        .unwrap()
}

#[test]
fn upload_stores_each_file_and_returns_keys() {
    let t = init_test_app();
    let payload = body(
        BOUNDARY,
        &[
            ("file", Some("a.png"), &b"\x89PNG one"[..]),
            ("caption", None, &b"ignored"[..]),
            ("file", Some("b.png"), &b"\x89PNG two"[..]),
        ],
    );
    let resp = respond(
        multipart(payload, &format!("multipart/form-data; boundary={BOUNDARY}")),
        &t.app,
    );
    assert_eq!(resp.status(), 200);

    let v: serde_json::Value = serde_json::from_str(&read_text(resp)).unwrap();
    assert_eq!(v["message"], "Success");
    assert_eq!(v["data"]["domain"], "https://files.test/");
    let images = v["data"]["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);

    let key = images[0].as_str().unwrap();
    assert!(key.starts_with("images/"), "{key}");
    assert!(key.ends_with("-a.png"), "{key}");

    let stored = std::fs::read(t.dir.path().join("storage").join(key)).unwrap();
    assert_eq!(stored, b"\x89PNG one");
}

#[test]
fn upload_rejects_other_methods() {
    let t = init_test_app();
    let resp = respond(request("GET", "/upload", None, None), &t.app);
    assert_eq!(resp.status(), 405);
    assert_eq!(read_text(resp), "Method Not Allowed");
}

#[test]
fn malformed_upload_is_a_plain_failure() {
    let t = init_test_app();
    let resp = respond(multipart(b"not multipart".to_vec(), "application/json"), &t.app);
    assert_eq!(resp.status(), 500);
    assert_eq!(read_text(resp), "Upload failed");
}
