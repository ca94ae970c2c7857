use crate::router::respond;
use crate::tests::utils::*;
use serde_json::json;

const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

fn seed(t: &TestApp) {
    let a = create_tdp(t, "TDP 1", LEADER_A);
    let b = create_tdp(t, "TDP 2", LEADER_B);
    let (status, _) = send(
        t,
        "POST",
        "/api/reports/assign",
        Some(ADMIN),
        Some(json!({ "title": "Kiểm tra", "dueDate": 4_102_444_800_000i64, "tdpIds": [a, b] })),
    );
    assert_eq!(status, 201);
}

#[test]
fn exports_return_workbooks_as_attachments() {
    let t = init_test_app();
    seed(&t);

    for (kind, prefix) in [
        ("summary", "BaoCao_TongQuan_"),
        ("details", "BaoCao_ChiTiet_"),
        ("stats", "ThongKe_BaoCao_"),
    ] {
        let resp = respond(request("GET", &format!("/api/exports/{kind}"), Some(MODERATOR), None), &t.app);
        assert_eq!(resp.status(), 200, "{kind}");
        assert_eq!(resp.headers()["Content-Type"], XLSX);

        let disposition = resp.headers()["Content-Disposition"].to_str().unwrap().to_string();
        assert!(disposition.starts_with(&format!("attachment; filename=\"{prefix}")), "{disposition}");
        assert!(disposition.contains(".xlsx"));

        // zip local file header
        let bytes = read_bytes(resp);
        assert_eq!(&bytes[..2], b"PK");
    }
}

#[test]
fn tdp_export_needs_a_name_with_reports() {
    let t = init_test_app();
    seed(&t);

    let resp = respond(request("GET", "/api/exports/tdp?name=TDP%201", Some(ADMIN), None), &t.app);
    assert_eq!(resp.status(), 200);
    let disposition = resp.headers()["Content-Disposition"].to_str().unwrap().to_string();
    assert!(disposition.contains("filename*=UTF-8''BaoCao_TDP%201_"), "{disposition}");

    let (status, v) = send(&t, "GET", "/api/exports/tdp?name=Nowhere", Some(ADMIN), None);
    assert_eq!(status, 404);
    assert_eq!(v["err"], -404);

    let (status, _) = send(&t, "GET", "/api/exports/tdp", Some(ADMIN), None);
    assert_eq!(status, 400);
}

#[test]
fn exports_are_closed_to_leaders_and_citizens() {
    let t = init_test_app();
    seed(&t);

    let (status, _) = send(&t, "GET", "/api/exports/summary", Some(LEADER_A), None);
    assert_eq!(status, 403);
    let (status, _) = send(&t, "GET", "/api/exports/summary", None, None);
    assert_eq!(status, 403);
    let (status, _) = send(&t, "GET", "/api/exports/bogus", Some(ADMIN), None);
    assert_eq!(status, 404);
}
