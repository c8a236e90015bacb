use std::fs;

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_batch(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let p = dir.path().join("batch.json");
    fs::write(&p, content).unwrap();
    p
}

#[test]
fn plan_prints_requests_without_contacting_appliance() {
    let tmp = TempDir::new().unwrap();
    let batch = write_batch(&tmp, r#"[{"json": {"name": "a.pem"}}, {"json": {"name": "b.pem"}}]"#);

    let out = Command::cargo_bin("adc")
        .unwrap()
        .args(["plan", batch.to_str().unwrap(), "--operation", "delete"])
        .args(["--set", "fileName={$json.name}", "--format", "json"])
        .output()
        .unwrap();

    assert!(out.status.success());
    let planned: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(planned[0]["request"]["method"], "DELETE");
    assert_eq!(
        planned[1]["request"]["path"],
        "/config/systemfile?args=filename:b.pem,filelocation:%2Fnsconfig%2Fssl%2F"
    );
}

#[test]
fn plan_reports_missing_binary_with_validation_exit_code() {
    let tmp = TempDir::new().unwrap();
    let batch = write_batch(&tmp, r#"[{"json": {}}]"#);

    Command::cargo_bin("adc")
        .unwrap()
        .args(["plan", batch.to_str().unwrap(), "--operation", "upload"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn execute_requires_password_env() {
    let tmp = TempDir::new().unwrap();
    let batch = write_batch(&tmp, r#"[{"json": {}}]"#);

    Command::cargo_bin("adc")
        .unwrap()
        .env_remove("ADC_TEST_MISSING_PASSWORD")
        .args(["execute", batch.to_str().unwrap(), "--operation", "delete"])
        .args(["--url", "https://adc.invalid", "--username", "nsroot"])
        .args(["--password-env", "ADC_TEST_MISSING_PASSWORD"])
        .assert()
        .failure()
        .code(2);
}

#[tokio::test(flavor = "multi_thread")]
async fn execute_downloads_file_into_out_dir() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nitro/v1/config/systemfile"))
        .and(header("X-NITRO-USER", "nsroot"))
        .and(header("X-NITRO-PASS", "pw"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "systemfile": [{"filename": "a.txt", "filecontent": "aGVsbG8="}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let batch = write_batch(&tmp, r#"[{"json": {}}]"#);
    let out_dir = tmp.path().join("out");
    let uri = server.uri();
    let out_dir_arg = out_dir.clone();

    let out = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("adc")
            .unwrap()
            .env("ADC_PASSWORD", "pw")
            .args(["execute", batch.to_str().unwrap(), "--operation", "download"])
            .args(["--set", "fileName=a.txt", "--format", "json"])
            .args(["--url", &uri, "--username", "nsroot"])
            .args(["--out-dir", out_dir_arg.to_str().unwrap()])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let items: Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(items[0]["json"]["filename"], "a.txt");
    assert_eq!(items[0]["pairedItem"], 0);
    assert_eq!(fs::read(out_dir.join("a.txt")).unwrap(), b"hello");
}

#[tokio::test(flavor = "multi_thread")]
async fn execute_aborts_with_run_failed_unless_continuing() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errorcode": 3441, "message": "No such file or directory", "severity": "ERROR"
        })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let batch = write_batch(&tmp, r#"[{"json": {}}, {"json": {}}]"#);
    let uri = server.uri();

    let (aborted, continued) = tokio::task::spawn_blocking(move || {
        let run = |extra: &[&str]| {
            Command::cargo_bin("adc")
                .unwrap()
                .env("ADC_PASSWORD", "pw")
                .args(["execute", batch.to_str().unwrap(), "--operation", "delete"])
                .args(["--set", "fileName=gone.pem", "--format", "json"])
                .args(["--url", &uri, "--username", "nsroot"])
                .args(extra)
                .output()
                .unwrap()
        };
        (run(&[]), run(&["--continue-on-fail"]))
    })
    .await
    .unwrap();

    assert_eq!(aborted.status.code(), Some(3));
    assert!(aborted.stdout.is_empty());

    assert!(continued.status.success());
    let items: Value = serde_json::from_slice(&continued.stdout).unwrap();
    assert_eq!(items.as_array().unwrap().len(), 2);
    assert_eq!(
        items[1]["json"]["error"],
        "remote API error (status 404): No such file or directory"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn same_named_downloads_are_kept_apart_in_out_dir() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(query_param("args", "filename:a.txt,filelocation:/var/one"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "systemfile": [{"filename": "a.txt", "filecontent": "b25l"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("args", "filename:a.txt,filelocation:/var/two"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "systemfile": [{"filename": "a.txt", "filecontent": "dHdv"}]
        })))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let batch = write_batch(
        &tmp,
        r#"[{"json": {"dir": "/var/one"}}, {"json": {"dir": "/var/two"}}]"#,
    );
    let out_dir = tmp.path().join("out");
    let uri = server.uri();
    let out_dir_arg = out_dir.clone();

    let out = tokio::task::spawn_blocking(move || {
        Command::cargo_bin("adc")
            .unwrap()
            .env("ADC_PASSWORD", "pw")
            .args(["execute", batch.to_str().unwrap(), "--operation", "download"])
            .args(["--set", "fileName=a.txt", "--set", "fileLocation={$json.dir}"])
            .args(["--url", &uri, "--username", "nsroot", "--events"])
            .args(["--out-dir", out_dir_arg.to_str().unwrap()])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(out_dir.join("a.txt")).unwrap(), b"one");
    assert_eq!(fs::read(out_dir.join("item-1-a.txt")).unwrap(), b"two");

    let stderr = String::from_utf8_lossy(&out.stderr);
    let finished = stderr
        .lines()
        .filter_map(|l| serde_json::from_str::<Value>(l).ok())
        .find(|e| e["type"] == "batch.finished")
        .unwrap();
    assert_eq!(finished["succeeded"], 2);
}
