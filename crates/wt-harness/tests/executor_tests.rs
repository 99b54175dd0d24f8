//! Check and executor behavior against a wiremock stand-in server.

mod common;

use common::context_for;

use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use wiremock::matchers::{body_string, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};
use wt_config::HarnessConfig;
use wt_harness::{
    AllOf, BodyContains, BodyExcludes, BodyLenAtLeast, Category, CategoryKind, Check,
    CheckContext, CheckResult, DeleteLifecycleCheck, Fixture, HttpClient, RequestCheck,
    RequestSpec, ScenarioExecutor, SessionBuilder, SymlinkEscapeCheck, Verdict, build_category,
};

#[derive(Debug)]
struct PanickingCheck;

#[async_trait]
impl Check for PanickingCheck {
    fn name(&self) -> &str {
        "panics"
    }

    fn critical(&self) -> bool {
        true
    }

    async fn run(&self, _ctx: &CheckContext) -> CheckResult<Verdict> {
        panic!("boom");
    }
}

/// Deletes the file from disk on the first DELETE, 404 afterwards.
struct DeletingResponder {
    file: PathBuf,
}

impl Respond for DeletingResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        if std::fs::remove_file(&self.file).is_ok() {
            ResponseTemplate::new(200)
        } else {
            ResponseTemplate::new(404)
        }
    }
}

#[tokio::test]
async fn test_request_check_passes_on_expected_status() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = RequestCheck::new(
        "GET method required",
        RequestSpec::get("/"),
        AllOf::status(200),
    );
    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed);
    assert_eq!(verdict.detail, "Status: 200");
}

#[tokio::test]
async fn test_large_header_is_sent() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header_exists("x-large-header"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = RequestCheck::new(
        "Large headers handling",
        RequestSpec::get("/").header("X-Large-Header", "A".repeat(8192)),
        AllOf::status(200),
    );

    assert!(check.run(&ctx).await.unwrap().passed);
}

#[tokio::test]
async fn test_raw_traversal_gets_404_without_passwd() {
    // Unmatched requests get wiremock's default 404
    let mock = MockServer::start().await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = RequestCheck::new(
        "Path traversal security",
        RequestSpec::get("/../../../etc/passwd").raw(),
        AllOf::status(404).and(BodyExcludes::new("root:")),
    );
    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed, "{}", verdict.detail);
}

#[tokio::test]
async fn test_raw_request_reads_body_by_content_length() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nonexistent"))
        .respond_with(ResponseTemplate::new(404).set_body_string("<h1>404 Not Found</h1>"))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let exchange = ctx
        .client()
        .send(&RequestSpec::get("/nonexistent").raw())
        .await
        .unwrap();

    assert_eq!(exchange.status, 404);
    assert_eq!(exchange.body_text(), "<h1>404 Not Found</h1>");
}

#[tokio::test]
async fn test_cgi_post_echo_check() {
    let mock = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/test.cgi"))
        .and(body_string("name=test&value=123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("POST data: name=test&value=123"))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/test.cgi"))
        .and(query_param("param", "test"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "REQUEST_METHOD=GET\nQUERY_STRING=param=test\nSCRIPT_NAME=/test.cgi\n",
        ))
        .mount(&mock)
        .await;
    Mock::given(method("GET"))
        .and(path("/test.py"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);
    let category = build_category(&HarnessConfig::default(), CategoryKind::Cgi);

    let mut builder = SessionBuilder::new();
    ScenarioExecutor::new(&ctx).run_category(&category, &mut builder).await;
    let session = builder.finish(false);
    let results = session.results();

    assert_eq!(results.len(), 3);
    assert!(results[0].passed, "{}", results[0].detail);
    assert!(results[1].passed, "{}", results[1].detail);
    assert!(!results[2].passed);
    assert!(!results[2].critical);
}

#[tokio::test]
async fn test_delete_lifecycle_passes_when_server_deletes() {
    let mock = MockServer::start().await;
    let root = TempDir::new().unwrap();
    Mock::given(method("DELETE"))
        .and(path("/test_delete.txt"))
        .respond_with(DeletingResponder {
            file: root.path().join("test_delete.txt"),
        })
        .mount(&mock)
        .await;
    let ctx = context_for(&mock, &root);

    let check = DeleteLifecycleCheck::new("DELETE method required", "test_delete.txt");
    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed, "{}", verdict.detail);
    assert!(!root.path().join("test_delete.txt").exists());
}

#[tokio::test]
async fn test_delete_lifecycle_fails_when_server_refuses() {
    let mock = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = DeleteLifecycleCheck::new("DELETE method required", "test_delete.txt");
    let verdict = check.run(&ctx).await.unwrap();

    assert!(!verdict.passed);
    assert!(verdict.detail.contains("file still on disk"));
    // Fixture cleaned up even though the check failed
    assert!(!root.path().join("test_delete.txt").exists());
}

#[tokio::test]
async fn test_fixture_removed_after_exchange() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large_test.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(1000)))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = RequestCheck::new(
        "Large file serving",
        RequestSpec::get("/large_test.txt"),
        AllOf::status(200).and(BodyLenAtLeast(1000)),
    )
    .with_fixture(Fixture::file("large_test.txt", "x".repeat(1000)));
    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed);
    assert!(!root.path().join("large_test.txt").exists());
}

#[tokio::test]
async fn test_symlink_served_with_passwd_is_warning() {
    let passwd = TempDir::new().unwrap();
    let target = passwd.path().join("passwd");
    std::fs::write(&target, "root:x:0:0:root:/root:/bin/sh\n").unwrap();

    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/symlink_test"))
        .respond_with(ResponseTemplate::new(200).set_body_string("root:x:0:0:root:/root:/bin/sh"))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = SymlinkEscapeCheck::new("Symlink security", "symlink_test", &target, "root:");
    let verdict = check.run(&ctx).await.unwrap();

    assert!(!verdict.passed);
    assert!(verdict.warning);
}

#[tokio::test]
async fn test_symlink_refused_is_pass() {
    let passwd = TempDir::new().unwrap();
    let target = passwd.path().join("passwd");
    std::fs::write(&target, "root:x:0:0\n").unwrap();

    let mock = MockServer::start().await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let check = SymlinkEscapeCheck::new("Symlink security", "symlink_test", &target, "root:");
    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed);
    assert!(!verdict.warning);
}

#[tokio::test]
async fn test_executor_records_every_check_despite_errors_and_panics() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/nonexistent"))
        .respond_with(ResponseTemplate::new(404).set_body_string("404 Not Found"))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);

    let category = Category::new(CategoryKind::Routing)
        .with(PanickingCheck)
        .with(
            RequestCheck::new("Unreachable fixture", RequestSpec::get("/"), AllOf::status(200))
                .with_fixture(Fixture::file("missing-dir/file.txt", "x")),
        )
        .with(RequestCheck::new(
            "Default error pages",
            RequestSpec::get("/nonexistent"),
            AllOf::status(404).and(BodyContains::new("404 Not Found")),
        ));

    let mut builder = SessionBuilder::new();
    ScenarioExecutor::new(&ctx).run_category(&category, &mut builder).await;
    let session = builder.finish(false);
    let results = session.results();

    assert_eq!(results.len(), 3);
    assert!(!results[0].passed);
    assert!(results[0].critical);
    assert!(results[0].detail.contains("boom"));
    assert!(!results[1].passed);
    assert!(results[1].detail.starts_with("Error:"));
    assert!(results[2].passed);
    assert!(results.iter().all(|r| r.category == CategoryKind::Routing));
}

#[tokio::test]
async fn test_network_error_becomes_failed_result() {
    let port = common::free_port();
    let client = HttpClient::new(&format!("http://127.0.0.1:{port}"), Duration::from_secs(1)).unwrap();
    let root = TempDir::new().unwrap();
    let ctx = CheckContext::new(client, root.path());
    let category = Category::new(CategoryKind::Protocol).with(RequestCheck::new(
        "GET method required",
        RequestSpec::get("/"),
        AllOf::status(200),
    ));

    let mut builder = SessionBuilder::new();
    ScenarioExecutor::new(&ctx).run_category(&category, &mut builder).await;
    let session = builder.finish(false);
    let results = session.results();

    assert_eq!(results.len(), 1);
    assert!(!results[0].passed);
    assert!(results[0].detail.contains("Connection"));
}

/// Take one check out of the default catalogue by name.
fn catalogue_check(kind: CategoryKind, name: &str) -> Box<dyn Check> {
    build_category(&HarnessConfig::default(), kind)
        .checks
        .into_iter()
        .find(|check| check.name() == name)
        .unwrap()
}

/// 403 while the requested file has mode 000, 200 otherwise.
struct PermissionResponder {
    file: PathBuf,
}

impl Respond for PermissionResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        match std::fs::metadata(&self.file) {
            Ok(meta) if meta.permissions().mode() & 0o777 == 0 => ResponseTemplate::new(403),
            Ok(_) => ResponseTemplate::new(200),
            Err(_) => ResponseTemplate::new(404),
        }
    }
}

/// Serves the file straight from the content root.
struct FileResponder {
    file: PathBuf,
}

impl Respond for FileResponder {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        match std::fs::read(&self.file) {
            Ok(body) => ResponseTemplate::new(200).set_body_bytes(body),
            Err(_) => ResponseTemplate::new(404),
        }
    }
}

#[tokio::test]
async fn test_catalogue_patch_rejected_with_400_passes() {
    let mock = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);
    let check = catalogue_check(CategoryKind::Protocol, "Invalid method rejection");

    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed, "{}", verdict.detail);
    assert!(check.critical());
}

#[tokio::test]
async fn test_catalogue_patch_accepted_fails() {
    let mock = MockServer::start().await;
    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);
    let check = catalogue_check(CategoryKind::Protocol, "Invalid method rejection");

    let verdict = check.run(&ctx).await.unwrap();

    assert!(!verdict.passed);
    assert_eq!(verdict.detail, "Status: 200 (expected 400)");
}

#[tokio::test]
async fn test_catalogue_mode_000_file_forbidden_passes() {
    let mock = MockServer::start().await;
    let root = TempDir::new().unwrap();
    let file = root.path().join("no_permission.txt");
    Mock::given(method("GET"))
        .and(path("/no_permission.txt"))
        .respond_with(PermissionResponder { file: file.clone() })
        .mount(&mock)
        .await;
    let ctx = context_for(&mock, &root);
    let check = catalogue_check(CategoryKind::Filesystem, "File permissions");

    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed, "{}", verdict.detail);
    assert!(!file.exists());
}

#[tokio::test]
async fn test_catalogue_mode_000_file_served_fails() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/no_permission.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);
    let check = catalogue_check(CategoryKind::Filesystem, "File permissions");

    let verdict = check.run(&ctx).await.unwrap();

    assert!(!verdict.passed);
    assert_eq!(verdict.detail, "Status: 200 (expected 403)");
    assert!(!root.path().join("no_permission.txt").exists());
}

#[tokio::test]
async fn test_catalogue_large_file_served_in_full_passes() {
    let mock = MockServer::start().await;
    let root = TempDir::new().unwrap();
    Mock::given(method("GET"))
        .and(path("/large_test.txt"))
        .respond_with(FileResponder {
            file: root.path().join("large_test.txt"),
        })
        .mount(&mock)
        .await;
    let ctx = context_for(&mock, &root);
    let check = catalogue_check(CategoryKind::Filesystem, "Large file serving");

    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed, "{}", verdict.detail);
    assert!(verdict.detail.contains("Size: 100000 bytes"));
}

#[tokio::test]
async fn test_catalogue_large_file_truncated_fails() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large_test.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(4096)))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);
    let check = catalogue_check(CategoryKind::Filesystem, "Large file serving");

    let verdict = check.run(&ctx).await.unwrap();

    assert!(!verdict.passed);
    assert!(verdict.detail.contains("Size: 4096 bytes (expected at least 100000)"));
}

#[tokio::test]
async fn test_catalogue_cgi_environment_passes_with_all_variables() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test.cgi"))
        .and(query_param("param", "test"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "REQUEST_METHOD=GET\nQUERY_STRING=param=test\nSCRIPT_NAME=/test.cgi\n",
        ))
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);
    let check = catalogue_check(CategoryKind::Cgi, "CGI environment variables");

    let verdict = check.run(&ctx).await.unwrap();

    assert!(verdict.passed, "{}", verdict.detail);
}

#[tokio::test]
async fn test_catalogue_cgi_environment_missing_variable_fails() {
    let mock = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/test.cgi"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("REQUEST_METHOD=GET\nQUERY_STRING=param=test\n"),
        )
        .mount(&mock)
        .await;
    let root = TempDir::new().unwrap();
    let ctx = context_for(&mock, &root);
    let check = catalogue_check(CategoryKind::Cgi, "CGI environment variables");

    let verdict = check.run(&ctx).await.unwrap();

    assert!(!verdict.passed);
    assert!(verdict.detail.contains("body missing 'SCRIPT_NAME'"));
    assert!(verdict.detail.contains("body contains 'REQUEST_METHOD'"));
}
