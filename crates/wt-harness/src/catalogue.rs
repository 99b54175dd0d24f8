//! The default check catalogue, built from configuration.

use crate::category::{Category, CategoryKind};
use crate::check::{
    BurstCheck, DeleteLifecycleCheck, FollowUp, RequestCheck, SymlinkEscapeCheck,
};
use crate::client::RequestSpec;
use crate::fixture::Fixture;
use crate::predicate::{AllOf, BodyContains, BodyExcludes, BodyLenAtLeast, Responded};

use reqwest::Method;
use wt_config::HarnessConfig;

const PASSWD_PATH: &str = "/etc/passwd";
const PASSWD_MARKER: &str = "root:";
const CGI_ENV_VARS: [&str; 3] = ["REQUEST_METHOD", "QUERY_STRING", "SCRIPT_NAME"];

/// All categories, or only `selected` ones (kept in catalogue order).
pub fn build_catalogue(config: &HarnessConfig, selected: &[CategoryKind]) -> Vec<Category> {
    CategoryKind::ALL
        .into_iter()
        .filter(|kind| selected.is_empty() || selected.contains(kind))
        .map(|kind| build_category(config, kind))
        .collect()
}

pub fn build_category(config: &HarnessConfig, kind: CategoryKind) -> Category {
    match kind {
        CategoryKind::Protocol => protocol(config),
        CategoryKind::Concurrency => concurrency(config),
        CategoryKind::Routing => routing(),
        CategoryKind::Cgi => cgi(config),
        CategoryKind::Filesystem => filesystem(config),
        CategoryKind::Resilience => resilience(config),
    }
}

fn protocol(config: &HarnessConfig) -> Category {
    let large_header = "A".repeat(config.requests.large_header_bytes);

    Category::new(CategoryKind::Protocol)
        .with(
            RequestCheck::new(
                "GET method required",
                RequestSpec::get("/"),
                AllOf::status(200),
            )
            .critical(),
        )
        .with(
            RequestCheck::new(
                "POST method required",
                RequestSpec::post("/upload.txt", "test"),
                AllOf::status(200),
            )
            .with_fixture(Fixture::created("upload.txt"))
            .critical(),
        )
        .with(DeleteLifecycleCheck::new("DELETE method required", "test_delete.txt"))
        .with(
            RequestCheck::new(
                "Invalid method rejection",
                RequestSpec::new(Method::PATCH, "/"),
                AllOf::status(400),
            )
            .critical(),
        )
        .with(RequestCheck::new(
            "Large headers handling",
            RequestSpec::get("/").header("X-Large-Header", large_header),
            AllOf::status(200),
        ))
        .with(
            RequestCheck::new(
                "Path traversal security",
                RequestSpec::get("/../../../etc/passwd").raw(),
                AllOf::status(404).and(BodyExcludes::new(PASSWD_MARKER)),
            )
            .critical(),
        )
}

fn concurrency(config: &HarnessConfig) -> Category {
    let c = &config.concurrency;
    let requests = c.connections;

    Category::new(CategoryKind::Concurrency)
        .with(BurstCheck::new(
            "Concurrent connections",
            requests,
            c.pool_size_for(requests),
            c.per_request_timeout(),
            c.required_successes(requests),
        ))
        .with(
            RequestCheck::new(
                "No indefinite hang",
                RequestSpec::get("/").timeout(config.requests.timeout()),
                AllOf::new().and(Responded),
            )
            .critical(),
        )
}

fn routing() -> Category {
    Category::new(CategoryKind::Routing)
        .with(RequestCheck::new(
            "Location method restrictions",
            RequestSpec::delete("/api/test"),
            AllOf::status(405),
        ))
        .with(RequestCheck::new(
            "Static location restrictions",
            RequestSpec::post("/static/test", "test"),
            AllOf::status(405),
        ))
        .with(
            RequestCheck::new(
                "Default error pages",
                RequestSpec::get("/nonexistent"),
                AllOf::status(404).and(BodyContains::new("404 Not Found")),
            )
            .critical(),
        )
}

fn cgi(config: &HarnessConfig) -> Category {
    let timeout = config.requests.cgi_timeout();
    let script = &config.cgi.script;

    let env_expect = CGI_ENV_VARS
        .into_iter()
        .fold(AllOf::status(200), |expect, var| expect.and(BodyContains::new(var)));

    let mut category = Category::new(CategoryKind::Cgi)
        .with(
            RequestCheck::new(
                "CGI environment variables",
                RequestSpec::get(&format!("{script}?param=test")).timeout(timeout),
                env_expect,
            )
            .critical(),
        )
        .with(
            RequestCheck::new(
                "CGI POST data",
                RequestSpec::post(script, config.cgi.post_payload.as_str())
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .timeout(timeout),
                AllOf::status(200).and(BodyContains::new(config.cgi.post_payload.as_str())),
            )
            .critical(),
        );

    for extra in &config.cgi.extra_scripts {
        let ext = extra.rsplit_once('.').map_or(extra.as_str(), |(_, ext)| ext);
        category = category.with(RequestCheck::new(
            &format!("CGI interpreter (.{ext})"),
            RequestSpec::get(extra).timeout(timeout),
            AllOf::status(200),
        ));
    }

    category
}

fn filesystem(config: &HarnessConfig) -> Category {
    let size = config.requests.large_file_bytes;

    Category::new(CategoryKind::Filesystem)
        .with(
            RequestCheck::new(
                "File permissions",
                RequestSpec::get("/no_permission.txt"),
                AllOf::status(403),
            )
            .with_fixture(Fixture::file_with_mode("no_permission.txt", "secret", 0o000)),
        )
        .with(
            RequestCheck::new(
                "Large file serving",
                RequestSpec::get("/large_test.txt"),
                AllOf::status(200).and(BodyLenAtLeast(size)),
            )
            .with_fixture(Fixture::file("large_test.txt", "x".repeat(size))),
        )
        .with(SymlinkEscapeCheck::new(
            "Symlink security",
            "symlink_test",
            PASSWD_PATH,
            PASSWD_MARKER,
        ))
}

fn resilience(config: &HarnessConfig) -> Category {
    let c = &config.concurrency;
    let requests = c.stress_requests;

    Category::new(CategoryKind::Resilience).with(
        BurstCheck::new(
            "Stress test survival",
            requests,
            c.pool_size_for(requests),
            c.per_request_timeout(),
            c.required_successes(requests),
        )
        .with_follow_up(FollowUp {
            settle: c.settle(),
            request: RequestSpec::get("/").timeout(config.requests.timeout()),
            expect: AllOf::status(200),
        }),
    )
}
