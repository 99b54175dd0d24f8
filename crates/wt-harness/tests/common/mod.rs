#![allow(dead_code)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use wiremock::MockServer;
use wt_config::HarnessConfig;
use wt_harness::{CheckContext, HttpClient};

/// Write an executable shell script standing in for the server binary.
///
/// The script receives the server config path as `$1`.
pub fn write_server_script(dir: &Path, body: &str) -> PathBuf {
    let path = dir.join("fake-server.sh");
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A server config file for the script to receive
pub fn write_server_config(dir: &Path) -> PathBuf {
    let path = dir.join("server.conf");
    std::fs::write(&path, "listen 8080;\n").unwrap();
    path
}

/// A port nothing listens on
pub fn free_port() -> u16 {
    std::net::TcpListener::bind(("127.0.0.1", 0))
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Harness config pointing at `executable`, with fast probes and shutdown
pub fn fast_config(executable: &Path, config: &Path, port: u16) -> HarnessConfig {
    let mut harness = HarnessConfig::default();
    harness.target.executable = executable.to_path_buf();
    harness.target.config = config.to_path_buf();
    harness.target.port = port;
    harness.startup.probe_attempts = 3;
    harness.startup.probe_interval_ms = 100;
    harness.startup.probe_timeout_ms = 500;
    harness.shutdown.graceful_timeout_secs = 2;
    harness
}

pub fn context_for(server: &MockServer, content_root: &TempDir) -> CheckContext {
    let client = HttpClient::new(&server.uri(), std::time::Duration::from_secs(2)).unwrap();
    CheckContext::new(client, content_root.path())
}

/// Whether `pid` is gone or only a zombie
pub fn is_dead(pid: i32) -> bool {
    match std::fs::read_to_string(format!("/proc/{pid}/stat")) {
        Ok(stat) => stat
            .rsplit_once(')')
            .and_then(|(_, rest)| rest.split_whitespace().next())
            .is_some_and(|state| state == "Z" || state == "X"),
        Err(_) => true,
    }
}

pub fn read_pid(path: &Path) -> i32 {
    for _ in 0..50 {
        if let Ok(text) = std::fs::read_to_string(path)
            && let Ok(pid) = text.trim().parse()
        {
            return pid;
        }
        std::thread::sleep(std::time::Duration::from_millis(20));
    }
    panic!("pid file {} never written", path.display());
}
