use crate::{ConfigError, ConfigErrorResult};

use serde::Deserialize;

const DEFAULT_SCRIPT: &str = "/test.cgi";
const DEFAULT_EXTRA_SCRIPTS: [&str; 1] = ["/test.py"];
const DEFAULT_POST_PAYLOAD: &str = "name=test&value=123";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CgiConfig {
    /// Script probed for environment variables and POST echo
    pub script: String,
    /// One interpreter check per entry, keyed by extension
    pub extra_scripts: Vec<String>,
    pub post_payload: String,
}

impl Default for CgiConfig {
    fn default() -> Self {
        Self {
            script: String::from(DEFAULT_SCRIPT),
            extra_scripts: DEFAULT_EXTRA_SCRIPTS.iter().map(|s| s.to_string()).collect(),
            post_payload: String::from(DEFAULT_POST_PAYLOAD),
        }
    }
}

impl CgiConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        for path in std::iter::once(&self.script).chain(self.extra_scripts.iter()) {
            if !path.starts_with('/') {
                return Err(ConfigError::cgi(format!(
                    "CGI script paths must start with '/', got '{path}'"
                )));
            }
        }

        if self.post_payload.is_empty() {
            return Err(ConfigError::cgi("cgi.post_payload cannot be empty"));
        }

        Ok(())
    }
}
