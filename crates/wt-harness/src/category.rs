use crate::check::Check;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Protocol,
    Concurrency,
    Routing,
    Cgi,
    Filesystem,
    Resilience,
}

impl CategoryKind {
    /// Catalogue order
    pub const ALL: [CategoryKind; 6] = [
        Self::Protocol,
        Self::Concurrency,
        Self::Routing,
        Self::Cgi,
        Self::Filesystem,
        Self::Resilience,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Protocol => "protocol",
            Self::Concurrency => "concurrency",
            Self::Routing => "routing",
            Self::Cgi => "cgi",
            Self::Filesystem => "filesystem",
            Self::Resilience => "resilience",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Protocol => "HTTP Protocol Edge Cases",
            Self::Concurrency => "Non-blocking I/O",
            Self::Routing => "Configuration & Routing",
            Self::Cgi => "CGI Execution",
            Self::Filesystem => "File System Edge Cases",
            Self::Resilience => "Stress & Resilience",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown category '{s}', expected one of {}", names.join(", "))
            })
    }
}

/// Named, ordered group of checks executed sequentially.
pub struct Category {
    pub kind: CategoryKind,
    pub checks: Vec<Box<dyn Check>>,
}

impl Category {
    pub fn new(kind: CategoryKind) -> Self {
        Self {
            kind,
            checks: Vec::new(),
        }
    }

    pub fn with(mut self, check: impl Check + 'static) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.checks.iter().map(|c| c.name()).collect();
        f.debug_struct("Category")
            .field("kind", &self.kind)
            .field("checks", &names)
            .finish()
    }
}
