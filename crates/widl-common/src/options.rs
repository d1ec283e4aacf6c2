//! Parse configuration.

use serde::{Deserialize, Serialize};

/// Options accepted by the top-level parse entry point.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    /// Label for the source, used when decorating error messages
    /// (`Syntax error at line 3 in foo.webidl: …`).
    pub source_name: Option<String>,
}

impl ParseOptions {
    #[must_use]
    pub fn with_source_name(name: impl Into<String>) -> Self {
        ParseOptions {
            source_name: Some(name.into()),
        }
    }
}
