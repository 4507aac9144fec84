// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source emission options.

use serde::{Deserialize, Serialize};

use tugjava_model::JavaEnvironment;

use crate::error::GenResult;

fn default_line_delimiter() -> String {
    "\n".to_string()
}

fn default_indent() -> String {
    "    ".to_string()
}

fn default_true() -> bool {
    true
}

/// Options controlling how generators emit source text.
///
/// ```
/// use tugjava_gen::CodegenOptions;
///
/// let options = CodegenOptions::from_json(r#"{ "indent": "\t" }"#).unwrap();
/// assert_eq!(options.indent, "\t");
/// assert!(options.add_override_annotations);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodegenOptions {
    /// Line delimiter written between lines.
    #[serde(default = "default_line_delimiter")]
    pub line_delimiter: String,

    /// One level of indentation.
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Global switch for override-if-necessary method generators.
    #[serde(default = "default_true")]
    pub add_override_annotations: bool,

    /// Sort imports added during emission. Existing imports keep their order.
    #[serde(default = "default_true")]
    pub sort_new_imports: bool,

    /// Emit Javadoc comments carried by generators.
    #[serde(default = "default_true")]
    pub emit_javadoc: bool,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        CodegenOptions {
            line_delimiter: default_line_delimiter(),
            indent: default_indent(),
            add_override_annotations: true,
            sort_new_imports: true,
            emit_javadoc: true,
        }
    }
}

impl CodegenOptions {
    /// Parse options from a JSON document. Missing keys take their defaults;
    /// unknown keys are rejected.
    pub fn from_json(json: &str) -> GenResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default options with the environment's line delimiter.
    pub fn for_environment(env: &JavaEnvironment) -> Self {
        CodegenOptions {
            line_delimiter: env.line_delimiter().to_string(),
            ..Default::default()
        }
    }
}
