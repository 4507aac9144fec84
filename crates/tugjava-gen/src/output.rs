// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Output buffer for source emission.

use std::fmt;

use crate::options::CodegenOptions;

/// Token buffer with an indentation stack.
///
/// Generators append tokens; indentation is written explicitly with
/// [`SourceBuilder::add_indent`] at the start of each line.
#[derive(Debug, Clone)]
pub struct SourceBuilder {
    tokens: String,
    indent_tokens: Vec<String>,
    pub default_indent: String,
    pub default_newline: String,
}

impl Default for SourceBuilder {
    fn default() -> Self {
        SourceBuilder::new(&CodegenOptions::default())
    }
}

impl SourceBuilder {
    pub fn new(options: &CodegenOptions) -> Self {
        SourceBuilder {
            tokens: String::new(),
            indent_tokens: Vec::new(),
            default_indent: options.indent.clone(),
            default_newline: options.line_delimiter.clone(),
        }
    }

    /// An empty buffer with the same indentation and newline settings.
    pub fn fork(&self) -> Self {
        SourceBuilder {
            tokens: String::new(),
            indent_tokens: self.indent_tokens.clone(),
            default_indent: self.default_indent.clone(),
            default_newline: self.default_newline.clone(),
        }
    }

    pub fn add_token(&mut self, token: &str) {
        self.tokens.push_str(token);
    }

    /// Write the current indentation.
    pub fn add_indent(&mut self) {
        for indent in &self.indent_tokens {
            self.tokens.push_str(indent);
        }
    }

    pub fn add_newline(&mut self) {
        self.tokens.push_str(&self.default_newline);
    }

    /// Write one indented line.
    pub fn add_line(&mut self, text: &str) {
        self.add_indent();
        self.add_token(text);
        self.add_newline();
    }

    /// Push one level of the default indentation.
    pub fn indent(&mut self) {
        self.indent_tokens.push(self.default_indent.clone());
    }

    pub fn dedent(&mut self) {
        self.indent_tokens.pop();
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Check if the buffer ends with a blank line (or is empty).
    pub fn at_blank_line(&self) -> bool {
        let nl = self.default_newline.as_str();
        self.tokens.is_empty()
            || self
                .tokens
                .strip_suffix(nl)
                .is_some_and(|rest| rest.is_empty() || rest.ends_with(nl))
    }

    pub fn into_string(self) -> String {
        self.tokens
    }
}

impl fmt::Display for SourceBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

/// Split text into lines on `\n`, `\r\n` or `\r`.
pub(crate) fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = text;
    while let Some(idx) = rest.find(['\n', '\r']) {
        lines.push(&rest[..idx]);
        let skip = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[idx + skip..];
    }
    lines.push(rest);
    lines
}

/// Normalize a block of source lines for re-indentation.
///
/// Leading and trailing blank lines are dropped and the common leading
/// whitespace of the remaining lines is removed. Blank lines inside the
/// block are kept empty.
pub(crate) fn normalize_block(text: &str) -> Vec<&str> {
    let lines = split_lines(text);
    let is_blank = |line: &&str| line.trim().is_empty();
    let Some(first) = lines.iter().position(|l| !is_blank(l)) else {
        return Vec::new();
    };
    let last = lines.iter().rposition(|l| !is_blank(l)).unwrap_or(first);
    let block = &lines[first..=last];
    let margin = block
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    block
        .iter()
        .map(|line| {
            if is_blank(line) {
                ""
            } else {
                line.get(margin..).unwrap_or(line.trim_start()).trim_end()
            }
        })
        .collect()
}

/// Re-indent a block cut from a unit right after its opening delimiter
/// (a method body after `{`, enum constants after the type's `{`) to column 0.
///
/// A first line sharing the delimiter's line has lost its indentation, so the
/// margin is taken from the lines after it.
pub(crate) fn detach_block(text: &str) -> String {
    let lines = split_lines(text);
    let Some((first, rest)) = lines.split_first() else {
        return String::new();
    };
    if first.trim().is_empty() {
        return normalize_block(text).join("\n");
    }
    let is_blank = |line: &&str| line.trim().is_empty();
    let margin = rest
        .iter()
        .filter(|l| !is_blank(l))
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    let mut out = vec![first.trim()];
    out.extend(rest.iter().map(|line| {
        if is_blank(line) {
            ""
        } else {
            line.get(margin..).unwrap_or(line.trim_start()).trim_end()
        }
    }));
    while out.last().is_some_and(|l| l.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_stack() {
        let mut out = SourceBuilder::default();
        out.add_line("class A {");
        out.indent();
        out.add_line("int x;");
        out.dedent();
        out.add_line("}");
        assert_eq!(out.to_string(), "class A {\n    int x;\n}\n");
    }

    #[test]
    fn test_custom_newline() {
        let options = CodegenOptions {
            line_delimiter: "\r\n".to_string(),
            indent: "\t".to_string(),
            ..Default::default()
        };
        let mut out = SourceBuilder::new(&options);
        out.indent();
        out.add_line("x");
        assert_eq!(out.into_string(), "\tx\r\n");
    }

    #[test]
    fn test_at_blank_line() {
        let mut out = SourceBuilder::default();
        assert!(out.at_blank_line());
        out.add_line("a");
        assert!(!out.at_blank_line());
        out.add_newline();
        assert!(out.at_blank_line());
    }

    #[test]
    fn test_split_lines_mixed_delimiters() {
        assert_eq!(split_lines("a\r\nb\nc\rd"), vec!["a", "b", "c", "d"]);
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn test_normalize_block() {
        let body = "\n\n        if (x) {\n            y();\n        }\n\n        return;\n    ";
        assert_eq!(
            normalize_block(body),
            vec!["if (x) {", "    y();", "}", "", "return;"]
        );
        assert!(normalize_block("\n    \n").is_empty());
        assert_eq!(normalize_block(" return 1; "), vec!["return 1;"]);
    }

    #[test]
    fn test_detach_block_after_delimiter() {
        let constants = "A {\n        int f() { return 1; }\n    },\n\n    B";
        assert_eq!(detach_block(constants), "A {\n    int f() { return 1; }\n},\n\nB");
        let body = " first();\n        second();\n    ";
        assert_eq!(detach_block(body), "first();\nsecond();");
        assert_eq!(detach_block("\n        a();\n    "), "a();");
        assert_eq!(detach_block("X, Y"), "X, Y");
        assert_eq!(detach_block(""), "");
    }
}
