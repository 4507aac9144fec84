// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;

use tugjava_model::ElementKind;

use super::Generate;
use crate::context::BuilderContext;
use crate::error::{GenError, GenResult};
use crate::output::SourceBuilder;

/// An import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportGenerator {
    name: String,
    is_static: bool,
    on_demand: bool,
}

impl ImportGenerator {
    /// A single-type import of `name`.
    pub fn new(name: impl Into<String>) -> Self {
        ImportGenerator {
            name: name.into(),
            is_static: false,
            on_demand: false,
        }
    }

    /// Parse the text after `import`: `a.b.C`, `a.b.*`, `static a.b.C.m`.
    pub fn parse(text: &str) -> Self {
        let text = text.trim().trim_end_matches(';').trim();
        let (is_static, rest) = match text.strip_prefix("static ") {
            Some(rest) => (true, rest.trim()),
            None => (false, text),
        };
        let (on_demand, name) = match rest.strip_suffix(".*") {
            Some(name) => (true, name),
            None => (false, rest),
        };
        ImportGenerator {
            name: name.to_string(),
            is_static,
            on_demand,
        }
    }

    /// Imported name without `.*`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_on_demand(&self) -> bool {
        self.on_demand
    }

    #[must_use]
    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    #[must_use]
    pub fn with_on_demand(mut self, on_demand: bool) -> Self {
        self.on_demand = on_demand;
        self
    }
}

impl fmt::Display for ImportGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            f.write_str("static ")?;
        }
        f.write_str(&self.name)?;
        if self.on_demand {
            f.write_str(".*")?;
        }
        Ok(())
    }
}

impl Generate for ImportGenerator {
    fn generate(&self, out: &mut SourceBuilder, _ctx: &mut BuilderContext) -> GenResult<()> {
        if self.name.is_empty() {
            return Err(GenError::missing_name(ElementKind::Import));
        }
        out.add_line(&format!("import {};", self));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CodegenOptions;

    #[test]
    fn test_parse() {
        let import = ImportGenerator::parse("static java.util.Collections.*");
        assert!(import.is_static());
        assert!(import.is_on_demand());
        assert_eq!(import.name(), "java.util.Collections");
        assert_eq!(import.to_string(), "static java.util.Collections.*");
        assert_eq!(
            ImportGenerator::parse(" java.util.List; "),
            ImportGenerator::new("java.util.List")
        );
    }

    #[test]
    fn test_generate() {
        let mut ctx = BuilderContext::new(CodegenOptions::default());
        let import = ImportGenerator::new("java.util.Map");
        assert_eq!(import.to_source_with(&mut ctx).unwrap(), "import java.util.Map;\n");
        assert!(ImportGenerator::new("").to_source_with(&mut ctx).is_err());
    }
}
