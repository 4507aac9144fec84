// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Declaration reader for Java compilation units.
//!
//! Reads the *declaration skeleton* of a `.java` unit: package, imports, type
//! declarations, fields, methods, annotations and type parameters. Method
//! bodies, field initializers, enum constants and annotation element
//! expressions are not parsed; the reader only finds their extent (skipping
//! string literals and comments) and records a [`SourceRange`].
//!
//! ## Grammar (informal)
//!
//! ```text
//! <unit>      := [<annotation>* "package" <qname> ";"] <import>* <type>*
//! <import>    := "import" ["static"] <qname> ["." "*"] ";"
//! <type>      := <mods> ("class" | "interface" | "enum" | "@interface") <ident>
//!                [<tparams>] ["extends" <types>] ["implements" <types>] <body>
//! <member>    := <type> | <mods> [<tparams>] (<ctor> | <typeref> <ident> (<method> | <fields>))
//! <method>    := "(" <params> ")" ["throws" <types>] ["default" <expr>] (";" | <block>)
//! <fields>    := <declarator> ("," <declarator>)* ";"
//! ```

use std::cell::RefCell;
use std::sync::Arc;

use winnow::ascii::multispace0;
use winnow::error::{ErrMode, ParserError};
use winnow::prelude::*;
use winnow::token::{take_till, take_until, take_while};
use winnow::ModalResult;

use tugjava_core::{ModelError, ModelResult, Modifiers, SourceRange};

use crate::decl::{
    AnnotationDecl, AnnotationElementDecl, AnnotationValue, FieldDecl, ImportDecl, MemberDecl,
    MethodDecl, PackageDecl, ParameterDecl, TypeDecl, TypeKind, TypeParameterDecl, UnitDecl,
};

/// Read the declarations of one compilation unit.
///
/// # Errors
///
/// Returns [`ModelError::Parse`] with a 1-indexed line and column when the
/// text is not a well-formed unit, or [`ModelError::UnsupportedDeclaration`]
/// for constructs outside the modelled subset (records, initializer blocks).
pub fn read_unit(path: &str, text: &str) -> ModelResult<UnitDecl> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let reader = DeclReader::new(path, text);
    let mut input = text;
    match reader.unit(&mut input) {
        Ok(unit) => Ok(unit),
        Err(_) => Err(reader.into_error(input)),
    }
}

enum Failure {
    Syntax { offset: usize, message: String },
    Unsupported(String),
}

struct DeclReader<'s> {
    path: &'s str,
    text: &'s str,
    failure: RefCell<Option<Failure>>,
}

// ============================================================================
// Lexical primitives
// ============================================================================

fn spaces<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    multispace0.parse_next(input)
}

fn word<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_while(1.., is_ident_char).parse_next(input)
}

fn tag<'s>(input: &mut &'s str, mut token: &'static str) -> ModalResult<&'s str> {
    token.parse_next(input)
}

fn until<'s>(input: &mut &'s str, terminator: &'static str) -> ModalResult<&'s str> {
    take_until(0.., terminator).parse_next(input)
}

fn rest_of_line<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    take_till(0.., |c: char| c == '\n').parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn leading_word(text: &str) -> &str {
    let end = text.find(|c: char| !is_ident_char(c)).unwrap_or(text.len());
    &text[..end]
}

fn trailing_word(text: &str) -> &str {
    let start = text
        .rfind(|c: char| !is_ident_char(c))
        .map(|i| i + 1)
        .unwrap_or(0);
    &text[start..]
}

/// Check if a `<` between `before` and `after` opens type arguments
/// (`new HashMap<K, V>()`, `List.<T>of()`, `Map<>`) rather than comparing.
fn opens_type_arguments(before: &str, after: &str) -> bool {
    let next = after.trim_start().chars().next();
    if !next.is_some_and(|n| n.is_uppercase() || n == '?' || n == '>') {
        return false;
    }
    let before = before.trim_end();
    if before.ends_with('.') {
        return true;
    }
    let word = trailing_word(before);
    word == "new" || word.chars().next().is_some_and(char::is_uppercase)
}

/// Check if `c` ends a comparison that was taken for type arguments: `;`
/// always, `?` unless it is a wildcard (`<?>`, `<?, ?>`, `<? extends T>`).
fn ends_comparison(c: char, after: &str) -> bool {
    if c == ';' {
        return true;
    }
    let after = after.trim_start();
    if matches!(after.chars().next(), Some(',' | '>')) {
        return false;
    }
    !matches!(leading_word(after), "extends" | "super")
}

/// Byte length of the string literal, char literal or comment at the start of `rest`.
fn literal_len(rest: &str) -> Option<usize> {
    if let Some(body) = rest.strip_prefix("\"\"\"") {
        return Some(body.find("\"\"\"").map(|i| i + 6).unwrap_or(rest.len()));
    }
    if let Some(body) = rest.strip_prefix("//") {
        return Some(body.find('\n').map(|i| i + 2).unwrap_or(rest.len()));
    }
    if let Some(body) = rest.strip_prefix("/*") {
        return Some(body.find("*/").map(|i| i + 4).unwrap_or(rest.len()));
    }
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let mut escaped = false;
    for (idx, c) in rest.char_indices().skip(1) {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '\n' => return Some(idx),
            c if c == quote => return Some(idx + 1),
            _ => {}
        }
    }
    Some(rest.len())
}

/// Collapse whitespace in a type reference: `Map< String ,Integer >` -> `Map<String, Integer>`.
fn normalize_type(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if pending_space {
            let prev = out.chars().last();
            let prev_wants = prev.is_some_and(|p| is_ident_char(p) || p == ',' || p == '?');
            if prev_wants && (is_ident_char(c) || c == '?' || c == '@') {
                out.push(' ');
            }
            pending_space = false;
        }
        out.push(c);
        if c == ',' {
            pending_space = true;
        }
    }
    out
}

impl<'s> DeclReader<'s> {
    fn new(path: &'s str, text: &'s str) -> Self {
        DeclReader {
            path,
            text,
            failure: RefCell::new(None),
        }
    }

    fn pos(&self, input: &&'s str) -> usize {
        self.text.len() - input.len()
    }

    /// Byte offset of a slice of `self.text`.
    fn offset_of(&self, slice: &str) -> usize {
        slice.as_ptr() as usize - self.text.as_ptr() as usize
    }

    fn range_from(&self, start: usize, input: &&'s str) -> SourceRange {
        SourceRange::from_offsets(start, self.pos(input))
    }

    /// Trim a slice and return it with its range.
    fn trimmed(&self, slice: &'s str) -> (SourceRange, &'s str) {
        let trimmed = slice.trim();
        let start = if trimmed.is_empty() {
            self.offset_of(slice)
        } else {
            self.offset_of(trimmed)
        };
        (SourceRange::from_offsets(start, start + trimmed.len()), trimmed)
    }

    fn fail<T>(&self, input: &&'s str, message: impl Into<String>) -> ModalResult<T> {
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(Failure::Syntax {
                offset: self.pos(input),
                message: message.into(),
            });
        }
        Err(ErrMode::from_input(input))
    }

    fn unsupported<T>(&self, input: &&'s str, what: impl Into<String>) -> ModalResult<T> {
        let mut failure = self.failure.borrow_mut();
        if failure.is_none() {
            *failure = Some(Failure::Unsupported(what.into()));
        }
        Err(ErrMode::from_input(input))
    }

    fn into_error(self, rest: &'s str) -> ModelError {
        let failure = self.failure.into_inner().unwrap_or(Failure::Syntax {
            offset: self.text.len() - rest.len(),
            message: "unexpected input".to_string(),
        });
        match failure {
            Failure::Unsupported(what) => ModelError::UnsupportedDeclaration {
                path: self.path.to_string(),
                what,
            },
            Failure::Syntax { offset, message } => {
                let before = &self.text[..offset.min(self.text.len())];
                let line = before.matches('\n').count() as u32 + 1;
                let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
                let column = (before.len() - line_start) as u32 + 1;
                ModelError::parse(self.path, line, column, message)
            }
        }
    }

    // ========================================================================
    // Trivia and tokens
    // ========================================================================

    /// Skip whitespace and comments; return the range of the last Javadoc comment seen.
    fn trivia(&self, input: &mut &'s str) -> ModalResult<Option<SourceRange>> {
        let mut javadoc = None;
        loop {
            spaces(input)?;
            if input.starts_with("/**") && !input.starts_with("/**/") {
                let start = self.pos(input);
                tag(input, "/**")?;
                if until(input, "*/").is_err() {
                    return self.fail(input, "unterminated comment");
                }
                tag(input, "*/")?;
                javadoc = Some(self.range_from(start, input));
            } else if input.starts_with("/*") {
                tag(input, "/*")?;
                if until(input, "*/").is_err() {
                    return self.fail(input, "unterminated comment");
                }
                tag(input, "*/")?;
            } else if input.starts_with("//") {
                rest_of_line(input)?;
            } else {
                return Ok(javadoc);
            }
        }
    }

    fn expect(&self, input: &mut &'s str, token: &'static str) -> ModalResult<()> {
        self.trivia(input)?;
        if tag(input, token).is_err() {
            return self.fail(input, format!("expected '{}'", token));
        }
        Ok(())
    }

    /// Consume `kw` if it is the next whole word.
    fn keyword(&self, input: &mut &'s str, kw: &str) -> bool {
        if let Some(rest) = input.strip_prefix(kw) {
            if !rest.starts_with(is_ident_char) {
                *input = rest;
                return true;
            }
        }
        false
    }

    fn at_keyword(&self, input: &&'s str, kw: &str) -> bool {
        let mut probe = *input;
        self.keyword(&mut probe, kw)
    }

    fn identifier(&self, input: &mut &'s str) -> ModalResult<String> {
        self.trivia(input)?;
        let checkpoint = *input;
        match word(input) {
            Ok(w) if !w.starts_with(|c: char| c.is_ascii_digit()) => Ok(w.to_string()),
            _ => {
                *input = checkpoint;
                self.fail(input, "expected identifier")
            }
        }
    }

    /// `a.b.c`, stopping before a trailing `.*`.
    fn qualified_name(&self, input: &mut &'s str) -> ModalResult<String> {
        let mut name = self.identifier(input)?;
        loop {
            let checkpoint = *input;
            self.trivia(input)?;
            if input.starts_with('.') && !input.starts_with("...") {
                tag(input, ".")?;
                self.trivia(input)?;
                if input.starts_with('*') {
                    *input = checkpoint;
                    return Ok(name);
                }
                name.push('.');
                name.push_str(&self.identifier(input)?);
            } else {
                *input = checkpoint;
                return Ok(name);
            }
        }
    }

    // ========================================================================
    // Balanced regions and raw expressions
    // ========================================================================

    /// Consume a region from `open` to its matching `close`, skipping literals and comments.
    fn balanced(&self, input: &mut &'s str, open: char, close: char) -> ModalResult<&'s str> {
        let rest = *input;
        if !rest.starts_with(open) {
            return self.fail(input, format!("expected '{}'", open));
        }
        let mut depth = 0usize;
        let mut idx = 0;
        while idx < rest.len() {
            let tail = &rest[idx..];
            if let Some(len) = literal_len(tail) {
                idx += len;
                continue;
            }
            let Some(c) = tail.chars().next() else { break };
            idx += c.len_utf8();
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    let (taken, remaining) = rest.split_at(idx);
                    *input = remaining;
                    return Ok(taken);
                }
            }
        }
        self.fail(input, format!("unbalanced '{}'", open))
    }

    /// Consume an expression up to (not including) a stop character at nesting depth zero.
    fn expression(&self, input: &mut &'s str, stops: &[char]) -> ModalResult<&'s str> {
        let rest = *input;
        let mut depth = 0usize;
        let mut angle = 0usize;
        let mut idx = 0;
        while idx < rest.len() {
            let tail = &rest[idx..];
            if let Some(len) = literal_len(tail) {
                idx += len;
                continue;
            }
            let Some(c) = tail.chars().next() else { break };
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' if depth > 0 => depth -= 1,
                '<' if opens_type_arguments(&rest[..idx], &tail[1..]) => angle += 1,
                '>' if angle > 0 => angle -= 1,
                ';' | '?' if depth == 0 && angle > 0 && ends_comparison(c, &tail[1..]) => {
                    angle = 0;
                    continue;
                }
                '&' | '|' if depth == 0 && tail[1..].starts_with(c) => {
                    angle = 0;
                    idx += 2;
                    continue;
                }
                c if depth == 0 && angle == 0 && stops.contains(&c) => {
                    let (taken, remaining) = rest.split_at(idx);
                    *input = remaining;
                    return Ok(taken);
                }
                ')' | ']' | '}' => {
                    *input = &rest[idx..];
                    return self.fail(input, format!("unexpected '{}'", c));
                }
                _ => {}
            }
            idx += c.len_utf8();
        }
        *input = "";
        self.fail(input, "unterminated expression")
    }

    // ========================================================================
    // Annotations and modifiers
    // ========================================================================

    fn at_annotation_type_keyword(&self, input: &&'s str) -> bool {
        let Some(mut probe) = input.strip_prefix('@') else {
            return false;
        };
        if spaces(&mut probe).is_err() {
            return false;
        }
        self.at_keyword(&probe, "interface")
    }

    fn modifiers(&self, input: &mut &'s str) -> ModalResult<(Modifiers, Vec<AnnotationDecl>)> {
        let mut modifiers = Modifiers::empty();
        let mut annotations = Vec::new();
        loop {
            let checkpoint = *input;
            self.trivia(input)?;
            if input.starts_with('@') && !self.at_annotation_type_keyword(input) {
                annotations.push(self.annotation(input)?);
                continue;
            }
            let Ok(w) = word(input) else {
                *input = checkpoint;
                break;
            };
            if let Some(m) = Modifiers::from_keyword(w) {
                modifiers.insert(m);
            } else if w == "sealed" {
                // Permitted-subclass modifiers carry no meaning for the model.
            } else if w == "non" && input.starts_with("-sealed") {
                tag(input, "-sealed")?;
            } else {
                *input = checkpoint;
                break;
            }
        }
        Ok((modifiers, annotations))
    }

    fn annotation(&self, input: &mut &'s str) -> ModalResult<AnnotationDecl> {
        self.trivia(input)?;
        let start = self.pos(input);
        if tag(input, "@").is_err() {
            return self.fail(input, "expected '@'");
        }
        let name = self.qualified_name(input)?;
        let mut elements = Vec::new();

        let checkpoint = *input;
        self.trivia(input)?;
        if input.starts_with('(') {
            tag(input, "(")?;
            self.trivia(input)?;
            if input.starts_with(')') {
                // `@Marker()`
            } else if self.at_element_pair(input) {
                loop {
                    self.trivia(input)?;
                    let pair_start = self.pos(input);
                    let element_name = self.identifier(input)?;
                    self.expect(input, "=")?;
                    let (value, value_range) = self.element_value(input)?;
                    elements.push(AnnotationElementDecl {
                        name: element_name,
                        value,
                        value_range: Some(value_range),
                        range: Some(self.range_from(pair_start, input)),
                    });
                    self.trivia(input)?;
                    if input.starts_with(',') {
                        tag(input, ",")?;
                        continue;
                    }
                    break;
                }
            } else {
                let (value, value_range) = self.element_value(input)?;
                elements.push(AnnotationElementDecl {
                    name: "value".to_string(),
                    value,
                    value_range: Some(value_range),
                    range: Some(value_range),
                });
            }
            self.expect(input, ")")?;
        } else {
            *input = checkpoint;
        }

        Ok(AnnotationDecl {
            name,
            elements,
            range: Some(self.range_from(start, input)),
        })
    }

    /// Lookahead for `ident =` (and not `ident ==`).
    fn at_element_pair(&self, input: &&'s str) -> bool {
        let mut probe = *input;
        if word(&mut probe).is_err() || spaces(&mut probe).is_err() {
            return false;
        }
        probe.starts_with('=') && !probe.starts_with("==")
    }

    fn element_value(&self, input: &mut &'s str) -> ModalResult<(AnnotationValue, SourceRange)> {
        self.trivia(input)?;
        let start = self.pos(input);
        if input.starts_with('@') {
            let nested = self.annotation(input)?;
            let value = AnnotationValue::Annotation {
                name: nested.name,
                elements: nested
                    .elements
                    .into_iter()
                    .map(|e| (e.name, e.value))
                    .collect(),
            };
            return Ok((value, self.range_from(start, input)));
        }
        if input.starts_with('{') {
            tag(input, "{")?;
            let mut items = Vec::new();
            loop {
                self.trivia(input)?;
                if input.starts_with('}') {
                    break;
                }
                let (item, _) = self.element_value(input)?;
                items.push(item);
                self.trivia(input)?;
                if input.starts_with(',') {
                    tag(input, ",")?;
                    continue;
                }
                break;
            }
            self.expect(input, "}")?;
            return Ok((AnnotationValue::Array(items), self.range_from(start, input)));
        }
        let raw = self.expression(input, &[',', ')', '}'])?;
        let (range, text) = self.trimmed(raw);
        if text.is_empty() {
            return self.fail(input, "expected element value");
        }
        Ok((AnnotationValue::expr(text), range))
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn type_ref(&self, input: &mut &'s str) -> ModalResult<String> {
        self.trivia(input)?;
        while input.starts_with('@') {
            // Type annotations are not modelled.
            self.annotation(input)?;
            self.trivia(input)?;
        }
        let start = *input;
        self.identifier(input)?;
        loop {
            let checkpoint = *input;
            self.trivia(input)?;
            if input.starts_with('<') {
                self.balanced(input, '<', '>')?;
            } else if input.starts_with('.') && !input.starts_with("...") {
                tag(input, ".")?;
                self.identifier(input)?;
            } else {
                *input = checkpoint;
                break;
            }
        }
        loop {
            let checkpoint = *input;
            self.trivia(input)?;
            if input.starts_with('[') {
                tag(input, "[")?;
                self.expect(input, "]")?;
            } else {
                *input = checkpoint;
                break;
            }
        }
        let raw = &start[..start.len() - input.len()];
        Ok(normalize_type(raw))
    }

    fn type_list(&self, input: &mut &'s str) -> ModalResult<Vec<String>> {
        let mut types = vec![self.type_ref(input)?];
        loop {
            self.trivia(input)?;
            if input.starts_with(',') {
                tag(input, ",")?;
                types.push(self.type_ref(input)?);
            } else {
                return Ok(types);
            }
        }
    }

    fn type_parameters(&self, input: &mut &'s str) -> ModalResult<Vec<TypeParameterDecl>> {
        self.expect(input, "<")?;
        let mut params = Vec::new();
        loop {
            self.trivia(input)?;
            while input.starts_with('@') {
                self.annotation(input)?;
                self.trivia(input)?;
            }
            let start = self.pos(input);
            let name = self.identifier(input)?;
            let mut bounds = Vec::new();
            self.trivia(input)?;
            if self.keyword(input, "extends") {
                loop {
                    bounds.push(self.type_ref(input)?);
                    self.trivia(input)?;
                    if input.starts_with('&') {
                        tag(input, "&")?;
                        continue;
                    }
                    break;
                }
            }
            params.push(TypeParameterDecl {
                name,
                bounds,
                range: Some(self.range_from(start, input)),
            });
            self.trivia(input)?;
            if input.starts_with(',') {
                tag(input, ",")?;
                continue;
            }
            break;
        }
        self.expect(input, ">")?;
        Ok(params)
    }

    fn at_type_keyword(&self, input: &&'s str) -> bool {
        self.at_annotation_type_keyword(input)
            || ["class", "interface", "enum", "record"]
                .iter()
                .any(|kw| self.at_keyword(input, kw))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn unit(&self, input: &mut &'s str) -> ModalResult<UnitDecl> {
        let mut unit = UnitDecl {
            path: self.path.to_string(),
            source: Some(Arc::from(self.text)),
            ..Default::default()
        };

        let checkpoint = *input;
        self.trivia(input)?;
        let start = self.pos(input);
        let (_, annotations) = self.modifiers(input)?;
        self.trivia(input)?;
        if self.keyword(input, "package") {
            let name = self.qualified_name(input)?;
            self.expect(input, ";")?;
            unit.package = Some(PackageDecl {
                name,
                annotations,
                range: Some(self.range_from(start, input)),
            });
        } else {
            *input = checkpoint;
        }

        loop {
            let checkpoint = *input;
            self.trivia(input)?;
            let start = self.pos(input);
            if !self.keyword(input, "import") {
                *input = checkpoint;
                break;
            }
            self.trivia(input)?;
            let is_static = self.keyword(input, "static");
            let name = self.qualified_name(input)?;
            self.trivia(input)?;
            let mut on_demand = false;
            if input.starts_with('.') {
                tag(input, ".")?;
                self.expect(input, "*")?;
                on_demand = true;
            }
            self.expect(input, ";")?;
            unit.imports.push(ImportDecl {
                name,
                is_static,
                on_demand,
                range: Some(self.range_from(start, input)),
            });
        }

        loop {
            let javadoc = self.trivia(input)?;
            if input.is_empty() {
                break;
            }
            if input.starts_with(';') {
                tag(input, ";")?;
                continue;
            }
            unit.types.push(self.type_declaration(input, javadoc)?);
        }
        Ok(unit)
    }

    fn type_declaration(
        &self,
        input: &mut &'s str,
        javadoc: Option<SourceRange>,
    ) -> ModalResult<TypeDecl> {
        self.trivia(input)?;
        let start = self.pos(input);
        let (modifiers, annotations) = self.modifiers(input)?;
        self.trivia(input)?;

        let kind = if self.at_annotation_type_keyword(input) {
            tag(input, "@")?;
            self.trivia(input)?;
            self.keyword(input, "interface");
            TypeKind::Annotation
        } else if self.keyword(input, "class") {
            TypeKind::Class
        } else if self.keyword(input, "interface") {
            TypeKind::Interface
        } else if self.keyword(input, "enum") {
            TypeKind::Enum
        } else if self.at_keyword(input, "record") {
            return self.unsupported(input, "record declaration");
        } else {
            return self.fail(input, "expected type declaration");
        };

        let name = self.identifier(input)?;
        self.trivia(input)?;
        let type_parameters = if input.starts_with('<') {
            self.type_parameters(input)?
        } else {
            Vec::new()
        };

        let mut super_class = None;
        let mut super_interfaces = Vec::new();
        self.trivia(input)?;
        if self.keyword(input, "extends") {
            if kind == TypeKind::Class {
                super_class = Some(self.type_ref(input)?);
            } else {
                super_interfaces = self.type_list(input)?;
            }
        }
        self.trivia(input)?;
        if self.keyword(input, "implements") {
            super_interfaces.extend(self.type_list(input)?);
        }
        self.trivia(input)?;
        if self.keyword(input, "permits") {
            self.type_list(input)?;
        }

        self.expect(input, "{")?;
        let enum_constants = if kind == TypeKind::Enum {
            self.trivia(input)?;
            let raw = self.expression(input, &[';', '}'])?;
            let (_, text) = self.trimmed(raw);
            if input.starts_with(';') {
                tag(input, ";")?;
            }
            Some(text.to_string())
        } else {
            None
        };
        let members = self.members(input, &name)?;
        self.expect(input, "}")?;

        Ok(TypeDecl {
            name,
            kind,
            modifiers,
            type_parameters,
            super_class,
            super_interfaces,
            annotations,
            members,
            enum_constants,
            range: Some(self.range_from(start, input)),
            javadoc,
        })
    }

    fn members(&self, input: &mut &'s str, type_name: &str) -> ModalResult<Vec<MemberDecl>> {
        let mut members = Vec::new();
        loop {
            let javadoc = self.trivia(input)?;
            if input.starts_with('}') {
                return Ok(members);
            }
            if input.is_empty() {
                return self.fail(input, "unexpected end of input in type body");
            }
            if input.starts_with(';') {
                tag(input, ";")?;
                continue;
            }
            if input.starts_with('{') {
                return self.unsupported(input, "initializer block");
            }

            let checkpoint = *input;
            let start = self.pos(input);
            let (modifiers, annotations) = self.modifiers(input)?;
            self.trivia(input)?;
            if input.starts_with('{') {
                return self.unsupported(input, "static initializer block");
            }
            if self.at_type_keyword(input) {
                *input = checkpoint;
                members.push(MemberDecl::Type(self.type_declaration(input, javadoc)?));
                continue;
            }

            let type_parameters = if input.starts_with('<') {
                self.type_parameters(input)?
            } else {
                Vec::new()
            };

            let header = MemberHeader {
                start,
                javadoc,
                modifiers,
                annotations,
                type_parameters,
            };
            if self.at_constructor(input, type_name) {
                let name = self.identifier(input)?;
                members.push(MemberDecl::Method(self.method(input, header, name, None)?));
                continue;
            }

            let data_type = self.type_ref(input)?;
            let name = self.identifier(input)?;
            self.trivia(input)?;
            if input.starts_with('(') {
                members.push(MemberDecl::Method(self.method(
                    input,
                    header,
                    name,
                    Some(data_type),
                )?));
            } else {
                for field in self.fields(input, header, name, data_type)? {
                    members.push(MemberDecl::Field(field));
                }
            }
        }
    }

    fn at_constructor(&self, input: &&'s str, type_name: &str) -> bool {
        let mut probe = *input;
        match word(&mut probe) {
            Ok(w) if w == type_name => {}
            _ => return false,
        }
        if spaces(&mut probe).is_err() {
            return false;
        }
        probe.starts_with('(')
    }

    fn method(
        &self,
        input: &mut &'s str,
        header: MemberHeader,
        name: String,
        return_type: Option<String>,
    ) -> ModalResult<MethodDecl> {
        self.expect(input, "(")?;
        let mut parameters = Vec::new();
        self.trivia(input)?;
        if !input.starts_with(')') {
            loop {
                parameters.push(self.parameter(input)?);
                self.trivia(input)?;
                if input.starts_with(',') {
                    tag(input, ",")?;
                    continue;
                }
                break;
            }
        }
        self.expect(input, ")")?;

        let mut exceptions = Vec::new();
        self.trivia(input)?;
        if self.keyword(input, "throws") {
            exceptions = self.type_list(input)?;
        }

        let mut default_value = None;
        self.trivia(input)?;
        if self.keyword(input, "default") {
            self.trivia(input)?;
            let raw = self.expression(input, &[';'])?;
            default_value = Some(self.trimmed(raw).0);
        }

        self.trivia(input)?;
        let body = if input.starts_with(';') {
            tag(input, ";")?;
            None
        } else if input.starts_with('{') {
            let block = self.balanced(input, '{', '}')?;
            let offset = self.offset_of(block);
            Some(SourceRange::from_offsets(offset, offset + block.len()))
        } else {
            return self.fail(input, "expected method body or ';'");
        };

        Ok(MethodDecl {
            is_constructor: return_type.is_none(),
            name,
            return_type,
            modifiers: header.modifiers,
            type_parameters: header.type_parameters,
            parameters,
            exceptions,
            annotations: header.annotations,
            body,
            default_value,
            range: Some(self.range_from(header.start, input)),
            javadoc: header.javadoc,
        })
    }

    fn parameter(&self, input: &mut &'s str) -> ModalResult<ParameterDecl> {
        self.trivia(input)?;
        let start = self.pos(input);
        let (modifiers, annotations) = self.modifiers(input)?;
        let mut data_type = self.type_ref(input)?;
        self.trivia(input)?;
        let is_varargs = input.starts_with("...");
        if is_varargs {
            tag(input, "...")?;
        }
        let name = self.identifier(input)?;
        self.array_dims_after_name(input, &mut data_type)?;
        Ok(ParameterDecl {
            name,
            data_type,
            modifiers,
            annotations,
            is_varargs,
            range: Some(self.range_from(start, input)),
        })
    }

    /// C-style dimensions after a declarator name (`int a[]`).
    fn array_dims_after_name(
        &self,
        input: &mut &'s str,
        data_type: &mut String,
    ) -> ModalResult<()> {
        loop {
            let checkpoint = *input;
            self.trivia(input)?;
            if input.starts_with('[') {
                tag(input, "[")?;
                self.expect(input, "]")?;
                data_type.push_str("[]");
            } else {
                *input = checkpoint;
                return Ok(());
            }
        }
    }

    fn fields(
        &self,
        input: &mut &'s str,
        header: MemberHeader,
        first_name: String,
        data_type: String,
    ) -> ModalResult<Vec<FieldDecl>> {
        let mut fields = Vec::new();
        let mut name = first_name;
        loop {
            let mut declarator_type = data_type.clone();
            self.array_dims_after_name(input, &mut declarator_type)?;
            self.trivia(input)?;
            let initializer = if input.starts_with('=') {
                tag(input, "=")?;
                let raw = self.expression(input, &[',', ';'])?;
                Some(self.trimmed(raw).0)
            } else {
                None
            };
            fields.push(FieldDecl {
                name,
                data_type: declarator_type,
                modifiers: header.modifiers,
                annotations: header.annotations.clone(),
                initializer,
                range: None,
                javadoc: header.javadoc,
            });
            self.trivia(input)?;
            if input.starts_with(',') {
                tag(input, ",")?;
                name = self.identifier(input)?;
                continue;
            }
            self.expect(input, ";")?;
            break;
        }
        let range = self.range_from(header.start, input);
        for field in &mut fields {
            field.range = Some(range);
        }
        Ok(fields)
    }
}

/// Modifiers and type parameters read before a member's name.
struct MemberHeader {
    start: usize,
    javadoc: Option<SourceRange>,
    modifiers: Modifiers,
    annotations: Vec<AnnotationDecl>,
    type_parameters: Vec<TypeParameterDecl>,
}
