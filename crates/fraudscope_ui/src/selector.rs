//! CSS selector subset used to locate report elements.
//!
//! Supported grammar:
//!
//! ```text
//! list      := complex ("," complex)*
//! complex   := compound (combinator compound)*
//! combinator:= whitespace | ">"
//! compound  := (tag | "*")? ("." class | "#" id | "[" attr "]")*
//! attr      := name (("=" | "^=" | "$=" | "*=") value)?
//! ```
//!
//! Values may be bare identifiers or single/double quoted strings.

use crate::document::Document;
use crate::element::{Element, ElementId};
use crate::error::{UiError, UiResult};

/// Attribute comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Prefix(String),
    Suffix(String),
    Substring(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrMatch {
    name: String,
    op: AttrOp,
}

impl AttrMatch {
    fn matches(&self, el: &Element) -> bool {
        let value = if self.name == "class" {
            if el.classes().is_empty() {
                return false;
            }
            el.classes().join(" ")
        } else {
            match el.attribute(&self.name) {
                Some(v) => v.to_string(),
                None => return false,
            }
        };

        match &self.op {
            AttrOp::Exists => true,
            AttrOp::Equals(expected) => value == *expected,
            AttrOp::Prefix(prefix) => !prefix.is_empty() && value.starts_with(prefix.as_str()),
            AttrOp::Suffix(suffix) => !suffix.is_empty() && value.ends_with(suffix.as_str()),
            AttrOp::Substring(needle) => !needle.is_empty() && value.contains(needle.as_str()),
        }
    }
}

/// A sequence of simple selectors that all apply to one element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrMatch>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, el: &Element) -> bool {
        if let Some(tag) = &self.tag {
            if tag != "*" && *tag != el.tag {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if el.dom_id() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| el.has_class(c)) && self.attrs.iter().all(|a| a.matches(el))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

impl Complex {
    fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.match_at(doc, id, self.compounds.len() - 1)
    }

    fn match_at(&self, doc: &Document, id: ElementId, index: usize) -> bool {
        let Some(el) = doc.get(id) else { return false };
        if !self.compounds[index].matches(el) {
            return false;
        }
        if index == 0 {
            return true;
        }
        match self.combinators[index - 1] {
            Combinator::Child => el
                .parent
                .is_some_and(|parent| self.match_at(doc, parent, index - 1)),
            Combinator::Descendant => doc
                .ancestors(id)
                .any(|ancestor| self.match_at(doc, ancestor, index - 1)),
        }
    }
}

/// A parsed selector list (`a, b c, d > e`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parses a selector list.
    ///
    /// # Errors
    ///
    /// Returns [`UiError::InvalidSelector`] describing the first problem.
    pub fn parse(text: &str) -> UiResult<Self> {
        let mut parser = Parser {
            source: text,
            chars: text.chars().collect(),
            pos: 0,
        };
        let alternatives = parser.list()?;
        Ok(Self {
            source: text.trim().to_string(),
            alternatives,
        })
    }

    /// Returns the selector text as written (trimmed).
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns true if the element matches any alternative.
    #[must_use]
    pub fn matches(&self, doc: &Document, id: ElementId) -> bool {
        self.alternatives.iter().any(|c| c.matches(doc, id))
    }
}

struct Parser<'a> {
    source: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, reason: impl Into<String>) -> UiError {
        UiError::InvalidSelector {
            selector: self.source.to_string(),
            reason: reason.into(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn list(&mut self) -> UiResult<Vec<Complex>> {
        let mut alternatives = vec![self.complex()?];
        while self.peek() == Some(',') {
            self.pos += 1;
            alternatives.push(self.complex()?);
        }
        if let Some(c) = self.peek() {
            return Err(self.error(format!("unexpected {c:?} at {}", self.pos)));
        }
        Ok(alternatives)
    }

    fn complex(&mut self) -> UiResult<Complex> {
        self.skip_ws();
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                Some('>') => {
                    self.pos += 1;
                    self.skip_ws();
                    Combinator::Child
                }
                Some(',') | None => break,
                Some(_) if had_ws => Combinator::Descendant,
                Some(c) => return Err(self.error(format!("unexpected {c:?} at {}", self.pos))),
            };
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        Ok(Complex { compounds, combinators })
    }

    fn compound(&mut self) -> UiResult<Compound> {
        let mut compound = Compound::default();

        if self.peek() == Some('*') {
            self.pos += 1;
            compound.tag = Some("*".to_string());
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.pos += 1;
                    compound.classes.push(self.ident()?);
                }
                Some('#') => {
                    self.pos += 1;
                    compound.id = Some(self.ident()?);
                }
                Some('[') => {
                    self.pos += 1;
                    compound.attrs.push(self.attr()?);
                }
                _ => break,
            }
        }

        if compound.is_empty() {
            return Err(self.error(format!("expected a selector at {}", self.pos)));
        }
        Ok(compound)
    }

    fn attr(&mut self) -> UiResult<AttrMatch> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();

        let op = match self.peek() {
            Some(']') => {
                self.pos += 1;
                return Ok(AttrMatch { name, op: AttrOp::Exists });
            }
            Some('=') => {
                self.pos += 1;
                '='
            }
            Some(c @ ('^' | '$' | '*')) if self.chars.get(self.pos + 1) == Some(&'=') => {
                self.pos += 2;
                c
            }
            _ => return Err(self.error(format!("bad attribute operator at {}", self.pos))),
        };

        self.skip_ws();
        let value = self.value()?;
        self.skip_ws();
        if self.peek() != Some(']') {
            return Err(self.error("unterminated attribute selector"));
        }
        self.pos += 1;

        let op = match op {
            '=' => AttrOp::Equals(value),
            '^' => AttrOp::Prefix(value),
            '$' => AttrOp::Suffix(value),
            _ => AttrOp::Substring(value),
        };
        Ok(AttrMatch { name, op })
    }

    fn value(&mut self) -> UiResult<String> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let start = self.pos;
                while self.peek().is_some_and(|c| c != quote) {
                    self.pos += 1;
                }
                if self.peek().is_none() {
                    return Err(self.error("unterminated string"));
                }
                let value: String = self.chars[start..self.pos].iter().collect();
                self.pos += 1;
                Ok(value)
            }
            _ => self.ident(),
        }
    }

    fn ident(&mut self) -> UiResult<String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error(format!("expected identifier at {start}")));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
