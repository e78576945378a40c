//! # Identifier Policy
//!
//! Every supported SQL dialect decides for itself whether a bare column or
//! table name has to be quoted before it is embedded in generated undo SQL.
//! The decision is made by [`IdentifierPolicy::needs_escape`]:
//!
//! ```text
//!   needs_escape(name, meta)
//!          │
//!          ▼
//!   blank? ───────────────────────────────► false
//!          │
//!   already quoted? ──────────────────────► false   (never double-escape)
//!          │
//!   reserved keyword? ────────────────────► true
//!          │
//!   table meta available?
//!      ├── yes: column described? ── yes ─► column.is_case_sensitive()
//!      │                          └─ no ──► folding dialects: true
//!      │                                    non-folding dialects: false
//!      └── no:  case-folding heuristic
//!               Upper: any a-z   ─────────► true
//!               Lower: any A-Z   ─────────► true
//!               None:  ───────────────────► false
//! ```
//!
//! Case folding is an explicit per-dialect choice. A dialect that does not
//! fold unquoted identifiers reports [`CaseFolding::None`] and the heuristic
//! is skipped entirely.
//!
//! Malformed or empty identifiers are never an error: they simply do not get
//! quoted.

use crate::catalog::table_meta::TableMeta;
use std::collections::HashSet;
use std::fmt;

/// Opening and closing quote characters of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeSymbol {
    pub open: char,
    pub close: char,
}

impl EscapeSymbol {
    pub const DOUBLE_QUOTE: EscapeSymbol = EscapeSymbol {
        open: '"',
        close: '"',
    };
    pub const BACKTICK: EscapeSymbol = EscapeSymbol {
        open: '`',
        close: '`',
    };
    pub const BRACKET: EscapeSymbol = EscapeSymbol {
        open: '[',
        close: ']',
    };

    /// True if `part` starts with `open` and ends with `close`.
    pub fn wraps(&self, part: &str) -> bool {
        part.chars().count() >= 2 && part.starts_with(self.open) && part.ends_with(self.close)
    }
}

/// How a dialect normalizes unquoted identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFolding {
    /// Unquoted names are stored upper-case (Oracle family).
    Upper,
    /// Unquoted names are stored lower-case (PostgreSQL).
    Lower,
    /// Unquoted names keep their spelling or compare case-insensitively.
    None,
}

impl CaseFolding {
    /// Whether `name` already has the shape the dialect would fold it to.
    pub fn is_folded_form(&self, name: &str) -> bool {
        match self {
            CaseFolding::Upper => !name.chars().any(|c| c.is_ascii_lowercase()),
            CaseFolding::Lower => !name.chars().any(|c| c.is_ascii_uppercase()),
            CaseFolding::None => true,
        }
    }

    fn escapes_undescribed_column(&self) -> bool {
        !matches!(self, CaseFolding::None)
    }
}

/// Immutable keyword table of one dialect. Entries are stored upper-case.
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    words: HashSet<&'static str>,
}

impl KeywordSet {
    pub fn new(words: &[&'static str]) -> Self {
        Self {
            words: words.iter().copied().collect(),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.words.iter().copied()
    }
}

/// Quoting rules of one SQL dialect.
///
/// Implementors only provide the dialect data; the escaping algorithm is
/// shared through the provided methods.
pub trait IdentifierPolicy: Send + Sync + fmt::Debug {
    /// Registry id of the dialect, lower-case.
    fn dialect(&self) -> &'static str;

    fn escape_symbol(&self) -> EscapeSymbol;

    fn case_folding(&self) -> CaseFolding;

    fn keywords(&self) -> &KeywordSet;

    fn is_reserved_keyword(&self, name: &str) -> bool {
        let keywords = self.keywords();
        keywords.contains(name) || keywords.contains(&name.to_uppercase())
    }

    /// True if `name`, or any part of a qualified `name`, is already quoted.
    fn contains_escape(&self, name: &str) -> bool {
        let symbol = self.escape_symbol();
        let name = name.trim();
        symbol.wraps(name)
            || split_qualified(name, symbol)
                .iter()
                .any(|part| symbol.wraps(part))
    }

    fn needs_escape(&self, column_name: &str, table_meta: Option<&TableMeta>) -> bool {
        let name = column_name.trim();
        if name.is_empty() || self.contains_escape(name) {
            return false;
        }
        if self.is_reserved_keyword(name) {
            return true;
        }
        match table_meta {
            Some(meta) => match meta.get_column_meta(name) {
                Some(column) => column.is_case_sensitive(),
                None => self.case_folding().escapes_undescribed_column(),
            },
            None => !self.case_folding().is_folded_form(name),
        }
    }

    /// Like [`needs_escape`](Self::needs_escape) but consults the table's own
    /// declared case-sensitivity.
    fn needs_table_escape(&self, table_name: &str, table_meta: Option<&TableMeta>) -> bool {
        let name = table_name.trim();
        if name.is_empty() || self.contains_escape(name) {
            return false;
        }
        if self.is_reserved_keyword(name) {
            return true;
        }
        match table_meta {
            Some(meta) => meta.is_case_sensitive(),
            None => !self.case_folding().is_folded_form(name),
        }
    }

    /// Unconditionally wraps `identifier`, doubling embedded closing quotes.
    fn escape(&self, identifier: &str) -> String {
        let symbol = self.escape_symbol();
        let mut escaped = String::with_capacity(identifier.len() + 2);
        escaped.push(symbol.open);
        for c in identifier.chars() {
            if c == symbol.close {
                escaped.push(c);
            }
            escaped.push(c);
        }
        escaped.push(symbol.close);
        escaped
    }

    /// Quotes a column reference if the dialect requires it. Qualifiers of a
    /// dotted name are treated as table/schema names.
    fn add_escape(&self, column_name: &str, table_meta: Option<&TableMeta>) -> String {
        let name = column_name.trim();
        let parts = split_qualified(name, self.escape_symbol());
        let last = parts.len().saturating_sub(1);
        parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let quote = if i == last {
                    self.needs_escape(part, table_meta)
                } else {
                    self.needs_table_escape(part, None)
                };
                if quote {
                    self.escape(part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quotes a possibly schema-qualified table name if required.
    fn add_table_escape(&self, table_name: &str, table_meta: Option<&TableMeta>) -> String {
        let name = table_name.trim();
        let parts = split_qualified(name, self.escape_symbol());
        let last = parts.len().saturating_sub(1);
        parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                let meta = if i == last { table_meta } else { None };
                if self.needs_table_escape(part, meta) {
                    self.escape(part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Strips the dialect's quotes from every part of `name`.
    fn del_escape(&self, name: &str) -> String {
        let symbol = self.escape_symbol();
        let doubled: String = [symbol.close, symbol.close].iter().collect();
        split_qualified(name.trim(), symbol)
            .iter()
            .map(|part| {
                if symbol.wraps(part) {
                    let inner = &part[symbol.open.len_utf8()..part.len() - symbol.close.len_utf8()];
                    inner.replace(&doubled, &symbol.close.to_string())
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Splits a dotted identifier, ignoring dots inside quoted parts.
pub fn split_qualified(name: &str, symbol: EscapeSymbol) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    for (i, c) in name.char_indices() {
        if quoted {
            if c == symbol.close {
                quoted = false;
            }
        } else if c == symbol.open {
            quoted = true;
        } else if c == '.' {
            parts.push(&name[start..i]);
            start = i + 1;
        }
    }
    parts.push(&name[start..]);
    parts
}
