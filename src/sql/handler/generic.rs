//! Dialect-neutral identifier rules.
//!
//! Uses the keyword list of the SQL parser, ANSI double quotes and no case
//! folding heuristic. Suitable for databases without a dedicated policy.

use crate::sql::handler::identifier_policy::{CaseFolding, EscapeSymbol, IdentifierPolicy, KeywordSet};
use sqlparser::keywords::ALL_KEYWORDS;
use std::sync::LazyLock;

static KEYWORDS: LazyLock<KeywordSet> = LazyLock::new(|| KeywordSet::new(ALL_KEYWORDS));

#[derive(Debug, Default, Clone, Copy)]
pub struct GenericIdentifierPolicy;

impl IdentifierPolicy for GenericIdentifierPolicy {
    fn dialect(&self) -> &'static str {
        "generic"
    }

    fn escape_symbol(&self) -> EscapeSymbol {
        EscapeSymbol::DOUBLE_QUOTE
    }

    fn case_folding(&self) -> CaseFolding {
        CaseFolding::None
    }

    fn keywords(&self) -> &KeywordSet {
        &KEYWORDS
    }
}
