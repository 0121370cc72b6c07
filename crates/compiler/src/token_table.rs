//! Interning of method tokens in first-seen order.

use indexmap::IndexSet;
use neo_smart_contract::MethodToken;
use tracing::debug;

/// Append-only table of distinct tokens; a token's index is its position.
///
/// Interning is idempotent: identical tokens share one index, tokens that
/// differ in any field get separate ones. The table itself imposes no size
/// limit; the module serializer does.
#[derive(Debug, Clone, Default)]
pub struct TokenTableBuilder {
    tokens: IndexSet<MethodToken>,
}

impl TokenTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the index of `token`, appending it on first sight.
    pub fn intern(&mut self, token: MethodToken) -> usize {
        let (index, inserted) = self.tokens.insert_full(token);
        if inserted {
            if let Some(token) = self.tokens.get_index(index) {
                debug!(target: "neo::compiler", token = index, %token, "interned method token");
            }
        }
        index
    }

    pub fn get(&self, index: usize) -> Option<&MethodToken> {
        self.tokens.get_index(index)
    }

    pub fn index_of(&self, token: &MethodToken) -> Option<usize> {
        self.tokens.get_index_of(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MethodToken> {
        self.tokens.iter()
    }

    pub fn into_tokens(self) -> Vec<MethodToken> {
        self.tokens.into_iter().collect()
    }
}
