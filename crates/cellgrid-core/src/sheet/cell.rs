//! A single cell: content, memoized value, and its dependency edges.

use std::cell::OnceCell;
use std::collections::BTreeSet;

use cellgrid_engine::engine::{Position, Resolver, Value};

use super::content::Content;

/// A cell in the sheet.
///
/// Edges are stored as positions and resolved through the sheet's table:
/// `depends_on` mirrors the content's references and `dependents` holds the
/// cells whose content references this one.
#[derive(Debug, Default)]
pub struct Cell {
    content: Content,
    cache: OnceCell<Value>,
    pub(crate) depends_on: BTreeSet<Position>,
    pub(crate) dependents: BTreeSet<Position>,
}

impl Cell {
    pub(crate) fn empty() -> Cell {
        Cell::default()
    }

    pub fn content(&self) -> &Content {
        &self.content
    }

    pub fn text(&self) -> String {
        self.content.text()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn referenced_cells(&self) -> &[Position] {
        self.content.referenced_cells()
    }

    /// Cells this one reads from.
    pub fn depends_on(&self) -> impl Iterator<Item = Position> + '_ {
        self.depends_on.iter().copied()
    }

    /// Cells that read from this one.
    pub fn dependents(&self) -> impl Iterator<Item = Position> + '_ {
        self.dependents.iter().copied()
    }

    pub fn has_cached_value(&self) -> bool {
        self.cache.get().is_some()
    }

    /// The cached value, computing it on first use.
    pub(crate) fn value(&self, resolve: &Resolver<'_>) -> Value {
        self.cache
            .get_or_init(|| self.content.evaluate(resolve))
            .clone()
    }

    pub(crate) fn set_content(&mut self, content: Content) {
        self.content = content;
    }

    /// Drop the cached value. Returns whether there was one.
    pub(crate) fn invalidate(&mut self) -> bool {
        self.cache.take().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellgrid_engine::engine::FormulaError;
    use std::cell::Cell as Counter;

    #[test]
    fn test_value_is_memoized_until_invalidated() {
        let calls = Counter::new(0);
        let resolve = |_: Position| -> Result<f64, FormulaError> {
            calls.set(calls.get() + 1);
            Ok(4.0)
        };

        let mut cell = Cell::empty();
        cell.set_content(Content::parse("=A1*2").unwrap());
        assert!(!cell.has_cached_value());

        assert_eq!(cell.value(&resolve), Value::Number(8.0));
        assert_eq!(cell.value(&resolve), Value::Number(8.0));
        assert_eq!(calls.get(), 1);
        assert!(cell.has_cached_value());

        assert!(cell.invalidate());
        assert!(!cell.invalidate());
        assert_eq!(cell.value(&resolve), Value::Number(8.0));
        assert_eq!(calls.get(), 2);
    }
}
