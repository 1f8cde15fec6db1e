use tracing::{debug, trace, warn};

use cellgrid_engine::engine::Position;

use super::Sheet;
use super::cell::Cell;
use super::content::Content;
use super::graph;
use crate::error::{Result, SheetError};

impl Sheet {
    /// Set cell contents from input text.
    ///
    /// Fails without touching the sheet if `pos` is invalid, the formula does
    /// not parse, or its references would close a cycle.
    pub fn set_cell(&mut self, pos: Position, text: &str) -> Result<()> {
        Self::check_position(pos)?;

        let content = Content::parse(text).inspect_err(|e| {
            debug!(cell = %pos, error = %e, "rejected malformed formula");
        })?;

        let existing = self.cells.get(&pos);
        match existing {
            Some(cell) if cell.content() == &content => return Ok(()),
            None if content.is_empty() => return Ok(()),
            _ => {}
        }
        let was_empty = existing.is_none_or(Cell::is_empty);

        let references = content.referenced_cells().to_vec();
        if let Some(path) = graph::find_cycle(&self.cells, pos, &references) {
            warn!(cell = %pos, "rejected circular reference");
            return Err(SheetError::CircularDependency { cell: pos, path });
        }

        let now_empty = content.is_empty();
        self.cells.entry(pos).or_insert_with(Cell::empty);
        graph::rewire(&mut self.cells, pos, &references);
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.set_content(content);
        }
        let cleared = graph::invalidate_from(&mut self.cells, pos);
        trace!(cell = %pos, cleared, "invalidated cached values");

        self.track_occupancy(pos, was_empty, now_empty);
        debug!(cell = %pos, references = references.len(), "cell updated");
        Ok(())
    }

    /// Clear the cell at `pos`.
    ///
    /// The cell stays in the table as an empty placeholder while other cells
    /// reference it. Clearing a missing or empty cell does nothing. Invalid
    /// positions are an error only under [`SheetOptions::strict_positions`].
    ///
    /// [`SheetOptions::strict_positions`]: super::SheetOptions::strict_positions
    pub fn clear_cell(&mut self, pos: Position) -> Result<()> {
        if !pos.is_valid() {
            if self.options.strict_positions {
                return Err(SheetError::InvalidPosition(pos));
            }
            debug!(row = pos.row, col = pos.col, "ignored clear of invalid position");
            return Ok(());
        }
        match self.cells.get(&pos) {
            Some(cell) if !cell.is_empty() => self.set_cell(pos, ""),
            _ => Ok(()),
        }
    }

    /// Keep row/column counters and the printable bound in step with a cell
    /// turning empty or non-empty.
    fn track_occupancy(&mut self, pos: Position, was_empty: bool, now_empty: bool) {
        let (row, col) = (pos.row as usize, pos.col as usize);
        match (was_empty, now_empty) {
            (true, false) => {
                self.row_counts[row] += 1;
                self.col_counts[col] += 1;
                let mut size = self.printable.get();
                size.rows = size.rows.max(pos.row + 1);
                size.cols = size.cols.max(pos.col + 1);
                self.printable.set(size);
            }
            (false, true) => {
                self.row_counts[row] -= 1;
                self.col_counts[col] -= 1;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::SheetOptions;
    use cellgrid_engine::engine::{FormulaError, Size, Value};

    fn pos(name: &str) -> Position {
        Position::from_a1(name)
    }

    fn value(sheet: &Sheet, name: &str) -> Value {
        sheet.value(pos(name)).unwrap()
    }

    #[test]
    fn test_formula_follows_its_inputs() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "5").unwrap();
        sheet.set_cell(pos("B1"), "=A1*2").unwrap();
        assert_eq!(value(&sheet, "B1"), Value::Number(10.0));

        sheet.set_cell(pos("A1"), "7").unwrap();
        assert_eq!(value(&sheet, "B1"), Value::Number(14.0));
        sheet.check_invariants().unwrap();
    }

    #[test]
    fn test_cycle_is_rejected_and_sheet_unchanged() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1+1").unwrap();
        let err = sheet.set_cell(pos("B1"), "=A1+1").unwrap_err();
        assert!(matches!(err, SheetError::CircularDependency { cell, .. } if cell == pos("B1")));

        let a1 = sheet.get_cell(pos("A1")).unwrap().unwrap();
        assert_eq!(a1.text(), "=B1+1");
        // B1 is still the placeholder created for A1's reference.
        assert!(sheet.get_cell(pos("B1")).unwrap().is_none());
        assert!(sheet.cell_record(pos("B1")).unwrap().unwrap().is_empty());
        sheet.check_invariants().unwrap();
    }

    #[test]
    fn test_self_reference_is_a_cycle() {
        let mut sheet = Sheet::new();
        let err = sheet.set_cell(pos("C3"), "=C3").unwrap_err();
        assert!(matches!(err, SheetError::CircularDependency { .. }));
        assert!(sheet.cell_record(pos("C3")).unwrap().is_none());
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
    }

    #[test]
    fn test_malformed_formula_keeps_previous_content() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=1+2").unwrap();
        let err = sheet.set_cell(pos("A1"), "=1+").unwrap_err();
        assert!(matches!(err, SheetError::Formula(_)));
        assert_eq!(value(&sheet, "A1"), Value::Number(3.0));
        assert_eq!(sheet.get_cell(pos("A1")).unwrap().unwrap().text(), "=1+2");
    }

    #[test]
    fn test_invalid_position_is_rejected() {
        let mut sheet = Sheet::new();
        let bad = Position::new(-1, 0);
        assert_eq!(
            sheet.set_cell(bad, "x"),
            Err(SheetError::InvalidPosition(bad))
        );
        assert!(sheet.get_cell(bad).is_err());
        assert!(sheet.clear_cell(bad).is_err());

        let mut lenient = Sheet::with_options(SheetOptions {
            strict_positions: false,
        });
        assert_eq!(lenient.clear_cell(bad), Ok(()));
        assert!(lenient.set_cell(bad, "x").is_err());
    }

    #[test]
    fn test_errors_propagate_through_references() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=1/0").unwrap();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        assert_eq!(value(&sheet, "A1"), Value::Error(FormulaError::Div0));
        assert_eq!(value(&sheet, "B1"), Value::Error(FormulaError::Div0));

        sheet.set_cell(pos("C1"), "abc").unwrap();
        sheet.set_cell(pos("D1"), "=C1+1").unwrap();
        assert_eq!(value(&sheet, "D1"), Value::Error(FormulaError::Value));

        sheet.set_cell(pos("E1"), "=ZZZZ1").unwrap();
        assert_eq!(value(&sheet, "E1"), Value::Error(FormulaError::Ref));
    }

    #[test]
    fn test_missing_and_empty_references_read_as_zero() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=B1+10").unwrap();
        assert_eq!(value(&sheet, "A1"), Value::Number(10.0));
    }

    #[test]
    fn test_clear_invalidates_dependents() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "3").unwrap();
        sheet.set_cell(pos("B1"), "=A1+1").unwrap();
        assert_eq!(value(&sheet, "B1"), Value::Number(4.0));

        sheet.clear_cell(pos("A1")).unwrap();
        assert_eq!(value(&sheet, "B1"), Value::Number(1.0));
        assert!(sheet.get_cell(pos("A1")).unwrap().is_none());
        let placeholder = sheet.cell_record(pos("A1")).unwrap().unwrap();
        assert_eq!(placeholder.dependents().collect::<Vec<_>>(), vec![pos("B1")]);
        sheet.check_invariants().unwrap();
    }

    #[test]
    fn test_chain_recomputes_transitively() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("A2"), "=A1+1").unwrap();
        sheet.set_cell(pos("A3"), "=A2+1").unwrap();
        sheet.set_cell(pos("A4"), "=A3+A2").unwrap();
        assert_eq!(value(&sheet, "A4"), Value::Number(5.0));

        sheet.set_cell(pos("A1"), "10").unwrap();
        assert!(!sheet.cell_record(pos("A4")).unwrap().unwrap().has_cached_value());
        assert_eq!(value(&sheet, "A4"), Value::Number(23.0));
    }

    #[test]
    fn test_rewiring_drops_old_dependencies() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "1").unwrap();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        sheet.set_cell(pos("B1"), "=C1").unwrap();

        // A1 no longer feeds B1, so A1 may now read B1.
        sheet.set_cell(pos("A1"), "=B1").unwrap();
        sheet.set_cell(pos("C1"), "4").unwrap();
        assert_eq!(value(&sheet, "A1"), Value::Number(4.0));
        sheet.check_invariants().unwrap();
    }

    #[test]
    fn test_same_text_is_a_no_op() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "2").unwrap();
        sheet.set_cell(pos("B1"), "=A1").unwrap();
        assert_eq!(value(&sheet, "B1"), Value::Number(2.0));

        sheet.set_cell(pos("B1"), "=A1").unwrap();
        assert!(sheet.cell_record(pos("B1")).unwrap().unwrap().has_cached_value());
    }

    #[test]
    fn test_regrouped_formula_replaces_old_one() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("A1"), "=1e308*(10/100)").unwrap();
        assert_eq!(value(&sheet, "A1"), Value::Number(1e308 * 0.1));

        // Both print the same canonical text but group differently.
        sheet.set_cell(pos("A1"), "=1e308*10/100").unwrap();
        assert_eq!(value(&sheet, "A1"), Value::Error(FormulaError::Div0));

        sheet.set_cell(pos("B1"), "=5+(3-1)").unwrap();
        assert_eq!(value(&sheet, "B1"), Value::Number(7.0));
        sheet.set_cell(pos("B1"), "=5+3-1").unwrap();
        assert!(!sheet.cell_record(pos("B1")).unwrap().unwrap().has_cached_value());
        assert_eq!(value(&sheet, "B1"), Value::Number(7.0));
    }

    #[test]
    fn test_setting_empty_text_clears() {
        let mut sheet = Sheet::new();
        sheet.set_cell(pos("B2"), "x").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(2, 2));
        sheet.set_cell(pos("B2"), "").unwrap();
        assert_eq!(sheet.printable_size(), Size::new(0, 0));
        sheet.set_cell(pos("Z9"), "").unwrap();
        assert!(sheet.cell_record(pos("Z9")).unwrap().is_none());
    }
}
