use std::collections::HashMap;

use cellgrid_engine::engine::{FormulaError, MAX_COLS, MAX_ROWS, Position, Size, Value};

use super::cell::Cell;
use super::content::Content;
use super::graph::{self, CellTable};
use crate::error::{Result, SheetError};

/// Behaviour switches for a [`Sheet`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SheetOptions {
    /// When set, `clear_cell` rejects invalid positions with an error instead
    /// of ignoring them. `set_cell` and `get_cell` always reject them.
    pub strict_positions: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        SheetOptions {
            strict_positions: true,
        }
    }
}

/// A sheet of cells.
///
/// Cells appear on first write or when a formula first references them.
/// Cleared cells stay in the table as empty placeholders so that back-edges
/// from formulas still have a home.
#[derive(Debug)]
pub struct Sheet {
    pub(crate) cells: CellTable,
    /// Non-empty cells per row / column.
    pub(crate) row_counts: Vec<u32>,
    pub(crate) col_counts: Vec<u32>,
    /// Upper bound on the printable area; shrunk lazily on read.
    pub(crate) printable: std::cell::Cell<Size>,
    pub(crate) options: SheetOptions,
}

impl Sheet {
    pub fn new() -> Self {
        Self::with_options(SheetOptions::default())
    }

    pub fn with_options(options: SheetOptions) -> Self {
        Sheet {
            cells: HashMap::new(),
            row_counts: vec![0; MAX_ROWS as usize],
            col_counts: vec![0; MAX_COLS as usize],
            printable: std::cell::Cell::new(Size::default()),
            options,
        }
    }

    pub fn options(&self) -> SheetOptions {
        self.options
    }

    pub(crate) fn check_position(pos: Position) -> Result<()> {
        if pos.is_valid() {
            Ok(())
        } else {
            Err(SheetError::InvalidPosition(pos))
        }
    }

    /// The live cell at `pos`. Empty cells (never written, cleared, or only
    /// created as a reference target) are reported as `None`.
    pub fn get_cell(&self, pos: Position) -> Result<Option<CellView<'_>>> {
        Self::check_position(pos)?;
        Ok(self
            .cells
            .get(&pos)
            .filter(|cell| !cell.is_empty())
            .map(|cell| CellView {
                sheet: self,
                pos,
                cell,
            }))
    }

    /// The stored record at `pos`, including empty placeholders.
    pub fn cell_record(&self, pos: Position) -> Result<Option<&Cell>> {
        Self::check_position(pos)?;
        Ok(self.cells.get(&pos))
    }

    /// Value of the cell at `pos`, computing and caching it as needed.
    /// Missing cells read as empty text.
    pub fn value(&self, pos: Position) -> Result<Value> {
        Self::check_position(pos)?;
        Ok(self.value_at(pos))
    }

    pub(crate) fn value_at(&self, pos: Position) -> Value {
        match self.cells.get(&pos) {
            Some(cell) => {
                self.fill_caches(pos);
                cell.value(&|p| self.operand(p))
            }
            None => Value::empty(),
        }
    }

    /// Populate the caches of everything `pos` depends on, leaves first.
    ///
    /// Runs on an explicit stack so that a long reference chain is computed
    /// one link at a time; each evaluation then only reads cached operands.
    fn fill_caches(&self, pos: Position) {
        let uncached = |p: &Position| self.cells.get(p).is_some_and(|cell| !cell.has_cached_value());
        if !uncached(&pos) {
            return;
        }

        // (position, dependencies already pushed)
        let mut stack = vec![(pos, false)];
        while let Some((current, expanded)) = stack.pop() {
            let Some(cell) = self.cells.get(&current) else {
                continue;
            };
            if cell.has_cached_value() {
                continue;
            }
            if expanded {
                if current != pos {
                    cell.value(&|p| self.operand(p));
                }
                continue;
            }
            stack.push((current, true));
            stack.extend(cell.depends_on().filter(&uncached).map(|dep| (dep, false)));
        }
    }

    /// A referenced cell as a formula operand.
    fn operand(&self, pos: Position) -> std::result::Result<f64, FormulaError> {
        if !pos.is_valid() {
            return Err(FormulaError::Ref);
        }
        match self.cells.get(&pos) {
            None => Ok(0.0),
            Some(_) => self.value_at(pos).to_operand(),
        }
    }

    /// Smallest rows × cols area holding every non-empty cell.
    pub fn printable_size(&self) -> Size {
        let mut size = self.printable.get();
        while size.rows > 0 && self.row_counts[(size.rows - 1) as usize] == 0 {
            size.rows -= 1;
        }
        while size.cols > 0 && self.col_counts[(size.cols - 1) as usize] == 0 {
            size.cols -= 1;
        }
        self.printable.set(size);
        size
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.values().filter(|cell| !cell.is_empty()).count()
    }

    /// Non-empty cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = CellView<'_>> + '_ {
        let mut positions: Vec<Position> = self
            .cells
            .iter()
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(pos, _)| *pos)
            .collect();
        positions.sort();
        positions.into_iter().map(move |pos| CellView {
            sheet: self,
            pos,
            cell: &self.cells[&pos],
        })
    }

    /// Verify that dependency edges are symmetric, mirror each cell's
    /// references, and contain no cycle.
    pub fn check_invariants(&self) -> std::result::Result<(), String> {
        graph::check_invariants(&self.cells)
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new()
    }
}

/// Read access to one cell together with the sheet it evaluates against.
#[derive(Clone, Copy, Debug)]
pub struct CellView<'a> {
    sheet: &'a Sheet,
    pos: Position,
    cell: &'a Cell,
}

impl<'a> CellView<'a> {
    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn value(&self) -> Value {
        self.sheet.value_at(self.pos)
    }

    pub fn text(&self) -> String {
        self.cell.text()
    }

    pub fn content(&self) -> &'a Content {
        self.cell.content()
    }

    pub fn referenced_cells(&self) -> &'a [Position] {
        self.cell.referenced_cells()
    }

    pub fn dependents(&self) -> impl Iterator<Item = Position> + 'a {
        self.cell.dependents()
    }

    pub fn cell(&self) -> &'a Cell {
        self.cell
    }
}
