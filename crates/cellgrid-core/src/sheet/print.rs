//! Tab-separated rendering of the printable area.

use std::io::{self, Write};

use cellgrid_engine::engine::Position;

use super::{CellView, Sheet};

impl Sheet {
    /// Write every row of the printable area with cell values, tab separated.
    pub fn print_values<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_values_with(out, "\t")
    }

    /// Write every row of the printable area with cell texts, tab separated.
    pub fn print_texts<W: Write>(&self, out: &mut W) -> io::Result<()> {
        self.print_texts_with(out, "\t")
    }

    pub fn print_values_with<W: Write>(&self, out: &mut W, separator: &str) -> io::Result<()> {
        self.print_grid(out, separator, |cell| cell.value().to_string())
    }

    pub fn print_texts_with<W: Write>(&self, out: &mut W, separator: &str) -> io::Result<()> {
        self.print_grid(out, separator, |cell| cell.text())
    }

    fn print_grid<W, F>(&self, out: &mut W, separator: &str, render: F) -> io::Result<()>
    where
        W: Write,
        F: Fn(&CellView<'_>) -> String,
    {
        let size = self.printable_size();
        for row in 0..size.rows {
            for col in 0..size.cols {
                if col > 0 {
                    out.write_all(separator.as_bytes())?;
                }
                // In-bounds by construction; empty text prints as nothing.
                if let Ok(Some(cell)) = self.get_cell(Position::new(row, col)) {
                    out.write_all(render(&cell).as_bytes())?;
                }
            }
            out.write_all(b"\n")?;
        }
        Ok(())
    }
}
