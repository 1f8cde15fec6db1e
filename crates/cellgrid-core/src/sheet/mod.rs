//! Sheet state and logic.

mod cell;
mod content;
mod graph;
mod ops;
mod print;
mod state;

pub use cell::Cell;
pub use content::{Content, ESCAPE_SIGN, FORMULA_SIGN};
pub use state::{CellView, Sheet, SheetOptions};
