//! cellgrid_engine - cell addressing and arithmetic formulas.

pub mod engine;
