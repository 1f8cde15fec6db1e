//! Dependency graph maintenance over the sheet's cell table.
//!
//! Edges live inside the cells themselves (`depends_on` / `dependents`), so
//! every procedure here works on the whole table to keep both directions in
//! step:
//!
//! - [`find_cycle`] checks a prospective reference list before anything changes
//! - [`rewire`] replaces a cell's outgoing edges and the matching back-edges
//! - [`invalidate_from`] clears cached values along dependents

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use cellgrid_engine::engine::Position;

use super::cell::Cell;

pub(crate) type CellTable = HashMap<Position, Cell>;

/// Check whether giving `target` the references `references` would close a cycle.
///
/// Existing edges are acyclic, so a cycle exists iff `target` is reachable from
/// one of the new references. Returns the cycle as a path that starts and ends
/// at `target`. Positions without a cell are dead ends.
pub(crate) fn find_cycle(
    cells: &CellTable,
    target: Position,
    references: &[Position],
) -> Option<Vec<Position>> {
    // First-discovery parent of every visited position; doubles as the visited set.
    let mut parent: HashMap<Position, Position> = HashMap::new();
    let mut stack = Vec::new();

    for &reference in references {
        if reference == target {
            return Some(vec![target, target]);
        }
        if let Entry::Vacant(slot) = parent.entry(reference) {
            slot.insert(target);
            stack.push(reference);
        }
    }
    // A path back to `target` has to enter it through one of its dependents.
    if cells.get(&target).is_none_or(|cell| cell.dependents.is_empty()) {
        return None;
    }

    while let Some(current) = stack.pop() {
        let Some(cell) = cells.get(&current) else {
            continue;
        };
        for next in cell.depends_on() {
            if next == target {
                return Some(trace_path(&parent, target, current));
            }
            if let Entry::Vacant(slot) = parent.entry(next) {
                slot.insert(current);
                stack.push(next);
            }
        }
    }

    None
}

fn trace_path(parent: &HashMap<Position, Position>, target: Position, last: Position) -> Vec<Position> {
    let mut path = vec![target, last];
    let mut current = last;
    while let Some(&prev) = parent.get(&current) {
        path.push(prev);
        if prev == target {
            break;
        }
        current = prev;
    }
    path.reverse();
    path
}

/// Replace the outgoing edges of `target` with `references`.
///
/// Referenced positions without a cell get an empty placeholder so the
/// back-edge has somewhere to live. `target` must already be in the table.
pub(crate) fn rewire(cells: &mut CellTable, target: Position, references: &[Position]) {
    let old = match cells.get_mut(&target) {
        Some(cell) => std::mem::take(&mut cell.depends_on),
        None => return,
    };
    for dep in old {
        if let Some(cell) = cells.get_mut(&dep) {
            cell.dependents.remove(&target);
        }
    }

    for &reference in references {
        cells
            .entry(reference)
            .or_insert_with(Cell::empty)
            .dependents
            .insert(target);
    }
    if let Some(cell) = cells.get_mut(&target) {
        cell.depends_on = references.iter().copied().collect();
    }
}

/// Clear the cached value of `start` and of every cell that transitively
/// depends on it. Each cell is visited once. Returns how many caches were
/// actually populated.
pub(crate) fn invalidate_from(cells: &mut CellTable, start: Position) -> usize {
    let mut visited = HashSet::new();
    let mut to_process = vec![start];
    let mut cleared = 0;

    while let Some(pos) = to_process.pop() {
        if !visited.insert(pos) {
            continue;
        }
        let Some(cell) = cells.get_mut(&pos) else {
            continue;
        };
        if cell.invalidate() {
            cleared += 1;
        }
        to_process.extend(cell.dependents.iter().copied());
    }

    cleared
}

/// Check edge symmetry and acyclicity. Returns a description of the first
/// violation found.
pub(crate) fn check_invariants(cells: &CellTable) -> Result<(), String> {
    for (&pos, cell) in cells {
        let expected: Vec<Position> = {
            let mut refs = cell.referenced_cells().to_vec();
            refs.sort();
            refs
        };
        let actual: Vec<Position> = cell.depends_on().collect();
        if expected != actual {
            return Err(format!("{pos}: depends_on {actual:?} does not mirror references {expected:?}"));
        }

        for dep in cell.depends_on() {
            match cells.get(&dep) {
                Some(target) if target.dependents.contains(&pos) => {}
                _ => return Err(format!("missing back-edge: {dep} should list {pos} as a dependent")),
            }
        }
        for dependent in cell.dependents() {
            match cells.get(&dependent) {
                Some(source) if source.depends_on.contains(&pos) => {}
                _ => return Err(format!("stale back-edge: {dependent} listed as dependent of {pos}")),
            }
        }
    }

    for &pos in cells.keys() {
        let refs: Vec<Position> = cells[&pos].depends_on().collect();
        if let Some(path) = find_cycle(cells, pos, &refs) {
            return Err(format!("cycle through {path:?}"));
        }
    }

    Ok(())
}
