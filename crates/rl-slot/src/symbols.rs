//! Symbol definitions and the spin grid

use serde::{Deserialize, Serialize};

/// Number of reels (columns) on the base-game grid
pub const GRID_REELS: usize = 5;
/// Number of rows per reel
pub const GRID_ROWS: usize = 4;
/// Total slot count, shared by the base grid and the rush bell grid
pub const GRID_SLOTS: usize = GRID_REELS * GRID_ROWS;

/// Symbol kinds that can land in a grid slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Symbol {
    /// Blank position
    Empty = 0,
    /// Bell - five or more trigger rush mode
    Bell = 1,
    /// Crown - pays at four or more
    Crown = 2,
    /// Star - pays on a consecutive streak
    Star = 3,
    /// Heart - pays only on a full grid
    Heart = 4,
    /// Diamond - pays at two or more
    Diamond = 5,
}

impl Symbol {
    /// All symbol kinds in id order
    pub const ALL: [Symbol; 6] = [
        Symbol::Empty,
        Symbol::Bell,
        Symbol::Crown,
        Symbol::Star,
        Symbol::Heart,
        Symbol::Diamond,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            Symbol::Empty => "EMPTY",
            Symbol::Bell => "BELL",
            Symbol::Crown => "CROWN",
            Symbol::Star => "STAR",
            Symbol::Heart => "HEART",
            Symbol::Diamond => "DIAMOND",
        }
    }

    /// Numeric id (matches `repr(u8)`)
    pub fn id(&self) -> u8 {
        *self as u8
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::Empty
    }
}

/// One spin's 5×4 grid, stored reel-major as 20 ordered slots.
///
/// Slot order only matters for star-streak detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolGrid {
    slots: [Symbol; GRID_SLOTS],
}

impl SymbolGrid {
    /// Create a grid from a full slot array
    pub fn new(slots: [Symbol; GRID_SLOTS]) -> Self {
        Self { slots }
    }

    /// Grid with every slot set to `symbol`
    pub fn filled(symbol: Symbol) -> Self {
        Self {
            slots: [symbol; GRID_SLOTS],
        }
    }

    /// Build from a slice, padding missing slots with `Empty`.
    ///
    /// Returns `None` if the slice is longer than the grid.
    pub fn from_slice(symbols: &[Symbol]) -> Option<Self> {
        if symbols.len() > GRID_SLOTS {
            return None;
        }
        let mut slots = [Symbol::Empty; GRID_SLOTS];
        slots[..symbols.len()].copy_from_slice(symbols);
        Some(Self { slots })
    }

    /// Builder: set one slot (out-of-range positions are ignored)
    pub fn with(mut self, position: usize, symbol: Symbol) -> Self {
        if let Some(slot) = self.slots.get_mut(position) {
            *slot = symbol;
        }
        self
    }

    /// All slots in order
    pub fn slots(&self) -> &[Symbol] {
        &self.slots
    }

    /// Symbol at a slot position
    pub fn symbol_at(&self, position: usize) -> Option<Symbol> {
        self.slots.get(position).copied()
    }

    /// Symbol at (reel, row)
    pub fn symbol_at_cell(&self, reel: usize, row: usize) -> Option<Symbol> {
        if reel >= GRID_REELS || row >= GRID_ROWS {
            return None;
        }
        self.symbol_at(reel * GRID_ROWS + row)
    }

    /// Number of slots holding `symbol`
    pub fn count(&self, symbol: Symbol) -> usize {
        self.slots.iter().filter(|&&s| s == symbol).count()
    }

    /// Longest run of consecutive `symbol` slots
    pub fn longest_run(&self, symbol: Symbol) -> usize {
        let mut longest = 0;
        let mut current = 0;
        for &slot in &self.slots {
            if slot == symbol {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }
        longest
    }
}

impl Default for SymbolGrid {
    fn default() -> Self {
        Self::filled(Symbol::Empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_counts() {
        let grid = SymbolGrid::default()
            .with(0, Symbol::Bell)
            .with(7, Symbol::Bell)
            .with(19, Symbol::Crown);

        assert_eq!(grid.count(Symbol::Bell), 2);
        assert_eq!(grid.count(Symbol::Crown), 1);
        assert_eq!(grid.count(Symbol::Empty), 17);
    }

    #[test]
    fn test_longest_run() {
        let grid = SymbolGrid::from_slice(&[
            Symbol::Star,
            Symbol::Star,
            Symbol::Empty,
            Symbol::Star,
            Symbol::Star,
            Symbol::Star,
        ])
        .unwrap();

        assert_eq!(grid.longest_run(Symbol::Star), 3);
        assert_eq!(grid.longest_run(Symbol::Heart), 0);
    }

    #[test]
    fn test_from_slice_too_long() {
        let symbols = vec![Symbol::Heart; GRID_SLOTS + 1];
        assert!(SymbolGrid::from_slice(&symbols).is_none());
    }

    #[test]
    fn test_cell_addressing() {
        let grid = SymbolGrid::default().with(GRID_ROWS + 2, Symbol::Diamond);
        assert_eq!(grid.symbol_at_cell(1, 2), Some(Symbol::Diamond));
        assert_eq!(grid.symbol_at_cell(GRID_REELS, 0), None);
    }
}
