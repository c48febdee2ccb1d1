use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A source location: a byte span plus its line/column, scoped to one file.
/// Orders by file, then start offset, then end offset — the total order
/// issues use to pick their canonical location among a joined set.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub start: u32,
    pub end: u32,
    pub line: u32,
    pub col: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, start: u32, end: u32, line: u32, col: u32) -> Self {
        Self {
            file: file.into(),
            start,
            end,
            line,
            col,
        }
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file
            .cmp(&other.file)
            .then(self.start.cmp(&other.start))
            .then(self.end.cmp(&other.end))
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::Location;

    #[test]
    fn orders_by_file_then_start_then_end() {
        let a = Location::new("a.py", 10, 20, 1, 1);
        let b = Location::new("a.py", 5, 20, 1, 1);
        let c = Location::new("b.py", 0, 1, 1, 1);
        let mut locations = vec![a.clone(), b.clone(), c.clone()];
        locations.sort();
        assert_eq!(locations, vec![b, a, c]);
    }

    #[test]
    fn canonical_location_is_the_minimum_under_the_total_order() {
        let locations = vec![
            Location::new("a.py", 10, 20, 2, 1),
            Location::new("a.py", 4, 8, 1, 1),
        ];
        let canonical = locations.iter().min().unwrap();
        assert_eq!(canonical.start, 4);
    }
}
