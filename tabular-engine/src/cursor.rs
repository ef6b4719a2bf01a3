//! FILENAME: tabular-engine/src/cursor.rs
//! PURPOSE: The scrollable row pointer.
//! CONTEXT: Positions are 1-based over `n` rows. `0` means before-first and
//! `n + 1` means after-last. The cursor does not own the rows; every move
//! takes the current row count so it can never drift out of range.

/// Row pointer with two out-of-range sentinel states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    position: usize,
}

impl Cursor {
    /// Current position (0 = before-first, n + 1 = after-last).
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// True when the cursor points at a row.
    #[inline]
    pub fn is_on_row(&self, count: usize) -> bool {
        self.position >= 1 && self.position <= count
    }

    pub fn before_first(&mut self) {
        self.position = 0;
    }

    pub fn after_last(&mut self, count: usize) {
        self.position = count + 1;
    }

    pub fn first(&mut self, count: usize) -> bool {
        self.position = 1;
        count > 0
    }

    pub fn last(&mut self, count: usize) -> bool {
        self.position = count;
        self.position > 0
    }

    pub fn next(&mut self, count: usize) -> bool {
        if self.position <= count {
            self.position += 1;
        }
        self.position <= count
    }

    pub fn previous(&mut self, count: usize) -> bool {
        if self.position >= 1 {
            self.position -= 1;
        }
        self.position >= 1 && count > 0
    }

    /// Moves to `row`. Negative rows count back from the end
    /// (`-1` is the last row). Out-of-range targets park the cursor on the
    /// nearest sentinel and return false.
    pub fn absolute(&mut self, row: i64, count: usize) -> bool {
        let n = count as i64;
        let row = if row < 0 { row + n + 1 } else { row };

        if row < 1 {
            self.position = 0;
            false
        } else if row > n {
            self.position = count + 1;
            false
        } else {
            self.position = row as usize;
            true
        }
    }

    pub fn relative(&mut self, delta: i64, count: usize) -> bool {
        let target = (self.position as i64).saturating_add(delta);
        self.absolute(target, count)
    }

    pub fn is_before_first(&self) -> bool {
        self.position < 1
    }

    pub fn is_after_last(&self, count: usize) -> bool {
        self.position > count
    }

    pub fn is_first(&self, count: usize) -> bool {
        self.position == 1 && count > 0
    }

    pub fn is_last(&self, count: usize) -> bool {
        self.position == count && self.position > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_then_position() {
        let n = 5;
        for row in 1..=n {
            let mut cursor = Cursor::default();
            assert!(cursor.absolute(row as i64, n));
            assert_eq!(cursor.position(), row);
        }
    }

    #[test]
    fn test_next_sticks_after_last() {
        let mut cursor = Cursor::default();
        cursor.after_last(3);
        assert!(!cursor.next(3));
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_previous_sticks_before_first() {
        let mut cursor = Cursor::default();
        assert!(!cursor.previous(3));
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_negative_absolute_counts_from_end() {
        let mut a = Cursor::default();
        let mut b = Cursor::default();
        assert_eq!(a.absolute(-1, 4), b.last(4));
        assert_eq!(a, b);

        assert!(a.absolute(-4, 4));
        assert_eq!(a.position(), 1);
        assert!(!a.absolute(-5, 4));
        assert!(a.is_before_first());
    }

    #[test]
    fn test_absolute_out_of_range_parks_on_sentinels() {
        let mut cursor = Cursor::default();
        assert!(!cursor.absolute(0, 3));
        assert_eq!(cursor.position(), 0);
        assert!(!cursor.absolute(9, 3));
        assert_eq!(cursor.position(), 4);
        assert!(cursor.is_after_last(3));
    }

    #[test]
    fn test_relative() {
        let mut cursor = Cursor::default();
        assert!(cursor.relative(2, 3));
        assert_eq!(cursor.position(), 2);
        // 2 - 5 = -3, which counts back from the end to row 1.
        assert!(cursor.relative(-5, 3));
        assert_eq!(cursor.position(), 1);
        assert!(cursor.relative(1, 3));
        // 2 - 6 = -4 lands before the first row.
        assert!(!cursor.relative(-6, 3));
        assert_eq!(cursor.position(), 0);
        assert!(cursor.is_before_first());
        assert!(!cursor.relative(10, 3));
        assert_eq!(cursor.position(), 4);
    }

    #[test]
    fn test_empty_set() {
        let mut cursor = Cursor::default();
        assert!(!cursor.first(0));
        assert!(!cursor.is_first(0));
        assert!(!cursor.last(0));
        assert!(!cursor.is_last(0));
        assert!(cursor.is_before_first());
        assert!(!cursor.next(0));
        assert_eq!(cursor.position(), 1);
        assert!(cursor.is_after_last(0));
    }

    #[test]
    fn test_first_last_flags() {
        let mut cursor = Cursor::default();
        cursor.first(2);
        assert!(cursor.is_first(2));
        assert!(!cursor.is_last(2));
        cursor.next(2);
        assert!(cursor.is_last(2));
    }
}
