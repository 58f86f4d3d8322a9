//! Page cursor for the forum's paginated listings
//!
//! Category and topic listings are addressed by a 1-based start index rather
//! than a page number. The cursor starts at 1, moves forward by the number of
//! items each page actually returned, and stops once it passes the total the
//! forum reported for the collection.

/// Position in a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    next: usize,
    total: usize,
    fetched: usize,
    exhausted: bool,
}

impl PageCursor {
    /// Create a cursor for a collection of `total` items
    pub fn new(total: usize) -> Self {
        Self {
            next: 1,
            total,
            fetched: 0,
            exhausted: false,
        }
    }

    /// Start index of the next page to request, or `None` once the listing is done
    pub fn next_start(&self) -> Option<usize> {
        if self.exhausted || self.next > self.total {
            None
        } else {
            Some(self.next)
        }
    }

    /// Record a page of `count` items.
    ///
    /// An empty page ends the listing even if fewer than `total` items were
    /// seen; the remote has nothing more to give at this offset.
    pub fn advance(&mut self, count: usize) {
        if count == 0 {
            self.exhausted = true;
            return;
        }

        self.next += count;
        self.fetched += count;
    }

    pub fn fetched(&self) -> usize {
        self.fetched
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Integer completion percentage, capped at 100
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        (100 * self.fetched / self.total).min(100)
    }
}
