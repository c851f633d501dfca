//! Stacking-priority issuer shared by every window in a desktop session.

/// Hands out strictly increasing z-order values. A value is never issued twice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZOrderAuthority {
    next: u64,
}

impl Default for ZOrderAuthority {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

impl ZOrderAuthority {
    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Issues the next stacking value.
    pub fn next(&mut self) -> u64 {
        let value = self.next;
        self.next = self.next.saturating_add(1);
        value
    }

    /// The value the next call to [`ZOrderAuthority::next`] will return.
    pub fn peek(&self) -> u64 {
        self.next
    }
}
