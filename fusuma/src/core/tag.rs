/// Upper bound on configured tags: one bit each in a `u32`.
pub const MAX_TAGS: usize = 32;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagMask(u32);

impl TagMask {
    /// Mask for tag number `n` (1-32).
    pub fn new(n: u32) -> Self {
        assert!(n > 0 && n <= MAX_TAGS as u32);
        Self(1 << (n - 1))
    }

    pub fn from_mask(mask: u32) -> Self {
        Self(mask)
    }

    /// Mask with the lowest `count` bits set.
    pub fn all(count: usize) -> Self {
        if count >= MAX_TAGS {
            Self(u32::MAX)
        } else {
            Self((1u32 << count) - 1)
        }
    }

    pub fn mask(self) -> u32 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn intersects(self, other: TagMask) -> bool {
        (self.0 & other.0) != 0
    }

    pub fn intersection(self, other: TagMask) -> Self {
        Self(self.0 & other.0)
    }

    pub fn toggle(self, other: TagMask) -> Self {
        Self(self.0 ^ other.0)
    }
}

impl std::fmt::Display for TagMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}
