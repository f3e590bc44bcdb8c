//! Ratchet for long stops.
//!
//! **Core rule:** the level may tighten (rise), never loosen, even when ATR
//! expands.

/// Stop level that only moves up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Ratchet {
    level: Option<f64>,
}

impl Ratchet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: f64) -> Self {
        Self { level: Some(level) }
    }

    /// Propose a new level and return the ratcheted one: `max(current, proposed)`.
    /// The first proposal initializes the level. NaN proposals are ignored.
    ///
    /// ```
    /// use rom150_core::risk::Ratchet;
    ///
    /// let mut r = Ratchet::with_level(95.0);
    /// assert_eq!(r.apply(100.0), 100.0);
    /// assert_eq!(r.apply(90.0), 100.0);
    /// ```
    pub fn apply(&mut self, proposed: f64) -> f64 {
        let next = match self.level {
            None => proposed,
            Some(current) if proposed.is_nan() => current,
            Some(current) => current.max(proposed),
        };
        self.level = Some(next);
        next
    }

    pub fn level(&self) -> Option<f64> {
        self.level
    }
}
