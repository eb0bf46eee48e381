//! Generation counters for discarding late async results.
//!
//! A controller captures a token when it issues a request and checks it
//! when the response lands. Any lifecycle boundary (camera stop, session
//! switch, new practice) advances the epoch and invalidates older tokens.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EpochToken(u64);

impl EpochToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct Epoch {
    current: u64,
}

impl Epoch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> EpochToken {
        EpochToken(self.current)
    }

    /// Invalidate every outstanding token and return the new current one.
    pub fn advance(&mut self) -> EpochToken {
        self.current = self.current.wrapping_add(1);
        self.token()
    }

    pub fn is_current(&self, token: EpochToken) -> bool {
        token.0 == self.current
    }
}
