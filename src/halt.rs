//! Controller halt state

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared flag reporting whether the controller is halted
#[derive(Debug, Clone, Default)]
pub struct HaltFlag(Arc<AtomicBool>);

impl HaltFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_halted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, halted: bool) {
        self.0.store(halted, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let flag = HaltFlag::new();
        let other = flag.clone();
        assert!(!other.is_halted());
        flag.set(true);
        assert!(other.is_halted());
        other.set(false);
        assert!(!flag.is_halted());
    }
}
