//! Recursion limits for parsing and evaluation.
//!
//! Both the grammar engine and the evaluator recurse on the host stack, so a
//! deeply nested program or a deep Stone recursion would otherwise exhaust it.
//! Each keeps a per-thread depth counter and fails with an error once the
//! limit is reached.

use std::cell::Cell;
use std::thread::LocalKey;

/// Deepest nesting of grammar rules one parse may reach. Every level of
/// parentheses costs several rules.
pub const MAX_PARSE_DEPTH: usize = 1500;

/// Deepest nesting of node evaluations. Every Stone call costs several
/// levels: the call itself, the body block and the statements inside it.
pub const MAX_EVAL_DEPTH: usize = 3000;

thread_local! {
    pub(crate) static PARSE_DEPTH: Cell<usize> = const { Cell::new(0) };
    pub(crate) static EVAL_DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// One level of a depth counter, released on drop.
pub(crate) struct DepthGuard {
    counter: &'static LocalKey<Cell<usize>>,
}

impl DepthGuard {
    /// Enters a level, or returns `None` if `max` levels are already held.
    pub(crate) fn enter(counter: &'static LocalKey<Cell<usize>>, max: usize) -> Option<Self> {
        let depth = counter.with(Cell::get);
        if depth >= max {
            return None;
        }
        counter.with(|c| c.set(depth + 1));
        Some(DepthGuard { counter })
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        self.counter.with(|c| c.set(c.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    thread_local! {
        static COUNTER: Cell<usize> = const { Cell::new(0) };
    }

    #[test]
    fn test_guard_releases_on_drop() {
        let outer = DepthGuard::enter(&COUNTER, 2);
        assert!(outer.is_some());
        {
            let inner = DepthGuard::enter(&COUNTER, 2);
            assert!(inner.is_some());
            assert!(DepthGuard::enter(&COUNTER, 2).is_none());
        }
        assert_eq!(COUNTER.with(Cell::get), 1);
        drop(outer);
        assert_eq!(COUNTER.with(Cell::get), 0);
    }
}
