//! Call depth accounting for method dispatch.
//!
//! Every invocation (constructors, methods, super-bound trampolines) enters a
//! frame. An optional limit turns runaway recursion into a `RangeError`.

use std::cell::Cell;

use crate::ds::error::ClassError;

/// Configuration for the call stack.
#[derive(Debug, Clone)]
pub struct CallStackConfig {
    /// Maximum nesting depth. None means unlimited.
    pub max_depth: Option<usize>,
}

impl CallStackConfig {
    /// Create a configuration with no depth limit.
    pub fn unlimited() -> Self {
        CallStackConfig { max_depth: None }
    }

    /// Create a configuration with a depth limit.
    pub fn with_limit(max_depth: usize) -> Self {
        CallStackConfig {
            max_depth: Some(max_depth),
        }
    }
}

impl Default for CallStackConfig {
    fn default() -> Self {
        Self::unlimited()
    }
}

#[derive(Debug)]
pub struct CallStack {
    config: CallStackConfig,
    depth: Cell<usize>,
}

impl CallStack {
    pub fn new(config: CallStackConfig) -> Self {
        CallStack {
            config,
            depth: Cell::new(0),
        }
    }

    /// Enter a frame. The frame is left when the returned guard drops.
    pub fn enter(&self) -> Result<CallFrame<'_>, ClassError> {
        let depth = self.depth.get();
        if let Some(max_depth) = self.config.max_depth {
            if depth >= max_depth {
                return Err(ClassError::RangeError(
                    "Maximum call stack size exceeded".to_string(),
                ));
            }
        }
        self.depth.set(depth + 1);
        Ok(CallFrame { stack: self })
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.config.max_depth
    }

    /// Remaining frames before the limit, if limited.
    pub fn remaining(&self) -> Option<usize> {
        self.config
            .max_depth
            .map(|max| max.saturating_sub(self.depth.get()))
    }
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new(CallStackConfig::default())
    }
}

pub struct CallFrame<'a> {
    stack: &'a CallStack,
}

impl Drop for CallFrame<'_> {
    fn drop(&mut self) {
        let depth = self.stack.depth.get();
        self.stack.depth.set(depth.saturating_sub(1));
    }
}
