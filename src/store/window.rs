//! Count and window normalization for LPOP/RPOP

use crate::error::StoreError;

/// Count argument of a pop command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountSpec {
    /// No count given, pops a single element
    #[default]
    One,
    /// Pop up to `n` elements
    Count(i64),
    /// Pop the `[start, end)` window, negative values count from the end
    Range(i64, i64),
}

impl CountSpec {
    /// Build a count spec from zero, one or two integer arguments
    pub fn from_args(args: &[i64]) -> Result<Self, StoreError> {
        match *args {
            [] => Ok(CountSpec::One),
            [n] => Ok(CountSpec::Count(n)),
            [start, end] => Ok(CountSpec::Range(start, end)),
            _ => Err(StoreError::InvalidArguments(format!(
                "expected at most 2 count arguments, got {}",
                args.len()
            ))),
        }
    }
}

/// Half-open index range selected for removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: usize,
    pub end: usize,
}

impl Window {
    /// Resolve `spec` against a list of `len` elements.
    ///
    /// Negative range bounds resolve to `len + value`, `start` is clamped to
    /// zero and `end` to `len`. Nothing clamps `start` down to `end`, so a
    /// reversed window is reported as `MalformedWindow`.
    pub fn resolve(spec: CountSpec, len: usize) -> Result<Self, StoreError> {
        let len = len as i64;
        let (start, end) = match spec {
            CountSpec::One => (0, len.min(1)),
            CountSpec::Count(n) => (0, n.min(len)),
            CountSpec::Range(start, end) => {
                let start = if start < 0 { len + start } else { start };
                let end = if end < 0 { len + end } else { end };
                (start.max(0), end.min(len))
            }
        };

        if start > end {
            return Err(StoreError::MalformedWindow { start, end });
        }

        Ok(Window {
            start: start as usize,
            end: end as usize,
        })
    }
}
