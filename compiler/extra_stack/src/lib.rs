//! Stack growth for deeply nested source.
//!
//! Both the expression engine and the type checker recurse once per nesting
//! level (`[[[[…]]]]`, long `let` chains, nested formulas). Wrapping those
//! recursion points in [`ensure_sufficient_stack`] keeps pathological input
//! on the structured-error path instead of aborting the process.
//!
//! On native targets the guard grows the stack with `stacker`; on `wasm32`
//! it is a passthrough.

/// Remaining-stack threshold below which a new segment is allocated.
const RED_ZONE: usize = 128 * 1024;

/// Size of each freshly allocated stack segment.
const SEGMENT_SIZE: usize = 2 * 1024 * 1024;

/// Run `f`, first growing the stack if less than [`RED_ZONE`] bytes remain.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, SEGMENT_SIZE, f)
}

/// Passthrough on `wasm32`, where the host owns the stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests;
