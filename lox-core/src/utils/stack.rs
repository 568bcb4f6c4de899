/// Runs `f`, first growing the native stack when fewer than `RED_ZONE` bytes remain.
///
/// Parsing, analysis and evaluation each recurse once per nested expression
/// or statement, so a deep but legal program would otherwise overflow the
/// host stack before the call-depth limit is reached.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    const RED_ZONE: usize = 100 * 1024;
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
