use super::ensure_sufficient_stack;

fn nesting_depth(n: u32) -> u32 {
    ensure_sufficient_stack(|| if n == 0 { 0 } else { nesting_depth(n - 1) + 1 })
}

#[test]
fn shallow_nesting() {
    assert_eq!(nesting_depth(16), 16);
}

#[test]
fn deep_nesting_does_not_overflow() {
    assert_eq!(nesting_depth(200_000), 200_000);
}

#[test]
fn propagates_results() {
    let result: Result<&str, String> = ensure_sufficient_stack(|| Err("bad".to_string()));
    assert_eq!(result, Err("bad".to_string()));
}
