/// Evaluates `$block` and logs how long it took, measured on the wall clock.
///
/// Only wraps whole planning phases; the simulated service clock is unaffected.
#[macro_export]
macro_rules! log_elapsed {
    ($phase:literal, $block:expr) => {{
        let started_at = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(started_at);

        tracing::debug!(phase = $phase, ?elapsed, "phase finished");

        result
    }};
}
