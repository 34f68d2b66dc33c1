/// Evaluates `$block`, logs how long it took at debug level and returns
/// `(result, elapsed)`.
#[macro_export]
macro_rules! timer_debug {
    ($msg:literal,$block:expr) => {{
        let now = jiff::Timestamp::now();
        let result = $block;
        let elapsed = jiff::Timestamp::now().duration_since(now);

        tracing::debug!("{}: Took {:?}", $msg, elapsed);

        (result, elapsed)
    }};
}
