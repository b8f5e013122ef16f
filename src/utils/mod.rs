mod throttle;
mod time;

pub use throttle::*;
pub use time::*;

/// Clamp that tolerates an inverted range by preferring the lower bound
pub fn clamp_ms(value: Millis, min: Millis, max: Millis) -> Millis {
    value.min(max).max(min)
}
