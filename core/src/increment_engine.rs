// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Stored values keep three decimal places
pub const DECIMAL_SCALE: f64 = 1000.0;

/// Adds `delta` to `current` and truncates toward zero to three decimals.
///
/// Truncation, not rounding: `1.23999` is stored as `1.239` and `-1.23999`
/// as `-1.239`. Callers rely on this, so it must not be "fixed".
pub fn increment(current: f64, delta: f64) -> f64 {
    ((current + delta) * DECIMAL_SCALE).trunc() / DECIMAL_SCALE
}
