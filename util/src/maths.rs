//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::{Float, FloatConst};

pub fn clamp<T>(value: &T, min: &T, max: &T) -> T 
where
    T: Float
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
/// 
/// This function is taken from the std library as num is missing it.
///
/// In particular, the return value `r` satisfies `0.0 <= r < rhs.abs()` in
/// most cases. However, due to a floating point round-off error it can
/// result in `r == rhs.abs()`, violating the mathematical definition, if
/// `self` is much smaller than `rhs.abs()` in magnitude and `self < 0.0`.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float
{
    let r = lhs % rhs;
    if r < T::zero() { r + rhs.abs() } else { r }
}

/// Normalise an angle into the range (-pi, pi].
pub fn normalise_angle<T>(angle: T) -> T
where
    T: Float + FloatConst
{
    let pi_t = T::PI();
    let tau_t = pi_t + pi_t;

    // Map into [0, 2pi) first, then fold the upper half down
    let wrapped = rem_euclid(angle, tau_t);

    if wrapped > pi_t {
        wrapped - tau_t
    }
    else {
        wrapped
    }
}

/// Get the shortest signed angular distance to go from `from` to `to`.
///
/// The result is in the range (-pi, pi], positive meaning an anticlockwise rotation.
pub fn get_ang_dist<T>(from: T, to: T) -> T
where
    T: Float + FloatConst
{
    normalise_angle(to - from)
}

/// Integrate `f` between `lower` and `upper` using the trapezoidal rule.
///
/// The interval is split into whole steps as close to `step` as possible, so the upper bound is
/// always evaluated exactly. Returns zero for an empty or inverted interval, or a non-positive
/// step.
pub fn trapz_integrate<F>(f: F, lower: f64, upper: f64, step: f64) -> f64
where
    F: Fn(f64) -> f64
{
    if upper <= lower || step <= 0.0 {
        return 0.0;
    }

    let num_steps = ((upper - lower) / step).round().max(1.0) as usize;
    let h = (upper - lower) / num_steps as f64;

    let mut sum = 0.0;
    let mut last = f(lower);

    for i in 1..=num_steps {
        let current = f(lower + h * i as f64);
        sum += 0.5 * (last + current) * h;
        last = current;
    }

    sum
}
