//! Perceptual brightness curve
//!
//! Eyes perceive brightness non-linearly, so equal steps in duty cycle do not
//! look like equal steps in brightness. A quadratic curve is close enough to
//! make level changes feel linear while staying in integer math.

use crate::state::MAX_LEVEL;

/// Map a brightness level (0-100) to a duty value in `0..=max_duty`
///
/// `duty = max_duty * (level / 100)^2`. Levels above 100 are clamped.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub const fn level_to_duty(level: u8, max_duty: u16) -> u16 {
    let level = if level > MAX_LEVEL { MAX_LEVEL as u32 } else { level as u32 };
    let max_level = MAX_LEVEL as u32;
    // max_duty * level^2 stays far below u32::MAX (65535 * 10_000)
    ((max_duty as u32 * level * level) / (max_level * max_level)) as u16
}

/// Inverse of [`level_to_duty`], rounded to the nearest level
///
/// Used to recover the level a register was left at.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn duty_to_level(duty: u16, max_duty: u16) -> u8 {
    if max_duty == 0 || duty == 0 {
        return 0;
    }
    if duty >= max_duty {
        return MAX_LEVEL;
    }
    let ratio = f32::from(duty) / f32::from(max_duty);
    let level = libm::roundf(libm::sqrtf(ratio) * f32::from(MAX_LEVEL));
    (level as u8).min(MAX_LEVEL)
}
