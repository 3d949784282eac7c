//! The level curve: cumulative XP thresholds for levels 1 through 99.
//!
//! # Formula
//!
//! For each level `n` a running sum accumulates `floor(n + 300 * 2^(n/7))`.
//! The threshold *output* after level `n` is `floor(sum / 4)`.
//!
//! - [`xp_for_level`]`(L)` returns the output computed after level `L - 1`
//!   (one step behind the accumulation), so level 1 needs 0 XP and level 2
//!   needs 83 XP.
//! - [`level_for_xp`]`(xp)` returns the first level `n` whose output
//!   satisfies `output - 1 >= xp`, or [`MAX_LEVEL`] if none does.
//!
//! The two functions are exact inverses on the thresholds:
//! `level_for_xp(xp_for_level(L)) == L` for every `L` in `1..=99`.
//!
//! The floating-point part of the formula is evaluated once into a static
//! table; every lookup afterwards is integer or [`Decimal`] arithmetic.

use std::sync::LazyLock;

use rust_decimal::Decimal;

/// Highest attainable level.
pub const MAX_LEVEL: u32 = 99;

/// Lowest level; every skill starts here.
pub const MIN_LEVEL: u32 = 1;

/// Number of entries in the output table.
const TABLE_LEN: usize = 99;

/// `OUTPUTS[n - 1]` is `floor(sum / 4)` after accumulating levels `1..=n`.
static OUTPUTS: LazyLock<[u64; TABLE_LEN]> = LazyLock::new(build_outputs);

/// Evaluate the accumulation for levels 1 through 99.
// The per-level step is a small positive float (< 4.5e6); truncation to
// u64 after `floor` is exact. The multiply and add stay separate (no fused
// multiply-add) so the rounding of every step matches the published table.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::suboptimal_flops
)]
fn build_outputs() -> [u64; TABLE_LEN] {
    let mut outputs = [0_u64; TABLE_LEN];
    let mut points: u64 = 0;
    for (lvl, slot) in (1_u32..).zip(outputs.iter_mut()) {
        let level = f64::from(lvl);
        let step = (level + 300.0 * 2.0_f64.powf(level / 7.0)).floor() as u64;
        points = points.saturating_add(step);
        *slot = points.checked_div(4).unwrap_or(0);
    }
    outputs
}

/// Cumulative XP required to reach `level`.
///
/// Level 1 (and 0) needs 0 XP. Levels above 100 clamp to the last table
/// entry, which is the figure shown as "next level" for a level 99 skill.
pub fn xp_for_level(level: u32) -> u64 {
    if level <= MIN_LEVEL {
        return 0;
    }
    let idx = usize::try_from(level.saturating_sub(2)).unwrap_or(TABLE_LEN);
    OUTPUTS
        .get(idx.min(TABLE_LEN.saturating_sub(1)))
        .copied()
        .unwrap_or(0)
}

/// Level reached with `xp` cumulative experience.
///
/// Total over `xp >= 0`: negative input is treated as zero XP and returns
/// level 1; anything at or beyond the level 99 threshold returns 99.
pub fn level_for_xp(xp: Decimal) -> u32 {
    for (lvl, output) in (MIN_LEVEL..=MAX_LEVEL).zip(OUTPUTS.iter()) {
        if Decimal::from(output.saturating_sub(1)) >= xp {
            return lvl;
        }
    }
    MAX_LEVEL
}

/// Progress towards the next level as a percentage of the next threshold.
///
/// Mirrors the skill panel: cumulative `xp` divided by the cumulative XP of
/// `level + 1`, times 100. Returns `None` at [`MAX_LEVEL`].
pub fn progress_percent(level: u32, xp: Decimal) -> Option<Decimal> {
    if level >= MAX_LEVEL {
        return None;
    }
    let next = Decimal::from(xp_for_level(level.saturating_add(1)));
    if next <= Decimal::ZERO {
        return Some(Decimal::ONE_HUNDRED);
    }
    xp.checked_div(next)?.checked_mul(Decimal::ONE_HUNDRED)
}
