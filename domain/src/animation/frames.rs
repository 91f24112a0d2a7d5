//! Finite frame sequence for animated export

use crate::animation::clock::{CYCLE_LEN, color_at};
use crate::core::color::Rgb;

/// One export frame: the tick position and its resolved shadow color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationFrame {
    pub tick: u64,
    pub shadow: Rgb,
}

/// Materialize one full cycle of shadow colors.
///
/// A pure function of the base color: calling it twice with the same input
/// yields identical sequences. Always exactly [`CYCLE_LEN`] frames; the
/// first and last share the base color, so a looped export joins cleanly.
pub fn export_frames(shadow_base: Rgb) -> Vec<AnimationFrame> {
    (0..CYCLE_LEN)
        .map(|tick| AnimationFrame {
            tick,
            shadow: color_at(shadow_base, tick),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_cycle() {
        let frames = export_frames(Rgb::from_hex("#1E40AF").unwrap());
        assert_eq!(frames.len(), CYCLE_LEN as usize);
    }

    #[test]
    fn first_and_last_frames_share_base_color() {
        let base = Rgb::from_hex("#1E40AF").unwrap();
        let frames = export_frames(base);
        assert_eq!(frames[0].shadow, base);
        assert_eq!(frames[3].shadow, base);
        assert_ne!(frames[1].shadow, frames[2].shadow);
    }

    #[test]
    fn deterministic_across_calls() {
        let base = Rgb::new(59, 130, 246);
        assert_eq!(export_frames(base), export_frames(base));
    }

    #[test]
    fn frames_match_live_clock() {
        let base = Rgb::new(30, 64, 175);
        for frame in export_frames(base) {
            assert_eq!(frame.shadow, color_at(base, frame.tick));
        }
    }
}
