/// Anchor colors of the jet-like scale, from dark blue through red to white.
const ANCHORS: [[u8; 3]; 10] = [
    [0, 0, 127],
    [0, 0, 255],
    [0, 127, 255],
    [0, 255, 255],
    [127, 255, 127],
    [255, 255, 0],
    [255, 127, 0],
    [255, 0, 0],
    [127, 0, 0],
    [255, 255, 255],
];

/// Entries interpolated between two neighbouring anchors.
const STEPS_PER_SEGMENT: usize = 25;

/// Lookup table from an 8-bit intensity to an RGB color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: [[u8; 3]; 256],
}

impl Default for Palette {
    fn default() -> Self {
        Self::jet()
    }
}

impl Palette {
    /// Linear blend between consecutive anchors; entries past the last
    /// segment stay white.
    pub fn jet() -> Self {
        let mut colors = [[255u8; 3]; 256];

        for (segment, pair) in ANCHORS.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            for step in 0..STEPS_PER_SEGMENT {
                let weight_to = step as f32 / STEPS_PER_SEGMENT as f32;
                let weight_from = 1.0 - weight_to;
                let entry = &mut colors[segment * STEPS_PER_SEGMENT + step];
                for channel in 0..3 {
                    entry[channel] = (from[channel] as f32 * weight_from
                        + to[channel] as f32 * weight_to) as u8;
                }
            }
        }

        Self { colors }
    }

    #[inline]
    pub fn color(&self, intensity: u8) -> [u8; 3] {
        self.colors[intensity as usize]
    }

    pub fn colors(&self) -> &[[u8; 3]; 256] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_land_on_segment_starts() {
        let palette = Palette::jet();
        assert_eq!(palette.colors().len(), 256);
        for (segment, anchor) in ANCHORS.iter().take(9).enumerate() {
            assert_eq!(&palette.color((segment * STEPS_PER_SEGMENT) as u8), anchor);
        }
    }

    #[test]
    fn interpolates_between_anchors() {
        let palette = Palette::jet();
        // halfway-ish between (0, 0, 127) and (0, 0, 255)
        let [r, g, b] = palette.color(12);
        assert_eq!((r, g), (0, 0));
        assert!(b > 127 && b < 255);
    }

    #[test]
    fn tail_is_white() {
        let palette = Palette::jet();
        assert_eq!(palette.color(225), [255, 255, 255]);
        assert_eq!(palette.color(255), [255, 255, 255]);
    }
}
