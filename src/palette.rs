use glam::Vec3;

/// One selectable color in the customization panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub label: &'static str,
    pub rgb: u32,
}

/// The fixed palette offered by every part control, in display order.
pub const PALETTE: [Swatch; 9] = [
    Swatch { label: "Red", rgb: 0xbd4a3c },
    Swatch { label: "Green", rgb: 0x88d064 },
    Swatch { label: "Blue", rgb: 0x2d88c4 },
    Swatch { label: "Yellow", rgb: 0xd0c064 },
    Swatch { label: "Cyan", rgb: 0x8dd1cf },
    Swatch { label: "Magenta", rgb: 0xbe8dd1 },
    Swatch { label: "White", rgb: 0xffffff },
    Swatch { label: "Brown", rgb: 0x8b4513 },
    Swatch { label: "Black", rgb: 0x2d2d2d },
];

/// Index of the swatch every control displays before the user touches it.
pub const DEFAULT_SWATCH: usize = 6;

pub fn swatch_color(index: usize) -> Vec3 {
    hex_to_vec3(PALETTE[index].rgb)
}

pub fn swatch_labels() -> [&'static str; PALETTE.len()] {
    let mut labels = [""; PALETTE.len()];
    let mut i = 0;
    while i < PALETTE.len() {
        labels[i] = PALETTE[i].label;
        i += 1;
    }
    labels
}

pub fn hex_to_vec3(rgb: u32) -> Vec3 {
    let r = ((rgb >> 16) & 0xff) as f32;
    let g = ((rgb >> 8) & 0xff) as f32;
    let b = (rgb & 0xff) as f32;
    Vec3::new(r, g, b) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_nine_entries_in_order() {
        let labels: Vec<&str> = PALETTE.iter().map(|s| s.label).collect();
        assert_eq!(
            labels,
            vec!["Red", "Green", "Blue", "Yellow", "Cyan", "Magenta", "White", "Brown", "Black"]
        );
    }

    #[test]
    fn default_swatch_is_white() {
        assert_eq!(PALETTE[DEFAULT_SWATCH].label, "White");
        assert_eq!(PALETTE[DEFAULT_SWATCH].rgb, 0xffffff);
    }

    #[test]
    fn red_swatch_decodes_exactly() {
        assert_eq!(PALETTE[0].rgb, 0xbd4a3c);
        let red = swatch_color(0);
        assert!((red.x - 0xbd as f32 / 255.0).abs() < 1e-6);
        assert!((red.y - 0x4a as f32 / 255.0).abs() < 1e-6);
        assert!((red.z - 0x3c as f32 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn hex_decomposes_into_channels() {
        assert_eq!(hex_to_vec3(0xffffff), Vec3::ONE);
        assert_eq!(hex_to_vec3(0x000000), Vec3::ZERO);
        let brown = hex_to_vec3(0x8b4513);
        assert!((brown.x - 139.0 / 255.0).abs() < 1e-6);
        assert!((brown.y - 69.0 / 255.0).abs() < 1e-6);
        assert!((brown.z - 19.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn labels_match_palette_order() {
        let labels = swatch_labels();
        for (label, swatch) in labels.iter().zip(PALETTE.iter()) {
            assert_eq!(*label, swatch.label);
        }
    }
}
