use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues,
/// starting in the blues so the usual two-outcome case lands on a
/// blue/green pair.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (200.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.60);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Outcome label → Color32
// ---------------------------------------------------------------------------

/// Fixed colour per outcome label, shared by the bar chart, the pie chart
/// and the distribution tables so one outcome always reads as one colour.
#[derive(Debug, Clone)]
pub struct OutcomeColors {
    mapping: BTreeMap<String, Color32>,
    fallback: Color32,
}

impl Default for OutcomeColors {
    fn default() -> Self {
        OutcomeColors {
            mapping: BTreeMap::new(),
            fallback: Color32::GRAY,
        }
    }
}

impl OutcomeColors {
    /// Assign palette colours to the given labels, in iteration order.
    pub fn new<I>(labels: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let labels: Vec<String> = labels.into_iter().collect();
        let palette = generate_palette(labels.len());
        OutcomeColors {
            mapping: labels.into_iter().zip(palette).collect(),
            fallback: Color32::GRAY,
        }
    }

    /// Colour for a label; grey for labels never seen at assignment time.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let colors = generate_palette(4);
        assert_eq!(colors.len(), 4);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_labels_fall_back_to_grey() {
        let colors = OutcomeColors::new(vec!["Sim".to_string(), "Não".to_string()]);
        assert_ne!(colors.color_for("Sim"), colors.color_for("Não"));
        assert_eq!(colors.color_for("talvez"), Color32::GRAY);
    }
}
