//! Named themes and custom palettes for diagram node styling.
//!
//! A palette maps each node type to a `{fill, stroke, color}` triple.
//! Themes are static data; a custom palette is built by overriding
//! entries against a base theme, with hex validation on every override.

use serde::{Deserialize, Serialize};

use crate::errors::{PutError, Result};

/// Style triple for one node type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub fill: String,
    pub stroke: String,
    pub color: String,
}

impl NodeStyle {
    fn new(fill: &str, stroke: &str, color: &str) -> Self {
        NodeStyle {
            fill: fill.to_string(),
            stroke: stroke.to_string(),
            color: color.to_string(),
        }
    }
}

/// Per-node-type styles used by the renderer's `classDef` statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub input: NodeStyle,
    pub process: NodeStyle,
    pub output: NodeStyle,
    pub decision: NodeStyle,
    pub start: NodeStyle,
    pub end: NodeStyle,
    pub artifact: NodeStyle,
}

/// The named themes the renderer ships with.
pub const THEME_NAMES: &[&str] = &[
    "light", "dark", "auto", "github", "minimal", "viridis", "magma", "plasma", "cividis",
];

impl Default for Palette {
    /// The `light` theme.
    fn default() -> Self {
        Palette {
            input: NodeStyle::new("#e1f5fe", "#0288d1", "#01579b"),
            process: NodeStyle::new("#f3e5f5", "#7b1fa2", "#4a148c"),
            output: NodeStyle::new("#e8f5e9", "#388e3c", "#1b5e20"),
            decision: NodeStyle::new("#fff3e0", "#f57c00", "#e65100"),
            start: NodeStyle::new("#c8e6c9", "#2e7d32", "#1b5e20"),
            end: NodeStyle::new("#ffcdd2", "#c62828", "#b71c1c"),
            artifact: NodeStyle::new("#eceff1", "#607d8b", "#37474f"),
        }
    }
}

impl Palette {
    /// Returns the palette for a named theme, `None` when unknown.
    pub fn named(theme: &str) -> Option<Palette> {
        let p = match theme {
            "light" | "auto" => Palette::default(),
            "dark" => Palette {
                input: NodeStyle::new("#1a3a4a", "#4fc3f7", "#e1f5fe"),
                process: NodeStyle::new("#3a1a4a", "#ce93d8", "#f3e5f5"),
                output: NodeStyle::new("#1a4a2a", "#81c784", "#e8f5e9"),
                decision: NodeStyle::new("#4a3a1a", "#ffb74d", "#fff3e0"),
                start: NodeStyle::new("#1b3a1b", "#66bb6a", "#e8f5e9"),
                end: NodeStyle::new("#4a1a1a", "#e57373", "#ffebee"),
                artifact: NodeStyle::new("#263238", "#90a4ae", "#eceff1"),
            },
            "github" => Palette {
                input: NodeStyle::new("#ddf4ff", "#0969da", "#0a3069"),
                process: NodeStyle::new("#fbefff", "#8250df", "#3e1f79"),
                output: NodeStyle::new("#dafbe1", "#1a7f37", "#116329"),
                decision: NodeStyle::new("#fff8c5", "#9a6700", "#4d2d00"),
                start: NodeStyle::new("#dafbe1", "#2da44e", "#116329"),
                end: NodeStyle::new("#ffebe9", "#cf222e", "#82071e"),
                artifact: NodeStyle::new("#f6f8fa", "#57606a", "#24292f"),
            },
            "minimal" => Palette {
                input: NodeStyle::new("#ffffff", "#999999", "#333333"),
                process: NodeStyle::new("#f5f5f5", "#999999", "#333333"),
                output: NodeStyle::new("#ffffff", "#666666", "#333333"),
                decision: NodeStyle::new("#f5f5f5", "#666666", "#333333"),
                start: NodeStyle::new("#eeeeee", "#444444", "#111111"),
                end: NodeStyle::new("#eeeeee", "#444444", "#111111"),
                artifact: NodeStyle::new("#fafafa", "#bbbbbb", "#555555"),
            },
            "viridis" => Palette {
                input: NodeStyle::new("#440154", "#440154", "#ffffff"),
                process: NodeStyle::new("#31688e", "#31688e", "#ffffff"),
                output: NodeStyle::new("#35b779", "#35b779", "#000000"),
                decision: NodeStyle::new("#fde725", "#fde725", "#000000"),
                start: NodeStyle::new("#482878", "#482878", "#ffffff"),
                end: NodeStyle::new("#21918c", "#21918c", "#ffffff"),
                artifact: NodeStyle::new("#3e4989", "#3e4989", "#ffffff"),
            },
            "magma" => Palette {
                input: NodeStyle::new("#000004", "#000004", "#ffffff"),
                process: NodeStyle::new("#721f81", "#721f81", "#ffffff"),
                output: NodeStyle::new("#f1605d", "#f1605d", "#000000"),
                decision: NodeStyle::new("#fcfdbf", "#fcfdbf", "#000000"),
                start: NodeStyle::new("#2c115f", "#2c115f", "#ffffff"),
                end: NodeStyle::new("#b73779", "#b73779", "#ffffff"),
                artifact: NodeStyle::new("#51127c", "#51127c", "#ffffff"),
            },
            "plasma" => Palette {
                input: NodeStyle::new("#0d0887", "#0d0887", "#ffffff"),
                process: NodeStyle::new("#7e03a8", "#7e03a8", "#ffffff"),
                output: NodeStyle::new("#cc4778", "#cc4778", "#ffffff"),
                decision: NodeStyle::new("#f89540", "#f89540", "#000000"),
                start: NodeStyle::new("#46039f", "#46039f", "#ffffff"),
                end: NodeStyle::new("#f0f921", "#f0f921", "#000000"),
                artifact: NodeStyle::new("#9c179e", "#9c179e", "#ffffff"),
            },
            "cividis" => Palette {
                input: NodeStyle::new("#00204d", "#00204d", "#ffffff"),
                process: NodeStyle::new("#414d6b", "#414d6b", "#ffffff"),
                output: NodeStyle::new("#a69d75", "#a69d75", "#000000"),
                decision: NodeStyle::new("#ffea46", "#ffea46", "#000000"),
                start: NodeStyle::new("#31446b", "#31446b", "#ffffff"),
                end: NodeStyle::new("#7d7c78", "#7d7c78", "#ffffff"),
                artifact: NodeStyle::new("#575d6d", "#575d6d", "#ffffff"),
            },
            _ => return None,
        };
        Some(p)
    }

    /// Builds a custom palette by applying overrides on top of a base
    /// theme. Every overridden color must be a valid hex color.
    pub fn with_overrides(
        base_theme: &str,
        overrides: &[(String, NodeStyle)],
    ) -> Result<Palette> {
        let mut palette = Palette::named(base_theme).ok_or_else(|| PutError::InvalidOption {
            message: format!("unknown base theme '{}'", base_theme),
        })?;
        for (node_type, style) in overrides {
            for color in [&style.fill, &style.stroke, &style.color] {
                if !is_hex_color(color) {
                    return Err(PutError::InvalidOption {
                        message: format!(
                            "invalid hex color '{}' for node type '{}'",
                            color, node_type
                        ),
                    });
                }
            }
            let slot = match node_type.as_str() {
                "input" => &mut palette.input,
                "process" => &mut palette.process,
                "output" => &mut palette.output,
                "decision" => &mut palette.decision,
                "start" => &mut palette.start,
                "end" => &mut palette.end,
                "artifact" => &mut palette.artifact,
                other => {
                    return Err(PutError::InvalidOption {
                        message: format!("unknown node type '{}' in palette override", other),
                    })
                }
            };
            *slot = style.clone();
        }
        Ok(palette)
    }

    /// The style for a node type, falling back to the process style for
    /// unrecognized types.
    pub fn style_for(&self, node_type: &str) -> &NodeStyle {
        match node_type {
            "input" => &self.input,
            "process" => &self.process,
            "output" => &self.output,
            "decision" => &self.decision,
            "start" => &self.start,
            "end" => &self.end,
            "artifact" => &self.artifact,
            _ => &self.process,
        }
    }
}

/// Validates `#rgb` and `#rrggbb` hex colors.
pub fn is_hex_color(s: &str) -> bool {
    let Some(hex) = s.strip_prefix('#') else {
        return false;
    };
    (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_named_themes_resolve() {
        for theme in THEME_NAMES {
            assert!(Palette::named(theme).is_some(), "missing theme {}", theme);
        }
        assert!(Palette::named("neon").is_none());
    }

    #[test]
    fn hex_validation() {
        assert!(is_hex_color("#fff"));
        assert!(is_hex_color("#0288d1"));
        assert!(!is_hex_color("0288d1"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#gggggg"));
    }

    #[test]
    fn overrides_replace_one_slot() {
        let style = NodeStyle::new("#111", "#222", "#333");
        let palette =
            Palette::with_overrides("light", &[("input".to_string(), style.clone())]).unwrap();
        assert_eq!(palette.input, style);
        assert_eq!(palette.process, Palette::named("light").unwrap().process);
    }

    #[test]
    fn override_with_bad_hex_fails() {
        let style = NodeStyle::new("red", "#222", "#333");
        assert!(Palette::with_overrides("light", &[("input".to_string(), style)]).is_err());
    }
}
