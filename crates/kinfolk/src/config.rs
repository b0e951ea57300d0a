//! Configuration types for Kinfolk chart layout and rendering.
//!
//! All types implement [`serde::Deserialize`] and fill every missing field
//! with its default, so a configuration file only needs the keys it changes.
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Node dimensions, spacing and placement order.
//! - [`StyleConfig`] - Colors used by the SVG renderer.
//!
//! # Example
//!
//! ```
//! # use kinfolk::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().node_width(), 150.0);
//! assert!(config.style().single_color().is_ok());
//! ```

use serde::Deserialize;

use kinfolk_core::{color::Color, geometry::Size};

use crate::layout::PlacementOrder;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Checks that dimensions are usable and every color parses.
    ///
    /// # Errors
    ///
    /// Returns a message naming the first offending setting.
    pub fn validate(&self) -> Result<(), String> {
        self.layout.validate()?;
        self.style.validate()
    }
}

/// Dimensions and spacing used by the layout engine.
///
/// Defaults: a 1340×600 canvas, 150×70 nodes, 200 between generations,
/// 30 between partners and 80 between families.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    canvas_width: f32,
    canvas_height: f32,
    node_width: f32,
    node_height: f32,
    generation_spacing: f32,
    couple_gap: f32,
    family_gap: f32,
    margin: f32,
    order: PlacementOrder,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1340.0,
            canvas_height: 600.0,
            node_width: 150.0,
            node_height: 70.0,
            generation_spacing: 200.0,
            couple_gap: 30.0,
            family_gap: 80.0,
            margin: 50.0,
            order: PlacementOrder::default(),
        }
    }
}

impl LayoutConfig {
    /// Width of the canvas the chart is centered in.
    pub fn canvas_width(&self) -> f32 {
        self.canvas_width
    }

    /// Minimum height of the rendered document.
    pub fn canvas_height(&self) -> f32 {
        self.canvas_height
    }

    pub fn node_width(&self) -> f32 {
        self.node_width
    }

    pub fn node_height(&self) -> f32 {
        self.node_height
    }

    /// Node width and height as a [`Size`].
    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    /// Vertical distance between two consecutive generations.
    pub fn generation_spacing(&self) -> f32 {
        self.generation_spacing
    }

    /// Horizontal gap between partners in a spouse chain.
    pub fn couple_gap(&self) -> f32 {
        self.couple_gap
    }

    /// Horizontal gap between unrelated groups in one generation.
    pub fn family_gap(&self) -> f32 {
        self.family_gap
    }

    /// Space kept around the chart in the rendered document.
    pub fn margin(&self) -> f32 {
        self.margin
    }

    pub fn order(&self) -> PlacementOrder {
        self.order
    }

    /// Returns a copy with a different canvas width.
    pub fn with_canvas_width(mut self, canvas_width: f32) -> Self {
        self.canvas_width = canvas_width;
        self
    }

    /// Returns a copy with a different placement order.
    pub fn with_order(mut self, order: PlacementOrder) -> Self {
        self.order = order;
        self
    }

    fn validate(&self) -> Result<(), String> {
        let positive = [
            ("canvas_width", self.canvas_width),
            ("node_width", self.node_width),
            ("node_height", self.node_height),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(format!("layout.{name} must be a positive number, got {value}"));
            }
        }

        let non_negative = [
            ("canvas_height", self.canvas_height),
            ("generation_spacing", self.generation_spacing),
            ("couple_gap", self.couple_gap),
            ("family_gap", self.family_gap),
            ("margin", self.margin),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(format!("layout.{name} must not be negative, got {value}"));
            }
        }
        Ok(())
    }
}

/// Colors used by the SVG renderer, as CSS color strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background_color: Option<String>,
    single_color: String,
    married_color: String,
    marriage_line_color: String,
    parent_child_line_color: String,
    text_color: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            single_color: "#2F80ED".to_string(),
            married_color: "#F5576C".to_string(),
            marriage_line_color: "#FF6B6B".to_string(),
            parent_child_line_color: "#4ECDC4".to_string(),
            text_color: "white".to_string(),
        }
    }
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if no color is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_deref()
            .map(|color| parse_color("background_color", color))
            .transpose()
    }

    /// Fill for people without a resolved spouse.
    pub fn single_color(&self) -> Result<Color, String> {
        parse_color("single_color", &self.single_color)
    }

    /// Fill for people with at least one resolved spouse.
    pub fn married_color(&self) -> Result<Color, String> {
        parse_color("married_color", &self.married_color)
    }

    pub fn marriage_line_color(&self) -> Result<Color, String> {
        parse_color("marriage_line_color", &self.marriage_line_color)
    }

    pub fn parent_child_line_color(&self) -> Result<Color, String> {
        parse_color("parent_child_line_color", &self.parent_child_line_color)
    }

    pub fn text_color(&self) -> Result<Color, String> {
        parse_color("text_color", &self.text_color)
    }

    fn validate(&self) -> Result<(), String> {
        self.background_color()?;
        self.single_color()?;
        self.married_color()?;
        self.marriage_line_color()?;
        self.parent_child_line_color()?;
        self.text_color()?;
        Ok(())
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, String> {
    Color::new(value).map_err(|err| format!("Invalid style.{key} in config: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_chart() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.canvas_width(), 1340.0);
        assert_eq!(layout.node_size(), Size::new(150.0, 70.0));
        assert_eq!(layout.generation_spacing(), 200.0);
        assert_eq!(layout.couple_gap(), 30.0);
        assert_eq!(layout.family_gap(), 80.0);
        assert_eq!(layout.order(), PlacementOrder::BottomUp);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r##"
            [layout]
            node_width = 120
            order = "top-down"

            [style]
            background_color = "#fafafa"
            "##,
        )
        .unwrap();

        assert_eq!(config.layout().node_width(), 120.0);
        assert_eq!(config.layout().node_height(), 70.0);
        assert_eq!(config.layout().order(), PlacementOrder::TopDown);
        assert!(config.style().background_color().unwrap().is_some());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_color_names_the_key() {
        let config: AppConfig = toml::from_str("[style]\nmarried_color = \"nope\"").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("style.married_color"), "{err}");
    }

    #[test]
    fn test_non_positive_node_width_is_rejected() {
        let config: AppConfig = toml::from_str("[layout]\nnode_width = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.contains("layout.node_width"), "{err}");
    }
}
