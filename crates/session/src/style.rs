use serde::{Deserialize, Serialize};

/// Path style applied to rendered layers. Unset fields keep the renderer's
/// own defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeStyle {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f32>,
}

impl ShapeStyle {
    pub fn stroke(color: impl Into<String>) -> Self {
        Self {
            color: color.into(),
            fill: None,
            fill_color: None,
            fill_opacity: None,
        }
    }

    pub fn filled(mut self, fill_opacity: f32) -> Self {
        self.fill = Some(true);
        self.fill_opacity = Some(fill_opacity);
        self
    }

    pub fn fill_color(mut self, color: impl Into<String>) -> Self {
        self.fill_color = Some(color.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePalette {
    /// Drawn shape that covers a reference vertex.
    pub highlight: ShapeStyle,
    /// Drawn shape that covers none.
    pub default: ShapeStyle,
    pub ring: ShapeStyle,
    pub center: ShapeStyle,
}

impl StylePalette {
    pub fn for_selection(&self, selected: bool) -> &ShapeStyle {
        if selected {
            &self.highlight
        } else {
            &self.default
        }
    }
}

impl Default for StylePalette {
    fn default() -> Self {
        Self {
            highlight: ShapeStyle::stroke("#ff0000"),
            default: ShapeStyle::stroke("#3388ff"),
            ring: ShapeStyle::stroke("#800080").filled(0.2),
            center: ShapeStyle::stroke("red").fill_color("#f03").filled(0.5),
        }
    }
}
