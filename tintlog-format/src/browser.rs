//! CSS console formatter. Fragments are wrapped in `%c` directives and
//! plain fields go into a collapsed group under the line.

use tintlog_core::Rgb;

use crate::formatter::{FieldLayout, Formatter, Weight};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserFormatter;

impl BrowserFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Formatter for BrowserFormatter {
    fn directive(&self) -> &'static str {
        "%c"
    }

    fn use_colors(&self) -> bool {
        true
    }

    fn style(&self, color: Option<Rgb>, weight: Option<Weight>) -> String {
        let mut css = String::new();
        if let Some(color) = color {
            css.push_str(&format!("color: {};", color));
        }
        if let Some(weight) = weight {
            css.push_str(&format!("font-weight: {};", weight.as_str()));
        }
        css
    }

    fn reset(&self) -> String {
        "color: inherit;font-weight: normal;".to_string()
    }

    fn field_layout(&self) -> FieldLayout {
        FieldLayout::Grouped
    }
}
