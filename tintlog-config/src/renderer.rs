//! Renderer selection.

use serde::{Deserialize, Serialize};

/// Which formatter variant a logger renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Terminal when a process standard output exists, browser otherwise.
    #[default]
    Auto,
    /// ANSI colors, fields inline as one JSON object.
    Terminal,
    /// CSS directives, fields in a collapsed group.
    Browser,
}

impl RendererKind {
    /// Resolves `Auto` for the current target. The only environment branch.
    pub fn resolve(self) -> RendererKind {
        match self {
            RendererKind::Auto if cfg!(target_arch = "wasm32") => RendererKind::Browser,
            RendererKind::Auto => RendererKind::Terminal,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_kinds_resolve_to_themselves() {
        assert_eq!(RendererKind::Browser.resolve(), RendererKind::Browser);
        assert_eq!(RendererKind::Terminal.resolve(), RendererKind::Terminal);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn auto_is_terminal_with_a_process() {
        assert_eq!(RendererKind::Auto.resolve(), RendererKind::Terminal);
    }
}
