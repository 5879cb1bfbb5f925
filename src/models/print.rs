use serde::{Deserialize, Serialize};

/// Print layout forwarded verbatim to the direct PDF service.
///
/// Dimensions and margins are in inches, as the service expects them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintSetup {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub landscape: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_header_footer: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub print_background: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paper_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_left: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_right: Option<f32>,
    /// e.g. "1-5, 8"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_ranges: Option<String>,
}

impl PrintSetup {
    pub fn builder() -> PrintSetupBuilder {
        PrintSetupBuilder::default()
    }
}

#[derive(Default)]
pub struct PrintSetupBuilder {
    setup: PrintSetup,
}

impl PrintSetupBuilder {
    pub fn landscape(mut self, landscape: bool) -> Self {
        self.setup.landscape = Some(landscape);
        self
    }

    pub fn display_header_footer(mut self, display: bool) -> Self {
        self.setup.display_header_footer = Some(display);
        self
    }

    pub fn print_background(mut self, print: bool) -> Self {
        self.setup.print_background = Some(print);
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.setup.scale = Some(scale);
        self
    }

    pub fn paper_size(mut self, width: f32, height: f32) -> Self {
        self.setup.paper_width = Some(width);
        self.setup.paper_height = Some(height);
        self
    }

    pub fn margins(mut self, top: f32, bottom: f32, left: f32, right: f32) -> Self {
        self.setup.margin_top = Some(top);
        self.setup.margin_bottom = Some(bottom);
        self.setup.margin_left = Some(left);
        self.setup.margin_right = Some(right);
        self
    }

    pub fn uniform_margin(self, size: f32) -> Self {
        self.margins(size, size, size, size)
    }

    pub fn page_ranges(mut self, ranges: impl Into<String>) -> Self {
        self.setup.page_ranges = Some(ranges.into());
        self
    }

    pub fn build(self) -> PrintSetup {
        self.setup
    }
}
