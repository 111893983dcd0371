//! Transformation descriptors for the hosted image service.
//!
//! A derived image is requested by chaining transformation components into the
//! delivery URL path. Each component is a comma-separated list of `key_value`
//! parameters; components are joined with `/`. The service applies them in
//! order, so the chain is an ordered list.

use std::fmt::Write;

/// How a layer is fitted into its target box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crop {
    /// Resize to exactly width x height, ignoring aspect ratio.
    Scale,
    /// Resize to fit inside width x height, keeping aspect ratio.
    Fit,
}

impl Crop {
    fn as_param(&self) -> &'static str {
        match self {
            Crop::Scale => "scale",
            Crop::Fit => "fit",
        }
    }
}

/// Anchor point for layer placement. `x`/`y` offsets are relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    NorthWest,
}

impl Gravity {
    fn as_param(&self) -> &'static str {
        match self {
            Gravity::NorthWest => "north_west",
        }
    }
}

/// Styling for a text overlay layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: u32,
    pub bold: bool,
    pub stroke: bool,
    pub letter_spacing: Option<u32>,
}

impl TextStyle {
    /// Style segment of the layer parameter, e.g.
    /// `Arial_36_bold_stroke_letter_spacing_2`.
    fn as_param(&self) -> String {
        let mut s = format!("{}_{}", self.font_family, self.font_size);
        if self.bold {
            s.push_str("_bold");
        }
        if self.stroke {
            s.push_str("_stroke");
        }
        if let Some(spacing) = self.letter_spacing {
            let _ = write!(s, "_letter_spacing_{}", spacing);
        }
        s
    }
}

/// What gets drawn on top of the base image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Another uploaded asset, referenced by public id.
    Image { public_id: String },
    /// A rendered text string.
    Text { style: TextStyle, text: String },
}

impl Overlay {
    /// The `l_` parameter. Folder separators in public ids become `:` and
    /// layer text is escaped so it cannot break the component grammar.
    fn as_param(&self) -> String {
        match self {
            Overlay::Image { public_id } => format!("l_{}", public_id.replace('/', ":")),
            Overlay::Text { style, text } => {
                format!("l_text:{}:{}", style.as_param(), escape_layer_text(text))
            }
        }
    }
}

/// One overlay operation in a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    pub overlay: Overlay,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<Crop>,
    pub gravity: Option<Gravity>,
    pub x: i32,
    pub y: i32,
    /// Border spec in the service's grammar, e.g. `5px_solid_black`.
    pub border: Option<String>,
    pub color: Option<String>,
}

impl Transformation {
    /// Serialize to a single URL component.
    ///
    /// Parameters are emitted in a fixed order (alphabetical by URL key, the
    /// order the official SDKs produce) so generated URLs are deterministic.
    pub fn to_component(&self) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(border) = &self.border {
            params.push(format!("bo_{}", border));
        }
        if let Some(crop) = &self.crop {
            params.push(format!("c_{}", crop.as_param()));
        }
        if let Some(color) = &self.color {
            params.push(format!("co_{}", color));
        }
        if let Some(gravity) = &self.gravity {
            params.push(format!("g_{}", gravity.as_param()));
        }
        if let Some(height) = self.height {
            params.push(format!("h_{}", height));
        }
        params.push(self.overlay.as_param());
        if let Some(width) = self.width {
            params.push(format!("w_{}", width));
        }
        params.push(format!("x_{}", self.x));
        params.push(format!("y_{}", self.y));
        params.join(",")
    }
}

/// An ordered chain of transformations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformationChain(Vec<Transformation>);

impl TransformationChain {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, transformation: Transformation) {
        self.0.push(transformation);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Transformation> {
        self.0.iter()
    }

    /// The URL path segment for the whole chain, components joined by `/`.
    pub fn to_url_path(&self) -> String {
        self.0
            .iter()
            .map(Transformation::to_component)
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl FromIterator<Transformation> for TransformationChain {
    fn from_iter<I: IntoIterator<Item = Transformation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Percent-escape text embedded in a layer parameter.
///
/// The component grammar reserves `,` (parameter separator) and `/` (component
/// separator), so those must be escaped along with anything outside the URL
/// unreserved set.
fn escape_layer_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                let _ = write!(out, "%{:02X}", byte);
            }
        }
    }
    out
}
