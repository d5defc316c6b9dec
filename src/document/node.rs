use crate::{
    assets::image_data::ImageData,
    foundation::core::{Point, Rect, Rgba8, Size},
};

/// Stable id of the flyer document root. Export looks the document up by this id.
pub const FLYER_ROOT_ID: &str = "flyer-content";

/// A rendered flyer: a retained visual tree in logical pixels.
///
/// Documents are plain values. Two renders of the same inputs compare equal, which is what the
/// snapshot tests rely on.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    /// Canvas size in logical pixels.
    pub size: Size,
    /// Root group; its id is [`FLYER_ROOT_ID`] for rendered flyers.
    pub root: Group,
}

/// An optionally named container; children paint in order.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    /// Lookup id, emitted as the SVG `id` attribute.
    pub id: Option<String>,
    /// Children, first painted first.
    pub children: Vec<Node>,
}

/// One paintable element of a [`Document`].
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    Group(Group),
    Rect(RectNode),
    Line(LineNode),
    Text(TextNode),
    Image(ImageNode),
}

/// Outline paint for rects and lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgba8,
    /// Line width in logical pixels.
    pub width: f64,
    /// Dash and gap length; solid when `None`.
    pub dash: Option<(f64, f64)>,
}

impl Stroke {
    pub fn solid(color: Rgba8, width: f64) -> Self {
        Self {
            color,
            width,
            dash: None,
        }
    }

    pub fn dashed(color: Rgba8, width: f64, dash: f64, gap: f64) -> Self {
        Self {
            color,
            width,
            dash: Some((dash, gap)),
        }
    }
}

/// A filled and/or stroked rounded rectangle.
///
/// `fill: None` means no paint (transparent), matching how an invalid CSS background
/// degrades.
#[derive(Clone, Debug, PartialEq)]
pub struct RectNode {
    pub id: Option<String>,
    pub rect: Rect,
    /// Corner radius; square corners at 0.
    pub radius: f64,
    pub fill: Option<Rgba8>,
    pub stroke: Option<Stroke>,
}

/// A straight stroked segment (divider rules).
#[derive(Clone, Debug, PartialEq)]
pub struct LineNode {
    pub from: Point,
    pub to: Point,
    pub stroke: Stroke,
}

/// Generic CSS font family; the rasterizer picks a matching system font.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontFamily {
    Serif,
    SansSerif,
    Monospace,
}

impl FontFamily {
    pub fn css_name(self) -> &'static str {
        match self {
            FontFamily::Serif => "serif",
            FontFamily::SansSerif => "sans-serif",
            FontFamily::Monospace => "monospace",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    /// Font size in logical pixels.
    pub size: f64,
    /// CSS weight, 100..=900.
    pub weight: u16,
    pub italic: bool,
}

/// Horizontal alignment of each line relative to `TextNode::origin.x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// One block of text, already broken into lines.
///
/// `fill: None` leaves the fill unset so the platform default text color applies.
#[derive(Clone, Debug, PartialEq)]
pub struct TextNode {
    pub id: Option<String>,
    /// Anchor x and first baseline y.
    pub origin: Point,
    pub anchor: TextAnchor,
    pub font: FontSpec,
    /// Baseline-to-baseline distance.
    pub line_height: f64,
    pub fill: Option<Rgba8>,
    /// Pre-wrapped lines, one `<tspan>` each.
    pub lines: Vec<String>,
}

impl TextNode {
    /// Lines joined back with single spaces.
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFit {
    /// Scale to fit inside the box, keeping aspect.
    Contain,
    /// Scale to cover the box, keeping aspect, cropping the overflow.
    Cover,
}

/// An embedded raster or SVG image placed in a box.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageNode {
    pub id: Option<String>,
    pub rect: Rect,
    /// 0.0..=1.0.
    pub opacity: f64,
    pub fit: ImageFit,
    pub data: ImageData,
}

impl Node {
    pub fn id(&self) -> Option<&str> {
        match self {
            Node::Group(g) => g.id.as_deref(),
            Node::Rect(r) => r.id.as_deref(),
            Node::Text(t) => t.id.as_deref(),
            Node::Image(i) => i.id.as_deref(),
            Node::Line(_) => None,
        }
    }
}

impl Group {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id,
            children: Vec::new(),
        }
    }

    /// Depth-first, pre-order walk over all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        for child in &self.children {
            visit(child);
            if let Node::Group(g) = child {
                g.walk(visit);
            }
        }
    }
}

impl Document {
    pub fn id(&self) -> Option<&str> {
        self.root.id.as_deref()
    }

    /// All nodes in paint order (depth-first, pre-order).
    pub fn nodes(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        self.root.walk(&mut |n| out.push(n));
        out
    }

    pub fn find(&self, id: &str) -> Option<&Node> {
        self.nodes().into_iter().find(|n| n.id() == Some(id))
    }

    pub fn find_text(&self, id: &str) -> Option<&TextNode> {
        match self.find(id)? {
            Node::Text(t) => Some(t),
            _ => None,
        }
    }

    /// Groups anywhere in the tree whose id starts with `prefix`, in paint order.
    pub fn groups_with_prefix(&self, prefix: &str) -> Vec<&Group> {
        self.nodes()
            .into_iter()
            .filter_map(|n| match n {
                Node::Group(g) if g.id.as_deref().is_some_and(|id| id.starts_with(prefix)) => {
                    Some(g)
                }
                _ => None,
            })
            .collect()
    }

    /// Every text node, in paint order.
    pub fn texts(&self) -> Vec<&TextNode> {
        self.nodes()
            .into_iter()
            .filter_map(|n| match n {
                Node::Text(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    /// Index of the node with `id` in paint order.
    pub fn paint_index(&self, id: &str) -> Option<usize> {
        self.nodes().iter().position(|n| n.id() == Some(id))
    }
}
