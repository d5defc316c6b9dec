use std::fmt::Write as _;

use crate::{
    document::node::{
        Document, Group, ImageFit, ImageNode, LineNode, Node, RectNode, Stroke, TextAnchor,
        TextNode,
    },
    foundation::core::{Rect, Rgba8},
};

const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

impl Document {
    /// Serialize as a standalone SVG 1.1 document sized in logical pixels.
    pub fn to_svg(&self) -> String {
        let mut out = String::with_capacity(16 * 1024);
        let w = num(self.size.width);
        let h = num(self.size.height);
        let _ = write!(
            out,
            r#"<svg xmlns="{SVG_NS}" xmlns:xlink="{XLINK_NS}" version="1.1" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        );
        write_group(&mut out, &self.root);
        out.push_str("</svg>");
        out
    }

    /// Serialize as a nested `<svg>` placed at `dst` in a parent coordinate space.
    ///
    /// The nested viewport clips anything drawn past the document bounds.
    pub fn to_nested_svg(&self, dst: Rect) -> String {
        let mut out = String::with_capacity(16 * 1024);
        let _ = write!(
            out,
            r#"<svg x="{}" y="{}" width="{}" height="{}" viewBox="0 0 {} {}" preserveAspectRatio="xMidYMin meet">"#,
            num(dst.x0),
            num(dst.y0),
            num(dst.width()),
            num(dst.height()),
            num(self.size.width),
            num(self.size.height),
        );
        write_group(&mut out, &self.root);
        out.push_str("</svg>");
        out
    }
}

fn write_group(out: &mut String, g: &Group) {
    out.push_str("<g");
    write_id(out, g.id.as_deref());
    out.push('>');
    for child in &g.children {
        write_node(out, child);
    }
    out.push_str("</g>");
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Group(g) => write_group(out, g),
        Node::Rect(r) => write_rect(out, r),
        Node::Line(l) => write_line(out, l),
        Node::Text(t) => write_text(out, t),
        Node::Image(i) => write_image(out, i),
    }
}

fn write_rect(out: &mut String, r: &RectNode) {
    out.push_str("<rect");
    write_id(out, r.id.as_deref());
    let _ = write!(
        out,
        r#" x="{}" y="{}" width="{}" height="{}""#,
        num(r.rect.x0),
        num(r.rect.y0),
        num(r.rect.width()),
        num(r.rect.height())
    );
    if r.radius > 0.0 {
        let rr = num(r.radius);
        let _ = write!(out, r#" rx="{rr}" ry="{rr}""#);
    }
    match r.fill {
        Some(c) => write_paint(out, "fill", c),
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(s) = &r.stroke {
        write_stroke(out, s);
    }
    out.push_str("/>");
}

fn write_line(out: &mut String, l: &LineNode) {
    let _ = write!(
        out,
        r#"<line x1="{}" y1="{}" x2="{}" y2="{}""#,
        num(l.from.x),
        num(l.from.y),
        num(l.to.x),
        num(l.to.y)
    );
    write_stroke(out, &l.stroke);
    out.push_str("/>");
}

fn write_text(out: &mut String, t: &TextNode) {
    out.push_str("<text");
    write_id(out, t.id.as_deref());
    let anchor = match t.anchor {
        TextAnchor::Start => "start",
        TextAnchor::Middle => "middle",
        TextAnchor::End => "end",
    };
    let _ = write!(
        out,
        r#" x="{}" y="{}" text-anchor="{anchor}" font-family="{}" font-size="{}" font-weight="{}""#,
        num(t.origin.x),
        num(t.origin.y),
        t.font.family.css_name(),
        num(t.font.size),
        t.font.weight
    );
    if t.font.italic {
        out.push_str(r#" font-style="italic""#);
    }
    // No fill attribute at all when the theme color did not resolve.
    if let Some(c) = t.fill {
        write_paint(out, "fill", c);
    }
    out.push('>');
    for (i, line) in t.lines.iter().enumerate() {
        let dy = if i == 0 { 0.0 } else { t.line_height };
        let _ = write!(
            out,
            r#"<tspan x="{}" dy="{}">"#,
            num(t.origin.x),
            num(dy)
        );
        escape_into(out, line);
        out.push_str("</tspan>");
    }
    out.push_str("</text>");
}

fn write_image(out: &mut String, i: &ImageNode) {
    out.push_str("<image");
    write_id(out, i.id.as_deref());
    let par = match i.fit {
        ImageFit::Contain => "xMidYMid meet",
        ImageFit::Cover => "xMidYMid slice",
    };
    let _ = write!(
        out,
        r#" x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="{par}""#,
        num(i.rect.x0),
        num(i.rect.y0),
        num(i.rect.width()),
        num(i.rect.height())
    );
    if i.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, num(i.opacity));
    }
    out.push_str(r#" xlink:href=""#);
    escape_into(out, &i.data.to_data_url());
    out.push_str(r#""/>"#);
}

fn write_id(out: &mut String, id: Option<&str>) {
    if let Some(id) = id {
        out.push_str(r#" id=""#);
        escape_into(out, id);
        out.push('"');
    }
}

fn write_paint(out: &mut String, attr: &str, c: Rgba8) {
    let _ = write!(out, r#" {attr}="{}""#, c.to_hex_rgb());
    if !c.is_opaque() {
        let _ = write!(out, r#" {attr}-opacity="{}""#, num(c.opacity()));
    }
}

fn write_stroke(out: &mut String, s: &Stroke) {
    write_paint(out, "stroke", s.color);
    let _ = write!(out, r#" stroke-width="{}""#, num(s.width));
    if let Some((dash, gap)) = s.dash {
        let _ = write!(out, r#" stroke-dasharray="{} {}""#, num(dash), num(gap));
    }
}

/// Fixed-precision number formatting so output is byte-stable.
pub(crate) fn num(v: f64) -> String {
    let s = format!("{v:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_owned() } else { s.to_owned() }
}

pub(crate) fn escape_into(out: &mut String, s: &str) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        document::node::{FLYER_ROOT_ID, FontFamily, FontSpec},
        foundation::core::{Point, Size},
    };

    fn doc_with(children: Vec<Node>) -> Document {
        Document {
            size: Size::new(100.0, 50.0),
            root: Group {
                id: Some(FLYER_ROOT_ID.to_owned()),
                children,
            },
        }
    }

    fn text_node(fill: Option<Rgba8>, s: &str) -> Node {
        Node::Text(TextNode {
            id: Some("t".to_owned()),
            origin: Point::new(10.0, 20.5),
            anchor: TextAnchor::Middle,
            font: FontSpec {
                family: FontFamily::Serif,
                size: 12.0,
                weight: 700,
                italic: true,
            },
            line_height: 14.0,
            fill,
            lines: vec![s.to_owned(), "two".to_owned()],
        })
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(1.5), "1.5");
        assert_eq!(num(0.1234), "0.123");
        assert_eq!(num(-0.0001), "0");
    }

    #[test]
    fn text_is_escaped_and_fill_is_optional() {
        let svg = doc_with(vec![text_node(None, "a<b & \"c\"")]).to_svg();
        assert!(svg.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(svg.contains(r#"<text id="t" x="10" y="20.5" text-anchor="middle" font-family="serif" font-size="12" font-weight="700" font-style="italic">"#));
        assert!(!svg.contains("fill="));
        assert!(svg.contains(r#"<tspan x="10" dy="14">two</tspan>"#));

        let svg = doc_with(vec![text_node(Some(Rgba8::new(255, 0, 0, 128)), "x")]).to_svg();
        assert!(svg.contains(r##"fill="#ff0000" fill-opacity="0.502""##));
    }

    #[test]
    fn root_carries_stable_id_and_parses_with_usvg() {
        let rect = Node::Rect(RectNode {
            id: None,
            rect: Rect::new(0.0, 0.0, 100.0, 50.0),
            radius: 4.0,
            fill: None,
            stroke: Some(Stroke::dashed(Rgba8::BLACK, 2.0, 6.0, 4.0)),
        });
        let svg = doc_with(vec![rect, text_node(None, "hi")]).to_svg();
        assert!(svg.contains(r#"<g id="flyer-content">"#));
        assert!(svg.contains(r#"fill="none""#));
        assert!(svg.contains(r#"stroke-dasharray="6 4""#));

        let tree = usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
        assert_eq!(tree.size().width(), 100.0);
        assert_eq!(tree.size().height(), 50.0);
    }
}
