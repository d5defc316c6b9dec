use crate::{
    assets::{color::resolve_color, image_data::ImageData},
    document::node::{
        Document, FLYER_ROOT_ID, FontFamily, FontSpec, Group, ImageFit, ImageNode, LineNode, Node,
        RectNode, Stroke, TextAnchor, TextNode,
    },
    foundation::core::{Point, Rect, Rgba8, Size},
    model::{content::FlyerContent, theme::ThemeColors},
    render::text::{estimate_width, wrap},
};

/// Logical width of the flyer. Height follows the content.
pub const FLYER_WIDTH: f64 = 800.0;
/// Opacity of the full-bleed background image layer.
pub const BACKGROUND_OPACITY: f64 = 0.1;
/// Text shown in the logo zone when no logo is set.
pub const LOGO_PLACEHOLDER: &str = "LOGO SPACE";

const PAD_X: f64 = 48.0;
const CONTENT_W: f64 = FLYER_WIDTH - 2.0 * PAD_X;
const CENTER_X: f64 = FLYER_WIDTH / 2.0;
const TOP_BORDER: f64 = 8.0;
const LOGO_ZONE_H: f64 = 224.0;
const LOGO_MAX_W: f64 = 320.0;
const LOGO_MAX_H: f64 = 160.0;
const PROSE_W: f64 = 672.0;
const TIER_COLS: usize = 2;
const TIER_GAP: f64 = 20.0;
const TIER_ROW_H: f64 = 88.0;

// Alpha suffixes applied to the accent color for soft fills and rules.
const TINT_FILL: u8 = 0x10;
const TINT_BORDER: u8 = 0x30;
const TINT_RULE: u8 = 0x20;
const TINT_PLACEHOLDER: u8 = 0x55;

/// Theme colors resolved once per render. `None` marks a value that did not parse.
#[derive(Clone, Copy, Debug)]
struct Palette {
    bg: Option<Rgba8>,
    heading: Option<Rgba8>,
    accent: Option<Rgba8>,
    text: Option<Rgba8>,
}

impl Palette {
    fn resolve(theme: &ThemeColors) -> Self {
        Self {
            bg: resolve_color(&theme.bg),
            heading: resolve_color(&theme.heading),
            accent: resolve_color(&theme.accent),
            text: resolve_color(&theme.text),
        }
    }
}

fn tint(c: Option<Rgba8>, alpha: u8) -> Option<Rgba8> {
    c.map(|c| c.with_alpha(alpha))
}

fn font(family: FontFamily, size: f64, weight: u16) -> FontSpec {
    FontSpec {
        family,
        size,
        weight,
        italic: false,
    }
}

#[derive(Clone, Copy, Debug)]
struct TextStyle {
    font: FontSpec,
    fill: Option<Rgba8>,
    anchor: TextAnchor,
    line_height: f64,
}

impl TextStyle {
    fn centered(font: FontSpec, fill: Option<Rgba8>, line_height: f64) -> Self {
        Self {
            font,
            fill,
            anchor: TextAnchor::Middle,
            line_height,
        }
    }
}

/// Top-down flow layout: nodes in paint order plus a vertical cursor.
struct Flow {
    nodes: Vec<Node>,
    y: f64,
}

impl Flow {
    fn gap(&mut self, h: f64) {
        self.y += h;
    }

    /// Wrap `text` into a block anchored at `x` and advance the cursor past it.
    fn text_block(&mut self, id: &str, text: &str, x: f64, max_width: f64, style: TextStyle) {
        let lines = wrap(text, &style.font, max_width);
        let rows = lines.len().max(1) as f64;
        self.nodes.push(Node::Text(TextNode {
            id: Some(id.to_owned()),
            origin: Point::new(x, self.y + baseline_offset(&style)),
            anchor: style.anchor,
            font: style.font,
            line_height: style.line_height,
            fill: style.fill,
            lines,
        }));
        self.y += rows * style.line_height;
    }

    fn rule(&mut self, x0: f64, x1: f64, y: f64, color: Option<Rgba8>, width: f64) {
        if let Some(color) = color {
            self.nodes.push(Node::Line(LineNode {
                from: Point::new(x0, y),
                to: Point::new(x1, y),
                stroke: Stroke::solid(color, width),
            }));
        }
    }

    /// Run `body`, then slip a box sized to what it laid out underneath it.
    fn boxed(
        &mut self,
        id: &str,
        pad_y: f64,
        fill: Option<Rgba8>,
        stroke: Option<Stroke>,
        body: impl FnOnce(&mut Flow),
    ) {
        let at = self.nodes.len();
        let top = self.y;
        self.y += pad_y;
        body(self);
        self.y += pad_y;
        self.nodes.insert(
            at,
            Node::Rect(RectNode {
                id: Some(id.to_owned()),
                rect: Rect::new(PAD_X, top, PAD_X + CONTENT_W, self.y),
                radius: 20.0,
                fill,
                stroke,
            }),
        );
    }
}

/// Distance from the top of a line box to its baseline.
fn baseline_offset(style: &TextStyle) -> f64 {
    (style.line_height - style.font.size) / 2.0 + style.font.size * 0.8
}

/// Lay out a flyer. Pure: the same inputs always produce an equal [`Document`].
///
/// Paint order, back to front: page fill, background image, top border, logo zone, heading,
/// amount callout, prose, tiers, disbursement notice, contact block.
#[tracing::instrument(level = "debug", skip_all, fields(tiers = content.tiers.len()))]
pub fn render_flyer(
    content: &FlyerContent,
    theme: &ThemeColors,
    logo: Option<&ImageData>,
    background: Option<&ImageData>,
) -> Document {
    let p = Palette::resolve(theme);
    let mut flow = Flow {
        nodes: Vec::new(),
        y: TOP_BORDER,
    };

    logo_zone(&mut flow, logo, &p);
    flow.gap(32.0);
    heading(&mut flow, content, &p);
    flow.gap(40.0);
    amount_callout(&mut flow, content, &p);
    flow.gap(40.0);
    prose(&mut flow, content, &p);
    flow.gap(40.0);
    tiers(&mut flow, content, &p);
    flow.gap(64.0);
    footer(&mut flow, content, &p);
    flow.gap(32.0);

    let height = flow.y.ceil();
    let page = Rect::new(0.0, 0.0, FLYER_WIDTH, height);

    let mut children = Vec::with_capacity(flow.nodes.len() + 3);
    children.push(Node::Rect(RectNode {
        id: Some("page".to_owned()),
        rect: page,
        radius: 0.0,
        fill: p.bg,
        stroke: None,
    }));
    if let Some(bg) = background {
        children.push(Node::Image(ImageNode {
            id: Some("background-image".to_owned()),
            rect: page,
            opacity: BACKGROUND_OPACITY,
            fit: ImageFit::Cover,
            data: bg.clone(),
        }));
    }
    children.push(Node::Rect(RectNode {
        id: Some("top-border".to_owned()),
        rect: Rect::new(0.0, 0.0, FLYER_WIDTH, TOP_BORDER),
        radius: 0.0,
        fill: p.heading,
        stroke: None,
    }));
    children.extend(flow.nodes);

    Document {
        size: Size::new(FLYER_WIDTH, height),
        root: Group {
            id: Some(FLYER_ROOT_ID.to_owned()),
            children,
        },
    }
}

fn logo_zone(flow: &mut Flow, logo: Option<&ImageData>, p: &Palette) {
    let top = flow.y;
    match logo {
        Some(data) => {
            let y = top + (LOGO_ZONE_H - LOGO_MAX_H) / 2.0;
            let x = CENTER_X - LOGO_MAX_W / 2.0;
            flow.nodes.push(Node::Image(ImageNode {
                id: Some("logo".to_owned()),
                rect: Rect::new(x, y, x + LOGO_MAX_W, y + LOGO_MAX_H),
                opacity: 1.0,
                fit: ImageFit::Contain,
                data: data.clone(),
            }));
        }
        None => {
            let (w, h) = (240.0, 72.0);
            let x = CENTER_X - w / 2.0;
            let y = top + (LOGO_ZONE_H - h) / 2.0;
            let muted = tint(p.text, TINT_PLACEHOLDER);
            flow.nodes.push(Node::Rect(RectNode {
                id: Some("logo-placeholder".to_owned()),
                rect: Rect::new(x, y, x + w, y + h),
                radius: 8.0,
                fill: None,
                stroke: muted.map(|c| Stroke::dashed(c, 2.0, 6.0, 4.0)),
            }));
            flow.nodes.push(Node::Text(TextNode {
                id: Some("logo-placeholder-text".to_owned()),
                origin: Point::new(CENTER_X, y + h / 2.0 + 5.0),
                anchor: TextAnchor::Middle,
                font: font(FontFamily::SansSerif, 14.0, 600),
                line_height: 14.0,
                fill: muted,
                lines: vec![LOGO_PLACEHOLDER.to_owned()],
            }));
        }
    }
    flow.y = top + LOGO_ZONE_H;
}

fn heading(flow: &mut Flow, content: &FlyerContent, p: &Palette) {
    let style = TextStyle::centered(font(FontFamily::Serif, 72.0, 900), p.heading, 72.0);
    flow.text_block(
        "heading",
        &content.heading.to_uppercase(),
        CENTER_X,
        CONTENT_W,
        style,
    );
    flow.gap(12.0);

    let mut tagline_font = font(FontFamily::Serif, 20.0, 500);
    tagline_font.italic = true;
    let style = TextStyle::centered(tagline_font, p.accent, 28.0);
    flow.text_block("tagline", &content.tagline, CENTER_X, CONTENT_W, style);
}

fn amount_callout(flow: &mut Flow, content: &FlyerContent, p: &Palette) {
    let stroke = tint(p.accent, TINT_BORDER).map(|c| Stroke::solid(c, 2.0));
    flow.boxed(
        "amount-callout",
        40.0,
        tint(p.accent, TINT_FILL),
        stroke,
        |flow| {
            let style = TextStyle::centered(font(FontFamily::Serif, 96.0, 700), p.heading, 96.0);
            flow.text_block("amount", &content.amount, CENTER_X, CONTENT_W - 48.0, style);
            flow.gap(8.0);
            let style = TextStyle::centered(font(FontFamily::Serif, 24.0, 700), p.accent, 30.0);
            flow.text_block(
                "sub-heading",
                &content.sub_heading.to_uppercase(),
                CENTER_X,
                CONTENT_W - 48.0,
                style,
            );
        },
    );
}

fn prose(flow: &mut Flow, content: &FlyerContent, p: &Palette) {
    let prose_x = CENTER_X - PROSE_W / 2.0;

    let style = TextStyle::centered(font(FontFamily::Serif, 24.0, 700), p.heading, 32.0);
    flow.text_block("description", &content.description, CENTER_X, PROSE_W, style);
    flow.gap(24.0);
    let y = flow.y;
    flow.rule(prose_x, prose_x + PROSE_W, y, tint(p.accent, TINT_RULE), 2.0);
    flow.gap(32.0);

    let style = TextStyle {
        font: font(FontFamily::Serif, 18.0, 500),
        fill: p.text,
        anchor: TextAnchor::Start,
        line_height: 29.0,
    };
    flow.text_block("terms", &content.terms, prose_x, PROSE_W, style);
}

fn tiers(flow: &mut Flow, content: &FlyerContent, p: &Palette) {
    let title_style = TextStyle::centered(font(FontFamily::Serif, 30.0, 900), p.heading, 36.0);
    let title = content.tiers_title.to_uppercase();
    let title_w = estimate_width(&title, &title_style.font).min(CONTENT_W - 96.0);
    let rule_y = flow.y + title_style.line_height / 2.0;
    let rule_color = tint(p.accent, TINT_RULE);
    flow.rule(PAD_X, CENTER_X - title_w / 2.0 - 24.0, rule_y, rule_color, 2.0);
    flow.rule(
        CENTER_X + title_w / 2.0 + 24.0,
        PAD_X + CONTENT_W,
        rule_y,
        rule_color,
        2.0,
    );
    flow.text_block("tiers-title", &title, CENTER_X, CONTENT_W, title_style);
    flow.gap(32.0);

    let col_w = (CONTENT_W - TIER_GAP * (TIER_COLS as f64 - 1.0)) / TIER_COLS as f64;
    let top = flow.y;
    // Encounter order, no sorting or dedup.
    for (i, tier) in content.tiers.iter().enumerate() {
        let col = (i % TIER_COLS) as f64;
        let row = (i / TIER_COLS) as f64;
        let x = PAD_X + col * (col_w + TIER_GAP);
        let y = top + row * (TIER_ROW_H + TIER_GAP);
        flow.nodes.push(Node::Group(tier_row(i, &tier.pay, &tier.receive, x, y, col_w, p)));
    }

    let rows = content.tiers.len().div_ceil(TIER_COLS) as f64;
    if rows > 0.0 {
        flow.y = top + rows * TIER_ROW_H + (rows - 1.0) * TIER_GAP;
    }
}

fn tier_row(i: usize, pay: &str, receive: &str, x: f64, y: f64, w: f64, p: &Palette) -> Group {
    let id = format!("tier-{i}");
    let mut row = Group::new(Some(id.clone()));
    let mono = font(FontFamily::Monospace, 18.0, 700);

    row.children.push(Node::Rect(RectNode {
        id: None,
        rect: Rect::new(x, y, x + w, y + TIER_ROW_H),
        radius: 16.0,
        fill: p.bg,
        stroke: tint(p.accent, TINT_RULE).map(|c| Stroke::solid(c, 1.0)),
    }));
    row.children.push(Node::Rect(RectNode {
        id: None,
        rect: Rect::new(x + 20.0, y + 24.0, x + 60.0, y + 64.0),
        radius: 20.0,
        fill: p.heading,
        stroke: None,
    }));
    row.children.push(Node::Text(TextNode {
        id: None,
        origin: Point::new(x + 40.0, y + 49.0),
        anchor: TextAnchor::Middle,
        font: font(FontFamily::SansSerif, 14.0, 900),
        line_height: 14.0,
        fill: p.bg,
        lines: vec![(i + 1).to_string()],
    }));
    row.children.push(Node::Text(TextNode {
        id: Some(format!("{id}-pay")),
        origin: Point::new(x + 76.0, y + 38.0),
        anchor: TextAnchor::Start,
        font: mono,
        line_height: 22.0,
        fill: p.text,
        lines: vec![format!("Pay {pay}")],
    }));
    row.children.push(Node::Text(TextNode {
        id: Some(format!("{id}-receive")),
        origin: Point::new(x + 76.0, y + 64.0),
        anchor: TextAnchor::Start,
        font: mono,
        line_height: 22.0,
        fill: p.accent,
        lines: vec![format!("get {receive}")],
    }));
    row
}

fn footer(flow: &mut Flow, content: &FlyerContent, p: &Palette) {
    let y = flow.y;
    flow.rule(PAD_X, PAD_X + CONTENT_W, y, tint(p.accent, TINT_FILL), 1.0);
    flow.gap(32.0);

    let stroke = tint(p.accent, TINT_BORDER).map(|c| Stroke::solid(c, 2.0));
    flow.boxed(
        "disbursement-box",
        32.0,
        tint(p.accent, TINT_FILL),
        stroke,
        |flow| {
            let style = TextStyle::centered(font(FontFamily::Serif, 20.0, 900), p.accent, 26.0);
            flow.text_block(
                "disbursement",
                &content.disbursement.to_uppercase(),
                CENTER_X,
                CONTENT_W - 64.0,
                style,
            );
        },
    );
    flow.gap(32.0);

    flow.boxed("contact-box", 24.0, p.heading, None, |flow| {
        let style = TextStyle::centered(font(FontFamily::SansSerif, 20.0, 900), p.bg, 28.0);
        flow.text_block("contact", &content.contact, CENTER_X, CONTENT_W - 96.0, style);
    });
}

#[cfg(test)]
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
