use super::*;
use crate::model::content::Tier;

fn png_stub() -> ImageData {
    ImageData::new("image/png", vec![0x89, b'P', b'N', b'G'])
}

#[test]
fn same_inputs_same_document() {
    let content = FlyerContent::default();
    let theme = ThemeColors::default();
    let logo = png_stub();

    let a = render_flyer(&content, &theme, Some(&logo), None);
    let b = render_flyer(&content, &theme, Some(&logo), None);
    assert_eq!(a, b);
    assert_eq!(a.to_svg(), b.to_svg());

    let c = render_flyer(&content, &theme, None, None);
    assert_ne!(a, c);
}

#[test]
fn root_has_stable_id_and_fixed_width() {
    let doc = render_flyer(&FlyerContent::default(), &ThemeColors::default(), None, None);
    assert_eq!(doc.id(), Some(FLYER_ROOT_ID));
    assert_eq!(doc.size.width, FLYER_WIDTH);
    assert!(doc.size.height > LOGO_ZONE_H);
    assert_eq!(doc.size.height, doc.size.height.ceil());
}

#[test]
fn tiers_keep_encounter_order_including_duplicates() {
    let mut content = FlyerContent::default();
    content.tiers = vec![
        Tier::new("$9", "z"),
        Tier::new("$1", "a"),
        Tier::new("$9", "z"),
        Tier::new("$5", "m"),
    ];
    let doc = render_flyer(&content, &ThemeColors::default(), None, None);

    let rows = doc.groups_with_prefix("tier-");
    assert_eq!(rows.len(), 4);
    let pays: Vec<_> = (0..4)
        .map(|i| doc.find_text(&format!("tier-{i}-pay")).unwrap().text())
        .collect();
    assert_eq!(pays, vec!["Pay $9", "Pay $1", "Pay $9", "Pay $5"]);
    assert_eq!(doc.find_text("tier-2-receive").unwrap().text(), "get z");
}

#[test]
fn no_tiers_still_renders_footer() {
    let mut content = FlyerContent::default();
    content.tiers.clear();
    let doc = render_flyer(&content, &ThemeColors::default(), None, None);
    assert!(doc.groups_with_prefix("tier-").is_empty());
    assert!(doc.find_text("contact").is_some());
}

#[test]
fn background_image_paints_beneath_all_text() {
    let bg = png_stub();
    let doc = render_flyer(
        &FlyerContent::default(),
        &ThemeColors::default(),
        None,
        Some(&bg),
    );

    let bg_idx = doc.paint_index("background-image").unwrap();
    let Some(Node::Image(img)) = doc.find("background-image") else {
        panic!("background image node missing");
    };
    assert_eq!(img.opacity, BACKGROUND_OPACITY);
    assert_eq!(img.fit, ImageFit::Cover);
    assert_eq!(img.rect, Rect::new(0.0, 0.0, FLYER_WIDTH, doc.size.height));

    for (i, node) in doc.nodes().iter().enumerate() {
        if matches!(node, Node::Text(_)) {
            assert!(i > bg_idx, "text node at {i} painted before background");
        }
    }
}

#[test]
fn page_fill_then_background_then_top_border() {
    let bg = png_stub();
    let doc = render_flyer(
        &FlyerContent::default(),
        &ThemeColors::default(),
        None,
        Some(&bg),
    );
    let head: Vec<Option<&str>> = doc.root.children.iter().take(3).map(Node::id).collect();
    assert_eq!(
        head,
        [Some("page"), Some("background-image"), Some("top-border")]
    );

    let plain = render_flyer(&FlyerContent::default(), &ThemeColors::default(), None, None);
    let head: Vec<Option<&str>> = plain.root.children.iter().take(2).map(Node::id).collect();
    assert_eq!(head, [Some("page"), Some("top-border")]);
}

#[test]
fn logo_replaces_placeholder() {
    let doc = render_flyer(
        &FlyerContent::default(),
        &ThemeColors::default(),
        None,
        None,
    );
    assert_eq!(
        doc.find_text("logo-placeholder-text").unwrap().text(),
        LOGO_PLACEHOLDER
    );
    assert!(doc.find("logo").is_none());

    let logo = png_stub();
    let doc = render_flyer(
        &FlyerContent::default(),
        &ThemeColors::default(),
        Some(&logo),
        None,
    );
    assert!(doc.find("logo-placeholder-text").is_none());
    let Some(Node::Image(img)) = doc.find("logo") else {
        panic!("logo node missing");
    };
    assert_eq!(img.fit, ImageFit::Contain);
    assert_eq!(img.rect.height(), LOGO_MAX_H);
}

#[test]
fn colors_come_from_the_theme() {
    let theme = ThemeColors {
        bg: "#010203".to_owned(),
        heading: "#a00000".to_owned(),
        accent: "#00b000".to_owned(),
        text: "#0000c0".to_owned(),
    };
    let doc = render_flyer(&FlyerContent::default(), &theme, None, None);
    let heading = Rgba8::opaque(0xa0, 0, 0);
    let accent = Rgba8::opaque(0, 0xb0, 0);
    let text = Rgba8::opaque(0, 0, 0xc0);
    let bg = Rgba8::opaque(1, 2, 3);

    assert_eq!(doc.find_text("heading").unwrap().fill, Some(heading));
    assert_eq!(doc.find_text("amount").unwrap().fill, Some(heading));
    assert_eq!(doc.find_text("tagline").unwrap().fill, Some(accent));
    assert_eq!(doc.find_text("terms").unwrap().fill, Some(text));
    assert_eq!(doc.find_text("contact").unwrap().fill, Some(bg));

    let Some(Node::Rect(callout)) = doc.find("amount-callout") else {
        panic!("callout missing");
    };
    assert_eq!(callout.fill, Some(accent.with_alpha(TINT_FILL)));

    // Every paint in the tree is derived from one of the four theme colors.
    let allowed = [heading, accent, text, bg];
    let derived = |c: Rgba8| allowed.iter().any(|a| (a.r, a.g, a.b) == (c.r, c.g, c.b));
    for node in doc.nodes() {
        match node {
            Node::Text(t) => assert!(t.fill.is_none_or(derived)),
            Node::Rect(r) => {
                assert!(r.fill.is_none_or(derived));
                assert!(r.stroke.is_none_or(|s| derived(s.color)));
            }
            Node::Line(l) => assert!(derived(l.stroke.color)),
            Node::Group(_) | Node::Image(_) => {}
        }
    }
}

#[test]
fn invalid_heading_color_degrades_to_default_paint() {
    let mut theme = ThemeColors::default();
    theme.heading = "definitely-not-a-color".to_owned();
    let doc = render_flyer(&FlyerContent::default(), &theme, None, None);

    let heading = doc.find_text("heading").unwrap();
    assert_eq!(heading.fill, None);
    assert_eq!(heading.text(), "SPRING PLANT SALE");

    let Some(Node::Rect(contact_box)) = doc.find("contact-box") else {
        panic!("contact box missing");
    };
    assert_eq!(contact_box.fill, None);

    // Other fields are untouched.
    assert!(doc.find_text("tagline").unwrap().fill.is_some());
    assert!(doc.to_svg().contains(r#"<text id="heading""#));
}

#[test]
fn heading_and_disbursement_are_uppercased() {
    let mut content = FlyerContent::default();
    content.heading = "Bake Sale".to_owned();
    content.disbursement = "pick up friday".to_owned();
    let doc = render_flyer(&content, &ThemeColors::default(), None, None);
    assert_eq!(doc.find_text("heading").unwrap().text(), "BAKE SALE");
    assert_eq!(doc.find_text("disbursement").unwrap().text(), "PICK UP FRIDAY");
}

#[test]
fn longer_prose_grows_the_page() {
    let short = render_flyer(&FlyerContent::default(), &ThemeColors::default(), None, None);
    let mut content = FlyerContent::default();
    content.terms = content.terms.repeat(4);
    let long = render_flyer(&content, &ThemeColors::default(), None, None);
    assert!(long.size.height > short.size.height);
}
