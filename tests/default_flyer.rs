use flyer_studio::{
    FLYER_ROOT_ID, FlyerContent, LOGO_PLACEHOLDER, Node, Studio, ThemeColors, ThemeField, Tier,
    render_flyer,
};

#[test]
fn default_scenario_renders_expected_blocks() {
    let content = FlyerContent::default();
    let doc = render_flyer(&content, &ThemeColors::default(), None, None);

    assert_eq!(doc.id(), Some(FLYER_ROOT_ID));
    assert_eq!(
        doc.find_text("logo-placeholder-text").unwrap().text(),
        LOGO_PLACEHOLDER
    );
    assert_eq!(doc.find_text("heading").unwrap().text(), "SPRING PLANT SALE");
    assert_eq!(doc.find_text("amount").unwrap().text(), "250+");

    let rows = doc.groups_with_prefix("tier-");
    assert_eq!(rows.len(), 6);
    for (i, tier) in content.tiers.iter().enumerate() {
        assert_eq!(rows[i].id.as_deref(), Some(format!("tier-{i}").as_str()));
        assert_eq!(
            doc.find_text(&format!("tier-{i}-pay")).unwrap().text(),
            format!("Pay {}", tier.pay)
        );
        assert_eq!(
            doc.find_text(&format!("tier-{i}-receive")).unwrap().text(),
            format!("get {}", tier.receive)
        );
    }

    let contact = doc.find_text("contact").unwrap().text();
    assert_eq!(contact, content.contact);
    assert!(contact.ends_with("write \"PLANT SALE\" in the subject."));
}

#[test]
fn svg_output_is_stable_and_parseable() {
    let a = Studio::default().document().to_svg();
    let b = Studio::default().document().to_svg();
    assert_eq!(a, b);
    assert!(a.contains("LOGO SPACE"));
    assert!(a.contains("&quot;PLANT"));
    assert!(a.contains("SALE&quot;"));

    let tree = usvg::Tree::from_str(&a, &usvg::Options::default()).unwrap();
    assert_eq!(tree.size().width(), 800.0);
}

#[test]
fn theme_updates_do_not_couple_fields() {
    let mut studio = Studio::default();
    let values = ["#000000", "rgb(1,2,3)", "not a color", ""];
    for field in ThemeField::ALL {
        for v in values {
            let before = studio.theme().clone();
            studio.set_theme_field(field, v);
            for other in ThemeField::ALL {
                if other != field {
                    assert_eq!(studio.theme().get_field(other), before.get_field(other));
                }
            }
            assert_eq!(studio.theme().get_field(field), v);
        }
    }
}

#[test]
fn invalid_heading_color_does_not_panic() {
    let mut studio = Studio::default();
    studio.set_theme_field(ThemeField::Heading, "#zzzzzz");
    let doc = studio.document();
    assert_eq!(doc.find_text("heading").unwrap().fill, None);

    let svg = doc.to_svg();
    let heading_tag = svg
        .split("<text id=\"heading\"")
        .nth(1)
        .and_then(|rest| rest.split('>').next())
        .unwrap();
    assert!(!heading_tag.contains("fill="));
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}

#[test]
fn custom_content_with_duplicate_tiers() {
    let mut content = FlyerContent::default();
    content.tiers = vec![Tier::new("$1", "x"), Tier::new("$1", "x"), Tier::new("$0", "y")];
    let doc = render_flyer(&content, &ThemeColors::default(), None, None);
    let pays: Vec<_> = doc
        .texts()
        .into_iter()
        .filter(|t| t.id.as_deref().is_some_and(|id| id.ends_with("-pay")))
        .map(|t| t.text())
        .collect();
    assert_eq!(pays, vec!["Pay $1", "Pay $1", "Pay $0"]);

    assert!(matches!(doc.find("tier-2"), Some(Node::Group(_))));
}
