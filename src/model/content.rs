use std::{fs::File, io::BufReader, path::Path};

use crate::foundation::error::{FlyerError, FlyerResult};

/// A pay/receive pair shown as one funding option.
///
/// Both sides are display text; no ratio between them is computed or checked.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Tier {
    pub pay: String,
    pub receive: String,
}

impl Tier {
    pub fn new(pay: impl Into<String>, receive: impl Into<String>) -> Self {
        Self {
            pay: pay.into(),
            receive: receive.into(),
        }
    }
}

/// The structured text of one flyer.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlyerContent {
    pub heading: String,
    pub tagline: String,
    pub amount: String,
    pub sub_heading: String,
    pub description: String,
    pub terms: String,
    #[serde(default = "default_tiers_title")]
    pub tiers_title: String,
    pub tiers: Vec<Tier>,
    pub disbursement: String,
    pub contact: String,
}

fn default_tiers_title() -> String {
    "Bundle Options".to_owned()
}

impl Default for FlyerContent {
    fn default() -> Self {
        Self {
            heading: "SPRING PLANT SALE".to_owned(),
            tagline: "Seedlings, herbs and perennials raised by our volunteer gardeners".to_owned(),
            amount: "250+".to_owned(),
            sub_heading: "Varieties Grown This Season".to_owned(),
            description: "Tomatoes, peppers, kitchen herbs, pollinator flowers and native shrubs, \
                          all grown from seed in the community greenhouse"
                .to_owned(),
            terms: "Every plant is labelled with its variety, sun needs and spacing. Volunteers \
                    will be on hand to help you plan a bed or a balcony box. Proceeds cover \
                    seeds, compost and the greenhouse water bill for next year."
                .to_owned(),
            tiers_title: default_tiers_title(),
            tiers: vec![
                Tier::new("$5", "2 herb pots"),
                Tier::new("$10", "4 vegetable starts"),
                Tier::new("$15", "1 perennial + 2 herbs"),
                Tier::new("$20", "Pollinator trio"),
                Tier::new("$35", "Balcony box kit"),
                Tier::new("$60", "Raised bed starter set"),
            ],
            disbursement: "Orders are ready for pickup at the greenhouse every Saturday morning"
                .to_owned(),
            contact: "Questions? Email the garden team and write \"PLANT SALE\" in the subject."
                .to_owned(),
        }
    }
}

impl FlyerContent {
    pub fn from_path(path: impl AsRef<Path>) -> FlyerResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            FlyerError::validation(format!("open content JSON '{}': {e}", path.display()))
        })?;
        let content: FlyerContent = serde_json::from_reader(BufReader::new(f))?;
        Ok(content)
    }

    pub fn from_json_str(s: &str) -> FlyerResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_has_six_tiers_in_order() {
        let c = FlyerContent::default();
        assert_eq!(c.tiers.len(), 6);
        assert_eq!(c.tiers[0], Tier::new("$5", "2 herb pots"));
        assert_eq!(c.tiers[5].pay, "$60");
    }

    #[test]
    fn json_keys_are_camel_case_and_title_defaults() {
        let json = r#"{
            "heading": "H", "tagline": "T", "amount": "1", "subHeading": "S",
            "description": "D", "terms": "X",
            "tiers": [{"pay": "a", "receive": "b"}, {"pay": "a", "receive": "b"}],
            "disbursement": "P", "contact": "C"
        }"#;
        let c = FlyerContent::from_json_str(json).unwrap();
        assert_eq!(c.sub_heading, "S");
        assert_eq!(c.tiers_title, "Bundle Options");
        assert_eq!(c.tiers.len(), 2);
    }

    #[test]
    fn missing_field_is_a_serde_error() {
        let err = FlyerContent::from_json_str(r#"{"heading": "H"}"#).unwrap_err();
        assert!(matches!(err, FlyerError::Serde(_)));
    }
}
