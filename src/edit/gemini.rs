//! Image edits through the Gemini `generateContent` REST endpoint.

use crate::{
    assets::image_data::ImageData,
    edit::session::ImageEditor,
    foundation::error::{FlyerError, FlyerResult},
};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

/// [`ImageEditor`] backed by a Gemini image model.
pub struct GeminiImageEditor {
    client: reqwest::blocking::Client,
    endpoint: String,
    model: String,
    /// Checked when an edit runs, so a missing key fails that edit rather than construction.
    api_key: Option<String>,
}

impl GeminiImageEditor {
    pub fn new(api_key: impl Into<String>) -> FlyerResult<Self> {
        Self::with_api_key(Some(api_key.into()))
    }

    /// Build from the hosting environment's API key, if one is set.
    pub fn from_env() -> FlyerResult<Self> {
        Self::with_api_key(env_api_key())
    }

    pub(crate) fn with_api_key(api_key: Option<String>) -> FlyerResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| FlyerError::edit(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            api_key,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl ImageEditor for GeminiImageEditor {
    #[tracing::instrument(level = "info", skip_all, fields(model = %self.model))]
    fn edit(&self, image: &ImageData, instruction: &str) -> FlyerResult<ImageData> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            FlyerError::edit(format!(
                "no API key found (set {})",
                API_KEY_VARS.join(" or ")
            ))
        })?;
        let body = build_request(image, instruction);
        let resp = self
            .client
            .post(self.url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .map_err(|e| FlyerError::edit(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| FlyerError::edit(format!("request rejected: {e}")))?;
        let parsed: GenerateResponse = resp
            .json()
            .map_err(|e| FlyerError::edit(format!("malformed response: {e}")))?;
        extract_image(parsed)
    }
}

#[derive(Debug, serde::Serialize)]
pub(crate) struct GenerateRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, serde::Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, serde::Serialize)]
#[serde(untagged)]
enum RequestPart {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, serde::Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, serde::Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, serde::Deserialize)]
struct ResponsePart {
    #[serde(default, rename = "inlineData")]
    inline_data: Option<InlineData>,
}

fn env_api_key() -> Option<String> {
    API_KEY_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.trim().is_empty()))
}

/// Image first, then the instruction, in a single user turn.
pub(crate) fn build_request(image: &ImageData, instruction: &str) -> GenerateRequest {
    GenerateRequest {
        contents: vec![RequestContent {
            parts: vec![
                RequestPart::Inline {
                    inline_data: InlineData {
                        mime_type: image.mime.clone(),
                        data: image.to_base64(),
                    },
                },
                RequestPart::Text {
                    text: instruction.to_owned(),
                },
            ],
        }],
    }
}

/// First inline image part of the first candidate that has one.
pub(crate) fn extract_image(resp: GenerateResponse) -> FlyerResult<ImageData> {
    resp.candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.inline_data)
        .ok_or_else(|| FlyerError::edit("response contained no image"))
        .and_then(|d| ImageData::from_base64(d.mime_type, &d.data))
}
