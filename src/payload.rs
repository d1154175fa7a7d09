//! Builds the endpoint-specific JSON bodies from the tool-level requests.

use rmcp::schemars;
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::client::Endpoint;
use crate::models::{
    DEFAULT_EDIT_MODEL, DEFAULT_GENERATION_MODEL, DEFAULT_SIZE, ExtendSupport, PayloadStyle,
    family_for,
};

fn default_generation_model() -> String {
    DEFAULT_GENERATION_MODEL.to_string()
}

fn default_edit_model() -> String {
    DEFAULT_EDIT_MODEL.to_string()
}

fn default_size() -> String {
    DEFAULT_SIZE.to_string()
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct GenerationRequest {
    #[schemars(description = "Text prompt describing the image to generate")]
    pub prompt: String,
    #[serde(default = "default_generation_model")]
    #[schemars(description = "Model name, e.g. z-image-turbo, wan2.2-t2i-flash, qwen-image-plus")]
    pub model: String,
    #[serde(default = "default_size")]
    #[schemars(description = "Output resolution, width*height")]
    pub size: String,
    #[serde(default)]
    #[schemars(description = "Let the model rewrite the prompt (unsupported by wan models)")]
    pub prompt_extend: Option<bool>,
    #[serde(default)]
    #[schemars(description = "Add a visible watermark to the output")]
    pub watermark: bool,
    #[serde(default)]
    #[schemars(description = "What the image should avoid")]
    pub negative_prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, schemars::JsonSchema)]
pub struct EditRequest {
    #[schemars(description = "Instruction describing the edit")]
    pub prompt: String,
    #[schemars(description = "Source image URL or data URI")]
    pub image: String,
    #[serde(default = "default_edit_model")]
    #[schemars(description = "Editing model name")]
    pub model: String,
    #[serde(default)]
    #[schemars(description = "What the edited image should avoid")]
    pub negative_prompt: Option<String>,
    #[serde(default = "default_true")]
    #[schemars(description = "Let the model rewrite the edit instruction")]
    pub prompt_extend: bool,
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.trim().is_empty())
}

/// Build the generation payload for the family the model name selects.
pub fn build_generation(request: &GenerationRequest) -> (Endpoint, Value) {
    let family = family_for(&request.model);

    let mut parameters = Map::new();
    parameters.insert("size".to_string(), Value::String(request.size.clone()));
    parameters.insert("n".to_string(), json!(1));
    parameters.insert("watermark".to_string(), Value::Bool(request.watermark));

    // Only forwarded when the caller asked for it; the wan family answers
    // InvalidParameter if the key is present at all.
    if let Some(extend) = request.prompt_extend {
        if family.prompt_extend == ExtendSupport::Supported {
            parameters.insert("prompt_extend".to_string(), Value::Bool(extend));
        }
    }

    let mut input = Map::new();
    match family.style {
        PayloadStyle::Message => {
            input.insert(
                "messages".to_string(),
                json!([{"role": "user", "content": [{"text": request.prompt}]}]),
            );
            if let Some(negative) = non_empty(request.negative_prompt.as_ref()) {
                parameters.insert(
                    "negative_prompt".to_string(),
                    Value::String(negative.to_string()),
                );
            }
        }
        PayloadStyle::Prompt => {
            input.insert("prompt".to_string(), Value::String(request.prompt.clone()));
            if let Some(negative) = non_empty(request.negative_prompt.as_ref()) {
                input.insert(
                    "negative_prompt".to_string(),
                    Value::String(negative.to_string()),
                );
            }
        }
    }

    let payload = json!({
        "model": request.model,
        "input": input,
        "parameters": parameters,
    });
    (family.endpoint(), payload)
}

/// Build the edit payload. Edits always go through the multimodal endpoint,
/// image part first, then the instruction text.
pub fn build_edit(request: &EditRequest) -> (Endpoint, Value) {
    let mut parameters = Map::new();
    parameters.insert(
        "prompt_extend".to_string(),
        Value::Bool(request.prompt_extend),
    );
    parameters.insert("watermark".to_string(), Value::Bool(false));
    if let Some(negative) = non_empty(request.negative_prompt.as_ref()) {
        parameters.insert(
            "negative_prompt".to_string(),
            Value::String(negative.to_string()),
        );
    }

    let payload = json!({
        "model": request.model,
        "input": {
            "messages": [{
                "role": "user",
                "content": [{"image": request.image}, {"text": request.prompt}],
            }],
        },
        "parameters": parameters,
    });
    (Endpoint::Multimodal, payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generation(model: &str) -> GenerationRequest {
        GenerationRequest {
            prompt: "cat".to_string(),
            model: model.to_string(),
            size: DEFAULT_SIZE.to_string(),
            prompt_extend: None,
            watermark: false,
            negative_prompt: None,
        }
    }

    #[test]
    fn z_image_builds_message_style_payload() {
        let (endpoint, payload) = build_generation(&generation("z-image-turbo"));
        assert_eq!(endpoint, Endpoint::Multimodal);
        assert_eq!(
            payload.pointer("/input/messages/0/content/0/text"),
            Some(&json!("cat"))
        );
        assert_eq!(payload.pointer("/input/prompt"), None);
        assert_eq!(payload.pointer("/parameters/negative_prompt"), None);
        assert_eq!(payload.pointer("/input/negative_prompt"), None);
        assert_eq!(payload.pointer("/parameters/n"), Some(&json!(1)));
        assert_eq!(payload.pointer("/parameters/watermark"), Some(&json!(false)));
    }

    #[test]
    fn wan_never_carries_prompt_extend() {
        let mut request = generation("wan2.2-t2i-flash");
        request.prompt_extend = Some(true);
        let (endpoint, payload) = build_generation(&request);
        assert_eq!(endpoint, Endpoint::TextToImage);
        assert_eq!(payload.pointer("/input/prompt"), Some(&json!("cat")));
        assert_eq!(payload.pointer("/parameters/prompt_extend"), None);
    }

    #[test]
    fn prompt_extend_is_forwarded_when_supported_and_explicit() {
        let mut request = generation("qwen-image-plus");
        request.prompt_extend = Some(false);
        let (_, payload) = build_generation(&request);
        assert_eq!(
            payload.pointer("/parameters/prompt_extend"),
            Some(&json!(false))
        );

        // unset stays unset, never null
        let (_, payload) = build_generation(&generation("qwen-image-plus"));
        assert_eq!(payload.pointer("/parameters/prompt_extend"), None);
    }

    #[test]
    fn negative_prompt_placement_follows_payload_style() {
        let mut request = generation("wan2.2-t2i-plus");
        request.negative_prompt = Some("blurry".to_string());
        let (_, payload) = build_generation(&request);
        assert_eq!(
            payload.pointer("/input/negative_prompt"),
            Some(&json!("blurry"))
        );
        assert_eq!(payload.pointer("/parameters/negative_prompt"), None);

        let mut request = generation("z-image-turbo");
        request.negative_prompt = Some("blurry".to_string());
        let (_, payload) = build_generation(&request);
        assert_eq!(
            payload.pointer("/parameters/negative_prompt"),
            Some(&json!("blurry"))
        );
        assert_eq!(payload.pointer("/input/negative_prompt"), None);
    }

    #[test]
    fn unknown_model_falls_back_to_text_to_image() {
        let (endpoint, payload) = build_generation(&generation("mystery-model"));
        assert_eq!(endpoint, Endpoint::TextToImage);
        assert_eq!(payload.pointer("/input/prompt"), Some(&json!("cat")));
    }

    #[test]
    fn edit_payload_is_image_then_text_with_fixed_parameters() {
        let request = EditRequest {
            prompt: "make it snow".to_string(),
            image: "https://img.example/src.png".to_string(),
            model: DEFAULT_EDIT_MODEL.to_string(),
            negative_prompt: None,
            prompt_extend: true,
        };
        let (endpoint, payload) = build_edit(&request);
        assert_eq!(endpoint, Endpoint::Multimodal);
        assert_eq!(
            payload.pointer("/input/messages/0/content/0/image"),
            Some(&json!("https://img.example/src.png"))
        );
        assert_eq!(
            payload.pointer("/input/messages/0/content/1/text"),
            Some(&json!("make it snow"))
        );
        assert_eq!(
            payload.pointer("/parameters/prompt_extend"),
            Some(&json!(true))
        );
        assert_eq!(
            payload.pointer("/parameters/watermark"),
            Some(&json!(false))
        );
        assert_eq!(payload.pointer("/parameters/negative_prompt"), None);
    }
}
