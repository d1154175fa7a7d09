//! Model family table for the Bailian image endpoints.
//!
//! The upstream API splits image models across two endpoints with different
//! payload shapes, and individual families reject parameters the others
//! accept. Those quirks live here as data so they stay auditable.

use crate::client::Endpoint;

pub const DEFAULT_GENERATION_MODEL: &str = "z-image-turbo";
pub const DEFAULT_EDIT_MODEL: &str = "qwen-image-edit-plus";
pub const DEFAULT_SIZE: &str = "1024*1024";

/// Which JSON body shape the endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStyle {
    /// Flat `input.prompt` / `input.negative_prompt`.
    Prompt,
    /// `input.messages[0].content[]` parts; negative prompt under `parameters`.
    Message,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendSupport {
    Supported,
    /// The wan family answers InvalidParameter if `prompt_extend` is present.
    Rejected,
}

#[derive(Debug, Clone, Copy)]
pub struct ModelFamily {
    pub prefix: &'static str,
    pub style: PayloadStyle,
    pub prompt_extend: ExtendSupport,
}

impl ModelFamily {
    pub fn endpoint(&self) -> Endpoint {
        match self.style {
            PayloadStyle::Prompt => Endpoint::TextToImage,
            PayloadStyle::Message => Endpoint::Multimodal,
        }
    }
}

pub const MODEL_FAMILIES: &[ModelFamily] = &[
    ModelFamily {
        prefix: "z-image",
        style: PayloadStyle::Message,
        prompt_extend: ExtendSupport::Supported,
    },
    ModelFamily {
        prefix: "wan",
        style: PayloadStyle::Prompt,
        prompt_extend: ExtendSupport::Rejected,
    },
    ModelFamily {
        prefix: "qwen-image",
        style: PayloadStyle::Prompt,
        prompt_extend: ExtendSupport::Supported,
    },
];

const FALLBACK_FAMILY: ModelFamily = ModelFamily {
    prefix: "",
    style: PayloadStyle::Prompt,
    prompt_extend: ExtendSupport::Supported,
};

/// Look up the family for a model name by prefix. Unknown names fall back to
/// the plain text-to-image shape.
pub fn family_for(model: &str) -> &'static ModelFamily {
    MODEL_FAMILIES
        .iter()
        .find(|family| model.starts_with(family.prefix))
        .unwrap_or(&FALLBACK_FAMILY)
}

const MODEL_CATALOG: &[(&str, &str, &str)] = &[
    ("Qwen Series", "qwen-image-max, qwen-image-plus", "Detail-rich"),
    ("Z-Image Series", "z-image-turbo", "Fast, multi-res"),
    (
        "Wan Series",
        "wan2.2-t2i-plus, wan2.2-t2i-flash",
        "Professional T2I",
    ),
    ("Editing", "qwen-image-edit-plus", "Prompt-driven image edits"),
];

/// Static catalog text for the `list_image_models` tool. No network call.
pub fn render_model_catalog() -> String {
    let mut out = String::new();
    for (series, models, note) in MODEL_CATALOG {
        out.push_str(&format!("- {series}: {models} ({note})\n"));
    }
    out
}
