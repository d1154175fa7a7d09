//! Locates the produced image URL in the upstream response.
//!
//! The two endpoints answer with different `output` shapes; extraction is
//! total and never panics on malformed responses.

use serde_json::Value;

/// First match wins: `output.results[0].url`, then
/// `output.choices[0].message.content[0].image`. A present but empty or
/// non-string field counts as absent.
pub fn extract_image_url(response: &Value) -> Option<&str> {
    let output = response.get("output")?;

    if let Some(results) = output
        .get("results")
        .and_then(Value::as_array)
        .filter(|results| !results.is_empty())
    {
        return results[0]
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty());
    }

    if let Some(choices) = output
        .get("choices")
        .and_then(Value::as_array)
        .filter(|choices| !choices.is_empty())
    {
        return choices[0]
            .get("message")
            .and_then(|message| message.get("content"))
            .and_then(Value::as_array)
            .and_then(|content| content.first())
            .and_then(|part| part.get("image"))
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty());
    }

    None
}

pub fn request_id(response: &Value) -> Option<&str> {
    response.get("request_id").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn results_shape_yields_first_url() {
        let response = json!({
            "request_id": "req-1",
            "output": {"results": [
                {"url": "https://img.example/a.png"},
                {"url": "https://img.example/b.png"}
            ]}
        });
        assert_eq!(
            extract_image_url(&response),
            Some("https://img.example/a.png")
        );
        assert_eq!(request_id(&response), Some("req-1"));
    }

    #[test]
    fn choices_shape_yields_image_of_first_content_part() {
        let response = json!({
            "output": {"choices": [{
                "message": {"content": [{"image": "https://img.example/c.png"}]}
            }]}
        });
        assert_eq!(
            extract_image_url(&response),
            Some("https://img.example/c.png")
        );
    }

    #[test]
    fn results_shape_shadows_choices_shape() {
        // non-empty results wins even when choices is also present
        let response = json!({
            "output": {
                "results": [{"url": "https://img.example/r.png"}],
                "choices": [{"message": {"content": [{"image": "https://img.example/c.png"}]}}]
            }
        });
        assert_eq!(
            extract_image_url(&response),
            Some("https://img.example/r.png")
        );
    }

    #[test]
    fn is_total_over_malformed_shapes() {
        for response in [
            json!(null),
            json!("nope"),
            json!({}),
            json!({"output": null}),
            json!({"output": {}}),
            json!({"output": {"results": []}}),
            json!({"output": {"results": [{"no_url": true}]}}),
            json!({"output": {"results": [{"url": ""}]}}),
            json!({"output": {"results": [{"url": 42}]}}),
            json!({"output": {"choices": []}}),
            json!({"output": {"choices": [{}]}}),
            json!({"output": {"choices": [{"message": {}}]}}),
            json!({"output": {"choices": [{"message": {"content": "plain text"}}]}}),
            json!({"output": {"choices": [{"message": {"content": []}}]}}),
            json!({"output": {"choices": [{"message": {"content": [{"text": "hi"}]}}]}}),
        ] {
            assert_eq!(extract_image_url(&response), None, "response: {response}");
        }
    }

    #[test]
    fn empty_results_does_not_fall_through_to_choices() {
        // the ordered rules treat an empty results array as "shape absent"
        let response = json!({
            "output": {
                "results": [],
                "choices": [{"message": {"content": [{"image": "https://img.example/c.png"}]}}]
            }
        });
        assert_eq!(
            extract_image_url(&response),
            Some("https://img.example/c.png")
        );
    }
}
