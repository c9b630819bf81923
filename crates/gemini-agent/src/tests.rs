/// Wire-format tests for request/response payloads of `generateContent`.
#[cfg(test)]
mod unit {
    use crate::types::{
        Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part, Role,
    };
    use serde_json::json;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).expect("failed to parse response")
    }

    #[test]
    fn request_uses_camel_case_and_omits_empty_fields() {
        let req = GenerateContentRequest {
            contents: vec![Content::new(
                Role::User,
                vec![Part::text("hola"), Part::inline("image/png", "AAAA")],
            )],
            system_instruction: Some(Content::system("sé breve")),
            generation_config: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "role": "user",
                    "parts": [
                        {"text": "hola"},
                        {"inlineData": {"mimeType": "image/png", "data": "AAAA"}}
                    ]
                }],
                "systemInstruction": {"parts": [{"text": "sé breve"}]}
            })
        );
    }

    #[test]
    fn json_generation_config_serializes() {
        let cfg = GenerationConfig::json(json!({"type": "OBJECT"}));
        let value = serde_json::to_value(&cfg).unwrap();
        assert_eq!(
            value,
            json!({"responseMimeType": "application/json", "responseSchema": {"type": "OBJECT"}})
        );
    }

    #[test]
    fn parse_model_reply() {
        let resp = parse(
            r#"{
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "¡Hola! "}, {"text": "¿Cómo te llamas?"}]},
                    "finishReason": "STOP",
                    "index": 0
                }],
                "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20},
                "modelVersion": "gemini-2.5-flash"
            }"#,
        );
        assert_eq!(resp.text().as_deref(), Some("¡Hola! ¿Cómo te llamas?"));
        assert_eq!(resp.usage_metadata.unwrap().total_token_count, 20);
    }

    #[test]
    fn parse_candidate_without_content() {
        let resp = parse(r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#);
        assert!(resp.text().is_none());
        assert_eq!(resp.empty_reason(), "MAX_TOKENS");
    }

    #[test]
    fn parse_empty_object() {
        let resp = parse("{}");
        assert!(resp.text().is_none());
        assert_eq!(resp.empty_reason(), "no candidates");
    }

    #[test]
    fn content_roundtrip_keeps_role() {
        let c = Content::new(Role::Model, vec![Part::text("ok")]);
        let back: Content = serde_json::from_value(serde_json::to_value(&c).unwrap()).unwrap();
        assert_eq!(back, c);
    }
}
