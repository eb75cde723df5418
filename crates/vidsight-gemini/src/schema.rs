//! Response schema descriptors.
//!
//! Builds the declarative schema the generation call requires the service to
//! conform to, in the Gemini schema dialect (OBJECT/ARRAY/STRING/INTEGER with
//! `required` lists). The four variants share one builder; they differ only
//! in which sections are present and required.

use serde_json::{json, Map, Value};

use vidsight_models::AnalysisVariant;

fn timestamp_field() -> Value {
    json!({
        "type": "STRING",
        "description": "Timeline offset as HH:MM:SS or MM:SS"
    })
}

fn chapters_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "timestamp": timestamp_field(),
                "title": { "type": "STRING" }
            },
            "required": ["timestamp", "title"]
        }
    })
}

fn transcript_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "timestamp": timestamp_field(),
                "text": { "type": "STRING" }
            },
            "required": ["timestamp", "text"]
        }
    })
}

fn cast_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "speaker": { "type": "STRING" },
                "dialogues": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "timestamp": timestamp_field(),
                            "text": { "type": "STRING" }
                        },
                        "required": ["timestamp", "text"]
                    }
                }
            },
            "required": ["speaker", "dialogues"]
        }
    })
}

fn brand_exposure_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "companyName": { "type": "STRING" },
                "appearances": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "timestamp": timestamp_field(),
                            "context": { "type": "STRING" }
                        },
                        "required": ["timestamp", "context"]
                    }
                }
            },
            "required": ["companyName", "appearances"]
        }
    })
}

fn evaluation_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "scores": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "category": { "type": "STRING" },
                        "details": { "type": "STRING" },
                        "score": {
                            "type": "INTEGER",
                            "description": "0 to 10"
                        }
                    },
                    "required": ["category", "details", "score"]
                }
            },
            "positiveFeedback": { "type": "STRING" },
            "improvementPoints": { "type": "STRING" }
        },
        "required": ["scores", "positiveFeedback", "improvementPoints"]
    })
}

/// Build the response schema for a variant.
pub fn response_schema(variant: AnalysisVariant) -> Value {
    let mut properties = Map::new();
    let mut required = vec!["chapters"];

    properties.insert("chapters".to_string(), chapters_schema());

    if variant.wants_narrative() {
        properties.insert("summary".to_string(), json!({ "type": "STRING" }));
        properties.insert(
            "hashtags".to_string(),
            json!({ "type": "ARRAY", "items": { "type": "STRING" } }),
        );
        properties.insert("transcript".to_string(), transcript_schema());
        properties.insert("cast".to_string(), cast_schema());
        required.extend(["summary", "hashtags", "transcript", "cast"]);
    }

    if variant.wants_brands() {
        properties.insert("brandExposure".to_string(), brand_exposure_schema());
        required.push("brandExposure");
    }

    if variant.wants_evaluation() {
        properties.insert("evaluation".to_string(), evaluation_schema());
        required.push("evaluation");
    }

    json!({
        "type": "OBJECT",
        "properties": properties,
        "required": required
    })
}
