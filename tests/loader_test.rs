use comfy_sweep::compiler::loader;
use comfy_sweep::dsl::builder::SweepBuilder;
use comfy_sweep::dsl::{PromptKeyword, PromptKeywords, SweepValue};
use serde_json::json;
use std::fs;

#[test]
fn test_load_json_config_keeps_key_order() {
    let content = r#"{
        "Upscale/scale": { "values": [1.5, 2] },
        "KSampler/cfg": { "label": "cfg", "values": [5, "off"] },
        "Img/resolution": { "label": "res", "values": [{ "width": 512, "height": 768 }] },
        "Power Lora Loader/lora_1/strength": {
            "label": "detail",
            "values": ["off", 0.6],
            "prompt_keyword": { "prompt_name": "Positive", "prompt_text": "intricate" }
        }
    }"#;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("sweep.json");
    fs::write(&file_path, content).expect("Failed to write temp file");

    let config = loader::load_sweep_config(&file_path).expect("Failed to load config");

    let keys: Vec<&str> = config.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "Upscale/scale",
            "KSampler/cfg",
            "Img/resolution",
            "Power Lora Loader/lora_1/strength",
        ]
    );

    let cfg = config.get("KSampler/cfg").expect("cfg axis");
    assert_eq!(cfg.values, vec![SweepValue::Scalar(json!(5)), SweepValue::Off]);

    let res = config.get("Img/resolution").expect("res axis");
    assert_eq!(res.values, vec![SweepValue::Resolution { width: json!(512), height: json!(768) }]);

    let lora = config.get("Power Lora Loader/lora_1/strength").expect("lora axis");
    assert_eq!(
        lora.prompt_keyword,
        Some(PromptKeywords::One(PromptKeyword {
            prompt_name: "Positive".to_string(),
            prompt_text: "intricate".to_string(),
        }))
    );

    assert_eq!(config.display_label("Upscale/scale"), "scale");
    assert_eq!(config.display_label("KSampler/cfg"), "cfg");
}

#[test]
fn test_load_yaml_config_matches_builder() {
    let content = r#"
KSampler/steps:
  values: [20, 30]
Lora/strength:
  label: lora
  values: ["off", 0.75]
  prompt_keyword:
    - prompt_name: Positive
      prompt_text: "style a"
    - prompt_name: Negative
      prompt_text: "style b"
"#;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("sweep.yaml");
    fs::write(&file_path, content).expect("Failed to write temp file");

    let loaded = loader::load_sweep_config(&file_path).expect("Failed to load config");

    let expected = SweepBuilder::new()
        .axis("KSampler/steps")
            .value(20)
            .value(30)
            .build()
        .axis("Lora/strength")
            .label("lora")
            .off()
            .value(0.75)
            .keyword("Positive", "style a")
            .keyword("Negative", "style b")
            .build()
        .build();

    assert_eq!(loaded, expected);

    let keywords: Vec<&str> = loaded
        .get("Lora/strength")
        .and_then(|e| e.prompt_keyword.as_ref())
        .map(|k| k.iter().map(|kw| kw.prompt_text.as_str()).collect())
        .unwrap_or_default();
    assert_eq!(keywords, vec!["style a", "style b"]);
}

#[test]
fn test_repeated_axis_key_keeps_last_entry() {
    let content = r#"{
        "KSampler/steps": { "values": [10] },
        "KSampler/cfg": { "values": [5] },
        "KSampler/steps": { "label": "steps", "values": [20, 30] }
    }"#;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("sweep.json");
    fs::write(&file_path, content).expect("Failed to write temp file");

    let config = loader::load_sweep_config(&file_path).expect("Failed to load config");

    let keys: Vec<&str> = config.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["KSampler/steps", "KSampler/cfg"]);

    let steps = config.get("KSampler/steps").expect("steps axis");
    assert_eq!(steps.label(), Some("steps"));
    assert_eq!(steps.values, vec![SweepValue::Scalar(json!(20)), SweepValue::Scalar(json!(30))]);
}

#[test]
fn test_load_workflow() {
    let content = r#"{
        "3": { "class_type": "KSampler", "inputs": { "steps": 20 }, "_meta": { "title": "KSampler" } },
        "9": { "class_type": "SaveImage", "inputs": { "filename_prefix": "ComfyUI" }, "_meta": { "title": "Save" } }
    }"#;

    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let file_path = temp_dir.path().join("workflow.json");
    fs::write(&file_path, content).expect("Failed to write temp file");

    let workflow = loader::load_workflow(&file_path).expect("Failed to load workflow");
    assert_eq!(workflow.nodes.len(), 2);
    assert_eq!(workflow.extract_existing_inputs("KSampler/steps"), json!(20));
}

#[test]
fn test_malformed_inputs_fail() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let bad_json = temp_dir.path().join("bad.json");
    fs::write(&bad_json, "{ not json").expect("Failed to write temp file");
    assert!(loader::load_workflow(&bad_json).is_err());
    assert!(loader::load_sweep_config(&bad_json).is_err());

    let missing_values = temp_dir.path().join("missing.json");
    fs::write(&missing_values, r#"{ "KSampler/steps": { "label": "steps" } }"#).expect("Failed to write temp file");
    assert!(loader::load_sweep_config(&missing_values).is_err());

    let absent = temp_dir.path().join("absent.json");
    let err = loader::load_workflow(&absent).unwrap_err();
    assert!(err.to_string().contains("absent.json"));
}
