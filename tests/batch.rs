use filelens::{PreviewConfig, PreviewRuntime, run_batch};
use serde_json::Value;

const DESCRIPTORS: &str = include_str!("fixtures/descriptors.json");

fn run(config: PreviewConfig) -> (Vec<Value>, filelens::BatchReport) {
    let runtime = PreviewRuntime::from_config(config).expect("runtime");
    let mut output = Vec::new();
    let report = run_batch(&runtime, DESCRIPTORS.as_bytes(), &mut output).expect("batch");
    let results: Vec<Value> = serde_json::from_slice(&output).expect("results are a json array");
    (results, report)
}

#[test]
fn batch_resolves_every_descriptor_and_cleans_up() {
    let (results, report) = run(PreviewConfig::default());

    assert_eq!(report.files, 5);
    assert_eq!(report.cleanup_failures, 0);
    assert_eq!(report.live_object_urls, 0);
    assert_eq!(results.len(), 5);

    let photo = &results[0];
    assert_eq!(photo["type_inference"]["type_id"], "image");
    assert_eq!(photo["type_inference"]["provenance"], "extension");
    assert_eq!(photo["data_source"]["source_kind"], "url");
    assert_eq!(photo["data_source"]["preview_capability"], "basic");
    assert_eq!(photo["preview_mode"], "modal");

    let notes = &results[1];
    assert_eq!(notes["type_inference"]["type_id"], "markdown");
    assert_eq!(notes["data_source"]["source_kind"], "content");
    assert_eq!(notes["data_source"]["inline_content"], "# Hello");
    assert_eq!(notes["data_source"]["needs_cleanup"], true);
    assert!(
        notes["data_source"]["preview_url"]
            .as_str()
            .expect("object url")
            .starts_with("blob:filelens/")
    );
    assert_eq!(notes["preview_mode"], "inline");

    let scan = &results[2];
    assert_eq!(scan["type_inference"]["type_id"], "image");
    assert_eq!(scan["type_inference"]["provenance"], "mime-type");
    assert_eq!(scan["type_inference"]["confidence"], "high");
    assert_eq!(scan["data_source"]["source_kind"], "blob");
    assert_eq!(scan["data_source"]["preview_capability"], "full");
    assert_eq!(scan["data_source"]["mime_type"], "image/png");

    let fallback = &results[4];
    assert_eq!(fallback["type_inference"]["type_id"], "plainText");
    assert_eq!(fallback["type_inference"]["provenance"], "fallback");
    assert_eq!(fallback["can_preview"], false);
    assert_eq!(fallback["preview_mode"], "none");
}

#[test]
fn empty_content_falls_through_to_url() {
    let (results, _) = run(PreviewConfig::default());

    let readme = &results[3];
    assert_eq!(readme["type_inference"]["type_id"], "markdown");
    assert_eq!(readme["data_source"]["source_kind"], "url");
    assert_eq!(readme["data_source"]["preview_capability"], "none");
    assert_eq!(readme["data_source"]["preview_url"], "https://x/readme.md");
    assert_eq!(readme["data_source"]["needs_cleanup"], false);
    assert!(readme["data_source"].get("inline_content").is_none());
    assert_eq!(readme["can_preview"], false);
}

#[test]
fn batch_without_object_urls_keeps_results_previewable() {
    let (results, report) = run(PreviewConfig {
        object_urls: false,
        ..Default::default()
    });

    assert_eq!(report.live_object_urls, 0);
    let notes = &results[1];
    assert!(notes["data_source"].get("preview_url").is_none());
    assert_eq!(notes["data_source"]["inline_content"], "# Hello");
    assert_eq!(notes["can_preview"], true);
}
