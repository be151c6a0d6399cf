//! 错误处理集成测试
//!
//! 测试请求边界、正文提取和配置加载的错误路径

use std::io::Write;

use restyler::config::ConfigManager;
use restyler::core::extract_body;
use restyler::error::{ErrorCategory, RestyleError};
use restyler::request::{handle, process_batch, BatchItem, Operation, TransformRequest};

#[allow(dead_code)]
mod common {
    include!("common/mod.rs");
}

use common::{HtmlTestHelper, TestConfigBuilder};

fn missing_field(op: Operation, request: &TransformRequest) -> String {
    let config = TestConfigBuilder::new().build();
    match handle(op, request, &config) {
        Err(RestyleError::MissingInput(field)) => field,
        other => panic!("expected MissingInput for {}, got {:?}", op, other),
    }
}

#[test]
fn test_missing_input_per_operation() {
    let empty = TransformRequest::default();

    assert_eq!(missing_field(Operation::Sanitize, &empty), "html");
    assert_eq!(missing_field(Operation::ExtractBody, &empty), "html");
    assert_eq!(missing_field(Operation::RestoreStyles, &empty), "original_html");
    assert_eq!(missing_field(Operation::RebuildStyles, &empty), "original_body");
    assert_eq!(missing_field(Operation::RewriteLinks, &empty), "html");

    let request = TransformRequest {
        original_body: Some("<p>a</p>".to_string()),
        translated_text: Some("\n".to_string()),
        ..Default::default()
    };
    assert_eq!(missing_field(Operation::RebuildStyles, &request), "translated_text");
}

#[test]
fn test_extract_body_requires_body_tag() {
    for html in ["", "<p>fragment</p>", "<html><head></head></html>", "<div>body text</div>"] {
        let err = extract_body(html).unwrap_err();
        assert!(matches!(err, RestyleError::NoBody), "{:?}", html);
        assert!(err.is_client_error());
        assert_eq!(err.category(), ErrorCategory::Input);
    }

    let extracted = extract_body(&HtmlTestHelper::create_styled_page()).unwrap();
    assert!(extracted.original_body.contains("class=\"page\""));
    assert!(extracted.clean_body.starts_with("<body>"));
    assert!(!extracted.clean_body.contains("href="));
}

#[test]
fn test_malformed_markup_is_not_an_error() {
    let config = TestConfigBuilder::new().with_site_domain("example.com").build();

    for html in ["<div>Unclosed div", "<html><>Invalid tag</>", "</p></p>", "<<<>>>"] {
        for op in [Operation::Sanitize, Operation::RewriteLinks] {
            let request = TransformRequest {
                html: Some(html.to_string()),
                lang: Some("de".to_string()),
                ..Default::default()
            };
            let response = handle(op, &request, &config).unwrap();
            assert!(response.success);
        }
    }
}

#[test]
fn test_batch_failures_do_not_abort() {
    let config = TestConfigBuilder::new().with_worker_threads(3).build();

    let items: Vec<BatchItem> = (0..20)
        .map(|i| BatchItem {
            op: if i % 4 == 0 {
                Operation::ExtractBody
            } else {
                Operation::Sanitize
            },
            request: TransformRequest {
                html: Some(format!("<p class=\"c{}\">item {}</p>", i, i)),
                ..Default::default()
            },
        })
        .collect();

    let responses = process_batch(&items, &config);
    assert_eq!(responses.len(), items.len());

    for (i, response) in responses.iter().enumerate() {
        if i % 4 == 0 {
            assert!(!response.success);
            assert!(response.error.is_some());
        } else {
            assert!(response.success);
            assert_eq!(
                response.clean_html.as_deref(),
                Some(format!("<p>item {}</p>", i).as_str())
            );
        }
    }
}

#[test]
fn test_invalid_config_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "default_locale = ").unwrap();

    let err = ConfigManager::from_path(file.path().to_str().unwrap()).err().unwrap();
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(!err.is_client_error());

    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    writeln!(file, "{{\"worker_threads\": 0}}").unwrap();
    let err = ConfigManager::from_path(file.path().to_str().unwrap()).err().unwrap();
    assert!(matches!(err, RestyleError::ConfigError(_)));

    let err = ConfigManager::from_path("/nonexistent/restyler.toml").err().unwrap();
    assert!(matches!(err, RestyleError::ConfigError(_)));
}

#[test]
fn test_valid_json_config_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    writeln!(
        file,
        "{{\"default_locale\": \"ka\", \"site_domain\": \"gegidze.com\", \"allowed_attributes\": [\"href\"]}}"
    )
    .unwrap();

    let manager = ConfigManager::from_path(file.path().to_str().unwrap()).unwrap();
    assert_eq!(manager.source(), file.path().to_str());
    let config = manager.get_config();
    assert_eq!(config.site_domain.as_deref(), Some("gegidze.com"));
    assert!(config.allow_list().contains("href"));
    assert!(!config.allow_list().contains("src"));
}
