/*!
 * End-to-end pipeline tests: translation rounds feeding into highlight
 * grounding over the same transcript
 */

use std::sync::Arc;

use aiscribe::app_config::{GenerationConfig, PipelineConfig, RetryConfig};
use aiscribe::transcript::Highlight;
use aiscribe::translation::Translator;

use crate::common::make_segments;
use crate::common::mock_providers::{MockBehavior, MockErrorKind, MockGenerationProvider};

fn no_backoff() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay_ms: 0,
    }
}

#[tokio::test]
async fn test_pipeline_translateThenGround_shouldProduceConsistentOutput() {
    // Twelve 2s segments spanning 0-24s, translated in rounds of 3 batches
    let texts: Vec<String> = (0..12).map(|i| format!("line {}", i)).collect();
    let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
    let segments = make_segments(&text_refs);

    let provider = Arc::new(MockGenerationProvider::new());
    let pipeline = PipelineConfig {
        batch_size: 2,
        context_size: 2,
        concurrent_batches: 3,
    };
    let translator = Translator::new(
        provider.clone(),
        &pipeline,
        &no_backoff(),
        &GenerationConfig::default(),
    );

    let translated = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(translated.len(), 12);
    for (i, item) in translated.iter().enumerate() {
        assert_eq!(item.translated_text, format!("line {}-translated", i));
        assert_eq!(item.start, segments[i].start);
    }

    // 6 batches in rounds of 3; every second-round batch shares the context
    // built from the trailing originals of the first round's last batch
    let tracker = provider.tracker();
    let tracker = tracker.lock().unwrap();
    assert_eq!(tracker.call_count(), 6);
    assert_eq!(tracker.contexts(), vec!["line 4 line 5"; 3]);
    drop(tracker);

    // Ground highlights against the same transcript the translation used
    let highlights = vec![
        Highlight {
            timestamp: 7,
            title: "early".to_string(),
            description: "an early moment".to_string(),
        },
        Highlight {
            timestamp: 500,
            title: "late".to_string(),
            description: "beyond the video".to_string(),
        },
    ];
    let corrected = aiscribe::correct_highlights(&highlights, &segments);

    // 7s sits between segment starts and within the drift threshold
    assert_eq!(corrected[0].timestamp, 7);
    // 500s clamps to the last segment's start (22s)
    assert_eq!(corrected[1].timestamp, 22);
}

#[tokio::test]
async fn test_pipeline_withOneFailingBatchInRound_shouldIsolateTheFailure() {
    // Three single-segment batches in one round; only the middle one fails
    let segments = make_segments(&["first", "second", "third"]);
    let provider = Arc::new(
        MockGenerationProvider::new().with_script(vec![
            MockBehavior::Translate,
            MockBehavior::Fail(MockErrorKind::Api),
            MockBehavior::Translate,
        ]),
    );
    let pipeline = PipelineConfig {
        batch_size: 1,
        context_size: 2,
        concurrent_batches: 3,
    };
    let translator = Translator::new(
        provider.clone(),
        &pipeline,
        &no_backoff(),
        &GenerationConfig::default(),
    );

    let result = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(result.len(), 3);
    assert_eq!(result[0].translated_text, "first-translated");
    assert_eq!(result[1].translated_text, "second");
    assert_eq!(result[2].translated_text, "third-translated");
    assert_eq!(provider.tracker().lock().unwrap().call_count(), 3);
}

#[tokio::test]
async fn test_pipeline_withMalformedModelOutput_shouldFallBackThatBatchOnly() {
    let segments = make_segments(&["a", "b", "c", "d"]);
    // First batch answers prose-shaped JSON with no translations array
    let provider = Arc::new(
        MockGenerationProvider::new().with_script(vec![MockBehavior::Raw(
            serde_json::json!({"answer": "sure, here are the translations"}),
        )]),
    );
    let pipeline = PipelineConfig {
        batch_size: 2,
        context_size: 2,
        concurrent_batches: 1,
    };
    let translator = Translator::new(
        provider,
        &pipeline,
        &no_backoff(),
        &GenerationConfig::default(),
    );

    let result = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(result[0].translated_text, "a");
    assert_eq!(result[1].translated_text, "b");
    assert_eq!(result[2].translated_text, "c-translated");
    assert_eq!(result[3].translated_text, "d-translated");
}
