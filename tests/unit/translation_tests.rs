/*!
 * Unit tests for the batch translation pipeline
 */

use std::sync::Arc;
use std::time::Duration;

use aiscribe::app_config::{GenerationConfig, PipelineConfig, RetryConfig};
use aiscribe::translation::Translator;

use crate::common::make_segments;
use crate::common::mock_providers::{MockBehavior, MockErrorKind, MockGenerationProvider};

fn pipeline(batch_size: usize, context_size: usize, concurrent_batches: usize) -> PipelineConfig {
    PipelineConfig {
        batch_size,
        context_size,
        concurrent_batches,
    }
}

fn no_backoff() -> RetryConfig {
    RetryConfig {
        max_attempts: 3,
        base_delay_ms: 0,
    }
}

fn translator(provider: Arc<MockGenerationProvider>, pipeline: &PipelineConfig) -> Translator {
    Translator::new(provider, pipeline, &no_backoff(), &GenerationConfig::default())
}

#[tokio::test]
async fn test_translateSegments_withHealthyProvider_shouldTranslateEverySegment() {
    let segments = make_segments(&["one", "two", "three", "four", "five"]);
    let provider = Arc::new(MockGenerationProvider::new());
    let translator = translator(provider.clone(), &pipeline(2, 2, 3));

    let result = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(result.len(), segments.len());
    for (segment, translated) in segments.iter().zip(&result) {
        assert_eq!(translated.start, segment.start);
        assert_eq!(translated.end, segment.end);
        assert_eq!(translated.original_text, segment.text);
        assert_eq!(translated.translated_text, format!("{}-translated", segment.text));
    }
}

#[test]
fn test_translateSegments_withEmptyInput_shouldReturnEmptyWithoutCalls() {
    let provider = Arc::new(MockGenerationProvider::new());
    let translator = translator(provider.clone(), &pipeline(2, 2, 3));

    let result = tokio_test::block_on(translator.translate_segments(&[], "en", "ko"));

    assert!(result.is_empty());
    assert_eq!(provider.tracker().lock().unwrap().call_count(), 0);
}

#[tokio::test]
async fn test_translateSegments_withParseError_shouldFallBackToOriginalText() {
    let segments = make_segments(&["alpha", "beta", "gamma"]);
    let provider = Arc::new(MockGenerationProvider::failing_with(MockErrorKind::Parse));
    let translator = translator(provider.clone(), &pipeline(2, 2, 3));

    let result = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(result.len(), segments.len());
    for (segment, translated) in segments.iter().zip(&result) {
        assert_eq!(translated.translated_text, segment.text);
        assert_eq!(translated.original_text, segment.text);
    }
    // Parse errors are terminal, not retryable
    assert_eq!(provider.tracker().lock().unwrap().call_count(), 2);
}

#[tokio::test]
async fn test_translateSegments_withApiError_shouldFallBackWithoutRetrying() {
    let segments = make_segments(&["alpha", "beta"]);
    let provider = Arc::new(MockGenerationProvider::failing_with(MockErrorKind::Api));
    let translator = translator(provider.clone(), &pipeline(10, 2, 3));

    let result = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].translated_text, "alpha");
    assert_eq!(result[1].translated_text, "beta");
    assert_eq!(provider.tracker().lock().unwrap().call_count(), 1);
}

#[tokio::test]
async fn test_translateSegments_withPersistentConnectionError_shouldExhaustRetriesThenFallBack() {
    let segments = make_segments(&["alpha"]);
    let provider = Arc::new(MockGenerationProvider::failing_with(MockErrorKind::Connection));
    let translator = translator(provider.clone(), &pipeline(10, 2, 3));

    let result = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(result[0].translated_text, "alpha");
    // One batch, three attempts, then fallback
    assert_eq!(provider.tracker().lock().unwrap().call_count(), 3);
}

#[tokio::test]
async fn test_translateSegments_withTransientConnectionError_shouldRetryThenSucceed() {
    let segments = make_segments(&["alpha", "beta"]);
    let provider = Arc::new(
        MockGenerationProvider::new().with_script(vec![
            MockBehavior::Fail(MockErrorKind::Connection),
            MockBehavior::Translate,
        ]),
    );
    let translator = translator(provider.clone(), &pipeline(10, 2, 3));

    let result = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(result[0].translated_text, "alpha-translated");
    assert_eq!(result[1].translated_text, "beta-translated");
    assert_eq!(provider.tracker().lock().unwrap().call_count(), 2);
}

#[tokio::test]
async fn test_translateSegments_withSlowFirstBatch_shouldPreserveSegmentOrder() {
    let segments = make_segments(&["one", "two", "three", "four", "five", "six"]);
    let provider = Arc::new(
        MockGenerationProvider::new().with_latency_for("one", Duration::from_millis(50)),
    );
    let translator = translator(provider, &pipeline(2, 2, 3));

    let result = translator.translate_segments(&segments, "en", "ko").await;

    let texts: Vec<&str> = result.iter().map(|t| t.translated_text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "one-translated",
            "two-translated",
            "three-translated",
            "four-translated",
            "five-translated",
            "six-translated",
        ]
    );
}

#[tokio::test]
async fn test_translateSegments_withSlowLastBatch_shouldPreserveSegmentOrder() {
    let segments = make_segments(&["one", "two", "three", "four", "five", "six"]);
    let provider = Arc::new(
        MockGenerationProvider::new().with_latency_for("five", Duration::from_millis(50)),
    );
    let translator = translator(provider, &pipeline(2, 2, 3));

    let result = translator.translate_segments(&segments, "en", "ko").await;

    let texts: Vec<&str> = result.iter().map(|t| t.translated_text.as_str()).collect();
    assert_eq!(texts[0], "one-translated");
    assert_eq!(texts[4], "five-translated");
    assert_eq!(texts[5], "six-translated");
}

#[tokio::test]
async fn test_translateSegments_acrossRounds_shouldCarryTrailingContext() {
    // batch_size 2, concurrent 2: round 1 covers [a b] [c d], round 2 covers [e]
    let segments = make_segments(&["a", "b", "c", "d", "e"]);
    let provider = Arc::new(MockGenerationProvider::new());
    let translator = translator(provider.clone(), &pipeline(2, 2, 2));

    translator.translate_segments(&segments, "en", "ko").await;

    let tracker = provider.tracker();
    let tracker = tracker.lock().unwrap();
    assert_eq!(tracker.call_count(), 3);

    // Both round-one batches start with no context; only the second round
    // carries one, taken from the trailing originals of round one's last batch
    let contexts = tracker.contexts();
    assert_eq!(contexts, vec!["c d"]);
}

#[tokio::test]
async fn test_translateSegments_withFailedContextBatch_shouldCarryOriginalTextContext() {
    // Round one: [a b] [c d] with the second batch failing; round two: [e].
    // Context always comes from original text, so the failure cannot poison it.
    let segments = make_segments(&["a", "b", "c", "d", "e"]);
    let provider = Arc::new(
        MockGenerationProvider::new().with_script(vec![
            MockBehavior::Translate,
            MockBehavior::Fail(MockErrorKind::Api),
        ]),
    );
    let translator = translator(provider.clone(), &pipeline(2, 2, 2));

    let result = translator.translate_segments(&segments, "en", "ko").await;

    assert_eq!(result[2].translated_text, "c");
    assert_eq!(result[3].translated_text, "d");
    assert_eq!(result[4].translated_text, "e-translated");

    let tracker = provider.tracker();
    let contexts = tracker.lock().unwrap().contexts();
    assert_eq!(contexts, vec!["c d"]);
}

#[tokio::test]
async fn test_translateSegments_withKoreanSource_shouldUseDedicatedPrompt() {
    let segments = make_segments(&["안녕하세요"]);
    let provider = Arc::new(MockGenerationProvider::new());
    let translator = translator(provider.clone(), &pipeline(10, 2, 3));

    translator.translate_segments(&segments, "ko", "en").await;

    let tracker = provider.tracker();
    let tracker = tracker.lock().unwrap();
    assert!(tracker.calls[0].system_prompt.contains("Korean"));
    assert!(tracker.calls[0].system_prompt.contains("English"));
}
