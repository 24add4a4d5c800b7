/*!
 * Prompt templates and request payload builders for batch translation.
 *
 * The system prompt is selected by the source/target language pair and pins
 * the response contract: the model must answer with a JSON object of the
 * form `{"translations": [{"id": 0, "text": "..."}, ...]}` and nothing else.
 * The user content carries the rolling context plus the batch items tagged
 * with local 0-based ids.
 */

use serde_json::json;

use crate::language_utils::get_language_name;
use crate::transcript::TimedSegment;

/// System prompt for Korean-to-English subtitle translation
const SYSTEM_PROMPT_KO_TO_EN: &str = "\
You are an expert Korean-to-English subtitle translator.

Rules:
1. Translate into natural, fluent English
2. Render technical terms with their standard English equivalents
3. Paraphrase colloquial expressions so they read naturally
4. Return only the translations as a JSON object

Output format:
{
  \"translations\": [
    {\"id\": 0, \"text\": \"Translated text\"},
    {\"id\": 1, \"text\": \"Translated text\"}
  ]
}

Return JSON only. Do not include any other explanation.";

/// Generic system prompt template for other language directions
const SYSTEM_PROMPT_GENERIC: &str = "\
You are an expert {source}-to-{target} subtitle translator.

Rules:
1. Translate into natural, fluent {target}
2. Keep the original meaning and tone; paraphrase colloquial expressions
3. Where a technical term has no common {target} equivalent, keep the original term in parentheses
4. Return only the translations as a JSON object

Output format:
{
  \"translations\": [
    {\"id\": 0, \"text\": \"Translated text\"},
    {\"id\": 1, \"text\": \"Translated text\"}
  ]
}

Return JSON only. Do not include any other explanation.";

/// Select the system prompt for a translation direction.
///
/// Korean-to-English gets a dedicated prompt; every other direction uses the
/// generic template with the language names filled in. Unknown codes fall
/// back to the raw code so prompt building never fails.
pub fn system_prompt(source_language: &str, target_language: &str) -> String {
    if source_language == "ko" && target_language == "en" {
        return SYSTEM_PROMPT_KO_TO_EN.to_string();
    }

    let source = get_language_name(source_language)
        .unwrap_or_else(|_| source_language.to_string());
    let target = get_language_name(target_language)
        .unwrap_or_else(|_| target_language.to_string());

    SYSTEM_PROMPT_GENERIC
        .replace("{source}", &source)
        .replace("{target}", &target)
}

/// Build the user content for one batch request.
///
/// Items are tagged with local 0-based ids; the model is expected to echo
/// those ids back so the response can be re-indexed regardless of order.
pub fn batch_user_content(batch: &[TimedSegment], context: &str) -> String {
    let items: Vec<_> = batch
        .iter()
        .enumerate()
        .map(|(id, segment)| json!({"id": id, "text": segment.text}))
        .collect();
    let items_json = serde_json::to_string_pretty(&items)
        .unwrap_or_else(|_| "[]".to_string());

    if context.is_empty() {
        format!("Subtitles to translate:\n{}", items_json)
    } else {
        format!(
            "Previous context: \"{}\"\n\nSubtitles to translate:\n{}",
            context, items_json
        )
    }
}
