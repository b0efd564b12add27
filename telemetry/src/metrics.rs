use std::time::Duration;

pub const ACTION_BLOCKS_DROPPED: &str = "kliniq_action_blocks_dropped_total";
pub const ACTIONS_DISPATCHED: &str = "kliniq_actions_dispatched_total";
pub const TRANSCRIPT_CACHE: &str = "kliniq_transcript_cache_total";
pub const TRANSLATION_FALLBACKS: &str = "kliniq_translation_fallbacks_total";
pub const INFERENCE_DURATION: &str = "kliniq_inference_duration_seconds";

/// Malformed action-call blocks silently dropped by the extractor
pub fn record_dropped_action_blocks(count: usize) {
    if count == 0 {
        return;
    }
    ::metrics::counter!(ACTION_BLOCKS_DROPPED).increment(count as u64);
}

pub fn record_action_dispatched(action: &str, success: bool) {
    let outcome = if success { "success" } else { "failure" };
    ::metrics::counter!(ACTIONS_DISPATCHED, "action" => action.to_string(), "outcome" => outcome)
        .increment(1);
}

pub fn record_transcript_cache(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    ::metrics::counter!(TRANSCRIPT_CACHE, "result" => result).increment(1);
}

pub fn record_translation_fallback(language: &'static str) {
    ::metrics::counter!(TRANSLATION_FALLBACKS, "language" => language).increment(1);
}

pub fn record_inference_duration(elapsed: Duration, success: bool) {
    let outcome = if success { "success" } else { "error" };
    ::metrics::histogram!(INFERENCE_DURATION, "outcome" => outcome).record(elapsed.as_secs_f64());
}
