use std::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;
use storyteller_core::{Stories, StoryError};
use tracing::{error, info};

fn color_for_request(request_id: &str) -> u8 {
    let mut hasher = DefaultHasher::new();
    request_id.hash(&mut hasher);
    let hash = hasher.finish();
    // pick one of 216 “cube” colors from 16–231
    16 + (hash % 216) as u8
}

pub fn colored_request_id(request_id: &str) -> String {
    let color = color_for_request(request_id);
    format!("\x1b[38;5;{}mrid={}\x1b[0m", color, request_id)
}

pub fn log_outcome(outcome: &Result<Stories, StoryError>, request_id: &str, elapsed_ms: u128) {
    let request_id = colored_request_id(request_id);
    match outcome {
        Ok(stories) => {
            let chars: usize = stories.variants.iter().map(|s| s.chars().count()).sum();
            info!("{} - Stories: {} ✓ ({} chars, {}ms)",
                request_id, stories.variants.len(), chars, elapsed_ms);
        }
        Err(e) => {
            let error_oneline = e.to_string();
            let error_oneline = error_oneline.lines().next().unwrap_or_default();
            error!("{} - Stories: ✗ {} ({}ms)",
                request_id, error_oneline, elapsed_ms);
        }
    }
}
