// IDE: cargo-fuzz target
// Run with: cargo fuzz run fuzz_comment_json
// Purpose: fuzz CreateCommentPayload JSON -> NewComment::new(review_id, parent_id, content)
#![no_main]

use libfuzzer_sys::fuzz_target;
use revline::domain::NewComment;
use serde_json::Value;

fuzz_target!(|data: &[u8]| {
    if let Ok(v) = serde_json::from_slice::<Value>(data) {
        let review_id = v.get("review_id").and_then(|n| n.as_i64()).unwrap_or(0);
        let parent_id = v.get("parent_id").and_then(|n| n.as_i64());
        let content = v
            .get("content")
            .and_then(|s| s.as_str())
            .unwrap_or("")
            .to_string();

        let _ = NewComment::new(review_id, parent_id, content);
    }
});
