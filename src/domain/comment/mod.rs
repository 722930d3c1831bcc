mod comment_text;
mod new_comment;
mod tree;
mod types;

pub use comment_text::CommentText;
pub use new_comment::NewComment;
pub use tree::{apply_likes, build_comment_tree, collect_subtree_ids};
pub use types::*;
