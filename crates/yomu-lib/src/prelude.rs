pub use crate::comment::{CommentNode, build_tree};
pub use crate::error::{Error, Result};
pub use crate::models::*;
pub use crate::notification::Inbox;
pub use crate::search::{SearchFilter, SortBy};
pub use crate::stomp::{Command, Frame};
pub use crate::upload::{natural_cmp, sort_pages};
