pub mod manga;
pub use manga::*;

pub mod chapter;
pub use chapter::*;

pub mod comment;
pub use comment::*;

pub mod notification;
pub use notification::*;

pub mod user;
pub use user::*;

pub mod history;
pub use history::*;

pub mod follow;
pub use follow::*;

pub mod page;
pub use page::*;
