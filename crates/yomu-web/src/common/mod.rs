mod bottombar;
pub use bottombar::Bottombar;

mod topbar;
pub use topbar::Topbar;

mod route;
pub use route::{AdminSection, Route};

mod cover;
pub use cover::Cover;

mod spinner;
pub use spinner::Spinner;

mod reader_settings;
pub use reader_settings::*;

pub mod events;

pub mod snackbar;

mod modal;
pub use modal::*;

mod comment_tree;
pub use comment_tree::CommentSection;

mod search_box;
pub use search_box::SearchBox;

mod form;
pub use form::*;

mod manga_form;
pub use manga_form::MangaForm;
