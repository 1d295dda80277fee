//! Domain entities - the core business objects.

mod pagination;
mod post;
mod session;
mod validation;

pub use pagination::{PageWindow, Paginator};
pub use post::{Post, PostColumn, PostId};
pub use session::{LOGGED_IN_KEY, Session, is_logged_in};
pub use validation::{
    PUBLISHED_AT_FORMAT, ValidationError, format_published_at, parse_published_at,
};
