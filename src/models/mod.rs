//! Data models
//!
//! Database entities (User, Session, Album, Photo, Video, Tag, Comment)
//! plus the shared pagination containers.

mod album;
mod comment;
mod media;
mod paging;
mod session;
mod tag;
mod user;

pub use album::{Album, AlbumVisibility};
pub use comment::{Comment, CommentWithAuthor};
pub use media::{thumbnail_name, MediaItem, MediaKind, Photo, Video};
pub use paging::{ListParams, PagedResult};
pub use session::Session;
pub use tag::Tag;
pub use user::{User, UserRole};
