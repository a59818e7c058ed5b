//! Database repositories
//!
//! Repository pattern implementations for database access.
//! Each repository handles CRUD operations for a specific entity.

pub mod album;
pub mod comment;
pub mod like;
pub mod photo;
pub mod session;
pub mod tag;
pub mod user;
pub mod video;

pub use album::{AlbumRepository, SqlxAlbumRepository};
pub use comment::{CommentRepository, SqlxCommentRepository};
pub use like::{LikeRepository, SqlxLikeRepository};
pub use photo::{PhotoRepository, SqlxPhotoRepository};
pub use session::{SessionRepository, SqlxSessionRepository};
pub use tag::{SqlxTagRepository, TagRepository};
pub use user::{SqlxUserRepository, UserRepository};
pub use video::{SqlxVideoRepository, VideoRepository};
