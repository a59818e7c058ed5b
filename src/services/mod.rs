//! Services layer - Business logic
//!
//! This module contains all business logic services for the Photoden
//! gallery. Services are responsible for:
//! - Implementing business rules
//! - Coordinating between repositories and file storage
//! - Handling validation and error cases

pub mod album;
pub mod engagement;
pub mod listing;
pub mod media;
pub mod password;
pub mod policy;
pub mod storage;
pub mod user;

pub use album::{AlbumService, AlbumServiceError, ALBUM_PAGE_SIZE};
pub use engagement::{EngagementService, EngagementServiceError};
pub use listing::{
    merge_recent, parse_search_query, AdminDashboard, GalleryPage, ListingService, MyUploads,
    SearchFilter, UserDashboard, GALLERY_PAGE_SIZE,
};
pub use media::{
    allowed_file, parse_tags, MediaService, MediaServiceError, PhotoDetail, UploadInput,
    VideoDetail, ALLOWED_EXTENSIONS,
};
pub use password::{hash_password, verify_password};
pub use storage::{MediaStorage, StorageUsage};
pub use user::{
    LoginInput, RegisterInput, UpdateProfileInput, UserService, UserServiceError,
};
