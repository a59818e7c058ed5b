//! Access policy
//!
//! Pure authorization rules over (actor, resource) pairs. Keeping these
//! as plain functions makes the rules trivial to test and keeps the
//! services free of ad-hoc role checks.

use crate::models::{Album, User, UserRole};

/// Whether the actor may edit or delete a resource owned by `owner_id`.
///
/// Owners and admins only.
pub fn can_manage(actor: &User, owner_id: i64) -> bool {
    actor.is_admin() || actor.id == owner_id
}

/// Whether the viewer may see an album and its contents.
///
/// Public albums are visible to everyone, anonymous viewers included.
/// Private albums are visible to the owner and admins.
pub fn can_view_album(viewer: Option<&User>, album: &Album) -> bool {
    if album.is_public() {
        return true;
    }
    match viewer {
        Some(user) => can_manage(user, album.user_id),
        None => false,
    }
}

/// Whether the actor may delete a comment written by `author_id`.
///
/// Comment authors and admins only.
pub fn can_delete_comment(actor: &User, author_id: i64) -> bool {
    actor.is_admin() || actor.id == author_id
}

/// Whether the actor may assign `role` to the user with `target_id`.
///
/// Admins only, and an admin may not demote themselves. Rejecting
/// self-demotion keeps at least the acting admin in place.
pub fn can_assign_role(actor: &User, target_id: i64, role: UserRole) -> bool {
    if !actor.is_admin() {
        return false;
    }
    !(actor.id == target_id && role != UserRole::Admin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AlbumVisibility;

    fn user(id: i64, role: UserRole) -> User {
        let mut u = User::new(
            format!("User {}", id),
            format!("user{}@example.com", id),
            "hash".to_string(),
            role,
        );
        u.id = id;
        u
    }

    fn album(owner_id: i64, visibility: AlbumVisibility) -> Album {
        let mut a = Album::new("Album".to_string(), String::new(), visibility, owner_id);
        a.id = 1;
        a
    }

    #[test]
    fn test_owner_can_manage() {
        let owner = user(1, UserRole::Student);
        assert!(can_manage(&owner, 1));
        assert!(!can_manage(&owner, 2));
    }

    #[test]
    fn test_admin_can_manage_anything() {
        let admin = user(1, UserRole::Admin);
        assert!(can_manage(&admin, 99));
    }

    #[test]
    fn test_editor_has_no_extra_rights() {
        let editor = user(1, UserRole::Editor);
        assert!(!can_manage(&editor, 2));
    }

    #[test]
    fn test_public_album_visible_to_all() {
        let a = album(1, AlbumVisibility::Public);
        assert!(can_view_album(None, &a));
        assert!(can_view_album(Some(&user(2, UserRole::Student)), &a));
    }

    #[test]
    fn test_private_album_owner_and_admin_only() {
        let a = album(1, AlbumVisibility::Private);
        assert!(!can_view_album(None, &a));
        assert!(can_view_album(Some(&user(1, UserRole::Student)), &a));
        assert!(!can_view_album(Some(&user(2, UserRole::Student)), &a));
        assert!(can_view_album(Some(&user(2, UserRole::Admin)), &a));
    }

    #[test]
    fn test_comment_deletion_rights() {
        let author = user(1, UserRole::Student);
        let stranger = user(2, UserRole::Student);
        let admin = user(3, UserRole::Admin);

        assert!(can_delete_comment(&author, 1));
        assert!(!can_delete_comment(&stranger, 1));
        assert!(can_delete_comment(&admin, 1));
    }

    #[test]
    fn test_role_assignment_admin_only() {
        let student = user(1, UserRole::Student);
        assert!(!can_assign_role(&student, 2, UserRole::Editor));

        let admin = user(1, UserRole::Admin);
        assert!(can_assign_role(&admin, 2, UserRole::Editor));
        assert!(can_assign_role(&admin, 2, UserRole::Admin));
    }

    #[test]
    fn test_admin_self_demotion_rejected() {
        let admin = user(1, UserRole::Admin);
        assert!(!can_assign_role(&admin, 1, UserRole::Student));
        assert!(!can_assign_role(&admin, 1, UserRole::Editor));
        // Re-asserting the admin role on yourself is harmless
        assert!(can_assign_role(&admin, 1, UserRole::Admin));
    }
}
