use serde::Serialize;

use crate::domain::user::Viewer;
use crate::forms::users::AvatarForm;
use crate::media::ImageStore;
use crate::repository::{SubscriptionReader, UserReader, UserWriter};
use crate::services::recipes::{AuthorView, discard_image};
use crate::services::{ServiceError, ServiceResult};

/// Answer to an avatar upload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AvatarView {
    pub avatar: String,
}

/// Public profile of `user_id` with `is_subscribed` relative to the viewer.
pub fn get_user_profile<R>(repo: &R, viewer: Viewer, user_id: i32) -> ServiceResult<AuthorView>
where
    R: UserReader + SubscriptionReader + ?Sized,
{
    let user = repo.get_user_by_id(user_id)?.ok_or(ServiceError::NotFound)?;

    let is_subscribed = match viewer.user_id() {
        Some(viewer_id) if viewer_id != user.id => repo.is_subscribed(viewer_id, user.id)?,
        _ => false,
    };

    Ok(AuthorView::new(user, is_subscribed))
}

/// Profile of the viewer itself.
pub fn current_user<R>(repo: &R, viewer: Viewer) -> ServiceResult<AuthorView>
where
    R: UserReader + SubscriptionReader + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;
    get_user_profile(repo, viewer, user_id)
}

/// Replaces the viewer's avatar. The previous file is removed once the new
/// reference is stored.
pub fn set_avatar<R>(
    repo: &R,
    images: &dyn ImageStore,
    viewer: Viewer,
    form: AvatarForm,
) -> ServiceResult<AvatarView>
where
    R: UserReader + UserWriter + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;
    let user = repo.get_user_by_id(user_id)?.ok_or(ServiceError::NotFound)?;

    let upload = form.into_upload()?;
    let avatar = images.store(&upload).map_err(|err| {
        log::error!("Failed to store avatar: {err}");
        ServiceError::Internal(err.to_string())
    })?;

    if let Err(err) = repo.set_avatar(user_id, Some(avatar.clone())) {
        discard_image(images, &avatar);
        return Err(ServiceError::from(err));
    }

    if let Some(previous) = user.avatar {
        discard_image(images, &previous);
    }

    Ok(AvatarView { avatar })
}

/// Clears the viewer's avatar; a viewer without one is left as is.
pub fn remove_avatar<R>(repo: &R, images: &dyn ImageStore, viewer: Viewer) -> ServiceResult<()>
where
    R: UserReader + UserWriter + ?Sized,
{
    let user_id = viewer.user_id().ok_or(ServiceError::Unauthorized)?;
    let user = repo.get_user_by_id(user_id)?.ok_or(ServiceError::NotFound)?;

    let Some(previous) = user.avatar else {
        return Ok(());
    };

    repo.set_avatar(user_id, None)?;
    discard_image(images, &previous);

    Ok(())
}
