use crate::domain::tag::Tag;
use crate::forms::tags::{AddTagForm, EditTagForm};
use crate::repository::{TagReader, TagWriter};
use crate::services::{ServiceError, ServiceResult};

/// Lists every tag ordered by name.
pub fn list_tags<R>(repo: &R) -> ServiceResult<Vec<Tag>>
where
    R: TagReader + ?Sized,
{
    repo.list_tags().map_err(ServiceError::from)
}

pub fn get_tag<R>(repo: &R, tag_id: i32) -> ServiceResult<Tag>
where
    R: TagReader + ?Sized,
{
    repo.get_tag_by_id(tag_id)?.ok_or(ServiceError::NotFound)
}

pub fn get_tag_by_slug<R>(repo: &R, slug: &str) -> ServiceResult<Tag>
where
    R: TagReader + ?Sized,
{
    repo.get_tag_by_slug(slug)?.ok_or(ServiceError::NotFound)
}

/// Adds a tag; a clash on name or slug is reported as `AlreadyExists`.
pub fn create_tag<R>(repo: &R, form: AddTagForm) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    let new_tag = form.into_new_tag()?;
    repo.create_tag(&new_tag).map_err(ServiceError::from)
}

/// Renames a tag, keeping its slug.
pub fn rename_tag<R>(repo: &R, tag_id: i32, form: EditTagForm) -> ServiceResult<Tag>
where
    R: TagWriter + ?Sized,
{
    let update = form.into_update_tag()?;
    repo.update_tag(tag_id, &update).map_err(ServiceError::from)
}

/// Deletes a tag no recipe uses; otherwise fails with `InUse`.
pub fn remove_tag<R>(repo: &R, tag_id: i32) -> ServiceResult<()>
where
    R: TagWriter + ?Sized,
{
    repo.delete_tag(tag_id).map_err(ServiceError::from)
}
