use sea_orm::{ConnectionTrait, EntityTrait, PrimaryKeyTrait};

use crate::entity::{class, lesson, paper, teacher_profile, video};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;

/// A record owned by exactly one teacher.
pub trait Owned {
    /// Human-readable kind used in error messages, e.g. "Lesson".
    const KIND: &'static str;

    fn owner_id(&self) -> i32;
}

impl Owned for class::Model {
    const KIND: &'static str = "Class";
    fn owner_id(&self) -> i32 {
        self.teacher_id
    }
}

impl Owned for lesson::Model {
    const KIND: &'static str = "Lesson";
    fn owner_id(&self) -> i32 {
        self.teacher_id
    }
}

impl Owned for paper::Model {
    const KIND: &'static str = "Paper";
    fn owner_id(&self) -> i32 {
        self.teacher_id
    }
}

impl Owned for video::Model {
    const KIND: &'static str = "Video";
    fn owner_id(&self) -> i32 {
        self.teacher_id
    }
}

impl Owned for teacher_profile::Model {
    const KIND: &'static str = "Profile";
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

/// Fail with `Forbidden` unless `auth_user` owns `record`.
///
/// A record owned by someone else is an authorization failure, not a 404.
pub fn ensure_owner<M: Owned>(record: &M, auth_user: &AuthUser) -> Result<(), AppError> {
    if record.owner_id() == auth_user.user_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "User not authorized to access this {}",
            M::KIND.to_lowercase()
        )))
    }
}

/// Load a record by id and check ownership: `NotFound` when absent,
/// `Forbidden` when it belongs to another teacher.
pub async fn find_owned<E, C>(db: &C, id: i32, auth_user: &AuthUser) -> Result<E::Model, AppError>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Owned,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: From<i32>,
{
    let record = E::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} not found", <E::Model as Owned>::KIND)))?;
    ensure_owner(&record, auth_user)?;
    Ok(record)
}
