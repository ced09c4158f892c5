use axum::{
    Json,
    extract::{Multipart, Path, State},
};
use chrono::{DateTime, Utc};
use common::UserRole;
use common::storage::{MediaKind, MediaUpload};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{class, teacher_profile, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::class::PublicClassItem;
use crate::models::profile::*;
use crate::state::AppState;
use crate::utils::ownership::ensure_owner;
use crate::utils::upload::{
    UploadRule, delete_best_effort, multipart_error, read_upload_field, upload_then_commit,
};

/// Name of the multipart field carrying a profile image.
pub const IMAGE_FIELD: &str = "image";

/// The two replaceable images on a teacher profile.
#[derive(Clone, Copy, Debug)]
enum ProfileImage {
    Logo,
    MainImage,
}

impl ProfileImage {
    fn folder(self) -> &'static str {
        match self {
            Self::Logo => "profile_logos",
            Self::MainImage => "profile_main_images",
        }
    }

    fn current_public_id(self, profile: &teacher_profile::Model) -> &str {
        match self {
            Self::Logo => &profile.logo_public_id,
            Self::MainImage => &profile.main_image_public_id,
        }
    }

    fn set(self, active: &mut teacher_profile::ActiveModel, url: String, public_id: String) {
        match self {
            Self::Logo => {
                active.logo_url = Set(url);
                active.logo_public_id = Set(public_id);
            }
            Self::MainImage => {
                active.main_image_url = Set(url);
                active.main_image_public_id = Set(public_id);
            }
        }
    }
}

fn blank_profile(user_id: i32, now: DateTime<Utc>) -> teacher_profile::ActiveModel {
    teacher_profile::ActiveModel {
        user_id: Set(user_id),
        profile_title: Set(String::new()),
        public_contact_number: Set(String::new()),
        public_email_address: Set(String::new()),
        youtube_video_url: Set(String::new()),
        facebook_url: Set(String::new()),
        youtube_channel_url: Set(String::new()),
        tiktok_url: Set(String::new()),
        instagram_url: Set(String::new()),
        homepage_headline: Set(String::new()),
        homepage_subheadline: Set(String::new()),
        about_text: Set(String::new()),
        logo_url: Set(String::new()),
        logo_public_id: Set(String::new()),
        main_image_url: Set(String::new()),
        main_image_public_id: Set(String::new()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

/// Fetch a teacher's profile, creating an empty one on first access.
///
/// Concurrent first accesses race on the unique `user_id`; the loser's
/// insert is a no-op and both read the same row.
async fn get_or_create_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<teacher_profile::Model, AppError> {
    let find = || {
        teacher_profile::Entity::find().filter(teacher_profile::Column::UserId.eq(user_id))
    };
    if let Some(profile) = find().one(db).await? {
        return Ok(profile);
    }

    let result = teacher_profile::Entity::insert(blank_profile(user_id, Utc::now()))
        .on_conflict(
            OnConflict::column(teacher_profile::Column::UserId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;
    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => {}
        Err(e) => return Err(e.into()),
    }

    find()
        .one(db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Profile for user {user_id} vanished")))
}

async fn read_image_field(mut multipart: Multipart, rule: &UploadRule) -> Result<MediaUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() == Some(IMAGE_FIELD) {
            return read_upload_field(field, rule).await;
        }
    }
    Err(AppError::Validation("Please upload an image".into()))
}

/// Upload the new image, point the profile at it, then drop the old one.
async fn replace_image(
    state: &AppState,
    auth_user: &AuthUser,
    multipart: Multipart,
    image: ProfileImage,
) -> Result<teacher_profile::Model, AppError> {
    auth_user.require_teacher()?;

    let rule = UploadRule::image(&state.config.upload);
    let upload = read_image_field(multipart, &rule).await?;

    let profile = get_or_create_profile(&state.db, auth_user.user_id).await?;
    ensure_owner(&profile, auth_user)?;
    let previous = image.current_public_id(&profile).to_owned();

    let db = &state.db;
    let updated = upload_then_commit(
        state.media.as_ref(),
        upload,
        image.folder(),
        MediaKind::Image,
        |stored| async move {
            let mut active: teacher_profile::ActiveModel = profile.into();
            image.set(&mut active, stored.url, stored.public_id);
            active.updated_at = Set(Utc::now());
            active.update(db).await.map_err(AppError::from)
        },
    )
    .await?;

    if !previous.is_empty() {
        delete_best_effort(state.media.as_ref(), &previous, MediaKind::Image).await;
    }
    Ok(updated)
}

#[utoipa::path(
    get,
    path = "/teacher",
    tag = "Profile",
    operation_id = "getTeacherProfile",
    summary = "Get the caller's teacher profile",
    description = "Creates an empty profile on first access. Teachers only.",
    responses(
        (status = 200, description = "Profile", body = TeacherProfileResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_teacher_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<TeacherProfileResponse>, AppError> {
    auth_user.require_teacher()?;

    let profile = get_or_create_profile(&state.db, auth_user.user_id).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    put,
    path = "/teacher",
    tag = "Profile",
    operation_id = "updateTeacherProfile",
    summary = "Update profile text fields",
    description = "Applies only the fields present in the body; an empty string clears a field.",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = TeacherProfileResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn update_teacher_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<UpdateProfileRequest>,
) -> Result<Json<TeacherProfileResponse>, AppError> {
    auth_user.require_teacher()?;

    let profile = get_or_create_profile(&state.db, auth_user.user_id).await?;
    ensure_owner(&profile, &auth_user)?;
    if payload == UpdateProfileRequest::default() {
        return Ok(Json(profile.into()));
    }

    let mut active: teacher_profile::ActiveModel = profile.into();
    payload.apply(&mut active);
    active.updated_at = Set(Utc::now());

    let model = active.update(&state.db).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    put,
    path = "/teacher/logo",
    tag = "Profile",
    operation_id = "uploadProfileLogo",
    summary = "Replace the profile logo",
    description = "Multipart form with one image in `image`. The previous logo is removed after the profile is saved.",
    request_body(content_type = "multipart/form-data", description = "Logo image"),
    responses(
        (status = 200, description = "Logo replaced", body = TeacherProfileResponse),
        (status = 400, description = "Missing file or not an image (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
        (status = 413, description = "Image too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 500, description = "Storage failure (UPLOAD_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn upload_logo(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TeacherProfileResponse>, AppError> {
    let profile = replace_image(&state, &auth_user, multipart, ProfileImage::Logo).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    put,
    path = "/teacher/main-image",
    tag = "Profile",
    operation_id = "uploadProfileMainImage",
    summary = "Replace the homepage main image",
    description = "Multipart form with one image in `image`. The previous image is removed after the profile is saved.",
    request_body(content_type = "multipart/form-data", description = "Main image"),
    responses(
        (status = 200, description = "Main image replaced", body = TeacherProfileResponse),
        (status = 400, description = "Missing file or not an image (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not a teacher (FORBIDDEN)", body = ErrorBody),
        (status = 413, description = "Image too large (PAYLOAD_TOO_LARGE)", body = ErrorBody),
        (status = 500, description = "Storage failure (UPLOAD_ERROR)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn upload_main_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<TeacherProfileResponse>, AppError> {
    let profile = replace_image(&state, &auth_user, multipart, ProfileImage::MainImage).await?;
    Ok(Json(profile.into()))
}

#[utoipa::path(
    get,
    path = "/public/{user_id}",
    tag = "Profile",
    operation_id = "getPublicProfile",
    summary = "A teacher's public homepage",
    description = "No authentication. Returns the profile, the teacher's name and their classes.",
    params(("user_id" = i32, Path, description = "Teacher's user ID")),
    responses(
        (status = 200, description = "Public profile", body = PublicProfileResponse),
        (status = 404, description = "No such teacher (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(user_id))]
pub async fn public_profile(
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<Json<PublicProfileResponse>, AppError> {
    let teacher = user::Entity::find_by_id(user_id)
        .one(&state.db)
        .await?
        .filter(|u| u.role == UserRole::Teacher)
        .ok_or_else(|| AppError::NotFound("Teacher not found".into()))?;

    let profile = get_or_create_profile(&state.db, teacher.id).await?;

    let classes = class::Entity::find()
        .filter(class::Column::TeacherId.eq(teacher.id))
        .order_by_asc(class::Column::Subject)
        .order_by_asc(class::Column::Grade)
        .order_by_asc(class::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(PublicClassItem::from)
        .collect();

    Ok(Json(PublicProfileResponse {
        teacher_id: teacher.id,
        teacher_name: teacher.name,
        profile: profile.into(),
        classes,
    }))
}
