//! Pieces shared by the lesson and paper handlers.

use axum::extract::Multipart;
use common::storage::MediaUpload;
use sea_orm::sea_query::{Query as SeaQuery, SelectStatement};
use sea_orm::*;

use crate::entity::class;
use crate::error::AppError;
use crate::handlers::class::enrolled_class_ids;
use crate::models::material::MaterialForm;
use crate::utils::upload::{UploadRule, multipart_error, read_upload_field};

/// Name of the multipart field carrying the PDF.
pub const FILE_FIELD: &str = "file";

/// Read a material upload form: the text fields plus one gated file.
///
/// The whole form is read and validated before anything is uploaded, so a
/// rejected form never leaves a stored file behind.
pub async fn read_material_form(
    mut multipart: Multipart,
    rule: &UploadRule,
) -> Result<(MaterialForm, MediaUpload), AppError> {
    let mut form = MaterialForm::default();
    let mut upload: Option<MediaUpload> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if name == FILE_FIELD {
            if upload.is_some() {
                return Err(AppError::Validation("Only one file may be uploaded".into()));
            }
            upload = Some(read_upload_field(field, rule).await?);
        } else {
            let text = field.text().await.map_err(multipart_error)?;
            form.set(&name, text); // unknown fields are ignored
        }
    }

    form.validate()?;
    let upload = upload.ok_or_else(|| AppError::Validation("Please upload a file".into()))?;
    Ok((form, upload))
}

/// Response message after deleting a material.
pub fn deleted_message(noun: &str, file_removed: bool) -> String {
    if file_removed {
        format!("{noun} deleted successfully")
    } else {
        format!("{noun} deleted successfully. The stored file may still exist.")
    }
}

/// `SELECT teacher_id FROM class WHERE id IN (<classes the student is enrolled in>)`
///
/// Students see material published by the teachers of their classes.
pub fn teachers_of_student(student_id: i32) -> SelectStatement {
    SeaQuery::select()
        .column(class::Column::TeacherId)
        .from(class::Entity)
        .and_where(class::Column::Id.in_subquery(enrolled_class_ids(student_id)))
        .to_owned()
}
