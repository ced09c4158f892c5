use sea_orm::*;
use sea_orm::sea_query::{Index, IndexCreateStatement, PostgresQueryBuilder};
use tracing::info;

use crate::entity::{attendance, class_student, payment};

/// Name of the unique index that attendance upserts conflict on.
pub const ATTENDANCE_UNIQUE_INDEX: &str = "idx_attendance_student_class_date";

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // One attendance row per (student, class, date). Marking upserts against
    // this index, so failing to create it is fatal.
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name(ATTENDANCE_UNIQUE_INDEX)
        .table(attendance::Entity)
        .col(attendance::Column::StudentId)
        .col(attendance::Column::ClassId)
        .col(attendance::Column::ClassDate)
        .to_string(PostgresQueryBuilder);
    db.execute_unprepared(&stmt).await?;
    info!("Ensured index {} exists", ATTENDANCE_UNIQUE_INDEX);

    // "my classes": SELECT class_id FROM class_student WHERE student_id = ?
    ensure_optional_index(
        db,
        "idx_class_student_student",
        Index::create()
            .if_not_exists()
            .name("idx_class_student_student")
            .table(class_student::Entity)
            .col(class_student::Column::StudentId)
            .to_owned(),
    )
    .await;

    // Teacher revenue chart: WHERE teacher_id = ? AND created_at >= ?
    ensure_optional_index(
        db,
        "idx_payment_teacher_created",
        Index::create()
            .if_not_exists()
            .name("idx_payment_teacher_created")
            .table(payment::Entity)
            .col(payment::Column::TeacherId)
            .col(payment::Column::CreatedAt)
            .to_owned(),
    )
    .await;

    Ok(())
}

async fn ensure_optional_index(db: &DatabaseConnection, name: &str, stmt: IndexCreateStatement) {
    let stmt = stmt.to_string(PostgresQueryBuilder);
    match db.execute_unprepared(&stmt).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => tracing::warn!("Failed to create index {}: {}", name, e),
    }
}
