use crate::common::{TestApp, routes};
use chrono::{Datelike, Months, Utc};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;
use tutordesk_server::entity::payment;
use tutordesk_server::utils::stats::month_label;

mod teacher {
    use super::*;

    #[tokio::test]
    async fn empty_dashboard() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("New Teacher").await;

        let res = app.get_with_token(routes::TEACHER_STATS, &teacher.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["active_classes"], 0);
        assert_eq!(res.body["total_students"], 0);
        assert_eq!(res.body["total_revenue"], 0.0);
        assert_eq!(res.body["monthly_revenue"], json!([]));
    }

    #[tokio::test]
    async fn students_are_counted_once_across_classes() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Union Teacher").await;
        let a = app.student("Union A").await;
        let b = app.student("Union B").await;
        let c = app.student("Union C").await;
        let maths = app.create_class(&teacher.token, "Maths").await;
        let physics = app.create_class(&teacher.token, "Physics").await;
        app.enroll(maths, a.id, &teacher.token).await;
        app.enroll(maths, b.id, &teacher.token).await;
        app.enroll(physics, b.id, &teacher.token).await;
        app.enroll(physics, c.id, &teacher.token).await;

        let res = app.get_with_token(routes::TEACHER_STATS, &teacher.token).await;
        assert_eq!(res.body["active_classes"], 2);
        assert_eq!(res.body["total_students"], 3);
    }

    #[tokio::test]
    async fn payments_in_one_month_share_a_bucket() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Revenue Teacher").await;
        let student = app.student("Revenue Student").await;
        let class_id = app.create_class(&teacher.token, "Maths").await;

        for amount in [1500.0, 1000.0] {
            let res = app
                .post_with_token(
                    routes::PAYMENTS,
                    &json!({
                        "student_id": student.id,
                        "class_id": class_id,
                        "amount": amount,
                        "fee_month": "May",
                        "fee_year": 2025,
                    }),
                    &teacher.token,
                )
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
        }

        let res = app.get_with_token(routes::TEACHER_STATS, &teacher.token).await;
        assert_eq!(res.body["total_revenue"], 2500.0);
        let months = res.body["monthly_revenue"].as_array().unwrap();
        assert_eq!(months.len(), 1);
        assert_eq!(months[0]["revenue"], 2500.0);
    }

    #[tokio::test]
    async fn monthly_revenue_skips_payments_older_than_six_months() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Window Teacher").await;
        let student = app.student("Window Payer").await;
        let class_id = app.create_class(&teacher.token, "Maths").await;

        let res = app
            .post_with_token(
                routes::PAYMENTS,
                &json!({
                    "student_id": student.id,
                    "class_id": class_id,
                    "amount": 1000.0,
                    "fee_month": "Now",
                    "fee_year": 2026,
                }),
                &teacher.token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let old = Utc::now().checked_sub_months(Months::new(8)).unwrap();
        payment::ActiveModel {
            student_id: Set(student.id),
            teacher_id: Set(teacher.id),
            class_id: Set(class_id),
            amount: Set(400.0),
            fee_month: Set("Old".into()),
            fee_year: Set(old.year()),
            payment_date: Set(old),
            created_at: Set(old),
            updated_at: Set(old),
            ..Default::default()
        }
        .insert(&app.db)
        .await
        .unwrap();

        let res = app.get_with_token(routes::TEACHER_STATS, &teacher.token).await;
        assert_eq!(res.body["total_revenue"], 1400.0);
        let now = Utc::now();
        assert_eq!(
            res.body["monthly_revenue"],
            json!([{ "label": month_label(now.year(), now.month()), "revenue": 1000.0 }])
        );
    }

    #[tokio::test]
    async fn students_are_refused() {
        let app = TestApp::spawn().await;
        let student = app.student("Snooping Student").await;

        let res = app.get_with_token(routes::TEACHER_STATS, &student.token).await;
        assert_eq!(res.status, 403);
    }
}

mod student {
    use super::*;

    #[tokio::test]
    async fn no_attendance_means_full_attendance() {
        let app = TestApp::spawn().await;
        let student = app.student("Blank Student").await;

        let res = app.get_with_token(routes::STUDENT_STATS, &student.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["attendance_percentage"], 100);
        assert_eq!(res.body["enrolled_classes_count"], 0);
        assert!(res.body["last_fee_paid"].is_null());
        assert_eq!(res.body["monthly_attendance"], json!([]));
    }

    #[tokio::test]
    async fn three_of_four_present_is_seventy_five() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Register Teacher").await;
        let student = app.student("Mostly Present").await;
        let class_id = app.create_class(&teacher.token, "Maths").await;
        app.enroll(class_id, student.id, &teacher.token).await;

        let days = [
            ("2025-06-02", "Present"),
            ("2025-06-09", "Present"),
            ("2025-06-16", "Absent"),
            ("2025-06-23", "Present"),
        ];
        for (date, status) in days {
            let res = app
                .post_with_token(
                    routes::ATTENDANCE,
                    &json!({
                        "class_id": class_id,
                        "class_date": date,
                        "records": [{ "student_id": student.id, "status": status }],
                    }),
                    &teacher.token,
                )
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
        }

        let res = app.get_with_token(routes::STUDENT_STATS, &student.token).await;
        assert_eq!(res.body["attendance_percentage"], 75);
        assert_eq!(res.body["enrolled_classes_count"], 1);
    }

    #[tokio::test]
    async fn monthly_attendance_covers_only_the_trailing_window() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Trailing Teacher").await;
        let student = app.student("Trailing Student").await;
        let class_id = app.create_class(&teacher.token, "Maths").await;
        app.enroll(class_id, student.id, &teacher.token).await;

        let today = Utc::now().date_naive();
        let long_ago = today.checked_sub_months(Months::new(8)).unwrap();
        for (date, status) in [(today, "Present"), (long_ago, "Absent")] {
            let res = app
                .post_with_token(
                    routes::ATTENDANCE,
                    &json!({
                        "class_id": class_id,
                        "class_date": date.to_string(),
                        "records": [{ "student_id": student.id, "status": status }],
                    }),
                    &teacher.token,
                )
                .await;
            assert_eq!(res.status, 201, "{}", res.text);
        }

        let res = app.get_with_token(routes::STUDENT_STATS, &student.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["attendance_percentage"], 50);
        assert_eq!(
            res.body["monthly_attendance"],
            json!([{ "label": month_label(today.year(), today.month()), "percentage": 100 }])
        );
    }

    #[tokio::test]
    async fn last_fee_paid_tracks_the_latest_payment() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Fee Teacher").await;
        let student = app.student("Fee Student").await;
        let class_id = app.create_class(&teacher.token, "Maths").await;

        let res = app
            .post_with_token(
                routes::PAYMENTS,
                &json!({
                    "student_id": student.id,
                    "class_id": class_id,
                    "amount": 2000.0,
                    "fee_month": "June",
                    "fee_year": 2025,
                }),
                &teacher.token,
            )
            .await;
        let paid_at = res.body["payment_date"].clone();

        let res = app.get_with_token(routes::STUDENT_STATS, &student.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["last_fee_paid"], paid_at);
    }
}
