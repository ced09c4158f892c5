use crate::common::{TestApp, TestFile, routes};
use serde_json::json;

mod lessons {
    use super::*;

    #[tokio::test]
    async fn upload_stores_the_pdf() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Upload Teacher").await;

        let res = app.upload_lesson(&teacher.token, "Kinematics").await;
        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["title"], "Kinematics");
        assert_eq!(res.body["teacher_id"], teacher.id);
        assert!(
            res.body["file_url"]
                .as_str()
                .is_some_and(|url| url.contains("/lessons/") && url.ends_with(".pdf"))
        );
        assert!(res.body["storage_public_id"].is_null());
        assert_eq!(app.stored_files("lessons"), 1);
    }

    #[tokio::test]
    async fn non_pdf_is_rejected_before_storing() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Png Teacher").await;

        let res = app
            .multipart_with_token(
                routes::LESSONS,
                false,
                &[("title", "Pic"), ("subject", "Art"), ("grade", "9")],
                Some(("file", TestFile::png())),
                &teacher.token,
            )
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(app.stored_files("lessons"), 0);
    }

    #[tokio::test]
    async fn missing_fields_do_not_store_anything() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Sloppy Teacher").await;

        let res = app
            .multipart_with_token(
                routes::LESSONS,
                false,
                &[("title", "No subject")],
                Some(("file", TestFile::pdf())),
                &teacher.token,
            )
            .await;
        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(app.stored_files("lessons"), 0);
    }

    #[tokio::test]
    async fn missing_file_is_rejected() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Fileless Teacher").await;

        let res = app
            .multipart_with_token(
                routes::LESSONS,
                false,
                &[("title", "T"), ("subject", "S"), ("grade", "G")],
                None,
                &teacher.token,
            )
            .await;
        assert_eq!(res.status, 400);
        assert_eq!(res.body["message"], "Please upload a file");
    }

    #[tokio::test]
    async fn edit_changes_only_given_fields() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Edit Teacher").await;
        let id = app.upload_lesson(&teacher.token, "Draft").await.id();

        let res = app
            .put_with_token(
                &routes::lesson(id),
                &json!({ "title": "Final", "description": "" }),
                &teacher.token,
            )
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["title"], "Final");
        assert_eq!(res.body["description"], "");
        assert_eq!(res.body["subject"], "Physics");
    }

    #[tokio::test]
    async fn delete_removes_row_and_file() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Tidy Teacher").await;
        let id = app.upload_lesson(&teacher.token, "Gone").await.id();

        let res = app.delete_with_token(&routes::lesson(id), &teacher.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], id);
        assert_eq!(res.body["message"], "Lesson deleted successfully");
        assert_eq!(app.stored_files("lessons"), 0);

        let res = app.get_with_token(routes::LESSONS, &teacher.token).await;
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn delete_succeeds_when_storage_is_down() {
        let app = TestApp::spawn_with_failing_deletes().await;
        let teacher = app.teacher("Outage Teacher").await;
        let id = app.upload_lesson(&teacher.token, "Stuck").await.id();

        let res = app.delete_with_token(&routes::lesson(id), &teacher.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert!(
            res.body["message"]
                .as_str()
                .unwrap()
                .contains("may still exist")
        );

        let res = app.get_with_token(routes::LESSONS, &teacher.token).await;
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn other_teacher_cannot_touch_a_lesson() {
        let app = TestApp::spawn().await;
        let owner = app.teacher("Lesson Owner").await;
        let other = app.teacher("Lesson Thief").await;
        let id = app.upload_lesson(&owner.token, "Mine").await.id();

        let res = app
            .put_with_token(&routes::lesson(id), &json!({ "title": "Yours" }), &other.token)
            .await;
        assert_eq!(res.status, 403);

        let res = app.delete_with_token(&routes::lesson(id), &other.token).await;
        assert_eq!(res.status, 403);
        assert_eq!(app.stored_files("lessons"), 1);

        let res = app.get_with_token(routes::LESSONS, &other.token).await;
        assert_eq!(res.body, json!([]));
    }

    #[tokio::test]
    async fn students_see_lessons_of_their_teachers_only() {
        let app = TestApp::spawn().await;
        let mine = app.teacher("My Teacher").await;
        let stranger = app.teacher("Stranger Teacher").await;
        let student = app.student("Reader Student").await;
        let class_id = app.create_class(&mine.token, "Physics").await;
        app.enroll(class_id, student.id, &mine.token).await;

        app.upload_lesson(&mine.token, "Visible").await;
        app.upload_lesson(&stranger.token, "Hidden").await;

        let res = app
            .get_with_token(routes::STUDENT_LESSONS, &student.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        let titles: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["Visible"]);
    }
}

mod papers {
    use super::*;

    #[tokio::test]
    async fn upload_list_and_delete() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Paper Teacher").await;

        let res = app
            .multipart_with_token(
                routes::PAPERS,
                false,
                &[("title", "2024 Final"), ("subject", "Maths"), ("grade", "11")],
                Some(("file", TestFile::pdf())),
                &teacher.token,
            )
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.id();
        assert_eq!(app.stored_files("papers"), 1);

        let res = app.get_with_token(routes::PAPERS, &teacher.token).await;
        assert_eq!(res.body.as_array().unwrap().len(), 1);

        let res = app.delete_with_token(&routes::paper(id), &teacher.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Paper deleted successfully");
        assert_eq!(app.stored_files("papers"), 0);
    }

    #[tokio::test]
    async fn student_without_classes_sees_nothing() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Busy Teacher").await;
        let student = app.student("Lonely Student").await;
        app.multipart_with_token(
            routes::PAPERS,
            false,
            &[("title", "P"), ("subject", "S"), ("grade", "G")],
            Some(("file", TestFile::pdf())),
            &teacher.token,
        )
        .await;

        let res = app.get_with_token(routes::STUDENT_PAPERS, &student.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body, json!([]));
    }
}

mod videos {
    use super::*;

    fn video(topic: &str) -> serde_json::Value {
        json!({
            "topic": topic,
            "subject": "Maths",
            "grade": "10",
            "video_url": "https://www.youtube.com/watch?v=abc",
        })
    }

    #[tokio::test]
    async fn create_update_delete() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Video Teacher").await;

        let res = app
            .post_with_token(routes::VIDEOS, &video("Fractions"), &teacher.token)
            .await;
        assert_eq!(res.status, 201, "{}", res.text);
        let id = res.id();

        let res = app
            .put_with_token(&routes::video(id), &json!({ "topic": "Decimals" }), &teacher.token)
            .await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["topic"], "Decimals");
        assert_eq!(res.body["video_url"], "https://www.youtube.com/watch?v=abc");

        let res = app.delete_with_token(&routes::video(id), &teacher.token).await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["message"], "Video removed");
    }

    #[tokio::test]
    async fn invalid_url_is_rejected() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Bad Url Teacher").await;

        let mut body = video("Broken");
        body["video_url"] = json!("not a url");
        let res = app.post_with_token(routes::VIDEOS, &body, &teacher.token).await;
        assert_eq!(res.status, 400);
    }

    #[tokio::test]
    async fn students_see_videos_of_their_teachers() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("Stream Teacher").await;
        let other = app.teacher("Other Stream").await;
        let student = app.student("Viewer").await;
        let class_id = app.create_class(&teacher.token, "Maths").await;
        app.enroll(class_id, student.id, &teacher.token).await;

        app.post_with_token(routes::VIDEOS, &video("Shown"), &teacher.token)
            .await;
        app.post_with_token(routes::VIDEOS, &video("Not shown"), &other.token)
            .await;

        let res = app.get_with_token(routes::STUDENT_VIDEOS, &student.token).await;
        assert_eq!(res.status, 200);
        let videos = res.body.as_array().unwrap();
        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0]["topic"], "Shown");
    }
}
