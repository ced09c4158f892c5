use crate::common::{TestApp, TestFile, routes};
use serde_json::json;

#[tokio::test]
async fn profile_is_created_on_first_read() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Fresh Teacher").await;

    let first = app.get_with_token(routes::TEACHER_PROFILE, &teacher.token).await;
    assert_eq!(first.status, 200, "{}", first.text);
    assert_eq!(first.body["user_id"], teacher.id);
    assert_eq!(first.body["profile_title"], "");

    let second = app.get_with_token(routes::TEACHER_PROFILE, &teacher.token).await;
    assert_eq!(first.body["id"], second.body["id"]);
}

#[tokio::test]
async fn update_changes_only_given_fields() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Brand Teacher").await;

    let res = app
        .put_with_token(
            routes::TEACHER_PROFILE,
            &json!({ "profile_title": "Physics with Nimal", "about_text": "Ten years" }),
            &teacher.token,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);

    let res = app
        .put_with_token(
            routes::TEACHER_PROFILE,
            &json!({ "about_text": "" }),
            &teacher.token,
        )
        .await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["profile_title"], "Physics with Nimal");
    assert_eq!(res.body["about_text"], "");
}

#[tokio::test]
async fn students_have_no_teacher_profile() {
    let app = TestApp::spawn().await;
    let student = app.student("Wannabe Teacher").await;

    let res = app.get_with_token(routes::TEACHER_PROFILE, &student.token).await;
    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn replacing_the_logo_removes_the_previous_image() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Logo Teacher").await;

    let first = app
        .multipart_with_token(
            routes::PROFILE_LOGO,
            true,
            &[],
            Some(("image", TestFile::png())),
            &teacher.token,
        )
        .await;
    assert_eq!(first.status, 200, "{}", first.text);
    let first_url = first.body["logo_url"].as_str().unwrap().to_string();
    assert!(first_url.ends_with(".png"));
    assert_eq!(app.stored_files("profile_logos"), 1);

    let second = app
        .multipart_with_token(
            routes::PROFILE_LOGO,
            true,
            &[],
            Some(("image", TestFile::png())),
            &teacher.token,
        )
        .await;
    assert_eq!(second.status, 200, "{}", second.text);
    assert_ne!(second.body["logo_url"], first_url.as_str());
    assert_eq!(app.stored_files("profile_logos"), 1);
}

#[tokio::test]
async fn image_upload_rejects_pdf() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Pdf Logo Teacher").await;

    let res = app
        .multipart_with_token(
            routes::PROFILE_MAIN_IMAGE,
            true,
            &[],
            Some(("image", TestFile::pdf())),
            &teacher.token,
        )
        .await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn image_upload_requires_a_file() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Empty Logo Teacher").await;

    let res = app
        .multipart_with_token(routes::PROFILE_LOGO, true, &[], None, &teacher.token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["message"], "Please upload an image");
}

#[tokio::test]
async fn public_profile_needs_no_token() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Public Teacher").await;
    app.create_class(&teacher.token, "Physics").await;
    app.create_class(&teacher.token, "Chemistry").await;
    app.put_with_token(
        routes::TEACHER_PROFILE,
        &json!({ "homepage_headline": "Learn with me" }),
        &teacher.token,
    )
    .await;

    let res = app.get_without_token(&routes::public_profile(teacher.id)).await;
    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["teacher_name"], "Public Teacher");
    assert_eq!(res.body["profile"]["homepage_headline"], "Learn with me");
    assert_eq!(res.body["classes"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn public_profile_of_a_student_is_not_found() {
    let app = TestApp::spawn().await;
    let student = app.student("Hidden Student").await;

    let res = app.get_without_token(&routes::public_profile(student.id)).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["message"], "Teacher not found");
}
