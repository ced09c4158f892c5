use crate::common::{TestApp, routes};
use serde_json::json;

mod registration {
    use super::*;

    #[tokio::test]
    async fn register_returns_user_and_token() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "name": "Nimal Perera",
                    "email": "Nimal@Example.com",
                    "password": "securepass",
                    "role": "teacher",
                    "phone": "0771234567",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["user"]["email"], "nimal@example.com");
        assert_eq!(res.body["user"]["role"], "teacher");
        assert_eq!(res.body["user"]["phone"], "0771234567");
        assert!(res.body["user"]["password"].is_null());
        assert!(res.body["token"].as_str().is_some_and(|t| !t.is_empty()));
    }

    #[tokio::test]
    async fn role_defaults_to_student() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "name": "Kamal",
                    "email": "kamal@example.com",
                    "password": "securepass",
                }),
            )
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["user"]["role"], "student");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let app = TestApp::spawn().await;
        app.student("Dup User").await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "name": "Other",
                    "email": "DUP.USER@example.com",
                    "password": "securepass",
                }),
            )
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn missing_fields_are_named() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({ "name": "", "email": "a@example.com", "password": "" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .post_without_token(
                routes::REGISTER,
                &json!({ "name": "Short", "email": "short@example.com", "password": "abc" }),
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }
}

mod login {
    use super::*;

    #[tokio::test]
    async fn login_with_correct_credentials() {
        let app = TestApp::spawn().await;
        app.teacher("Login Teacher").await;

        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "email": "login.teacher@example.com", "password": "securepass" }),
            )
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["user"]["name"], "Login Teacher");
        assert!(res.body["token"].is_string());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let app = TestApp::spawn().await;
        app.teacher("Real User").await;

        let wrong = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "email": "real.user@example.com", "password": "wrongpass" }),
            )
            .await;
        let unknown = app
            .post_without_token(
                routes::LOGIN,
                &json!({ "email": "nobody@example.com", "password": "securepass" }),
            )
            .await;

        assert_eq!(wrong.status, 401);
        assert_eq!(unknown.status, 401);
        assert_eq!(wrong.body, unknown.body);
        assert_eq!(wrong.body["code"], "INVALID_CREDENTIALS");
    }
}

mod tokens {
    use super::*;

    #[tokio::test]
    async fn profile_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::ACCOUNT).await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_MISSING");
    }

    #[tokio::test]
    async fn garbage_token_is_invalid() {
        let app = TestApp::spawn().await;

        let res = app.get_with_token(routes::ACCOUNT, "not-a-jwt").await;
        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "TOKEN_INVALID");
    }

    #[tokio::test]
    async fn profile_returns_the_caller() {
        let app = TestApp::spawn().await;
        let user = app.student("Profile Student").await;

        let res = app.get_with_token(routes::ACCOUNT, &user.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["id"], user.id);
        assert_eq!(res.body["role"], "student");
    }
}

mod students {
    use super::*;

    #[tokio::test]
    async fn teacher_sees_students_only() {
        let app = TestApp::spawn().await;
        let teacher = app.teacher("List Teacher").await;
        app.student("Zed Student").await;
        app.student("Amy Student").await;

        let res = app.get_with_token(routes::STUDENTS, &teacher.token).await;
        assert_eq!(res.status, 200, "{}", res.text);
        let names: Vec<&str> = res
            .body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Amy Student", "Zed Student"]);
    }

    #[tokio::test]
    async fn student_cannot_list_students() {
        let app = TestApp::spawn().await;
        let student = app.student("Curious Student").await;

        let res = app.get_with_token(routes::STUDENTS, &student.token).await;
        assert_eq!(res.status, 403);
        assert_eq!(res.body["code"], "FORBIDDEN");
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::HEALTH).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["status"], "ok");
}
