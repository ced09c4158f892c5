use crate::common::{TestApp, routes};
use serde_json::json;

fn payment(student_id: i32, class_id: i32, amount: f64) -> serde_json::Value {
    json!({
        "student_id": student_id,
        "class_id": class_id,
        "amount": amount,
        "fee_month": "March",
        "fee_year": 2025,
    })
}

#[tokio::test]
async fn record_and_list_both_sides() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Cashier Teacher").await;
    let student = app.student("Paying Student").await;
    let class_id = app.create_class(&teacher.token, "Maths").await;

    let res = app
        .post_with_token(routes::PAYMENTS, &payment(student.id, class_id, 2500.0), &teacher.token)
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["teacher_id"], teacher.id);
    assert_eq!(res.body["amount"], 2500.0);

    let res = app.get_with_token(routes::PAYMENTS, &teacher.token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body[0]["student_name"], "Paying Student");
    assert_eq!(res.body[0]["class_subject"], "Maths");

    let res = app.get_with_token(routes::MY_PAYMENTS, &student.token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body[0]["teacher_name"], "Cashier Teacher");
    assert_eq!(res.body[0]["fee_month"], "March");
}

#[tokio::test]
async fn zero_amount_is_kept() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Generous Teacher").await;
    let student = app.student("Scholarship Student").await;
    let class_id = app.create_class(&teacher.token, "Maths").await;

    let res = app
        .post_with_token(routes::PAYMENTS, &payment(student.id, class_id, 0.0), &teacher.token)
        .await;
    assert_eq!(res.status, 201, "{}", res.text);
    assert_eq!(res.body["amount"], 0.0);
}

#[tokio::test]
async fn negative_amount_is_rejected() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Strict Cashier").await;
    let student = app.student("Refund Student").await;
    let class_id = app.create_class(&teacher.token, "Maths").await;

    let res = app
        .post_with_token(routes::PAYMENTS, &payment(student.id, class_id, -5.0), &teacher.token)
        .await;
    assert_eq!(res.status, 400);
}

#[tokio::test]
async fn payment_for_a_teacher_is_not_found() {
    let app = TestApp::spawn().await;
    let teacher = app.teacher("Confused Cashier").await;
    let colleague = app.teacher("Colleague Cashier").await;
    let class_id = app.create_class(&teacher.token, "Maths").await;

    let res = app
        .post_with_token(routes::PAYMENTS, &payment(colleague.id, class_id, 10.0), &teacher.token)
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["message"], "Student not found");
}

#[tokio::test]
async fn payment_against_another_teachers_class_is_forbidden() {
    let app = TestApp::spawn().await;
    let owner = app.teacher("Class Owner").await;
    let other = app.teacher("Sneaky Cashier").await;
    let student = app.student("Caught Student").await;
    let class_id = app.create_class(&owner.token, "Maths").await;

    let res = app
        .post_with_token(routes::PAYMENTS, &payment(student.id, class_id, 10.0), &other.token)
        .await;
    assert_eq!(res.status, 403);

    let res = app.get_with_token(routes::PAYMENTS, &owner.token).await;
    assert_eq!(res.body, json!([]));
}

#[tokio::test]
async fn students_cannot_record_payments() {
    let app = TestApp::spawn().await;
    let student = app.student("Self Payer").await;

    let res = app
        .post_with_token(routes::PAYMENTS, &payment(student.id, 1, 10.0), &student.token)
        .await;
    assert_eq!(res.status, 403);
}
