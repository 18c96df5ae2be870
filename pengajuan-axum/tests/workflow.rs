use axum::http::StatusCode;
use pengajuan_core::models::{
    Envelope, FileAttachment, FileCategory, OfficeId, Page, SubmissionEvent, SubmissionRecord,
    SubmissionStatus, VerificationStatus,
};
use pengajuan_core::workflow::Action;
use serde_json::json;

mod app;
use app::{Credentials, act, create, data, message, server, upload, uploaded, verify};

fn office() -> OfficeId {
    OfficeId(uuid::Uuid::new_v4())
}

#[test_log::test(tokio::test)]
async fn a_submission_travels_from_draft_to_final_approval() {
    let server = server().await;
    let user = Credentials::user(office());
    let regional = Credentials::admin_wilayah();
    let central = Credentials::admin();

    let record = create(&server, &user, "Siti Rahma").await;
    assert_eq!(record.status, SubmissionStatus::Draft);
    let id = record.id;

    // Nothing uploaded yet
    let response = act(&server, &user, id, "resubmit", None).await;
    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let ijazah = uploaded(&server, &user, id, "ijazah", FileCategory::Kabupaten).await;
    let sk = uploaded(&server, &user, id, "sk_pangkat", FileCategory::Kabupaten).await;
    assert_eq!(ijazah.verification_status, VerificationStatus::Pending);

    let response = act(&server, &user, id, "resubmit", None).await;
    response.assert_status_ok();
    let record: SubmissionRecord = data(&response);
    assert_eq!(record.status, SubmissionStatus::Submitted);
    assert!(record.stamps.submitted.is_some());

    // The office cannot review its own submission
    act(&server, &user, id, "approve", None)
        .await
        .assert_status(StatusCode::FORBIDDEN);

    verify(&server, &regional, id, ijazah.id, VerificationStatus::Approved)
        .await
        .assert_status_ok();
    let response = server
        .put(&format!("/submission/{id}/file/{}/verify", sk.id))
        .authorization_bearer(&regional)
        .json(&json!({
            "verification_status": "rejected",
            "verification_notes": "tidak terbaca",
        }))
        .await;
    let rejected: FileAttachment = data(&response);
    assert_eq!(rejected.verification_status, VerificationStatus::Rejected);
    assert_eq!(rejected.verification_notes.as_deref(), Some("tidak terbaca"));
    assert_eq!(rejected.verified_by, Some(regional.user_id));

    // Approval needs every required file approved
    act(&server, &regional, id, "approve", None)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = act(&server, &regional, id, "reject", Some("SK pangkat tidak terbaca")).await;
    let record: SubmissionRecord = data(&response);
    assert_eq!(record.status, SubmissionStatus::Rejected);
    assert_eq!(
        record.rejection_reason.as_deref(),
        Some("SK pangkat tidak terbaca")
    );

    // The office corrects the rejected file, which goes back to pending
    let response = server
        .post(&format!("/submission/{id}/file/{}/replace", sk.id))
        .authorization_bearer(&user)
        .add_query_param("file_name", "sk_pangkat_baru.pdf")
        .bytes(axum::body::Bytes::from_static(b"%PDF-1.4 corrected"))
        .await;
    let replaced: FileAttachment = data(&response);
    assert_eq!(replaced.verification_status, VerificationStatus::Pending);
    assert_eq!(replaced.file_name, "sk_pangkat_baru.pdf");
    assert_eq!(replaced.verification_notes.as_deref(), Some("tidak terbaca"));

    act(&server, &user, id, "resubmit", None)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    // Re-verification of corrected files happens while the record is rejected
    verify(&server, &regional, id, sk.id, VerificationStatus::Approved)
        .await
        .assert_status_ok();

    let record: SubmissionRecord = data(&act(&server, &user, id, "resubmit", None).await);
    assert_eq!(record.status, SubmissionStatus::Submitted);
    assert_eq!(record.rejection_reason, None);

    let record: SubmissionRecord = data(&act(&server, &regional, id, "approve", None).await);
    assert_eq!(record.status, SubmissionStatus::Approved);

    // The regional administrator supplies their own documents
    act(&server, &regional, id, "submit-to-central", None)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let rekomendasi = uploaded(
        &server,
        &regional,
        id,
        "rekomendasi",
        FileCategory::AdminWilayah,
    )
    .await;
    let record: SubmissionRecord =
        data(&act(&server, &regional, id, "submit-to-central", None).await);
    assert_eq!(record.status, SubmissionStatus::AdminWilayahSubmitted);

    // Only the central administrator verifies regional documents
    verify(&server, &regional, id, rekomendasi.id, VerificationStatus::Approved)
        .await
        .assert_status(StatusCode::FORBIDDEN);
    verify(&server, &central, id, rekomendasi.id, VerificationStatus::Approved)
        .await
        .assert_status_ok();

    let record: SubmissionRecord =
        data(&act(&server, &central, id, "admin-wilayah-approve", None).await);
    assert_eq!(record.status, SubmissionStatus::AdminWilayahApproved);

    let response = act(&server, &central, id, "final-approve", None).await;
    let envelope = response.json::<Envelope<SubmissionRecord>>();
    assert_eq!(
        envelope.message.as_deref(),
        Some(Action::FinalApprove.success_message())
    );
    let record = envelope.data.unwrap();
    assert_eq!(record.status, SubmissionStatus::FinalApproved);
    assert!(record.stamps.final_approved.is_some());

    // Terminal
    act(&server, &central, id, "final-reject", None)
        .await
        .assert_status(StatusCode::CONFLICT);

    let history: Page<SubmissionEvent> = data(
        &server
            .get(&format!("/submission/{id}/history"))
            .authorization_bearer(&user)
            .await,
    );
    let actions: Vec<Action> = history.results.iter().map(|event| event.action).collect();
    assert_eq!(
        actions,
        vec![
            Action::FinalApprove,
            Action::AdminWilayahApprove,
            Action::SubmitToCentral,
            Action::Approve,
            Action::Resubmit,
            Action::Reject,
            Action::Resubmit,
        ]
    );
    assert_eq!(history.results[5].notes.as_deref(), Some("SK pangkat tidak terbaca"));
    assert_eq!(history.more, None);
}

#[test_log::test(tokio::test)]
async fn regional_rejection_returns_to_the_regional_administrator() {
    let server = server().await;
    let user = Credentials::user(office());
    let regional = Credentials::admin_wilayah();
    let central = Credentials::admin();

    let id = create(&server, &user, "Budi Santoso").await.id;
    let ijazah = uploaded(&server, &user, id, "ijazah", FileCategory::Kabupaten).await;
    let sk = uploaded(&server, &user, id, "sk_pangkat", FileCategory::Kabupaten).await;
    act(&server, &user, id, "resubmit", None)
        .await
        .assert_status_ok();
    for file in [ijazah, sk] {
        verify(&server, &regional, id, file.id, VerificationStatus::Approved)
            .await
            .assert_status_ok();
    }
    act(&server, &regional, id, "approve", None)
        .await
        .assert_status_ok();

    let rekomendasi = uploaded(
        &server,
        &regional,
        id,
        "rekomendasi",
        FileCategory::AdminWilayah,
    )
    .await;
    act(&server, &regional, id, "submit-to-central", None)
        .await
        .assert_status_ok();
    verify(&server, &central, id, rekomendasi.id, VerificationStatus::Rejected)
        .await
        .assert_status_ok();

    let record: SubmissionRecord =
        data(&act(&server, &central, id, "admin-wilayah-reject", Some("salah format")).await);
    assert_eq!(record.status, SubmissionStatus::AdminWilayahRejected);
    assert_eq!(record.rejection_reason.as_deref(), Some("salah format"));

    // A rejected file blocks forwarding until it is replaced
    act(&server, &regional, id, "submit-to-central", None)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let response = upload(&server, &regional, id, "rekomendasi", FileCategory::AdminWilayah).await;
    let replaced: FileAttachment = data(&response);
    assert_eq!(replaced.id, rekomendasi.id);
    assert_eq!(replaced.verification_status, VerificationStatus::Pending);

    let record: SubmissionRecord =
        data(&act(&server, &regional, id, "submit-to-central", None).await);
    assert_eq!(record.status, SubmissionStatus::AdminWilayahSubmitted);
    assert_eq!(record.rejection_reason, None);
}

#[test_log::test(tokio::test)]
async fn drafts_are_deleted_but_their_history_remains() {
    let server = server().await;
    let user = Credentials::user(office());
    let central = Credentials::admin();

    let id = create(&server, &user, "Dewi Lestari").await.id;
    uploaded(&server, &user, id, "ijazah", FileCategory::Kabupaten).await;

    // A pending required file blocks deletion
    server
        .delete(&format!("/submission/{id}"))
        .authorization_bearer(&user)
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let id = create(&server, &user, "Dewi Lestari").await.id;
    let response = server
        .delete(&format!("/submission/{id}"))
        .authorization_bearer(&user)
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Envelope<SubmissionRecord>>().data,
        None
    );

    server
        .get(&format!("/submission/{id}"))
        .authorization_bearer(&user)
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .get(&format!("/submission/{id}/history"))
        .authorization_bearer(&user)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let history: Page<SubmissionEvent> = data(
        &server
            .get(&format!("/submission/{id}/history"))
            .authorization_bearer(&central)
            .await,
    );
    assert_eq!(history.results.len(), 1);
    assert_eq!(history.results[0].action, Action::Delete);
    assert_eq!(history.results[0].from_status, SubmissionStatus::Draft);
    assert_eq!(history.results[0].to_status, None);
}

#[test_log::test(tokio::test)]
async fn drafts_and_rejections_are_editable() {
    let server = server().await;
    let user = Credentials::user(office());

    let record = create(&server, &user, "Rina Wati").await;
    let response = server
        .put(&format!("/submission/{}", record.id))
        .authorization_bearer(&user)
        .json(&json!({
            "employee": {
                "name": "Rina Wati, S.Kom",
                "position": "Penata Muda Tingkat I",
                "nip": "199001012015031001",
            },
            "job_type": "jabatan_fungsional",
            "notes": "gelar diperbarui",
        }))
        .await;
    let updated: SubmissionRecord = data(&response);
    assert_eq!(updated.employee.name, "Rina Wati, S.Kom");
    assert_eq!(updated.notes.as_deref(), Some("gelar diperbarui"));
    assert_eq!(updated.status, SubmissionStatus::Draft);

    for file_type in ["ijazah", "sk_pangkat"] {
        uploaded(&server, &user, record.id, file_type, FileCategory::Kabupaten).await;
    }
    act(&server, &user, record.id, "resubmit", None)
        .await
        .assert_status_ok();

    let response = server
        .put(&format!("/submission/{}", record.id))
        .authorization_bearer(&user)
        .json(&app::submission_body("Rina Wati"))
        .await;
    response.assert_status(StatusCode::CONFLICT);
    assert!(message(&response).contains("submitted"));
}

#[test_log::test(tokio::test)]
async fn the_report_escapes_user_text() {
    let server = server().await;
    let user = Credentials::user(office());

    let record = create(&server, &user, "<script>alert(1)</script>").await;
    let response = server
        .get(&format!("/submission/{}/report", record.id))
        .authorization_bearer(&user)
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("Belum diunggah"));
    assert!(html.contains("Dicetak oleh Operator Kabupaten"));
}

#[test_log::test(tokio::test)]
async fn uploaded_content_can_be_downloaded() {
    let server = server().await;
    let user = Credentials::user(office());

    let id = create(&server, &user, "Agus Salim").await.id;
    let file = uploaded(&server, &user, id, "ijazah", FileCategory::Kabupaten).await;
    assert_eq!(file.size, 22);

    let response = server
        .get(&format!("/submission/{id}/file/{}/content", file.id))
        .authorization_bearer(&user)
        .await;
    response.assert_status_ok();
    assert_eq!(&response.as_bytes()[..], b"%PDF-1.4 test document");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"ijazah.pdf\""
    );

    let required: Vec<String> = data(
        &server
            .get(&format!("/submission/{id}/admin-wilayah-required-files"))
            .authorization_bearer(&user)
            .await,
    );
    assert_eq!(required, vec!["rekomendasi".to_owned()]);
}
