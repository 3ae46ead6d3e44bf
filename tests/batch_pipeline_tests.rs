//! End-to-end tests for the batch generation pipeline, driven through the
//! service layer with a scratch temp root.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;
use zip::ZipArchive;

use docgen_server::auth::model::User;
use docgen_server::batch::models::{BatchGenerationRequest, ItemStatus};
use docgen_server::batch::service::BatchDocumentService;
use docgen_server::batch::BatchError;
use docgen_server::state::AppState;
use docgen_server::template::model::Template;

fn setup() -> (AppState, TempDir) {
    let dir = tempfile::tempdir().expect("temp root");
    let state = AppState::with_temp_root(dir.path().to_path_buf());
    (state, dir)
}

fn seed_template(state: &AppState, content: &str) -> Template {
    let template = Template::new("test-template".to_string(), content.to_string());
    state.templates.insert(template.clone());
    template
}

fn seed_user(state: &AppState, username: &str) -> User {
    let user = User {
        id: Uuid::new_v4(),
        username: username.to_string(),
        password_hash: "irrelevant".to_string(),
        created_at: Utc::now(),
    };
    state.users.insert(user.clone());
    user
}

fn row(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn request(
    name: &str,
    template_id: Uuid,
    rows: Vec<HashMap<String, String>>,
    formats: &[&str],
    guest_mode: bool,
) -> BatchGenerationRequest {
    BatchGenerationRequest {
        name: name.to_string(),
        template_id,
        data_rows: rows,
        formats: formats.iter().map(|f| f.to_string()).collect(),
        guest_mode,
    }
}

/// Unpack an archive into entry-name -> content bytes.
fn archive_entries(bytes: &[u8]) -> HashMap<String, Vec<u8>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("valid zip");
    let mut entries = HashMap::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).expect("entry");
        if entry.is_dir() {
            continue;
        }
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("entry content");
        entries.insert(entry.name().to_string(), content);
    }
    entries
}

#[test]
fn test_end_to_end_hello_batch() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "Hello ${name}");
    let service = BatchDocumentService::from_state(&state);

    // Empty formats list: every row is rendered exactly once, as plain text.
    let result = service
        .generate_batch(
            &request(
                "",
                template.id,
                vec![row(&[("name", "A")]), row(&[("name", "B")])],
                &[],
                true,
            ),
            None,
        )
        .expect("batch runs");

    assert_eq!(result.total_documents, 2);
    assert_eq!(result.successful_documents, 2);
    assert_eq!(result.failed_documents, 0);
    assert!(result.errors.is_empty());
    assert_eq!(result.zip_file_name, format!("{}.zip", result.batch_id));

    assert_eq!(result.results[0].document_name, "document_1");
    assert_eq!(result.results[1].document_name, "document_2");
    assert!(result
        .results
        .iter()
        .all(|item| item.status == ItemStatus::Success));

    let (_, bytes) = service
        .take_archive(&result.batch_id)
        .expect("archive present");
    let entries = archive_entries(&bytes);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries["document_1.txt"], b"Hello A");
    assert_eq!(entries["document_2.txt"], b"Hello B");
}

#[test]
fn test_success_and_failure_counts_always_add_up() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "x=${x}");
    let service = BatchDocumentService::from_state(&state);

    let result = service
        .generate_batch(
            &request(
                "${x}",
                template.id,
                vec![
                    row(&[("x", "one")]),
                    row(&[("x", "../nope")]),
                    row(&[("x", "three")]),
                    row(&[("x", "a/b")]),
                ],
                &["txt"],
                true,
            ),
            None,
        )
        .expect("batch runs");

    assert_eq!(result.total_documents, 4);
    assert_eq!(
        result.successful_documents + result.failed_documents,
        result.total_documents
    );
    assert_eq!(result.failed_documents, result.errors.len());
}

#[test]
fn test_row_failure_is_isolated_from_siblings() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "Hello ${file}");
    let user = seed_user(&state, "alice");
    let service = BatchDocumentService::from_state(&state);

    let result = service
        .generate_batch(
            &request(
                "${file}",
                template.id,
                vec![
                    row(&[("file", "good")]),
                    row(&[("file", "../escape")]),
                    row(&[("file", "fine")]),
                ],
                &["txt"],
                false,
            ),
            Some(&user),
        )
        .expect("batch runs");

    assert_eq!(result.successful_documents, 2);
    assert_eq!(result.failed_documents, 1);
    assert_eq!(result.results[0].status, ItemStatus::Success);
    assert_eq!(result.results[1].status, ItemStatus::Failed);
    assert_eq!(result.results[2].status, ItemStatus::Success);

    // Sibling rows keep their persisted document ids and archive entries.
    assert!(result.results[0].document_id.is_some());
    assert!(result.results[2].document_id.is_some());

    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].row_index, 1);
    assert_eq!(
        result.errors[0].data.get("file").map(String::as_str),
        Some("../escape")
    );

    let (_, bytes) = service
        .take_archive(&result.batch_id)
        .expect("archive present");
    let entries = archive_entries(&bytes);
    assert_eq!(entries.len(), 2);
    assert!(entries.contains_key("good_1.txt"));
    assert!(entries.contains_key("fine_3.txt"));
}

#[test]
fn test_multiple_formats_render_independently() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "Body ${n}");
    let service = BatchDocumentService::from_state(&state);

    let result = service
        .generate_batch(
            &request(
                "doc_${n}",
                template.id,
                vec![row(&[("n", "1")]), row(&[("n", "2")])],
                &["txt", "docx"],
                true,
            ),
            None,
        )
        .expect("batch runs");

    assert_eq!(result.successful_documents, 2);
    let (_, bytes) = service
        .take_archive(&result.batch_id)
        .expect("archive present");
    let entries = archive_entries(&bytes);
    // One entry per (successful row x requested format).
    assert_eq!(entries.len(), 4);
    assert_eq!(entries["doc_1_1.txt"], b"Body 1");
    assert_eq!(entries["doc_2_2.txt"], b"Body 2");
    assert_eq!(&entries["doc_1_1.docx"][..2], b"PK");
    assert_eq!(&entries["doc_2_2.docx"][..2], b"PK");
}

#[test]
fn test_repeated_submission_yields_independent_jobs() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "Hi ${who}");
    let service = BatchDocumentService::from_state(&state);
    let req = request("", template.id, vec![row(&[("who", "x")])], &["txt"], true);

    let first = service.generate_batch(&req, None).expect("first batch");
    let second = service.generate_batch(&req, None).expect("second batch");

    assert_ne!(first.batch_id, second.batch_id);
    assert!(state
        .temp_root
        .join(format!("{}.zip", first.batch_id))
        .is_file());
    assert!(state
        .temp_root
        .join(format!("{}.zip", second.batch_id))
        .is_file());
}

#[test]
fn test_progress_for_unknown_job_is_none() {
    let (state, _dir) = setup();
    let service = BatchDocumentService::from_state(&state);
    assert!(service.get_progress(&Uuid::new_v4()).is_none());
}

#[test]
fn test_progress_returns_stored_snapshot() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "v=${v}");
    let service = BatchDocumentService::from_state(&state);

    let result = service
        .generate_batch(
            &request("", template.id, vec![row(&[("v", "1")])], &["txt"], true),
            None,
        )
        .expect("batch runs");

    let first = service.get_progress(&result.batch_id).expect("stored");
    let second = service.get_progress(&result.batch_id).expect("stored");
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&result).unwrap()
    );
}

#[test]
fn test_archive_download_is_one_shot() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "x");
    let service = BatchDocumentService::from_state(&state);

    let result = service
        .generate_batch(
            &request("", template.id, vec![HashMap::new()], &["txt"], true),
            None,
        )
        .expect("batch runs");

    assert!(service.take_archive(&result.batch_id).is_some());
    assert!(service.take_archive(&result.batch_id).is_none());
    // The stored result is still queryable after the archive is gone.
    assert!(service.get_progress(&result.batch_id).is_some());
}

#[test]
fn test_unknown_template_aborts_before_any_row() {
    let (state, _dir) = setup();
    let service = BatchDocumentService::from_state(&state);

    let missing = Uuid::new_v4();
    let err = service
        .generate_batch(
            &request("", missing, vec![row(&[("a", "b")])], &["txt"], true),
            None,
        )
        .expect_err("template is unknown");

    assert!(matches!(err, BatchError::TemplateNotFound(id) if id == missing));
    // No partial job record is ever exposed.
    assert!(state.jobs.is_empty());
}

#[test]
fn test_guest_mode_persists_no_documents() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "Hello ${name}");
    let user = seed_user(&state, "bob");
    let service = BatchDocumentService::from_state(&state);

    let result = service
        .generate_batch(
            &request(
                "",
                template.id,
                vec![row(&[("name", "A")])],
                &["txt"],
                true,
            ),
            Some(&user),
        )
        .expect("batch runs");

    assert_eq!(result.successful_documents, 1);
    assert!(result.results[0].document_id.is_none());
    assert!(state.documents.list_by_user(&user.id).is_empty());
}

#[test]
fn test_authenticated_batch_persists_documents() {
    let (state, _dir) = setup();
    let template = seed_template(&state, "Hello ${name}");
    let user = seed_user(&state, "carol");
    let service = BatchDocumentService::from_state(&state);

    let result = service
        .generate_batch(
            &request(
                "letter_${name}",
                template.id,
                vec![row(&[("name", "A")]), row(&[("name", "B")])],
                &["txt"],
                false,
            ),
            Some(&user),
        )
        .expect("batch runs");

    assert!(result
        .results
        .iter()
        .all(|item| item.document_id.is_some()));

    let persisted = state.documents.list_by_user(&user.id);
    assert_eq!(persisted.len(), 2);
    assert_eq!(persisted[0].generated_content, "Hello A");
    assert_eq!(persisted[1].generated_content, "Hello B");
}
