use folio_core::db::open_db_in_memory;
use folio_core::{
    prepare_submission, ContactConfig, ContactService, FormData, FormId, NewForm,
    SqliteContentStore, StoreError, SubmissionListQuery, SubmissionStore,
};

fn submit(store: &SqliteContentStore<'_>, form_id: &str, message: &str) {
    let input = FormData::new()
        .with_text("email", "sam@x.com")
        .with_text("message", message);
    ContactService::new(store)
        .submit(&input, &ContactConfig::with_form_id(form_id))
        .unwrap();
}

#[test]
fn create_and_get_form_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContentStore::new(&conn);

    let id = store
        .create_form(&NewForm::new("  Contact  ").with_confirmation_message("Thanks!"))
        .unwrap();
    let form = store.get_form(id).unwrap().unwrap();
    assert_eq!(form.id, id);
    assert_eq!(form.title, "Contact");
    assert_eq!(form.confirmation_message.as_deref(), Some("Thanks!"));
    assert!(form.created_at > 0);
}

#[test]
fn create_form_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContentStore::new(&conn);

    let err = store.create_form(&NewForm::new("  ")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(store.list_forms().unwrap().is_empty());
}

#[test]
fn get_missing_form_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContentStore::new(&conn);
    assert!(store.get_form(FormId(7)).unwrap().is_none());
}

#[test]
fn list_forms_is_ordered_by_id() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContentStore::new(&conn);
    store.create_form(&NewForm::new("First")).unwrap();
    store.create_form(&NewForm::new("Second")).unwrap();

    let titles = store
        .list_forms()
        .unwrap()
        .into_iter()
        .map(|form| form.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["First", "Second"]);
}

#[test]
fn list_submissions_filters_by_form_and_paginates() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContentStore::new(&conn);
    store.create_form(&NewForm::new("Contact")).unwrap();
    store.create_form(&NewForm::new("Newsletter")).unwrap();

    submit(&store, "1", "first");
    submit(&store, "2", "other form");
    submit(&store, "1", "second");
    submit(&store, "1", "third");

    let all = store.list_submissions(&SubmissionListQuery::default()).unwrap();
    assert_eq!(all.len(), 4);

    let page = store
        .list_submissions(&SubmissionListQuery {
            form: Some(FormId(1)),
            limit: Some(2),
            offset: 1,
        })
        .unwrap();
    let messages = page
        .iter()
        .map(|submission| submission.value("message").unwrap())
        .collect::<Vec<_>>();
    assert_eq!(messages, vec!["second", "first"]);
    assert!(page.iter().all(|submission| submission.form == FormId(1)));
}

#[test]
fn get_missing_submission_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContentStore::new(&conn);
    assert!(store
        .get_submission(folio_core::SubmissionId::new_v4())
        .unwrap()
        .is_none());
}

#[test]
fn submission_without_fields_is_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContentStore::new(&conn);
    store.create_form(&NewForm::new("Contact")).unwrap();
    let id = folio_core::SubmissionId::new_v4();
    conn.execute(
        "INSERT INTO form_submissions (uuid, form_id) VALUES (?1, 1);",
        [id.to_string()],
    )
    .unwrap();

    let err = store.get_submission(id).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn create_submission_for_unregistered_form_is_unknown_form() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteContentStore::new(&conn);
    store.create_form(&NewForm::new("Contact")).unwrap();
    let input = FormData::new()
        .with_text("email", "sam@x.com")
        .with_text("message", "Hi");
    let submission = prepare_submission(&input, &ContactConfig::with_form_id("42")).unwrap();

    let err = store.create_submission(&submission).unwrap_err();
    assert!(matches!(err, StoreError::UnknownForm(FormId(42))));
    assert!(store
        .list_submissions(&SubmissionListQuery::default())
        .unwrap()
        .is_empty());
}
