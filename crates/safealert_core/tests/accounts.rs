use rusqlite::Connection;
use safealert_core::db::open_db_in_memory;
use safealert_core::{
    AccountService, AccountServiceError, Registration, SqliteSessionRepository,
    SqliteUserRepository, UserRepository, ValidationError,
};

fn service(
    conn: &Connection,
) -> AccountService<SqliteUserRepository<'_>, SqliteSessionRepository<'_>> {
    AccountService::new(
        SqliteUserRepository::try_new(conn).unwrap(),
        SqliteSessionRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn register_new_email_is_retrievable() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);

    let user = accounts
        .register(&Registration::new(" Ana ", "a@x.com", " 555 ", "pw"))
        .unwrap();
    assert_eq!(user.name, "Ana");
    assert_eq!(user.phone, "555");

    let loaded = accounts.get_user("a@x.com").unwrap().unwrap();
    assert_eq!(loaded, user);
}

#[test]
fn register_duplicate_email_fails() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&Registration::new("Ana", "a@x.com", "", "pw"))
        .unwrap();

    let err = accounts
        .register(&Registration::new("Other", "a@x.com", "", "pw2"))
        .unwrap_err();
    assert!(matches!(err, AccountServiceError::EmailTaken(email) if email == "a@x.com"));
    assert_eq!(
        accounts.get_user("a@x.com").unwrap().unwrap().name,
        "Ana"
    );
}

#[test]
fn register_rejects_blank_required_fields() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);

    let err = accounts
        .register(&Registration::new("Ana", "   ", "", "pw"))
        .unwrap_err();
    assert!(matches!(
        err,
        AccountServiceError::Validation(ValidationError::EmptyField("email"))
    ));
    assert!(accounts.get_user("").unwrap().is_none());
}

#[test]
fn password_is_stored_hashed() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&Registration::new("Ana", "a@x.com", "", "pw"))
        .unwrap();

    let stored = SqliteUserRepository::try_new(&conn)
        .unwrap()
        .password_hash("a@x.com")
        .unwrap()
        .unwrap();
    assert_ne!(stored, "pw");
    assert!(stored.starts_with("$argon2"));
}

#[test]
fn authenticate_requires_exact_match() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&Registration::new("Ana", "a@x.com", "", "pw"))
        .unwrap();

    assert!(accounts.authenticate("a@x.com", "pw").unwrap());
    assert!(!accounts.authenticate("a@x.com", "PW").unwrap());
    assert!(!accounts.authenticate("A@x.com", "pw").unwrap());
    assert!(!accounts.authenticate("a@x.com", "pw ").unwrap());
    assert!(!accounts.authenticate("nobody@x.com", "pw").unwrap());
}

#[test]
fn login_failures_are_indistinguishable() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&Registration::new("Ana", "a@x.com", "", "pw"))
        .unwrap();

    let wrong_password = accounts.login("a@x.com", "nope").unwrap_err();
    let unknown_email = accounts.login("ghost@x.com", "pw").unwrap_err();
    assert!(matches!(wrong_password, AccountServiceError::InvalidCredentials));
    assert!(matches!(unknown_email, AccountServiceError::InvalidCredentials));
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    assert!(!accounts.current_session().unwrap().is_logged_in);
}

#[test]
fn login_trims_form_input() {
    let conn = open_db_in_memory().unwrap();
    let accounts = service(&conn);
    accounts
        .register(&Registration::new("Ana", "a@x.com", "", "pw"))
        .unwrap();

    let user = accounts.login("  a@x.com ", " pw ").unwrap();
    assert_eq!(user.email, "a@x.com");
}
