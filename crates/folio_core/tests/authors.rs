use folio_core::db::open_db_in_memory;
use folio_core::{
    CommentDraft, CommentRepository, CommentService, ContentKind, ServiceError,
    SqliteCommentRepository, SqliteContentService, SqliteItemRepository,
    SqliteTagAccountRepository, TagAccountRepository, TagCount, ValidationError,
};
use rusqlite::Connection;

fn comment_service(
    conn: &Connection,
) -> CommentService<SqliteItemRepository<'_>, SqliteCommentRepository<'_>> {
    CommentService::new(
        SqliteItemRepository::try_new(conn).unwrap(),
        SqliteCommentRepository::try_new(conn).unwrap(),
    )
}

#[test]
fn register_rejects_duplicates_and_invalid_usernames() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteContentService::open(&conn).unwrap();

    let author = service.register_author("ann", " Ann's notes ").unwrap();
    assert_eq!(author.blogname, "Ann's notes");
    assert_eq!(service.get_author("ann").unwrap(), author);

    assert!(matches!(
        service.register_author("ann", "again"),
        Err(ServiceError::AuthorExists(_))
    ));
    assert!(matches!(
        service.register_author("ann!", ""),
        Err(ServiceError::InvalidInput(ValidationError::InvalidAuthor(_)))
    ));
    assert!(service.get_author("zed").unwrap_err().is_not_found());
}

#[test]
fn items_can_only_be_created_for_registered_authors() {
    let conn = open_db_in_memory().unwrap();
    let mut service = SqliteContentService::open(&conn).unwrap();

    let err = service
        .create_from_form("ghost", ContentKind::Post, "Hello", "rust")
        .unwrap_err();
    assert!(matches!(err, ServiceError::AuthorNotFound(_)));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM content_items;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn views_add_up_on_the_item_and_the_author() {
    let conn = open_db_in_memory().unwrap();
    let mut service = SqliteContentService::open(&conn).unwrap();
    service.register_author("ann", "").unwrap();
    let first = service
        .create_from_form("ann", ContentKind::Post, "One", "")
        .unwrap();
    let second = service
        .create_from_form("ann", ContentKind::Project, "Two", "")
        .unwrap();

    service.increment_view(&first).unwrap();
    service.increment_view(&first).unwrap();
    service.increment_view(&second).unwrap();
    service.increment_read(&second).unwrap();

    assert_eq!(service.get_item(&first).unwrap().views, 2);
    assert_eq!(service.get_author("ann").unwrap().total_views, 3);

    // The running total outlives the items it was counted on.
    service.delete_item(&first).unwrap();
    assert_eq!(service.get_author("ann").unwrap().total_views, 3);
}

#[test]
fn removing_an_author_clears_items_comments_and_tags() {
    let conn = open_db_in_memory().unwrap();
    let mut service = SqliteContentService::open(&conn).unwrap();
    service.register_author("ann", "").unwrap();
    service.register_author("bob", "").unwrap();

    let active = service
        .create_from_form("ann", ContentKind::Post, "Live", "rust, go")
        .unwrap();
    let archived = service
        .create_from_form("ann", ContentKind::Changelog, "Old", "rust")
        .unwrap();
    service.archive_item(&archived).unwrap();
    let kept = service
        .create_from_form("bob", ContentKind::Post, "Bob's", "rust")
        .unwrap();

    let mut comments = comment_service(&conn);
    comments
        .add_comment(&active, CommentDraft::new("eve", "nice"))
        .unwrap();
    comments
        .add_comment(&kept, CommentDraft::new("eve", "also nice"))
        .unwrap();

    service.remove_author("ann").unwrap();

    assert!(service.get_author("ann").unwrap_err().is_not_found());
    assert!(service.get_item(&active).unwrap_err().is_not_found());
    assert!(service.get_item(&archived).unwrap_err().is_not_found());

    let comment_repo = SqliteCommentRepository::try_new(&conn).unwrap();
    assert_eq!(comment_repo.count_for_item(&active).unwrap(), 0);
    assert_eq!(comment_repo.count_for_item(&kept).unwrap(), 1);

    let tags = SqliteTagAccountRepository::try_new(&conn).unwrap();
    assert!(tags.list_counts("ann").unwrap().is_empty());
    assert_eq!(
        service.list_tags("bob").unwrap(),
        vec![TagCount::new("rust", 1)]
    );
    assert!(matches!(
        service.list_tags("ann"),
        Err(ServiceError::AuthorNotFound(_))
    ));
}

#[test]
fn removing_an_unknown_author_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = SqliteContentService::open(&conn).unwrap();
    assert!(matches!(
        service.remove_author("ghost"),
        Err(ServiceError::AuthorNotFound(_))
    ));
}

#[test]
fn a_removed_username_can_register_again_with_a_clean_slate() {
    let conn = open_db_in_memory().unwrap();
    let mut service = SqliteContentService::open(&conn).unwrap();
    service.register_author("ann", "").unwrap();
    service
        .create_from_form("ann", ContentKind::Post, "One", "rust")
        .unwrap();
    service.remove_author("ann").unwrap();

    service.register_author("ann", "").unwrap();
    let (context, _) = service.list_page("ann", ContentKind::Post, 1, 10).unwrap();
    assert_eq!(context.total, 0);
    assert!(service.list_tags("ann").unwrap().is_empty());
    assert_eq!(service.get_author("ann").unwrap().total_views, 0);
}
