use postboard::posts::Post;
use postboard::server::routes;
use postboard::storage::{MemoryStorage, Storage};
use std::sync::Arc;
use warp::http::StatusCode;

const FORM: &str = "application/x-www-form-urlencoded";

fn seeded() -> Arc<MemoryStorage> {
    Arc::new(MemoryStorage::with_document(
        r#"[{"id": 1, "author": "A. Writer", "title": "Hello", "content": "Body text", "likes": 3}]"#,
    ))
}

#[tokio::test]
async fn test_index_lists_posts() {
    let api = routes(seeded());

    let res = warp::test::request().method("GET").path("/").reply(&api).await;

    assert_eq!(res.status(), StatusCode::OK);
    let posts: Vec<Post> = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].likes, 3);
}

#[tokio::test]
async fn test_add_redirects_and_assigns_next_id() {
    let storage = seeded();
    let api = routes(storage.clone());

    let res = warp::test::request()
        .method("POST")
        .path("/add")
        .header("content-type", FORM)
        .body("author=Ada&title=Second&content=Some+words")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(res.headers()["location"], "/");
    let posts = storage.load().unwrap();
    let created = posts.find_by_id(2).unwrap();
    assert_eq!(created.author, "Ada");
    assert_eq!(created.content, "Some words");
    assert_eq!(created.likes, 0);
}

#[tokio::test]
async fn test_add_requires_all_fields() {
    let storage = seeded();
    let api = routes(storage.clone());

    let res = warp::test::request()
        .method("POST")
        .path("/add")
        .header("content-type", FORM)
        .body("author=Ada&title=Second")
        .reply(&api)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(storage.load().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_form_and_submit() {
    let storage = seeded();
    let api = routes(storage.clone());

    let res = warp::test::request().method("GET").path("/update/1").reply(&api).await;
    assert_eq!(res.status(), StatusCode::OK);
    let post: Post = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(post.title, "Hello");

    let res = warp::test::request()
        .method("POST")
        .path("/update/1")
        .header("content-type", FORM)
        .body("title=Changed&content=New+body")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let posts = storage.load().unwrap();
    let updated = posts.find_by_id(1).unwrap();
    assert_eq!(updated.title, "Changed");
    assert_eq!(updated.content, "New body");
    assert_eq!(updated.author, "A. Writer");
    assert_eq!(updated.likes, 3);
}

#[tokio::test]
async fn test_update_unknown_post_is_404() {
    let storage = seeded();
    let api = routes(storage.clone());
    let before = storage.document().unwrap();

    let res = warp::test::request().method("GET").path("/update/5").reply(&api).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = warp::test::request()
        .method("POST")
        .path("/update/5")
        .header("content-type", FORM)
        .body("title=x&content=y")
        .reply(&api)
        .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(storage.document().unwrap(), before);
}

#[tokio::test]
async fn test_delete_and_like_always_redirect() {
    let storage = seeded();
    let api = routes(storage.clone());

    for path in ["/like/1", "/like/42", "/delete/42"] {
        let res = warp::test::request().method("GET").path(path).reply(&api).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{}", path);
    }
    assert_eq!(storage.load().unwrap().find_by_id(1).unwrap().likes, 4);

    let res = warp::test::request().method("GET").path("/delete/1").reply(&api).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(storage.load().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_is_500() {
    let api = routes(Arc::new(MemoryStorage::missing()));

    let res = warp::test::request().method("GET").path("/").reply(&api).await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = String::from_utf8(res.body().to_vec()).unwrap();
    assert!(body.starts_with("Storage unavailable"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let api = routes(seeded());

    let res = warp::test::request().method("GET").path("/nowhere").reply(&api).await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}
