use herbarium::domains::{AlbumDraft, AlbumEdit, Credentials, PLANT_FIELDS, POST_FIELDS, Registration};
use herbarium::{FormData, FormValue, HerbariumError, Method, RequestBody, RouteContext, entity_id_from_path};
use serde_json::json;
use uuid::Uuid;

const PLANT_ID: &str = "0b7d3c52-5a3e-4d8f-9c11-2f0e6a1b9d44";

fn plant_id() -> Uuid {
    Uuid::parse_str(PLANT_ID).unwrap()
}

#[test]
fn plant_update_targets_specification_endpoint() {
    let routes = RouteContext::default();
    let id = entity_id_from_path(&format!("/view/plant/{PLANT_ID}/update")).unwrap();
    assert_eq!(id, plant_id());

    let form = FormData::from_pairs([("category", "tree"), ("tree.height", "4")]);
    let request = routes.plant_update(id, &PLANT_FIELDS.parse_form(&form).unwrap()).unwrap();

    assert_eq!(request.method, Method::Put);
    assert_eq!(request.path, format!("/api/plant/specification/{PLANT_ID}"));
    assert_eq!(request.redirect, Some(format!("/view/plant/{PLANT_ID}")));
    let RequestBody::Multipart(payload) = &request.body else {
        panic!("plant update should send a multipart body");
    };
    assert_eq!(payload.get("specification"), Some(&FormValue::from(r#"{"height_m":4}"#)));
}

#[test]
fn create_requests_redirect_to_lists() {
    let routes = RouteContext::new("https://plants.example/api", "/view/");

    let plant = routes
        .plant_create(&PLANT_FIELDS.parse_form(&FormData::from_pairs([("name", "Oak")])).unwrap())
        .unwrap();
    assert_eq!(plant.path, "https://plants.example/api/plant/create");
    assert_eq!(plant.redirect.as_deref(), Some("/view/plants"));

    let post = routes
        .post_create(&POST_FIELDS.parse_form(&FormData::from_pairs([("title", "Hi")])).unwrap())
        .unwrap();
    assert_eq!(post.method, Method::Post);
    assert_eq!(post.redirect.as_deref(), Some("/view/posts"));

    let album = routes.album_create(&AlbumDraft::new("Shade", "Ferns"));
    assert_eq!(album.redirect.as_deref(), Some("/view/albums/"));
}

#[test]
fn album_update_renames_then_syncs_plants() {
    let edit = AlbumEdit {
        name: "Shade".into(),
        description: "Ferns and hostas".into(),
        initial_plant_ids: vec!["a".into(), "b".into()],
        selected_plant_ids: vec!["b".into(), "c".into(), "d".into()],
    };
    let requests = RouteContext::default().album_update(plant_id(), &edit);

    let summary: Vec<(Method, &str)> = requests
        .iter()
        .map(|request| (request.method, request.path.rsplit('/').nth(1).unwrap_or_default()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (Method::Put, "name"),
            (Method::Put, "description"),
            (Method::Delete, "remove"),
            (Method::Post, "add"),
            (Method::Post, "add"),
        ]
    );
    assert_eq!(requests[2].body, RequestBody::Json(json!({"plant_id": "a"})));
    assert_eq!(requests[4].body, RequestBody::Json(json!({"plant_id": "d"})));
    let (last, earlier) = requests.split_last().unwrap();
    assert!(earlier.iter().all(|request| request.redirect.is_none()));
    assert_eq!(last.redirect, Some(format!("/view/album/{PLANT_ID}")));
}

#[test]
fn album_update_without_plant_changes_still_redirects() {
    let edit = AlbumEdit {
        name: "Shade".into(),
        initial_plant_ids: vec!["a".into()],
        selected_plant_ids: vec!["a".into()],
        ..Default::default()
    };
    let redirects: Vec<Option<String>> = RouteContext::default()
        .album_update(plant_id(), &edit)
        .into_iter()
        .map(|request| request.redirect)
        .collect();
    assert_eq!(redirects, vec![None, Some(format!("/view/album/{PLANT_ID}"))]);
}

#[test]
fn register_sends_account_without_confirmation() {
    let registration = Registration {
        email: "ana@example.org".into(),
        username: "ana".into(),
        password: "secret".into(),
        password_confirm: "secret".into(),
    };
    let request = RouteContext::default().register(&registration).unwrap();
    assert_eq!(request.method, Method::Post);
    assert_eq!(request.path, "/api/auth/register");
    assert_eq!(
        request.body,
        RequestBody::Json(json!({"email": "ana@example.org", "username": "ana", "password": "secret"}))
    );
    assert_eq!(request.redirect.as_deref(), Some("/view/login"));
}

#[test]
fn register_is_refused_before_sending() {
    let routes = RouteContext::default();
    let mismatch = Registration {
        email: "ana@example.org".into(),
        password: "secret".into(),
        password_confirm: "secrets".into(),
        ..Default::default()
    };
    assert!(matches!(routes.register(&mismatch), Err(HerbariumError::PasswordMismatch)));

    let no_at = Registration {
        email: "ana.example.org".into(),
        ..Default::default()
    };
    assert!(matches!(routes.register(&no_at), Err(HerbariumError::InvalidEmail { .. })));
}

#[test]
fn login_posts_json_and_opens_home() {
    let request = RouteContext::new("/api", "/view").login(&Credentials::new("ana", "secret")).unwrap();
    assert_eq!(request.path, "/api/auth/login");
    assert_eq!(request.body, RequestBody::Json(json!({"username": "ana", "password": "secret"})));
    assert_eq!(request.redirect.as_deref(), Some("/view"));
}

#[test]
fn plan_serializes_for_scripting() {
    let request = RouteContext::default().album_create(&AlbumDraft::new("Shade", ""));
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(json["method"], "POST");
    assert_eq!(json["body"]["kind"], "multipart");
    assert_eq!(
        json["body"]["data"],
        json!([["name", "Shade"], ["description", ""], ["plant_ids", ""]])
    );
}
