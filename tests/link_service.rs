use actix_web::{App, HttpRequest, HttpResponse, HttpServer, http::header, web};
use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

use shortcut_admin::structs::link_request::{
    DeleteShortcut, DeleteShortcutAnswer, PutShortcut, PutShortcutAnswer,
};
use shortcut_admin::{
    Credentials, GateState, HttpLinkService, LinkService, Presenter, PresenterError,
    ShortLinkRecord, TrustState,
};

/// Stand-in for the link service behind `/s`.
#[derive(Default)]
struct FakeLinks {
    rows: Mutex<HashMap<String, PutShortcut>>,
    hits: AtomicUsize,
    authorization: Option<&'static str>,
}

impl FakeLinks {
    fn admit(&self, req: &HttpRequest) -> Option<HttpResponse> {
        self.hits.fetch_add(1, Ordering::SeqCst);
        let expected = self.authorization?;
        let given = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        if given == Some(expected) {
            None
        } else {
            Some(HttpResponse::Unauthorized().body("Unauthorized"))
        }
    }
}

async fn put_link(
    links: web::Data<FakeLinks>,
    req: HttpRequest,
    web::Json(body): web::Json<PutShortcut>,
) -> HttpResponse {
    if let Some(denied) = links.admit(&req) {
        return denied;
    }
    if body.slug == "reserved" {
        return HttpResponse::Conflict().body("The slug 'reserved' is already taken.");
    }
    let slug = body.slug.clone();
    links.rows.lock().unwrap().insert(slug.clone(), body);
    HttpResponse::Created().json(PutShortcutAnswer { slug })
}

async fn delete_link(
    links: web::Data<FakeLinks>,
    req: HttpRequest,
    web::Json(body): web::Json<DeleteShortcut>,
) -> HttpResponse {
    if let Some(denied) = links.admit(&req) {
        return denied;
    }
    match links.rows.lock().unwrap().remove(&body.slug) {
        Some(_) => HttpResponse::Ok().json(DeleteShortcutAnswer { rows_affected: 1 }),
        None => HttpResponse::NotFound().body(format!("No shortcut '{}'.", body.slug)),
    }
}

fn spawn_service(authorization: Option<&'static str>) -> (Url, web::Data<FakeLinks>) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let links = web::Data::new(FakeLinks {
        authorization,
        ..FakeLinks::default()
    });

    let data = links.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/s", web::put().to(put_link))
            .route("/s", web::delete().to(delete_link))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    tokio::spawn(server);

    let origin = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    (origin, links)
}

fn presenter(origin: &Url, credentials: Option<Credentials>) -> Presenter<HttpLinkService> {
    let service = HttpLinkService::new(origin, credentials).unwrap();
    Presenter::new(service, origin.clone())
}

#[tokio::test]
async fn create_then_delete() {
    let (origin, links) = spawn_service(None);
    let mut presenter = presenter(&origin, None);

    presenter
        .submit(&ShortLinkRecord::new("abc", "https://example.com"))
        .await
        .unwrap();

    let stored = links.rows.lock().unwrap().get("abc").cloned().unwrap();
    assert_eq!(stored.url, "https://example.com/");
    assert!(!stored.approval);

    let row = presenter.listing().get("abc").unwrap();
    assert_eq!(row.gate_state(chrono::Utc::now().timestamp_millis()), GateState::Reachable);
    assert_eq!(row.trust_state(), TrustState::Trusted);

    presenter.delete("abc").await.unwrap();
    assert!(!presenter.listing().contains("abc"));
    assert!(links.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn server_message_is_surfaced() {
    let (origin, links) = spawn_service(None);
    let mut presenter = presenter(&origin, None);

    let error = presenter
        .submit(&ShortLinkRecord::new("reserved", "https://example.com"))
        .await
        .unwrap_err();

    match error {
        PresenterError::Server { status, message } => {
            assert_eq!(status, 409);
            assert_eq!(message, "The slug 'reserved' is already taken.");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(presenter.listing().is_empty());
    assert_eq!(
        presenter.message(),
        Some("The slug 'reserved' is already taken.")
    );
    assert_eq!(links.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_records_never_leave_the_client() {
    let (origin, links) = spawn_service(None);
    let mut presenter = presenter(&origin, None);

    let long = ShortLinkRecord::new("a".repeat(65), "https://example.com");
    assert!(presenter.submit(&long).await.is_err());
    let bad_url = ShortLinkRecord::new("abc", "example.com");
    assert!(presenter.submit(&bad_url).await.is_err());

    assert_eq!(links.hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn deleting_an_unknown_slug_reports_the_service_text() {
    let (origin, _links) = spawn_service(None);
    let service = HttpLinkService::new(&origin, None).unwrap();

    let error = service.delete("ghost").await.unwrap_err();
    assert_eq!(error.to_string(), "No shortcut 'ghost'.");
}

#[tokio::test]
async fn basic_credentials_are_sent() {
    let (origin, links) = spawn_service(Some("Basic YWRtaW46c2VjcmV0"));

    let anonymous = HttpLinkService::new(&origin, None).unwrap();
    let record = ShortLinkRecord::new("abc", "https://example.com");
    let body = record.validate().unwrap();
    assert!(matches!(
        anonymous.put(&body).await,
        Err(PresenterError::Server { status: 401, .. })
    ));

    let admin = HttpLinkService::new(
        &origin,
        Some(Credentials {
            username: "admin".into(),
            password: "secret".into(),
        }),
    )
    .unwrap();
    let answer = admin.put(&body).await.unwrap();
    assert_eq!(answer, Some(PutShortcutAnswer { slug: "abc".into() }));
    assert!(links.rows.lock().unwrap().contains_key("abc"));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let origin = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let mut presenter = presenter(&origin, None);

    let error = presenter
        .submit(&ShortLinkRecord::new("abc", "https://example.com"))
        .await
        .unwrap_err();

    assert!(matches!(error, PresenterError::Transport(_)));
    assert!(presenter.listing().is_empty());
}
