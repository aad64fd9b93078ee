// tests/server_livereload.rs

mod common;
use crate::common::write_file;

use axum::http::StatusCode;
use axum_test::TestServer;
use assetpipe::reload::ReloadHub;
use assetpipe::server::{inject_reload_script, router, ServerState, CLIENT_SCRIPT, CLIENT_SCRIPT_PATH, RELOAD_EVENTS_PATH};
use tempfile::{tempdir, TempDir};

fn output_tree() -> TempDir {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "index.html", "<html><body><p>Home</p></body></html>");
    write_file(dir.path(), "pages/about.html", "<html><body><p>About</p></body></html>");
    write_file(dir.path(), "css/styles.css", "body{margin:0}");
    dir
}

fn setup(dir: &TempDir, reload: ReloadHub) -> TestServer {
    let state = ServerState::new(dir.path(), reload);
    TestServer::new(router(state)).expect("Failed to create test server")
}

mod live_reload_on {
    use super::*;

    #[tokio::test]
    async fn index_gets_the_client_script() {
        let dir = output_tree();
        let server = setup(&dir, ReloadHub::new(8));

        let response = server.get("/").await;
        response.assert_status_ok();
        let body = response.text();
        let script = body.find(CLIENT_SCRIPT_PATH).unwrap();
        let closing = body.find("</body>").unwrap();
        assert!(script < closing);
    }

    #[tokio::test]
    async fn nested_pages_are_injected_too() {
        let dir = output_tree();
        let server = setup(&dir, ReloadHub::new(8));

        let body = server.get("/pages/about.html").await.text();
        assert!(body.contains("<p>About</p>"));
        assert!(body.contains(CLIENT_SCRIPT_PATH));
    }

    #[tokio::test]
    async fn client_script_is_served() {
        let dir = output_tree();
        let server = setup(&dir, ReloadHub::new(8));

        let response = server.get(CLIENT_SCRIPT_PATH).await;
        response.assert_status_ok();
        assert_eq!(response.text(), CLIENT_SCRIPT);
    }

    #[tokio::test]
    async fn stylesheets_are_served_untouched() {
        let dir = output_tree();
        let server = setup(&dir, ReloadHub::new(8));

        let response = server.get("/css/styles.css").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "body{margin:0}");
    }

    #[tokio::test]
    async fn percent_encoded_page_names_are_injected() {
        let dir = output_tree();
        write_file(dir.path(), "my page.html", "<html><body><p>Spaced</p></body></html>");
        let server = setup(&dir, ReloadHub::new(8));

        let response = server.get("/my%20page.html").await;
        response.assert_status_ok();
        let body = response.text();
        assert!(body.contains("<p>Spaced</p>"));
        assert!(body.contains(CLIENT_SCRIPT_PATH));
    }

    #[tokio::test]
    async fn encoded_parent_segments_do_not_escape_the_root() {
        let parent = tempdir().unwrap();
        write_file(parent.path(), "secret.html", "<p>secret</p>");
        let root = parent.path().join("dist");
        write_file(&root, "index.html", "<html><body></body></html>");
        let server = TestServer::new(router(ServerState::new(&root, ReloadHub::new(8)))).unwrap();

        let response = server.get("/%2e%2e/secret.html").await;
        assert_ne!(response.status_code(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_files_are_404() {
        let dir = output_tree();
        let server = setup(&dir, ReloadHub::new(8));

        server.get("/nope.html").await.assert_status(StatusCode::NOT_FOUND);
    }
}

mod live_reload_off {
    use super::*;

    #[tokio::test]
    async fn pages_are_served_verbatim() {
        let dir = output_tree();
        let server = setup(&dir, ReloadHub::disabled());

        let response = server.get("/").await;
        response.assert_status_ok();
        assert_eq!(response.text(), "<html><body><p>Home</p></body></html>");
    }

    #[tokio::test]
    async fn event_stream_is_absent() {
        let dir = output_tree();
        let server = setup(&dir, ReloadHub::disabled());

        server
            .get(RELOAD_EVENTS_PATH)
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}

#[test]
fn script_goes_before_the_last_closing_body() {
    let html = "<body><pre></body></pre></BODY >";
    let out = inject_reload_script(html);
    assert!(out.ends_with(&format!("{}</BODY >", assetpipe::server::inject::script_tag())));

    let fragment = inject_reload_script("<p>fragment</p>");
    assert!(fragment.starts_with("<p>fragment</p><script"));
}
