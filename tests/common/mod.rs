#![allow(dead_code)]

//! A small stand-in for the CSES site, served by axum on a random port.

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Form, Router};
use tokio::net::TcpListener;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use cses_tests::{Session, SessionConfigBuilder};

pub const USER: &str = "alice";
pub const PASS: &str = "secret";
pub const TASK: &str = "1234";

const LOGIN_TOKEN: &str = "login-token-7f3a";
const TESTS_TOKEN: &str = "tests-token-91bc";

pub const TEST_FILES: &[(&str, &[u8])] = &[
    ("1.in", b"3\n1 2 3\n"),
    ("1.out", b"6\n"),
    ("2.in", b"1\n5\n"),
    ("2.out", b"5\n"),
];

/// Knobs to make the site misbehave.
#[derive(Debug, Default, Clone)]
pub struct Behavior {
    pub login_without_token: bool,
    pub tests_page_always_asks_login: bool,
    pub download_without_disposition: bool,
    /// Status of the archive reply, which keeps its `Content-Disposition`.
    pub download_status: Option<StatusCode>,
    pub delay: Option<Duration>,
}

/// One request as the site saw it.
#[derive(Debug, Clone)]
pub struct Seen {
    pub method: &'static str,
    pub path: String,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
}

pub struct MockSite {
    pub addr: SocketAddr,
    pub seen: Arc<Mutex<Vec<Seen>>>,
}

impl MockSite {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn session(&self) -> Session {
        let config = SessionConfigBuilder::default()
            .base_url(self.base_url())
            .build()
            .unwrap();
        Session::new(config).unwrap()
    }

    pub fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Seen> {
        self.seen().into_iter().filter(|s| s.method == "POST").collect()
    }
}

#[derive(Clone)]
struct AppState {
    behavior: Behavior,
    seen: Arc<Mutex<Vec<Seen>>>,
}

impl AppState {
    fn record(&self, method: &'static str, path: String, headers: &HeaderMap) {
        let value = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.to_string())
        };
        self.seen.lock().unwrap().push(Seen {
            method,
            path,
            referer: value(header::REFERER),
            user_agent: value(header::USER_AGENT),
        });
    }
}

fn logged_in(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|cookies| cookies.contains("auth=ok"))
        .unwrap_or(false)
}

fn login_page(with_token: bool) -> String {
    let token = if with_token {
        format!(r#"<input type="hidden" name="csrf_token" value="{}">"#, LOGIN_TOKEN)
    } else {
        String::new()
    };
    format!(
        r#"<html><body><a href="/login">Login</a>
        <form method="post">{}<input name="nick"><input type="password" name="pass"></form>
        </body></html>"#,
        token
    )
}

async fn get_login(State(state): State<AppState>, headers: HeaderMap) -> Response {
    state.record("GET", "/login".into(), &headers);
    (
        [(header::SET_COOKIE, "PHPSESSID=s1; Path=/")],
        Html(login_page(!state.behavior.login_without_token)),
    )
        .into_response()
}

async fn post_login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.record("POST", "/login".into(), &headers);
    let field = |name: &str| form.get(name).map(String::as_str);

    let has_session = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|c| c.contains("PHPSESSID=s1"))
        .unwrap_or(false);
    if has_session
        && field("csrf_token") == Some(LOGIN_TOKEN)
        && field("nick") == Some(USER)
        && field("pass") == Some(PASS)
    {
        return (
            [(header::SET_COOKIE, "auth=ok; Path=/")],
            Html(r#"<html><a href="/logout">Logout</a> alice</html>"#),
        )
            .into_response();
    }

    // the real site answers 200 with the form again
    Html(login_page(true)).into_response()
}

async fn get_tests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task): Path<String>,
) -> Response {
    state.record("GET", format!("/problemset/tests/{}/", task), &headers);
    if let Some(delay) = state.behavior.delay {
        tokio::time::sleep(delay).await;
    }

    if state.behavior.tests_page_always_asks_login || !logged_in(&headers) {
        return Html(login_page(true)).into_response();
    }

    Html(format!(
        r#"<html><a href="/logout">Logout</a>
        <form method="post"><input type="hidden" name="csrf_token" value="{}">
        <input type="hidden" name="download" value="true"></form></html>"#,
        TESTS_TOKEN
    ))
    .into_response()
}

async fn post_tests(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(task): Path<String>,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    state.record("POST", format!("/problemset/tests/{}/", task), &headers);

    let accepted = logged_in(&headers)
        && task == TASK
        && form.get("csrf_token").map(String::as_str) == Some(TESTS_TOKEN)
        && form.get("download").map(String::as_str) == Some("true");
    if !accepted || state.behavior.download_without_disposition {
        return Html("<html>Something went wrong</html>").into_response();
    }

    (
        state.behavior.download_status.unwrap_or(StatusCode::OK),
        [
            (header::CONTENT_TYPE, "application/zip"),
            (
                header::CONTENT_DISPOSITION,
                r#"attachment; filename="tests.zip""#,
            ),
        ],
        build_zip(TEST_FILES),
    )
        .into_response()
}

pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, content) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(content).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

pub async fn start_site(behavior: Behavior) -> MockSite {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let state = AppState {
        behavior,
        seen: seen.clone(),
    };
    let app = Router::new()
        .route("/login", get(get_login).post(post_login))
        .route("/problemset/tests/:task/", get(get_tests).post(post_tests))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockSite { addr, seen }
}
