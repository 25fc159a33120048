use std::sync::Arc;

use invoicedesk_api::app::{AppServices, build_app};
use invoicedesk_auth::{InMemoryUserDirectory, UserRecord};
use invoicedesk_infra::{InMemoryInvoiceStore, Settings};
use reqwest::{StatusCode, header};
use serde_json::Value;

const EMAIL: &str = "user@nextmail.com";
const PASSWORD: &str = "123456";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod over in-memory stores, bound to an ephemeral port.
        let directory = InMemoryUserDirectory::new();
        directory.insert(UserRecord::with_password("User", EMAIL, "salt", PASSWORD));
        let services = AppServices::from_parts(
            &Settings::default(),
            Arc::new(InMemoryInvoiceStore::new()),
            Arc::new(directory),
        )
        .expect("failed to build services");
        let app = build_app(services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            base_url,
            client,
            handle,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("email", email), ("password", password)])
            .send()
            .await
            .unwrap()
    }

    /// Sign in and return the session token from the cookie.
    async fn session_token(&self) -> String {
        let res = self.login(EMAIL, PASSWORD).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .expect("missing session cookie")
            .to_str()
            .unwrap()
            .to_string();
        let pair = cookie.split(';').next().unwrap();
        pair.strip_prefix("session=").unwrap().to_string()
    }

    async fn list(&self, token: &str) -> Vec<Value> {
        let res = self
            .client
            .get(self.url("/dashboard/invoices"))
            .bearer_auth(token)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        body.as_array().unwrap().clone()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn location(res: &reqwest::Response) -> &str {
    res.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn dashboard_requires_a_session() {
    let srv = TestServer::spawn().await;

    let res = srv.client.get(srv.url("/dashboard/customers")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = srv
        .client
        .get(srv.url("/dashboard/invoices"))
        .bearer_auth("not-a-token")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_password_is_rejected_without_redirect() {
    let srv = TestServer::spawn().await;

    let res = srv.login(EMAIL, "wrong-password").await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::LOCATION).is_none());
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Invalid credentials.");

    let res = srv.login("nobody@nextmail.com", PASSWORD).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_sets_cookie_and_identifies_the_user() {
    let srv = TestServer::spawn().await;

    let res = srv.login(EMAIL, PASSWORD).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/dashboard");
    let cookie = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Secure"));
    let pair = cookie.split(';').next().unwrap().to_string();
    assert!(pair.starts_with("session="));

    // The redirect target exists and is guarded by the same session.
    let res = srv
        .client
        .get(srv.url("/dashboard"))
        .header(header::COOKIE, pair.clone())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let overview: Value = res.json().await.unwrap();
    assert_eq!(overview["user"]["email"], EMAIL);
    assert_eq!(overview["invoices"], "/dashboard/invoices");

    let res = srv
        .client
        .get(srv.url("/dashboard/customers"))
        .header(header::COOKIE, pair)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["email"], EMAIL);
    assert_eq!(body["id"], overview["user"]["id"]);
}

#[tokio::test]
async fn dashboard_landing_requires_a_session() {
    let srv = TestServer::spawn().await;
    let res = srv.client.get(srv.url("/dashboard")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn invoice_lifecycle_create_update_delete() {
    let srv = TestServer::spawn().await;
    let token = srv.session_token().await;
    assert!(srv.list(&token).await.is_empty());

    let res = srv
        .client
        .post(srv.url("/dashboard/invoices"))
        .bearer_auth(&token)
        .form(&[("customerId", "c1"), ("amount", "50"), ("status", "pending")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/dashboard/invoices");

    let invoices = srv.list(&token).await;
    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0]["customerId"], "c1");
    assert_eq!(invoices[0]["amountCents"], 5000);
    assert_eq!(invoices[0]["status"], "pending");
    let id = invoices[0]["id"].as_str().unwrap().to_string();

    let res = srv
        .client
        .post(srv.url(&format!("/dashboard/invoices/{id}")))
        .bearer_auth(&token)
        .form(&[("customerId", "c2"), ("amount", "19.99"), ("status", "paid")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let invoices = srv.list(&token).await;
    assert_eq!(invoices[0]["customerId"], "c2");
    assert_eq!(invoices[0]["amountCents"], 1999);
    assert_eq!(invoices[0]["status"], "paid");

    let res = srv
        .client
        .post(srv.url(&format!("/dashboard/invoices/{id}/delete")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(srv.list(&token).await.is_empty());
}

#[tokio::test]
async fn invalid_create_renders_field_errors() {
    let srv = TestServer::spawn().await;
    let token = srv.session_token().await;

    let res = srv
        .client
        .post(srv.url("/dashboard/invoices"))
        .bearer_auth(&token)
        .form(&[("amount", "0"), ("status", "overdue")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Missing Fields. Failed to Create Invoice.");
    assert_eq!(body["errors"]["customerId"][0], "Please select a customer.");
    assert_eq!(body["errors"]["amount"][0], "Amount must be greater than 0");
    assert_eq!(body["errors"]["status"][0], "Please select a valid status.");

    assert!(srv.list(&token).await.is_empty());
}

#[tokio::test]
async fn update_of_unknown_invoice_is_not_found() {
    let srv = TestServer::spawn().await;
    let token = srv.session_token().await;

    let res = srv
        .client
        .post(srv.url("/dashboard/invoices/does-not-exist"))
        .bearer_auth(&token)
        .form(&[("customerId", "c1"), ("amount", "10"), ("status", "paid")])
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn delete_of_unknown_invoice_succeeds() {
    let srv = TestServer::spawn().await;
    let token = srv.session_token().await;

    let res = srv
        .client
        .post(srv.url("/dashboard/invoices/does-not-exist/delete"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
}
