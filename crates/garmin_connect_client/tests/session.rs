use garmin_connect_client::{Config, GarminError, Session};
use secrecy::SecretString;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: &str) -> Config {
    Config {
        username: "alice".into(),
        password: SecretString::new("s3cret".into()),
        base_url: base_url.trim_end_matches('/').to_string(),
        user_agent: "TestAgent/1.0".into(),
    }
}

async fn mount_sign_in_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/signin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>welcome back</html>"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn sign_in_submits_login_form_fields() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;

    Session::sign_in(&test_config(&server.uri()))
        .await
        .expect("sign in");

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let body = String::from_utf8(received[0].body.clone()).unwrap();
    assert!(body.contains("login%3AloginUsernameField=alice"));
    assert!(body.contains("login%3Apassword=s3cret"));
}

#[tokio::test]
async fn sign_in_sends_configured_user_agent() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;

    Session::sign_in(&test_config(&server.uri()))
        .await
        .expect("sign in");

    let received = server.received_requests().await.unwrap();
    let ua = received[0].headers.get("user-agent").unwrap();
    assert_eq!(ua.to_str().unwrap(), "TestAgent/1.0");
}

#[tokio::test]
async fn sign_in_error_marker_is_auth_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signin"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<span class="errorMessage">bad credentials</span>"#),
        )
        .mount(&server)
        .await;

    let res = Session::sign_in(&test_config(&server.uri())).await;
    assert!(matches!(res, Err(GarminError::Auth(_))));
}

#[tokio::test]
async fn request_returns_body_on_success() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
        .mount(&server)
        .await;

    let session = Session::sign_in(&test_config(&server.uri()))
        .await
        .expect("sign in");
    let body = session
        .request(&format!("{}/data", server.uri()))
        .await
        .expect("request");
    assert_eq!(body, b"payload");
}

#[tokio::test]
async fn request_relogs_in_and_retries_on_non_200() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;

    // First hit looks like a lapsed session, the retry succeeds.
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
        .mount(&server)
        .await;

    let session = Session::sign_in(&test_config(&server.uri()))
        .await
        .expect("sign in");
    let body = session
        .request(&format!("{}/data", server.uri()))
        .await
        .expect("request after relogin");
    assert_eq!(body, b"payload");

    // Sign-in must have run twice: once at construction, once for the retry.
    let received = server.received_requests().await.unwrap();
    let logins = received
        .iter()
        .filter(|r| r.url.path() == "/signin")
        .count();
    assert_eq!(logins, 2);
}

#[tokio::test]
async fn request_gives_up_after_two_attempts() {
    let server = MockServer::start().await;
    mount_sign_in_ok(&server).await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let session = Session::sign_in(&test_config(&server.uri()))
        .await
        .expect("sign in");
    let err = session
        .request(&format!("{}/data", server.uri()))
        .await
        .unwrap_err();
    match err {
        GarminError::Api(msg) => assert!(msg.contains("after 2 attempts")),
        other => panic!("expected Api error, got {other:?}"),
    }

    let received = server.received_requests().await.unwrap();
    let gets = received.iter().filter(|r| r.url.path() == "/data").count();
    assert_eq!(gets, 2);
}
