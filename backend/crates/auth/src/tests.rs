//! End-to-end tests for the portal: use cases wired to the store and the
//! full router driven with `tower::ServiceExt::oneshot`, one session cookie
//! per simulated browser.

#[cfg(test)]
mod support {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};
    use std::thread::{self, ThreadId};

    use platform::storage::{KeyValueStorage, MemoryStorage, StorageResult};
    use tokio::sync::Notify;

    use crate::application::config::AuthConfig;
    use crate::application::session_registry::SessionRegistry;
    use crate::application::session_store::SessionStore;
    use crate::domain::entity::login_grant::LoginGrant;
    use crate::domain::gateway::{Credentials, LoginGateway, Registration, RegistrationReceipt};
    use crate::error::{AuthError, AuthResult};

    /// One scripted backend answer to a login call.
    #[derive(Debug, Clone)]
    pub enum LoginScript {
        Grant {
            token: &'static str,
            user_type: &'static str,
        },
        Reject {
            status: u16,
            message: &'static str,
        },
        Malformed,
    }

    impl LoginScript {
        pub fn grant(token: &'static str, user_type: &'static str) -> Self {
            LoginScript::Grant { token, user_type }
        }

        fn play(self) -> AuthResult<LoginGrant> {
            match self {
                LoginScript::Grant { token, user_type } => {
                    LoginGrant::from_wire(Some(token.to_string()), Some(user_type.to_string()))
                }
                LoginScript::Reject { status, message } => Err(AuthError::BackendRejected {
                    status,
                    message: message.to_string(),
                }),
                LoginScript::Malformed => Err(AuthError::MalformedLoginResponse),
            }
        }
    }

    /// Pause point inside `sign_in`, for interleaving concurrent logins.
    #[derive(Default)]
    pub struct Pause {
        pub entered: Notify,
        pub release: Notify,
    }

    #[derive(Default)]
    pub struct ScriptedGateway {
        logins: Mutex<VecDeque<LoginScript>>,
        registrations: Mutex<Vec<String>>,
        register_message: Option<&'static str>,
        pause: Option<Arc<Pause>>,
    }

    impl ScriptedGateway {
        pub fn with_logins(scripts: impl IntoIterator<Item = LoginScript>) -> Self {
            Self {
                logins: Mutex::new(scripts.into_iter().collect()),
                ..Default::default()
            }
        }

        pub fn paused(mut self, pause: Arc<Pause>) -> Self {
            self.pause = Some(pause);
            self
        }

        pub fn with_register_message(mut self, message: &'static str) -> Self {
            self.register_message = Some(message);
            self
        }

        pub fn registered_emails(&self) -> Vec<String> {
            self.registrations.lock().unwrap().clone()
        }

        fn next_login(&self) -> LoginScript {
            self.logins
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(LoginScript::Reject {
                    status: 401,
                    message: "Invalid credentials",
                })
        }
    }

    impl LoginGateway for ScriptedGateway {
        async fn sign_in(&self, _credentials: &Credentials) -> AuthResult<LoginGrant> {
            let script = self.next_login();
            if let Some(pause) = &self.pause {
                pause.entered.notify_one();
                pause.release.notified().await;
            }
            script.play()
        }

        async fn register(&self, registration: &Registration) -> AuthResult<RegistrationReceipt> {
            self.registrations
                .lock()
                .unwrap()
                .push(registration.email.as_str().to_string());
            Ok(RegistrationReceipt {
                message: self.register_message.map(str::to_string),
            })
        }
    }

    pub type TestStore = SessionStore<Arc<MemoryStorage>>;

    pub fn open_store() -> (Arc<MemoryStorage>, Arc<TestStore>) {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::open(storage.clone(), &AuthConfig::default()).unwrap();
        (storage, Arc::new(store))
    }

    pub type TestRegistry = SessionRegistry<Arc<MemoryStorage>>;

    pub fn open_registry() -> Arc<TestRegistry> {
        Arc::new(SessionRegistry::new(
            Arc::new(MemoryStorage::new()),
            &AuthConfig::default(),
        ))
    }

    /// Memory storage that records which thread performed each write.
    #[derive(Default)]
    pub struct ThreadRecordingStorage {
        inner: MemoryStorage,
        writers: Mutex<Vec<ThreadId>>,
    }

    impl ThreadRecordingStorage {
        pub fn writers(&self) -> Vec<ThreadId> {
            self.writers.lock().unwrap().clone()
        }

        fn record(&self) {
            self.writers.lock().unwrap().push(thread::current().id());
        }
    }

    impl KeyValueStorage for ThreadRecordingStorage {
        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            self.inner.get(key)
        }

        fn set_all(&self, entries: &[(&str, &str)]) -> StorageResult<()> {
            self.record();
            self.inner.set_all(entries)
        }

        fn remove_all(&self, keys: &[&str]) -> StorageResult<()> {
            self.record();
            self.inner.remove_all(keys)
        }
    }
}

#[cfg(test)]
mod use_case_tests {
    use std::sync::Arc;

    use platform::storage::KeyValueStorage;

    use super::support::*;
    use crate::application::config::AuthConfig;
    use crate::application::session_store::SessionStore;
    use crate::application::{
        LoginInput, LoginUseCase, LogoutUseCase, SignUpInput, SignUpUseCase,
    };
    use crate::domain::route_table::{RoleSection, RouteTable};
    use crate::domain::value_object::user_role::UserRole;
    use crate::error::AuthError;

    fn login_use_case(
        store: Arc<TestStore>,
        gateway: ScriptedGateway,
        table: RouteTable,
    ) -> LoginUseCase<Arc<platform::storage::MemoryStorage>, ScriptedGateway> {
        LoginUseCase::new(
            store,
            Arc::new(gateway),
            Arc::new(table),
            Arc::new(AuthConfig::default()),
        )
    }

    fn input(email: &str, password: &str) -> LoginInput {
        LoginInput {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_persists_session_and_returns_home() {
        let (storage, store) = open_store();
        let gateway = ScriptedGateway::with_logins([LoginScript::grant("tok-h", "HOSPITAL")]);
        let use_case = login_use_case(store.clone(), gateway, RouteTable::standard());

        let output = use_case
            .execute(input("Ward@Example.org", "secret"))
            .await
            .unwrap();

        assert_eq!(output.role, UserRole::Hospital);
        assert_eq!(output.redirect_to, "/hospital");
        assert!(store.is_authenticated());
        assert_eq!(storage.get("authToken").unwrap().as_deref(), Some("tok-h"));
        assert_eq!(storage.get("userType").unwrap().as_deref(), Some("HOSPITAL"));
    }

    #[tokio::test]
    async fn test_login_with_unknown_user_type_leaves_store_untouched() {
        let (storage, store) = open_store();
        let gateway = ScriptedGateway::with_logins([LoginScript::grant("tok", "NURSE")]);
        let use_case = login_use_case(store.clone(), gateway, RouteTable::standard());

        let err = use_case
            .execute(input("a@b.org", "secret"))
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidRole(ref code) if code == "NURSE"));
        assert!(!store.is_authenticated());
        assert_eq!(storage.get("authToken").unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_rejected_by_backend_keeps_previous_session() {
        let (_storage, store) = open_store();
        store.login("old", "DONOR").unwrap();

        let gateway = ScriptedGateway::with_logins([LoginScript::Reject {
            status: 401,
            message: "Invalid credentials",
        }]);
        let use_case = login_use_case(store.clone(), gateway, RouteTable::standard());

        let err = use_case
            .execute(input("a@b.org", "wrong"))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(store.role(), Some(UserRole::Donor));
    }

    #[tokio::test]
    async fn test_login_validates_input_before_calling_backend() {
        let (_storage, store) = open_store();
        let gateway = ScriptedGateway::with_logins([LoginScript::grant("tok", "ADMIN")]);
        let use_case = login_use_case(store.clone(), gateway, RouteTable::standard());

        let err = use_case.execute(input("not-an-email", "x")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));

        let err = use_case.execute(input("a@b.org", "")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));

        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_for_unmapped_role_redirects_to_login() {
        let (_storage, store) = open_store();
        let table = RouteTable::from_sections([RoleSection {
            role: UserRole::Admin,
            home_path: "/admin",
            pages: Vec::new(),
            nav: Vec::new(),
        }]);
        let gateway = ScriptedGateway::with_logins([LoginScript::grant("tok", "DONOR")]);
        let use_case = login_use_case(store.clone(), gateway, table);

        let output = use_case.execute(input("a@b.org", "pw")).await.unwrap();

        assert_eq!(output.role, UserRole::Donor);
        assert_eq!(output.redirect_to, "/login");
    }

    #[tokio::test]
    async fn test_malformed_login_response_is_surfaced() {
        let (_storage, store) = open_store();
        let gateway = ScriptedGateway::with_logins([LoginScript::Malformed]);
        let use_case = login_use_case(store.clone(), gateway, RouteTable::standard());

        let err = use_case.execute(input("a@b.org", "pw")).await.unwrap_err();

        assert!(matches!(err, AuthError::MalformedLoginResponse));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_stale_login_response_cannot_overwrite_newer_login() {
        let (_storage, store) = open_store();

        let pause = Arc::new(Pause::default());
        let slow = login_use_case(
            store.clone(),
            ScriptedGateway::with_logins([LoginScript::grant("slow", "ADMIN")]).paused(pause.clone()),
            RouteTable::standard(),
        );
        let fast = login_use_case(
            store.clone(),
            ScriptedGateway::with_logins([LoginScript::grant("fast", "CUSTOMER")]),
            RouteTable::standard(),
        );

        let slow_task = tokio::spawn(async move { slow.execute(input("a@b.org", "pw")).await });
        pause.entered.notified().await;

        let output = fast.execute(input("c@d.org", "pw")).await.unwrap();
        assert_eq!(output.redirect_to, "/customer");

        pause.release.notify_one();
        let stale = slow_task.await.unwrap();

        assert!(matches!(stale, Err(AuthError::LoginSuperseded)));
        let session = store.snapshot().unwrap();
        assert_eq!(session.role, UserRole::Customer);
        assert_eq!(session.token.expose(), "fast");
    }

    #[tokio::test]
    async fn test_logout_during_login_wins() {
        let (_storage, store) = open_store();

        let pause = Arc::new(Pause::default());
        let slow = login_use_case(
            store.clone(),
            ScriptedGateway::with_logins([LoginScript::grant("slow", "STAFF")]).paused(pause.clone()),
            RouteTable::standard(),
        );

        let slow_task = tokio::spawn(async move { slow.execute(input("a@b.org", "pw")).await });
        pause.entered.notified().await;

        LogoutUseCase::new(store.clone()).execute().await.unwrap();

        pause.release.notify_one();
        assert!(matches!(slow_task.await.unwrap(), Err(AuthError::LoginSuperseded)));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_both_keys() {
        let (storage, store) = open_store();
        store.login("tok", "BLOOD_BANK").unwrap();

        let use_case = LogoutUseCase::new(store.clone());
        use_case.execute().await.unwrap();
        use_case.execute().await.unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(storage.get("authToken").unwrap(), None);
        assert_eq!(storage.get("userType").unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_writes_run_off_the_runtime_thread() {
        let storage = Arc::new(ThreadRecordingStorage::default());
        let store = Arc::new(SessionStore::new(storage.clone(), &AuthConfig::default()));
        let use_case = LoginUseCase::new(
            store.clone(),
            Arc::new(ScriptedGateway::with_logins([LoginScript::grant("tok", "DONOR")])),
            Arc::new(RouteTable::standard()),
            Arc::new(AuthConfig::default()),
        );

        use_case.execute(input("a@b.org", "pw")).await.unwrap();
        LogoutUseCase::new(store.clone()).execute().await.unwrap();

        // `#[tokio::test]` drives the runtime on this thread alone.
        let runtime_thread = std::thread::current().id();
        let writers = storage.writers();
        assert_eq!(writers.len(), 2);
        assert!(writers.iter().all(|writer| *writer != runtime_thread));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_sign_up_uses_backend_message_or_default() {
        let gateway = Arc::new(ScriptedGateway::default().with_register_message("Account created"));
        let output = SignUpUseCase::new(gateway.clone())
            .execute(SignUpInput {
                name: "Asha".to_string(),
                email: " Asha@Example.org ".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(output.message, "Account created");
        assert_eq!(gateway.registered_emails(), vec!["asha@example.org".to_string()]);

        let output = SignUpUseCase::new(Arc::new(ScriptedGateway::default()))
            .execute(SignUpInput {
                name: "Ravi".to_string(),
                email: "ravi@example.org".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(output.message, "Registration successful");
    }

    #[tokio::test]
    async fn test_sign_up_rejects_blank_name() {
        let gateway = Arc::new(ScriptedGateway::default());
        let err = SignUpUseCase::new(gateway.clone())
            .execute(SignUpInput {
                name: "  ".to_string(),
                email: "ravi@example.org".to_string(),
                password: "pw".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AuthError::InvalidInput(_)));
        assert!(gateway.registered_emails().is_empty());
    }
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;

    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use platform::storage::{FileStorage, KeyValueStorage};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::application::config::AuthConfig;
    use crate::application::session_registry::SessionRegistry;
    use crate::domain::route_table::RouteTable;
    use crate::domain::value_object::session_id::SessionId;
    use crate::presentation::router::portal_router_generic;

    fn portal<S>(registry: Arc<SessionRegistry<S>>, gateway: ScriptedGateway) -> Router
    where
        S: KeyValueStorage + Clone + 'static,
    {
        portal_router_generic(registry, gateway, RouteTable::standard(), AuthConfig::default())
    }

    /// Register an authenticated client and return its `Cookie` header value.
    fn logged_in(registry: &TestRegistry, token: &str, user_type: &str) -> String {
        let (id, store) = registry.issue();
        store.login(token, user_type).unwrap();
        registry.adopt(id.clone(), store);
        cookie_for(&id)
    }

    fn cookie_for(id: &SessionId) -> String {
        format!("portal_session={}", id.as_str())
    }

    async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
        let mut request = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(request.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn post_json(app: &Router, uri: &str, body: Value, cookie: Option<&str>) -> Response {
        let mut request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        app.clone()
            .oneshot(request.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap()
    }

    async fn login_as(app: &Router, cookie: Option<&str>) -> Response {
        post_json(
            app,
            "/api/auth/login",
            json!({ "email": "c@d.org", "password": "pw" }),
            cookie,
        )
        .await
    }

    /// `name=value` part of the response's `Set-Cookie` header.
    fn issued_cookie(response: &Response) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    fn location(response: &Response) -> &str {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        response.headers()[header::LOCATION].to_str().unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_other_role_section_redirects_to_own_home() {
        let registry = open_registry();
        let cookie = logged_in(&registry, "tok", "HOSPITAL");
        let app = portal(registry, ScriptedGateway::default());

        let response = get(&app, "/admin", Some(&cookie)).await;
        assert_eq!(location(&response), "/hospital");

        let response = get(&app, "/customer/profile", Some(&cookie)).await;
        assert_eq!(location(&response), "/hospital");
    }

    #[tokio::test]
    async fn test_guarded_page_without_session_redirects_to_login() {
        let app = portal(open_registry(), ScriptedGateway::default());

        let response = get(&app, "/customer/profile", None).await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_second_client_without_cookie_is_not_logged_in() {
        let gateway = ScriptedGateway::with_logins([LoginScript::grant("tok-a", "CUSTOMER")]);
        let app = portal(open_registry(), gateway);

        let response = login_as(&app, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let alice = issued_cookie(&response);

        let response = get(&app, "/customer", Some(&alice)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(&app, "/customer", None).await;
        assert_eq!(location(&response), "/login");
        let response = get(&app, "/dashboard", None).await;
        assert_eq!(location(&response), "/login");
        let status = json_body(get(&app, "/api/auth/status", None).await).await;
        assert_eq!(status["authenticated"], false);

        // A guessed id that was never issued is no session either.
        let forged = cookie_for(&SessionId::generate());
        let response = get(&app, "/customer", Some(&forged)).await;
        assert_eq!(location(&response), "/login");
        let response = get(&app, "/customer", Some("portal_session=not-an-id")).await;
        assert_eq!(location(&response), "/login");

        // Someone else's logout does not end this session.
        let response = post_json(&app, "/api/auth/logout", json!({}), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let response = post_json(&app, "/api/auth/logout", json!({}), Some(&forged)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = get(&app, "/customer", Some(&alice)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_clients_hold_independent_roles() {
        let registry = open_registry();
        let admin = logged_in(&registry, "tok-a", "ADMIN");
        let donor = logged_in(&registry, "tok-d", "DONOR");
        let app = portal(registry, ScriptedGateway::default());

        assert_eq!(get(&app, "/admin", Some(&admin)).await.status(), StatusCode::OK);
        assert_eq!(location(&get(&app, "/admin", Some(&donor)).await), "/donor");
        assert_eq!(location(&get(&app, "/dashboard", Some(&admin)).await), "/admin");
        assert_eq!(location(&get(&app, "/dashboard", Some(&donor)).await), "/donor");
    }

    #[tokio::test]
    async fn test_customer_renders_section_then_logout_locks_it() {
        let registry = open_registry();
        let cookie = logged_in(&registry, "tok", "CUSTOMER");
        let app = portal(registry, ScriptedGateway::default());

        let response = get(&app, "/customer/requests", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        assert_eq!(view["layout"], "dashboard");
        assert_eq!(view["role"], "CUSTOMER");
        assert_eq!(view["page"], "requests");
        assert_eq!(view["title"], "My Requests");
        assert_eq!(view["nav"][0]["path"], "/customer");

        let response = post_json(&app, "/api/auth/logout", json!({}), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cleared = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cleared.starts_with("portal_session=;"));
        assert!(cleared.contains("Max-Age=0"));
        assert_eq!(json_body(response).await, json!({ "redirectTo": "/login" }));

        // The browser may still replay the old cookie.
        let response = get(&app, "/customer/requests", Some(&cookie)).await;
        assert_eq!(location(&response), "/login");
    }

    #[tokio::test]
    async fn test_section_home_renders_dashboard_page() {
        let registry = open_registry();
        let cookie = logged_in(&registry, "tok", "BLOOD_BANK");
        let app = portal(registry, ScriptedGateway::default());

        let view = json_body(get(&app, "/blood-bank", Some(&cookie)).await).await;
        assert_eq!(view["page"], "");
        assert_eq!(view["title"], "Blood Bank Dashboard");
    }

    #[tokio::test]
    async fn test_section_home_with_trailing_slash_renders_dashboard_page() {
        let registry = open_registry();
        let customer = logged_in(&registry, "tok", "CUSTOMER");
        let admin = logged_in(&registry, "tok-a", "ADMIN");
        let app = portal(registry, ScriptedGateway::default());

        let response = get(&app, "/customer/", Some(&customer)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let view = json_body(response).await;
        assert_eq!(view["page"], "");
        assert_eq!(view["title"], "Customer Dashboard");

        // The trailing-slash form is gated like the rest of the section.
        assert_eq!(location(&get(&app, "/customer/", Some(&admin)).await), "/admin");
        assert_eq!(location(&get(&app, "/customer/", None).await), "/login");
    }

    #[tokio::test]
    async fn test_unknown_section_page_redirects_to_section_home() {
        let registry = open_registry();
        let cookie = logged_in(&registry, "tok", "CUSTOMER");
        let app = portal(registry, ScriptedGateway::default());

        let response = get(&app, "/customer/nowhere", Some(&cookie)).await;
        assert_eq!(location(&response), "/customer");
    }

    #[tokio::test]
    async fn test_legacy_dashboard_entry() {
        let registry = open_registry();
        let app = portal(registry.clone(), ScriptedGateway::default());

        let response = get(&app, "/dashboard", None).await;
        assert_eq!(location(&response), "/login");

        let cookie = logged_in(&registry, "tok", "DONOR");
        let response = get(&app, "/dashboard", Some(&cookie)).await;
        assert_eq!(location(&response), "/donor");
    }

    #[tokio::test]
    async fn test_unknown_path_redirects_to_public_home() {
        let app = portal(open_registry(), ScriptedGateway::default());

        let response = get(&app, "/no/such/place", None).await;
        assert_eq!(location(&response), "/");
    }

    #[tokio::test]
    async fn test_public_pages_render_without_session() {
        let app = portal(open_registry(), ScriptedGateway::default());

        for (uri, page) in [
            ("/", "home"),
            ("/about", "about"),
            ("/contact", "contact"),
            ("/login", "login"),
            ("/customers", "signup"),
        ] {
            let response = get(&app, uri, None).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let view = json_body(response).await;
            assert_eq!(view["layout"], "public");
            assert_eq!(view["page"], page);
            assert!(view.get("role").is_none());
        }
    }

    #[tokio::test]
    async fn test_login_api_then_status() {
        let gateway = ScriptedGateway::with_logins([LoginScript::grant("tok", "CONSUMERS")]);
        let app = portal(open_registry(), gateway);

        let status = json_body(get(&app, "/api/auth/status", None).await).await;
        assert_eq!(
            status,
            json!({ "authenticated": false, "role": null, "homePath": null })
        );

        let response = login_as(&app, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
        let cookie = issued_cookie(&response);
        assert_eq!(
            json_body(response).await,
            json!({ "role": "CONSUMERS", "redirectTo": "/consumers" })
        );

        let status = json_body(get(&app, "/api/auth/status", Some(&cookie)).await).await;
        assert_eq!(
            status,
            json!({ "authenticated": true, "role": "CONSUMERS", "homePath": "/consumers" })
        );

        let response = get(&app, "/consumers", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_relogin_keeps_the_session_id_and_switches_role() {
        let gateway = ScriptedGateway::with_logins([
            LoginScript::grant("tok-1", "DONOR"),
            LoginScript::grant("tok-2", "STAFF"),
        ]);
        let app = portal(open_registry(), gateway);

        let first = issued_cookie(&login_as(&app, None).await);
        let second = issued_cookie(&login_as(&app, Some(&first)).await);
        assert_eq!(first, second);

        assert_eq!(location(&get(&app, "/dashboard", Some(&first)).await), "/staff");
    }

    #[tokio::test]
    async fn test_failed_login_issues_no_session() {
        let registry = open_registry();
        let gateway = ScriptedGateway::with_logins([LoginScript::grant("tok", "JANITOR")]);
        let app = portal(registry, gateway);

        let response = login_as(&app, None).await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let problem = json_body(response).await;
        assert_eq!(problem["detail"], "Invalid user type: JANITOR");
    }

    #[tokio::test]
    async fn test_failed_login_keeps_existing_session() {
        let registry = open_registry();
        let cookie = logged_in(&registry, "tok", "HOSPITAL");
        let gateway = ScriptedGateway::with_logins([LoginScript::Reject {
            status: 401,
            message: "Invalid credentials",
        }]);
        let app = portal(registry, gateway);

        let response = login_as(&app, Some(&cookie)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["detail"], "Invalid credentials");
        assert_eq!(location(&get(&app, "/dashboard", Some(&cookie)).await), "/hospital");
    }

    #[tokio::test]
    async fn test_session_survives_restart_with_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sessions.json");

        let storage = Arc::new(FileStorage::open(&path).unwrap());
        let registry = Arc::new(SessionRegistry::new(storage, &AuthConfig::default()));
        let gateway = ScriptedGateway::with_logins([LoginScript::grant("tok-h", "HOSPITAL")]);
        let response = login_as(&portal(registry, gateway), None).await;
        let cookie = issued_cookie(&response);

        let reopened = Arc::new(FileStorage::open(&path).unwrap());
        let registry = Arc::new(SessionRegistry::new(reopened, &AuthConfig::default()));
        let app = portal(registry, ScriptedGateway::default());

        let response = get(&app, "/hospital", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["role"], "HOSPITAL");
        assert_eq!(location(&get(&app, "/hospital", None).await), "/login");

        post_json(&app, "/api/auth/logout", json!({}), Some(&cookie)).await;

        let reopened = Arc::new(FileStorage::open(&path).unwrap());
        let registry = Arc::new(SessionRegistry::new(reopened, &AuthConfig::default()));
        let app = portal(registry, ScriptedGateway::default());
        assert_eq!(location(&get(&app, "/hospital", Some(&cookie)).await), "/login");
    }

    #[tokio::test]
    async fn test_signup_api() {
        let app = portal(open_registry(), ScriptedGateway::default());

        let response = post_json(
            &app,
            "/api/auth/signup",
            json!({ "name": "Asha", "email": "asha@example.org", "password": "pw" }),
            None,
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        assert_eq!(
            json_body(response).await,
            json!({ "message": "Registration successful" })
        );
    }

    #[tokio::test]
    async fn test_unknown_api_endpoint_is_not_found() {
        let app = portal(open_registry(), ScriptedGateway::default());

        let response = get(&app, "/api/auth/whoami", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
