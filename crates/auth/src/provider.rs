//! Global authentication context and provider

use crate::config::AuthConfig;
use crate::session::{AuthSession, LoginOutcome};
use crate::storage::BrowserStore;
use std::rc::Rc;
use std::sync::Arc;
use sysmon_http::ApiClient;
use yew::prelude::*;

/// Authentication context data
#[derive(Clone, Debug, PartialEq)]
pub struct AuthContextData {
    pub token: Option<String>,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// Authentication context actions
pub enum AuthAction {
    /// Session restored from localStorage on mount
    Restored(Option<String>),
    LoginStarted,
    LoggedIn(String),
    LoginFailed(String),
    LoggedOut,
}

impl Default for AuthContextData {
    fn default() -> Self {
        Self {
            token: None,
            is_loading: true, // Start with loading until the stored token is checked
            error: None,
        }
    }
}

impl AuthContextData {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty())
    }
}

impl Reducible for AuthContextData {
    type Action = AuthAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        match action {
            AuthAction::Restored(token) => Rc::new(Self {
                token,
                is_loading: false,
                error: None,
            }),
            AuthAction::LoginStarted => Rc::new(Self {
                is_loading: true,
                error: None,
                ..(*self).clone()
            }),
            AuthAction::LoggedIn(token) => Rc::new(Self {
                token: Some(token),
                is_loading: false,
                error: None,
            }),
            AuthAction::LoginFailed(message) => Rc::new(Self {
                is_loading: false,
                error: Some(message),
                ..(*self).clone()
            }),
            AuthAction::LoggedOut => Rc::new(Self {
                token: None,
                is_loading: false,
                error: None,
            }),
        }
    }
}

/// Authentication context: reducer state plus the session behind it
#[derive(Clone)]
pub struct AuthContext {
    session: Rc<AuthSession>,
    state: UseReducerHandle<AuthContextData>,
}

impl PartialEq for AuthContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.session, &other.session) && self.state == other.state
    }
}

impl AuthContext {
    pub fn state(&self) -> &AuthContextData {
        &self.state
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// Start a login; `on_done` receives the outcome once the server answers
    pub fn login(&self, username: String, password: String, on_done: Option<Callback<LoginOutcome>>) {
        let session = self.session.clone();
        let state = self.state.clone();
        state.dispatch(AuthAction::LoginStarted);

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = session.login(&username, &password).await;
            match (outcome.success, session.token()) {
                (true, Some(token)) => state.dispatch(AuthAction::LoggedIn(token)),
                _ => state.dispatch(AuthAction::LoginFailed(
                    outcome.message.clone().unwrap_or_default(),
                )),
            }
            if let Some(callback) = on_done {
                callback.emit(outcome);
            }
        });
    }

    pub fn logout(&self) {
        self.session.logout();
        self.state.dispatch(AuthAction::LoggedOut);
    }
}

/// Origin of the current page; the API is served from the same origin
fn get_base_url(config: &AuthConfig) -> String {
    web_sys::window()
        .and_then(|window| window.location().origin().ok())
        .unwrap_or_else(|| config.base_url.clone())
}

fn build_session(config: &AuthConfig) -> Result<Rc<AuthSession>, String> {
    let client = ApiClient::new(get_base_url(config))
        .map_err(|e| format!("Failed to create API client: {e}"))?;
    Ok(Rc::new(AuthSession::new(
        client,
        Arc::new(BrowserStore::new()),
        config,
    )))
}

/// Auth provider props
#[derive(Properties, PartialEq)]
pub struct AuthProviderProps {
    #[prop_or_default]
    pub config: AuthConfig,
    pub children: Children,
}

/// Auth provider component
#[function_component(AuthProvider)]
pub fn auth_provider(props: &AuthProviderProps) -> Html {
    let session = use_memo(props.config.clone(), build_session);
    let state = use_reducer(AuthContextData::default);

    // Push the stored token back into the client on mount
    {
        let session = session.clone();
        let state = state.clone();
        use_effect_with((), move |_| {
            match session.as_ref() {
                Ok(session) => {
                    session.initialize_auth();
                    state.dispatch(AuthAction::Restored(session.token()));
                }
                Err(_) => state.dispatch(AuthAction::Restored(None)),
            }
            || ()
        });
    }

    match session.as_ref() {
        Ok(session) => {
            let context = AuthContext {
                session: session.clone(),
                state,
            };
            html! {
                <ContextProvider<AuthContext> context={context}>
                    {props.children.clone()}
                </ContextProvider<AuthContext>>
            }
        }
        Err(message) => html! {
            <div class="auth-error">{ message.clone() }</div>
        },
    }
}

/// Hook to use auth context
#[hook]
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .expect("AuthContext not found. Make sure to wrap your component with AuthProvider")
}

/// Hook to check if authenticated
#[hook]
pub fn use_is_authenticated() -> bool {
    let auth = use_auth();
    auth.state().is_authenticated()
}
