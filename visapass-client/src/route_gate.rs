/// Client-side route protection
///
/// A protected view mounts a [`RouteGate`]. Mounting spawns one fetch of the
/// current user and returns immediately, so the view renders while the check
/// runs. When the fetch settles the gate may replace navigation:
///
/// | Fetch result                   | Navigation            |
/// |--------------------------------|-----------------------|
/// | user with `PROFILE_COMPLETE`   | none                  |
/// | user with any other status     | `"../onboarding-1"`   |
/// | any error                      | `"/signUpScreen"`     |
///
/// The check is tied to the returned [`GateHandle`]. Unmounting, explicitly or
/// by dropping the handle, cancels it and a cancelled check never navigates.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use visapass_client::client::ApiClient;
/// use visapass_client::config::ClientConfig;
/// use visapass_client::route_gate::{Navigator, Route, RouteGate};
///
/// struct PrintNavigator;
///
/// impl Navigator for PrintNavigator {
///     fn replace(&self, route: Route) {
///         println!("navigate to {}", route);
///     }
/// }
///
/// # async fn example() -> Result<(), visapass_client::error::ClientError> {
/// let client = Arc::new(ApiClient::new(ClientConfig::from_env()?)?);
/// let gate = RouteGate::new(client, Arc::new(PrintNavigator));
///
/// let handle = gate.mount();
/// // ... render the protected view ...
/// let outcome = handle.outcome().await;
/// println!("{:?}", outcome);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::client::{ApiClient, UserProfile};
use crate::error::ClientError;

/// Navigation targets used by the gate and the logout flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Profile completion flow
    Onboarding,

    /// Sign-up screen
    SignUp,

    /// Sign-in page
    SignIn,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Onboarding => "../onboarding-1",
            Route::SignUp => "/signUpScreen",
            Route::SignIn => "signin.htm",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of the current user's profile
#[async_trait]
pub trait ProfileSource: Send + Sync + 'static {
    async fn current_profile(&self) -> Result<UserProfile, ClientError>;
}

#[async_trait]
impl ProfileSource for ApiClient {
    async fn current_profile(&self) -> Result<UserProfile, ClientError> {
        self.fetch_current_user().await
    }
}

/// Navigation seam bound by the UI
///
/// `replace` swaps the current location without adding a history entry.
pub trait Navigator: Send + Sync + 'static {
    fn replace(&self, route: Route);
}

/// Redirect required for a fetch result, if any
pub fn redirect_for(result: &Result<UserProfile, ClientError>) -> Option<Route> {
    match result {
        Ok(profile) if profile.status.is_profile_complete() => None,
        Ok(_) => Some(Route::Onboarding),
        Err(_) => Some(Route::SignUp),
    }
}

/// How a mounted check ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// Profile complete, view stays
    Allowed,

    /// Navigation was replaced
    Redirected(Route),

    /// Unmounted before the check finished; nothing happened
    Cancelled,
}

/// Route gate for protected views
pub struct RouteGate<S, N> {
    source: Arc<S>,
    navigator: Arc<N>,
}

impl<S, N> Clone for RouteGate<S, N> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            navigator: Arc::clone(&self.navigator),
        }
    }
}

impl<S: ProfileSource, N: Navigator> RouteGate<S, N> {
    pub fn new(source: Arc<S>, navigator: Arc<N>) -> Self {
        Self { source, navigator }
    }

    /// Starts the check for a newly mounted view
    ///
    /// Must be called from within a tokio runtime. Never blocks.
    pub fn mount(&self) -> GateHandle {
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let source = Arc::clone(&self.source);
        let navigator = Arc::clone(&self.navigator);

        let task = tokio::spawn(async move {
            let result = tokio::select! {
                biased;
                _ = cancelled.cancelled() => return GateOutcome::Cancelled,
                result = source.current_profile() => result,
            };

            if let Err(e) = &result {
                tracing::warn!(error = %e, "Current user fetch failed");
            }

            let route = redirect_for(&result);

            // Unmounted while the response was being handled
            if cancelled.is_cancelled() {
                return GateOutcome::Cancelled;
            }

            match route {
                Some(route) => {
                    tracing::debug!(%route, "Route gate redirecting");
                    navigator.replace(route);
                    GateOutcome::Redirected(route)
                }
                None => GateOutcome::Allowed,
            }
        });

        GateHandle {
            token,
            task: Some(task),
        }
    }
}

/// Handle to a mounted check
///
/// Dropping the handle unmounts.
#[derive(Debug)]
pub struct GateHandle {
    token: CancellationToken,
    task: Option<JoinHandle<GateOutcome>>,
}

impl GateHandle {
    /// Cancels the check; a pending redirect will not fire
    pub fn unmount(&self) {
        self.token.cancel();
    }

    pub fn is_mounted(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Waits for the check to finish
    pub async fn outcome(mut self) -> GateOutcome {
        let Some(task) = self.task.take() else {
            return GateOutcome::Cancelled;
        };

        match task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(error = %e, "Route gate task failed");
                GateOutcome::Cancelled
            }
        }
    }
}

impl Drop for GateHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
