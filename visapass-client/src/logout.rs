/// Logout flow
///
/// Forgets the session token and sends the user to the sign-in page. Safe to
/// call when already signed out.

use crate::client::ApiClient;
use crate::route_gate::{Navigator, Route};

pub async fn logout<N: Navigator + ?Sized>(client: &ApiClient, navigator: &N) {
    if client.has_token().await {
        client.clear_token().await;
        tracing::info!("Signed out");
    }

    navigator.replace(Route::SignIn);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingNavigator(Mutex<Vec<Route>>);

    impl Navigator for RecordingNavigator {
        fn replace(&self, route: Route) {
            self.0.lock().unwrap().push(route);
        }
    }

    #[tokio::test]
    async fn test_logout_clears_token_and_navigates() {
        let client = ApiClient::new(ClientConfig::default()).unwrap();
        let navigator = RecordingNavigator::default();
        client.set_token("token").await;

        logout(&client, &navigator).await;

        assert!(!client.has_token().await);
        assert_eq!(*navigator.0.lock().unwrap(), vec![Route::SignIn]);
    }

    #[tokio::test]
    async fn test_logout_when_signed_out_still_navigates() {
        let client = ApiClient::new(ClientConfig::default()).unwrap();
        let navigator = RecordingNavigator::default();

        logout(&client, &navigator).await;
        logout(&client, &navigator).await;

        assert_eq!(*navigator.0.lock().unwrap(), vec![Route::SignIn, Route::SignIn]);
    }
}
