//! Form-and-results view state.
//!
//! The view moves idle -> submitting -> (success | error) -> idle on every
//! submission. While `loading` is set the submit control is disabled, which is
//! the only thing keeping a second request from starting.

use chrono::NaiveDate;

use crate::{
    client::{FetchError, RecommendationBackend},
    model::{Recommendation, RecommendationRequest},
};

pub const MISSING_CITY_MESSAGE: &str = "Please enter a city name.";
pub const SERVER_ERROR_MESSAGE: &str = "An error occurred on the server.";
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to connect to the server. Check that the backend is running.";

#[derive(Debug, Clone, Default)]
pub struct FormView {
    city: String,
    date: Option<NaiveDate>,
    data: Option<Recommendation>,
    loading: bool,
    error: Option<String>,
}

impl FormView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_city(&mut self, city: impl Into<String>) {
        self.city = city.into();
    }

    pub fn set_date(&mut self, date: Option<NaiveDate>) {
        self.date = date;
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn data(&self) -> Option<&Recommendation> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// The submit control is disabled while a request is in flight.
    pub fn submit_enabled(&self) -> bool {
        !self.loading
    }

    /// First half of a submission.
    ///
    /// Returns the request to send, or `None` if nothing should be sent: either
    /// a request is already in flight, or the city is empty (in which case the
    /// validation message is set).
    pub fn begin_submit(&mut self) -> Option<RecommendationRequest> {
        if self.loading {
            tracing::debug!("submit ignored, request already in flight");
            return None;
        }

        let city = self.city.trim();
        if city.is_empty() {
            self.error = Some(MISSING_CITY_MESSAGE.to_string());
            return None;
        }

        let request = RecommendationRequest { city: city.to_string(), date: self.date };

        self.loading = true;
        self.error = None;
        self.data = None;

        Some(request)
    }

    /// Second half of a submission: store the outcome and leave the loading state.
    pub fn finish(&mut self, outcome: Result<Recommendation, FetchError>) {
        self.loading = false;

        match outcome {
            Ok(data) => {
                tracing::info!(city = %data.weather.city, "recommendations received");
                self.data = Some(data);
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed");
                self.error = Some(user_message(&err));
            }
        }
    }

    /// Validate, send one request through `backend` and record the result.
    pub async fn submit(&mut self, backend: &dyn RecommendationBackend) {
        let Some(request) = self.begin_submit() else {
            return;
        };

        let outcome = backend.fetch(&request).await;
        self.finish(outcome);
    }
}

fn user_message(err: &FetchError) -> String {
    if err.is_connectivity() {
        return CONNECTIVITY_MESSAGE.to_string();
    }

    err.server_message()
        .filter(|m| !m.is_empty())
        .unwrap_or(SERVER_ERROR_MESSAGE)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeatherSummary;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    };

    #[derive(Debug)]
    enum Reply {
        Ok(Recommendation),
        ServerError(Option<&'static str>),
        Unreachable,
    }

    #[derive(Debug)]
    struct FakeBackend {
        reply: Reply,
        calls: AtomicUsize,
        last: Mutex<Option<RecommendationRequest>>,
    }

    impl FakeBackend {
        fn new(reply: Reply) -> Self {
            Self { reply, calls: AtomicUsize::new(0), last: Mutex::new(None) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RecommendationBackend for FakeBackend {
        async fn fetch(
            &self,
            request: &RecommendationRequest,
        ) -> Result<Recommendation, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(request.clone());

            match &self.reply {
                Reply::Ok(rec) => Ok(rec.clone()),
                Reply::ServerError(message) => Err(FetchError::Server {
                    status: StatusCode::NOT_FOUND,
                    message: message.map(str::to_string),
                }),
                Reply::Unreachable => Err(connectivity_error().await),
            }
        }
    }

    async fn connectivity_error() -> FetchError {
        let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let err = reqwest::Client::new()
            .post(format!("http://{addr}/"))
            .send()
            .await
            .unwrap_err();
        FetchError::Connectivity(err)
    }

    fn sample() -> Recommendation {
        Recommendation {
            weather: WeatherSummary {
                city: "Zagreb".into(),
                icon: "01d".into(),
                description: "clear sky".into(),
                temperature: 21.26,
                feels_like: None,
                humidity: None,
                wind_speed: None,
            },
            recommendations: "A\nB\nC".into(),
        }
    }

    #[tokio::test]
    async fn empty_city_never_calls_backend() {
        let backend = FakeBackend::new(Reply::Ok(sample()));
        let mut view = FormView::new();

        view.submit(&backend).await;
        assert_eq!(view.error(), Some(MISSING_CITY_MESSAGE));

        view.set_city("   ");
        view.submit(&backend).await;
        assert_eq!(view.error(), Some(MISSING_CITY_MESSAGE));

        assert_eq!(backend.calls(), 0);
        assert!(!view.is_loading());
    }

    #[test]
    fn begin_submit_clears_previous_state_and_sets_loading() {
        let mut view = FormView::new();
        view.set_city("Zagreb");
        view.finish(Ok(sample()));
        view.error = Some("old".into());

        let request = view.begin_submit().expect("request should be issued");

        assert_eq!(request.city, "Zagreb");
        assert!(view.is_loading());
        assert!(!view.submit_enabled());
        assert!(view.error().is_none());
        assert!(view.data().is_none());
    }

    #[test]
    fn second_submit_while_pending_is_refused() {
        let mut view = FormView::new();
        view.set_city("Zagreb");

        assert!(view.begin_submit().is_some());
        assert!(view.begin_submit().is_none());
        assert!(view.is_loading());
    }

    #[tokio::test]
    async fn success_stores_data_and_clears_loading() {
        let backend = FakeBackend::new(Reply::Ok(sample()));
        let mut view = FormView::new();
        view.set_city("  Zagreb ");
        view.set_date(NaiveDate::from_ymd_opt(2025, 9, 28));

        view.submit(&backend).await;

        assert_eq!(backend.calls(), 1);
        let sent = backend.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.city, "Zagreb");
        assert_eq!(sent.date, NaiveDate::from_ymd_opt(2025, 9, 28));

        assert!(!view.is_loading());
        assert!(view.error().is_none());
        assert_eq!(view.data(), Some(&sample()));
    }

    #[tokio::test]
    async fn server_error_message_is_shown() {
        let backend = FakeBackend::new(Reply::ServerError(Some("X")));
        let mut view = FormView::new();
        view.set_city("Atlantis");

        view.submit(&backend).await;

        assert_eq!(view.error(), Some("X"));
        assert!(view.data().is_none());
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn server_error_without_message_uses_fallback() {
        let backend = FakeBackend::new(Reply::ServerError(None));
        let mut view = FormView::new();
        view.set_city("Atlantis");

        view.submit(&backend).await;

        assert_eq!(view.error(), Some(SERVER_ERROR_MESSAGE));
        assert!(!view.is_loading());
    }

    #[test]
    fn empty_server_message_uses_fallback() {
        let mut view = FormView::new();
        view.set_city("Atlantis");
        view.begin_submit();

        view.finish(Err(FetchError::Server {
            status: StatusCode::BAD_REQUEST,
            message: Some(String::new()),
        }));

        assert_eq!(view.error(), Some(SERVER_ERROR_MESSAGE));
        assert!(!view.is_loading());
    }

    #[tokio::test]
    async fn unreachable_backend_shows_connectivity_message() {
        let backend = FakeBackend::new(Reply::Unreachable);
        let mut view = FormView::new();
        view.set_city("Zagreb");

        view.submit(&backend).await;

        assert_eq!(view.error(), Some(CONNECTIVITY_MESSAGE));
        assert!(!view.is_loading());
        assert!(view.submit_enabled());
    }

    #[tokio::test]
    async fn error_after_success_clears_old_result() {
        let mut view = FormView::new();
        view.set_city("Zagreb");
        view.submit(&FakeBackend::new(Reply::Ok(sample()))).await;
        assert!(view.data().is_some());

        view.submit(&FakeBackend::new(Reply::ServerError(Some("X")))).await;

        assert!(view.data().is_none());
        assert_eq!(view.error(), Some("X"));
    }
}
