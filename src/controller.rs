//! The page controller: tab switching, stats loading and the request/render
//! cycle shared by the three forms.

use crate::api::NewsApi;
use crate::dom::Node;
use crate::errors::ClientError;
use crate::forms::{AskForm, FetchNewsForm, SearchForm};
use crate::models::{
    AnswerResponse, Article, AskRequest, FetchNewsRequest, SearchRequest, SearchResponse,
};
use crate::render::{
    answer_element, article_element, error_banner, search_result_element, success_banner,
};
use crate::state::{PageState, PanelId, RequestToken};
use chrono::Utc;
use serde::Serialize;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// What happened to the view model, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewEvent {
    LoadingShown { panel: PanelId },
    Rendered { panel: PanelId, success: bool },
    LoadingHidden { panel: PanelId },
    /// A response arrived for a submission that was superseded.
    Discarded { panel: PanelId },
    StatsUpdated { stored: u64, in_vectordb: u64 },
    TabShown { panel: PanelId },
}

pub struct PageController<A> {
    api: A,
    page: Mutex<PageState>,
    events: broadcast::Sender<ViewEvent>,
}

/// Hides the loading indicator when dropped, whichever way the cycle ends.
struct LoadingGuard<'a, A> {
    controller: &'a PageController<A>,
    token: RequestToken,
}

impl<A> Drop for LoadingGuard<'_, A> {
    fn drop(&mut self) {
        let hidden = self.controller.page().end_request(self.token);
        if hidden {
            self.controller.emit(ViewEvent::LoadingHidden {
                panel: self.token.panel,
            });
        }
    }
}

impl<A> PageController<A> {
    pub fn new(api: A) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            api,
            page: Mutex::new(PageState::default()),
            events,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    /// A copy of the current view model.
    pub fn snapshot(&self) -> PageState {
        self.page().clone()
    }

    fn page(&self) -> MutexGuard<'_, PageState> {
        self.page.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ViewEvent) {
        // No subscribers is the normal case outside of tests.
        let _ = self.events.send(event);
    }

    /// Shows the panel called `name`, marking `trigger` (a tab button id) active.
    pub fn show_tab(&self, name: &str, trigger: &str) {
        if self.page().show_tab(name, trigger) {
            if let Some(panel) = PanelId::from_name(name) {
                self.emit(ViewEvent::TabShown { panel });
            }
        } else {
            debug!(tab = name, "ignoring unknown tab");
        }
    }
}

impl<A: NewsApi> PageController<A> {
    /// Refreshes the counters; failures are logged and the previous values kept.
    pub async fn load_stats(&self) {
        match self.api.stats().await {
            Ok(stats) => {
                self.page().set_stats(stats, Utc::now());
                debug!(
                    stored = stats.total_articles_stored,
                    in_vectordb = stats.total_articles_in_vectordb,
                    "stats refreshed"
                );
                self.emit(ViewEvent::StatsUpdated {
                    stored: stats.total_articles_stored,
                    in_vectordb: stats.total_articles_in_vectordb,
                });
            }
            Err(err) => warn!(error = %err, "failed to load stats"),
        }
    }

    pub async fn fetch_news(&self, form: &FetchNewsForm) {
        let token = self.begin(PanelId::Fetch);
        self.complete_fetch_news(token, form.to_request()).await;
    }

    pub async fn search(&self, form: &SearchForm) {
        let token = self.begin(PanelId::Search);
        self.complete_search(token, form.to_request()).await;
    }

    pub async fn ask(&self, form: &AskForm) {
        let token = self.begin(PanelId::Ask);
        self.complete_ask(token, form.to_request()).await;
    }

    /// Like [`fetch_news`](Self::fetch_news), but the backend call runs on its
    /// own task. Loading is already shown when this returns.
    pub fn spawn_fetch_news(self: &Arc<Self>, form: &FetchNewsForm) -> JoinHandle<()> {
        let token = self.begin(PanelId::Fetch);
        let request = form.to_request();
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.complete_fetch_news(token, request).await })
    }

    pub fn spawn_search(self: &Arc<Self>, form: &SearchForm) -> JoinHandle<()> {
        let token = self.begin(PanelId::Search);
        let request = form.to_request();
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.complete_search(token, request).await })
    }

    pub fn spawn_ask(self: &Arc<Self>, form: &AskForm) -> JoinHandle<()> {
        let token = self.begin(PanelId::Ask);
        let request = form.to_request();
        let controller = Arc::clone(self);
        tokio::spawn(async move { controller.complete_ask(token, request).await })
    }

    async fn complete_fetch_news(&self, token: RequestToken, request: FetchNewsRequest) {
        let fetched = self
            .complete(token, self.api.fetch_news(&request), |articles: &Vec<Article>| {
                let mut nodes = Vec::with_capacity(articles.len() + 1);
                nodes.push(success_banner(format!(
                    "Successfully fetched {} articles!",
                    articles.len()
                )));
                nodes.extend(articles.iter().map(article_element));
                nodes
            })
            .await;

        // Superseded or failed fetches leave the counters alone.
        if fetched.is_some() {
            self.load_stats().await;
        }
    }

    async fn complete_search(&self, token: RequestToken, request: SearchRequest) {
        self.complete(token, self.api.search(&request), |response: &SearchResponse| {
            let mut nodes = Vec::with_capacity(response.results.len() + 1);
            nodes.push(success_banner(format!(
                "Found {} relevant articles",
                response.total_results
            )));
            nodes.extend(response.results.iter().map(search_result_element));
            nodes
        })
        .await;
    }

    async fn complete_ask(&self, token: RequestToken, request: AskRequest) {
        self.complete(token, self.api.ask(&request), |answer: &AnswerResponse| {
            vec![answer_element(answer)]
        })
        .await;
    }

    /// Loading on, container cleared.
    fn begin(&self, panel: PanelId) -> RequestToken {
        let token = self.page().begin_request(panel);
        self.emit(ViewEvent::LoadingShown { panel });
        token
    }

    /// Awaits the call, renders the result or an error banner, loading off.
    /// Returns the response only if it succeeded and was rendered.
    async fn complete<T, F, R>(&self, token: RequestToken, call: F, render: R) -> Option<T>
    where
        F: Future<Output = Result<T, ClientError>>,
        R: FnOnce(&T) -> Vec<Node>,
    {
        let panel = token.panel;
        let guard = LoadingGuard {
            controller: self,
            token,
        };

        let outcome = call.await;
        let content = match &outcome {
            Ok(value) => render(value),
            Err(err) => {
                warn!(panel = panel.name(), error = %err, "request failed");
                vec![error_banner(&err.to_string())]
            }
        };

        let rendered = self.page().render(token, content);
        if rendered {
            info!(panel = panel.name(), success = outcome.is_ok(), "panel rendered");
            self.emit(ViewEvent::Rendered {
                panel,
                success: outcome.is_ok(),
            });
        } else {
            debug!(panel = panel.name(), "discarding superseded response");
            self.emit(ViewEvent::Discarded { panel });
        }
        drop(guard);

        if rendered { outcome.ok() } else { None }
    }
}
