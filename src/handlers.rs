use crate::api::NewsApi;
use crate::errors::AppError;
use crate::forms::{AskForm, FetchNewsForm, SearchForm};
use crate::state::{PageState, PanelId, StatsView};
use crate::ui::render_index;
use crate::AppState;
use axum::{
    extract::{rejection::FormRejection, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct TabQuery {
    pub tab: Option<String>,
    pub trigger: Option<String>,
}

pub async fn index<A: NewsApi>(
    State(state): State<AppState<A>>,
    Query(query): Query<TabQuery>,
) -> Html<String> {
    if let Some(tab) = query.tab.as_deref() {
        state
            .controller
            .show_tab(tab, query.trigger.as_deref().unwrap_or_default());
    }
    Html(render_index(&state.controller.snapshot()))
}

// Form posts run the cycle on its own task and redirect straight away.
pub async fn fetch_news<A: NewsApi>(
    State(state): State<AppState<A>>,
    form: Result<Form<FetchNewsForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    state.controller.spawn_fetch_news(&form);
    Ok(back_to(PanelId::Fetch))
}

pub async fn search<A: NewsApi>(
    State(state): State<AppState<A>>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    state.controller.spawn_search(&form);
    Ok(back_to(PanelId::Search))
}

pub async fn ask<A: NewsApi>(
    State(state): State<AppState<A>>,
    form: Result<Form<AskForm>, FormRejection>,
) -> Result<Redirect, AppError> {
    let Form(form) = form.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    state.controller.spawn_ask(&form);
    Ok(back_to(PanelId::Ask))
}

pub async fn get_stats<A: NewsApi>(State(state): State<AppState<A>>) -> Json<StatsView> {
    Json(state.controller.snapshot().stats)
}

pub async fn get_state<A: NewsApi>(State(state): State<AppState<A>>) -> Json<PageState> {
    Json(state.controller.snapshot())
}

fn back_to(panel: PanelId) -> Redirect {
    Redirect::to(&format!(
        "/?tab={}&trigger={}",
        panel.name(),
        panel.button_id()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{search_form, FakeApi};
    use crate::controller::ViewEvent;
    use crate::errors::ClientError;
    use crate::models::SearchResponse;
    use axum::response::IntoResponse;
    use std::time::Duration;
    use tokio::sync::{broadcast, oneshot};

    async fn wait_for_hidden(events: &mut broadcast::Receiver<ViewEvent>, panel: PanelId) {
        tokio::time::timeout(Duration::from_secs(2), async {
            while events.recv().await.unwrap() != (ViewEvent::LoadingHidden { panel }) {}
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn search_post_redirects_back_to_search_tab() {
        let api = FakeApi::default();
        api.search
            .lock()
            .unwrap()
            .push_back((None, Err(ClientError::Http { status: 500 })));
        let state = AppState::new(api);
        let mut events = state.controller.subscribe();

        let response = search(State(state.clone()), Ok(Form(search_form("boom"))))
            .await
            .unwrap()
            .into_response();

        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers()["location"],
            "/?tab=search&trigger=searchTabButton"
        );

        wait_for_hidden(&mut events, PanelId::Search).await;
        let Html(page) = index(State(state), Query(TabQuery::default())).await;
        assert!(page.contains("Error: HTTP error! status: 500"));
    }

    #[tokio::test]
    async fn post_redirects_while_the_backend_is_still_working() {
        let api = FakeApi::default();
        let (release, gate) = oneshot::channel();
        api.search.lock().unwrap().push_back((
            Some(gate),
            Ok(SearchResponse {
                total_results: 0,
                results: Vec::new(),
            }),
        ));
        let state = AppState::new(api);
        let mut events = state.controller.subscribe();

        let response = search(State(state.clone()), Ok(Form(search_form("slow"))))
            .await
            .unwrap()
            .into_response();
        assert!(response.status().is_redirection());
        assert!(state.controller.snapshot().panel(PanelId::Search).loading);

        let Html(page) = index(State(state.clone()), Query(TabQuery::default())).await;
        assert!(page.contains("class=\"loading active\" id=\"searchLoading\""));

        release.send(()).unwrap();
        wait_for_hidden(&mut events, PanelId::Search).await;
        let page = state.controller.snapshot();
        assert!(!page.panel(PanelId::Search).loading);
        assert_eq!(page.panel(PanelId::Search).content[0].text_content(), "Found 0 relevant articles");
    }

    #[tokio::test]
    async fn index_query_switches_tab() {
        let state = AppState::new(FakeApi::default());
        let Html(page) = index(
            State(state.clone()),
            Query(TabQuery {
                tab: Some("ask".into()),
                trigger: Some("askTabButton".into()),
            }),
        )
        .await;

        assert!(page.contains("class=\"tab-content active\" id=\"askTab\""));
        assert_eq!(state.controller.snapshot().active_tab(), Some(PanelId::Ask));
    }
}
