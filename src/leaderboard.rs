//! Top-10 ranking list for the scores page (feature = "leaderboard").
//!
//! Polls a Supabase-style REST table (`scores`: `player_name`, `score`) every
//! few seconds and renders the rows into `#rankingList`. Parsing and HTML
//! rendering are plain functions so they can be tested natively.

use std::cell::Cell;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{XmlHttpRequest, window};

use crate::error::ArenaError;

pub const RANKING_LIMIT: usize = 10;
pub const POLL_INTERVAL_MS: i32 = 5000;
const LIST_ELEMENT_ID: &str = "rankingList";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub player_name: String,
    pub score: i64,
}

#[derive(Debug, Error)]
pub enum LeaderboardError {
    #[error("malformed ranking payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("ranking request failed with HTTP status {0}")]
    Status(u16),

    #[error("ranking request could not be sent: {0}")]
    Request(String),
}

/// What the ranking list currently shows.
#[derive(Clone, Debug, PartialEq)]
pub enum RankingView {
    Loading,
    Failed,
    Rows(Vec<ScoreEntry>),
}

/// REST query for the best scores, highest first.
pub fn ranking_url(base: &str) -> String {
    format!(
        "{}/rest/v1/scores?select=player_name,score&order=score.desc&limit={RANKING_LIMIT}",
        base.trim_end_matches('/')
    )
}

/// Decodes the table rows, re-sorting and capping them so a misbehaving
/// backend cannot break the list.
pub fn parse_ranking(body: &str) -> Result<Vec<ScoreEntry>, LeaderboardError> {
    let mut rows: Vec<ScoreEntry> = serde_json::from_str(body)?;
    rows.sort_by(|a, b| b.score.cmp(&a.score));
    rows.truncate(RANKING_LIMIT);
    Ok(rows)
}

pub fn render_ranking(view: &RankingView) -> String {
    match view {
        RankingView::Loading => r#"<li class="empty">Loading...</li>"#.to_string(),
        RankingView::Failed => r#"<li class="empty">Could not load ranking</li>"#.to_string(),
        RankingView::Rows(rows) if rows.is_empty() => {
            r#"<li class="empty">No scores yet</li>"#.to_string()
        }
        RankingView::Rows(rows) => rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                format!(
                    r#"<li class="ranking-item"><span class="pos">#{}</span><span class="name">{}</span><span class="score">{}</span></li>"#,
                    i + 1,
                    escape_html(&row.player_name),
                    row.score
                )
            })
            .collect(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// --- Browser polling ---------------------------------------------------------

thread_local! {
    static LOADING: Cell<bool> = const { Cell::new(false) };
}

/// Loads the ranking now and then every [`POLL_INTERVAL_MS`].
#[wasm_bindgen]
pub fn start_leaderboard(base_url: &str, api_key: &str) -> Result<(), JsValue> {
    let win = window().ok_or(ArenaError::NoWindow)?;
    let url = ranking_url(base_url);
    let key = api_key.to_string();

    load_ranking(&url, &key);
    let tick = Closure::wrap(Box::new(move || load_ranking(&url, &key)) as Box<dyn FnMut()>);
    win.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        POLL_INTERVAL_MS,
    )?;
    tick.forget();
    Ok(())
}

fn load_ranking(url: &str, key: &str) {
    if LOADING.with(|l| l.replace(true)) {
        return;
    }
    show(&RankingView::Loading);
    if let Err(err) = send_request(url, key) {
        log::error!("{err}");
        LOADING.with(|l| l.set(false));
        show(&RankingView::Failed);
    }
}

fn send_request(url: &str, key: &str) -> Result<(), LeaderboardError> {
    let js_err = |e: JsValue| LeaderboardError::Request(format!("{e:?}"));
    let xhr = XmlHttpRequest::new().map_err(js_err)?;
    xhr.open_with_async("GET", url, true).map_err(js_err)?;
    xhr.set_request_header("apikey", key).map_err(js_err)?;
    xhr.set_request_header("Authorization", &format!("Bearer {key}"))
        .map_err(js_err)?;

    let done = xhr.clone();
    // loadend fires exactly once, after success, error or abort
    let on_end = Closure::once_into_js(move || {
        LOADING.with(|l| l.set(false));
        let view = match finish_request(&done) {
            Ok(rows) => RankingView::Rows(rows),
            Err(err) => {
                log::error!("{err}");
                RankingView::Failed
            }
        };
        show(&view);
    });
    xhr.add_event_listener_with_callback("loadend", on_end.unchecked_ref())
        .map_err(js_err)?;
    xhr.send().map_err(js_err)
}

fn finish_request(xhr: &XmlHttpRequest) -> Result<Vec<ScoreEntry>, LeaderboardError> {
    let status = xhr.status().unwrap_or(0);
    if !(200..300).contains(&status) {
        return Err(LeaderboardError::Status(status));
    }
    let body = xhr.response_text().ok().flatten().unwrap_or_default();
    let rows = parse_ranking(&body)?;
    log::debug!("ranking refreshed ({} rows)", rows.len());
    Ok(rows)
}

fn show(view: &RankingView) {
    if let Some(list) = window()
        .and_then(|w| w.document())
        .and_then(|d| d.get_element_by_id(LIST_ELEMENT_ID))
    {
        list.set_inner_html(&render_ranking(view));
    }
}
