// Integration tests for ranking parsing and rendering (feature = "leaderboard").
#![cfg(feature = "leaderboard")]

use shape_slash::leaderboard::{
    LeaderboardError, RANKING_LIMIT, RankingView, ScoreEntry, parse_ranking, render_ranking,
};

fn entry(name: &str, score: i64) -> ScoreEntry {
    ScoreEntry {
        player_name: name.to_string(),
        score,
    }
}

#[test]
fn rows_are_sorted_and_capped() {
    let body: String = {
        let rows: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"player_name":"p{i}","score":{}}}"#, (i * 37) % 100))
            .collect();
        format!("[{}]", rows.join(","))
    };
    let rows = parse_ranking(&body).unwrap();
    assert_eq!(rows.len(), RANKING_LIMIT);
    for w in rows.windows(2) {
        assert!(w[0].score >= w[1].score, "{:?} before {:?}", w[0], w[1]);
    }
}

#[test]
fn extra_columns_are_ignored() {
    let rows = parse_ranking(r#"[{"player_name":"ana","score":120,"id":4}]"#).unwrap();
    assert_eq!(rows, vec![entry("ana", 120)]);
}

#[test]
fn malformed_payload_is_an_error() {
    assert!(matches!(
        parse_ranking(r#"{"message":"JWT expired"}"#),
        Err(LeaderboardError::Parse(_))
    ));
    assert!(matches!(parse_ranking(""), Err(LeaderboardError::Parse(_))));
}

#[test]
fn status_errors_are_descriptive() {
    assert_eq!(
        LeaderboardError::Status(401).to_string(),
        "ranking request failed with HTTP status 401"
    );
}

#[test]
fn placeholder_rows_for_each_state() {
    assert!(render_ranking(&RankingView::Loading).contains("Loading"));
    assert!(render_ranking(&RankingView::Failed).contains("Could not load ranking"));
    assert!(render_ranking(&RankingView::Rows(vec![])).contains("No scores yet"));
}

#[test]
fn ranked_rows_are_numbered_and_escaped() {
    let html = render_ranking(&RankingView::Rows(vec![entry("zoe", 90), entry("<b>x</b>", 40)]));
    assert!(html.contains(r##"<span class="pos">#1</span><span class="name">zoe</span><span class="score">90</span>"##));
    assert!(html.contains(r#"#2"#));
    assert!(html.contains("&lt;b&gt;x&lt;/b&gt;"));
    assert!(!html.contains("<b>"));
    assert_eq!(html.matches("ranking-item").count(), 2);
}
