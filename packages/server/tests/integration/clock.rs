use crate::common::{TestApp, routes};
use serde_json::json;

mod timing_snapshot {
    use super::*;

    #[tokio::test]
    async fn reports_live_snapshot() {
        let app = TestApp::spawn().await;
        let id = app.create_live_contest("Live").await;

        let res = app.get(&routes::contest_timing(id)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["status"], "live");
        assert_eq!(res.body["starts_in"], "00:00:00");
        assert!(res.body["computed_at"].is_string());
        let progress = res.body["progress"].as_f64().unwrap();
        assert!((0.0..=100.0).contains(&progress));
    }

    #[tokio::test]
    async fn upcoming_contest_counts_down_to_start() {
        let app = TestApp::spawn().await;
        let id = app.create_upcoming_contest("Tomorrow").await;

        let res = app.get(&routes::contest_timing(id)).await;

        assert_eq!(res.body["status"], "upcoming");
        assert_eq!(res.body["progress"], 0.0);
        let starts_in = res.body["starts_in"].as_str().unwrap();
        assert!(starts_in.starts_with("23:") || starts_in.starts_with("24:"));
    }

    #[tokio::test]
    async fn returns_404_for_missing_contest() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::contest_timing(999_999)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod clock_stream {
    use super::*;

    #[tokio::test]
    async fn live_contest_streams_a_frame_per_tick() {
        let app = TestApp::spawn().await;
        let id = app.create_live_contest("Live").await;

        let clock = app.read_clock(id, 3).await;

        assert_eq!(clock.status, 200);
        assert_eq!(clock.frames.len(), 3);
        assert!(!clock.closed);
        for frame in &clock.frames {
            assert_eq!(frame["status"], "live");
        }
        let first = clock.frames[0]["progress"].as_f64().unwrap();
        let last = clock.frames[2]["progress"].as_f64().unwrap();
        assert!(last >= first, "progress went backwards: {first} -> {last}");
    }

    #[tokio::test]
    async fn upcoming_contest_streams_exactly_one_frame() {
        let app = TestApp::spawn().await;
        let id = app.create_upcoming_contest("Later").await;

        let clock = app.read_clock(id, 10).await;

        assert_eq!(clock.status, 200);
        assert!(clock.closed);
        assert_eq!(clock.frames.len(), 1);
        assert_eq!(clock.frames[0]["status"], "upcoming");
    }

    #[tokio::test]
    async fn completed_contest_streams_exactly_one_frame() {
        let app = TestApp::spawn().await;
        let id = app.create_completed_contest("Done").await;

        let clock = app.read_clock(id, 10).await;

        assert!(clock.closed);
        assert_eq!(clock.frames.len(), 1);
        assert_eq!(clock.frames[0]["status"], "completed");
        assert_eq!(clock.frames[0]["progress"], 100.0);
        assert_eq!(clock.frames[0]["time_left"], "00:00:00");
    }

    #[tokio::test]
    async fn cancelled_override_stops_a_live_clock() {
        let app = TestApp::spawn().await;
        let id = app.create_live_contest("Called off").await;
        app.patch(&routes::contest(id), &json!({ "status_override": "cancelled" }))
            .await;

        let clock = app.read_clock(id, 10).await;

        assert!(clock.closed);
        assert_eq!(clock.frames.len(), 1);
        assert_eq!(clock.frames[0]["status"], "cancelled");
    }

    #[tokio::test]
    async fn returns_404_for_missing_contest() {
        let app = TestApp::spawn().await;

        let clock = app.read_clock(999_999, 1).await;

        assert_eq!(clock.status, 404);
        assert!(clock.frames.is_empty());
    }

    #[tokio::test]
    async fn server_keeps_serving_after_client_disconnects() {
        let app = TestApp::spawn().await;
        let id = app.create_live_contest("Live").await;

        let first = app.read_clock(id, 1).await;
        assert_eq!(first.frames.len(), 1);

        let res = app.get(&routes::contest(id)).await;
        assert_eq!(res.status, 200);
    }
}
