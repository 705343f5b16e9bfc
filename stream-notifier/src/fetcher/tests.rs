use std::sync::Mutex;

use crate::credentials::StaticToken;
use crate::snapshot::ChannelId;

use super::*;

#[derive(Default)]
struct FakeApi {
    users: Vec<TwitchUser>,
    /// Follow-list pages, served in order; each page carries the cursor to the next.
    pages: Vec<Vec<FollowedChannel>>,
    live: Vec<StreamInfo>,
    fail_follows: bool,
    unauthorized: bool,
    stream_batches: Mutex<Vec<usize>>,
    cursors_seen: Mutex<Vec<Option<String>>>,
}

impl FakeApi {
    fn with_user(mut self, login: &str, id: &str) -> Self {
        self.users.push(TwitchUser {
            id: id.into(),
            login: login.into(),
            display_name: login.into(),
            broadcaster_type: String::new(),
            profile_image_url: String::new(),
        });
        self
    }
}

#[async_trait]
impl FollowsApi for FakeApi {
    async fn user_by_login(
        &self,
        _token: &Token,
        login: &str,
    ) -> Result<Option<TwitchUser>, TwitchError> {
        if self.unauthorized {
            return Err(TwitchError::ApiError {
                status: 401,
                message: "Invalid OAuth token".into(),
            });
        }
        Ok(self.users.iter().find(|u| u.login == login).cloned())
    }

    async fn followed_channels_page(
        &self,
        _token: &Token,
        _user_id: &str,
        after: Option<&str>,
    ) -> Result<(Vec<FollowedChannel>, Option<String>), TwitchError> {
        self.cursors_seen
            .lock()
            .unwrap()
            .push(after.map(str::to_string));
        if self.fail_follows {
            return Err(TwitchError::ApiError {
                status: 503,
                message: "unavailable".into(),
            });
        }
        let index = after.map(|c| c.parse::<usize>().unwrap()).unwrap_or(0);
        let rows = self.pages.get(index).cloned().unwrap_or_default();
        let next = (index + 1 < self.pages.len()).then(|| (index + 1).to_string());
        Ok((rows, next))
    }

    async fn live_streams(
        &self,
        _token: &Token,
        user_ids: &[String],
    ) -> Result<Vec<StreamInfo>, TwitchError> {
        assert!(user_ids.len() <= MAX_STREAM_IDS_PER_REQUEST);
        self.stream_batches.lock().unwrap().push(user_ids.len());
        Ok(self
            .live
            .iter()
            .filter(|s| user_ids.contains(&s.user_id))
            .cloned()
            .collect())
    }
}

fn follow(id: &str) -> FollowedChannel {
    FollowedChannel {
        broadcaster_id: id.into(),
        broadcaster_login: format!("login{id}"),
        broadcaster_name: format!("Name{id}"),
        followed_at: String::new(),
    }
}

fn stream(user_id: &str) -> StreamInfo {
    StreamInfo {
        id: format!("stream-{user_id}"),
        user_id: user_id.into(),
        user_login: format!("login{user_id}"),
        user_name: format!("Name{user_id}"),
        game_name: "Just Chatting".into(),
        title: "hello".into(),
        viewer_count: 1,
        started_at: None,
        stream_type: "live".into(),
    }
}

fn fetcher(api: FakeApi) -> SnapshotFetcher<FakeApi> {
    SnapshotFetcher::new("viewer", api, Arc::new(StaticToken::new("tok")))
}

fn ids(snapshot: &Snapshot) -> Vec<&str> {
    snapshot.iter().map(|r| r.id.as_str()).collect()
}

#[tokio::test]
async fn collects_live_channels_in_follow_order() {
    let api = FakeApi {
        pages: vec![vec![follow("3"), follow("1"), follow("2")]],
        live: vec![stream("2"), stream("3")],
        ..FakeApi::default()
    }
    .with_user("viewer", "100");

    let snapshot = fetcher(api).fetch_live_follows().await.unwrap();

    assert_eq!(ids(&snapshot), ["3", "2"]);
    assert_eq!(snapshot.records()[0].game.as_deref(), Some("Just Chatting"));
}

#[tokio::test]
async fn merges_every_follow_page_before_querying_streams() {
    let api = FakeApi {
        pages: vec![
            vec![follow("1"), follow("2")],
            vec![follow("3")],
            vec![follow("4")],
        ],
        live: vec![stream("1"), stream("4")],
        ..FakeApi::default()
    }
    .with_user("viewer", "100");

    let f = fetcher(api);
    let snapshot = f.fetch_live_follows().await.unwrap();

    assert_eq!(ids(&snapshot), ["1", "4"]);
    assert_eq!(
        *f.api.cursors_seen.lock().unwrap(),
        vec![None, Some("1".to_string()), Some("2".to_string())]
    );
    assert_eq!(*f.api.stream_batches.lock().unwrap(), vec![4]);
}

#[tokio::test]
async fn stream_lookup_is_batched_by_100() {
    let follows: Vec<FollowedChannel> = (0..250).map(|i| follow(&i.to_string())).collect();
    let api = FakeApi {
        pages: vec![follows],
        live: vec![stream("5"), stream("150"), stream("249")],
        ..FakeApi::default()
    }
    .with_user("viewer", "100");

    let f = fetcher(api);
    let snapshot = f.fetch_live_follows().await.unwrap();

    assert_eq!(ids(&snapshot), ["5", "150", "249"]);
    assert_eq!(*f.api.stream_batches.lock().unwrap(), vec![100, 100, 50]);
}

#[tokio::test]
async fn duplicate_follows_are_queried_once() {
    let api = FakeApi {
        pages: vec![vec![follow("1"), follow("2")], vec![follow("2")]],
        live: vec![stream("2")],
        ..FakeApi::default()
    }
    .with_user("viewer", "100");

    let f = fetcher(api);
    let snapshot = f.fetch_live_follows().await.unwrap();

    assert_eq!(snapshot.len(), 1);
    assert!(snapshot.iter().any(|r| r.id == ChannelId::new("2")));
    assert_eq!(*f.api.stream_batches.lock().unwrap(), vec![2]);
}

#[tokio::test]
async fn no_follows_is_an_empty_snapshot() {
    let api = FakeApi::default().with_user("viewer", "100");

    let f = fetcher(api);
    let snapshot = f.fetch_live_follows().await.unwrap();

    assert!(snapshot.is_empty());
    assert!(f.api.stream_batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_handle_is_user_not_found() {
    let err = fetcher(FakeApi::default())
        .fetch_live_follows()
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::UserNotFound(ref h) if h == "viewer"));
}

#[tokio::test]
async fn follow_list_failure_is_transport() {
    let api = FakeApi {
        fail_follows: true,
        live: vec![stream("1")],
        ..FakeApi::default()
    }
    .with_user("viewer", "100");

    let f = fetcher(api);
    let err = f.fetch_live_follows().await.unwrap_err();

    assert!(matches!(err, FetchError::Transport(_)));
    assert!(f.api.stream_batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn rejected_token_is_auth_failure() {
    let api = FakeApi {
        unauthorized: true,
        ..FakeApi::default()
    };

    let err = fetcher(api).fetch_live_follows().await.unwrap_err();
    assert!(matches!(err, FetchError::Auth(_)));
}
