use super::*;

/// Helix accepts at most this many `user_id` filters per GET /streams.
pub const MAX_STREAM_IDS_PER_REQUEST: usize = 100;

impl TwitchApiClient {
    /// Get live streams for up to 100 broadcaster user IDs.
    ///
    /// IDs beyond the first 100 are ignored; callers chunk larger sets.
    /// Offline broadcasters are simply absent from the result.
    pub async fn get_streams_by_user_ids(
        &self,
        token: &Token,
        user_ids: &[String],
    ) -> Result<Vec<StreamInfo>, TwitchError> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let first = streams_page_size(user_ids).to_string();
        let query = std::iter::once(("first", first.as_str())).chain(
            user_ids
                .iter()
                .take(MAX_STREAM_IDS_PER_REQUEST)
                .map(|id| ("user_id", id.as_str())),
        );
        let url = self.endpoint("streams", query)?;
        let body = self.authenticated_get(url, token).await?;
        let resp: HelixResponse<StreamInfo> = serde_json::from_str(&body)?;
        Ok(resp.data)
    }
}

pub(super) fn streams_page_size(user_ids: &[String]) -> usize {
    user_ids.len().clamp(1, MAX_STREAM_IDS_PER_REQUEST)
}
