use super::*;

/// Largest page Helix serves for GET /channels/followed.
pub const FOLLOWED_PAGE_SIZE: u32 = 100;

impl TwitchApiClient {
    /// Get one page of channels followed by the specified user.
    ///
    /// Returns the rows and the cursor for the next page, if any.
    pub async fn get_followed_channels_page(
        &self,
        token: &Token,
        user_id: &str,
        first: u32,
        after: Option<&str>,
    ) -> Result<(Vec<FollowedChannel>, Option<String>), TwitchError> {
        let clamped = first.clamp(1, FOLLOWED_PAGE_SIZE).to_string();
        let mut query = vec![("user_id", user_id), ("first", clamped.as_str())];
        if let Some(cursor) = after.filter(|v| !v.is_empty()) {
            query.push(("after", cursor));
        }
        let url = self.endpoint("channels/followed", query)?;
        let body = self.authenticated_get(url, token).await?;
        let resp: HelixPaginatedResponse<FollowedChannel> = serde_json::from_str(&body)?;
        let next_cursor = resp.next_cursor().map(str::to_string);
        Ok((resp.data, next_cursor))
    }
}
