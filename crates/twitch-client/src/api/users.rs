use super::*;

impl TwitchApiClient {
    /// Look up a user by login name. `Ok(None)` when no such account exists.
    pub async fn find_user_by_login(
        &self,
        token: &Token,
        login: &str,
    ) -> Result<Option<TwitchUser>, TwitchError> {
        let url = self.endpoint("users", [("login", login)])?;
        let body = self.authenticated_get(url, token).await?;
        let resp: HelixResponse<TwitchUser> = serde_json::from_str(&body)?;
        Ok(resp.data.into_iter().next())
    }
}
