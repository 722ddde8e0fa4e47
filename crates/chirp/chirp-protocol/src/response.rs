use chirp_feed::FeedPost;
use serde::Serialize;

/// Response for ADD, REMOVE and CONTAINS tasks.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    pub id: i64,
}

/// Response for FEED tasks; `feed` is ordered newest first.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub id: i64,
    pub feed: Vec<FeedPost>,
}
