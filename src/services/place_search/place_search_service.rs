use async_trait::async_trait;
use tracing::debug;
use urlencoding::encode;

use super::types::{
    naver_local_search_response::NaverLocalSearchResponse, place_search_error::PlaceSearchError,
};
use crate::types::place::{PlaceResult, SearchResponse};

/// Free-text place lookup.
#[async_trait]
pub trait PlaceLookup: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, PlaceSearchError>;
}

#[derive(Clone)]
pub struct PlaceSearchServiceConfig {
    pub host: String,
    pub client_id: String,
    pub client_secret: String,
    pub display: u32,
}

#[derive(Clone)]
pub struct PlaceSearchService {
    config: PlaceSearchServiceConfig,
    client: reqwest::Client,
}

/// Drops the `<b>` highlight markup the lookup puts around matched words.
fn strip_tags(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_tag = false;

    for c in title.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }

    out
}

impl PlaceSearchService {
    pub fn new(config: PlaceSearchServiceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PlaceLookup for PlaceSearchService {
    async fn search(&self, query: &str) -> Result<SearchResponse, PlaceSearchError> {
        let url = format!(
            "{}/v1/search/local.json?query={}&display={}",
            self.config.host,
            encode(query),
            self.config.display
        );
        debug!("Searching places: {}", query);

        let resp = self
            .client
            .get(&url)
            .header("X-Naver-Client-Id", &self.config.client_id)
            .header("X-Naver-Client-Secret", &self.config.client_secret)
            .send()
            .await
            .map_err(|e| PlaceSearchError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(PlaceSearchError::Status(resp.status().as_u16()));
        }

        let body = resp
            .json::<NaverLocalSearchResponse>()
            .await
            .map_err(|e| PlaceSearchError::Body(e.to_string()))?;

        Ok(SearchResponse {
            total: body.total,
            items: body
                .items
                .into_iter()
                .enumerate()
                .map(|(index, item)| PlaceResult {
                    name: strip_tags(&item.title),
                    native_x: item.mapx,
                    native_y: item.mapy,
                    index,
                })
                .collect(),
        })
    }
}
