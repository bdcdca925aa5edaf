#![allow(non_snake_case)]
#![allow(dead_code)]
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct NaverLocalSearchResponseItem {
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub roadAddress: String,
    pub mapx: String,
    pub mapy: String,
}

#[derive(Deserialize, Serialize)]
pub struct NaverLocalSearchResponse {
    pub total: i64,
    pub items: Vec<NaverLocalSearchResponseItem>,
}
