//! SerpApi response shapes. Only the fields the normalizers read are modelled;
//! every list defaults to empty when the key is absent.

use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub ads: Vec<TextAd>,
    #[serde(default)]
    pub shopping_results: Vec<ShoppingResult>,
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,
    #[serde(default)]
    pub video_results: Vec<VideoResult>,
}

#[derive(Debug, Deserialize)]
pub struct TextAd {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub displayed_link: Option<String>,
    #[serde(default)]
    pub position: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ShoppingResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub position: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub position: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct VideoResult {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub channel: Option<Channel>,
    /// A number or a display string such as `"1.2M views"`.
    #[serde(default)]
    pub views: Option<Value>,
    #[serde(default)]
    pub length: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Channel {
    #[serde(default)]
    pub name: Option<String>,
}
