use gloo::net::http::Request;
use serde::Deserialize;
use wasm_bindgen_futures::spawn_local;
use yew::Callback;

const SEARCH_URL: &str = "https://api.thecatapi.com/v1/images/search";

#[derive(Clone, Debug, Deserialize)]
struct SearchHit {
    url: String,
}

/// Fires one image-search request per active player and reports whatever
/// arrived. A failed lookup is logged and leaves a `None` slot; the caller
/// falls back to the roster's bundled avatar. Game state is never touched.
pub(in crate::app) fn fetch(count: usize, done: Callback<Vec<Option<String>>>) {
    spawn_local(async move {
        let mut urls = Vec::with_capacity(count);
        for player in 0..count {
            match fetch_one().await {
                Ok(url) => urls.push(url),
                Err(err) => {
                    log::error!("avatar lookup for player {} failed: {:?}", player, err);
                    urls.push(None);
                }
            }
        }
        done.emit(urls);
    });
}

async fn fetch_one() -> Result<Option<String>, gloo::net::Error> {
    let hits: Vec<SearchHit> = Request::get(SEARCH_URL).send().await?.json().await?;
    Ok(hits.into_iter().next().map(|hit| hit.url))
}
