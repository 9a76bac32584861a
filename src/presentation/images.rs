//! Card illustration selection

use rand::seq::SliceRandom;

/// Picks the illustration shown on a result card
pub trait ImageSelector: Send + Sync {
    fn select(&self) -> String;
}

/// Uniform random pick over a fixed pool of images
#[derive(Debug, Clone)]
pub struct RandomImagePool {
    urls: Vec<String>,
}

impl RandomImagePool {
    pub fn new(host: &str, paths: &[String]) -> Self {
        Self {
            urls: paths.iter().map(|path| asset_url(host, path)).collect(),
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

impl ImageSelector for RandomImagePool {
    fn select(&self) -> String {
        self.urls
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

/// Always returns the same image
#[derive(Debug, Clone, Default)]
pub struct FixedImage(pub String);

impl ImageSelector for FixedImage {
    fn select(&self) -> String {
        self.0.clone()
    }
}

/// Joins an asset host and a path with exactly one slash
pub fn asset_url(host: &str, path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    format!(
        "{}/{}",
        host.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
