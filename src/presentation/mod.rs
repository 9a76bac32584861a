//! Rendering of search results and static replies as channel-independent cards

pub mod card;
pub mod images;
pub mod presenter;
pub mod prompts;

pub use card::{CardKind, PresentationCard, PresentationResult};
pub use images::{asset_url, FixedImage, ImageSelector, RandomImagePool};
pub use presenter::ResultPresenter;
pub use prompts::PromptCatalog;
