//! Typed view descriptions.
//!
//! Rendering produces these values instead of touching a document tree.
//! They say which cards, tiles and links exist, which images they show
//! and what each one does when activated. The [`crate::html`] module
//! materializes them; tests assert against them directly.

use crate::input::Key;
use crate::lazyload::ImageId;
use std::rc::Rc;

/// What happens when an element is activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// Ask the router to navigate to a fragment.
    Navigate(String),
    /// Open the lightbox over `images`, starting at `index`.
    OpenLightbox { images: Rc<[String]>, index: usize },
}

/// How the user activated an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    Click,
    Key(Key),
}

impl Trigger {
    /// Pointer clicks always activate; keys only when they are
    /// `Enter` or `Space`.
    pub fn activates(&self) -> bool {
        match self {
            Trigger::Click => true,
            Trigger::Key(key) => key.activates(),
        }
    }

    /// Links follow on a click or `Enter`; `Space` only scrolls.
    pub fn follows_link(&self) -> bool {
        matches!(self, Trigger::Click | Trigger::Key(Key::Enter))
    }
}

/// A lazily loaded image slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LazyImage {
    pub id: ImageId,
    pub src: String,
    pub alt: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallToAction {
    pub element_id: String,
    pub text: String,
    pub activation: Activation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeroView {
    pub title: String,
    pub subtitle: Option<String>,
    pub cta: Option<CallToAction>,
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    pub element_id: String,
    /// Gallery slug.
    pub name: String,
    pub display_name: String,
    pub aria_label: String,
    pub thumbnail: LazyImage,
    pub tags: Vec<String>,
    pub description: Option<String>,
    pub activation: Activation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HomeContent {
    Grid {
        /// Grid follows a hero block.
        with_hero: bool,
        cards: Vec<GalleryCard>,
    },
    Empty {
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub hero: Option<HeroView>,
    pub content: HomeContent,
}

impl HomeView {
    pub fn cards(&self) -> &[GalleryCard] {
        match &self.content {
            HomeContent::Grid { cards, .. } => cards,
            HomeContent::Empty { .. } => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackLink {
    pub element_id: String,
    pub href: String,
    pub label: String,
    /// Always `Navigate(href)`.
    pub activation: Activation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageTile {
    pub element_id: String,
    pub index: usize,
    pub aria_label: String,
    pub image: LazyImage,
    pub activation: Activation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    pub name: String,
    pub back: BackLink,
    pub title: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub tiles: Vec<ImageTile>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactView {
    pub heading: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub message: Option<String>,
    pub links: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home(HomeView),
    Detail(DetailView),
    Contact(ContactView),
}

impl View {
    /// Every lazily loaded image in the view, in document order.
    pub fn image_ids(&self) -> Vec<ImageId> {
        match self {
            View::Home(home) => home.cards().iter().map(|c| c.thumbnail.id).collect(),
            View::Detail(detail) => detail.tiles.iter().map(|t| t.image.id).collect(),
            View::Contact(_) => Vec::new(),
        }
    }

    /// Activation bound to `element_id`, if the trigger activates it.
    pub fn activation(&self, element_id: &str, trigger: &Trigger) -> Option<&Activation> {
        if !trigger.activates() {
            return None;
        }
        match self {
            View::Home(home) => {
                let cta = home
                    .hero
                    .as_ref()
                    .and_then(|h| h.cta.as_ref())
                    .filter(|cta| cta.element_id == element_id)
                    .map(|cta| &cta.activation);
                cta.or_else(|| {
                    home.cards()
                        .iter()
                        .find(|c| c.element_id == element_id)
                        .map(|c| &c.activation)
                })
            }
            View::Detail(detail) if detail.back.element_id == element_id => trigger
                .follows_link()
                .then_some(&detail.back.activation),
            View::Detail(detail) => detail
                .tiles
                .iter()
                .find(|t| t.element_id == element_id)
                .map(|t| &t.activation),
            View::Contact(_) => None,
        }
    }
}
