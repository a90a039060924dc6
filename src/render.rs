//! View rendering: content document → view descriptions.
//!
//! Each page of the site lives in a [`PageContainer`]. A render call
//! always tears down whatever the container held before (unregistering its
//! images from the scheduler) and mounts a freshly built view, so calling a
//! renderer again for the same or different data never accumulates stale
//! registrations or activations.
//!
//! ## Home
//!
//! ```text
//! hero?            title (default "Portfolio"), subtitle?, CTA → #contact
//! gallery grid     one card per gallery with images, document order
//!   card           thumbnail (first image, lazy), display name, tags?,
//!                  description?, activates → #gallery/<encoded-name>
//! empty state      when no gallery has images
//! ```
//!
//! ## Detail
//!
//! ```text
//! back link        → #home
//! title            display name, description?, tags?
//! image grid       one tile per image (lazy), activates → lightbox over
//!                  the whole gallery at that tile's index
//! ```

use crate::content::{ContactInfo, ContentDocument, Gallery, Hero, non_empty};
use crate::lazyload::ImageLoadScheduler;
use crate::naming::{card_id, display_name, tile_id};
use crate::router::gallery_fragment;
use crate::view::{
    Activation, BackLink, CallToAction, ContactView, DetailView, GalleryCard, HeroView,
    HomeContent, HomeView, ImageTile, LazyImage, Trigger, View,
};
use std::fmt;
use std::rc::Rc;

pub const EMPTY_STATE_MESSAGE: &str = "No galleries yet";
pub const HERO_CTA_ID: &str = "hero-cta";
pub const BACK_LINK_ID: &str = "back-to-galleries";
pub const BACK_LINK_LABEL: &str = "Back to Galleries";
pub const CONTACT_FRAGMENT: &str = "#contact";
pub const HOME_FRAGMENT: &str = "#home";
pub const DEFAULT_CONTACT_HEADING: &str = "Get in Touch";

/// The three page containers of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Home,
    Gallery,
    Contact,
}

impl Page {
    pub const ALL: [Page; 3] = [Page::Home, Page::Gallery, Page::Contact];

    pub fn name(self) -> &'static str {
        match self {
            Page::Home => "home",
            Page::Gallery => "gallery",
            Page::Contact => "contact",
        }
    }

    /// Element id of the page's container.
    pub fn element_id(self) -> String {
        format!("page-{}", self.name())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Owns the view currently mounted for one page.
#[derive(Debug)]
pub struct PageContainer {
    page: Page,
    view: Option<View>,
    active: bool,
}

impl PageContainer {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            view: None,
            active: false,
        }
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn view(&self) -> Option<&View> {
        self.view.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Drop the mounted view and unregister its images.
    pub fn clear(&mut self, scheduler: &mut ImageLoadScheduler) {
        if let Some(view) = self.view.take() {
            for id in view.image_ids() {
                scheduler.unregister(id);
            }
        }
    }

    /// Activation for an element of the mounted view.
    pub fn activate(&self, element_id: &str, trigger: &Trigger) -> Option<Activation> {
        self.view.as_ref()?.activation(element_id, trigger).cloned()
    }

    fn mount(&mut self, view: View) {
        self.view = Some(view);
    }
}

/// Render the home page: optional hero, then the gallery grid.
pub fn render_home(
    container: &mut PageContainer,
    doc: &ContentDocument,
    scheduler: &mut ImageLoadScheduler,
) {
    container.clear(scheduler);

    let hero = doc.hero.as_ref().map(hero_view);
    let cards: Vec<GalleryCard> = doc
        .renderable_galleries()
        .map(|(name, gallery)| gallery_card(name, gallery, scheduler))
        .collect();

    let content = if cards.is_empty() {
        HomeContent::Empty {
            message: EMPTY_STATE_MESSAGE.to_string(),
        }
    } else {
        HomeContent::Grid {
            with_hero: hero.is_some(),
            cards,
        }
    };

    container.mount(View::Home(HomeView { hero, content }));
}

fn hero_view(hero: &Hero) -> HeroView {
    HeroView {
        title: hero.display_title().to_string(),
        subtitle: non_empty(&hero.subtitle).map(str::to_string),
        cta: non_empty(&hero.cta_text).map(|text| CallToAction {
            element_id: HERO_CTA_ID.to_string(),
            text: text.to_string(),
            activation: Activation::Navigate(CONTACT_FRAGMENT.to_string()),
        }),
        background_image: non_empty(&hero.background_image).map(str::to_string),
    }
}

fn gallery_card(name: &str, gallery: &Gallery, scheduler: &mut ImageLoadScheduler) -> GalleryCard {
    let display = display_name(name);
    let cover = gallery.cover().unwrap_or_default();
    GalleryCard {
        element_id: card_id(name),
        name: name.to_string(),
        aria_label: format!("View gallery: {display}"),
        thumbnail: LazyImage {
            id: scheduler.register(cover, &display),
            src: cover.to_string(),
            alt: display.clone(),
        },
        tags: gallery.tags.clone().unwrap_or_default(),
        description: non_empty(&gallery.description).map(str::to_string),
        activation: Activation::Navigate(gallery_fragment(name)),
        display_name: display,
    }
}

/// Render a gallery's detail page.
pub fn render_detail(
    container: &mut PageContainer,
    name: &str,
    gallery: &Gallery,
    scheduler: &mut ImageLoadScheduler,
) {
    container.clear(scheduler);

    let display = display_name(name);
    let images: Rc<[String]> = gallery.images.clone().into();
    let total = images.len();
    let tiles = images
        .iter()
        .enumerate()
        .map(|(index, src)| {
            let alt = format!("{display} — image {}", index + 1);
            ImageTile {
                element_id: tile_id(index),
                index,
                aria_label: format!("View image {} of {total}", index + 1),
                image: LazyImage {
                    id: scheduler.register(src, &alt),
                    src: src.clone(),
                    alt,
                },
                activation: Activation::OpenLightbox {
                    images: Rc::clone(&images),
                    index,
                },
            }
        })
        .collect();

    container.mount(View::Detail(DetailView {
        name: name.to_string(),
        back: BackLink {
            element_id: BACK_LINK_ID.to_string(),
            href: HOME_FRAGMENT.to_string(),
            label: BACK_LINK_LABEL.to_string(),
            activation: Activation::Navigate(HOME_FRAGMENT.to_string()),
        },
        title: display,
        description: non_empty(&gallery.description).map(str::to_string),
        tags: gallery.tags.clone().unwrap_or_default(),
        tiles,
    }));
}

/// Render the contact page.
pub fn render_contact(
    container: &mut PageContainer,
    contact: &ContactInfo,
    scheduler: &mut ImageLoadScheduler,
) {
    container.clear(scheduler);
    container.mount(View::Contact(ContactView {
        heading: non_empty(&contact.heading)
            .unwrap_or(DEFAULT_CONTACT_HEADING)
            .to_string(),
        email: non_empty(&contact.email).map(str::to_string),
        phone: non_empty(&contact.phone).map(str::to_string),
        location: non_empty(&contact.location).map(str::to_string),
        message: non_empty(&contact.message).map(str::to_string),
        links: contact
            .links
            .iter()
            .map(|(label, url)| (label.clone(), url.clone()))
            .collect(),
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;
    use crate::lazyload::LoadState;
    use crate::test_helpers::*;

    fn home_view(container: &PageContainer) -> &HomeView {
        match container.view() {
            Some(View::Home(home)) => home,
            other => panic!("expected home view, got {other:?}"),
        }
    }

    fn detail_view(container: &PageContainer) -> &DetailView {
        match container.view() {
            Some(View::Detail(detail)) => detail,
            other => panic!("expected detail view, got {other:?}"),
        }
    }

    // =========================================================================
    // Home
    // =========================================================================

    #[test]
    fn home_without_hero_has_one_card_per_gallery() {
        let doc = alps_document();
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);

        let view = home_view(&home);
        assert!(view.hero.is_none());
        assert_eq!(card_titles(view), vec!["alps trip"]);
        let card = find_card(view, "alps-trip");
        assert_eq!(card.thumbnail.src, "alps/1.jpg");
        assert_eq!(card.element_id, "gallery-card-alps-trip");
        assert_eq!(card.aria_label, "View gallery: alps trip");
        assert_eq!(scheduler.state(card.thumbnail.id), Some(LoadState::Pending));
    }

    #[test]
    fn card_navigates_to_encoded_gallery_fragment() {
        let doc = document_with_galleries(&[("café noir", &["c.jpg"])]);
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);

        let card = find_card(home_view(&home), "café noir");
        assert_eq!(
            card.activation,
            Activation::Navigate("#gallery/caf%C3%A9%20noir".into())
        );
    }

    #[test]
    fn cards_activate_on_click_enter_and_space_only() {
        let doc = alps_document();
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);

        let id = "gallery-card-alps-trip";
        let expected = Some(Activation::Navigate("#gallery/alps-trip".into()));
        assert_eq!(home.activate(id, &Trigger::Click), expected);
        assert_eq!(home.activate(id, &Trigger::Key(Key::Enter)), expected);
        assert_eq!(home.activate(id, &Trigger::Key(Key::Space)), expected);
        assert_eq!(home.activate(id, &Trigger::Key(Key::Escape)), None);
        assert_eq!(home.activate("gallery-card-nope", &Trigger::Click), None);
    }

    #[test]
    fn galleries_without_images_are_skipped() {
        let doc = document_with_galleries(&[("empty", &[]), ("full", &["f.jpg"])]);
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);
        assert_eq!(card_titles(home_view(&home)), vec!["full"]);
    }

    #[test]
    fn no_renderable_galleries_shows_empty_state() {
        let doc = document_with_galleries(&[("empty", &[])]);
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);
        assert_eq!(
            home_view(&home).content,
            HomeContent::Empty {
                message: "No galleries yet".into()
            }
        );
        assert!(scheduler.is_empty());
    }

    #[test]
    fn hero_block_with_cta() {
        let mut doc = alps_document();
        doc.hero = Some(Hero {
            title: None,
            subtitle: Some("Mountains, mostly".into()),
            cta_text: Some("Say hello".into()),
            background_image: Some("bg.jpg".into()),
        });
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);

        let view = home_view(&home);
        let hero = view.hero.as_ref().unwrap();
        assert_eq!(hero.title, "Portfolio");
        assert_eq!(hero.subtitle.as_deref(), Some("Mountains, mostly"));
        assert_eq!(hero.background_image.as_deref(), Some("bg.jpg"));
        assert!(matches!(view.content, HomeContent::Grid { with_hero: true, .. }));
        assert_eq!(
            home.activate(HERO_CTA_ID, &Trigger::Click),
            Some(Activation::Navigate("#contact".into()))
        );
    }

    #[test]
    fn hero_without_cta_text_has_no_button() {
        let mut doc = alps_document();
        doc.hero = Some(Hero {
            title: Some("Light".into()),
            ..Default::default()
        });
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);
        let hero = home_view(&home).hero.as_ref().unwrap();
        assert_eq!(hero.title, "Light");
        assert!(hero.cta.is_none());
        assert_eq!(home.activate(HERO_CTA_ID, &Trigger::Click), None);
    }

    #[test]
    fn card_carries_tags_and_description() {
        let mut doc = alps_document();
        let gallery = doc.galleries.get_mut("alps-trip").unwrap();
        gallery.tags = Some(vec!["travel".into(), "snow".into()]);
        gallery.description = Some("Two weeks above the clouds".into());
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);

        let card = find_card(home_view(&home), "alps-trip");
        assert_eq!(card.tags, vec!["travel", "snow"]);
        assert_eq!(card.description.as_deref(), Some("Two weeks above the clouds"));
    }

    #[test]
    fn rerendering_home_replaces_registrations() {
        let doc = document_with_galleries(&[("a", &["a.jpg"]), ("b", &["b.jpg"])]);
        let mut scheduler = ImageLoadScheduler::default();
        let mut home = PageContainer::new(Page::Home);
        render_home(&mut home, &doc, &mut scheduler);
        let first_ids = home.view().unwrap().image_ids();
        render_home(&mut home, &doc, &mut scheduler);
        render_home(&mut home, &doc, &mut scheduler);

        assert_eq!(scheduler.len(), 2);
        for id in first_ids {
            assert_eq!(scheduler.state(id), None);
        }
    }

    // =========================================================================
    // Detail
    // =========================================================================

    #[test]
    fn detail_has_one_tile_per_image() {
        let doc = alps_document();
        let mut scheduler = ImageLoadScheduler::default();
        let mut page = PageContainer::new(Page::Gallery);
        render_detail(&mut page, "alps-trip", doc.gallery("alps-trip").unwrap(), &mut scheduler);

        let view = detail_view(&page);
        assert_eq!(view.title, "alps trip");
        assert_eq!(view.tiles.len(), 3);
        assert_eq!(view.back.href, "#home");
        assert_eq!(view.tiles[1].element_id, "image-item-1");
        assert_eq!(view.tiles[1].aria_label, "View image 2 of 3");
        assert_eq!(view.tiles[1].image.alt, "alps trip — image 2");
        assert_eq!(scheduler.observed_count(), 3);
    }

    #[test]
    fn tiles_seed_lightbox_with_whole_gallery() {
        let doc = alps_document();
        let mut scheduler = ImageLoadScheduler::default();
        let mut page = PageContainer::new(Page::Gallery);
        render_detail(&mut page, "alps-trip", doc.gallery("alps-trip").unwrap(), &mut scheduler);

        match page.activate("image-item-1", &Trigger::Key(Key::Enter)) {
            Some(Activation::OpenLightbox { images, index }) => {
                assert_eq!(&*images, ["alps/1.jpg", "alps/2.jpg", "alps/3.jpg"]);
                assert_eq!(index, 1);
            }
            other => panic!("expected lightbox activation, got {other:?}"),
        }
    }

    #[test]
    fn back_link_navigates_home() {
        let doc = alps_document();
        let mut scheduler = ImageLoadScheduler::default();
        let mut page = PageContainer::new(Page::Gallery);
        render_detail(&mut page, "alps-trip", doc.gallery("alps-trip").unwrap(), &mut scheduler);
        assert_eq!(
            page.activate(BACK_LINK_ID, &Trigger::Click),
            Some(Activation::Navigate("#home".into()))
        );
    }

    #[test]
    fn switching_galleries_unregisters_previous_tiles() {
        let doc = document_with_galleries(&[("a", &["1.jpg", "2.jpg"]), ("b", &["3.jpg"])]);
        let mut scheduler = ImageLoadScheduler::default();
        let mut page = PageContainer::new(Page::Gallery);
        render_detail(&mut page, "a", doc.gallery("a").unwrap(), &mut scheduler);
        render_detail(&mut page, "b", doc.gallery("b").unwrap(), &mut scheduler);

        assert_eq!(scheduler.len(), 1);
        assert_eq!(detail_view(&page).name, "b");
        assert_eq!(page.activate("image-item-1", &Trigger::Click), None);
    }

    // =========================================================================
    // Contact
    // =========================================================================

    #[test]
    fn contact_defaults_heading_and_keeps_link_order() {
        let mut contact = ContactInfo {
            email: Some("jane@example.com".into()),
            ..Default::default()
        };
        contact.links.insert("Instagram".into(), "https://instagram.com/jane".into());
        contact.links.insert("Flickr".into(), "https://flickr.com/jane".into());

        let mut scheduler = ImageLoadScheduler::default();
        let mut page = PageContainer::new(Page::Contact);
        render_contact(&mut page, &contact, &mut scheduler);

        let Some(View::Contact(view)) = page.view() else {
            panic!("expected contact view");
        };
        assert_eq!(view.heading, "Get in Touch");
        assert_eq!(view.email.as_deref(), Some("jane@example.com"));
        let labels: Vec<&str> = view.links.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["Instagram", "Flickr"]);
    }

    #[test]
    fn page_element_ids() {
        assert_eq!(Page::Home.element_id(), "page-home");
        assert_eq!(Page::Gallery.element_id(), "page-gallery");
        assert_eq!(Page::Contact.element_id(), "page-contact");
    }
}
