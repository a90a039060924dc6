//! HTML materialization of the app state.
//!
//! Everything here is a pure function from state to [`Markup`]: the page
//! containers, the lightbox overlay, the header and the loading and error
//! states. Nothing in this module mutates the app; re-rendering the same
//! state always yields the same document.
//!
//! Lazily loaded images are written the way the browser host expects them:
//! `data-src` while pending, `src` once the scheduler committed the source,
//! and class `loaded` in either terminal state. The alt text comes from the
//! scheduler record, so a failed image shows the fallback label.
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: site styles
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating,
//! with automatic escaping of every interpolated value.

use crate::app::{App, Header, LoadFailure, MENU_TOGGLE_ID, Nav, Status};
use crate::lazyload::{ImageLoadScheduler, LoadState};
use crate::lightbox::{Focus, Lightbox};
use crate::render::{Page, PageContainer};
use crate::view::{ContactView, DetailView, HomeContent, HomeView, LazyImage, View};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};

const CSS: &str = include_str!("../static/style.css");

/// Characters that could close a quoted CSS `url('...')`.
const CSS_URL: &AsciiSet = &CONTROLS
    .add(b'\'')
    .add(b'"')
    .add(b'(')
    .add(b')')
    .add(b'\\');

const DEFAULT_TITLE: &str = "Portfolio";

const NAV_LINKS: &[(Page, &str)] = &[(Page::Home, "Galleries"), (Page::Contact, "Contact")];

const ICON_CLOSE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><line x1="18" y1="6" x2="6" y2="18"/><line x1="6" y1="6" x2="18" y2="18"/></svg>"#;
const ICON_PREV: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="15 18 9 12 15 6"/></svg>"#;
const ICON_NEXT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="9 6 15 12 9 18"/></svg>"#;

/// The whole document for the app's current state.
pub fn render_document(app: &App) -> Markup {
    let title = app.header().logo.as_deref().unwrap_or(DEFAULT_TITLE);
    let body_class = app.lightbox().is_open().then_some("no-scroll");

    let content = html! {
        (site_header(app.header(), app.nav()))
        main id="app" {
            @match app.status() {
                Status::Loading => { (loading_state()) }
                Status::Failed(failure) => { (error_state(failure)) }
                Status::Ready => {
                    @for page in Page::ALL {
                        (render_page(app.container(page), app.scheduler()))
                    }
                }
            }
        }
        (render_lightbox(app.lightbox()))
    };

    base_document(title, CSS, body_class, content)
}

fn base_document(title: &str, css: &str, body_class: Option<&str>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (PreEscaped(css)) }
            }
            body class=[body_class] {
                (content)
            }
        }
    }
}

/// Header with logo, mobile menu toggle and nav links.
fn site_header(header: &Header, nav: &Nav) -> Markup {
    let expanded = if nav.menu_open { "true" } else { "false" };
    html! {
        header.site-header.hidden[header.hidden] id="site-header" {
            a.site-logo id="site-logo" href="#home" {
                @if let Some(logo) = &header.logo {
                    (logo)
                }
            }
            button.menu-toggle.open[nav.menu_open] id=(MENU_TOGGLE_ID) aria-label="Toggle menu" aria-expanded=(expanded) {
                span {}
                span {}
                span {}
            }
            nav.site-nav.open[nav.menu_open] id="site-nav" {
                @for (page, label) in NAV_LINKS {
                    a.nav-link.active[nav.active == Some(*page)] href={ "#" (page.name()) } data-route=(page.name()) {
                        (label)
                    }
                }
            }
        }
    }
}

pub fn loading_state() -> Markup {
    html! {
        div.loading-state {
            div.spinner {}
            p { "Loading portfolio…" }
        }
    }
}

pub fn error_state(failure: &LoadFailure) -> Markup {
    html! {
        div.error-state {
            h2 { "Something went wrong" }
            p {
                "Could not load content. Please make sure "
                code { (failure.source) }
                " is present and valid."
            }
        }
    }
}

/// One page container; hidden unless active.
pub fn render_page(container: &PageContainer, scheduler: &ImageLoadScheduler) -> Markup {
    html! {
        section.page.container.active[container.is_active()] id=(container.page().element_id()) {
            @if let Some(view) = container.view() {
                (render_view(view, scheduler))
            }
        }
    }
}

pub fn render_view(view: &View, scheduler: &ImageLoadScheduler) -> Markup {
    match view {
        View::Home(home) => home_markup(home, scheduler),
        View::Detail(detail) => detail_markup(detail, scheduler),
        View::Contact(contact) => contact_markup(contact),
    }
}

fn lazy_img(image: &LazyImage, scheduler: &ImageLoadScheduler) -> Markup {
    let record = scheduler.record(image.id);
    let state = record.map_or(LoadState::Pending, |r| r.state);
    let alt = record.map_or(image.alt.as_str(), |r| r.alt.as_str());
    html! {
        @if state == LoadState::Pending {
            img data-src=(image.src) data-image-id=(image.id.value()) alt=(alt) loading="lazy";
        } @else {
            img class=[state.is_loaded().then_some("loaded")] src=(image.src) data-image-id=(image.id.value()) data-state=(state.as_str()) alt=(alt) loading="lazy";
        }
    }
}

fn tags(tags: &[String], class: &str) -> Markup {
    html! {
        @if !tags.is_empty() {
            div class=(class) {
                @for tag in tags {
                    span.tag { (tag) }
                }
            }
        }
    }
}

fn hero_background(url: &str) -> String {
    format!(
        "background-image: linear-gradient(rgba(0,0,0,0.3), rgba(0,0,0,0.6)), url('{}')",
        utf8_percent_encode(url, CSS_URL)
    )
}

fn home_markup(home: &HomeView, scheduler: &ImageLoadScheduler) -> Markup {
    html! {
        @if let Some(hero) = &home.hero {
            @let background = hero.background_image.as_deref().map(hero_background);
            div.hero style=[background] {
                div.hero-content {
                    h1.hero-title { (hero.title) }
                    @if let Some(subtitle) = &hero.subtitle {
                        p.hero-subtitle { (subtitle) }
                    }
                    @if let Some(cta) = &hero.cta {
                        button.hero-cta id=(cta.element_id) { (cta.text) }
                    }
                }
                div.hero-scroll-indicator {
                    span { "Scroll" }
                }
            }
        }
        @match &home.content {
            HomeContent::Empty { message } => {
                div.empty-state {
                    p { (message) }
                }
            }
            HomeContent::Grid { with_hero, cards } => {
                div.gallery-grid.with-hero[*with_hero] {
                    @for card in cards {
                        article.gallery-card id=(card.element_id) role="link" tabindex="0" aria-label=(card.aria_label) {
                            div.card-thumb {
                                (lazy_img(&card.thumbnail, scheduler))
                                div.card-overlay {
                                    span.view-badge { "View" }
                                }
                            }
                            div.card-body {
                                h3.card-title { (card.display_name) }
                                (tags(&card.tags, "card-tags"))
                                @if let Some(desc) = &card.description {
                                    p.card-desc { (desc) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn detail_markup(detail: &DetailView, scheduler: &ImageLoadScheduler) -> Markup {
    html! {
        div.detail-header {
            a.back-link id=(detail.back.element_id) href=(detail.back.href) { (detail.back.label) }
            h1.detail-title { (detail.title) }
            hr.detail-divider;
            @if let Some(desc) = &detail.description {
                p.detail-desc { (desc) }
            }
            (tags(&detail.tags, "detail-tags"))
        }
        div.image-grid {
            @for tile in &detail.tiles {
                div.image-grid-item id=(tile.element_id) tabindex="0" role="button" aria-label=(tile.aria_label) {
                    (lazy_img(&tile.image, scheduler))
                }
            }
        }
    }
}

fn contact_markup(contact: &ContactView) -> Markup {
    html! {
        div.contact {
            h2.contact-heading { (contact.heading) }
            @if let Some(message) = &contact.message {
                p.contact-message { (message) }
            }
            ul.contact-list {
                @if let Some(email) = &contact.email {
                    li { a href={ "mailto:" (email) } { (email) } }
                }
                @if let Some(phone) = &contact.phone {
                    li { a href={ "tel:" (phone) } { (phone) } }
                }
                @if let Some(location) = &contact.location {
                    li { (location) }
                }
            }
            @if !contact.links.is_empty() {
                div.contact-links {
                    @for (label, url) in &contact.links {
                        a href=(url) target="_blank" rel="noopener" { (label) }
                    }
                }
            }
        }
    }
}

/// The overlay, once it has been opened at least once.
pub fn render_lightbox(lightbox: &Lightbox) -> Markup {
    if !lightbox.is_mounted() {
        return html! {};
    }
    let display = lightbox.display();
    let (src, alt, counter) = match &display {
        Some(d) => (d.src.as_str(), d.alt.as_str(), d.counter.as_str()),
        None => ("", "Lightbox image", ""),
    };
    let focused = lightbox.focus() == Some(Focus::Close);
    html! {
        div.lightbox.open[lightbox.is_open()] id="lightbox" role="dialog" aria-modal="true" aria-label="Image lightbox" {
            button.lb-close id="lb-close" aria-label="Close lightbox" autofocus[focused] { (PreEscaped(ICON_CLOSE)) }
            button.lb-arrow.lb-prev id="lb-prev" aria-label="Previous image" { (PreEscaped(ICON_PREV)) }
            div.lightbox-img-wrapper {
                img id="lb-img" src=(src) alt=(alt);
            }
            button.lb-arrow.lb-next id="lb-next" aria-label="Next image" { (PreEscaped(ICON_NEXT)) }
            div.lb-counter id="lb-counter" { (counter) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppOptions;
    use crate::content::StaticSource;
    use crate::lazyload::{IntersectionEntry, LoadResult};
    use crate::router::parse;
    use crate::test_helpers::*;

    fn ready_app(fragment: &str) -> App {
        let mut app = App::new(AppOptions::default());
        app.load(&StaticSource::ok(ALPS_JSON));
        app.show_route(&parse(fragment));
        app
    }

    // =========================================================================
    // Document shell
    // =========================================================================

    #[test]
    fn base_document_includes_doctype() {
        let content = html! { p { "test" } };
        let doc = base_document("Test", "body {}", None, content).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
    }

    #[test]
    fn loading_document_shows_spinner() {
        let app = App::new(AppOptions::default());
        let doc = render_document(&app).into_string();
        assert!(doc.contains("Loading portfolio…"));
        assert!(!doc.contains("page-home"));
    }

    #[test]
    fn error_document_names_content_file() {
        let mut app = App::new(AppOptions::default());
        app.load(&StaticSource::with_status(404, ""));
        let doc = render_document(&app).into_string();
        assert!(doc.contains("Something went wrong"));
        assert!(doc.contains("<code>content.json</code>"));
        assert!(!doc.contains("class=\"page"));
    }

    #[test]
    fn header_hidden_without_page_name() {
        let doc = render_document(&ready_app("")).into_string();
        assert!(doc.contains(r#"class="site-header hidden""#));
    }

    #[test]
    fn page_name_is_escaped() {
        let mut app = App::new(AppOptions::default());
        app.load(&StaticSource::ok(
            r#"{ "pageName": "<script>alert(1)</script>", "galleries": {} }"#,
        ));
        let doc = render_document(&app).into_string();
        assert!(!doc.contains("<script>alert(1)</script>"));
        assert!(doc.contains("&lt;script&gt;"));
    }

    #[test]
    fn hero_background_cannot_close_the_url() {
        let mut app = App::new(AppOptions::default());
        app.load(&StaticSource::ok(
            r#"{ "hero": { "backgroundImage": "bg.jpg'); color: red; ('" }, "galleries": {} }"#,
        ));
        let doc = render_document(&app).into_string();
        assert!(doc.contains("url('bg.jpg%27%29; color: red; %28%27')"));
        assert!(!doc.contains("'); color"));
    }

    #[test]
    fn active_nav_link_follows_page() {
        let doc = render_document(&ready_app("#contact")).into_string();
        assert!(doc.contains(r##"class="nav-link active" href="#contact""##));
        assert!(doc.contains(r##"class="nav-link" href="#home""##));
    }

    // =========================================================================
    // Pages
    // =========================================================================

    #[test]
    fn only_active_page_has_active_class() {
        let doc = render_document(&ready_app("#gallery/alps-trip")).into_string();
        assert!(doc.contains(r#"class="page container active" id="page-gallery""#));
        assert!(doc.contains(r#"class="page container" id="page-home""#));
    }

    #[test]
    fn pending_images_use_data_src() {
        let app = ready_app("#gallery/alps-trip");
        let html = render_page(app.container(Page::Gallery), app.scheduler()).into_string();
        assert!(html.contains(r#"data-src="alps/1.jpg""#));
        assert!(!html.contains(r#" src="alps/1.jpg""#));
        assert!(html.contains("alps trip — image 1"));
    }

    #[test]
    fn committed_and_failed_images() {
        let mut app = ready_app("#gallery/alps-trip");
        let Some(View::Detail(detail)) = app.container(Page::Gallery).view().cloned() else {
            panic!("gallery not rendered");
        };
        let first = detail.tiles[0].image.id;
        let second = detail.tiles[1].image.id;
        app.scheduler_mut().on_intersections(&[
            IntersectionEntry { id: first, is_intersecting: true },
            IntersectionEntry { id: second, is_intersecting: true },
        ]);
        app.scheduler_mut().complete(first, LoadResult::Ok);
        app.scheduler_mut().complete(second, LoadResult::Error);

        let html = render_page(app.container(Page::Gallery), app.scheduler()).into_string();
        assert!(html.contains(r#"class="loaded" src="alps/1.jpg""#));
        assert!(html.contains(r#"data-state="failed" alt="Image could not be loaded""#));
        assert!(html.contains(r#"data-src="alps/3.jpg""#));
    }

    #[test]
    fn empty_home_shows_message() {
        let mut app = App::new(AppOptions::default());
        app.load(&StaticSource::ok(r#"{ "galleries": { "x": { "images": [] } } }"#));
        app.show_route(&parse(""));
        let html = render_page(app.container(Page::Home), app.scheduler()).into_string();
        assert!(html.contains("No galleries yet"));
        assert!(!html.contains("gallery-grid"));
    }

    // =========================================================================
    // Lightbox
    // =========================================================================

    #[test]
    fn lightbox_absent_until_first_open() {
        let doc = render_document(&ready_app("#gallery/alps-trip")).into_string();
        assert!(!doc.contains(r#"id="lightbox""#));
    }

    #[test]
    fn open_lightbox_shows_image_and_counter() {
        let mut app = ready_app("#gallery/alps-trip");
        app.open_lightbox(&["a.jpg".to_string(), "b.jpg".to_string()], 1);
        let html = render_lightbox(app.lightbox()).into_string();
        assert!(html.contains(r#"class="lightbox open""#));
        assert!(html.contains(r#"src="b.jpg" alt="Image 2 of 2""#));
        assert!(html.contains("2 / 2"));
        assert!(render_document(&app).into_string().contains(r#"class="no-scroll""#));
    }

    #[test]
    fn closed_lightbox_stays_mounted_without_open_class() {
        let mut app = ready_app("#gallery/alps-trip");
        app.open_lightbox(&["a.jpg".to_string()], 0);
        app.close_lightbox();
        let html = render_lightbox(app.lightbox()).into_string();
        assert!(html.contains(r#"class="lightbox" id="lightbox""#));
        assert!(!html.contains("autofocus"));
    }
}
