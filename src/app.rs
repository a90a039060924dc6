//! Application controller: bootstrap, page containers and route dispatch.
//!
//! [`App`] owns the three page containers, the image scheduler and the
//! lightbox. It loads the content document once, pre-renders the home and
//! contact pages, then reacts to route events by rendering (for galleries)
//! and showing exactly one container.
//!
//! [`Site`] wires an `App` to a [`Router`]: it subscribes the app to route
//! events, emits the initial route, and turns element activations into
//! either a navigation or a lightbox open. The app never holds the router,
//! so a navigation triggered from an activation re-enters the app through
//! the subscription without any outstanding borrow.
//!
//! ## Route Dispatch
//!
//! | Route | Page shown |
//! |-------|------------|
//! | `gallery/<name>`, name exists | Gallery (re-rendered for `name`) |
//! | `gallery/<name>`, name missing | Home |
//! | `contact` | Contact |
//! | `home`, empty, anything else | Home |
//!
//! Until the content document has loaded no page is shown; if loading
//! fails the app stays in its error state for good.

use crate::config::{UnknownRoute, ViewerConfig};
use crate::content::{self, ContentDocument, ContentSource};
use crate::input::Key;
use crate::lazyload::{
    Commit, ImageId, ImageLoadScheduler, IntersectionEntry, LoadResult, LoadState, Rect,
};
use crate::lightbox::{ClickTarget, Lightbox, LightboxInput, NoScrollLock, ScrollLock};
use crate::render::{Page, PageContainer, render_contact, render_detail, render_home};
use crate::router::{Location, Route, RouteState, Router};
use crate::view::{Activation, Trigger};
use std::cell::{Ref, RefCell};
use std::rc::Rc;
use tracing::{debug, info, warn};

/// Element id of the mobile menu button.
pub const MENU_TOGGLE_ID: &str = "menu-toggle";

/// Settings the app is built with.
#[derive(Debug, Clone, PartialEq)]
pub struct AppOptions {
    pub content_path: String,
    pub root_margin_px: f64,
    pub swipe_threshold_px: f64,
    pub unknown_route: UnknownRoute,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

impl From<&ViewerConfig> for AppOptions {
    fn from(config: &ViewerConfig) -> Self {
        Self {
            content_path: config.content_path.clone(),
            root_margin_px: config.lazy_load.root_margin_px,
            swipe_threshold_px: config.lightbox.swipe_threshold_px,
            unknown_route: config.routes.unknown,
        }
    }
}

/// Why the content document could not be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Where the document was expected.
    pub source: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Loading,
    Failed(LoadFailure),
    Ready,
}

/// Site header: hidden when the document has no page name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    pub hidden: bool,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nav {
    /// Route whose nav link is highlighted.
    pub active: Option<Page>,
    /// Mobile menu expanded.
    pub menu_open: bool,
}

pub struct App {
    options: AppOptions,
    status: Status,
    content: Option<ContentDocument>,
    header: Header,
    nav: Nav,
    home: PageContainer,
    gallery: PageContainer,
    contact: PageContainer,
    scheduler: ImageLoadScheduler,
    lightbox: Lightbox,
    scroll_resets: usize,
}

impl App {
    pub fn new(options: AppOptions) -> Self {
        Self::with_scroll_lock(options, Box::new(NoScrollLock))
    }

    pub fn with_scroll_lock(options: AppOptions, scroll: Box<dyn ScrollLock>) -> Self {
        Self {
            scheduler: ImageLoadScheduler::new(options.root_margin_px),
            lightbox: Lightbox::new(scroll, options.swipe_threshold_px),
            options,
            status: Status::Loading,
            content: None,
            header: Header::default(),
            nav: Nav::default(),
            home: PageContainer::new(Page::Home),
            gallery: PageContainer::new(Page::Gallery),
            contact: PageContainer::new(Page::Contact),
            scroll_resets: 0,
        }
    }

    /// Fetch the content document and build the UI. Only the first call
    /// does anything; there is no retry after a failure.
    pub fn load(&mut self, source: &dyn ContentSource) -> &Status {
        if self.status != Status::Loading {
            warn!("content already loaded; ignoring second load");
            return &self.status;
        }

        match content::load(source) {
            Err(err) => {
                let origin = source
                    .describe()
                    .unwrap_or_else(|| self.options.content_path.clone());
                warn!(source = %origin, error = %err, "failed to load content");
                self.status = Status::Failed(LoadFailure {
                    source: origin,
                    detail: err.to_string(),
                });
            }
            Ok(doc) => {
                self.header = Header {
                    hidden: content::non_empty(&doc.page_name).is_none(),
                    logo: content::non_empty(&doc.page_name).map(str::to_string),
                };
                render_home(&mut self.home, &doc, &mut self.scheduler);
                render_contact(&mut self.contact, &doc.contact, &mut self.scheduler);
                info!(galleries = doc.galleries.len(), "content loaded");
                self.content = Some(doc);
                self.status = Status::Ready;
            }
        }
        &self.status
    }

    /// React to a route event by showing (and if needed rendering) a page.
    pub fn show_route(&mut self, state: &RouteState) {
        if self.status != Status::Ready {
            debug!(route = %state.route, "route event before content is ready");
            return;
        }
        let Some(doc) = self.content.as_ref() else {
            return;
        };

        let page = match &state.route {
            Route::Gallery => {
                let found = state
                    .param(0)
                    .and_then(|name| doc.gallery(name).map(|g| (name, g)));
                match found {
                    Some((name, gallery)) => {
                        render_detail(&mut self.gallery, name, gallery, &mut self.scheduler);
                        Page::Gallery
                    }
                    None => {
                        debug!(params = ?state.params, "unknown gallery, showing home");
                        Page::Home
                    }
                }
            }
            Route::Contact => Page::Contact,
            Route::Home => Page::Home,
            Route::Other(name) => {
                debug!(route = %name, "unrecognized route");
                match self.options.unknown_route {
                    UnknownRoute::Home => Page::Home,
                }
            }
        };
        self.show_page(page);
    }

    /// Make `page` the only visible container.
    fn show_page(&mut self, page: Page) {
        for container in [&mut self.home, &mut self.gallery, &mut self.contact] {
            let active = container.page() == page;
            container.set_active(active);
        }
        self.nav.active = Some(page);
        self.nav.menu_open = false;
        self.scroll_resets += 1;
        debug!(%page, "show page");
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn options(&self) -> &AppOptions {
        &self.options
    }

    pub fn content(&self) -> Option<&ContentDocument> {
        self.content.as_ref()
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn nav(&self) -> &Nav {
        &self.nav
    }

    pub fn toggle_menu(&mut self) {
        self.nav.menu_open = !self.nav.menu_open;
    }

    /// Times the window was scrolled back to the top by a page switch.
    pub fn scroll_resets(&self) -> usize {
        self.scroll_resets
    }

    pub fn container(&self, page: Page) -> &PageContainer {
        match page {
            Page::Home => &self.home,
            Page::Gallery => &self.gallery,
            Page::Contact => &self.contact,
        }
    }

    /// The visible page, if any.
    pub fn active_page(&self) -> Option<Page> {
        Page::ALL
            .into_iter()
            .find(|&page| self.container(page).is_active())
    }

    pub fn scheduler(&self) -> &ImageLoadScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut ImageLoadScheduler {
        &mut self.scheduler
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Activation of an element on the visible page. The open lightbox
    /// covers the page, so nothing underneath can be activated.
    pub fn activation(&self, element_id: &str, trigger: &Trigger) -> Option<Activation> {
        if self.lightbox.is_open() {
            return None;
        }
        self.container(self.active_page()?)
            .activate(element_id, trigger)
    }

    pub fn open_lightbox(&mut self, images: &[String], index: usize) {
        self.lightbox.open(images.to_vec(), index);
    }

    pub fn close_lightbox(&mut self) {
        self.lightbox.close();
    }

    pub fn lightbox_input(&mut self, input: LightboxInput) -> bool {
        self.lightbox.handle(input)
    }
}

/// An [`App`] connected to a [`Router`].
pub struct Site {
    router: Rc<Router>,
    app: Rc<RefCell<App>>,
}

impl Site {
    /// Load content into `app`, subscribe it to route events and emit the
    /// current route. A failed load leaves the app in its error state and
    /// never subscribes it, so no page is ever shown.
    pub fn start(app: App, location: impl Location + 'static, source: &dyn ContentSource) -> Self {
        let app = Rc::new(RefCell::new(app));
        let router = Rc::new(Router::new(location));

        let ready = *app.borrow_mut().load(source) == Status::Ready;
        if ready {
            let handle = Rc::clone(&app);
            router.subscribe(move |state| handle.borrow_mut().show_route(state));
            router.emit_current();
        }
        Self { router, app }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn app(&self) -> Ref<'_, App> {
        self.app.borrow()
    }

    /// Navigate programmatically.
    pub fn navigate(&self, fragment: &str) {
        self.router.navigate(fragment);
    }

    /// Host change event (address bar edit, back/forward).
    pub fn fragment_changed(&self) {
        self.router.on_fragment_changed();
    }

    /// Activate an element of the visible page. Returns whether anything
    /// happened.
    pub fn activate(&self, element_id: &str, trigger: Trigger) -> bool {
        let activation = self.app.borrow().activation(element_id, &trigger);
        match activation {
            Some(Activation::Navigate(fragment)) => self.router.navigate(&fragment),
            Some(Activation::OpenLightbox { images, index }) => {
                self.app.borrow_mut().open_lightbox(&images, index)
            }
            None => return false,
        }
        true
    }

    /// Pointer click on an element: lightbox controls, the menu toggle, or
    /// anything activatable on the visible page.
    pub fn click(&self, element_id: &str) -> bool {
        if let Some(target) = ClickTarget::from_element_id(element_id) {
            return self.lightbox_input(LightboxInput::Click(target));
        }
        if element_id == MENU_TOGGLE_ID {
            self.toggle_menu();
            return true;
        }
        self.activate(element_id, Trigger::Click)
    }

    /// Key press while `element_id` has focus.
    pub fn press(&self, element_id: &str, key: Key) -> bool {
        if self.app.borrow().lightbox().is_open() {
            return self.key(key);
        }
        self.activate(element_id, Trigger::Key(key))
    }

    /// Document-level key press. Only the open lightbox listens globally.
    pub fn key(&self, key: Key) -> bool {
        self.app.borrow_mut().lightbox_input(LightboxInput::Key(key))
    }

    pub fn lightbox_input(&self, input: LightboxInput) -> bool {
        self.app.borrow_mut().lightbox_input(input)
    }

    pub fn toggle_menu(&self) {
        self.app.borrow_mut().toggle_menu();
    }

    /// Poll image geometry against the viewport. See
    /// [`ImageLoadScheduler::scan`].
    pub fn scroll(&self, viewport: Rect, bounds: impl Fn(ImageId) -> Option<Rect>) -> Vec<Commit> {
        self.app.borrow_mut().scheduler_mut().scan(viewport, bounds)
    }

    pub fn intersections(&self, entries: &[IntersectionEntry]) -> Vec<Commit> {
        self.app.borrow_mut().scheduler_mut().on_intersections(entries)
    }

    pub fn image_loaded(&self, id: ImageId, result: LoadResult) -> Option<LoadState> {
        self.app.borrow_mut().scheduler_mut().complete(id, result)
    }
}
