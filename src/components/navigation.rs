use std::rc::Rc;

use crate::api::pages::PageFetcher;
use crate::components::app_view::PageContext;
use crate::error::NavError;

/// What an anchor click should turn into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Leave the event alone; the browser navigates (or does nothing).
    Native,
    /// Prevent the default and load this href into the shell.
    Navigate(String),
}

/// The parts of a click on (or inside) an anchor that decide interception.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClickInfo {
    pub href: Option<String>,
    /// `MouseEvent.button`; 0 is the primary button.
    pub button: i16,
    /// Any of ctrl/meta/shift/alt held.
    pub modified: bool,
    pub target: Option<String>,
    pub download: bool,
    pub default_prevented: bool,
}

/// `scheme:` prefix per RFC 3986: a letter, then letters, digits, `+-.`.
fn has_scheme(href: &str) -> bool {
    let Some(colon) = href.find(':') else {
        return false;
    };
    let scheme = &href[..colon];
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

pub fn classify_link(click: &ClickInfo) -> LinkAction {
    if click.default_prevented || click.button != 0 || click.modified || click.download {
        return LinkAction::Native;
    }
    if let Some(target) = click.target.as_deref() {
        if !target.is_empty() && !target.eq_ignore_ascii_case("_self") {
            return LinkAction::Native;
        }
    }
    let Some(href) = click.href.as_deref().map(str::trim) else {
        return LinkAction::Native;
    };
    if href.is_empty() || href.starts_with('#') || href.starts_with("//") || has_scheme(href) {
        return LinkAction::Native;
    }
    LinkAction::Navigate(href.to_string())
}

/// Browser surface the router drives. Never touches the media element.
pub trait NavigationHost {
    /// Absolute form of `href` against the current document location.
    /// `None` when it cannot be parsed.
    fn resolve_url(&self, href: &str) -> Option<String>;
    fn push_history(&self, url: &str);
    fn current_location(&self) -> String;
    /// Full document navigation; the current document unloads.
    fn assign_location(&self, url: &str);
    /// Replace the shell's children with the fetched document's body (minus
    /// the bottom bar and scripts) and adopt its title. Returns the title.
    fn swap_shell(&self, html: &str) -> Result<String, NavError>;
    fn scroll_to_origin(&self);
}

/// Per-page initialization steps, run in declaration order after every
/// successful load and once at boot.
pub trait PageLifecycle {
    fn apply_theme(&self);
    fn populate_index(&self);
    fn bind_subscribe_form(&self);
    fn rebuild_track_list(&self, context: &PageContext);
}

#[derive(Clone)]
pub struct Router {
    host: Rc<dyn NavigationHost>,
    fetcher: Rc<dyn PageFetcher>,
    lifecycle: Rc<dyn PageLifecycle>,
}

impl Router {
    pub fn new(
        host: Rc<dyn NavigationHost>,
        fetcher: Rc<dyn PageFetcher>,
        lifecycle: Rc<dyn PageLifecycle>,
    ) -> Self {
        Self {
            host,
            fetcher,
            lifecycle,
        }
    }

    /// Href to navigate to when the click should be taken over.
    pub fn intercept(&self, click: &ClickInfo) -> Option<String> {
        match classify_link(click) {
            LinkAction::Navigate(href) => Some(href),
            LinkAction::Native => None,
        }
    }

    /// `href` resolves against the page it was clicked on, before the push;
    /// the pushed entry, the fetch and the fallback share that URL.
    pub async fn navigate(&self, href: String) {
        let url = self.host.resolve_url(&href).unwrap_or(href);
        tracing::info!(url = %url, "navigating");
        self.host.push_history(&url);
        self.load_page(&url).await;
    }

    /// Back/forward: reload the current location without a new entry.
    pub async fn handle_pop_state(&self) {
        let url = self.host.current_location();
        tracing::debug!(url = %url, "history pop");
        self.load_page(&url).await;
    }

    /// Fetch and splice `url`. Any failure falls back to a full navigation.
    pub async fn load_page(&self, url: &str) -> bool {
        match self.try_load(url).await {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(url, error = %err, "in-place navigation failed, reloading document");
                self.host.assign_location(url);
                false
            }
        }
    }

    async fn try_load(&self, url: &str) -> Result<(), NavError> {
        let html = self.fetcher.fetch_page(url).await?;
        let title = self.host.swap_shell(&html)?;
        self.reinitialize(&title);
        self.host.scroll_to_origin();
        tracing::info!(url, title = %title, "page swapped");
        Ok(())
    }

    pub fn reinitialize(&self, title: &str) {
        let context = PageContext::from_title(title);
        self.lifecycle.apply_theme();
        self.lifecycle.populate_index();
        self.lifecycle.bind_subscribe_form();
        self.lifecycle.rebuild_track_list(&context);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::{DomParser, Element, MouseEvent, SupportedType};

    use super::{ClickInfo, NavigationHost};
    use crate::components::dom::document;
    use crate::error::NavError;

    impl ClickInfo {
        /// `None` when the click did not land on or inside an anchor.
        pub fn from_mouse_event(event: &MouseEvent) -> Option<Self> {
            let target = event.target()?.dyn_into::<Element>().ok()?;
            let anchor = target.closest("a").ok()??;
            Some(Self {
                href: anchor.get_attribute("href"),
                button: event.button(),
                modified: event.ctrl_key() || event.meta_key() || event.shift_key() || event.alt_key(),
                target: anchor.get_attribute("target"),
                download: anchor.has_attribute("download"),
                default_prevented: event.default_prevented(),
            })
        }
    }

    /// Wrap every body child that precedes the bottom bar into the shell.
    /// Runs once per document; later calls find the shell and do nothing.
    pub fn ensure_shell(shell_id: &str, bottom_bar_id: &str) -> Result<Element, NavError> {
        let doc = document().ok_or(NavError::MissingBody)?;
        if let Some(shell) = doc.get_element_by_id(shell_id) {
            return Ok(shell);
        }
        let body = doc.body().ok_or(NavError::MissingBody)?;
        let shell = doc
            .create_element("div")
            .map_err(|_| NavError::MissingShell(shell_id.to_string()))?;
        shell.set_id(shell_id);

        let bottom_bar = doc.get_element_by_id(bottom_bar_id);
        let mut moved = 0usize;
        while let Some(child) = body.first_child() {
            if let Some(bar) = bottom_bar.as_ref() {
                if child.is_same_node(Some(bar.as_ref())) {
                    break;
                }
            }
            if shell.append_child(&child).is_err() {
                break;
            }
            moved += 1;
        }
        body.insert_before(&shell, body.first_child().as_ref())
            .map_err(|_| NavError::MissingShell(shell_id.to_string()))?;
        tracing::debug!(moved, "content shell created");
        Ok(shell)
    }

    pub struct WebNavigationHost {
        shell_id: String,
        bottom_bar_id: String,
    }

    impl WebNavigationHost {
        pub fn new(shell_id: impl Into<String>, bottom_bar_id: impl Into<String>) -> Self {
            Self {
                shell_id: shell_id.into(),
                bottom_bar_id: bottom_bar_id.into(),
            }
        }
    }

    impl NavigationHost for WebNavigationHost {
        fn resolve_url(&self, href: &str) -> Option<String> {
            let base = web_sys::window()?.location().href().ok()?;
            web_sys::Url::new_with_base(href, &base).ok().map(|url| url.href())
        }

        fn push_history(&self, url: &str) {
            let pushed = web_sys::window()
                .and_then(|w| w.history().ok())
                .map(|h| h.push_state_with_url(&JsValue::NULL, "", Some(url)));
            if !matches!(pushed, Some(Ok(()))) {
                tracing::warn!(url, "history push failed");
            }
        }

        fn current_location(&self) -> String {
            web_sys::window()
                .and_then(|w| w.location().href().ok())
                .unwrap_or_default()
        }

        fn assign_location(&self, url: &str) {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(url);
            }
        }

        fn swap_shell(&self, html: &str) -> Result<String, NavError> {
            let doc = document().ok_or(NavError::MissingBody)?;
            let parsed = DomParser::new()
                .and_then(|p| p.parse_from_string(html, SupportedType::TextHtml))
                .map_err(|_| NavError::MissingBody)?;
            let body = parsed.body().ok_or(NavError::MissingBody)?;
            let shell = doc
                .get_element_by_id(&self.shell_id)
                .ok_or_else(|| NavError::MissingShell(self.shell_id.clone()))?;

            let fragment = doc.create_document_fragment();
            let children = body.children();
            for idx in 0..children.length() {
                let Some(child) = children.item(idx) else {
                    continue;
                };
                if child.id() == self.bottom_bar_id || child.tag_name().eq_ignore_ascii_case("script") {
                    continue;
                }
                if let Ok(node) = doc.import_node_with_deep(&child, true) {
                    let _ = fragment.append_child(&node);
                }
            }

            shell.set_text_content(None);
            shell
                .append_child(&fragment)
                .map_err(|_| NavError::MissingShell(self.shell_id.clone()))?;

            let title = parsed.title();
            doc.set_title(&title);
            Ok(title)
        }

        fn scroll_to_origin(&self) {
            if let Some(window) = web_sys::window() {
                window.scroll_to_with_x_and_y(0.0, 0.0);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    use futures_util::future::LocalBoxFuture;
    use futures_util::FutureExt;

    use crate::components::audio_manager::test_support::{catalog, fixture, Fixture};
    use crate::components::audio_manager::PlaybackController;

    type Log = Rc<RefCell<Vec<String>>>;

    fn link(href: &str) -> ClickInfo {
        ClickInfo {
            href: Some(href.to_string()),
            ..ClickInfo::default()
        }
    }

    #[test]
    fn same_origin_links_are_intercepted() {
        for href in ["/music", "11.28.25.html", "./about.html", "/index.html?x=1"] {
            assert_eq!(classify_link(&link(href)), LinkAction::Navigate(href.to_string()));
        }
    }

    #[test]
    fn external_fragment_and_scheme_links_stay_native() {
        for href in [
            "#top",
            "https://example.com/",
            "http://example.com/",
            "mailto:hi@example.com",
            "tel:555",
            "//cdn.example.com/x",
            "",
        ] {
            assert_eq!(classify_link(&link(href)), LinkAction::Native, "{href}");
        }
        assert_eq!(classify_link(&ClickInfo::default()), LinkAction::Native);
    }

    #[test]
    fn colon_after_path_is_not_a_scheme() {
        assert_eq!(
            classify_link(&link("notes/a:b.html")),
            LinkAction::Navigate("notes/a:b.html".into())
        );
        assert_eq!(classify_link(&link("1x:y")), LinkAction::Navigate("1x:y".into()));
    }

    #[test]
    fn modified_or_targeted_clicks_stay_native() {
        let base = link("/music");
        let cases = [
            ClickInfo { modified: true, ..base.clone() },
            ClickInfo { button: 1, ..base.clone() },
            ClickInfo { target: Some("_blank".into()), ..base.clone() },
            ClickInfo { download: true, ..base.clone() },
            ClickInfo { default_prevented: true, ..base.clone() },
        ];
        for click in cases {
            assert_eq!(classify_link(&click), LinkAction::Native);
        }
        let same_frame = ClickInfo { target: Some("_self".into()), ..base };
        assert!(matches!(classify_link(&same_frame), LinkAction::Navigate(_)));
    }

    struct FakeHost {
        log: Log,
        location: RefCell<String>,
    }

    /// Path-only resolution, enough for the hrefs these tests click.
    fn resolve_path(base: &str, href: &str) -> String {
        if href.starts_with('/') {
            return href.to_string();
        }
        let mut segments: Vec<&str> = base.split('/').collect();
        segments.pop();
        for segment in href.split('/') {
            match segment {
                ".." => {
                    if segments.len() > 1 {
                        segments.pop();
                    }
                }
                "." => {}
                other => segments.push(other),
            }
        }
        segments.join("/")
    }

    impl NavigationHost for FakeHost {
        fn resolve_url(&self, href: &str) -> Option<String> {
            Some(resolve_path(&self.location.borrow(), href))
        }
        fn push_history(&self, url: &str) {
            self.log.borrow_mut().push(format!("push {url}"));
            *self.location.borrow_mut() = url.to_string();
        }
        fn current_location(&self) -> String {
            self.location.borrow().clone()
        }
        fn assign_location(&self, url: &str) {
            self.log.borrow_mut().push(format!("assign {url}"));
        }
        fn swap_shell(&self, html: &str) -> Result<String, NavError> {
            let start = html.find("<title>").ok_or(NavError::MissingBody)? + "<title>".len();
            let end = html.find("</title>").ok_or(NavError::MissingBody)?;
            let title = html[start..end].to_string();
            self.log.borrow_mut().push(format!("swap {title}"));
            Ok(title)
        }
        fn scroll_to_origin(&self) {
            self.log.borrow_mut().push("scroll".into());
        }
    }

    struct FakeFetcher {
        pages: HashMap<String, Result<String, NavError>>,
    }

    impl PageFetcher for FakeFetcher {
        fn fetch_page(&self, url: &str) -> LocalBoxFuture<'static, Result<String, NavError>> {
            let result = self
                .pages
                .get(url)
                .cloned()
                .unwrap_or(Err(NavError::Status(404)));
            async move { result }.boxed_local()
        }
    }

    struct FakeLifecycle {
        log: Log,
        controller: Option<Rc<RefCell<PlaybackController>>>,
    }

    impl PageLifecycle for FakeLifecycle {
        fn apply_theme(&self) {
            self.log.borrow_mut().push("theme".into());
        }
        fn populate_index(&self) {
            self.log.borrow_mut().push("index".into());
        }
        fn bind_subscribe_form(&self) {
            self.log.borrow_mut().push("subscribe".into());
        }
        fn rebuild_track_list(&self, context: &PageContext) {
            self.log.borrow_mut().push(format!("tracks {context:?}"));
            if let Some(controller) = &self.controller {
                controller
                    .borrow_mut()
                    .set_track_list(context.clone(), context.tracks(&catalog()));
            }
        }
    }

    fn page(title: &str) -> Result<String, NavError> {
        Ok(format!("<html><head><title>{title}</title></head><body></body></html>"))
    }

    fn build_router(
        pages: Vec<(&str, Result<String, NavError>)>,
        controller: Option<Rc<RefCell<PlaybackController>>>,
    ) -> (Router, Log) {
        build_router_at("/", pages, controller)
    }

    fn build_router_at(
        location: &str,
        pages: Vec<(&str, Result<String, NavError>)>,
        controller: Option<Rc<RefCell<PlaybackController>>>,
    ) -> (Router, Log) {
        let log: Log = Rc::default();
        let host = FakeHost {
            log: log.clone(),
            location: RefCell::new(location.into()),
        };
        let fetcher = FakeFetcher {
            pages: pages.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        };
        let lifecycle = FakeLifecycle {
            log: log.clone(),
            controller,
        };
        (Router::new(Rc::new(host), Rc::new(fetcher), Rc::new(lifecycle)), log)
    }

    #[test]
    fn navigate_pushes_once_then_swaps_and_reinitializes_in_order() {
        let (router, log) = build_router(vec![("/music", page("music"))], None);
        let url = router.intercept(&link("/music")).unwrap();
        router.navigate(url).now_or_never().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "push /music",
                "swap music",
                "theme",
                "index",
                "subscribe",
                "tracks AllTracks",
                "scroll",
            ]
        );
    }

    #[test]
    fn fetch_failure_falls_back_to_full_navigation() {
        let (router, log) = build_router(vec![("/gone.html", Err(NavError::Status(404)))], None);
        router.navigate("/gone.html".into()).now_or_never().unwrap();
        assert_eq!(*log.borrow(), vec!["push /gone.html", "assign /gone.html"]);

        let (router, log) = build_router(
            vec![("/down.html", Err(NavError::Network("offline".into())))],
            None,
        );
        assert_eq!(router.load_page("/down.html").now_or_never(), Some(false));
        assert_eq!(*log.borrow(), vec!["assign /down.html"]);
    }

    #[test]
    fn relative_href_resolves_against_the_clicked_page() {
        let (router, log) = build_router_at("/a/b/c.html", vec![("/a/x.html", page("music"))], None);
        let url = router.intercept(&link("../x.html")).unwrap();
        router.navigate(url).now_or_never().unwrap();
        let log = log.borrow();
        assert_eq!(log[0], "push /a/x.html");
        assert_eq!(log[1], "swap music");
    }

    #[test]
    fn fallback_uses_the_same_resolved_url() {
        let (router, log) = build_router_at("/a/b/c.html", vec![], None);
        router.navigate("../gone.html".into()).now_or_never().unwrap();
        assert_eq!(*log.borrow(), vec!["push /a/gone.html", "assign /a/gone.html"]);
    }

    #[test]
    fn unparseable_document_falls_back_without_reinit() {
        let (router, log) = build_router(vec![("/broken.html", Ok("no markup".into()))], None);
        router.load_page("/broken.html").now_or_never();
        assert_eq!(*log.borrow(), vec!["assign /broken.html"]);
    }

    #[test]
    fn pop_state_loads_current_location_without_pushing() {
        let (router, log) = build_router(vec![("/", page("burnfolder"))], None);
        router.handle_pop_state().now_or_never().unwrap();
        let log = log.borrow();
        assert!(!log.iter().any(|entry| entry.starts_with("push")));
        assert_eq!(log[0], "swap burnfolder");
    }

    #[test]
    fn dated_title_rebuilds_scoped_list() {
        let (router, log) = build_router(vec![("/11.28.25.html", page("11.28.25"))], None);
        router.load_page("/11.28.25.html").now_or_never();
        assert!(log
            .borrow()
            .contains(&"tracks Dated(\"11.28.25\")".to_string()));
    }

    #[test]
    fn navigating_to_dated_page_keeps_playback_running() {
        let Fixture {
            controller,
            sink,
            view,
            ..
        } = fixture("music");
        let controller = Rc::new(RefCell::new(controller));
        controller.borrow_mut().play_track(1);
        sink.set_time(42.0);

        let (router, _) = build_router(
            vec![("/11.28.25.html", page("11.28.25"))],
            Some(controller.clone()),
        );
        let url = router.intercept(&link("/11.28.25.html")).unwrap();
        router.navigate(url).now_or_never().unwrap();

        let controller = controller.borrow();
        assert_eq!(sink.bound().as_deref(), Some("F"));
        assert_eq!(sink.loads(), 1);
        assert_eq!(sink.time(), 42.0);
        assert!(!controller.is_paused());
        assert_eq!(controller.session().tracks().len(), 1);
        assert_eq!(controller.session().tracks()[0].playback_id, "X");
        assert_eq!(controller.active_index(), None);
        let model = view.last_model().unwrap();
        assert!(model.bar_visible);
        assert_eq!(model.title, "fire escape");
    }
}
