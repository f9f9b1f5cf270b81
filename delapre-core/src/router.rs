//! Hash-fragment router
//!
//! Maps normalized paths to handlers and invokes exactly one handler per
//! navigation. Handlers receive the injected context `C` and never the router,
//! so a handler cannot start another navigation synchronously: redirects are
//! written to the [`History`] and come back later as location-change events.

use crate::History;
use crate::route::{href, normalize_path, path_from_fragment};
use std::collections::HashMap;
use std::rc::Rc;

pub type Handler<C> = Box<dyn FnMut(&mut C)>;
pub type RouteObserver = Box<dyn FnMut(&str)>;

pub struct Router<C, H: History> {
    history: Rc<H>,
    routes: HashMap<String, Handler<C>>,
    current: Option<String>,
    observers: Vec<RouteObserver>,
}

impl<C, H: History> Router<C, H> {
    pub fn new(history: Rc<H>) -> Self {
        Self {
            history,
            routes: HashMap::new(),
            current: None,
            observers: Vec::new(),
        }
    }

    /// Register a handler for `path`, silently replacing any previous one.
    pub fn register(&mut self, path: &str, handler: impl FnMut(&mut C) + 'static) {
        self.routes.insert(normalize_path(path), Box::new(handler));
    }

    /// Perform the initial navigation. Call after every `register`.
    pub fn start(&mut self, ctx: &mut C) {
        self.navigate(ctx);
    }

    /// Point the location at `path`. With `replace` no history entry is created.
    pub fn navigate_to(&self, path: &str, replace: bool) {
        navigate_to(self.history.as_ref(), path, replace);
    }

    /// Resolve the current location and run its handler.
    ///
    /// Invoked for the initial navigation and for every fragment-change or
    /// history-pop event.
    pub fn navigate(&mut self, ctx: &mut C) {
        let path = path_from_fragment(&self.history.fragment());
        if let Some(handler) = self.routes.get_mut(&path) {
            log::debug!("route matched: {path}");
            self.current = Some(path.clone());
            handler(ctx);
            for observer in &mut self.observers {
                observer(&path);
            }
            self.history.scroll_to_top();
        } else if path != "/" {
            log::debug!("no route for {path}, redirecting to root");
            self.navigate_to("/", true);
        }
    }

    /// Observe successful navigations. Observers run in registration order,
    /// after the route handler.
    pub fn on_route_change(&mut self, callback: impl FnMut(&str) + 'static) {
        self.observers.push(Box::new(callback));
    }

    #[must_use]
    pub fn href(&self, path: &str) -> String {
        href(path)
    }

    #[must_use]
    pub fn is_active(&self, path: &str) -> bool {
        self.current
            .as_deref()
            .is_some_and(|current| current == normalize_path(path))
    }

    #[must_use]
    pub fn current_route(&self) -> Option<&str> {
        self.current.as_deref()
    }

    #[must_use]
    pub fn history(&self) -> &Rc<H> {
        &self.history
    }
}

/// Shared by the router and by page guards, which only hold the history handle.
pub fn navigate_to<H: History + ?Sized>(history: &H, path: &str, replace: bool) {
    let target = href(path);
    if replace {
        history.replace(&target);
    } else {
        history.push(&target);
    }
}
