//! Lazy loading of the charting library from a list of script sources.

/// Global the library installs itself under.
pub const LIBRARY_GLOBAL: &str = "LightweightCharts";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading {
        source: usize,
    },
    Loaded,
    Failed,
}

/// Next thing the caller has to do.
#[derive(Debug, PartialEq)]
pub enum LoadStep<T> {
    /// Inject a script tag for this URL.
    Inject(String),
    /// Wait for the in-flight script; the request was queued.
    Wait,
    /// Library is ready, run the queued render.
    Retry(T),
    /// Every source failed.
    Failed(Option<T>),
}

/// Tracks which source is being tried and the render waiting on it.
/// Only the most recent pending render is kept.
#[derive(Debug)]
pub struct ScriptLoader<T> {
    sources: Vec<String>,
    state: LoadState,
    pending: Option<T>,
}

impl<T> ScriptLoader<T> {
    pub fn new(sources: Vec<String>) -> Self {
        Self {
            sources,
            state: LoadState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn set_sources(&mut self, sources: Vec<String>) {
        if !matches!(self.state, LoadState::Loading { .. }) {
            self.sources = sources;
        }
    }

    /// A render found the library missing.
    ///
    /// After a successful load the library can only be missing if the script
    /// did not install it, so the request fails instead of scheduling a retry.
    pub fn request(&mut self, retry: T) -> LoadStep<T> {
        self.pending = Some(retry);
        match self.state {
            LoadState::Loading { .. } => LoadStep::Wait,
            LoadState::Loaded => LoadStep::Failed(self.pending.take()),
            LoadState::Idle | LoadState::Failed => self.start(0),
        }
    }

    fn start(&mut self, source: usize) -> LoadStep<T> {
        match self.sources.get(source) {
            Some(url) => {
                self.state = LoadState::Loading { source };
                LoadStep::Inject(url.clone())
            }
            None => {
                self.state = LoadState::Failed;
                LoadStep::Failed(self.pending.take())
            }
        }
    }

    /// The script finished loading. `present` tells whether it installed the
    /// library global; if not, the next source is tried.
    pub fn on_loaded(&mut self, present: bool) -> LoadStep<T> {
        if !present {
            return self.on_error();
        }
        self.state = LoadState::Loaded;
        match self.pending.take() {
            Some(retry) => LoadStep::Retry(retry),
            None => LoadStep::Wait,
        }
    }

    /// The current source failed; move on to the next one.
    pub fn on_error(&mut self) -> LoadStep<T> {
        let next = match self.state {
            LoadState::Loading { source } => source + 1,
            _ => return LoadStep::Wait,
        };
        self.start(next)
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo_timers::future::TimeoutFuture;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_futures::spawn_local;

    use super::*;
    use crate::config::ChartConfig;
    use crate::error::ChartError;

    type Retry = Box<dyn FnOnce()>;
    type SharedFailure = Rc<RefCell<Option<Retry>>>;

    thread_local! {
        static LOADER: RefCell<ScriptLoader<Retry>> = RefCell::new(ScriptLoader::new(Vec::new()));
    }

    /// True when the library global exposes `createChart`.
    pub fn library_present() -> bool {
        js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str(LIBRARY_GLOBAL))
            .ok()
            .filter(|lib| !lib.is_undefined() && !lib.is_null())
            .and_then(|lib| js_sys::Reflect::get(&lib, &JsValue::from_str("createChart")).ok())
            .map(|f| f.is_function())
            .unwrap_or(false)
    }

    /// Load the library, then run `retry` after the configured delay.
    /// `on_failed` runs once every source has failed.
    pub fn ensure_library(cfg: &ChartConfig, retry: Retry, on_failed: Retry) {
        let delay = cfg.retry_delay_ms;
        let step = LOADER.with(|loader| {
            let mut loader = loader.borrow_mut();
            loader.set_sources(cfg.library_urls.clone());
            loader.request(retry)
        });
        drive(step, delay, Rc::new(RefCell::new(Some(on_failed))));
    }

    fn drive(step: LoadStep<Retry>, delay: u32, on_failed: SharedFailure) {
        match step {
            LoadStep::Inject(url) => {
                if let Err(err) = inject(&url, delay, on_failed) {
                    log::error!("could not inject {url}: {err}");
                }
            }
            LoadStep::Wait => {}
            LoadStep::Retry(retry) => {
                spawn_local(async move {
                    TimeoutFuture::new(delay).await;
                    retry();
                });
            }
            LoadStep::Failed(_) => {
                log::error!("{}", ChartError::LibraryLoadFailed);
                let callback = on_failed.borrow_mut().take();
                if let Some(callback) = callback {
                    callback();
                }
            }
        }
    }

    fn inject(url: &str, delay: u32, on_failed: SharedFailure) -> Result<(), ChartError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| ChartError::Js("no document".into()))?;
        let script: web_sys::HtmlScriptElement = document
            .create_element("script")?
            .dyn_into()
            .map_err(|_| ChartError::Js("script element has the wrong type".into()))?;
        script.set_src(url);
        script.set_async(true);
        log::info!("loading chart library from {url}");

        let load_failure = on_failed.clone();
        let loaded_url = url.to_string();
        let onload = Closure::once_into_js(move || {
            let present = library_present();
            if present {
                log::info!("chart library loaded");
            } else {
                log::warn!("{loaded_url} loaded without installing {LIBRARY_GLOBAL}");
            }
            let step = LOADER.with(|l| l.borrow_mut().on_loaded(present));
            drive(step, delay, load_failure);
        });
        let failed_url = url.to_string();
        let onerror = Closure::once_into_js(move || {
            log::warn!("chart library failed to load from {failed_url}");
            let step = LOADER.with(|l| l.borrow_mut().on_error());
            drive(step, delay, on_failed);
        });
        script.set_onload(Some(onload.unchecked_ref()));
        script.set_onerror(Some(onerror.unchecked_ref()));

        let head = document
            .head()
            .ok_or_else(|| ChartError::Js("document has no head".into()))?;
        head.append_child(&script)?;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{ensure_library, library_present};

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> ScriptLoader<&'static str> {
        ScriptLoader::new(vec!["primary".into(), "backup".into()])
    }

    #[test]
    fn loads_from_primary_and_runs_latest_request() {
        let mut l = loader();
        assert_eq!(l.request("first"), LoadStep::Inject("primary".into()));
        assert_eq!(l.request("second"), LoadStep::Wait);
        assert_eq!(l.on_loaded(true), LoadStep::Retry("second"));
        assert_eq!(l.state(), LoadState::Loaded);
    }

    #[test]
    fn missing_global_after_load_fails_without_rescheduling() {
        let mut l = loader();
        l.request("render");
        assert_eq!(l.on_loaded(true), LoadStep::Retry("render"));
        let retries = (0..1000)
            .filter(|_| matches!(l.request("render"), LoadStep::Retry(_)))
            .count();
        assert_eq!(retries, 0);
        assert_eq!(l.request("again"), LoadStep::Failed(Some("again")));
    }

    #[test]
    fn script_without_global_moves_to_backup() {
        let mut l = loader();
        l.request("render");
        assert_eq!(l.on_loaded(false), LoadStep::Inject("backup".into()));
        assert_eq!(l.on_loaded(false), LoadStep::Failed(Some("render")));
        assert_eq!(l.state(), LoadState::Failed);
    }

    #[test]
    fn falls_back_to_backup_then_fails() {
        let mut l = loader();
        assert_eq!(l.request("render"), LoadStep::Inject("primary".into()));
        assert_eq!(l.on_error(), LoadStep::Inject("backup".into()));
        assert_eq!(l.state(), LoadState::Loading { source: 1 });
        assert_eq!(l.on_error(), LoadStep::Failed(Some("render")));
        assert_eq!(l.state(), LoadState::Failed);
        assert_eq!(l.on_error(), LoadStep::Wait);
        assert_eq!(l.request("again"), LoadStep::Inject("primary".into()));
    }

    #[test]
    fn no_sources_fails_immediately() {
        let mut l: ScriptLoader<u8> = ScriptLoader::new(Vec::new());
        assert_eq!(l.request(7), LoadStep::Failed(Some(7)));
    }
}
