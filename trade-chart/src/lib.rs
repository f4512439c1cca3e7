//! Multi-pane trade review charts for a web dashboard.
//!
//! Pure modules (payload, layout, series, sync, markers, readout, navigation, controls)
//! are target independent; the browser glue only builds for `wasm32`.

pub mod config;
pub mod controls;
pub mod error;
pub mod layout;
pub mod loader;
pub mod markers;
pub mod navigation;
pub mod payload;
pub mod position;
pub mod readout;
pub mod series;
pub mod surface;
pub mod sync;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod lwc;
#[cfg(target_arch = "wasm32")]
mod session;

pub use config::ChartConfig;
pub use error::ChartError;
pub use payload::{ChartPayload, RenderFlags};

#[cfg(target_arch = "wasm32")]
mod bindings {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;

    use crate::config::ChartConfig;
    use crate::error::ChartError;
    use crate::payload::RenderFlags;
    use crate::session;

    const HOST_GLOBAL: &str = "dash_clientside";

    #[wasm_bindgen(start)]
    pub fn start() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            log::debug!("logger already installed");
        }
        let namespace = ChartConfig::load().host_namespace;
        match register_host_callback(&namespace) {
            Ok(()) => log::info!("initializeChart registered under {HOST_GLOBAL}.{namespace}"),
            Err(err) => log::warn!("host registration skipped: {err}"),
        }
    }

    /// Get or create `parent[key]` as a plain object.
    fn child_object(parent: &JsValue, key: &str) -> Result<JsValue, ChartError> {
        let key = JsValue::from_str(key);
        let existing = Reflect::get(parent, &key)?;
        if existing.is_object() {
            return Ok(existing);
        }
        let created: JsValue = Object::new().into();
        Reflect::set(parent, &key, &created)?;
        Ok(created)
    }

    /// Install `initializeChart` where the host framework looks up clientside callbacks.
    fn register_host_callback(namespace: &str) -> Result<(), ChartError> {
        let global: JsValue = js_sys::global().into();
        let host = child_object(&global, HOST_GLOBAL)?;
        let target = child_object(&host, namespace)?;
        let callback = Closure::<
            dyn FnMut(JsValue, JsValue, JsValue, JsValue, JsValue, JsValue, JsValue, JsValue) -> JsValue,
        >::wrap(Box::new(host_initialize));
        Reflect::set(&target, &JsValue::from_str("initializeChart"), callback.as_ref())?;
        callback.forget();
        Ok(())
    }

    /// Host-facing variant: the flags arrive as arbitrary JS values.
    #[allow(clippy::too_many_arguments)]
    fn host_initialize(
        chart_data: JsValue,
        trades_data: JsValue,
        show_ema: JsValue,
        show_trades: JsValue,
        show_bollinger: JsValue,
        show_rsi: JsValue,
        show_macd: JsValue,
        container_id: JsValue,
    ) -> JsValue {
        let flags = RenderFlags {
            show_ema: show_ema.is_truthy(),
            show_trades: show_trades.is_truthy(),
            show_bollinger: show_bollinger.is_truthy(),
            show_rsi: show_rsi.is_truthy(),
            show_macd: show_macd.is_truthy(),
        };
        match container_id.as_string() {
            Some(id) => session::render(chart_data, trades_data, flags, id),
            None => log::debug!("initializeChart called without a container id"),
        }
        JsValue::NULL
    }

    /// Render the charts into `container_id`. Always returns `null`.
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen(js_name = initializeChart)]
    pub fn initialize_chart(
        chart_data: JsValue,
        trades_data: JsValue,
        show_ema: bool,
        show_trades: bool,
        show_bollinger: bool,
        show_rsi: bool,
        show_macd: bool,
        container_id: String,
    ) -> JsValue {
        let flags = RenderFlags {
            show_ema,
            show_trades,
            show_bollinger,
            show_rsi,
            show_macd,
        };
        session::render(chart_data, trades_data, flags, container_id);
        JsValue::NULL
    }

    /// Select the previous (`-1`) or next (`1`) trade. Returns its 1-based index, 0 if nothing moved.
    #[wasm_bindgen(js_name = navigateToTrade)]
    pub fn navigate_to_trade(container_id: &str, direction: i32) -> u32 {
        session::navigate(container_id, direction).unwrap_or_else(|err| {
            log::debug!("{err}");
            0
        })
    }

    /// Select trade `number` (1-based, clamped to the list). Returns its index, 0 if nothing moved.
    #[wasm_bindgen(js_name = navigateToTradeIndex)]
    pub fn navigate_to_trade_index(container_id: &str, number: i32) -> u32 {
        session::jump(container_id, number).unwrap_or_else(|err| {
            log::debug!("{err}");
            0
        })
    }

    #[wasm_bindgen(js_name = destroyChart)]
    pub fn destroy_chart(container_id: &str) -> bool {
        session::destroy(container_id)
    }
}
