//! Bindings to the Lightweight Charts global and the pane surface built on them.

use js_sys::Function;
use serde::de::DeserializeOwned;
use serde::Serialize;
use ts_core::Timestamp;
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use crate::error::ChartError;
use crate::surface::{LogicalRange, PaneSurface, TimeRange};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = LightweightCharts, js_name = createChart, catch)]
    fn create_chart_raw(container: &HtmlElement, options: &JsValue) -> Result<IChartApi, JsValue>;

    #[derive(Debug, Clone)]
    pub type IChartApi;

    #[wasm_bindgen(method, js_name = addCandlestickSeries)]
    pub fn add_candlestick_series(this: &IChartApi, options: &JsValue) -> ISeriesApi;

    #[wasm_bindgen(method, js_name = addHistogramSeries)]
    pub fn add_histogram_series(this: &IChartApi, options: &JsValue) -> ISeriesApi;

    #[wasm_bindgen(method, js_name = addLineSeries)]
    pub fn add_line_series(this: &IChartApi, options: &JsValue) -> ISeriesApi;

    #[wasm_bindgen(method, js_name = timeScale)]
    pub fn time_scale(this: &IChartApi) -> ITimeScaleApi;

    #[wasm_bindgen(method, js_name = subscribeCrosshairMove)]
    pub fn subscribe_crosshair_move(this: &IChartApi, handler: &Function);

    #[wasm_bindgen(method, js_name = unsubscribeCrosshairMove)]
    pub fn unsubscribe_crosshair_move(this: &IChartApi, handler: &Function);

    #[wasm_bindgen(method, js_name = subscribeClick)]
    pub fn subscribe_click(this: &IChartApi, handler: &Function);

    #[wasm_bindgen(method, js_name = unsubscribeClick)]
    pub fn unsubscribe_click(this: &IChartApi, handler: &Function);

    #[wasm_bindgen(method, js_name = setCrosshairPosition)]
    pub fn set_crosshair_position(this: &IChartApi, price: f64, time: &JsValue, series: &ISeriesApi);

    #[wasm_bindgen(method, js_name = clearCrosshairPosition)]
    pub fn clear_crosshair_position(this: &IChartApi);

    #[wasm_bindgen(method, js_name = priceScale)]
    pub fn price_scale(this: &IChartApi, id: &str) -> IPriceScaleApi;

    #[wasm_bindgen(method)]
    pub fn resize(this: &IChartApi, width: f64, height: f64);

    #[wasm_bindgen(method)]
    pub fn remove(this: &IChartApi);

    #[derive(Debug, Clone)]
    pub type ISeriesApi;

    #[wasm_bindgen(method, js_name = setData)]
    pub fn set_data(this: &ISeriesApi, data: &JsValue);

    #[wasm_bindgen(method, js_name = setMarkers)]
    pub fn set_markers(this: &ISeriesApi, markers: &JsValue);

    #[wasm_bindgen(method, js_name = priceToCoordinate)]
    pub fn price_to_coordinate(this: &ISeriesApi, price: f64) -> JsValue;

    #[derive(Debug, Clone)]
    pub type IPriceScaleApi;

    #[wasm_bindgen(method, js_name = applyOptions)]
    pub fn apply_options(this: &IPriceScaleApi, options: &JsValue);

    #[derive(Debug, Clone)]
    pub type ITimeScaleApi;

    #[wasm_bindgen(method, js_name = getVisibleRange)]
    pub fn get_visible_range(this: &ITimeScaleApi) -> JsValue;

    #[wasm_bindgen(method, js_name = setVisibleRange, catch)]
    pub fn set_visible_range(this: &ITimeScaleApi, range: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = getVisibleLogicalRange)]
    pub fn get_visible_logical_range(this: &ITimeScaleApi) -> JsValue;

    #[wasm_bindgen(method, js_name = setVisibleLogicalRange, catch)]
    pub fn set_visible_logical_range(this: &ITimeScaleApi, range: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, js_name = subscribeVisibleTimeRangeChange)]
    pub fn subscribe_visible_time_range_change(this: &ITimeScaleApi, handler: &Function);

    #[wasm_bindgen(method, js_name = unsubscribeVisibleTimeRangeChange)]
    pub fn unsubscribe_visible_time_range_change(this: &ITimeScaleApi, handler: &Function);

    #[wasm_bindgen(method, js_name = fitContent)]
    pub fn fit_content(this: &ITimeScaleApi);
}

/// Serialize through JSON into a plain JS object.
pub fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ChartError> {
    let json = serde_json::to_string(value)?;
    Ok(js_sys::JSON::parse(&json)?)
}

/// Read a plain JS object back through JSON. `null`/`undefined` yield `None`.
pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> Option<T> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    let json = js_sys::JSON::stringify(value).ok()?.as_string()?;
    serde_json::from_str(&json).ok()
}

pub fn create_chart(container: &HtmlElement, options: &serde_json::Value) -> Result<IChartApi, ChartError> {
    Ok(create_chart_raw(container, &to_js(options)?)?)
}

/// Chart time carried by an event param; times are plain numbers here.
pub fn param_time(param: &JsValue) -> Option<Timestamp> {
    let time = js_sys::Reflect::get(param, &JsValue::from_str("time")).ok()?;
    time.as_f64().map(|t| t as Timestamp)
}

/// Cursor point carried by an event param.
pub fn param_point(param: &JsValue) -> Option<(f64, f64)> {
    let point = js_sys::Reflect::get(param, &JsValue::from_str("point")).ok()?;
    if point.is_undefined() || point.is_null() {
        return None;
    }
    let x = js_sys::Reflect::get(&point, &JsValue::from_str("x")).ok()?.as_f64()?;
    let y = js_sys::Reflect::get(&point, &JsValue::from_str("y")).ok()?.as_f64()?;
    Some((x, y))
}

/// One rendered pane as seen by the synchronizer.
#[derive(Debug, Clone)]
pub struct LwcPane {
    pub chart: IChartApi,
    /// Series the mirrored crosshair snaps to.
    pub anchor_series: ISeriesApi,
}

impl PaneSurface for LwcPane {
    fn visible_range(&self) -> Option<TimeRange> {
        from_js(&self.chart.time_scale().get_visible_range())
    }

    fn set_visible_range(&self, range: TimeRange) {
        let result = to_js(&range).and_then(|r| Ok(self.chart.time_scale().set_visible_range(&r)?));
        if let Err(err) = result {
            log::debug!("set_visible_range rejected: {err}");
        }
    }

    fn visible_logical_range(&self) -> Option<LogicalRange> {
        from_js(&self.chart.time_scale().get_visible_logical_range())
    }

    fn set_visible_logical_range(&self, range: LogicalRange) {
        let result = to_js(&range).and_then(|r| Ok(self.chart.time_scale().set_visible_logical_range(&r)?));
        if let Err(err) = result {
            log::debug!("set_visible_logical_range rejected: {err}");
        }
    }

    fn set_crosshair(&self, time: Timestamp, value: f64) {
        self.chart
            .set_crosshair_position(value, &JsValue::from_f64(time as f64), &self.anchor_series);
    }

    fn clear_crosshair(&self) {
        self.chart.clear_crosshair_position();
    }
}
