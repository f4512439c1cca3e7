//! Per-container render sessions: chart construction, event wiring and teardown.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde_json::json;
use ts_core::{TimeSeries, Trade};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Event, EventTarget, HtmlElement, KeyboardEvent, MouseEvent};

use crate::config::ChartConfig;
use crate::controls::{reset_target, FullscreenAction, ResetTarget};
use crate::dom::{self, Scaffold, DIVIDER_PX};
use crate::error::ChartError;
use crate::layout::{DividerDrag, PaneKind, PaneLayout};
use crate::loader;
use crate::lwc::{self, IChartApi, ISeriesApi, LwcPane};
use crate::markers::{build_markers, hit_test, place_tooltip, Point, TooltipContent, TooltipState};
use crate::navigation::{self, Navigator};
use crate::payload::{parse_render_input, ChartPayload, RenderFlags};
use crate::position::PositionInfo;
use crate::readout::{ReadoutIndex, ReadoutPublisher};
use crate::series::{chart_options, plan_panes, SeriesKind, SeriesRole};
use crate::surface::PaneSurface;
use crate::sync::{PaneSync, SyncedPane};

thread_local! {
    static SESSIONS: RefCell<HashMap<String, RenderSession>> = RefCell::new(HashMap::new());
}

/// One pane's library chart and the series plotted on it.
struct PaneInstance {
    kind: PaneKind,
    chart: IChartApi,
    element: HtmlElement,
    series: Vec<(SeriesRole, ISeriesApi)>,
}

impl PaneInstance {
    fn fit_to_element(&self) {
        let width = self.element.client_width().max(1) as f64;
        let height = self.element.client_height().max(1) as f64;
        self.chart.resize(width, height);
    }
}

/// DOM listener removed again when dropped.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn attach(target: &EventTarget, event: &'static str, handler: Box<dyn FnMut(Event)>) -> Result<Self, ChartError> {
        let callback = Closure::wrap(handler);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            event,
            callback,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
        {
            log::debug!("removing {} listener failed: {err:?}", self.event);
        }
    }
}

enum Subscription {
    Crosshair,
    Click,
    TimeRange,
}

/// Library event subscription; detached before its chart is removed.
struct ChartHandler {
    chart: IChartApi,
    kind: Subscription,
    callback: Closure<dyn FnMut(JsValue)>,
}

impl ChartHandler {
    fn attach(chart: &IChartApi, kind: Subscription, handler: Box<dyn FnMut(JsValue)>) -> Self {
        let callback = Closure::wrap(handler);
        let f = callback.as_ref().unchecked_ref();
        match kind {
            Subscription::Crosshair => chart.subscribe_crosshair_move(f),
            Subscription::Click => chart.subscribe_click(f),
            Subscription::TimeRange => chart.time_scale().subscribe_visible_time_range_change(f),
        }
        Self {
            chart: chart.clone(),
            kind,
            callback,
        }
    }

    fn detach(&self) {
        let f = self.callback.as_ref().unchecked_ref();
        match self.kind {
            Subscription::Crosshair => self.chart.unsubscribe_crosshair_move(f),
            Subscription::Click => self.chart.unsubscribe_click(f),
            Subscription::TimeRange => self.chart.time_scale().unsubscribe_visible_time_range_change(f),
        }
    }
}

/// Mutable state shared by the event handlers of one render.
struct Interaction {
    cfg: Rc<ChartConfig>,
    trades: Vec<Trade>,
    show_trades: bool,
    price_series: ISeriesApi,
    tooltip: HtmlElement,
    tooltip_state: TooltipState,
    readout: ReadoutIndex,
    publisher: ReadoutPublisher,
    navigator: Navigator,
    drag: DividerDrag,
    layout: PaneLayout,
    bar_interval: i64,
}

impl Interaction {
    fn trade_under(&self, time: Option<i64>, y: f64) -> Option<usize> {
        if !self.show_trades {
            return None;
        }
        let series = &self.price_series;
        hit_test(&self.trades, time?, y, self.cfg.hit_tolerance, |price| {
            series.price_to_coordinate(price).as_f64()
        })
    }

    /// Show trade `index` in the host's position panel.
    fn publish_position(&self, index: usize) {
        let Some(trade) = self.trades.get(index) else {
            return;
        };
        let info = PositionInfo::for_trade(index, trade, self.cfg.utc_offset());
        if let Err(err) = dom::publish_position(&self.cfg.position_info_element_id, &info.to_html(&self.cfg.theme)) {
            log::debug!("position panel update failed: {err}");
        }
    }

    fn render_tooltip(&self, container: &HtmlElement) {
        let (Some(index), Some(at)) = (self.tooltip_state.trade(), self.tooltip_state.position()) else {
            dom::hide(&self.tooltip);
            return;
        };
        let Some(trade) = self.trades.get(index) else {
            dom::hide(&self.tooltip);
            return;
        };
        let content = TooltipContent::for_trade(trade, self.cfg.utc_offset());
        self.tooltip.set_inner_html(&content.to_html(&self.cfg.theme));
        // Measure while shown so the flip uses the real size.
        if let Err(err) = dom::show_at(&self.tooltip, at.x, at.y) {
            log::debug!("tooltip show failed: {err}");
            return;
        }
        let size = (self.tooltip.offset_width() as f64, self.tooltip.offset_height() as f64);
        let bounds = (container.client_width() as f64, container.client_height() as f64);
        let placed = place_tooltip(at, size, bounds);
        if let Err(err) = dom::show_at(&self.tooltip, placed.x, placed.y) {
            log::debug!("tooltip placement failed: {err}");
        }
    }
}

pub struct RenderSession {
    container_id: String,
    panes: Vec<PaneInstance>,
    sync: Rc<PaneSync<LwcPane>>,
    interaction: Rc<RefCell<Interaction>>,
    handlers: Vec<ChartHandler>,
    listeners: Vec<Listener>,
}

impl RenderSession {
    fn price_index(&self) -> Option<usize> {
        self.sync.index_of(PaneKind::Price)
    }

    /// Step to the previous/next trade and centre the view on it.
    pub fn navigate(&self, direction: i32) -> u32 {
        self.focus_trade(|nav, len| nav.step(direction, len))
    }

    /// Select trade `number` (1-based, clamped) and centre the view on it.
    pub fn jump(&self, number: i32) -> u32 {
        self.focus_trade(|nav, len| nav.jump(number, len))
    }

    fn focus_trade(&self, pick: impl FnOnce(&mut Navigator, usize) -> Option<usize>) -> u32 {
        let (Some(price_idx), Some(price)) = (self.price_index(), self.sync.pane(PaneKind::Price)) else {
            return 0;
        };
        let Ok(mut state) = self.interaction.try_borrow_mut() else {
            return 0;
        };
        let len = state.trades.len();
        let Some(index) = pick(&mut state.navigator, len) else {
            return 0;
        };
        let trade_time = state.trades[index].time;
        let bars = navigation::window_bars(price.surface.visible_logical_range());
        let range = navigation::window_around(trade_time, state.bar_interval, bars);
        state.tooltip_state = TooltipState::Hidden;
        dom::hide(&state.tooltip);
        state.publish_position(index);
        drop(state);

        price.surface.set_visible_range(range);
        self.sync.force_sync(price_idx);
        log::debug!("focused trade {} of {len} in #{}", index + 1, self.container_id);
        (index + 1) as u32
    }

    fn teardown(&mut self) {
        for handler in &self.handlers {
            handler.detach();
        }
        for pane in &self.panes {
            pane.chart.remove();
        }
        self.handlers.clear();
        self.listeners.clear();
        self.panes.clear();
        log::debug!("render session for #{} torn down", self.container_id);
    }
}

impl Drop for RenderSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ---------- building ---------------------------------------------------------

fn payload_text(value: &JsValue) -> Option<String> {
    if value.is_null() || value.is_undefined() {
        return None;
    }
    if let Some(s) = value.as_string() {
        return Some(s);
    }
    js_sys::JSON::stringify(value).ok().and_then(|s| s.as_string())
}

fn build_session(
    container_id: &str,
    container: &HtmlElement,
    payload: ChartPayload,
    trades: Vec<Trade>,
    flags: RenderFlags,
    cfg: Rc<ChartConfig>,
) -> Result<Option<RenderSession>, ChartError> {
    let features = payload.features(flags, &trades);

    let (layout, plans) = match plan_panes(&payload, &features, &cfg) {
        Ok(planned) => planned,
        Err(ChartError::NoData) => {
            log::info!("no candlestick data for #{container_id}");
            dom::show_message(container, dom::NO_DATA_MESSAGE, &cfg.theme);
            return Ok(None);
        }
        Err(err) => return Err(err),
    };
    log::debug!(
        "rendering #{container_id}: {} candles, {} trades, layout {}",
        payload.candlestick.len(),
        trades.len(),
        layout.ratio_label()
    );

    let scaffold = dom::build_scaffold(container, &layout, &cfg)?;
    let tooltip = dom::recreate_tooltip(container, container_id, &cfg)?;
    let fullscreen = dom::add_fullscreen_button(container, &cfg.theme)?;

    let mut panes = Vec::with_capacity(plans.len());
    let mut synced = Vec::with_capacity(plans.len());
    for plan in &plans {
        let element = scaffold
            .pane(plan.kind)
            .cloned()
            .ok_or_else(|| ChartError::Js(format!("missing {} pane element", plan.kind.as_str())))?;
        let chart = lwc::create_chart(&element, &chart_options(plan, &cfg))?;
        let mut series = Vec::with_capacity(plan.series.len());
        for spec in &plan.series {
            let options = lwc::to_js(&spec.options)?;
            let handle = match spec.kind {
                SeriesKind::Candlestick => chart.add_candlestick_series(&options),
                SeriesKind::Histogram => chart.add_histogram_series(&options),
                SeriesKind::Line => chart.add_line_series(&options),
            };
            handle.set_data(&lwc::to_js(&spec.data)?);
            series.push((spec.role, handle));
        }
        dom::add_legend(&element, &plan.legend, &cfg.theme)?;
        let anchor_series = series
            .first()
            .map(|(_, s)| s.clone())
            .ok_or_else(|| ChartError::Js("pane without series".into()))?;
        let pane = PaneInstance {
            kind: plan.kind,
            chart: chart.clone(),
            element,
            series,
        };
        pane.fit_to_element();
        synced.push(SyncedPane::new(
            plan.kind,
            LwcPane {
                chart,
                anchor_series,
            },
            plan.anchor.clone(),
        ));
        panes.push(pane);
    }

    let price_series = panes
        .iter()
        .find(|p| p.kind == PaneKind::Price)
        .and_then(|p| p.series.first().map(|(_, s)| s.clone()))
        .ok_or_else(|| ChartError::Js("price pane missing".into()))?;
    if features.trades {
        price_series.set_markers(&lwc::to_js(&build_markers(&trades, &cfg.theme))?);
    }

    let bar_interval = TimeSeries::from_unsorted(payload.candlestick.clone())
        .median_spacing()
        .unwrap_or(60);
    let interaction = Rc::new(RefCell::new(Interaction {
        readout: ReadoutIndex::new(&payload, cfg.utc_offset()),
        publisher: ReadoutPublisher::default(),
        trades,
        show_trades: features.trades,
        price_series,
        tooltip,
        tooltip_state: TooltipState::Hidden,
        navigator: Navigator::default(),
        drag: DividerDrag::new(cfg.min_pane_px),
        layout,
        bar_interval,
        cfg: cfg.clone(),
    }));
    let sync = Rc::new(PaneSync::new(synced));

    let mut session = RenderSession {
        container_id: container_id.to_string(),
        panes,
        sync,
        interaction,
        handlers: Vec::new(),
        listeners: Vec::new(),
    };
    wire_sync(&mut session);
    wire_price_pane(&mut session, container)?;
    wire_divider(&mut session, container, &scaffold)?;
    wire_keyboard_and_resize(&mut session)?;
    wire_view_controls(&mut session, container, &fullscreen)?;

    if let Some(price) = session.panes.iter().find(|p| p.kind == PaneKind::Price) {
        price.chart.time_scale().fit_content();
    }
    if let Some(idx) = session.price_index() {
        session.sync.force_sync(idx);
    }
    Ok(Some(session))
}

fn wire_sync(session: &mut RenderSession) {
    for (idx, pane) in session.panes.iter().enumerate() {
        let sync = session.sync.clone();
        session.handlers.push(ChartHandler::attach(
            &pane.chart,
            Subscription::TimeRange,
            Box::new(move |range: JsValue| {
                if sync.is_replaying() {
                    return;
                }
                sync.on_range_change(idx, lwc::from_js(&range));
            }),
        ));

        let sync = session.sync.clone();
        session.handlers.push(ChartHandler::attach(
            &pane.chart,
            Subscription::Crosshair,
            Box::new(move |param: JsValue| {
                if sync.is_replaying() {
                    return;
                }
                let time = lwc::param_point(&param).and(lwc::param_time(&param));
                sync.on_crosshair(idx, time);
            }),
        ));
    }
}

fn wire_price_pane(session: &mut RenderSession, container: &HtmlElement) -> Result<(), ChartError> {
    let price = session
        .panes
        .iter()
        .find(|p| p.kind == PaneKind::Price)
        .ok_or_else(|| ChartError::Js("price pane missing".into()))?;

    let (sync, interaction, host) = (session.sync.clone(), session.interaction.clone(), container.clone());
    session.handlers.push(ChartHandler::attach(
        &price.chart,
        Subscription::Crosshair,
        Box::new(move |param: JsValue| {
            if sync.is_replaying() {
                return;
            }
            let Ok(mut guard) = interaction.try_borrow_mut() else {
                return;
            };
            let state = &mut *guard;
            let point = lwc::param_point(&param);
            let time = point.and(lwc::param_time(&param));

            if let Some(readout) = state.publisher.on_crosshair(&state.readout, time) {
                let published = readout
                    .to_json()
                    .and_then(|json| dom::publish_readout(&state.cfg.readout_element_id, &json));
                if let Err(err) = published {
                    log::warn!("readout publish failed: {err}");
                }
            }

            let (hit, at) = match point {
                Some((x, y)) => (state.trade_under(time, y), Point { x, y }),
                None => (None, Point { x: 0.0, y: 0.0 }),
            };
            let next = state.tooltip_state.on_hover(hit, at);
            if next != state.tooltip_state {
                let changed_trade = next.trade() != state.tooltip_state.trade();
                state.tooltip_state = next;
                state.render_tooltip(&host);
                match next.trade() {
                    Some(index) if changed_trade => state.publish_position(index),
                    _ => {}
                }
            }
        }),
    ));

    let (interaction, host) = (session.interaction.clone(), container.clone());
    session.handlers.push(ChartHandler::attach(
        &price.chart,
        Subscription::Click,
        Box::new(move |param: JsValue| {
            let Ok(mut state) = interaction.try_borrow_mut() else {
                return;
            };
            let Some((x, y)) = lwc::param_point(&param) else {
                return;
            };
            let hit = state.trade_under(lwc::param_time(&param), y);
            state.tooltip_state = state.tooltip_state.on_click(hit, Point { x, y });
            state.render_tooltip(&host);
            if let Some(index) = state.tooltip_state.trade() {
                state.publish_position(index);
            }
        }),
    ));
    Ok(())
}

fn wire_divider(session: &mut RenderSession, container: &HtmlElement, scaffold: &Scaffold) -> Result<(), ChartError> {
    let document: EventTarget = dom::document()?.into();
    let pane_elements: Vec<(PaneKind, HtmlElement)> = scaffold.panes.clone();

    let (interaction, host, elements) = (session.interaction.clone(), container.clone(), pane_elements.clone());
    let price_el = scaffold
        .pane(PaneKind::Price)
        .cloned()
        .ok_or_else(|| ChartError::Js("price pane missing".into()))?;
    let divider: EventTarget = scaffold.divider.clone().into();
    session.listeners.push(Listener::attach(
        &divider,
        "mousedown",
        Box::new(move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            event.prevent_default();
            let indicators: f64 = elements
                .iter()
                .filter(|(kind, _)| matches!(kind, PaneKind::Rsi | PaneKind::Macd))
                .map(|(_, el)| el.offset_height() as f64)
                .sum();
            let available = host.client_height() as f64 - DIVIDER_PX - indicators;
            if let Ok(mut state) = interaction.try_borrow_mut() {
                state
                    .drag
                    .begin(mouse.client_y() as f64, price_el.offset_height() as f64, available);
            }
        }),
    )?);

    let (interaction, layout_target) = (session.interaction.clone(), pane_elements.clone());
    let live_label = scaffold.ratio_label.clone();
    session.listeners.push(Listener::attach(
        &document,
        "mousemove",
        Box::new(move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let Ok(mut state) = interaction.try_borrow_mut() else {
                return;
            };
            let Some(update) = state.drag.update(mouse.client_y() as f64) else {
                return;
            };
            state.layout.set_price_fraction(update.price_fraction);
            live_label.set_text_content(Some(&state.layout.ratio_label()));
            for (kind, el) in &layout_target {
                if let Some(height) = state.layout.css_height(*kind) {
                    if let Err(err) = el.style().set_property("height", &height) {
                        log::debug!("pane resize failed: {err:?}");
                    }
                }
            }
        }),
    )?);

    let (interaction, sync) = (session.interaction.clone(), session.sync.clone());
    let charts: Vec<(IChartApi, HtmlElement)> = session
        .panes
        .iter()
        .map(|p| (p.chart.clone(), p.element.clone()))
        .collect();
    session.listeners.push(Listener::attach(
        &document,
        "mouseup",
        Box::new(move |_event: Event| {
            let Ok(mut state) = interaction.try_borrow_mut() else {
                return;
            };
            if !state.drag.end() {
                return;
            }
            drop(state);
            for (chart, el) in &charts {
                chart.resize(el.client_width().max(1) as f64, el.client_height().max(1) as f64);
            }
            if let Some(idx) = sync.index_of(PaneKind::Price) {
                sync.force_sync(idx);
            }
        }),
    )?);
    Ok(())
}

fn wire_keyboard_and_resize(session: &mut RenderSession) -> Result<(), ChartError> {
    let document: EventTarget = dom::document()?.into();
    let sync = session.sync.clone();
    session.listeners.push(Listener::attach(
        &document,
        "keydown",
        Box::new(move |event: Event| {
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let Some(bars) = navigation::key_shift(&key.key()) else {
                return;
            };
            let typing = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlElement>().ok())
                .map(|el| navigation::is_text_entry(&el.tag_name(), el.is_content_editable()))
                .unwrap_or(false);
            if typing {
                return;
            }
            let (Some(idx), Some(price)) = (sync.index_of(PaneKind::Price), sync.pane(PaneKind::Price)) else {
                return;
            };
            let Some(range) = price.surface.visible_logical_range() else {
                return;
            };
            event.prevent_default();
            price.surface.set_visible_logical_range(range.shifted(bars));
            sync.force_sync(idx);
        }),
    )?);

    let window: EventTarget = web_sys::window()
        .ok_or_else(|| ChartError::Js("no window".into()))?
        .into();
    let charts: Vec<(IChartApi, HtmlElement)> = session
        .panes
        .iter()
        .map(|p| (p.chart.clone(), p.element.clone()))
        .collect();
    session.listeners.push(Listener::attach(
        &window,
        "resize",
        Box::new(move |_event: Event| {
            for (chart, el) in &charts {
                chart.resize(el.client_width().max(1) as f64, el.client_height().max(1) as f64);
            }
        }),
    )?);
    Ok(())
}

fn wire_view_controls(session: &mut RenderSession, container: &HtmlElement, fullscreen: &HtmlElement) -> Result<(), ChartError> {
    for pane in &session.panes {
        let (sync, element, chart) = (session.sync.clone(), pane.element.clone(), pane.chart.clone());
        let target: EventTarget = pane.element.clone().into();
        session.listeners.push(Listener::attach(
            &target,
            "dblclick",
            Box::new(move |event: Event| {
                let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                match reset_target(dom::offset_x(&element, mouse.client_x())) {
                    ResetTarget::PriceScale => match lwc::to_js(&json!({ "autoScale": true })) {
                        Ok(options) => chart.price_scale("left").apply_options(&options),
                        Err(err) => log::debug!("price scale reset failed: {err}"),
                    },
                    ResetTarget::TimeScale => {
                        let (Some(idx), Some(price)) = (sync.index_of(PaneKind::Price), sync.pane(PaneKind::Price)) else {
                            return;
                        };
                        price.surface.chart.time_scale().fit_content();
                        sync.force_sync(idx);
                    }
                }
            }),
        )?);
    }

    let (host, button) = (container.clone(), fullscreen.clone());
    let target: EventTarget = fullscreen.clone().into();
    session.listeners.push(Listener::attach(
        &target,
        "click",
        Box::new(move |_event: Event| {
            let Ok(document) = dom::document() else {
                return;
            };
            let action = FullscreenAction::toggle(document.fullscreen_element().is_some());
            let result = match action {
                FullscreenAction::Enter => host.request_fullscreen(),
                FullscreenAction::Exit => {
                    document.exit_fullscreen();
                    Ok(())
                }
            };
            match result {
                Ok(()) => button.set_text_content(Some(action.label_after())),
                Err(err) => log::warn!("fullscreen request rejected: {err:?}"),
            }
        }),
    )?);
    Ok(())
}

// ---------- entry points -----------------------------------------------------

fn drop_session(container_id: &str) -> bool {
    // Remove first, drop after the registry borrow ends.
    let old = SESSIONS.with(|sessions| sessions.borrow_mut().remove(container_id));
    old.is_some()
}

/// Render (or re-render) the charts for `container_id`.
///
/// Missing or malformed chart data leaves the current view untouched.
pub fn render(chart_data: JsValue, trades_data: JsValue, flags: RenderFlags, container_id: String) {
    let cfg = Rc::new(ChartConfig::load());
    let Some(container) = dom::html_element_by_id(&container_id) else {
        log::debug!("container #{container_id} not found, skipping render");
        return;
    };
    let parsed = parse_render_input(
        payload_text(&chart_data).as_deref(),
        payload_text(&trades_data).as_deref(),
    );
    let (payload, trades) = match parsed {
        Ok(Some(parsed)) => parsed,
        Ok(None) => {
            log::debug!("no chart data for #{container_id}, keeping the current view");
            return;
        }
        Err(err) => {
            log::error!("chart payload for #{container_id} rejected: {err}");
            return;
        }
    };

    if !loader::library_present() {
        dom::show_message(&container, dom::LOADING_MESSAGE, &cfg.theme);
        let failed_id = container_id.clone();
        let theme = cfg.theme.clone();
        loader::ensure_library(
            &cfg,
            Box::new(move || render(chart_data, trades_data, flags, container_id)),
            Box::new(move || dom::show_message_in(&failed_id, dom::LOAD_FAILED_MESSAGE, &theme)),
        );
        return;
    }

    drop_session(&container_id);
    match build_session(&container_id, &container, payload, trades, flags, cfg) {
        Ok(Some(session)) => {
            SESSIONS.with(|sessions| sessions.borrow_mut().insert(container_id, session));
        }
        Ok(None) => {}
        Err(err) => log::error!("render of #{container_id} failed: {err}"),
    }
}

pub fn navigate(container_id: &str, direction: i32) -> Result<u32, ChartError> {
    SESSIONS.with(|sessions| {
        let sessions = sessions.borrow();
        let session = sessions
            .get(container_id)
            .ok_or_else(|| ChartError::NoSession(container_id.to_string()))?;
        Ok(session.navigate(direction))
    })
}

pub fn jump(container_id: &str, number: i32) -> Result<u32, ChartError> {
    SESSIONS.with(|sessions| {
        let sessions = sessions.borrow();
        let session = sessions
            .get(container_id)
            .ok_or_else(|| ChartError::NoSession(container_id.to_string()))?;
        Ok(session.jump(number))
    })
}

pub fn destroy(container_id: &str) -> bool {
    let existed = drop_session(container_id);
    if let Some(container) = dom::html_element_by_id(container_id) {
        dom::clear(&container);
    }
    existed
}
