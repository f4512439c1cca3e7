//! DOM helpers: containers, status messages, pane scaffolding, tooltip and readout.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::config::{ChartConfig, Theme};
use crate::controls;
use crate::error::ChartError;
use crate::layout::{PaneKind, PaneLayout};
use crate::series::LegendItem;

pub const NO_DATA_MESSAGE: &str = "No data available";
pub const LOADING_MESSAGE: &str = "Loading chart library…";
pub const LOAD_FAILED_MESSAGE: &str = "Chart library failed to load, refresh the page to retry";

pub const DIVIDER_PX: f64 = 10.0;

pub fn document() -> Result<Document, ChartError> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| ChartError::Js("no document".into()))
}

pub fn html_element_by_id(id: &str) -> Option<HtmlElement> {
    document()
        .ok()?
        .get_element_by_id(id)?
        .dyn_into::<HtmlElement>()
        .ok()
}

fn create_div(document: &Document, class: &str, style: &str) -> Result<HtmlElement, ChartError> {
    let el: HtmlElement = document
        .create_element("div")?
        .dyn_into()
        .map_err(|_| ChartError::Js("div is not an HtmlElement".into()))?;
    el.set_class_name(class);
    el.set_attribute("style", style)?;
    Ok(el)
}

pub fn clear(container: &Element) {
    container.set_inner_html("");
}

/// Replace the container's contents with a centred status line.
pub fn show_message(container: &Element, message: &str, theme: &Theme) {
    container.set_inner_html(&format!(
        "<div class=\"trade-chart-message\" style=\"display:flex;align-items:center;justify-content:center;\
         height:100%;color:{};font-size:14px\">{}</div>",
        theme.text, message
    ));
}

pub fn show_message_in(container_id: &str, message: &str, theme: &Theme) {
    match html_element_by_id(container_id) {
        Some(container) => show_message(&container, message, theme),
        None => log::debug!("container #{container_id} vanished before status update"),
    }
}

/// DOM scaffolding for one render.
pub struct Scaffold {
    pub panes: Vec<(PaneKind, HtmlElement)>,
    pub divider: HtmlElement,
    pub ratio_label: HtmlElement,
}

impl Scaffold {
    pub fn pane(&self, kind: PaneKind) -> Option<&HtmlElement> {
        self.panes.iter().find(|(k, _)| *k == kind).map(|(_, el)| el)
    }
}

/// Build the stacked pane divs, the price/volume divider and the ratio label.
pub fn build_scaffold(container: &HtmlElement, layout: &PaneLayout, cfg: &ChartConfig) -> Result<Scaffold, ChartError> {
    let document = document()?;
    clear(container);
    container.style().set_property("position", "relative")?;

    let mut panes = Vec::with_capacity(layout.len());
    let mut divider = None;
    for kind in layout.kinds() {
        let height = layout.css_height(kind).unwrap_or_else(|| "0px".into());
        let pane = create_div(
            &document,
            &format!("trade-chart-pane trade-chart-{}", kind.as_str()),
            &format!("position:relative;width:100%;height:{height}"),
        )?;
        container.append_child(&pane)?;
        if kind == PaneKind::Price {
            let bar = create_div(
                &document,
                "trade-chart-divider",
                &format!(
                    "width:100%;height:{DIVIDER_PX}px;cursor:row-resize;background:{};opacity:0.6",
                    cfg.theme.grid
                ),
            )?;
            container.append_child(&bar)?;
            divider = Some(bar);
        }
        panes.push((kind, pane));
    }
    let divider = divider.ok_or_else(|| ChartError::Js("layout has no price pane".into()))?;

    let ratio_label = create_div(
        &document,
        "trade-chart-ratio",
        &format!(
            "position:absolute;right:8px;top:4px;font-size:11px;color:{};z-index:5;pointer-events:none",
            cfg.theme.text
        ),
    )?;
    ratio_label.set_text_content(Some(&layout.ratio_label()));
    container.append_child(&ratio_label)?;

    Ok(Scaffold {
        panes,
        divider,
        ratio_label,
    })
}

pub fn add_legend(pane: &HtmlElement, items: &[LegendItem], theme: &Theme) -> Result<(), ChartError> {
    if items.is_empty() {
        return Ok(());
    }
    let document = document()?;
    let legend = create_div(
        &document,
        "trade-chart-legend",
        &format!(
            "position:absolute;left:60px;top:4px;z-index:4;font-size:11px;color:{};pointer-events:none",
            theme.text
        ),
    )?;
    let html: String = items
        .iter()
        .map(|item| {
            format!(
                "<span style=\"margin-right:10px\"><span style=\"display:inline-block;width:10px;height:2px;\
                 vertical-align:middle;margin-right:4px;background:{}\"></span>{}</span>",
                item.color, item.label
            )
        })
        .collect();
    legend.set_inner_html(&html);
    pane.append_child(&legend)?;
    Ok(())
}

/// Create a fresh, hidden tooltip inside `container`.
///
/// Nodes of other live containers are left alone: when the configured id is
/// taken elsewhere this container gets a suffixed id instead.
pub fn recreate_tooltip(container: &HtmlElement, container_id: &str, cfg: &ChartConfig) -> Result<HtmlElement, ChartError> {
    let document = document()?;
    let owned_elsewhere = document
        .get_element_by_id(&cfg.tooltip_element_id)
        .map(|node| !container.contains(Some(&*node)))
        .unwrap_or(false);
    let id = cfg.tooltip_id_for(container_id, owned_elsewhere);
    if let Some(stale) = document.get_element_by_id(&id) {
        if container.contains(Some(&*stale)) || owned_elsewhere {
            stale.remove();
        }
    }
    let tooltip = create_div(
        &document,
        "trade-chart-tooltip",
        "position:absolute;display:none;background-color:rgba(0,0,0,0.8);color:white;padding:8px;\
         border-radius:4px;font-size:12px;z-index:1000;pointer-events:none;box-shadow:0 2px 5px rgba(0,0,0,0.3)",
    )?;
    tooltip.set_id(&id);
    container.append_child(&tooltip)?;
    Ok(tooltip)
}

/// Corner button that toggles fullscreen for the chart container.
pub fn add_fullscreen_button(container: &HtmlElement, theme: &Theme) -> Result<HtmlElement, ChartError> {
    let document = document()?;
    let button = create_div(
        &document,
        "trade-chart-fullscreen",
        &format!(
            "position:absolute;right:8px;bottom:36px;width:28px;height:28px;display:flex;align-items:center;\
             justify-content:center;background-color:rgba(33,56,77,0.6);color:{};border-radius:4px;\
             cursor:pointer;z-index:10",
            theme.text
        ),
    )?;
    button.set_title("Toggle fullscreen");
    button.set_text_content(Some(controls::FULLSCREEN_ENTER_LABEL));
    container.append_child(&button)?;
    Ok(button)
}

/// Horizontal click position relative to `element`'s left edge.
pub fn offset_x(element: &HtmlElement, client_x: i32) -> f64 {
    client_x as f64 - element.get_bounding_client_rect().left()
}

pub fn hide(el: &HtmlElement) {
    if let Err(err) = el.style().set_property("display", "none") {
        log::debug!("hide failed: {err:?}");
    }
}

pub fn show_at(el: &HtmlElement, left: f64, top: f64) -> Result<(), ChartError> {
    let style = el.style();
    style.set_property("left", &format!("{left}px"))?;
    style.set_property("top", &format!("{top}px"))?;
    style.set_property("display", "block")?;
    Ok(())
}

/// Write the readout JSON into the host node and notify the host.
pub fn publish_readout(element_id: &str, json: &str) -> Result<(), ChartError> {
    let Some(node) = document()?.get_element_by_id(element_id) else {
        return Ok(());
    };
    node.set_text_content(Some(json));
    let event = web_sys::Event::new("change")?;
    node.dispatch_event(&event)?;
    Ok(())
}

/// Replace the host's position panel, if the page has one.
pub fn publish_position(element_id: &str, html: &str) -> Result<(), ChartError> {
    if let Some(node) = document()?.get_element_by_id(element_id) {
        node.set_inner_html(html);
    }
    Ok(())
}
