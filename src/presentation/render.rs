// HTML rendering - list pages, detail page and chart panels
use crate::application::chart_view::{ChartState, EMPTY_WINDOW_MESSAGE};
use crate::application::detail_view::{AnalysisTab, ChartPanel, DetailView, TimeRange};
use crate::application::list_view::{DeviceRow, EquipmentRow, ListState};
use crate::domain::chart::{ChartProjection, Channel};
use crate::domain::page::PageInfo;
use crate::domain::status::{StatusDisplay, StatusTier};

const PLOTLY_CDN: &str = "https://cdn.jsdelivr.net/npm/plotly.js-dist-min@2.35.2/plotly.min.js";

const PLOT_SCRIPT: &str = r#"
function drawProjection(id, p) {
    var traces = [];
    var layout = { margin: { t: 30 }, xaxis: { title: 'Phase (deg)' }, showlegend: false };
    if (p.kind === 'phase_pattern') {
        traces.push({ x: p.reference_phases, y: p.reference_wave, mode: 'lines', line: { color: '#888' } });
        var marker = { color: p.intensities, colorscale: 'Jet', showscale: true, size: 5 };
        if (p.intensity_range) {
            marker.cmin = p.intensity_range[0];
            marker.cmax = p.intensity_range[1];
        }
        traces.push({ x: p.phases, y: p.amplitudes, mode: 'markers', type: 'scatter', marker: marker });
        layout.yaxis = { title: 'Amplitude (dBmV)' };
    } else if (p.kind === 'phase_sequence') {
        p.slices.forEach(function (s) {
            traces.push({ x: p.phase_axis, y: [s.step], z: [s.row], type: 'heatmap', colorscale: 'Jet', showscale: false });
        });
        layout.yaxis = { title: 'Cycle' };
    } else if (p.kind === 'signal_trace') {
        traces.push({ x: p.indices, y: p.peaks, mode: 'lines' });
        layout.xaxis = { title: 'Signal index' };
        layout.yaxis = { title: 'Peak (dBmV)' };
    }
    Plotly.newPlot(id, traces, layout, { responsive: true });
}
"#;

const HELP_TEXT: &str = "The selected sensor reported nothing in this window. \
Pick another date or time range, switch to a different sensor, or try another channel.";

pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
</head>
<body style="font-family: system-ui, sans-serif; max-width: 1200px; margin: 0 auto; padding: 1rem;">
    <nav style="margin-bottom: 1rem;">
        <a href="/" style="margin-right: 1rem;">Equipment</a>
        <a href="/devices">Sensors</a>
    </nav>
    {body}
</body>
</html>"#,
        title = escape_html(title),
        body = body
    )
}

fn badge(label: &str, tier: StatusTier) -> String {
    let (color, bg) = tier.colors();
    format!(
        r#"<span style="display: inline-block; padding: 0.25em 0.6em; border-radius: 0.25rem; font-size: 0.85em; font-weight: 600; color: {}; background-color: {};">{}</span>"#,
        color,
        bg,
        escape_html(label)
    )
}

fn cell(content: &str) -> String {
    format!(r#"<td style="padding: 0.5rem;">{}</td>"#, content)
}

fn table(headers: &[&str], rows: &str) -> String {
    let head: String = headers
        .iter()
        .map(|h| format!(r#"<th style="padding: 0.5rem; text-align: left;">{}</th>"#, h))
        .collect();
    format!(
        r#"<table style="width: 100%; border-collapse: collapse;">
        <thead><tr style="border-bottom: 2px solid #dee2e6;">{}</tr></thead>
        <tbody>{}</tbody>
    </table>"#,
        head, rows
    )
}

fn pagination(base: &str, info: &PageInfo) -> String {
    let previous = if info.has_previous() {
        format!(r#"<a href="{}?page={}">Previous</a>"#, base, info.page - 1)
    } else {
        String::new()
    };
    let next = if info.has_more {
        format!(r#"<a href="{}?page={}">Next</a>"#, base, info.page + 1)
    } else {
        String::new()
    };
    let position = match info.total_pages {
        Some(pages) => format!("Page {} of {}", info.page, pages),
        None => format!("Page {}", info.page),
    };
    let range = match info.total_items {
        Some(total) => format!("{}-{} of {}", info.first_item, info.last_item, total),
        None => format!("{}-{}", info.first_item, info.last_item),
    };
    format!(
        r#"<div style="display: flex; gap: 1rem; margin-top: 1rem;">{} <span>{}</span> <span style="color: #6c757d;">{}</span> {}</div>"#,
        previous, position, range, next
    )
}

fn list_body<T>(
    base: &str,
    state: &ListState<T>,
    headers: &[&str],
    row: impl Fn(&T) -> String,
) -> String {
    match state {
        ListState::Idle => String::new(),
        ListState::Loading { .. } => "<p>Loading...</p>".to_string(),
        ListState::Failed { page, message } => format!(
            r#"<div style="padding: 1rem; color: #721c24; background-color: #f8d7da; border-radius: 0.25rem;">
        {} <a href="{}?page={}">Retry</a>
    </div>"#,
            escape_html(message),
            base,
            page
        ),
        ListState::Loaded { items, info } if items.is_empty() => {
            format!("<p>No records.</p>{}", pagination(base, info))
        }
        ListState::Loaded { items, info } => {
            let rows: String = items.iter().map(row).collect();
            format!("{}{}", table(headers, &rows), pagination(base, info))
        }
    }
}

pub fn equipment_list_page(state: &ListState<EquipmentRow>) -> String {
    let headers = [
        "Project",
        "Location",
        "Equipment",
        "Discharge type",
        "Severity",
        "Frequency",
        "Diagnosis time",
        "Status",
        "Report",
    ];
    let body = list_body("/", state, &headers, |row| {
        let equipment = format!(
            r#"<a href="/equipment/{}">{}</a>"#,
            urlencoding::encode(&row.id),
            escape_html(&row.equipment)
        );
        format!(
            r#"<tr style="border-bottom: 1px solid #dee2e6;">{}{}{}{}{}{}{}{}{}</tr>"#,
            cell(&escape_html(&row.project)),
            cell(&escape_html(&row.location)),
            cell(&equipment),
            cell(&escape_html(&row.discharge_type)),
            cell(&escape_html(&row.severity)),
            cell(&escape_html(&row.frequency)),
            cell(&escape_html(&row.diagnosis_time)),
            cell(&badge(&row.status_label, row.status_tier)),
            cell(&escape_html(&row.report_label)),
        )
    });
    layout(
        "Equipment status",
        &format!("<h1>Equipment status</h1>{}", body),
    )
}

pub fn device_list_page(state: &ListState<DeviceRow>) -> String {
    let headers = [
        "Project",
        "Equipment",
        "Location",
        "Sensor",
        "Voltage",
        "Firmware",
        "Status",
    ];
    let body = list_body("/devices", state, &headers, |row| {
        format!(
            r#"<tr style="border-bottom: 1px solid #dee2e6;">{}{}{}{}{}{}{}</tr>"#,
            cell(&escape_html(&row.project)),
            cell(&escape_html(&row.equipment)),
            cell(&escape_html(&row.location)),
            cell(&escape_html(&row.name)),
            cell(&escape_html(&row.voltage)),
            cell(&escape_html(&row.firmware)),
            cell(&badge(&row.status_label, row.status_tier)),
        )
    });
    layout("Sensor status", &format!("<h1>Sensor status</h1>{}", body))
}

pub fn error_page(title: &str, message: &str, retry_href: Option<&str>) -> String {
    let retry = retry_href
        .map(|href| format!(r#" <a href="{}">Retry</a>"#, escape_html(href)))
        .unwrap_or_default();
    layout(
        title,
        &format!(
            r#"<h1>{}</h1>
    <div style="padding: 1rem; color: #721c24; background-color: #f8d7da; border-radius: 0.25rem;">{}{}</div>"#,
            escape_html(title),
            escape_html(message),
            retry
        ),
    )
}

/// Query pairs reproducing the current selection.
fn selection_pairs(view: &DetailView) -> Vec<(&'static str, String)> {
    let (start, end) = view.custom_window();
    let mut pairs = vec![
        ("date", view.selected_date().to_string()),
        ("range", view.time_range().slug().to_string()),
        ("start", start.to_string()),
        ("end", end.to_string()),
        ("tab", view.analysis_tab().slug().to_string()),
        ("channel", view.channel().as_param().to_string()),
    ];
    if let Some(sensor) = view.selected_sensor() {
        pairs.push(("sensor", sensor.to_string()));
    }
    pairs
}

fn detail_href(view: &DetailView, key: &'static str, value: &str) -> String {
    let mut pairs = selection_pairs(view);
    pairs.retain(|(k, _)| *k != key);
    pairs.push((key, value.to_string()));

    let query: Vec<String> = pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
        .collect();
    format!(
        "/equipment/{}?{}",
        urlencoding::encode(view.handoff().equipment.id()),
        query.join("&amp;")
    )
}

fn selection_form(view: &DetailView) -> String {
    let (start, end) = view.custom_window();
    let ranges: String = TimeRange::ALL
        .iter()
        .map(|range| {
            let selected = if *range == view.time_range() { " selected" } else { "" };
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                range.slug(),
                selected,
                range.label()
            )
        })
        .collect();
    let dates = if view.time_range() == TimeRange::Custom {
        format!(
            r#"<input type="date" name="start" value="{}"> to <input type="date" name="end" value="{}">"#,
            start, end
        )
    } else {
        format!(
            r#"<input type="date" name="date" value="{}">"#,
            view.selected_date()
        )
    };
    let sensor = view
        .selected_sensor()
        .map(|s| format!(r#"<input type="hidden" name="sensor" value="{}">"#, escape_html(s)))
        .unwrap_or_default();

    format!(
        r#"<form method="get" style="display: flex; gap: 0.5rem; align-items: center; margin: 1rem 0;">
        <select name="range">{}</select>
        {}
        {}
        <input type="hidden" name="tab" value="{}">
        <input type="hidden" name="channel" value="{}">
        <button type="submit">Apply</button>
    </form>"#,
        ranges,
        dates,
        sensor,
        view.analysis_tab().slug(),
        view.channel().as_param()
    )
}

fn collectors_table(view: &DetailView) -> String {
    let rows: String = view
        .collectors()
        .iter()
        .map(|collector| {
            let selected = view.selected_sensor() == Some(collector.id.as_str());
            let style = if selected {
                "border-bottom: 1px solid #dee2e6; background-color: #e7f1ff;"
            } else {
                "border-bottom: 1px solid #dee2e6;"
            };
            format!(
                r#"<tr style="{}">{}{}{}</tr>"#,
                style,
                cell(&escape_html(&collector.kind)),
                cell(&format!(
                    r#"<a href="{}">{}</a>"#,
                    detail_href(view, "sensor", &collector.id),
                    escape_html(&collector.id)
                )),
                cell(&escape_html(&collector.location)),
            )
        })
        .collect();
    if rows.is_empty() {
        return "<p>No sensors attached to this equipment.</p>".to_string();
    }
    table(&["Collector", "ID", "Location"], &rows)
}

fn tab_bar(view: &DetailView) -> String {
    AnalysisTab::ALL
        .iter()
        .map(|tab| {
            let weight = if *tab == view.analysis_tab() { "700" } else { "400" };
            format!(
                r#"<a href="{}" style="margin-right: 1rem; font-weight: {};">{}</a>"#,
                detail_href(view, "tab", tab.slug()),
                weight,
                tab.label()
            )
        })
        .collect()
}

fn channel_bar(view: &DetailView) -> String {
    Channel::ALL
        .iter()
        .map(|channel| {
            let weight = if *channel == view.channel() { "700" } else { "400" };
            format!(
                r#"<a href="{}" style="margin-right: 0.75rem; font-weight: {};">{}</a>"#,
                detail_href(view, "channel", channel.as_param()),
                weight,
                channel.as_param()
            )
        })
        .collect()
}

fn notice(message: &str) -> String {
    format!(
        r#"<div style="padding: 2rem; text-align: center; color: #6c757d; border: 1px dashed #ced4da;">{}</div>"#,
        escape_html(message)
    )
}

pub fn chart_panel(panel: ChartPanel, state: Option<&ChartState>) -> String {
    let kind = match panel {
        ChartPanel::UnderDevelopment => return notice("This analysis is under development."),
        ChartPanel::Chart(kind) => kind,
    };
    let body = match state {
        None | Some(ChartState::Idle) => notice("This analysis is under development."),
        Some(ChartState::Loading { .. }) => notice("Loading..."),
        Some(ChartState::Empty) => notice(EMPTY_WINDOW_MESSAGE),
        Some(ChartState::Failed { message }) => notice(message),
        Some(ChartState::Loaded { projection }) => plot(projection),
    };
    format!("<h2>{}</h2>{}", kind.title(), body)
}

fn plot(projection: &ChartProjection) -> String {
    let json = serde_json::to_string(projection)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/");
    format!(
        r#"<div id="chart" style="height: 480px;"></div>
    <script src="{}"></script>
    <script>{}
drawProjection('chart', {});</script>"#,
        PLOTLY_CDN, PLOT_SCRIPT, json
    )
}

pub fn detail_page(view: &DetailView, chart: Option<&ChartState>) -> String {
    let equipment = &view.handoff().equipment;
    let condition = equipment.condition();
    let help = if view.is_window_help_shown() {
        format!(
            r#"<div style="padding: 1rem; margin: 1rem 0; color: #856404; background-color: #fff3cd; border-radius: 0.25rem;">{}</div>"#,
            HELP_TEXT
        )
    } else {
        String::new()
    };

    let body = format!(
        r#"<h1>{} {}</h1>
    <p style="color: #6c757d;">{} {}</p>
    {}
    <h2>Collectors</h2>
    {}
    <div style="margin: 1rem 0;">{}</div>
    <div style="margin: 1rem 0;">Channel: {}</div>
    {}
    {}"#,
        escape_html(equipment.name()),
        badge(&condition.label(), condition.tier()),
        escape_html(equipment.entity_name.as_deref().unwrap_or_default()),
        escape_html(equipment.entity_description.as_deref().unwrap_or_default()),
        selection_form(view),
        collectors_table(view),
        tab_bar(view),
        channel_bar(view),
        help,
        chart_panel(view.panel(), chart)
    );
    layout(equipment.name(), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::navigation::DetailHandoff;
    use crate::domain::chart::SignalTrace;
    use crate::domain::device::DeviceStatus;
    use crate::domain::equipment::EquipmentStatus;
    use chrono::NaiveDate;

    fn view() -> DetailView {
        let handoff = DetailHandoff {
            equipment: EquipmentStatus {
                monitored_equipment_id: Some("EQ 7".to_string()),
                monitored_equipment_name: Some("Feeder <A>".to_string()),
                ..Default::default()
            },
            devices: vec![DeviceStatus {
                device_id: "S-1".to_string(),
                device_name: "UHF".to_string(),
                ..Default::default()
            }],
        };
        DetailView::new(handoff, NaiveDate::from_ymd_opt(2020, 6, 13).unwrap())
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"R&D"</b>"#),
            "&lt;b&gt;&quot;R&amp;D&quot;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_failed_list_offers_retry() {
        let state: ListState<DeviceRow> = ListState::Failed {
            page: 3,
            message: "request timed out".to_string(),
        };
        let html = device_list_page(&state);
        assert!(html.contains("request timed out"));
        assert!(html.contains(r#"href="/devices?page=3">Retry"#));
    }

    #[test]
    fn test_pagination_links() {
        let info = PageInfo::new(2, 8, 8, Some(20));
        let html = pagination("/", &info);
        assert!(html.contains(r#"href="/?page=1">Previous"#));
        assert!(html.contains(r#"href="/?page=3">Next"#));
        assert!(html.contains("Page 2 of 3"));
    }

    #[test]
    fn test_detail_links_keep_selection() {
        let view = view();
        let href = detail_href(&view, "tab", "prps");
        assert!(href.starts_with("/equipment/EQ%207?"));
        assert!(href.contains("sensor=S-1"));
        assert!(href.contains("tab=prps"));
        assert!(!href.contains("tab=prpd"));
    }

    #[test]
    fn test_detail_page_escapes_and_shows_help() {
        let mut view = view();
        view.show_window_help();
        let html = detail_page(&view, Some(&ChartState::Empty));
        assert!(html.contains("Feeder &lt;A&gt;"));
        assert!(html.contains(HELP_TEXT));
        assert!(html.contains(EMPTY_WINDOW_MESSAGE));
    }

    #[test]
    fn test_loaded_chart_embeds_projection() {
        let projection = ChartProjection::SignalTrace(SignalTrace {
            indices: vec![0.0, 1.0],
            peaks: vec![-50.0, -49.0],
        });
        let html = chart_panel(
            ChartPanel::Chart(crate::domain::chart::ChartKind::SignalTrace),
            Some(&ChartState::Loaded { projection }),
        );
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains(r#""kind":"signal_trace""#));
        assert!(html.contains(r#""peaks":[-50.0,-49.0]"#));
    }

    #[test]
    fn test_under_development_panel() {
        let html = chart_panel(ChartPanel::UnderDevelopment, None);
        assert!(html.contains("under development"));
        assert!(!html.contains("drawProjection"));
    }
}
