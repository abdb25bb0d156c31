// Equipment detail view - selection state driving the active chart
use crate::application::chart_view::ChartInputs;
use crate::application::navigation::DetailHandoff;
use crate::domain::calendar::parse_calendar_date;
use crate::domain::chart::{ChartKind, Channel};
use crate::domain::device::Collector;
use crate::error::ApiError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TimeRange {
    #[default]
    #[serde(rename = "24h")]
    Hours24,
    #[serde(rename = "48h")]
    Hours48,
    #[serde(rename = "7d")]
    Days7,
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "custom")]
    Custom,
}

impl TimeRange {
    pub const ALL: [TimeRange; 5] = [
        TimeRange::Hours24,
        TimeRange::Hours48,
        TimeRange::Days7,
        TimeRange::Days30,
        TimeRange::Custom,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            TimeRange::Hours24 => "24h",
            TimeRange::Hours48 => "48h",
            TimeRange::Days7 => "7d",
            TimeRange::Days30 => "30d",
            TimeRange::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Hours24 => "24h",
            TimeRange::Hours48 => "48h",
            TimeRange::Days7 => "7 days",
            TimeRange::Days30 => "30 days",
            TimeRange::Custom => "Custom",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|range| range.slug() == slug)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisTab {
    PulseAnalysis,
    PhaseCorrelation,
    PhaseFrequency,
    #[default]
    Prpd,
    Prps,
}

impl AnalysisTab {
    pub const ALL: [AnalysisTab; 5] = [
        AnalysisTab::PulseAnalysis,
        AnalysisTab::PhaseCorrelation,
        AnalysisTab::PhaseFrequency,
        AnalysisTab::Prpd,
        AnalysisTab::Prps,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            AnalysisTab::PulseAnalysis => "pulse",
            AnalysisTab::PhaseCorrelation => "phase-correlation",
            AnalysisTab::PhaseFrequency => "pf",
            AnalysisTab::Prpd => "prpd",
            AnalysisTab::Prps => "prps",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnalysisTab::PulseAnalysis => "Discharge pulse analysis",
            AnalysisTab::PhaseCorrelation => "Phase correlation analysis",
            AnalysisTab::PhaseFrequency => "PF phase-frequency pattern",
            AnalysisTab::Prpd => "PRPD pattern analysis",
            AnalysisTab::Prps => "PRPS pattern analysis",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tab| tab.slug() == slug)
    }

    fn chart_kind(&self) -> Option<ChartKind> {
        match self {
            AnalysisTab::PulseAnalysis => Some(ChartKind::PulseDistribution),
            AnalysisTab::PhaseCorrelation => Some(ChartKind::SignalTrace),
            AnalysisTab::Prpd => Some(ChartKind::PhasePattern),
            AnalysisTab::Prps => Some(ChartKind::PhaseSequence),
            AnalysisTab::PhaseFrequency => None,
        }
    }
}

/// What the chart area shows for the active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartPanel {
    Chart(ChartKind),
    UnderDevelopment,
}

/// Selection changes as they arrive from the page's query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectionQuery {
    pub date: Option<String>,
    pub range: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub sensor: Option<String>,
    pub tab: Option<String>,
    pub channel: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DetailView {
    handoff: DetailHandoff,
    selected_date: NaiveDate,
    time_range: TimeRange,
    custom_start: NaiveDate,
    custom_end: NaiveDate,
    channel: Channel,
    selected_sensor: Option<String>,
    analysis_tab: AnalysisTab,
    window_help: bool,
}

impl DetailView {
    /// The first sensor of the handoff is selected initially.
    pub fn new(handoff: DetailHandoff, today: NaiveDate) -> Self {
        let selected_sensor = handoff.devices.first().map(|d| d.device_id.clone());
        Self {
            handoff,
            selected_date: today,
            time_range: TimeRange::default(),
            custom_start: today,
            custom_end: today,
            channel: Channel::default(),
            selected_sensor,
            analysis_tab: AnalysisTab::default(),
            window_help: false,
        }
    }

    pub fn handoff(&self) -> &DetailHandoff {
        &self.handoff
    }

    pub fn collectors(&self) -> Vec<Collector> {
        self.handoff.devices.iter().map(Collector::from).collect()
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected_date
    }

    pub fn time_range(&self) -> TimeRange {
        self.time_range
    }

    pub fn custom_window(&self) -> (NaiveDate, NaiveDate) {
        (self.custom_start, self.custom_end)
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn selected_sensor(&self) -> Option<&str> {
        self.selected_sensor.as_deref()
    }

    pub fn analysis_tab(&self) -> AnalysisTab {
        self.analysis_tab
    }

    pub fn is_window_help_shown(&self) -> bool {
        self.window_help
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = date;
        self.window_help = false;
    }

    pub fn set_time_range(&mut self, range: TimeRange) {
        self.time_range = range;
        self.window_help = false;
    }

    pub fn set_custom_start(&mut self, date: NaiveDate) {
        self.custom_start = date;
        self.window_help = false;
    }

    pub fn set_custom_end(&mut self, date: NaiveDate) {
        self.custom_end = date;
        self.window_help = false;
    }

    pub fn select_sensor(&mut self, sensor: &str) {
        self.selected_sensor = Some(sensor.to_string());
        self.window_help = false;
    }

    pub fn select_tab(&mut self, tab: AnalysisTab) {
        self.analysis_tab = tab;
        self.window_help = false;
    }

    pub fn select_channel(&mut self, channel: Channel) {
        self.channel = channel;
        self.window_help = false;
    }

    /// Called when the active chart reports an empty window.
    pub fn show_window_help(&mut self) {
        self.window_help = true;
    }

    /// Custom mode uses the start/end pair; every other mode the single selected date.
    pub fn query_window(&self) -> (NaiveDate, NaiveDate) {
        match self.time_range {
            TimeRange::Custom => (self.custom_start, self.custom_end),
            _ => (self.selected_date, self.selected_date),
        }
    }

    pub fn panel(&self) -> ChartPanel {
        match self.analysis_tab.chart_kind() {
            Some(kind) if kind.is_implemented() => ChartPanel::Chart(kind),
            _ => ChartPanel::UnderDevelopment,
        }
    }

    pub fn chart_inputs(&self) -> ChartInputs {
        let (start, end) = self.query_window();
        ChartInputs {
            sensor: self.selected_sensor.clone(),
            start,
            end,
            channel: self.channel,
        }
    }

    /// Apply every selection present in the query. Unknown tab/range/channel values are ignored.
    pub fn apply(&mut self, query: &SelectionQuery) -> Result<(), ApiError> {
        if let Some(range) = query.range.as_deref().and_then(TimeRange::from_slug) {
            self.set_time_range(range);
        }
        if let Some(date) = non_blank(&query.date) {
            self.select_date(parse_calendar_date(date)?);
        }
        if let Some(start) = non_blank(&query.start) {
            self.set_custom_start(parse_calendar_date(start)?);
        }
        if let Some(end) = non_blank(&query.end) {
            self.set_custom_end(parse_calendar_date(end)?);
        }
        if let Some(sensor) = non_blank(&query.sensor) {
            self.select_sensor(sensor);
        }
        if let Some(tab) = query.tab.as_deref().and_then(AnalysisTab::from_slug) {
            self.select_tab(tab);
        }
        if let Some(channel) = query.channel.as_deref().and_then(Channel::parse) {
            self.select_channel(channel);
        }
        Ok(())
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
