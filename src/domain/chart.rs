// Chart dataset returned by /chart_data and the projections each chart view draws
use crate::error::ApiError;
use serde::{Deserialize, Deserializer, Serialize};

/// Time-windowed bundle of parallel series for one sensor/channel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartDataset {
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub device_id: Option<String>,
    pub device_name: Option<String>,
    pub channel: Option<String>,
    #[serde(rename = "threshold_in_dBmV")]
    pub threshold_in_dbmv: Option<f64>,
    pub initial_phase_in_degree: Option<f64>,
    pub batch_start_timestamp: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub phases: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub sine_wave: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub scatter_points: Vec<[f64; 3]>,
    #[serde(deserialize_with = "null_as_default")]
    pub signal_indices: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub peak_values: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub pulse_x: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub pulse_y: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub prps_x: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub prps_y: Vec<f64>,
    #[serde(deserialize_with = "null_as_default")]
    pub prps_z: Vec<Vec<f64>>,
}

/// A series sent as `null` decodes like a missing one.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wire envelope: `{ "chart_data": { "charts": [...] } }`
#[derive(Debug, Deserialize)]
pub struct ChartDataResponse {
    pub chart_data: ChartCollection,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChartCollection {
    #[serde(default)]
    pub charts: Vec<ChartDataset>,
}

impl ChartDataResponse {
    /// The first chart is the one for the requested sensor; none means no data in the window.
    pub fn into_first(self) -> Option<ChartDataset> {
        self.chart_data.charts.into_iter().next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    PhasePattern,
    PhaseSequence,
    PulseDistribution,
    SignalTrace,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::PhasePattern,
        ChartKind::PhaseSequence,
        ChartKind::PulseDistribution,
        ChartKind::SignalTrace,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            ChartKind::PhasePattern => "prpd",
            ChartKind::PhaseSequence => "prps",
            ChartKind::PulseDistribution => "pulse",
            ChartKind::SignalTrace => "signal",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::PhasePattern => "PRPD phase-resolved pattern",
            ChartKind::PhaseSequence => "PRPS phase-resolved pulse sequence",
            ChartKind::PulseDistribution => "Pulse distribution",
            ChartKind::SignalTrace => "Signal trace",
        }
    }

    /// Pulse distribution has no chart of its own yet.
    pub fn is_implemented(&self) -> bool {
        !matches!(self, ChartKind::PulseDistribution)
    }
}

/// Sensing modality a chart query is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Channel {
    #[default]
    #[serde(rename = "UHF")]
    Uhf,
    #[serde(rename = "TEV")]
    Tev,
    #[serde(rename = "AE")]
    Ae,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Uhf, Channel::Tev, Channel::Ae];

    pub fn as_param(&self) -> &'static str {
        match self {
            Channel::Uhf => "UHF",
            Channel::Tev => "TEV",
            Channel::Ae => "AE",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|channel| channel.as_param().eq_ignore_ascii_case(raw.trim()))
    }
}

/// Amplitude vs phase scatter coloured by intensity, over a reference phase curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhasePattern {
    pub reference_phases: Vec<f64>,
    pub reference_wave: Vec<f64>,
    pub phases: Vec<f64>,
    pub amplitudes: Vec<f64>,
    pub intensities: Vec<f64>,
    pub intensity_range: Option<(f64, f64)>,
}

/// One single-row heatmap per sequence step, all sharing the phase axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseSequence {
    pub phase_axis: Vec<f64>,
    pub slices: Vec<HeatmapSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapSlice {
    pub step: f64,
    pub row: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalTrace {
    pub indices: Vec<f64>,
    pub peaks: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartProjection {
    PhasePattern(PhasePattern),
    PhaseSequence(PhaseSequence),
    SignalTrace(SignalTrace),
}

impl ChartDataset {
    /// Split the (phase, amplitude, intensity) triples into three parallel arrays.
    pub fn split_scatter(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let mut phases = Vec::with_capacity(self.scatter_points.len());
        let mut amplitudes = Vec::with_capacity(self.scatter_points.len());
        let mut intensities = Vec::with_capacity(self.scatter_points.len());
        for [phase, amplitude, intensity] in &self.scatter_points {
            phases.push(*phase);
            amplitudes.push(*amplitude);
            intensities.push(*intensity);
        }
        (phases, amplitudes, intensities)
    }

    /// `Ok(None)` when the window holds no data for this kind of chart.
    pub fn project(&self, kind: ChartKind) -> Result<Option<ChartProjection>, ApiError> {
        let projection = match kind {
            ChartKind::PhasePattern => self.phase_pattern()?.map(ChartProjection::PhasePattern),
            ChartKind::PhaseSequence => self.phase_sequence()?.map(ChartProjection::PhaseSequence),
            ChartKind::SignalTrace => self.signal_trace()?.map(ChartProjection::SignalTrace),
            ChartKind::PulseDistribution => None,
        };
        Ok(projection)
    }

    pub fn phase_pattern(&self) -> Result<Option<PhasePattern>, ApiError> {
        if self.phases.is_empty() || self.scatter_points.is_empty() {
            return Ok(None);
        }
        ensure_paired("phases", self.phases.len(), "sine_wave", self.sine_wave.len())?;

        let (phases, amplitudes, intensities) = self.split_scatter();
        let intensity_range = intensities.iter().fold(None, |range, &v| match range {
            None => Some((v, v)),
            Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
        });

        Ok(Some(PhasePattern {
            reference_phases: self.phases.clone(),
            reference_wave: self.sine_wave.clone(),
            phases,
            amplitudes,
            intensities,
            intensity_range,
        }))
    }

    pub fn phase_sequence(&self) -> Result<Option<PhaseSequence>, ApiError> {
        if self.prps_x.is_empty() || self.prps_y.is_empty() || self.prps_z.is_empty() {
            return Ok(None);
        }
        ensure_paired("prps_y", self.prps_y.len(), "prps_z rows", self.prps_z.len())?;
        for row in &self.prps_z {
            ensure_paired("prps_x", self.prps_x.len(), "prps_z row", row.len())?;
        }

        let slices = self
            .prps_y
            .iter()
            .zip(&self.prps_z)
            .map(|(step, row)| HeatmapSlice {
                step: *step,
                row: row.clone(),
            })
            .collect();

        Ok(Some(PhaseSequence {
            phase_axis: self.prps_x.clone(),
            slices,
        }))
    }

    pub fn signal_trace(&self) -> Result<Option<SignalTrace>, ApiError> {
        if self.signal_indices.is_empty() || self.peak_values.is_empty() {
            return Ok(None);
        }
        ensure_paired(
            "signal_indices",
            self.signal_indices.len(),
            "peak_values",
            self.peak_values.len(),
        )?;

        Ok(Some(SignalTrace {
            indices: self.signal_indices.clone(),
            peaks: self.peak_values.clone(),
        }))
    }
}

fn ensure_paired(left: &str, left_len: usize, right: &str, right_len: usize) -> Result<(), ApiError> {
    if left_len == right_len {
        Ok(())
    } else {
        Err(ApiError::MalformedResponse(format!(
            "{} has {} values but {} has {}",
            left, left_len, right, right_len
        )))
    }
}
