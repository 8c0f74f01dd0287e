use serde::{Deserialize, Serialize};

/// Marker type name used for tasks, both in payloads and in the schema.
pub const TASK_MARKER: &str = "Task";

/// Whether a marker covers an interval or a single point in time.
///
/// Serialized as the profiler's numeric marker phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Phase {
    /// The marker has both a start and an end time.
    Interval,
    /// The marker has started but has no end time.
    IntervalStart,
}

impl From<Phase> for u8 {
    fn from(phase: Phase) -> u8 {
        match phase {
            Phase::Interval => 1,
            Phase::IntervalStart => 2,
        }
    }
}

impl TryFrom<u8> for Phase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Phase::Interval),
            2 => Ok(Phase::IntervalStart),
            unknown => Err(format!("unsupported marker phase: {}", unknown)),
        }
    }
}

/// Extra data attached to a task marker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerPayload {
    /// Marker type, matching a [`MarkerSchema::name`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Wall-clock start of the task, already formatted for display.
    pub start_time: String,
    /// The job part of the task name, if it had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
}

impl MarkerPayload {
    /// A payload for the `Task` marker type.
    pub fn task(start_time: String, job: Option<String>) -> Self {
        MarkerPayload {
            kind: TASK_MARKER.to_string(),
            start_time,
            job,
        }
    }
}

/// The marker table of a thread, stored column by column.
///
/// All columns always have `length` entries.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Markers {
    data: Vec<MarkerPayload>,
    name: Vec<usize>,
    start_time: Vec<i64>,
    end_time: Vec<Option<i64>>,
    phase: Vec<Phase>,
    category: Vec<usize>,
    length: usize,
}

impl Markers {
    /// Appends a marker.
    ///
    /// `name` is an index into the owning thread's string table. Times are milliseconds
    /// relative to the profile's start time; the phase follows from whether `end` is known.
    pub fn push(
        &mut self,
        name: usize,
        start: i64,
        end: Option<i64>,
        category: usize,
        data: MarkerPayload,
    ) {
        self.name.push(name);
        self.start_time.push(start);
        self.end_time.push(end);
        self.phase.push(match end {
            Some(_) => Phase::Interval,
            None => Phase::IntervalStart,
        });
        self.category.push(category);
        self.data.push(data);
        self.length += 1;
    }

    /// Number of markers.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether there are no markers.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// String-table indices of the marker names.
    pub fn names(&self) -> &[usize] {
        &self.name
    }

    /// Marker start times.
    pub fn start_times(&self) -> &[i64] {
        &self.start_time
    }

    /// Marker end times.
    pub fn end_times(&self) -> &[Option<i64>] {
        &self.end_time
    }

    /// Marker phases.
    pub fn phases(&self) -> &[Phase] {
        &self.phase
    }

    /// Marker payloads.
    pub fn data(&self) -> &[MarkerPayload] {
        &self.data
    }
}

/// Where the profiler shows markers of a given type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerDisplay {
    /// The marker chart panel.
    MarkerChart,
    /// The marker table panel.
    MarkerTable,
}

/// How a payload field is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerFormat {
    /// Verbatim text.
    String,
}

/// Describes one payload field of a marker type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerField {
    /// Key of the field in [`MarkerPayload`].
    pub key: String,
    /// Column or tooltip label.
    pub label: String,
    /// Rendering format.
    pub format: MarkerFormat,
}

impl MarkerField {
    fn string(key: &str, label: &str) -> Self {
        MarkerField {
            key: key.to_string(),
            label: label.to_string(),
            format: MarkerFormat::String,
        }
    }
}

/// Tells the profiler how to label and where to show a marker type.
///
/// Labels are templates over the marker, e.g. `{marker.data.job}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkerSchema {
    /// Marker type this schema applies to.
    pub name: String,
    /// Label in the hover tooltip.
    pub tooltip_label: String,
    /// Label in the marker table.
    pub table_label: String,
    /// Label drawn on the marker chart.
    pub chart_label: String,
    /// Panels that show this marker type.
    pub display: Vec<MarkerDisplay>,
    /// Payload fields.
    pub data: Vec<MarkerField>,
}

impl MarkerSchema {
    /// The schema for task markers.
    pub fn task() -> Self {
        MarkerSchema {
            name: TASK_MARKER.to_string(),
            tooltip_label: "{marker.name} — {marker.data.job}".to_string(),
            table_label: "{marker.name} — {marker.data.job}".to_string(),
            chart_label: "{marker.data.job}".to_string(),
            display: vec![MarkerDisplay::MarkerChart, MarkerDisplay::MarkerTable],
            data: vec![
                MarkerField::string("startTime", "Start time"),
                MarkerField::string("job", "Job name"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_stay_in_step() {
        let mut markers = Markers::default();
        markers.push(1, 0, Some(10), 0, MarkerPayload::task("00:00:00".into(), None));
        markers.push(2, 5, None, 0, MarkerPayload::task("00:00:05".into(), None));

        assert_eq!(markers.len(), 2);
        assert_eq!(markers.names(), &[1, 2]);
        assert_eq!(markers.start_times(), &[0, 5]);
        assert_eq!(markers.end_times(), &[Some(10), None]);
        assert_eq!(markers.phases(), &[Phase::Interval, Phase::IntervalStart]);
        assert_eq!(markers.data().len(), 2);
    }

    #[test]
    fn phase_is_numeric() {
        assert_eq!(serde_json::to_string(&Phase::Interval).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Phase::IntervalStart).unwrap(), "2");
        assert!(serde_json::from_str::<Phase>("3").is_err());
    }

    #[test]
    fn payload_without_job_omits_key() {
        let payload = MarkerPayload::task("01:00:00".into(), None);
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"type": "Task", "startTime": "01:00:00"})
        );
    }

    #[test]
    fn task_schema_shape() {
        let schema = serde_json::to_value(MarkerSchema::task()).unwrap();
        assert_eq!(schema["display"], serde_json::json!(["marker-chart", "marker-table"]));
        assert_eq!(schema["chartLabel"], "{marker.data.job}");
        assert_eq!(schema["data"][1]["key"], "job");
        assert_eq!(schema["data"][1]["format"], "string");
    }

    #[test]
    fn only_used_display_and_format_kinds() {
        assert!(serde_json::from_str::<MarkerDisplay>(r#""marker-table""#).is_ok());
        assert!(serde_json::from_str::<MarkerDisplay>(r#""timeline-overview""#).is_err());
        assert!(serde_json::from_str::<MarkerFormat>(r#""integer""#).is_err());
    }
}
