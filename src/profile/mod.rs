mod markers;
mod strings;

pub use markers::{
    MarkerDisplay, MarkerField, MarkerFormat, MarkerPayload, MarkerSchema, Markers, Phase,
    TASK_MARKER,
};
pub use strings::{StringTable, ROOT};

use serde::{Deserialize, Serialize};
use serde_json::Value;

const FORMAT_VERSION: u32 = 27;
const PREPROCESSED_PROFILE_VERSION: u32 = 47;
const MAIN_THREAD: &str = "GeckoMain";

/// A profile in the Firefox Profiler's processed format.
///
/// Only what a marker-only profile needs is modelled precisely; tables that always stay empty
/// here are kept as raw JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Profile-wide information.
    pub meta: Meta,
    /// Shared libraries; always empty.
    pub libs: Vec<Value>,
    /// Browser pages; always empty.
    pub pages: Vec<Value>,
    /// The profiled threads.
    pub threads: Vec<Thread>,
    /// Counter tracks; always empty.
    pub counters: Vec<Value>,
}

impl Default for Profile {
    /// An empty profile with a single main thread and no markers.
    fn default() -> Self {
        Profile {
            meta: Meta::default(),
            libs: Vec::new(),
            pages: Vec::new(),
            threads: vec![Thread::default()],
            counters: Vec::new(),
        }
    }
}

impl Profile {
    /// The first thread, which carries all the markers.
    ///
    /// A profile built by this crate always has one; a deserialized one may not.
    pub fn main_thread(&self) -> Option<&Thread> {
        self.threads.first()
    }

    /// Mutable access to the first thread.
    pub fn main_thread_mut(&mut self) -> Option<&mut Thread> {
        self.threads.first_mut()
    }
}

/// Profile metadata.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Sampling interval in milliseconds.
    pub interval: u32,
    /// Absolute time, in milliseconds since the epoch, that all other times are relative to.
    pub start_time: i64,
    pub(crate) abi: String,
    pub(crate) misc: String,
    pub(crate) oscpu: String,
    pub(crate) platform: String,
    pub(crate) process_type: u32,
    pub(crate) extensions: Extensions,
    /// Categories referenced by markers and stacks.
    pub categories: Vec<Category>,
    /// Label shown as the profile's title.
    pub product: String,
    pub(crate) stackwalk: u32,
    pub(crate) toolkit: String,
    /// Version of the gecko profile format.
    pub version: u32,
    /// Version of the processed profile format.
    pub preprocessed_profile_version: u32,
    #[serde(rename = "appBuildID")]
    pub(crate) app_build_id: String,
    #[serde(rename = "sourceURL")]
    pub(crate) source_url: String,
    /// Shown as the number of CPUs; here, the number of tasks.
    #[serde(rename = "physicalCPUs")]
    pub physical_cpus: usize,
    #[serde(rename = "logicalCPUs")]
    pub(crate) logical_cpus: usize,
    /// Shown as the CPU name.
    #[serde(rename = "CPUName")]
    pub cpu_name: String,
    pub(crate) symbolication_not_supported: bool,
    /// Display rules for custom marker types.
    pub marker_schema: Vec<MarkerSchema>,
}

impl Default for Meta {
    fn default() -> Self {
        Meta {
            interval: 1000,
            start_time: 0,
            abi: String::new(),
            misc: String::new(),
            oscpu: String::new(),
            platform: String::new(),
            process_type: 0,
            extensions: Extensions::default(),
            categories: vec![Category::other()],
            product: String::new(),
            stackwalk: 0,
            toolkit: String::new(),
            version: FORMAT_VERSION,
            preprocessed_profile_version: PREPROCESSED_PROFILE_VERSION,
            app_build_id: String::new(),
            source_url: String::new(),
            physical_cpus: 0,
            logical_cpus: 0,
            cpu_name: String::new(),
            symbolication_not_supported: true,
            marker_schema: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct Extensions {
    id: Vec<String>,
    name: Vec<String>,
    #[serde(rename = "baseURL")]
    base_url: Vec<String>,
    length: usize,
}

/// A marker or stack category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category name.
    pub name: String,
    /// One of the profiler's named colors.
    pub color: String,
    /// Subcategory names; the first is the default.
    pub subcategories: Vec<String>,
}

impl Category {
    fn other() -> Self {
        Category {
            name: "Other".to_string(),
            color: "grey".to_string(),
            subcategories: vec!["Other".to_string()],
        }
    }
}

/// A thread, with its samples, markers and the tables they refer to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub(crate) process_type: String,
    pub(crate) process_startup_time: i64,
    pub(crate) process_shutdown_time: Option<i64>,
    pub(crate) register_time: i64,
    pub(crate) unregister_time: Option<i64>,
    pub(crate) paused_ranges: Vec<Value>,
    /// Thread name.
    pub name: String,
    pub(crate) is_main_thread: bool,
    pub(crate) pid: String,
    pub(crate) tid: u32,
    /// Stack samples.
    pub samples: Samples,
    /// Markers.
    pub markers: Markers,
    stack_table: StackTable,
    frame_table: FrameTable,
    func_table: FuncTable,
    resource_table: ResourceTable,
    native_symbols: NativeSymbols,
    /// Strings referenced by the other tables.
    pub string_array: StringTable,
}

impl Default for Thread {
    fn default() -> Self {
        Thread {
            process_type: "default".to_string(),
            process_startup_time: 0,
            process_shutdown_time: None,
            register_time: 0,
            unregister_time: None,
            paused_ranges: Vec::new(),
            name: MAIN_THREAD.to_string(),
            is_main_thread: true,
            pid: "0".to_string(),
            tid: 0,
            samples: Samples::default(),
            markers: Markers::default(),
            stack_table: StackTable::root(),
            frame_table: FrameTable::root(),
            func_table: FuncTable::root(),
            resource_table: ResourceTable::default(),
            native_symbols: NativeSymbols::default(),
            string_array: StringTable::default(),
        }
    }
}

impl Thread {
    /// Adds a marker named `name`, interning the name in this thread's string table.
    pub fn add_marker(&mut self, name: &str, start: i64, end: Option<i64>, data: MarkerPayload) {
        let name = self.string_array.intern(name);
        self.markers.push(name, start, end, 0, data);
    }
}

/// The sample table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Samples {
    weight_type: String,
    weight: Option<Vec<i64>>,
    /// Event delay per sample.
    pub event_delay: Vec<i64>,
    /// Stack index per sample.
    pub stack: Vec<usize>,
    /// Sample times, relative to the profile start.
    pub time: Vec<i64>,
    /// Number of samples.
    pub length: usize,
}

impl Default for Samples {
    fn default() -> Self {
        Samples {
            weight_type: "samples".to_string(),
            weight: None,
            event_delay: Vec::new(),
            stack: Vec::new(),
            time: Vec::new(),
            length: 0,
        }
    }
}

impl Samples {
    /// Two idle samples at `0` and `duration`, on the root stack.
    ///
    /// Nothing is actually sampled; this only gives the profiler a time range to display.
    pub fn spanning(duration: i64) -> Self {
        let time = vec![0, duration];
        Samples {
            event_delay: vec![0; time.len()],
            stack: vec![0; time.len()],
            length: time.len(),
            time,
            ..Default::default()
        }
    }
}

// The tables below describe a single "(root)" function with a single frame and stack, which is
// what the samples point at.

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct StackTable {
    frame: Vec<usize>,
    prefix: Vec<Option<usize>>,
    category: Vec<usize>,
    subcategory: Vec<usize>,
    length: usize,
}

impl StackTable {
    fn root() -> Self {
        StackTable {
            frame: vec![0],
            prefix: vec![None],
            category: vec![0],
            subcategory: vec![0],
            length: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FrameTable {
    address: Vec<i64>,
    inline_depth: Vec<u32>,
    category: Vec<Option<usize>>,
    subcategory: Vec<usize>,
    func: Vec<usize>,
    native_symbol: Vec<Option<usize>>,
    #[serde(rename = "innerWindowID")]
    inner_window_id: Vec<u64>,
    implementation: Vec<Option<String>>,
    line: Vec<Option<u32>>,
    column: Vec<Option<u32>>,
    length: usize,
}

impl FrameTable {
    fn root() -> Self {
        FrameTable {
            address: vec![-1],
            inline_depth: vec![0],
            category: vec![None],
            subcategory: vec![0],
            func: vec![0],
            native_symbol: vec![None],
            inner_window_id: vec![0],
            implementation: vec![None],
            line: vec![None],
            column: vec![None],
            length: 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FuncTable {
    #[serde(rename = "isJS")]
    is_js: Vec<bool>,
    #[serde(rename = "relevantForJS")]
    relevant_for_js: Vec<bool>,
    name: Vec<usize>,
    resource: Vec<i64>,
    file_name: Vec<Option<usize>>,
    line_number: Vec<Option<u32>>,
    column_number: Vec<Option<u32>>,
    length: usize,
}

impl FuncTable {
    fn root() -> Self {
        FuncTable {
            is_js: vec![false],
            relevant_for_js: vec![false],
            // index of ROOT in the string table
            name: vec![0],
            resource: vec![-1],
            file_name: vec![None],
            line_number: vec![None],
            column_number: vec![None],
            length: 1,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct ResourceTable {
    lib: Vec<usize>,
    name: Vec<usize>,
    host: Vec<Option<usize>>,
    #[serde(rename = "type")]
    kind: Vec<u32>,
    length: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NativeSymbols {
    lib_index: Vec<usize>,
    address: Vec<u64>,
    name: Vec<usize>,
    function_size: Vec<Option<u32>>,
    length: usize,
}
