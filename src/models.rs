use serde::{Deserialize, Serialize};

/// Marker used for every field of the placeholder top performer.
pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub output_directory: String,
    pub site_title: String,
    pub stylesheet: String,
    pub script: String,
    pub write_index: bool,
    pub report: ReportOptions,
    pub meets: Vec<MeetEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeetEntry {
    pub input: String,
    // Derived from the input file stem when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Switches that cover every historical page format: the raw list, the
/// single-team subset, and the top-N pages with highlights.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    pub include_summary: bool,
    pub include_highlights: bool,
    pub interactive: bool,
    pub strict_team_rows: bool,
    pub min_result_fields: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            team_filter: None,
            max_results: None,
            include_summary: true,
            include_highlights: true,
            interactive: true,
            strict_team_rows: true,
            min_result_fields: 8,
        }
    }
}

impl ReportOptions {
    /// Cap on accepted runner rows. `max_results = 0` means no cap, the
    /// same as `--top 0`.
    pub fn result_limit(&self) -> Option<usize> {
        self.max_results.filter(|&n| n > 0)
    }

    /// Every row, no summary line, no highlights.
    pub fn raw_list() -> Self {
        Self {
            team_filter: None,
            max_results: None,
            include_summary: false,
            include_highlights: false,
            interactive: false,
            strict_team_rows: false,
            min_result_fields: 8,
        }
    }

    /// Only the rows mentioning one team.
    pub fn team_subset(team: &str) -> Self {
        Self {
            team_filter: Some(team.to_string()),
            ..Self::raw_list()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output_directory: "meets".to_string(),
            site_title: "Cross Country Results".to_string(),
            stylesheet: "../css/styles.css".to_string(),
            script: "../js/meet-scripts.js".to_string(),
            write_index: true,
            report: ReportOptions {
                max_results: Some(10),
                ..ReportOptions::default()
            },
            meets: vec![MeetEntry {
                input: "meets/37th_Early_Bird_Open_Mens_5000_Meters_HS_Open_5K_24.csv".to_string(),
                output: Some("early-bird.html".to_string()),
            }],
        }
    }
}

impl Config {
    pub fn load_from_file(file_path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(file_path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to_file(&self, file_path: &str) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(file_path, content)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeetInfo {
    pub name: String,
    pub date: String,
    pub source_url: String,
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamScore {
    pub place: String,
    pub team: String,
    pub score: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunnerResult {
    pub place: String,
    pub grade: String,
    pub name: String,
    pub time: String,
    pub team: String,
}

impl RunnerResult {
    pub fn not_available() -> Self {
        Self {
            place: NOT_AVAILABLE.to_string(),
            grade: NOT_AVAILABLE.to_string(),
            name: NOT_AVAILABLE.to_string(),
            time: NOT_AVAILABLE.to_string(),
            team: NOT_AVAILABLE.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self == &Self::not_available()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MeetReport {
    pub info: MeetInfo,
    pub team_scores: Vec<TeamScore>,
    pub runners: Vec<RunnerResult>,
    pub winning_team: Option<TeamScore>,
    pub top_performer: RunnerResult,
}
