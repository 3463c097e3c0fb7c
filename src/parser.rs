use crate::models::{MeetInfo, ReportOptions, RunnerResult, TeamScore};
use log::debug;

/// Line that opens the team standings block.
pub const TEAM_SCORES_MARKER: &str = "Place,Team,Score";
/// Line that opens the individual results block.
pub const RESULTS_MARKER: &str = "Place,Grade,Name,Athlete Link";

const HEADER_LINES: usize = 3;

// Team standings columns
const TEAM_PLACE: usize = 0;
const TEAM_NAME: usize = 1;
const TEAM_SCORE: usize = 2;
const TEAM_MIN_FIELDS: usize = 3;

// Individual result columns. Column 3 holds the athlete profile link and
// everything after the team column is not surfaced.
const RUNNER_PLACE: usize = 0;
const RUNNER_GRADE: usize = 1;
const RUNNER_NAME: usize = 2;
const RUNNER_TIME: usize = 4;
const RUNNER_TEAM: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Header,
    SeekTeamMarker,
    TeamRows,
    SeekResultsMarker,
    ResultRows,
    Done,
}

/// Raw lines of a meet file split into their blocks. Lines are trimmed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Segments<'a> {
    pub header: Vec<&'a str>,
    pub summary: Option<&'a str>,
    pub team_rows: Vec<&'a str>,
    pub result_rows: Vec<&'a str>,
}

struct Segmenter<'a> {
    state: Section,
    include_summary: bool,
    segments: Segments<'a>,
}

impl<'a> Segmenter<'a> {
    fn new(include_summary: bool) -> Self {
        Self {
            state: Section::Header,
            include_summary,
            segments: Segments::default(),
        }
    }

    fn feed(&mut self, line: &'a str) {
        self.state = match self.state {
            Section::Header => self.header_line(line),
            Section::SeekTeamMarker => Self::seek_team_marker(line),
            Section::TeamRows => {
                if line.contains(RESULTS_MARKER) {
                    Section::ResultRows
                } else if line.is_empty() {
                    Section::SeekResultsMarker
                } else {
                    self.segments.team_rows.push(line);
                    Section::TeamRows
                }
            }
            Section::SeekResultsMarker => {
                if line.contains(RESULTS_MARKER) {
                    Section::ResultRows
                } else {
                    Section::SeekResultsMarker
                }
            }
            Section::ResultRows => {
                if line.is_empty() {
                    Section::Done
                } else {
                    self.segments.result_rows.push(line);
                    Section::ResultRows
                }
            }
            Section::Done => Section::Done,
        };
    }

    fn header_line(&mut self, line: &'a str) -> Section {
        if self.segments.header.len() < HEADER_LINES {
            self.segments.header.push(line);
            if self.segments.header.len() == HEADER_LINES && !self.include_summary {
                return Section::SeekTeamMarker;
            }
            return Section::Header;
        }

        // Files in the older layout have no summary line; hand the line to
        // the marker search instead of swallowing it.
        if line.is_empty() || line.contains(TEAM_SCORES_MARKER) || line.contains(RESULTS_MARKER) {
            return Self::seek_team_marker(line);
        }
        self.segments.summary = Some(line);
        Section::SeekTeamMarker
    }

    fn seek_team_marker(line: &str) -> Section {
        if line.contains(RESULTS_MARKER) {
            // Results came first: the standings block is empty.
            Section::ResultRows
        } else if line.contains(TEAM_SCORES_MARKER) {
            Section::TeamRows
        } else {
            Section::SeekTeamMarker
        }
    }
}

/// Single pass over the file, first marker match wins, and nothing is
/// searched for once the results block has ended.
pub fn segment(content: &str, include_summary: bool) -> Segments<'_> {
    let mut segmenter = Segmenter::new(include_summary);
    for line in content.lines() {
        segmenter.feed(line.trim());
        if segmenter.state == Section::Done {
            break;
        }
    }
    segmenter.segments
}

/// Everything the parser pulled out of one meet file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMeet {
    pub info: MeetInfo,
    pub team_scores: Vec<TeamScore>,
    pub runners: Vec<RunnerResult>,
}

pub struct MeetParser {
    options: ReportOptions,
}

impl MeetParser {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn parse_content(&self, content: &str) -> ParsedMeet {
        let segments = segment(content, self.options.include_summary);

        let info = self.extract_meet_info(&segments);
        let team_scores = self.extract_team_scores(&segments.team_rows);
        let runners = self.extract_runner_results(&segments.result_rows);

        debug!(
            "parsed '{}': {} team rows kept of {}, {} runners kept of {}",
            info.name,
            team_scores.len(),
            segments.team_rows.len(),
            runners.len(),
            segments.result_rows.len()
        );

        ParsedMeet {
            info,
            team_scores,
            runners,
        }
    }

    fn extract_meet_info(&self, segments: &Segments<'_>) -> MeetInfo {
        let header = |i: usize| segments.header.get(i).copied().unwrap_or_default().to_string();
        MeetInfo {
            name: header(0),
            date: header(1),
            source_url: header(2),
            summary: segments.summary.map(str::to_string),
        }
    }

    fn extract_team_scores(&self, rows: &[&str]) -> Vec<TeamScore> {
        let mut scores = Vec::new();

        for line in rows {
            let Some(fields) = split_row(line) else {
                continue;
            };
            if fields.len() < TEAM_MIN_FIELDS {
                debug!("skipping short team row: {}", line);
                continue;
            }

            let place = &fields[TEAM_PLACE];
            if self.options.strict_team_rows && !starts_with_digit(place) {
                debug!("skipping team row without a numeric place: {}", line);
                continue;
            }

            scores.push(TeamScore {
                place: place.to_string(),
                team: fields[TEAM_NAME].to_string(),
                score: fields[TEAM_SCORE].to_string(),
            });
        }

        scores
    }

    fn extract_runner_results(&self, rows: &[&str]) -> Vec<RunnerResult> {
        let limit = self.options.result_limit().unwrap_or(usize::MAX);
        let min_fields = self.options.min_result_fields.max(RUNNER_TEAM + 1);
        let mut runners = Vec::new();

        for line in rows {
            if runners.len() >= limit {
                break;
            }
            if let Some(team) = &self.options.team_filter {
                if !line.contains(team.as_str()) {
                    continue;
                }
            }

            let Some(fields) = split_row(line) else {
                continue;
            };
            if fields.len() < min_fields {
                debug!("skipping short result row ({} fields): {}", fields.len(), line);
                continue;
            }

            runners.push(RunnerResult {
                place: strip_place(&fields[RUNNER_PLACE]),
                grade: fields[RUNNER_GRADE].to_string(),
                name: fields[RUNNER_NAME].to_string(),
                time: fields[RUNNER_TIME].to_string(),
                team: fields[RUNNER_TEAM].to_string(),
            });
        }

        runners
    }
}

fn split_row(line: &str) -> Option<csv::StringRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(Ok(record)) => Some(record),
        Some(Err(e)) => {
            debug!("skipping unreadable row '{}': {}", line, e);
            None
        }
        None => None,
    }
}

fn starts_with_digit(field: &str) -> bool {
    field.chars().next().is_some_and(|c| c.is_ascii_digit())
}

/// `"1."` becomes `"1"`; only one trailing period is removed.
pub fn strip_place(place: &str) -> String {
    place.strip_suffix('.').unwrap_or(place).to_string()
}
