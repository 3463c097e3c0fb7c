use crate::models::{MeetInfo, MeetReport, ReportOptions, RunnerResult, TeamScore};
use crate::parser::{MeetParser, ParsedMeet};

/// Turns the text of one meet file into a [`MeetReport`].
pub struct MeetReportBuilder {
    parser: MeetParser,
}

impl MeetReportBuilder {
    pub fn new(options: ReportOptions) -> Self {
        Self {
            parser: MeetParser::new(options),
        }
    }

    /// Never fails: a file with no recognisable sections still gives a
    /// report, just an empty one.
    pub fn build(&self, content: &str) -> MeetReport {
        let ParsedMeet {
            info,
            team_scores,
            runners,
        } = self.parser.parse_content(content);
        assemble(info, team_scores, runners)
    }
}

pub fn assemble(info: MeetInfo, team_scores: Vec<TeamScore>, runners: Vec<RunnerResult>) -> MeetReport {
    let winning_team = team_scores.first().cloned();
    let top_performer = runners
        .first()
        .cloned()
        .unwrap_or_else(RunnerResult::not_available);

    MeetReport {
        info,
        team_scores,
        runners,
        winning_team,
        top_performer,
    }
}
