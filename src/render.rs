//! HTML pages for meets and for the site index.
//!
//! Rendering is pure: no clock, no file access, so the same report always
//! produces the same bytes.

use crate::models::{Config, MeetReport, ReportOptions, RunnerResult, TeamScore};
use maud::{html, Markup, PreEscaped, DOCTYPE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub site_title: String,
    pub stylesheet: String,
    pub script: String,
    pub include_highlights: bool,
    pub interactive: bool,
    pub results_heading: String,
}

impl RenderOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            site_title: config.site_title.clone(),
            stylesheet: config.stylesheet.clone(),
            script: config.script.clone(),
            include_highlights: config.report.include_highlights,
            interactive: config.report.interactive,
            results_heading: results_heading(&config.report),
        }
    }
}

fn results_heading(options: &ReportOptions) -> String {
    match (&options.team_filter, options.result_limit()) {
        (Some(team), _) => format!("{} Results", team),
        (None, Some(n)) => format!("Top {} Finishers", n),
        (None, None) => "Individual Results".to_string(),
    }
}

/// One line of the site index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub name: String,
    pub date: String,
    pub winner: Option<String>,
    pub href: String,
}

fn page(title: &str, body_class: &str, options: &RenderOptions, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                link rel="stylesheet" href=(options.stylesheet);
            }
            body {
                header.header {
                    h1 { (title) }
                    nav.nav {
                        a href="index.html" { "Home" }
                        @if options.interactive {
                            button #theme-toggle .theme-toggle aria-label="Switch to dark mode" { "🌙" }
                        }
                    }
                }
                main class=(body_class) {
                    (content)
                }
                footer {
                    p { (PreEscaped("&copy; ")) (options.site_title) }
                }
                @if options.interactive {
                    script src=(options.script) {}
                }
            }
        }
    }
}

fn section(class: &str, heading: &str, options: &RenderOptions, content: Markup) -> Markup {
    html! {
        @if options.interactive {
            section class={ (class) " collapsible active" } {
                h2.collapsible-header { (heading) }
                div.collapsible-content { (content) }
            }
        } @else {
            section class=(class) {
                h2 { (heading) }
                div { (content) }
            }
        }
    }
}

fn table(columns: &[&str], rows: &[Vec<&str>]) -> Markup {
    html! {
        div.table-wrapper {
            table {
                thead {
                    tr {
                        @for column in columns {
                            th { (column) }
                        }
                    }
                }
                tbody {
                    @if rows.is_empty() {
                        tr.empty {
                            td colspan=(columns.len()) { "No results available" }
                        }
                    }
                    @for (i, cells) in rows.iter().enumerate() {
                        tr.first-place[i == 0] {
                            @for cell in cells {
                                td { (cell) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn highlights(winner: Option<&TeamScore>, top: &RunnerResult) -> Markup {
    html! {
        div.highlights {
            @if let Some(winner) = winner {
                div.highlight.winner {
                    h3 { "Team Champion" }
                    p { strong { (winner.team) } " with " (winner.score) " points" }
                }
            }
            div.highlight.top-performer {
                h3 { "Top Performer" }
                @if top.is_placeholder() {
                    p { (top.name) }
                } @else {
                    p { strong { (top.name) } " (" (top.team) ") " (top.time) }
                }
            }
        }
    }
}

fn overview(report: &MeetReport, options: &RenderOptions) -> Markup {
    let info = &report.info;
    let content = html! {
        p.meet-date { (info.date) }
        @if !info.source_url.is_empty() {
            p.meet-url {
                "Source: "
                a href=(info.source_url) target="_blank" rel="noopener" { "Athletic.net" }
            }
        }
        @if let Some(summary) = &info.summary {
            p.meet-summary { (summary) }
        }
        @if options.include_highlights {
            (highlights(report.winning_team.as_ref(), &report.top_performer))
        }
    };
    section("meet-info", "Meet Information", options, content)
}

pub fn render_meet_page(report: &MeetReport, options: &RenderOptions) -> String {
    let team_rows: Vec<Vec<&str>> = report
        .team_scores
        .iter()
        .map(|t| vec![t.place.as_str(), t.team.as_str(), t.score.as_str()])
        .collect();
    let runner_rows: Vec<Vec<&str>> = report
        .runners
        .iter()
        .map(|r| {
            vec![
                r.place.as_str(),
                r.name.as_str(),
                r.grade.as_str(),
                r.time.as_str(),
                r.team.as_str(),
            ]
        })
        .collect();

    let content = html! {
        (overview(report, options))
        (section("team-scores", "Team Scores", options, table(&["Place", "Team", "Score"], &team_rows)))
        (section(
            "results",
            &options.results_heading,
            options,
            table(&["Place", "Name", "Grade", "Time", "Team"], &runner_rows),
        ))
    };

    page(&report.info.name, "meet-content", options, content).into_string()
}

pub fn render_index(entries: &[IndexEntry], options: &RenderOptions) -> String {
    let content = html! {
        ul.meets {
            @for entry in entries {
                li.meet {
                    a href=(entry.href) { (entry.name) }
                    span.meet-date { (entry.date) }
                    @if let Some(winner) = &entry.winner {
                        span.meet-winner { "Winner: " (winner) }
                    }
                }
            }
            @if entries.is_empty() {
                li.empty { "No meets yet" }
            }
        }
    };

    page(&options.site_title, "meet-list", options, content).into_string()
}
