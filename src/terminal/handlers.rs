// Command handlers
//
// Bodies of the built-in commands plus the markup for lookup results and
// the API failure box. Everything interpolated into markup is escaped.

use crate::config::themes::theme_names;
use crate::config::ApiConfig;
use crate::providers::{LookupKind, ProfileData, ProfileQuery};

use super::command::{Command, InfoPage};
use super::escape::escape_html;
use super::mode::{MediaRef, Transition};
use super::session::{LookupRequest, TerminalSession};
use super::transcript::LineStyle;

const LOADING_MARKUP: &str = "Loading...";

impl TerminalSession {
    /// Run a parsed command. Returns the lookup the host must perform, if any.
    pub fn execute(&mut self, command: Command) -> Option<LookupRequest> {
        match command {
            Command::Help => self.show_help(),
            Command::Clear { history: false } => self.transcript.clear(),
            Command::Clear { history: true } => {
                self.history.clear();
                self.transcript.push("Command history cleared.", LineStyle::Dim);
            }
            Command::Theme { name } => self.change_theme(name.as_deref()),
            Command::History => self.show_history(),
            Command::Mount { cartridge } => self.mount_cartridge(cartridge.as_deref()),
            Command::Eject => {
                if self.eject() == Transition::NotMounted {
                    self.transcript.push("No cartridge mounted.", LineStyle::Dim);
                }
            }
            Command::Sudo { command } => {
                let attempted = command.join(" ");
                tracing::debug!("sudo attempted: {}", attempted);
                self.transcript.push(
                    "Permission denied: visitor is not in the sudoers file. This incident will be reported.",
                    LineStyle::Error,
                );
            }
            Command::Info(page) => {
                for line in info_page(&self.profile, page) {
                    self.transcript.push(line, LineStyle::Plain);
                }
            }
            Command::Lookup(kind) => return self.start_lookup(kind),
        }
        None
    }

    fn show_help(&mut self) {
        let rows: Vec<(String, &'static str)> = self
            .registry
            .all_commands()
            .iter()
            .map(|spec| (spec.full_syntax(), spec.description))
            .collect();
        let width = rows.iter().map(|(syntax, _)| syntax.len()).max().unwrap_or(0);

        self.transcript.push("Available commands:", LineStyle::Plain);
        for (syntax, description) in rows {
            self.transcript.push(
                format!(
                    "  <span class=\"accent\">{:<width$}</span>  {}",
                    escape_html(&syntax),
                    escape_html(description),
                    width = width
                ),
                LineStyle::Plain,
            );
        }
    }

    fn change_theme(&mut self, name: Option<&str>) {
        let Some(name) = name else {
            self.transcript.push(
                format!("Available themes: {}", theme_names()),
                LineStyle::Plain,
            );
            return;
        };

        match self.set_theme(name) {
            Ok(theme) => {
                tracing::debug!("Theme changed to {}", theme.name);
                self.transcript
                    .push(format!("Theme set to {}.", theme.name), LineStyle::Plain);
            }
            Err(_) => {
                self.transcript.push(
                    format!(
                        "Unknown theme: {}. Available: {}",
                        escape_html(name),
                        theme_names()
                    ),
                    LineStyle::Error,
                );
            }
        }
    }

    fn show_history(&mut self) {
        let lines: Vec<String> = self
            .history
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| format!("{:>4}  {}", i + 1, escape_html(entry)))
            .collect();

        for line in lines {
            self.transcript.push(line, LineStyle::Plain);
        }
    }

    fn mount_cartridge(&mut self, name: Option<&str>) {
        let media: Option<MediaRef> = self.cartridge(name).cloned();
        match media {
            Some(media) => {
                self.mount(media);
            }
            None if self.cartridges.is_empty() => {
                self.transcript
                    .push("No cartridges configured.", LineStyle::Error);
            }
            None => {
                let available: Vec<&str> =
                    self.cartridges.iter().map(|c| c.name.as_str()).collect();
                let line = format!(
                    "Unknown cartridge: {}. Available: {}",
                    escape_html(name.unwrap_or_default()),
                    escape_html(&available.join(", "))
                );
                self.transcript.push(line, LineStyle::Error);
            }
        }
    }

    /// Serve a lookup from the cache, or reserve a loading line and hand the
    /// fetch to the host
    fn start_lookup(&mut self, kind: LookupKind) -> Option<LookupRequest> {
        let name = kind.command_name();
        if let Some(cached) = self.cache.get(name) {
            tracing::debug!("Serving '{}' from cache", name);
            self.transcript.push(cached, LineStyle::Plain);
            return None;
        }

        let handle = match kind {
            LookupKind::Projects | LookupKind::Stats => self.profile.github.clone(),
            LookupKind::Rating => self.profile.codeforces.clone(),
        };
        let anchor = self.transcript.push(LOADING_MARKUP, LineStyle::Loading);

        Some(LookupRequest {
            anchor,
            query: ProfileQuery { kind, handle },
        })
    }
}

/// Lines of a static informational page
pub fn info_page(profile: &crate::config::ProfileConfig, page: InfoPage) -> Vec<String> {
    let linkedin = escape_html(&profile.linkedin);
    let kaggle = escape_html(&profile.kaggle);

    match page {
        InfoPage::Contact => {
            let email = escape_html(&profile.email);
            let github = escape_html(&profile.github);
            vec![
                format!("Email: <a href=\"mailto:{0}\">{0}</a>", email),
                format!(
                    "GitHub: <a href=\"https://github.com/{0}\" target=\"_blank\">github.com/{0}</a>",
                    github
                ),
                format!(
                    "LinkedIn: <a href=\"https://linkedin.com/in/{0}\" target=\"_blank\">linkedin.com/in/{0}</a>",
                    linkedin
                ),
                format!(
                    "Kaggle: <a href=\"https://kaggle.com/{0}\" target=\"_blank\">kaggle.com/{0}</a>",
                    kaggle
                ),
            ]
        }
        InfoPage::Resume => vec![format!(
            "<a href=\"https://linkedin.com/in/{}\" target=\"_blank\">View Resume (LinkedIn)</a>",
            linkedin
        )],
        InfoPage::Experience => vec![format!(
            "<a href=\"https://linkedin.com/in/{}/details/experience/\" target=\"_blank\">View Experience</a>",
            linkedin
        )],
        InfoPage::Kaggle => vec![format!(
            "<a href=\"https://kaggle.com/{0}\" target=\"_blank\">kaggle.com/{0}</a>",
            kaggle
        )],
        InfoPage::Research => vec![format!(
            "<a href=\"https://arxiv.org/search/?query={}&amp;searchtype=author\" target=\"_blank\">View arXiv Publications</a>",
            escape_html(&profile.arxiv_name)
        )],
    }
}

/// Markup for a successful lookup
pub fn format_profile_data(data: &ProfileData) -> String {
    match data {
        ProfileData::Repositories(repos) if repos.is_empty() => {
            "<div class=\"dim\">No public repositories.</div>".to_string()
        }
        ProfileData::Repositories(repos) => repos
            .iter()
            .map(|repo| {
                format!(
                    "<div><span class=\"accent\">{}</span> ★{}</div><div class=\"dim\">{}</div>",
                    escape_html(&repo.name),
                    repo.stars,
                    escape_html(repo.description.as_deref().unwrap_or("No description"))
                )
            })
            .collect(),
        ProfileData::Languages(languages) if languages.is_empty() => {
            "<div class=\"dim\">No language data.</div>".to_string()
        }
        ProfileData::Languages(languages) => languages
            .iter()
            .map(|count| {
                format!(
                    "<div><span class=\"accent\">{}</span>: {} repos</div>",
                    escape_html(&count.language),
                    count.repos
                )
            })
            .collect(),
        ProfileData::Rating(summary) => {
            let or_na = |value: Option<i64>| {
                value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
            };
            format!(
                "<div>Handle: <span class=\"accent\">{}</span></div><div>Rank: {}</div><div>Rating: {} (Max: {})</div>",
                escape_html(&summary.handle),
                escape_html(summary.rank.as_deref().unwrap_or("Unrated")),
                or_na(summary.rating),
                or_na(summary.max_rating)
            )
        }
    }
}

/// Endpoint shown in the failure box as a curl hint
pub fn curl_hint(api: &ApiConfig, query: &ProfileQuery) -> String {
    match query.kind {
        LookupKind::Projects | LookupKind::Stats => format!(
            "curl {}/users/{}/repos",
            api.github_base_url.trim_end_matches('/'),
            query.handle
        ),
        LookupKind::Rating => format!(
            "curl {}/api/user.info?handles={}",
            api.codeforces_base_url.trim_end_matches('/'),
            query.handle
        ),
    }
}

/// Public profile page for the failure box link
pub fn profile_url(query: &ProfileQuery) -> String {
    match query.kind {
        LookupKind::Projects | LookupKind::Stats => format!("https://github.com/{}", query.handle),
        LookupKind::Rating => format!("https://codeforces.com/profile/{}", query.handle),
    }
}

/// Failure box: notice, curl hint and browser link
pub fn api_unavailable(api: &ApiConfig, query: &ProfileQuery) -> String {
    format!(
        "<div class=\"error-box\">API unavailable.<br><span class=\"dim\">{}</span><br><a href=\"{}\" target=\"_blank\">Open in browser →</a></div>",
        escape_html(&curl_hint(api, query)),
        escape_html(&profile_url(query))
    )
}
