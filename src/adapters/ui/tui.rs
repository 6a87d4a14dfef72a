//! Implements InputPort. Inquire-based interactive prompts.
//!
//! Main menu -> promote an upcoming event or recap a past one. Talks to the
//! application only through [`Actions`], so every failure arrives as a short
//! message that is printed and the menu comes back.

use crate::domain::{
    DomainError, EventDetails, ExtractEventDetailsRequest, HashtagRequest, Platform, RecapRequest,
    SocialPostRequest, SocialPostSet, Tone,
};
use crate::domain::validation::{MIN_AUDIENCE_CHARS, MIN_DESCRIPTION_CHARS, MIN_TITLE_CHARS};
use crate::ports::{InputPort, PostExportPort};
use crate::usecases::{ActionResult, Actions};
use crate::adapters::ui::progress::with_spinner;
use async_trait::async_trait;
use crossterm::style::Stylize;
use inquire::error::InquireError;
use inquire::list_option::ListOption;
use inquire::ui::{Color, RenderConfig, StyleSheet, Styled};
use inquire::validator::{MinLengthValidator, ValueRequiredValidator, Validation};
use inquire::{Confirm, MultiSelect, Select, Text};
use std::sync::Arc;
use tracing::info;

const MENU_PROMOTE: &str = "Promote an event";
const MENU_RECAP: &str = "Recap an event";
const MENU_EXIT: &str = "Exit";

const CANCELLED: &str = "cancelled";
const INTERRUPTED: &str = "interrupted";

/// Applies the color theme to all subsequent inquire prompts.
pub fn apply_theme() {
    let config = RenderConfig::default_colored()
        .with_prompt_prefix(Styled::new("✦").with_fg(Color::LightMagenta))
        .with_answered_prompt_prefix(Styled::new("✔").with_fg(Color::LightYellow))
        .with_highlighted_option_prefix(Styled::new("➤").with_fg(Color::LightMagenta))
        .with_selected_checkbox(Styled::new("[x]").with_fg(Color::LightYellow))
        .with_help_message(StyleSheet::new().with_fg(Color::DarkGrey));
    inquire::set_global_render_config(config);
}

fn ui_err(e: InquireError) -> DomainError {
    match e {
        InquireError::OperationCanceled => DomainError::Ui(CANCELLED.to_string()),
        InquireError::OperationInterrupted => DomainError::Ui(INTERRUPTED.to_string()),
        other => DomainError::Ui(other.to_string()),
    }
}

fn print_error(message: &str) {
    println!("{}", message.red());
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    actions: Arc<Actions>,
    exporter: Arc<dyn PostExportPort>,
}

impl TuiInputPort {
    pub fn new(actions: Arc<Actions>, exporter: Arc<dyn PostExportPort>) -> Self {
        Self { actions, exporter }
    }

    async fn promote(&self) -> Result<(), DomainError> {
        let imported = if Confirm::new("Import details from an event page?")
            .with_default(false)
            .prompt()
            .map_err(ui_err)?
        {
            self.import_details().await?
        } else {
            EventDetails::default()
        };

        let title = Text::new("Event title:")
            .with_initial_value(imported.title.as_deref().unwrap_or_default())
            .with_validator(
                MinLengthValidator::new(MIN_TITLE_CHARS)
                    .with_message("Title must be at least 5 characters."),
            )
            .prompt()
            .map_err(ui_err)?;
        let description = Text::new("Description:")
            .with_initial_value(imported.description.as_deref().unwrap_or_default())
            .with_validator(
                MinLengthValidator::new(MIN_DESCRIPTION_CHARS)
                    .with_message("Description must be at least 20 characters."),
            )
            .prompt()
            .map_err(ui_err)?;
        let date = Text::new("Date:")
            .with_initial_value(&prefill_date(&imported))
            .with_placeholder("YYYY-MM-DD")
            .with_validator(ValueRequiredValidator::new("Date is required."))
            .prompt()
            .map_err(ui_err)?;
        let time = Text::new("Time:")
            .with_initial_value(imported.time.as_deref().unwrap_or_default())
            .with_placeholder("HH:MM")
            .with_validator(ValueRequiredValidator::new("Time is required."))
            .prompt()
            .map_err(ui_err)?;
        let target_audience = Text::new("Target audience:")
            .with_placeholder("e.g. Developers, Students")
            .with_validator(
                MinLengthValidator::new(MIN_AUDIENCE_CHARS)
                    .with_message("Target audience is required."),
            )
            .prompt()
            .map_err(ui_err)?;
        let tone = Select::new("Tone:", Tone::ALL.to_vec())
            .with_starting_cursor(1)
            .prompt()
            .map_err(ui_err)?;
        let platforms = MultiSelect::new("Platforms:", Platform::ALL.to_vec())
            .with_all_selected_by_default()
            .with_validator(|selected: &[ListOption<&Platform>]| {
                if selected.is_empty() {
                    Ok(Validation::Invalid(
                        "You have to select at least one platform.".into(),
                    ))
                } else {
                    Ok(Validation::Valid)
                }
            })
            .prompt()
            .map_err(ui_err)?;

        let suggested = self
            .suggest_hashtags(&title, &description, &target_audience, tone)
            .await?;
        let hashtags = Text::new("Hashtags (comma separated):")
            .with_initial_value(&suggested)
            .prompt()
            .map_err(ui_err)?;

        let request = SocialPostRequest {
            title: title.clone(),
            description,
            date,
            time,
            target_audience,
            tone,
            platforms: platforms.clone(),
            hashtags,
        };
        let result = with_spinner(
            "Generating posts...",
            self.actions.generate_social_posts(request),
        )
        .await;

        match result {
            ActionResult::Data(posts) => {
                print_posts(&posts, &platforms);
                if !posts.is_empty() {
                    self.offer_post_export(&title, &posts).await?;
                }
            }
            ActionResult::Error(message) => print_error(&message),
        }
        Ok(())
    }

    /// Ask for a URL and run extraction. A failed import falls back to empty
    /// fields instead of aborting the flow.
    async fn import_details(&self) -> Result<EventDetails, DomainError> {
        let url = Text::new("Event page URL:")
            .with_placeholder("https://...")
            .with_validator(ValueRequiredValidator::new("URL is required."))
            .prompt()
            .map_err(ui_err)?;

        let result = with_spinner(
            "Reading the event page...",
            self.actions
                .extract_event_details(ExtractEventDetailsRequest::new(url.trim())),
        )
        .await;

        match result {
            ActionResult::Data(details) => {
                println!("{}", "Imported event details:".bold());
                for (label, value) in preview_lines(&details) {
                    println!("  {:<14}{}", label.dark_grey(), value);
                }
                println!();
                Ok(details)
            }
            ActionResult::Error(message) => {
                print_error(&message);
                println!("Continuing with empty fields.");
                Ok(EventDetails::default())
            }
        }
    }

    async fn suggest_hashtags(
        &self,
        title: &str,
        description: &str,
        target_audience: &str,
        tone: Tone,
    ) -> Result<String, DomainError> {
        if !Confirm::new("Suggest hashtags?")
            .with_default(true)
            .prompt()
            .map_err(ui_err)?
        {
            return Ok(String::new());
        }

        let request = HashtagRequest {
            event_title: title.to_string(),
            event_description: description.to_string(),
            target_audience: target_audience.to_string(),
            tone,
        };
        match with_spinner("Finding hashtags...", self.actions.suggest_hashtags(request)).await {
            ActionResult::Data(suggestions) => Ok(suggestions.joined()),
            ActionResult::Error(message) => {
                print_error(&message);
                Ok(String::new())
            }
        }
    }

    async fn recap(&self) -> Result<(), DomainError> {
        let event_description = Text::new("What happened at the event?")
            .with_help_message("Attendance, highlights, speakers, thank-yous")
            .with_validator(
                MinLengthValidator::new(MIN_DESCRIPTION_CHARS)
                    .with_message("Description must be at least 20 characters."),
            )
            .prompt()
            .map_err(ui_err)?;

        let result = with_spinner(
            "Writing the recap...",
            self.actions
                .generate_recap_post(RecapRequest { event_description }),
        )
        .await;

        match result {
            ActionResult::Data(recap) => {
                println!();
                println!(
                    "{}",
                    format!("Recap ({} chars)", recap.recap_post.chars().count()).bold()
                );
                println!("{}", recap.recap_post);
                println!();
                if Confirm::new("Export to Markdown?")
                    .with_default(false)
                    .prompt()
                    .map_err(ui_err)?
                {
                    report_export(self.exporter.export_recap(&recap).await);
                }
            }
            ActionResult::Error(message) => print_error(&message),
        }
        Ok(())
    }

    async fn offer_post_export(&self, title: &str, posts: &SocialPostSet) -> Result<(), DomainError> {
        if Confirm::new("Export to Markdown?")
            .with_default(false)
            .prompt()
            .map_err(ui_err)?
        {
            report_export(self.exporter.export_posts(title, posts).await);
        }
        Ok(())
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let choice = match Select::new(
                "What would you like to do?",
                vec![MENU_PROMOTE, MENU_RECAP, MENU_EXIT],
            )
            .prompt()
            {
                Ok(choice) => choice,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    return Ok(());
                }
                Err(e) => return Err(ui_err(e)),
            };

            let outcome = match choice {
                MENU_PROMOTE => self.promote().await,
                MENU_RECAP => self.recap().await,
                _ => return Ok(()),
            };

            match outcome {
                Ok(()) => {}
                Err(DomainError::Ui(reason)) if reason == CANCELLED => {
                    println!("{}", "Cancelled.".dark_grey());
                }
                Err(DomainError::Ui(reason)) if reason == INTERRUPTED => {
                    info!("interrupted, leaving");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
            println!();
        }
    }
}

fn report_export(result: Result<std::path::PathBuf, DomainError>) {
    match result {
        Ok(path) => println!("Saved to {}", path.display().to_string().green()),
        Err(e) => print_error(&e.to_string()),
    }
}

/// Date prompt prefill. Normalized when the model returned a real date.
fn prefill_date(details: &EventDetails) -> String {
    match details.parsed_date() {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => details.date.clone().unwrap_or_default(),
    }
}

/// `(label, value)` rows for the imported-details card. Absent fields skipped.
fn preview_lines(details: &EventDetails) -> Vec<(&'static str, String)> {
    [
        ("Title", &details.title),
        ("Date", &details.date),
        ("Time", &details.time),
        ("Location", &details.location),
        ("Image", &details.image_url),
        ("Registration", &details.registration_url),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| (label, v.clone())))
    .collect()
}

/// Heading for one generated post: platform display name and char count.
fn post_heading(key: &str, post: &str) -> String {
    let name = Platform::from_id(key)
        .map(|p| p.display_name().to_string())
        .unwrap_or_else(|| key.to_string());
    format!("{} ({} chars)", name, post.chars().count())
}

fn print_posts(posts: &SocialPostSet, requested: &[Platform]) {
    println!();
    for (key, post) in posts.iter() {
        println!("{}", post_heading(key, post).bold().magenta());
        println!("{}", post);
        println!();
    }
    let missing = posts.missing_platforms(requested);
    if !missing.is_empty() {
        let names: Vec<&str> = missing.iter().map(|p| p.display_name()).collect();
        println!(
            "{}",
            format!("No post was generated for: {}", names.join(", ")).yellow()
        );
    }
}
