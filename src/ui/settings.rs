/// Settings page: the configuration the app was started with
use iced::widget::{column, container, row, text};
use iced::{Element, Length};

use crate::config::Settings;
use crate::Message;

pub fn view(settings: &Settings) -> Element<'_, Message> {
    let timeout = settings
        .request_timeout
        .map_or_else(|| "transport default".to_string(), |t| format!("{}s", t.as_secs()));

    let entries = [
        ("API URL", settings.api_url.to_string()),
        ("Request timeout", timeout),
        ("Image list stale after", format!("{}s", settings.stale_time.as_secs())),
        ("Notifications visible for", format!("{}s", settings.toast_lifetime.as_secs())),
        ("Log filter", settings.log_filter.clone()),
    ];

    let rows = entries.into_iter().fold(column![].spacing(12), |list, (label, value)| {
        list.push(row![text(label).size(14).width(220).style(text::secondary), text(value).size(14)].spacing(16))
    });

    column![
        text("Settings").size(30),
        text("Edit the FACE_GALLERY_* environment variables or the .env file and restart to change these.")
            .size(14)
            .style(text::secondary),
        container(rows).padding(16).style(container::bordered_box).width(Length::Fill),
    ]
    .spacing(24)
    .padding(24)
    .into()
}
