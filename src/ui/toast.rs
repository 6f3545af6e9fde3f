/// Toast stack anchored to the bottom-right corner
use iced::widget::{button, column, container, row, text, Space};
use iced::{Alignment, Background, Border, Color, Element, Length, Theme};

use crate::state::notifications::{Notification, NotificationKind, Notifications};
use crate::Message;

const TOAST_WIDTH: f32 = 360.0;

pub fn view(notifications: &Notifications) -> Element<'_, Message> {
    let stack = notifications
        .iter()
        .fold(column![].spacing(8).width(TOAST_WIDTH), |list, n| list.push(toast(n)));

    container(stack)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(24)
        .align_right(Length::Fill)
        .align_bottom(Length::Fill)
        .into()
}

fn toast(notification: &Notification) -> Element<'_, Message> {
    let accent = match notification.kind {
        NotificationKind::Success => Color::from_rgb(34.0 / 255.0, 197.0 / 255.0, 94.0 / 255.0),
        NotificationKind::Failure => Color::from_rgb(239.0 / 255.0, 68.0 / 255.0, 68.0 / 255.0),
    };

    let stripe = container(Space::new(4, 40)).style(move |_: &Theme| container::Style {
        background: Some(Background::Color(accent)),
        border: Border {
            radius: 2.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    });

    let body = column![
        text(&notification.title).size(15),
        text(&notification.description).size(13).style(text::secondary),
    ]
    .spacing(4)
    .width(Length::Fill);

    let close = button(text("x").size(12))
        .on_press(Message::DismissToast(notification.id))
        .style(button::text)
        .padding([2, 6]);

    container(row![stripe, body, close].spacing(12).align_y(Alignment::Center))
        .padding(12)
        .width(Length::Fill)
        .style(|theme: &Theme| {
            let palette = theme.extended_palette();
            container::Style {
                background: Some(Background::Color(palette.background.weak.color)),
                text_color: Some(palette.background.weak.text),
                border: Border {
                    color: palette.background.strong.color,
                    width: 1.0,
                    radius: 8.0.into(),
                },
                ..container::Style::default()
            }
        })
        .into()
}
