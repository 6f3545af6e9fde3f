/// Dashboard page: header, search box and the image grid
use iced::widget::{button, column, container, image, row, scrollable, text, text_input, tooltip};
use iced::{Alignment, Background, Border, Color, ContentFit, Element, Length, Pixels, Theme};
use iced_aw::Wrap;

use crate::state::cache::QueryState;
use crate::state::gallery::{filter_urls, Gallery, Thumb};
use crate::Message;

const CARD_SIZE: f32 = 160.0;
const PINK_700: Color = Color::from_rgb(190.0 / 255.0, 24.0 / 255.0, 93.0 / 255.0);

pub fn view<'a>(gallery: &'a Gallery, images: QueryState<'a, Vec<String>>) -> Element<'a, Message> {
    let badge = container(text("IMG").size(16).color(PINK_700))
        .padding(12)
        .style(|_: &Theme| container::Style {
            background: Some(Background::Color(Color { a: 0.1, ..PINK_700 })),
            border: Border {
                radius: 6.0.into(),
                ..Border::default()
            },
            ..container::Style::default()
        });

    let header = row![
        badge,
        column![
            text("Face Recognition").size(30),
            text("Import your media files and let the app do the rest")
                .size(14)
                .style(text::secondary),
        ]
        .spacing(4),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    let toolbar = row![
        text_input("Search for images...", &gallery.search)
            .on_input(Message::SearchChanged)
            .padding(10)
            .width(Length::FillPortion(1)),
        container(
            button(text("Upload Media Files"))
                .on_press(Message::OpenUpload)
                .padding(10)
        )
        .width(Length::FillPortion(1))
        .align_right(Length::FillPortion(1)),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    column![header, toolbar, grid(gallery, images)]
        .spacing(32)
        .padding(24)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn grid<'a>(gallery: &'a Gallery, images: QueryState<'a, Vec<String>>) -> Element<'a, Message> {
    let mut sections = column![].spacing(16);

    if let Some(urls) = images.data {
        let cards: Vec<Element<'a, Message>> = filter_urls(urls, &gallery.search)
            .into_iter()
            .map(|url| card(gallery.thumb(url)))
            .collect();

        if cards.is_empty() {
            let message = if urls.is_empty() {
                "No images in the gallery yet."
            } else {
                "No images match your search."
            };
            sections = sections.push(text(message).style(text::secondary));
        } else {
            sections = sections.push(
                Wrap::with_elements(cards)
                    .spacing(Pixels(16.0))
                    .line_spacing(Pixels(16.0)),
            );
        }
    }

    if images.is_loading {
        sections = sections.push(text("Loading images...").style(text::secondary));
    } else if images.is_fetching {
        sections = sections.push(text("Refreshing...").size(12).style(text::secondary));
    }

    if images.is_error {
        let error = images.error.unwrap_or("unknown error");
        sections = sections.push(text(format!("Could not load images: {}", error)).style(text::danger));
    }

    scrollable(sections).height(Length::Fill).into()
}

fn card<'a>(thumb: Option<&'a Thumb>) -> Element<'a, Message> {
    let body: Element<'a, Message> = match thumb {
        Some(Thumb::Ready(handle)) => image(handle.clone())
            .width(CARD_SIZE)
            .height(CARD_SIZE)
            .content_fit(ContentFit::Cover)
            .into(),
        Some(Thumb::Failed(reason)) => tooltip(
            centered(text("Unavailable").size(12).style(text::danger).into()),
            container(text(reason).size(12)).padding(6).style(container::rounded_box),
            tooltip::Position::Bottom,
        )
        .into(),
        Some(Thumb::Loading) | None => centered(text("...").size(12).into()),
    };

    container(body)
        .width(CARD_SIZE)
        .height(CARD_SIZE)
        .style(container::bordered_box)
        .into()
}

fn centered<'a>(content: Element<'a, Message>) -> Element<'a, Message> {
    container(content)
        .center_x(CARD_SIZE)
        .center_y(CARD_SIZE)
        .into()
}
