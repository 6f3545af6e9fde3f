/// Dashboard shell: sidebar, navbar and content area
use iced::widget::{button, column, container, horizontal_space, mouse_area, row, stack, text, Space};
use iced::{Alignment, Background, Border, Color, Element, Length, Theme};

use crate::Message;

/// Sidebar width on wide windows
pub const SIDEBAR_WIDTH: f32 = 288.0;

/// Below this window width the sidebar hides behind the navbar toggle
pub const NARROW_BREAKPOINT: f32 = 768.0;

const SLATE_900: Color = Color::from_rgb(15.0 / 255.0, 23.0 / 255.0, 42.0 / 255.0);
const SKY_500: Color = Color::from_rgb(14.0 / 255.0, 165.0 / 255.0, 233.0 / 255.0);
const EMERALD_500: Color = Color::from_rgb(16.0 / 255.0, 185.0 / 255.0, 129.0 / 255.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Dashboard,
    Settings,
}

const ROUTES: [(Route, &str, Color); 2] = [
    (Route::Dashboard, "Dashboard", SKY_500),
    (Route::Settings, "Settings", EMERALD_500),
];

/// Compose the page: sidebar beside the content on wide windows,
/// or overlaid on demand on narrow ones.
pub fn shell<'a>(
    content: Element<'a, Message>,
    active: Route,
    narrow: bool,
    sidebar_open: bool,
) -> Element<'a, Message> {
    let main = column![navbar(narrow), content]
        .width(Length::Fill)
        .height(Length::Fill);

    if !narrow {
        return row![sidebar(active), main].into();
    }

    if sidebar_open {
        let dismiss = mouse_area(Space::new(Length::Fill, Length::Fill)).on_press(Message::ToggleSidebar);
        stack![main, row![sidebar(active), dismiss]].into()
    } else {
        main.into()
    }
}

fn sidebar<'a>(active: Route) -> Element<'a, Message> {
    let title = row![
        container(text("FR").size(14))
            .padding(6)
            .style(|_: &Theme| container::Style {
                background: Some(Background::Color(SKY_500)),
                text_color: Some(Color::WHITE),
                border: Border {
                    radius: 6.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            }),
        text("Face Recognition").size(20),
    ]
    .spacing(16)
    .align_y(Alignment::Center);

    let routes = ROUTES
        .iter()
        .fold(column![].spacing(4), |links, &(route, label, color)| {
            links.push(route_link(route, label, color, active == route))
        });

    container(column![title, Space::with_height(56), routes].padding([8, 12]))
        .width(SIDEBAR_WIDTH)
        .height(Length::Fill)
        .padding([16, 0])
        .style(|_: &Theme| container::Style {
            background: Some(Background::Color(SLATE_900)),
            text_color: Some(Color::WHITE),
            ..container::Style::default()
        })
        .into()
}

fn route_link<'a>(route: Route, label: &'a str, color: Color, selected: bool) -> Element<'a, Message> {
    let marker = container(Space::new(4, 18)).style(move |_: &Theme| container::Style {
        background: Some(Background::Color(color)),
        ..container::Style::default()
    });

    button(row![marker, text(label).size(14)].spacing(12).align_y(Alignment::Center))
        .on_press(Message::Navigate(route))
        .width(Length::Fill)
        .padding(12)
        .style(move |_: &Theme, status| {
            let highlighted = selected || matches!(status, button::Status::Hovered | button::Status::Pressed);
            button::Style {
                background: highlighted.then_some(Background::Color(Color { a: 0.1, ..Color::WHITE })),
                text_color: if highlighted {
                    Color::WHITE
                } else {
                    Color::from_rgb(148.0 / 255.0, 163.0 / 255.0, 184.0 / 255.0)
                },
                border: Border {
                    radius: 8.0.into(),
                    ..Border::default()
                },
                ..button::Style::default()
            }
        })
        .into()
}

fn navbar<'a>(narrow: bool) -> Element<'a, Message> {
    let toggle: Element<'a, Message> = if narrow {
        button(text("Menu").size(14))
            .on_press(Message::ToggleSidebar)
            .style(button::text)
            .into()
    } else {
        Space::with_width(0).into()
    };

    let avatar = container(text("HN").size(14))
        .padding([8, 10])
        .style(|theme: &Theme| {
            let palette = theme.extended_palette();
            container::Style {
                background: Some(Background::Color(palette.background.strong.color)),
                text_color: Some(palette.background.strong.text),
                border: Border {
                    radius: 18.0.into(),
                    ..Border::default()
                },
                ..container::Style::default()
            }
        });

    row![toggle, horizontal_space(), avatar]
        .padding(16)
        .align_y(Alignment::Center)
        .into()
}
