use chrono::Utc;
use iced::widget::{button, center, column, container, horizontal_space, mouse_area, opaque, row, stack, text};
use iced::{event, window, Color, Element, Event, Length, Subscription, Task, Theme};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

mod api;
mod config;
mod error;
mod format;
mod media;
mod state;
mod ui;

use api::transfer::{self, TransferEvent};
use api::{ApiClient, ImageList};
use config::Settings;
use error::ApiError;
use format::{format_file_size, SizeUnit};
use media::preview::Thumbnail;
use state::cache::{FetchTicket, QueryCache, QueryKey};
use state::data::MediaFile;
use state::gallery::Gallery;
use state::mutation::{MutationEffect, UploadMutation};
use state::notifications::Notifications;
use ui::layout::{Route, NARROW_BREAKPOINT};
use ui::upload::{Action, UploadDialog};

const WINDOW_WIDTH: f32 = 1280.0;
const WINDOW_HEIGHT: f32 = 800.0;
const TOAST_TICK: Duration = Duration::from_millis(500);
const MODAL_WIDTH: f32 = 640.0;

/// Main application state
struct FaceGallery {
    settings: Settings,
    client: ApiClient,
    /// Server-owned data, keyed by query
    cache: QueryCache<Vec<String>>,
    gallery: Gallery,
    upload: UploadDialog,
    upload_open: bool,
    mutation: UploadMutation,
    notifications: Notifications,
    route: Route,
    window_width: f32,
    sidebar_open: bool,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    Navigate(Route),
    ToggleSidebar,
    SearchChanged(String),
    OpenUpload,
    CloseUpload,
    Upload(ui::upload::Message),
    ImagesFetched(FetchTicket, Result<ImageList, ApiError>),
    ThumbnailLoaded(String, Result<Thumbnail, String>),
    Transfer(TransferEvent),
    DismissToast(u64),
    Tick(Instant),
    Window(window::Event),
}

impl FaceGallery {
    /// Create the application and issue the initial image-list fetch
    fn new(settings: Settings, client: ApiClient) -> (Self, Task<Message>) {
        tracing::info!(api = %client.base_url(), "Face gallery starting");

        let mut app = FaceGallery {
            cache: QueryCache::new(settings.stale_time),
            notifications: Notifications::new(settings.toast_lifetime),
            settings,
            client,
            gallery: Gallery::new(),
            upload: UploadDialog::new(),
            upload_open: false,
            mutation: UploadMutation::new(),
            route: Route::default(),
            window_width: WINDOW_WIDTH,
            sidebar_open: false,
        };

        let fetch = app.fetch_images();
        (app, fetch)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Navigate(route) => {
                self.route = route;
                self.sidebar_open = false;
                Task::none()
            }
            Message::ToggleSidebar => {
                self.sidebar_open = !self.sidebar_open;
                Task::none()
            }
            Message::SearchChanged(query) => {
                self.gallery.search = query;
                Task::none()
            }
            Message::OpenUpload => {
                self.upload_open = true;
                Task::none()
            }
            Message::CloseUpload => {
                self.upload_open = false;
                Task::none()
            }
            Message::Upload(message) => self.forward(message),
            Message::ImagesFetched(ticket, result) => {
                let result = result.map(|list| list.image_urls).map_err(|err| {
                    tracing::warn!(error = %err, "Image list fetch failed");
                    err.detail()
                });

                let refetch = self.cache.complete(ticket, result, Instant::now());

                let missing = match self.cache.state(QueryKey::IMAGES).data {
                    Some(urls) => self.gallery.sync(urls),
                    None => Vec::new(),
                };

                let mut tasks = Vec::with_capacity(2);
                if !missing.is_empty() {
                    tracing::debug!(count = missing.len(), "Downloading gallery thumbnails");
                    tasks.push(Task::run(
                        transfer::thumbnails(self.client.clone(), missing),
                        |(url, result)| Message::ThumbnailLoaded(url, result),
                    ));
                }

                if refetch {
                    tasks.push(self.fetch_images());
                }
                Task::batch(tasks)
            }
            Message::ThumbnailLoaded(url, result) => {
                self.gallery.thumb_loaded(&url, result.map(Thumbnail::into_handle));
                Task::none()
            }
            Message::Transfer(TransferEvent::Progress(progress)) => {
                self.mutation.progress(progress);
                Task::none()
            }
            Message::Transfer(TransferEvent::Finished(result)) => {
                if result.is_ok() {
                    tracing::info!("Upload finished");
                }
                let effects = self.mutation.settle(result, Utc::now());
                self.apply_effects(effects)
            }
            Message::DismissToast(id) => {
                self.notifications.dismiss(id);
                Task::none()
            }
            Message::Tick(now) => {
                self.notifications.expire(now);
                Task::none()
            }
            Message::Window(event) => self.window_event(event),
        }
    }

    /// Route a dialog message and carry out what it asks for
    fn forward(&mut self, message: ui::upload::Message) -> Task<Message> {
        match self.upload.update(message) {
            Action::None => Task::none(),
            Action::Run(task) => task.map(Message::Upload),
            Action::Submit(file) => self.submit(file),
        }
    }

    /// idle → pending: stream the upload and report its events back
    fn submit(&mut self, file: MediaFile) -> Task<Message> {
        tracing::info!(file = %file.name, size = %format_file_size(file.size, SizeUnit::Bytes), "Uploading");
        self.mutation.start(file.name.clone());
        Task::run(transfer::upload(self.client.clone(), file), Message::Transfer)
    }

    fn apply_effects(&mut self, effects: Vec<MutationEffect>) -> Task<Message> {
        let mut invalidated = Vec::new();

        for effect in effects {
            match effect {
                MutationEffect::Notify { kind, title, description } => {
                    self.notifications.push(kind, title, description, Instant::now());
                }
                MutationEffect::Invalidate(key) => invalidated.push(key),
            }
        }

        let stale = self.cache.invalidate_batch(invalidated);
        Task::batch(stale.into_iter().map(|_| self.fetch_images()).collect::<Vec<_>>())
    }

    /// Start an image-list fetch unless one is already running
    fn fetch_images(&mut self) -> Task<Message> {
        let Some(ticket) = self.cache.begin_fetch(QueryKey::IMAGES) else {
            return Task::none();
        };

        let client = self.client.clone();
        Task::perform(async move { client.list_images().await }, move |result| {
            Message::ImagesFetched(ticket, result)
        })
    }

    fn window_event(&mut self, event: window::Event) -> Task<Message> {
        match event {
            window::Event::Resized(size) => {
                self.window_width = size.width;
                if !self.is_narrow() {
                    self.sidebar_open = false;
                }
                Task::none()
            }
            window::Event::Focused => {
                if self.cache.should_refetch(QueryKey::IMAGES, Instant::now()) {
                    tracing::debug!("Window focused with stale image list");
                    self.fetch_images()
                } else {
                    Task::none()
                }
            }
            // Drops only land on the dialog's drop zone
            window::Event::FileHovered(_) if self.upload_open => self.forward(ui::upload::Message::DragEntered),
            window::Event::FilesHoveredLeft if self.upload_open => self.forward(ui::upload::Message::DragLeft),
            window::Event::FileDropped(path) if self.upload_open => self.forward(ui::upload::Message::Dropped(path)),
            _ => Task::none(),
        }
    }

    fn is_narrow(&self) -> bool {
        self.window_width < NARROW_BREAKPOINT
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let page = match self.route {
            Route::Dashboard => ui::gallery::view(&self.gallery, self.cache.state(QueryKey::IMAGES)),
            Route::Settings => ui::settings::view(&self.settings),
        };

        let shell = ui::layout::shell(page, self.route, self.is_narrow(), self.sidebar_open);

        let base: Element<'_, Message> = if self.upload_open {
            modal(shell, self.upload_modal())
        } else {
            shell
        };

        if self.notifications.is_empty() {
            base
        } else {
            stack![base, ui::toast::view(&self.notifications)].into()
        }
    }

    fn upload_modal(&self) -> Element<'_, Message> {
        let header = row![
            text("Upload Media Files").size(20),
            horizontal_space(),
            button(text("Close").size(13))
                .on_press(Message::CloseUpload)
                .style(button::text),
        ];

        let dialog = self
            .upload
            .view(
                self.mutation.is_pending(),
                self.mutation.pending_progress(),
                self.mutation.last_error(),
            )
            .map(Message::Upload);

        container(column![header, dialog].spacing(24))
            .width(MODAL_WIDTH)
            .padding(24)
            .style(container::rounded_box)
            .into()
    }

    fn subscription(&self) -> Subscription<Message> {
        let window_events = event::listen_with(|event, _status, _id| match event {
            Event::Window(
                event @ (window::Event::Resized(_)
                | window::Event::Focused
                | window::Event::FileHovered(_)
                | window::Event::FilesHoveredLeft
                | window::Event::FileDropped(_)),
            ) => Some(Message::Window(event)),
            _ => None,
        });

        if self.notifications.is_empty() {
            window_events
        } else {
            Subscription::batch([window_events, iced::time::every(TOAST_TICK).map(Message::Tick)])
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

/// Overlay `content` on a dimmed `base`; clicking the backdrop closes it
fn modal<'a>(base: Element<'a, Message>, content: Element<'a, Message>) -> Element<'a, Message> {
    stack![
        base,
        opaque(
            mouse_area(center(opaque(content)).style(|_: &Theme| container::Style {
                background: Some(Color { a: 0.8, ..Color::BLACK }.into()),
                ..container::Style::default()
            }))
            .on_press(Message::CloseUpload)
        )
    ]
    .width(Length::Fill)
    .height(Length::Fill)
    .into()
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> iced::Result {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            init_tracing("info");
            tracing::error!(error = %err, "Invalid configuration");
            std::process::exit(1);
        }
    };

    init_tracing(&settings.log_filter);

    let client = match ApiClient::new(&settings) {
        Ok(client) => client,
        Err(err) => {
            tracing::error!(error = %err, "Could not create the HTTP client");
            std::process::exit(1);
        }
    };

    iced::application("Face Recognition", FaceGallery::update, FaceGallery::view)
        .subscription(FaceGallery::subscription)
        .theme(FaceGallery::theme)
        .window_size((WINDOW_WIDTH, WINDOW_HEIGHT))
        .centered()
        .run_with(move || FaceGallery::new(settings, client))
}
