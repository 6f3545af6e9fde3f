/// Upload dialog: drop zone, queued files and submission
///
/// The dialog owns the upload workflow plus the handles of the background
/// work started for each queued file. Handles abort their task when
/// dropped, so removing a file, clearing the queue or tearing down the
/// dialog cancels pending preview reads and timers.

use iced::task;
use iced::widget::{button, column, container, horizontal_space, image, row, scrollable, text, tooltip, Space};
use iced::{Alignment, Background, Border, Color, ContentFit, Element, Length, Task, Theme};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::UploadProgress;
use crate::error::{IntakeError, PreviewError};
use crate::format::{format_file_size, SizeUnit};
use crate::media::preview::{generate_preview, Thumbnail};
use crate::state::data::{load_batch, MediaFile};
use crate::state::workflow::{Preview, Started, UploadWorkflow};

/// Window systems report one drop event per file; drops closer together
/// than this are validated as one batch.
const DROP_SETTLE: Duration = Duration::from_millis(50);

/// Extensions offered by the file picker
const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "tif", "tiff", "bmp", "webp", "gif"];

const ROW_PREVIEW: f32 = 40.0;
const ROW_HEIGHT: f32 = 60.0;
const MAX_LIST_HEIGHT: f32 = 320.0;

#[derive(Debug, Clone)]
pub enum Message {
    DragEntered,
    DragLeft,
    Dropped(PathBuf),
    DropSettled,
    Browse,
    Picked(Vec<PathBuf>),
    Loaded(Result<Vec<MediaFile>, IntakeError>),
    LoadingElapsed {
        name: String,
        ticket: u64,
    },
    PreviewGenerated {
        name: String,
        ticket: u64,
        result: Result<Thumbnail, PreviewError>,
    },
    Delete(String),
    RemoveAll,
    Submit,
}

/// What the parent must do after an update
pub enum Action {
    None,
    Run(Task<Message>),
    Submit(MediaFile),
}

pub struct UploadDialog {
    workflow: UploadWorkflow,
    drag_over: bool,
    dropped: Vec<PathBuf>,
    timers: HashMap<u64, task::Handle>,
    readers: HashMap<u64, task::Handle>,
}

impl UploadDialog {
    pub fn new() -> Self {
        Self {
            workflow: UploadWorkflow::new(),
            drag_over: false,
            dropped: Vec::new(),
            timers: HashMap::new(),
            readers: HashMap::new(),
        }
    }

    pub fn update(&mut self, message: Message) -> Action {
        match message {
            Message::DragEntered => {
                self.drag_over = true;
                Action::None
            }
            Message::DragLeft => {
                self.drag_over = false;
                Action::None
            }
            Message::Dropped(path) => {
                self.drag_over = false;
                let first = self.dropped.is_empty();
                self.dropped.push(path);

                if first {
                    Action::Run(Task::perform(
                        async { tokio::time::sleep(DROP_SETTLE).await },
                        |_| Message::DropSettled,
                    ))
                } else {
                    Action::None
                }
            }
            Message::DropSettled => {
                let paths = std::mem::take(&mut self.dropped);
                tracing::debug!(count = paths.len(), "Files dropped");
                Action::Run(Task::perform(load_batch(paths), Message::Loaded))
            }
            Message::Browse => Action::Run(Task::perform(pick_images(), Message::Picked)),
            Message::Picked(paths) => {
                if paths.is_empty() {
                    return Action::None;
                }
                Action::Run(Task::perform(load_batch(paths), Message::Loaded))
            }
            Message::Loaded(Ok(batch)) => match self.workflow.accept(batch) {
                Ok(started) => {
                    tracing::info!(added = started.len(), queued = self.workflow.files().len(), "Files queued");
                    Action::Run(self.start(started))
                }
                Err(err) => {
                    tracing::info!(error = ?err, "Batch rejected");
                    Action::None
                }
            },
            Message::Loaded(Err(err)) => {
                tracing::warn!(error = %err, "Could not read selected files");
                self.workflow.reject(&err);
                Action::None
            }
            Message::LoadingElapsed { name, ticket } => {
                self.timers.remove(&ticket);
                self.workflow.loading_elapsed(&name, ticket);
                Action::None
            }
            Message::PreviewGenerated { name, ticket, result } => {
                self.readers.remove(&ticket);
                let preview = match result {
                    Ok(thumbnail) => Preview::Ready(thumbnail.into_handle()),
                    Err(err) => {
                        tracing::warn!(file = %name, error = %err, "Preview failed");
                        Preview::Failed(err.to_string())
                    }
                };
                self.workflow.preview_ready(&name, ticket, preview);
                Action::None
            }
            Message::Delete(name) => {
                if let Some(ticket) = self.workflow.remove(&name) {
                    self.cancel(ticket);
                }
                Action::None
            }
            Message::RemoveAll => {
                self.workflow.clear();
                self.cancel_all();
                Action::None
            }
            Message::Submit => match self.workflow.submit() {
                Some(file) => {
                    self.cancel_all();
                    Action::Submit(file)
                }
                None => Action::None,
            },
        }
    }

    /// Start the preview read and the simulated timer for each new file
    fn start(&mut self, started: Vec<Started>) -> Task<Message> {
        let mut tasks = Vec::with_capacity(started.len() * 2);

        for Started { file, ticket, duration } in started {
            let name = file.name.clone();

            let timer_name = name.clone();
            let (timer, timer_handle) = Task::perform(async move { tokio::time::sleep(duration).await }, move |_| {
                Message::LoadingElapsed {
                    name: timer_name.clone(),
                    ticket,
                }
            })
            .abortable();

            let (reader, reader_handle) = Task::perform(generate_preview(file), move |result| {
                Message::PreviewGenerated {
                    name: name.clone(),
                    ticket,
                    result,
                }
            })
            .abortable();

            self.timers.insert(ticket, timer_handle.abort_on_drop());
            self.readers.insert(ticket, reader_handle.abort_on_drop());
            tasks.push(timer);
            tasks.push(reader);
        }

        Task::batch(tasks)
    }

    fn cancel(&mut self, ticket: u64) {
        self.timers.remove(&ticket);
        self.readers.remove(&ticket);
    }

    fn cancel_all(&mut self) {
        self.timers.clear();
        self.readers.clear();
    }

    /// `last_error` is the detail of the most recent failed submission
    pub fn view<'a>(
        &'a self,
        pending: bool,
        progress: Option<UploadProgress>,
        last_error: Option<&'a str>,
    ) -> Element<'a, Message> {
        let mut content = column![self.drop_zone()].spacing(16).width(Length::Fill);

        if !self.workflow.is_empty() {
            let rows = self
                .workflow
                .files()
                .iter()
                .enumerate()
                .fold(column![].spacing(4), |list, (index, file)| list.push(self.file_row(index, file)));

            let height = (self.workflow.files().len() as f32 * ROW_HEIGHT).min(MAX_LIST_HEIGHT);
            content = content.push(scrollable(rows).height(height).width(Length::Fill));
        }

        if let Some(error) = self.workflow.error() {
            content = content.push(text(error).size(14).style(text::danger));
        }

        let has_files = !self.workflow.is_empty();
        let upload_label = match (pending, progress) {
            (true, Some(p)) => format!("Uploading {:.0}%", p.fraction() * 100.0),
            (true, None) => "Uploading...".to_string(),
            (false, _) => "Upload".to_string(),
        };

        let actions = row![
            button(text(upload_label).width(Length::Fill).align_x(Alignment::Center))
                .on_press_maybe((has_files && !pending).then_some(Message::Submit))
                .width(Length::FillPortion(2))
                .padding(10),
            button(text("Remove all").width(Length::Fill).align_x(Alignment::Center))
                .on_press_maybe(has_files.then_some(Message::RemoveAll))
                .style(button::secondary)
                .width(Length::FillPortion(1))
                .padding(10),
        ]
        .spacing(16);

        let mut footer = column![actions].spacing(8);
        if let (false, Some(detail)) = (pending, last_error) {
            footer = footer.push(
                text(format!("Last upload failed: {}", detail))
                    .size(13)
                    .style(text::danger),
            );
        }

        column![content, footer].spacing(16).into()
    }

    fn drop_zone(&self) -> Element<'_, Message> {
        let drag_over = self.drag_over;

        let label = column![
            text("Click to upload or drag & drop").size(16),
            text("JPEG, PNG, TIFF, WEBP, GIF").size(13).style(text::secondary),
        ]
        .spacing(8)
        .align_x(Alignment::Center);

        button(
            container(label)
                .width(Length::Fill)
                .height(208)
                .center_x(Length::Fill)
                .center_y(208),
        )
        .on_press(Message::Browse)
        .width(Length::Fill)
        .style(move |theme: &Theme, status| {
            let palette = theme.extended_palette();
            let active = drag_over || matches!(status, button::Status::Hovered);
            let accent = if active {
                Color::from_rgb(37.0 / 255.0, 99.0 / 255.0, 235.0 / 255.0)
            } else {
                palette.primary.base.color
            };

            button::Style {
                background: Some(Background::Color(Color { a: if active { 0.08 } else { 0.02 }, ..accent })),
                text_color: palette.background.base.text,
                border: Border {
                    color: accent,
                    width: 1.5,
                    radius: 12.0.into(),
                },
                ..button::Style::default()
            }
        })
        .into()
    }

    fn file_row<'a>(&'a self, index: usize, file: &'a MediaFile) -> Element<'a, Message> {
        let loading = self.workflow.is_loading(&file.name);

        let thumb: Element<'a, Message> = if loading {
            placeholder("...")
        } else {
            match self.workflow.preview(&file.name) {
                Some(Preview::Ready(handle)) => image(handle.clone())
                    .width(ROW_PREVIEW)
                    .height(ROW_PREVIEW)
                    .content_fit(ContentFit::Cover)
                    .into(),
                Some(Preview::Failed(reason)) => tooltip(
                    placeholder("!"),
                    container(text(reason).size(12)).padding(6).style(container::rounded_box),
                    tooltip::Position::Right,
                )
                .into(),
                None => Space::new(ROW_PREVIEW, ROW_PREVIEW).into(),
            }
        };

        let details = column![
            text(&file.name).size(14).width(224),
            text(format_file_size(file.size, SizeUnit::Mb)).size(12).style(text::secondary),
        ]
        .spacing(4);

        let status: Element<'a, Message> = if loading {
            Space::with_width(0).into()
        } else {
            row![
                container(Space::new(8, 8)).style(|_: &Theme| container::Style {
                    background: Some(Background::Color(Color::from_rgb(34.0 / 255.0, 197.0 / 255.0, 94.0 / 255.0))),
                    border: Border {
                        radius: 4.0.into(),
                        ..Border::default()
                    },
                    ..container::Style::default()
                }),
                text("Uploaded").size(12).style(text::secondary),
            ]
            .spacing(4)
            .align_y(Alignment::Center)
            .into()
        };

        let delete = button(text("Delete").size(12))
            .on_press(Message::Delete(file.name.clone()))
            .style(button::danger)
            .padding([6, 12]);

        let striped = index % 2 == 0;
        container(
            row![thumb, details, horizontal_space(), status, delete]
                .spacing(8)
                .align_y(Alignment::Center),
        )
        .padding(8)
        .style(move |theme: &Theme| {
            if striped {
                container::Style {
                    background: Some(Background::Color(theme.extended_palette().background.weak.color)),
                    border: Border {
                        radius: 8.0.into(),
                        ..Border::default()
                    },
                    ..container::Style::default()
                }
            } else {
                container::Style::default()
            }
        })
        .into()
    }
}

fn placeholder<'a>(label: &'a str) -> Element<'a, Message> {
    container(text(label).size(12))
        .width(ROW_PREVIEW)
        .height(ROW_PREVIEW)
        .center_x(ROW_PREVIEW)
        .center_y(ROW_PREVIEW)
        .style(container::bordered_box)
        .into()
}

/// Show the native multi-file picker filtered to image types
async fn pick_images() -> Vec<PathBuf> {
    rfd::AsyncFileDialog::new()
        .set_title("Select images to upload")
        .add_filter("Images", IMAGE_EXTENSIONS)
        .pick_files()
        .await
        .map(|handles| handles.iter().map(|h| h.path().to_path_buf()).collect())
        .unwrap_or_default()
}
