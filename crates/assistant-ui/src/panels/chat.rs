//! Chat panel: empty state with suggested prompts, conversation view,
//! pending-query banner, and the input row.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use assistant_types::{
    session::{SessionState, TopicFilter},
    turn::ConversationTurn,
};
use crate::format::{format_answer, youtube_video_id, youtube_watch_url, Inline, Segment};
use crate::state::UiState;
use crate::theme::*;

pub const INITIAL_PROMPTS: [&str; 3] = [
    "What are the 10 most recommended woodworking tools?",
    "Suggest me some shop layout tips?",
    "What are the benefits of LR32 system for cabinetry?",
];

/// What the user asked for this frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    Submit(String),
    NewConversation,
    SelectTopic(TopicFilter),
    RetryPending,
}

/// Render the chat panel. Returns an action when the user did something.
pub fn chat_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    session: &SessionState,
    show_initial_prompts: bool,
) -> Option<ChatAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            if show_initial_prompts && session.conversations.is_empty() {
                empty_state(ui, state, session, &mut action);
            } else {
                conversation_view(ui, state, session, &mut action);
            }
        });

    action
}

fn empty_state(
    ui: &mut egui::Ui,
    state: &mut UiState,
    session: &SessionState,
    action: &mut Option<ChatAction>,
) {
    ui.vertical_centered(|ui| {
        ui.add_space((ui.available_height() * 0.25).max(24.0));
        ui.heading(
            RichText::new("A question creates knowledge")
                .color(TEXT_PRIMARY)
                .strong()
                .size(28.0),
        );
        ui.add_space(24.0);

        ui.set_max_width(CONTENT_MAX_WIDTH);
        if let Some(a) = input_row(ui, state, session.selected_index) {
            *action = Some(a);
        }
        ui.add_space(16.0);

        ui.horizontal_wrapped(|ui| {
            for prompt in INITIAL_PROMPTS {
                let searching = state.searching_query.as_deref() == Some(prompt);
                let text = if searching {
                    format!("⌛ {}", prompt)
                } else {
                    prompt.to_string()
                };
                let button = egui::Button::new(RichText::new(text).color(TEXT_PRIMARY))
                    .fill(BG_PRIMARY)
                    .stroke(egui::Stroke::new(1.0, BG_SURFACE))
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(200.0, 64.0));
                if ui.add_enabled(!state.is_busy(), button).clicked() {
                    *action = Some(ChatAction::Submit(prompt.to_string()));
                }
            }
        });

        if let Some(pending) = &session.pending_query {
            ui.add_space(16.0);
            if pending_banner(ui, state, pending) {
                *action = Some(ChatAction::RetryPending);
            }
        }
    });
}

fn conversation_view(
    ui: &mut egui::Ui,
    state: &mut UiState,
    session: &SessionState,
    action: &mut Option<ChatAction>,
) {
    let available_height = ui.available_height() - 56.0;
    ScrollArea::vertical()
        .max_height(available_height)
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.set_max_width(CONTENT_MAX_WIDTH);
            for (index, turn) in session.conversations.iter().enumerate() {
                render_turn(ui, index, turn);
                ui.add_space(12.0);
            }

            if let Some(query) = &state.searching_query {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new(format!("Searching: {}", query)).color(TEXT_SECONDARY));
                });
            }

            if let Some(pending) = &session.pending_query {
                if pending_banner(ui, state, pending) {
                    *action = Some(ChatAction::RetryPending);
                }
            }

            if let Some(warning) = &state.storage_warning {
                ui.label(RichText::new(warning).color(WARNING).small());
            }
        });

    ui.add_space(8.0);
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            if let Some(a) = input_row(ui, state, session.selected_index) {
                *action = Some(a);
            }
        });
}

/// New-conversation button, topic menu, text field, send button.
fn input_row(ui: &mut egui::Ui, state: &mut UiState, topic: TopicFilter) -> Option<ChatAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        if ui
            .button("+")
            .on_hover_text("New conversation")
            .clicked()
        {
            action = Some(ChatAction::NewConversation);
        }

        let mut selected = topic;
        egui::ComboBox::from_id_salt("topic_filter")
            .selected_text(selected.label())
            .width(150.0)
            .show_ui(ui, |ui| {
                for t in TopicFilter::all() {
                    ui.selectable_value(&mut selected, *t, t.label());
                }
            });
        if selected != topic {
            action = Some(ChatAction::SelectTopic(selected));
        }

        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            let send_enabled = !state.input_text.trim().is_empty() && !state.is_busy();
            let label = if state.is_busy() { "⌛" } else { "Send" };
            let send_btn = ui.add_enabled(
                send_enabled,
                egui::Button::new(RichText::new(label).color(egui::Color32::WHITE))
                    .fill(ACCENT)
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(60.0, 0.0)),
            );

            let input = egui::TextEdit::singleline(&mut state.input_text)
                .hint_text("Ask a woodworking question...")
                .desired_width(ui.available_width())
                .font(egui::FontId::proportional(15.0));
            let response = ui.add(input);

            // Submit on Enter or button click. The input is cleared by the
            // caller once the manager takes the query.
            if (response.lost_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter))
                && !state.input_text.trim().is_empty()
                && !state.is_busy())
                || send_btn.clicked()
            {
                action = Some(ChatAction::Submit(state.input_text.trim().to_string()));
                response.request_focus();
            }
        });
    });

    action
}

/// Returns true when "Retry now" was clicked.
fn pending_banner(ui: &mut egui::Ui, state: &UiState, pending: &str) -> bool {
    let mut clicked = false;

    egui::Frame::default()
        .fill(BG_PENDING)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.label(
                RichText::new(format!("Pending query: {}", pending))
                    .color(TEXT_PRIMARY)
                    .strong(),
            );
            ui.label(
                RichText::new("This query will be sent again once the assistant is reachable.")
                    .color(TEXT_PRIMARY),
            );
            if let Some(notice) = &state.retry_notice {
                ui.label(RichText::new(notice).color(TEXT_SECONDARY).small());
            }
            if let Some(err) = &state.last_error {
                ui.label(RichText::new(err).color(ERROR).small());
            }
            if ui
                .add_enabled(!state.is_busy(), egui::Button::new("Retry now"))
                .clicked()
            {
                clicked = true;
            }
        });

    clicked
}

fn render_turn(ui: &mut egui::Ui, index: usize, turn: &ConversationTurn) {
    egui::Frame::default()
        .fill(BG_PRIMARY)
        .stroke(egui::Stroke::new(1.0, BG_SURFACE))
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.label(
                RichText::new(&turn.question)
                    .color(TEXT_PRIMARY)
                    .strong()
                    .size(17.0),
            );
            ui.add_space(8.0);

            ui.label(RichText::new("Related Products").color(TEXT_PRIMARY).strong());
            if turn.products.is_empty() {
                ui.label(
                    RichText::new("No related products available at the moment.")
                        .color(TEXT_SECONDARY)
                        .italics(),
                );
            } else {
                ui.horizontal_wrapped(|ui| {
                    for product in &turn.products {
                        let title = format!("{} ›", product.title);
                        if product.link.is_empty() {
                            ui.label(RichText::new(title).color(TEXT_PRIMARY));
                        } else {
                            ui.hyperlink_to(title, &product.link);
                        }
                    }
                });
            }
            ui.add_space(8.0);

            if let Some(url) = turn.primary_video() {
                let title = turn.video_titles.first().map(String::as_str);
                render_video(ui, url, title);
                ui.add_space(8.0);
            }

            render_answer(ui, index, &format_answer(&turn.text, &turn.video_links));
        });
}

fn render_video(ui: &mut egui::Ui, url: &str, title: Option<&str>) {
    match youtube_video_id(url) {
        Some(id) => {
            let label = format!("▶ {}", title.unwrap_or("Watch on YouTube"));
            ui.hyperlink_to(label, youtube_watch_url(id));
        }
        None => {
            ui.hyperlink_to("Watch Video", url);
        }
    }
}

fn render_answer(ui: &mut egui::Ui, turn_index: usize, segments: &[Segment]) {
    for (position, segment) in segments.iter().enumerate() {
        match segment {
            Segment::Heading { level, title } => {
                let size = match level {
                    1 => 22.0,
                    2 => 19.0,
                    3 => 17.0,
                    _ => 15.0,
                };
                ui.add_space(4.0);
                ui.label(RichText::new(title).color(TEXT_PRIMARY).strong().size(size));
            }
            Segment::ListItem { number, title, body } => {
                ui.add_space(4.0);
                ui.label(
                    RichText::new(format!("{}. {}", number, title))
                        .color(TEXT_PRIMARY)
                        .strong(),
                );
                ui.indent(list_item_id(turn_index, position), |ui| {
                    render_inline(ui, body);
                });
            }
            Segment::Paragraph(inline) => render_inline(ui, inline),
        }
    }
}

/// Identical answers in two turns must not share widget ids
pub(crate) fn list_item_id(turn_index: usize, position: usize) -> egui::Id {
    egui::Id::new(("list_item", turn_index, position))
}

fn render_inline(ui: &mut egui::Ui, inline: &[Inline]) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for part in inline {
            match part {
                Inline::Text(text) => {
                    ui.label(RichText::new(text).color(TEXT_PRIMARY));
                }
                Inline::Video { url, .. } => {
                    ui.hyperlink_to("Video", url);
                }
            }
        }
    });
}
