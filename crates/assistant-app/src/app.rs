//! Main egui application: composes all panels and drives the conversation
//! manager from UI actions.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::Datelike;
use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel};
use gloo_timers::future::TimeoutFuture;

use assistant_core::conversation::{ConversationManager, SearchOutcome};
use assistant_core::event_bus::EventBus;
use assistant_core::ports::{ContactPort, InferencePort, StoragePort, UserDataPort};
use assistant_platform::http::{ContactClient, InferenceClient, UserDataClient};
use assistant_platform::storage::auto_detect_storage;
use assistant_types::{
    Result,
    catalog::Product,
    config::AppConfig,
    contact::ContactReceipt,
};
use assistant_ui::panels::chat::{self, ChatAction};
use assistant_ui::panels::{contact, settings, shop};
use assistant_ui::panels::settings::SettingsAction;
use assistant_ui::state::{Feedback, ShopState, UiState, View};
use assistant_ui::theme;

const CONFIG_STORAGE_KEY: &str = "assistant:config";

/// Result handed back from a spawned task to the next frame
type Slot<T> = Rc<RefCell<Option<T>>>;

/// Read the saved settings, falling back to defaults, and make sure a user
/// id exists. A freshly generated id is saved right away.
pub async fn load_config(storage: &dyn StoragePort) -> AppConfig {
    let mut config = match storage.get(CONFIG_STORAGE_KEY).await {
        Ok(Some(data)) => match serde_json::from_slice::<AppConfig>(&data) {
            Ok(config) => {
                log::info!("Config restored from {}", storage.backend_name());
                config
            }
            Err(e) => {
                log::warn!("Ignoring unreadable config: {}", e);
                AppConfig::default()
            }
        },
        Ok(None) => AppConfig::default(),
        Err(e) => {
            log::warn!("Reading config failed: {}", e);
            AppConfig::default()
        }
    };

    if config.ensure_user_id() {
        log::info!("Generated user id {}", config.user_data.user_id);
        if let Err(e) = save_config(storage, &config).await {
            log::warn!("Saving generated user id failed: {}", e);
        }
    }
    config
}

async fn save_config(storage: &dyn StoragePort, config: &AppConfig) -> Result<()> {
    let json = serde_json::to_vec(config)?;
    storage.set(CONFIG_STORAGE_KEY, &json).await
}

/// The main application state
pub struct AssistantApp {
    ui_state: UiState,
    /// Settings in effect
    config: AppConfig,
    /// Settings being edited in the side panel
    draft_config: AppConfig,
    event_bus: EventBus,
    manager: Rc<ConversationManager>,
    gateway: Rc<dyn InferencePort>,
    remote: Rc<dyn UserDataPort>,
    contact: Rc<dyn ContactPort>,
    config_storage: Rc<dyn StoragePort>,
    shop_result: Slot<Result<Vec<Product>>>,
    contact_result: Slot<Result<ContactReceipt>>,
    settings_result: Slot<Result<()>>,
    first_frame: bool,
}

impl AssistantApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AppConfig,
        config_storage: Rc<dyn StoragePort>,
    ) -> Self {
        let event_bus = EventBus::new();
        let storage = auto_detect_storage(&config.storage);
        let manager = Rc::new(ConversationManager::new(
            config.user_data.user_id.clone(),
            storage,
            config.retry.clone(),
            event_bus.clone(),
        ));

        let gateway: Rc<dyn InferencePort> = Rc::new(InferenceClient::new(config.gateway.clone()));
        let remote: Rc<dyn UserDataPort> = Rc::new(UserDataClient::new(config.user_data.clone()));
        let contact: Rc<dyn ContactPort> = Rc::new(ContactClient::new(&config.user_data));

        Self::initialize_session(manager.clone(), remote.clone(), cc.egui_ctx.clone());

        Self {
            ui_state: UiState::new(),
            draft_config: config.clone(),
            config,
            event_bus,
            manager,
            gateway,
            remote,
            contact,
            config_storage,
            shop_result: Rc::new(RefCell::new(None)),
            contact_result: Rc::new(RefCell::new(None)),
            settings_result: Rc::new(RefCell::new(None)),
            first_frame: true,
        }
    }

    /// Restore the conversation (local, then remote) before anything is
    /// written. Retries of a restored pending query start from `update`.
    fn initialize_session(
        manager: Rc<ConversationManager>,
        remote: Rc<dyn UserDataPort>,
        ctx: egui::Context,
    ) {
        wasm_bindgen_futures::spawn_local(async move {
            manager.initialize(remote.as_ref()).await;
            ctx.request_repaint();
        });
    }

    /// Rebuild the HTTP clients from the current config
    fn rebuild_clients(&mut self) {
        self.gateway = Rc::new(InferenceClient::new(self.config.gateway.clone()));
        self.remote = Rc::new(UserDataClient::new(self.config.user_data.clone()));
        self.contact = Rc::new(ContactClient::new(&self.config.user_data));
    }

    fn apply_settings(&mut self) {
        if self.draft_config.ensure_user_id() {
            log::info!("Generated user id {}", self.draft_config.user_data.user_id);
        }
        let needs_reload = self.draft_config.user_data.user_id != self.config.user_data.user_id
            || self.draft_config.storage != self.config.storage
            || self.draft_config.retry != self.config.retry;

        self.config = self.draft_config.clone();
        self.rebuild_clients();
        if needs_reload {
            log::info!("Some saved settings take effect after a reload");
        }

        let storage = self.config_storage.clone();
        let config = self.config.clone();
        let slot = self.settings_result.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = save_config(storage.as_ref(), &config).await;
            if let Err(e) = &result {
                log::warn!("Saving config failed: {}", e);
            } else {
                log::info!("Config saved to storage");
            }
            *slot.borrow_mut() = Some(result);
        });
    }

    /// Pick up results of spawned tasks
    fn collect_results(&mut self) {
        if let Some(result) = self.shop_result.borrow_mut().take() {
            self.ui_state.shop.finish(result);
        }
        if let Some(result) = self.contact_result.borrow_mut().take() {
            self.ui_state.contact.finish(result);
        }
        if let Some(result) = self.settings_result.borrow_mut().take() {
            self.ui_state.settings_feedback = Some(match result {
                Ok(()) => Feedback::ok("Saved"),
                Err(e) => Feedback::error(format!("Save failed: {}", e)),
            });
        }
    }
}

impl eframe::App for AssistantApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        // Drain events from the conversation manager
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        self.collect_results();
        self.schedule_retry(ctx);

        if self.ui_state.is_busy() || self.ui_state.contact.sending {
            ctx.request_repaint();
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Woodworking Assistant")
                        .strong()
                        .color(theme::TEXT_PRIMARY)
                        .size(18.0),
                );
                ui.separator();
                for view in View::all() {
                    if ui
                        .selectable_label(self.ui_state.view == *view, view.label())
                        .clicked()
                    {
                        self.ui_state.view = *view;
                    }
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                    }
                    let status_color = if self.ui_state.is_busy() {
                        theme::WARNING
                    } else {
                        theme::TEXT_SECONDARY
                    };
                    ui.label(
                        RichText::new(&self.ui_state.status_text)
                            .color(status_color)
                            .small(),
                    );
                });
            });
        });

        // ── Footer ───────────────────────────────────────────
        TopBottomPanel::bottom("footer")
            .frame(egui::Frame::default().fill(theme::BG_FOOTER).inner_margin(8.0))
            .show(ctx, |ui| {
                ui.label(
                    RichText::new(format!(
                        "© {} Bent's Woodworking Assistant. All rights reserved.",
                        chrono::Utc::now().year()
                    ))
                    .color(theme::TEXT_ON_DARK)
                    .small(),
                );
            });

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    let action = settings::settings_panel(
                        ui,
                        &mut self.draft_config,
                        self.ui_state.settings_feedback.as_ref(),
                    );
                    match action {
                        SettingsAction::SaveClicked => self.apply_settings(),
                        SettingsAction::Changed => self.ui_state.settings_feedback = None,
                        SettingsAction::None => {}
                    }
                });
        }

        // ── Main content ─────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| match self.ui_state.view {
            View::Chat => self.chat_view(ui, ctx),
            View::Shop => self.shop_view(ui, ctx),
            View::Contact => self.contact_view(ui, ctx),
        });
    }
}

impl Drop for AssistantApp {
    fn drop(&mut self) {
        self.manager.shutdown();
    }
}

impl AssistantApp {
    fn chat_view(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if !self.manager.is_initialized() {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        }

        let show_prompts = self.manager.show_initial_prompts();
        let ui_state = &mut self.ui_state;
        let action = self
            .manager
            .with_state(|session| chat::chat_panel(ui, ui_state, session, show_prompts));

        match action {
            Some(ChatAction::Submit(text)) => match self.manager.ignore_reason(&text) {
                Some(reason) => log::debug!("Query not sent ({:?}): {}", reason, text),
                None => {
                    self.ui_state.query_accepted(&text);
                    self.dispatch_query(text, ctx);
                }
            },
            Some(ChatAction::NewConversation) => {
                let manager = self.manager.clone();
                let ctx = ctx.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    manager.reset_conversation().await;
                    ctx.request_repaint();
                });
            }
            Some(ChatAction::SelectTopic(topic)) => {
                let manager = self.manager.clone();
                let ctx = ctx.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    manager.set_topic_filter(topic).await;
                    ctx.request_repaint();
                });
            }
            Some(ChatAction::RetryPending) => self.dispatch_retry_now(ctx),
            None => {}
        }
    }

    fn shop_view(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if self.ui_state.shop.needs_fetch() {
            self.ui_state.shop = ShopState::Loading;
            let gateway = self.gateway.clone();
            let slot = self.shop_result.clone();
            let ctx = ctx.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let result = gateway.list_documents().await;
                if let Ok(products) = &result {
                    log::info!("Catalog loaded: {} products", products.len());
                }
                *slot.borrow_mut() = Some(result);
                ctx.request_repaint();
            });
        }

        if shop::shop_panel(ui, &self.ui_state.shop) {
            self.ui_state.shop = ShopState::NotLoaded;
        }
    }

    fn contact_view(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        if !contact::contact_panel(ui, &mut self.ui_state.contact) {
            return;
        }
        let Some(form) = self.ui_state.contact.begin_submit() else {
            return;
        };

        let client = self.contact.clone();
        let slot = self.contact_result.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = client.submit_contact(&form).await;
            if let Err(e) = &result {
                log::warn!("Contact submission failed: {}", e);
            }
            *slot.borrow_mut() = Some(result);
            ctx.request_repaint();
        });
    }

    /// Send a query to the chat service (async)
    fn dispatch_query(&self, text: String, ctx: &egui::Context) {
        let manager = self.manager.clone();
        let gateway = self.gateway.clone();
        let remote = self.remote.clone();
        let sync = self.config.user_data.sync_after_turn;
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            let outcome = manager.submit_query(&text, gateway.as_ref()).await;
            after_search(&manager, remote.as_ref(), sync, &outcome).await;
            ctx.request_repaint();
        });
    }

    /// Start the backoff timer for a pending query, at most one at a time.
    fn schedule_retry(&self, ctx: &egui::Context) {
        let Some(ticket) = self.manager.schedule_retry() else {
            return;
        };
        log::info!(
            "Retrying \"{}\" in {}ms (attempt {})",
            ticket.query,
            ticket.delay_ms,
            ticket.attempt
        );

        let manager = self.manager.clone();
        let gateway = self.gateway.clone();
        let remote = self.remote.clone();
        let sync = self.config.user_data.sync_after_turn;
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            TimeoutFuture::new(u32::try_from(ticket.delay_ms).unwrap_or(u32::MAX)).await;
            if let Some(outcome) = manager.retry_pending(gateway.as_ref()).await {
                after_search(&manager, remote.as_ref(), sync, &outcome).await;
            }
            ctx.request_repaint();
        });
    }

    fn dispatch_retry_now(&self, ctx: &egui::Context) {
        let manager = self.manager.clone();
        let gateway = self.gateway.clone();
        let remote = self.remote.clone();
        let sync = self.config.user_data.sync_after_turn;
        let ctx = ctx.clone();

        wasm_bindgen_futures::spawn_local(async move {
            if let Some(outcome) = manager.retry_now(gateway.as_ref()).await {
                after_search(&manager, remote.as_ref(), sync, &outcome).await;
            }
            ctx.request_repaint();
        });
    }
}

/// Push the session to the user-data service after an answer, when enabled.
async fn after_search(
    manager: &ConversationManager,
    remote: &dyn UserDataPort,
    sync: bool,
    outcome: &SearchOutcome,
) {
    if !sync || !matches!(outcome, SearchOutcome::Answered { .. }) {
        return;
    }
    // Failure is already logged and reported on the event bus
    let _ = manager.sync_remote(remote).await;
}
