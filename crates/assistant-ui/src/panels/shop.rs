//! Shop panel: product catalog cards.

use egui::{self, RichText, ScrollArea, Vec2};
use assistant_types::catalog::Product;
use crate::state::ShopState;
use crate::theme::*;

const CARD_WIDTH: f32 = 240.0;

/// Render the shop. Returns true when the user asked to fetch again.
pub fn shop_panel(ui: &mut egui::Ui, shop: &ShopState) -> bool {
    let mut retry = false;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Shop").color(TEXT_PRIMARY).strong());
            ui.separator();

            match shop {
                ShopState::NotLoaded | ShopState::Loading => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(RichText::new("Loading products...").color(TEXT_SECONDARY));
                    });
                }
                ShopState::Failed(message) => {
                    ui.label(RichText::new(message).color(ERROR));
                    if ui.button("Try Again").clicked() {
                        retry = true;
                    }
                }
                ShopState::Loaded(products) if products.is_empty() => {
                    ui.label(RichText::new("No products yet.").color(TEXT_SECONDARY).italics());
                }
                ShopState::Loaded(products) => {
                    ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            ui.horizontal_wrapped(|ui| {
                                for product in products {
                                    product_card(ui, product);
                                }
                            });
                        });
                }
            }
        });

    retry
}

fn product_card(ui: &mut egui::Ui, product: &Product) {
    egui::Frame::default()
        .fill(BG_SECONDARY)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(12.0)
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.set_min_height(120.0);
            ui.vertical(|ui| {
                ui.label(RichText::new(&product.title).color(TEXT_PRIMARY).strong());
                ui.add_space(4.0);
                ui.label(RichText::new(product.description()).color(TEXT_SECONDARY).small());
                ui.add_space(8.0);
                if !product.link.is_empty() {
                    ui.add_sized(
                        Vec2::new(CARD_WIDTH, 24.0),
                        egui::Hyperlink::from_label_and_url("View Product", &product.link),
                    );
                }
            });
        });
}
