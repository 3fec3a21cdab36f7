//! egui shell for the credentials test bench form.

use std::{sync::Arc, time::Duration};

use client_core::{CredentialClient, Field, HttpExchange, Outcome};
use crossbeam_channel::{Receiver, Sender};
use serde_json::json;

use crate::bridge::{dispatch_backend_command, BackendCommand, UiEvent};

const SUCCESS_TEXT: egui::Color32 = egui::Color32::from_rgb(110, 195, 120);
const ERROR_TEXT: egui::Color32 = egui::Color32::from_rgb(220, 120, 120);

pub struct TestBenchApp {
    client: Arc<CredentialClient>,
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    email: String,
    password: String,
    status: String,
}

impl TestBenchApp {
    pub fn new(
        client: Arc<CredentialClient>,
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
    ) -> Self {
        Self {
            client,
            cmd_tx,
            ui_rx,
            email: String::new(),
            password: String::new(),
            status: "Ready".to_string(),
        }
    }

    fn drain_backend_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Settled(outcome) => {
                    self.status = status_line(&outcome);
                }
                UiEvent::BackendFailed(message) => {
                    self.status = message;
                }
            }
        }
    }

    fn show_form(&mut self, ui: &mut egui::Ui, loading: bool) {
        ui.group(|ui| {
            ui.label(egui::RichText::new("Email").strong());
            let email_edit = ui.add(
                egui::TextEdit::singleline(&mut self.email)
                    .hint_text("Enter email")
                    .desired_width(f32::INFINITY),
            );
            if email_edit.changed() {
                self.client.update_field(Field::Email, self.email.clone());
            }

            ui.add_space(6.0);
            ui.label(egui::RichText::new("Password").strong());
            let password_edit = ui.add(
                egui::TextEdit::singleline(&mut self.password)
                    .password(true)
                    .hint_text("Enter password")
                    .desired_width(f32::INFINITY),
            );
            if password_edit.changed() {
                self.client
                    .update_field(Field::Password, self.password.clone());
            }
        });

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!loading, egui::Button::new("Save Credentials"))
                .clicked()
            {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::SubmitSave,
                    &mut self.status,
                );
            }
            if ui
                .add_enabled(!loading, egui::Button::new("Get by Email"))
                .clicked()
            {
                dispatch_backend_command(
                    &self.cmd_tx,
                    BackendCommand::SubmitLookup,
                    &mut self.status,
                );
            }
            // Clear only resets the outcome display; the form keeps its fields.
            if self.client.outcome().is_some() && ui.button("Clear").clicked() {
                self.client.clear_outcome();
                self.status = "Ready".to_string();
            }
            if loading {
                ui.add(egui::Spinner::new());
            }
        });
    }

    fn show_outcome(&self, ui: &mut egui::Ui, outcome: &Outcome) {
        match outcome {
            Outcome::Success(exchange) => {
                self.show_exchange(ui, "Success Response", SUCCESS_TEXT, exchange);
            }
            Outcome::Failure(exchange) => {
                self.show_exchange(ui, "Error Response", ERROR_TEXT, exchange);
            }
            Outcome::Network { message } => {
                ui.group(|ui| {
                    ui.label(
                        egui::RichText::new("Error Response")
                            .color(ERROR_TEXT)
                            .strong(),
                    );
                    ui.monospace(message);
                });
            }
        }
    }

    fn show_exchange(
        &self,
        ui: &mut egui::Ui,
        title: &str,
        color: egui::Color32,
        exchange: &HttpExchange,
    ) {
        ui.group(|ui| {
            ui.label(egui::RichText::new(title).color(color).strong());
            ui.label(format!(
                "Status: {} {}",
                exchange.status, exchange.status_text
            ));
            ui.add_space(4.0);
            ui.label("Response Data:");
            egui::ScrollArea::vertical()
                .max_height(160.0)
                .show(ui, |ui| {
                    ui.monospace(pretty_json(&exchange.data));
                });
        });
    }

    fn show_request_info(&self, ui: &mut egui::Ui) {
        let base = self.client.base_url().as_str().trim_end_matches('/');
        ui.group(|ui| {
            ui.label(egui::RichText::new("Request Information").strong());
            ui.label(format!("Save URL: {base}/crud/save_credentials"));
            ui.label(format!("Get URL: {base}/crud/get_by_email"));
            ui.label("Headers: Content-Type: application/json, Accept: application/json");
            ui.label("Credentials: include (cookie store)");
            ui.add_space(4.0);
            ui.label("Current Request Body:");
            ui.monospace(pretty_json(&json!({
                "email": self.email,
                "password": self.password,
            })));
        });
    }
}

impl eframe::App for TestBenchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_backend_events();
        let loading = self.client.is_loading();
        if loading {
            // Keep repainting until the in-flight request settles.
            ctx.request_repaint_after(Duration::from_millis(50));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Credentials API Test Bench");
            ui.add_space(8.0);

            self.show_form(ui, loading);

            if let Some(outcome) = self.client.outcome() {
                ui.add_space(8.0);
                self.show_outcome(ui, &outcome);
            }

            ui.add_space(8.0);
            self.show_request_info(ui);

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.small("Status:");
                ui.small(egui::RichText::new(&self.status).weak());
            });
        });
    }
}

fn status_line(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success(exchange) => {
            format!("Success: {} {}", exchange.status, exchange.status_text)
        }
        Outcome::Failure(exchange) => {
            format!("Error: {} {}", exchange.status, exchange.status_text)
        }
        Outcome::Network { message } => message.clone(),
    }
}

fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
