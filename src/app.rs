//! Desktop shell.
//! Renders the sections list, the quiz card and the table view, and turns clicks into session actions.

use eframe::egui;
use std::fs;
use vocab_flashcards::export::{EXPORT_FILE_NAME, export_json_to_path};
use vocab_flashcards::{Action, Column, Deck, FlashcardError, Outcome, QuizStatus, StudySession, ViewMode};

const HIDDEN_TEXT: &str = "•••••";

pub struct FlashcardApp {
    session: StudySession,
    show_result_dialog: bool,
    result_message: String,
}

impl eframe::App for FlashcardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Actions are collected while drawing and applied afterwards to avoid borrowing conflicts
        let actions = match self.session.view() {
            ViewMode::Sections => self.render_sections_screen(ctx),
            ViewMode::Table => self.render_table_screen(ctx),
            ViewMode::Quiz => self.render_quiz_screen(ctx),
        };
        for action in actions {
            self.dispatch(action);
        }

        if self.show_result_dialog {
            egui::Window::new("Import/Export Result")
                .collapsible(false)
                .resizable(false)
                .show(ctx, |ui| {
                    ui.label(&self.result_message);
                    ui.add_space(10.0);
                    if ui.button("OK").clicked() {
                        self.show_result_dialog = false;
                    }
                });
        }
    }
}

impl FlashcardApp {
    pub fn new(session: StudySession) -> Self {
        Self {
            session,
            show_result_dialog: false,
            result_message: String::new(),
        }
    }

    fn show_message(&mut self, message: String) {
        self.result_message = message;
        self.show_result_dialog = true;
    }

    fn dispatch(&mut self, action: Action) {
        match self.session.dispatch(action) {
            Ok(Outcome::Exported(deck)) => self.save_export(&deck),
            Ok(Outcome::Imported { sections, cards }) => {
                self.show_message(format!("Imported {sections} sections with {cards} cards."));
            }
            Ok(Outcome::Updated | Outcome::Ignored) => {}
            Err(FlashcardError::Parse(e)) => {
                self.show_message(format!("Invalid file format\n\n{e}"));
            }
            Err(e) => self.show_message(format!("Action failed: {e}")),
        }
    }

    /// Asks where to save the exported deck
    fn save_export(&mut self, deck: &Deck) {
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(EXPORT_FILE_NAME)
            .add_filter("JSON files", &["json"])
            .save_file()
        else {
            return;
        };

        match export_json_to_path(deck, &path) {
            Ok(()) => self.show_message("Deck exported successfully!".to_string()),
            Err(e) => self.show_message(format!("Export failed: {e}")),
        }
    }

    /// Picks a JSON file and hands its text to the session
    fn handle_import(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("JSON files", &["json"])
            .pick_file()
        else {
            return;
        };

        match fs::read_to_string(&path) {
            Ok(text) => self.dispatch(Action::Import(text)),
            Err(e) => self.show_message(format!("Import failed: {e}")),
        }
    }

    fn render_sections_screen(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = Vec::new();
        let mut import_clicked = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Flashcards");
                if ui.button("Table View").clicked() {
                    actions.push(Action::SwitchView(ViewMode::Table));
                }
                if ui.button("Export").clicked() {
                    actions.push(Action::Export);
                }
                if ui.button("Import").clicked() {
                    import_clicked = true;
                }
            });

            ui.horizontal(|ui| {
                let mut start_with_spanish = self.session.preferences().start_with_spanish;
                if ui
                    .checkbox(&mut start_with_spanish, "Start quizzes with Spanish")
                    .changed()
                {
                    actions.push(Action::ToggleOrientation);
                }
                if ui.button("Reset deck").clicked() {
                    actions.push(Action::ResetDeck);
                }
            });

            if !self.session.is_durable() {
                ui.colored_label(
                    egui::Color32::from_rgb(200, 120, 0),
                    "Storage unavailable: progress is kept for this session only.",
                );
            }

            ui.separator();

            egui::ScrollArea::vertical()
                .id_salt("sections_list")
                .show(ui, |ui| {
                    for section in self.session.deck().sections() {
                        ui.group(|ui| {
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    if ui.link(&section.name).clicked() {
                                        actions.push(Action::OpenSection(section.name.clone()));
                                    }
                                    ui.label(format!(
                                        "{}/{} learned",
                                        section.learned_count(),
                                        section.len()
                                    ));

                                    if let Some(progress) =
                                        self.session.quiz().progress(&section.name)
                                    {
                                        let color = if progress.completed {
                                            egui::Color32::from_rgb(34, 197, 94)
                                        } else {
                                            egui::Color32::from_rgb(239, 68, 68)
                                        };
                                        let percentage = progress.percentage(section.len());
                                        ui.add(
                                            egui::ProgressBar::new((percentage / 100.0) as f32)
                                                .fill(color)
                                                .text(format!("{percentage:.0}%")),
                                        );
                                    }
                                });

                                if ui.button("Start Quiz").clicked() {
                                    actions.push(Action::StartQuiz(section.name.clone()));
                                }
                            });
                        });
                    }
                });
        });

        if import_clicked {
            self.handle_import();
        }
        actions
    }

    fn render_quiz_screen(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("Back to Sections").clicked() {
                actions.push(Action::CloseSection);
            }

            let Some(name) = self.session.active_section() else {
                return;
            };
            let total = self.session.deck().section(name).map_or(0, |s| s.len());
            let status = self.session.quiz().status(name);

            ui.heading(name);
            match (status, self.session.quiz().progress(name)) {
                (QuizStatus::Started, Some(progress)) => {
                    ui.label(format!("Quiz in progress: {} correct so far", progress.score));
                }
                (QuizStatus::Completed, Some(progress)) => {
                    ui.label(format!(
                        "Quiz completed: {}/{} ({:.0}%)",
                        progress.score,
                        total,
                        progress.percentage(total)
                    ));
                }
                _ => {
                    ui.label("Browsing");
                }
            }

            ui.separator();

            let Some(card) = self.session.current_card() else {
                ui.label("This section has no cards.");
                return;
            };
            let card_id = card.id;
            let learned = card.learned;

            ui.label(format!("Card {} / {}", self.session.card_index() + 1, total));
            ui.group(|ui| {
                ui.set_min_height(180.0);
                ui.vertical_centered(|ui| {
                    ui.add_space(50.0);
                    ui.label(
                        egui::RichText::new(self.session.current_face().unwrap_or_default())
                            .size(28.0),
                    );
                    ui.add_space(20.0);
                    if ui.button("Flip").clicked() {
                        actions.push(Action::FlipCard);
                    }
                });
            });

            ui.add_space(10.0);

            ui.horizontal(|ui| {
                if ui.button("Previous").clicked() {
                    actions.push(Action::PreviousCard);
                }
                if ui.button("Next").clicked() {
                    actions.push(Action::NextCard);
                }

                let mut is_learned = learned;
                if ui.checkbox(&mut is_learned, "Learned").changed() {
                    actions.push(Action::ToggleLearned {
                        section: name.to_string(),
                        card_id,
                    });
                }
            });

            if status == QuizStatus::Started {
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if self.session.quiz().is_answered(name, card_id) {
                        ui.label("Already answered");
                    } else {
                        if ui.button("I knew it").clicked() {
                            actions.push(Action::AnswerCard { correct: true });
                        }
                        if ui.button("I didn't").clicked() {
                            actions.push(Action::AnswerCard { correct: false });
                        }
                    }
                    if ui.button("Finish quiz").clicked() {
                        actions.push(Action::CompleteQuiz);
                    }
                });
            } else if ui.button("Start Quiz").clicked() {
                actions.push(Action::StartQuiz(name.to_string()));
            }
        });

        actions
    }

    fn render_table_screen(&mut self, ctx: &egui::Context) -> Vec<Action> {
        let mut actions = Vec::new();

        egui::CentralPanel::default().show(ctx, |ui| {
            if ui.button("Return to Sections View").clicked() {
                actions.push(Action::SwitchView(ViewMode::Sections));
            }

            let reveal = self.session.reveal();

            egui::ScrollArea::vertical()
                .id_salt("table_view")
                .show(ui, |ui| {
                    for section in self.session.deck().sections() {
                        ui.add_space(10.0);
                        ui.heading(&section.name);

                        egui::Grid::new(format!("table_{}", section.name))
                            .num_columns(2)
                            .striped(true)
                            .show(ui, |ui| {
                                ui.strong("English");
                                ui.strong("Spanish");
                                ui.end_row();

                                for column in [Column::English, Column::Spanish] {
                                    let label = if reveal.is_column_revealed(column) {
                                        "Blur All"
                                    } else {
                                        "Reveal All"
                                    };
                                    if ui.button(label).clicked() {
                                        actions.push(Action::ToggleColumn(column));
                                    }
                                }
                                ui.end_row();

                                for (index, card) in section.cards.iter().enumerate() {
                                    for (column, text) in [
                                        (Column::English, card.english.as_str()),
                                        (Column::Spanish, card.spanish.as_str()),
                                    ] {
                                        let shown = if reveal.is_visible(column, &section.name, card.id)
                                        {
                                            text
                                        } else {
                                            HIDDEN_TEXT
                                        };
                                        if ui.selectable_label(false, shown).clicked() {
                                            actions.push(Action::ToggleCell {
                                                section: section.name.clone(),
                                                index,
                                            });
                                        }
                                    }
                                    ui.end_row();
                                }
                            });
                    }
                });
        });

        actions
    }
}
